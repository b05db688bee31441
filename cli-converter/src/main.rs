use std::path::PathBuf;
use clap::{Parser, ValueEnum};
use aeb_parser::{Aeb1914Data, BatchDocument, ConvertOptions, ParseError};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::process;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const STDIO: &str = "-";

#[derive(Parser, Debug)]
#[command(
    name = "cli_converter",
    version,
    about = "Конвертирует реестр прямого дебета AEB 19.14 в SEPA pain.008.001.02.",
    long_about = None,
)]
struct Args {
    /// Входной файл AEB 19.14 ("-" для stdin)
    #[arg(long, default_value = STDIO)]
    input: PathBuf,

    /// Выходной файл pain.008 ("-" для stdout)
    #[arg(long, default_value = STDIO)]
    output: PathBuf,

    /// Кодировка входного файла
    #[arg(long, value_enum, default_value_t = Encoding::Latin1)]
    encoding: Encoding,

    /// BIC банка кредитора
    #[arg(long, default_value = aeb_parser::pain008::DEFAULT_CREDITOR_BIC)]
    creditor_bic: String,

    /// Валюта сумм
    #[arg(long, default_value = "EUR")]
    currency: String,

    /// Тип последовательности (FRST, RCUR, OOFF, FNAL) для записей без своего
    #[arg(long, default_value = "RCUR")]
    sequence_type: String,

    /// XML с отступами
    #[arg(long)]
    pretty: bool,

    /// Невалидный IBAN считать ошибкой
    #[arg(long)]
    strict_iban: bool,
}

/// Кодировки входного файла
#[derive(Copy, Clone, Debug, ValueEnum)]
enum Encoding {
    Latin1,
    Utf8,
}

impl Args {
    fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            creditor_bic: self.creditor_bic.clone(),
            currency: self.currency.clone(),
            sequence_type: self.sequence_type.clone(),
            strict_iban: self.strict_iban,
            pretty: self.pretty,
            ..ConvertOptions::default()
        }
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), ParseError> {
    let args = Args::parse();
    debug!("{args:?}");

    let reader: Box<dyn Read> = if args.input.as_os_str() == STDIO {
        Box::new(io::stdin().lock())
    } else {
        Box::new(File::open(&args.input)?)
    };
    let reader = BufReader::new(reader);

    let data = match args.encoding {
        Encoding::Latin1 => Aeb1914Data::parse(reader)?,
        Encoding::Utf8 => Aeb1914Data::parse_utf8(reader)?,
    };
    let document: BatchDocument = data.into();
    info!(
        "parsed {} creditor groups, {} transactions",
        document.creditor_payments.len(),
        document.totals.debit_count
    );

    let options = args.convert_options();
    if args.output.as_os_str() == STDIO {
        let stdout = io::stdout();
        document.write_pain008(stdout.lock(), &options)?;
    } else {
        // файл создаётся только после успешного разбора
        let mut writer = BufWriter::new(File::create(&args.output)?);
        document.write_pain008(&mut writer, &options)?;
        writer.flush()?;
    }

    Ok(())
}
