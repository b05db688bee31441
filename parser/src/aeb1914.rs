mod context;
mod records;

use std::io::{BufReader, Read};
use tracing::{debug, trace};

use crate::error::ParseError;
use crate::model::BatchDocument;
use crate::utils::{FixedLine, decode_latin1};
use context::ParseContext;
use records::Record;

pub use context::AMOUNT_TOLERANCE;

/// Парсит строки реестра AEB 19.14 (уже декодированные) в [`BatchDocument`].
///
/// Один проход, строка за строкой. Любая ошибка извлечения поля или сверки итогов
/// прерывает парсинг, частичный документ не возвращается.
///
/// Пример:
/// ```rust,no_run
/// # use aeb_parser::{aeb1914, ParseError};
/// # fn main() -> Result<(), ParseError> {
/// let text = std::fs::read_to_string("remesa.txt")?;
/// let document = aeb1914::parse(text.lines())?;
/// println!("{document}");
/// #     Ok(())
/// # }
/// ```
pub fn parse<I, S>(lines: I) -> Result<BatchDocument, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut ctx = ParseContext::default();

    for (idx, raw_line) in lines.into_iter().enumerate() {
        let line = FixedLine::new(raw_line.as_ref(), idx + 1);

        match Record::classify(&line)? {
            Some(record) => {
                trace!(line = line.number(), code = record.code(), "record");
                ctx.apply(record, line.number())?;
            }
            None => {
                if !line.is_blank() {
                    debug!(line = line.number(), code = %line.text(0..2), "skipped unknown record");
                }
            }
        }
    }

    ctx.finish()
}

/// Структура с разобранным реестром формата AEB 19.14 (SEPA Core direct debit, TXT).
///
/// Для парсинга используйте [`Aeb1914Data::parse`] (файл в родной кодировке ISO-8859-1)
/// или [`Aeb1914Data::parse_utf8`].
///
/// Пример:
/// ```rust,no_run
/// use std::io::Cursor;
/// use aeb_parser::Aeb1914Data;
/// # use aeb_parser::ParseError;
/// # fn main() -> Result<(), ParseError> {
/// let reader = Cursor::new(std::fs::read("remesa.txt")?);
/// let data = Aeb1914Data::parse(reader)?;
/// #     Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Aeb1914Data {
    pub document: BatchDocument,
}

impl Aeb1914Data {
    /// Парсит при помощи переданного reader данные в ISO-8859-1 в [`Aeb1914Data`]
    ///
    /// При ошибке возвращает [`ParseError`]
    pub fn parse<R: Read>(reader: R) -> Result<Self, ParseError> {
        let mut buf_reader = BufReader::new(reader);
        let mut bytes = Vec::new();
        buf_reader.read_to_end(&mut bytes)?;

        let text = decode_latin1(&bytes);
        let document = parse(text.lines())?;
        Ok(Aeb1914Data { document })
    }

    /// То же, что [`Aeb1914Data::parse`], но для файла, уже перекодированного в UTF-8
    pub fn parse_utf8<R: Read>(reader: R) -> Result<Self, ParseError> {
        let mut buf_reader = BufReader::new(reader);
        let mut text = String::new();
        buf_reader.read_to_string(&mut text)?;

        // BOM иначе попадает в код первой записи
        let text = text.strip_prefix('\u{FEFF}').unwrap_or(&text);
        let document = parse(text.lines())?;
        Ok(Aeb1914Data { document })
    }
}

impl From<Aeb1914Data> for BatchDocument {
    fn from(data: Aeb1914Data) -> Self {
        data.document
    }
}
