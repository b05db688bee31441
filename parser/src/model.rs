use chrono::NaiveDate;
use std::fmt;

use crate::serialization::format_minor_units;

/// Тип для хранения денежной суммы в "центах", unsigned
pub type Amount = u64;

/// Уровень иерархии реестра, у каждого свои итоги и своё состояние открыт/закрыт
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Весь документ (01 ... 99)
    Document,
    /// Группа платежей одного кредитора (02 ... 05)
    Creditor,
    /// Платёж на одну дату взыскания (02 ... 04)
    Payment,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Document => write!(f, "document"),
            Level::Creditor => write!(f, "creditor group"),
            Level::Payment => write!(f, "date payment"),
        }
    }
}

/// Накопленные итоги уровня.
///
/// `register_count` считает все записи уровня (включая заголовок и итоговую запись),
/// `debit_count` - только записи 03.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    /// сумма (в "центах")
    pub amount: Amount,
    /// количество дебетовых записей
    pub debit_count: usize,
    /// количество всех записей
    pub register_count: usize,
}

/// Инициатор реестра (запись 01)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitiatingParty {
    /// идентификатор инициатора
    pub id: String,
    /// наименование
    pub name: String,
    /// дата создания файла
    pub creation_date: NaiveDate,
    /// идентификатор файла
    pub file_id: String,
    /// код банка-получателя файла
    pub entity: String,
    /// код отделения
    pub office: String,
}

/// Кредитор (получатель средств), из записи 02
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Creditor {
    /// идентификатор кредитора (SEPA creditor id)
    pub id: String,
    pub name: String,
    /// три строки адреса
    pub address: [String; 3],
    /// код страны ISO 3166
    pub country: String,
    /// счёт кредитора (IBAN)
    pub account: String,
}

/// Плательщик, из записи 03
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debtor {
    /// банк плательщика (BIC), может быть пустым
    pub entity: String,
    pub name: String,
    pub address: [String; 3],
    pub country: String,
    /// тип идентификации: 1 - организация, 2 - физлицо
    pub id_type: String,
    pub id: String,
    /// код эмитента идентификатора
    pub id_issuer: String,
    /// тип идентификации счёта (A - IBAN)
    pub account_id_type: String,
    pub account: String,
}

/// Одно поручение на списание (запись 03)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebitTransaction {
    /// end-to-end идентификатор
    pub id: String,
    pub mandate_id: String,
    /// FRST, RCUR, OOFF, FNAL
    pub sequence: String,
    pub category_code: String,
    /// сумма (в "центах")
    pub amount: Amount,
    /// дата подписания мандата
    pub date: NaiveDate,
    pub debtor: Debtor,
    pub purpose: String,
    /// назначение платежа, свободный текст
    pub concept: String,
}

/// Платежи одного кредитора на одну дату взыскания
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePayment {
    /// дата взыскания
    pub date: NaiveDate,
    pub transactions: Vec<DebitTransaction>,
    pub totals: Totals,
}

impl DatePayment {
    /// Go to [`DatePayment`]
    pub fn new(date: NaiveDate) -> Self {
        DatePayment {
            date,
            transactions: Vec::new(),
            totals: Totals::default(),
        }
    }
}

/// Группа платежей одного кредитора
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditorPayments {
    pub creditor: Creditor,
    pub date_payments: Vec<DatePayment>,
    pub totals: Totals,
}

impl CreditorPayments {
    /// Go to [`CreditorPayments`]
    pub fn new(creditor: Creditor) -> Self {
        CreditorPayments {
            creditor,
            date_payments: Vec::new(),
            totals: Totals::default(),
        }
    }
}

/// Центральная/корневая структура библиотеки, содержащая один реестр прямого дебета.
///
/// Порядок групп, платежей и поручений совпадает с порядком записей в файле.
/// После успешного парсинга `totals` содержат суммы, заявленные итоговой записью 99.
///
/// Пример использования:
/// ```no_run
/// # use aeb_parser::{Aeb1914Data, BatchDocument, ConvertOptions, ParseError};
/// # fn main() -> Result<(), ParseError> {
/// let file = std::fs::File::open("remesa.txt")?;
/// let document: BatchDocument = Aeb1914Data::parse(file)?.into();
///
/// let stdout = std::io::stdout();
/// document.write_pain008(stdout.lock(), &ConvertOptions::default())?;
/// #     Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchDocument {
    pub initiating_party: InitiatingParty,
    pub creditor_payments: Vec<CreditorPayments>,
    pub totals: Totals,
}

impl BatchDocument {
    /// Go to [`BatchDocument`]
    pub fn new(initiating_party: InitiatingParty) -> Self {
        BatchDocument {
            initiating_party,
            creditor_payments: Vec::new(),
            totals: Totals::default(),
        }
    }

    /// Все поручения документа в порядке файла
    pub fn transactions(&self) -> impl Iterator<Item = &DebitTransaction> {
        self.creditor_payments
            .iter()
            .flat_map(|cp| cp.date_payments.iter())
            .flat_map(|dp| dp.transactions.iter())
    }
}

impl fmt::Display for BatchDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Document {}: amount={}, debits={}, registers={}",
            self.initiating_party.name,
            format_minor_units(self.totals.amount, '.'),
            self.totals.debit_count,
            self.totals.register_count,
        )
    }
}

impl fmt::Display for CreditorPayments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Creditor {} ({}): payments={}, amount={}, debits={}",
            self.creditor.name,
            self.creditor.id,
            self.date_payments.len(),
            format_minor_units(self.totals.amount, '.'),
            self.totals.debit_count,
        )
    }
}

impl fmt::Display for DatePayment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Payment {}: amount={}, debits={}",
            self.date,
            format_minor_units(self.totals.amount, '.'),
            self.totals.debit_count,
        )
    }
}

impl fmt::Display for DebitTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<10} {:>15} {:<35} {} {}",
            self.date,
            format_minor_units(self.amount, '.'),
            self.id,
            self.debtor.name,
            self.concept,
        )
    }
}
