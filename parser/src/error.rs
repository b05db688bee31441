use std::io::Error as IoError;
use quick_xml::se::SeError;
use thiserror::Error;

use crate::model::{Amount, Level};

/// Ошибки при парсинге и конвертации реестра.
///
/// Любая ошибка фатальна: частично собранный документ вызывающему не отдаётся.
/// Номер строки (`line`) считается с единицы.
#[derive(Debug, Error)]
pub enum ParseError {
    // обёртки

    /// обёртка std::io::Error
    #[error("io error: {0}")]
    Io(#[from] IoError),
    /// обёртка quick_xml::se::SeError
    #[error("Xml serialization error: {0}")]
    XmlSe(#[from] SeError),

    // ошибки извлечения полей

    /// поле не является датой YYYYMMDD
    #[error("line {line}: malformed date in field {field}: '{value}'")]
    MalformedDate {
        line: usize,
        field: &'static str,
        value: String,
    },
    /// поле не является суммой в центах
    #[error("line {line}: malformed amount in field {field}: '{value}'")]
    MalformedAmount {
        line: usize,
        field: &'static str,
        value: String,
    },
    /// поле не является неотрицательным целым
    #[error("line {line}: malformed count in field {field}: '{value}'")]
    MalformedCount {
        line: usize,
        field: &'static str,
        value: String,
    },

    // структурные ошибки

    /// вторичный код записи (колонки 8-10) не совпал с ожидаемым
    #[error("line {line}: record {code} expects sub-type {expected}, found '{found}'")]
    UnexpectedSubType {
        line: usize,
        code: &'static str,
        expected: &'static str,
        found: String,
    },
    /// запись пришла для уровня, который не открыт (или уже закрыт)
    #[error("line {line}: no open {level} for this record")]
    NoOpenLevel { line: usize, level: Level },
    /// заголовок или итог пришёл, пока вложенный уровень ещё открыт
    #[error("line {line}: {level} is still open")]
    UnclosedLevel { line: usize, level: Level },
    /// повторная запись 01
    #[error("line {line}: duplicate initiating party header")]
    DuplicateHeader { line: usize },
    /// файл закончился без итоговой записи 99
    #[error("input ended before the document totals record (99)")]
    MissingDocumentTotals,

    // ошибки сверки итогов

    /// идентификатор (кредитор или дата) в итоговой записи не совпал с открытым уровнем
    #[error("line {line}: {level} {field} mismatch: record has '{found}', open {level} has '{expected}'")]
    IdentityMismatch {
        line: usize,
        level: Level,
        field: &'static str,
        expected: String,
        found: String,
    },
    /// заявленная сумма расходится с посчитанной больше чем на цент
    #[error("line {line}: {level} amount mismatch: declared {declared} cents, computed {computed} cents")]
    AmountMismatch {
        line: usize,
        level: Level,
        declared: Amount,
        computed: Amount,
    },
    /// заявленное число дебетовых записей расходится с посчитанным
    #[error("line {line}: {level} debit count mismatch: declared {declared}, computed {computed}")]
    CountMismatch {
        line: usize,
        level: Level,
        declared: usize,
        computed: usize,
    },
    /// заявленное число всех записей расходится с посчитанным
    #[error("line {line}: {level} register count mismatch: declared {declared}, computed {computed}")]
    RegisterCountMismatch {
        line: usize,
        level: Level,
        declared: usize,
        computed: usize,
    },

    // ошибки конвертации

    /// IBAN не прошёл проверку контрольной суммы (строгий режим)
    #[error("invalid IBAN for {party}: '{iban}'")]
    InvalidIban { party: String, iban: String },
}
