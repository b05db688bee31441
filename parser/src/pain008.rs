pub mod serde_models;

use chrono::NaiveDateTime;

pub use serde_models::*;

/// Пространство имён pain.008.001.02
pub const PAIN008_NAMESPACE: &str = "urn:iso:std:iso:20022:tech:xsd:pain.008.001.02";
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Имя схемы для идентификаторов инициатора и кредитора
pub const SCHEME_NAME: &str = "SEPA";
pub const SERVICE_LEVEL: &str = "SEPA";
pub const LOCAL_INSTRUMENT: &str = "CORE";
pub const PAYMENT_METHOD: &str = "DD";
pub const CHARGE_BEARER: &str = "SLEV";
/// Заглушка BIC банка кредитора: в файле AEB 19.14 его нет
pub const DEFAULT_CREDITOR_BIC: &str = "CAIXESBBXXX";
pub const NOT_PROVIDED: &str = "NOTPROVIDED";

/// Настройки конвертации [`crate::BatchDocument`] в pain.008
///
/// `message_id` и `created_at` можно зафиксировать, чтобы получить воспроизводимый вывод;
/// по умолчанию они генерируются при записи.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// BIC банка кредитора
    pub creditor_bic: String,
    /// валюта сумм
    pub currency: String,
    /// тип последовательности для транзакций с пустым или неизвестным SeqTp
    pub sequence_type: String,
    /// невалидный IBAN - ошибка, а не предупреждение
    pub strict_iban: bool,
    /// XML с отступами
    pub pretty: bool,
    pub message_id: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            creditor_bic: DEFAULT_CREDITOR_BIC.to_string(),
            currency: "EUR".to_string(),
            sequence_type: "RCUR".to_string(),
            strict_iban: false,
            pretty: false,
            message_id: None,
            created_at: None,
        }
    }
}
