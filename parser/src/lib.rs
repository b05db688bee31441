pub mod error;
pub mod model;
pub mod aeb1914;
pub mod pain008;
pub mod iban;
pub mod serialization;

mod utils;

pub use crate::model::{
    Amount, BatchDocument, Creditor, CreditorPayments, DatePayment, DebitTransaction, Debtor,
    InitiatingParty, Level, Totals,
};
pub use crate::aeb1914::{Aeb1914Data, parse};
pub use crate::pain008::{ConvertOptions, Pain008Document};
pub use crate::error::ParseError;
