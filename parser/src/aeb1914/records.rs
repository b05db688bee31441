use chrono::NaiveDate;

use crate::error::ParseError;
use crate::model::{Creditor, DebitTransaction, Debtor, InitiatingParty, Totals};
use crate::utils::FixedLine;

/// Одна распознанная запись реестра вместе с разобранными полями
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Record {
    /// 01 - заголовок инициатора, открывает документ
    InitiatingParty(InitiatingParty),
    /// 02 - заголовок кредитора на дату взыскания
    PaymentHeader { creditor: Creditor, date: NaiveDate },
    /// 03 - поручение на списание
    Transaction(DebitTransaction),
    /// 04 - итоги кредитора на дату
    PaymentTotals {
        creditor_id: String,
        date: NaiveDate,
        declared: Totals,
    },
    /// 05 - итоги кредитора
    CreditorTotals { creditor_id: String, declared: Totals },
    /// 99 - итоги документа
    DocumentTotals { declared: Totals },
}

impl Record {
    /// Определяет тип записи по колонкам [0,2) и разбирает её.
    ///
    /// Нераспознанный код - не ошибка, возвращается `None`.
    pub(crate) fn classify(line: &FixedLine) -> Result<Option<Self>, ParseError> {
        let code = line.text(0..2);

        let record = match code.as_str() {
            "01" => {
                expect_sub_type(line, "01", "001")?;
                Record::InitiatingParty(parse_initiating_party(line)?)
            }
            "02" => {
                expect_sub_type(line, "02", "002")?;
                let date = line.date(45..53, "collection date")?;
                Record::PaymentHeader {
                    creditor: parse_creditor(line),
                    date,
                }
            }
            "03" => {
                expect_sub_type(line, "03", "003")?;
                Record::Transaction(parse_transaction(line)?)
            }
            "04" => Record::PaymentTotals {
                creditor_id: line.text(2..37),
                date: line.date(37..45, "payment date")?,
                declared: Totals {
                    amount: line.money(45..62, "payment total amount")?,
                    debit_count: line.count(62..70, "payment debit count")?,
                    register_count: line.count(70..80, "payment register count")?,
                },
            },
            "05" => Record::CreditorTotals {
                creditor_id: line.text(2..37),
                declared: Totals {
                    amount: line.money(37..54, "creditor total amount")?,
                    debit_count: line.count(54..62, "creditor debit count")?,
                    register_count: line.count(62..72, "creditor register count")?,
                },
            },
            "99" => Record::DocumentTotals {
                declared: Totals {
                    amount: line.money(2..19, "document total amount")?,
                    debit_count: line.count(19..27, "document debit count")?,
                    register_count: line.count(27..37, "document register count")?,
                },
            },
            _ => return Ok(None),
        };

        Ok(Some(record))
    }

    /// Двухсимвольный код записи
    pub(crate) fn code(&self) -> &'static str {
        match self {
            Record::InitiatingParty(_) => "01",
            Record::PaymentHeader { .. } => "02",
            Record::Transaction(_) => "03",
            Record::PaymentTotals { .. } => "04",
            Record::CreditorTotals { .. } => "05",
            Record::DocumentTotals { .. } => "99",
        }
    }
}

fn expect_sub_type(line: &FixedLine, code: &'static str, expected: &'static str) -> Result<(), ParseError> {
    let found = line.text(7..10);
    if found != expected {
        return Err(ParseError::UnexpectedSubType {
            line: line.number(),
            code,
            expected,
            found,
        });
    }
    Ok(())
}

fn parse_initiating_party(line: &FixedLine) -> Result<InitiatingParty, ParseError> {
    Ok(InitiatingParty {
        id: line.text(10..45),
        name: line.text(45..115),
        creation_date: line.date(115..123, "creation date")?,
        file_id: line.text(123..158),
        entity: line.text(158..162),
        office: line.text(162..166),
    })
}

fn parse_creditor(line: &FixedLine) -> Creditor {
    Creditor {
        id: line.text(10..45),
        name: line.text(53..123),
        address: [
            line.text(123..173),
            line.text(173..223),
            line.text(223..263),
        ],
        country: line.text(263..265),
        account: line.text(265..299),
    }
}

fn parse_transaction(line: &FixedLine) -> Result<DebitTransaction, ParseError> {
    let debtor = Debtor {
        entity: line.text(107..118),
        name: line.text(118..188),
        address: [
            line.text(188..238),
            line.text(238..288),
            line.text(288..328),
        ],
        country: line.text(328..330),
        id_type: line.text(330..331),
        id: line.text(331..367),
        id_issuer: line.text(367..402),
        account_id_type: line.text(402..403),
        account: line.text(403..437),
    };

    Ok(DebitTransaction {
        id: line.text(10..45),
        mandate_id: line.text(45..80),
        sequence: line.text(80..84),
        category_code: line.text(84..88),
        amount: line.money(88..99, "transaction amount")?,
        date: line.date(99..107, "mandate date")?,
        debtor,
        purpose: line.text(437..441),
        concept: line.text(441..581),
    })
}
