use chrono::{NaiveDate, NaiveDateTime};
use tracing::warn;

use super::common::{format_minor_units, sanitize_sepa_text};
use crate::error::ParseError;
use crate::iban;
use crate::model::{Amount, BatchDocument, CreditorPayments, DatePayment, DebitTransaction, Totals};
use crate::pain008::*;

pub(crate) fn format_iso_date(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

pub(crate) fn format_iso_datetime(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// pain-формат суммы: "1234.56"
pub(crate) fn format_pain_amount(v: Amount) -> String {
    format_minor_units(v, '.')
}

/// MsgId вида f-YYYYMMDD-<16 hex>
pub(crate) fn generate_message_id(created_at: NaiveDateTime) -> String {
    format!(
        "f-{}-{:016x}",
        created_at.format("%Y%m%d"),
        rand::random::<u64>()
    )
}

/// PmtInfId строится из даты взыскания и номера блока на эту дату (с единицы)
pub(crate) fn payment_info_id(collection_date: NaiveDate, block: usize) -> String {
    format!("rem{}{block}", collection_date.format("%Y%m%d"))
}

/// Тип последовательности транзакции; пустой или неизвестный заменяется значением из настроек
pub(crate) fn sequence_type<'a>(tx: &'a DebitTransaction, options: &'a ConvertOptions) -> &'a str {
    match tx.sequence.trim() {
        seq @ ("FRST" | "RCUR" | "OOFF" | "FNAL") => seq,
        _ => options.sequence_type.as_str(),
    }
}

/// Транзакции платежа на дату, разбитые по типу последовательности в порядке появления
fn split_by_sequence<'a>(
    payment: &'a DatePayment,
    options: &'a ConvertOptions,
) -> Vec<(&'a str, Vec<&'a DebitTransaction>)> {
    let mut blocks: Vec<(&str, Vec<&DebitTransaction>)> = Vec::new();
    for tx in &payment.transactions {
        let seq = sequence_type(tx, options);
        match blocks.iter_mut().find(|(s, _)| *s == seq) {
            Some((_, txs)) => txs.push(tx),
            None => blocks.push((seq, vec![tx])),
        }
    }
    blocks
}

pub(crate) fn document_from_batch(
    doc: &BatchDocument,
    options: &ConvertOptions,
    message_id: String,
    created_at: NaiveDateTime,
) -> Result<Pain008Document, ParseError> {
    let party = &doc.initiating_party;

    let group_header = Pain008GroupHeader {
        message_id,
        created_at: format_iso_datetime(created_at),
        transaction_count: doc.totals.debit_count,
        control_sum: format_pain_amount(doc.totals.amount),
        initiating_party: PainParty {
            name: sanitize_sepa_text(&party.name),
            postal_address: None,
            id: Some(PainPartyId {
                organisation: Some(sepa_other_id(&party.id)),
                private: None,
            }),
        },
    };

    // одна пара (кредитор, дата) - один PmtInf на каждый тип последовательности
    let mut payments = Vec::new();
    for group in &doc.creditor_payments {
        check_iban(&format!("creditor {}", group.creditor.id), &group.creditor.account, options.strict_iban)?;

        for payment in &group.date_payments {
            let blocks = split_by_sequence(payment, options);
            let single = blocks.len() <= 1;

            if blocks.is_empty() {
                payments.push(payment_info(group, payment, &options.sequence_type, &[], payment.totals, 1, options)?);
            }
            for (idx, (seq, txs)) in blocks.iter().enumerate() {
                // итоги из записи 04, если блок на дату один; иначе считаются по транзакциям блока
                let totals = if single {
                    payment.totals
                } else {
                    Totals {
                        amount: txs.iter().fold(0, |acc: Amount, tx| acc.saturating_add(tx.amount)),
                        debit_count: txs.len(),
                        register_count: 0,
                    }
                };
                payments.push(payment_info(group, payment, seq, txs, totals, idx + 1, options)?);
            }
        }
    }

    Ok(Pain008Document {
        xmlns: PAIN008_NAMESPACE.to_string(),
        xmlns_xsi: XSI_NAMESPACE.to_string(),
        initiation: Pain008Initiation {
            group_header,
            payments,
        },
    })
}

fn payment_info(
    group: &CreditorPayments,
    payment: &DatePayment,
    sequence_type: &str,
    txs: &[&DebitTransaction],
    totals: Totals,
    block: usize,
    options: &ConvertOptions,
) -> Result<Pain008PaymentInfo, ParseError> {
    let creditor = &group.creditor;

    let transactions = txs
        .iter()
        .map(|tx| transaction_info(tx, options))
        .collect::<Result<Vec<_>, ParseError>>()?;

    Ok(Pain008PaymentInfo {
        id: payment_info_id(payment.date, block),
        method: PAYMENT_METHOD.to_string(),
        transaction_count: totals.debit_count,
        control_sum: format_pain_amount(totals.amount),
        payment_type: PainPaymentType {
            service_level: PainCode {
                code: SERVICE_LEVEL.to_string(),
            },
            local_instrument: PainCode {
                code: LOCAL_INSTRUMENT.to_string(),
            },
            sequence_type: sequence_type.to_string(),
        },
        collection_date: format_iso_date(payment.date),
        creditor: PainParty {
            name: sanitize_sepa_text(&creditor.name),
            postal_address: postal_address(&creditor.address, &creditor.country),
            id: None,
        },
        creditor_account: iban_account(&creditor.account),
        creditor_agent: PainAgent {
            institution: PainInstitution {
                bic: Some(options.creditor_bic.clone()),
                other: None,
            },
        },
        charge_bearer: CHARGE_BEARER.to_string(),
        creditor_scheme_id: PainSchemeId {
            id: PainPartyId {
                organisation: None,
                private: Some(sepa_other_id(&creditor.id)),
            },
        },
        transactions,
    })
}

fn transaction_info(tx: &DebitTransaction, options: &ConvertOptions) -> Result<Pain008Transaction, ParseError> {
    check_iban(&format!("transaction {}", tx.id), &tx.debtor.account, options.strict_iban)?;

    let institution = if tx.debtor.entity.is_empty() {
        PainInstitution {
            bic: None,
            other: Some(PainGenericId {
                id: NOT_PROVIDED.to_string(),
                scheme_name: None,
            }),
        }
    } else {
        PainInstitution {
            bic: Some(tx.debtor.entity.clone()),
            other: None,
        }
    };

    let concept = sanitize_sepa_text(&tx.concept);
    let remittance = if concept.trim().is_empty() {
        None
    } else {
        Some(PainRemittance {
            unstructured: concept,
        })
    };

    Ok(Pain008Transaction {
        payment_id: PainPaymentId {
            end_to_end_id: tx.id.clone(),
        },
        amount: PainAmount {
            currency: options.currency.clone(),
            value: format_pain_amount(tx.amount),
        },
        direct_debit: PainDirectDebit {
            mandate: PainMandate {
                mandate_id: tx.mandate_id.clone(),
                signature_date: format_iso_date(tx.date),
            },
        },
        debtor_agent: PainAgent { institution },
        debtor: PainParty {
            name: sanitize_sepa_text(&tx.debtor.name),
            postal_address: None,
            id: None,
        },
        debtor_account: iban_account(&tx.debtor.account),
        remittance,
    })
}

/// Первые две непустые строки адреса и страна
fn postal_address(lines: &[String; 3], country: &str) -> Option<PainPostalAddress> {
    let lines: Vec<String> = lines
        .iter()
        .map(|l| sanitize_sepa_text(l))
        .filter(|l| !l.trim().is_empty())
        .take(2)
        .collect();
    let country = (!country.is_empty()).then(|| country.to_string());

    if lines.is_empty() && country.is_none() {
        return None;
    }
    Some(PainPostalAddress { country, lines })
}

fn sepa_other_id(id: &str) -> PainOtherId {
    PainOtherId {
        other: PainGenericId {
            id: id.to_string(),
            scheme_name: Some(PainProprietary {
                proprietary: SCHEME_NAME.to_string(),
            }),
        },
    }
}

fn iban_account(raw: &str) -> PainAccount {
    PainAccount {
        id: PainAccountId {
            iban: iban::normalize(raw),
        },
    }
}

fn check_iban(party: &str, raw: &str, strict: bool) -> Result<(), ParseError> {
    if iban::is_valid(raw) {
        return Ok(());
    }
    if strict {
        return Err(ParseError::InvalidIban {
            party: party.to_string(),
            iban: raw.to_string(),
        });
    }
    warn!("invalid IBAN for {party}: '{raw}'");
    Ok(())
}
