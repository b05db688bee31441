use chrono::NaiveDate;
use tracing::{debug, info};

use super::records::Record;
use crate::error::ParseError;
use crate::model::{
    Amount, BatchDocument, Creditor, CreditorPayments, DatePayment, DebitTransaction,
    InitiatingParty, Level, Totals,
};

/// Допустимое расхождение заявленной и посчитанной суммы, в "центах"
pub const AMOUNT_TOLERANCE: Amount = 1;

const LEVELS: [Level; 3] = [Level::Document, Level::Creditor, Level::Payment];

/// Состояние одного прохода парсера.
///
/// Хранит собираемый документ и индексы открытых группы кредитора и платежа на дату.
/// Открытый платёж всегда лежит внутри открытой группы.
#[derive(Debug, Default)]
pub(crate) struct ParseContext {
    document: Option<BatchDocument>,
    closed: bool,
    creditor: Option<usize>,
    payment: Option<usize>,
}

impl ParseContext {
    pub(crate) fn apply(&mut self, record: Record, line: usize) -> Result<(), ParseError> {
        match record {
            Record::InitiatingParty(party) => self.open_document(party, line),
            Record::PaymentHeader { creditor, date } => self.open_payment(creditor, date, line),
            Record::Transaction(tx) => self.add_transaction(tx, line),
            Record::PaymentTotals {
                creditor_id,
                date,
                declared,
            } => self.close_payment(&creditor_id, date, declared, line),
            Record::CreditorTotals {
                creditor_id,
                declared,
            } => self.close_creditor(&creditor_id, declared, line),
            Record::DocumentTotals { declared } => self.close_document(declared, line),
        }
    }

    /// Отдаёт документ, если он был закрыт записью 99
    pub(crate) fn finish(self) -> Result<BatchDocument, ParseError> {
        match self.document {
            Some(document) if self.closed => Ok(document),
            _ => Err(ParseError::MissingDocumentTotals),
        }
    }

    // ---- заголовки ----

    fn open_document(&mut self, party: InitiatingParty, line: usize) -> Result<(), ParseError> {
        if self.document.is_some() {
            return Err(ParseError::DuplicateHeader { line });
        }

        self.document = Some(BatchDocument::new(party));
        self.count_register();
        Ok(())
    }

    fn open_payment(&mut self, creditor: Creditor, date: NaiveDate, line: usize) -> Result<(), ParseError> {
        self.ensure_document_open(line)?;
        if self.payment.is_some() {
            return Err(ParseError::UnclosedLevel {
                line,
                level: Level::Payment,
            });
        }

        let open_creditor = self.creditor;
        let document = self.document_mut(line)?;

        // группа кредитора переиспользуется для следующей даты, пока не пришла 05
        let group_idx = match open_creditor {
            Some(idx) => {
                let group = document
                    .creditor_payments
                    .get(idx)
                    .ok_or(ParseError::NoOpenLevel { line, level: Level::Creditor })?;
                if group.creditor.id != creditor.id {
                    return Err(ParseError::IdentityMismatch {
                        line,
                        level: Level::Creditor,
                        field: "creditor id",
                        expected: group.creditor.id.clone(),
                        found: creditor.id,
                    });
                }
                idx
            }
            None => {
                document.creditor_payments.push(CreditorPayments::new(creditor));
                document.creditor_payments.len() - 1
            }
        };

        let group = &mut document.creditor_payments[group_idx];
        group.date_payments.push(DatePayment::new(date));
        let payment_idx = group.date_payments.len() - 1;

        self.creditor = Some(group_idx);
        self.payment = Some(payment_idx);
        self.count_register();
        Ok(())
    }

    // ---- детальные записи ----

    fn add_transaction(&mut self, tx: DebitTransaction, line: usize) -> Result<(), ParseError> {
        self.ensure_document_open(line)?;
        let amount = tx.amount;

        let payment = self
            .open_date_payment_mut()
            .ok_or(ParseError::NoOpenLevel { line, level: Level::Payment })?;
        payment.transactions.push(tx);

        for level in LEVELS {
            if let Some(totals) = self.totals_mut(level) {
                totals.debit_count += 1;
                totals.amount = totals.amount.saturating_add(amount);
            }
        }
        self.count_register();
        Ok(())
    }

    // ---- итоговые записи ----

    fn close_payment(
        &mut self,
        creditor_id: &str,
        date: NaiveDate,
        declared: Totals,
        line: usize,
    ) -> Result<(), ParseError> {
        self.ensure_document_open(line)?;
        let (group, payment) = self
            .open_date_payment()
            .ok_or(ParseError::NoOpenLevel { line, level: Level::Payment })?;

        if group.creditor.id != creditor_id {
            return Err(ParseError::IdentityMismatch {
                line,
                level: Level::Creditor,
                field: "creditor id",
                expected: group.creditor.id.clone(),
                found: creditor_id.to_string(),
            });
        }
        if payment.date != date {
            return Err(ParseError::IdentityMismatch {
                line,
                level: Level::Payment,
                field: "date",
                expected: payment.date.format("%Y%m%d").to_string(),
                found: date.format("%Y%m%d").to_string(),
            });
        }

        self.reconcile(Level::Payment, declared, line)?;
        if let Some((_, payment)) = self.open_date_payment() {
            debug!(line, "closed {payment}");
        }
        self.payment = None;
        Ok(())
    }

    fn close_creditor(&mut self, creditor_id: &str, declared: Totals, line: usize) -> Result<(), ParseError> {
        self.ensure_document_open(line)?;
        if self.payment.is_some() {
            return Err(ParseError::UnclosedLevel {
                line,
                level: Level::Payment,
            });
        }
        let group = self
            .open_creditor()
            .ok_or(ParseError::NoOpenLevel { line, level: Level::Creditor })?;

        if group.creditor.id != creditor_id {
            return Err(ParseError::IdentityMismatch {
                line,
                level: Level::Creditor,
                field: "creditor id",
                expected: group.creditor.id.clone(),
                found: creditor_id.to_string(),
            });
        }

        self.reconcile(Level::Creditor, declared, line)?;
        if let Some(group) = self.open_creditor() {
            debug!(line, "closed {group}");
        }
        self.creditor = None;
        Ok(())
    }

    fn close_document(&mut self, declared: Totals, line: usize) -> Result<(), ParseError> {
        self.ensure_document_open(line)?;
        if self.payment.is_some() {
            return Err(ParseError::UnclosedLevel {
                line,
                level: Level::Payment,
            });
        }
        if self.creditor.is_some() {
            return Err(ParseError::UnclosedLevel {
                line,
                level: Level::Creditor,
            });
        }

        self.reconcile(Level::Document, declared, line)?;
        if let Some(document) = &self.document {
            info!(line, "{document}");
        }
        self.closed = true;
        Ok(())
    }

    /// Сверка итогов уровня с заявленными.
    ///
    /// Порядок: сумма, затем запись заявленной суммы поверх посчитанной,
    /// затем число дебетовых записей, затем учёт самой итоговой записи и число всех записей.
    fn reconcile(&mut self, level: Level, declared: Totals, line: usize) -> Result<(), ParseError> {
        let totals = self
            .totals_mut(level)
            .ok_or(ParseError::NoOpenLevel { line, level })?;

        if declared.amount.abs_diff(totals.amount) > AMOUNT_TOLERANCE {
            return Err(ParseError::AmountMismatch {
                line,
                level,
                declared: declared.amount,
                computed: totals.amount,
            });
        }
        totals.amount = declared.amount;

        if declared.debit_count != totals.debit_count {
            return Err(ParseError::CountMismatch {
                line,
                level,
                declared: declared.debit_count,
                computed: totals.debit_count,
            });
        }

        self.count_register();

        let computed = self
            .totals_mut(level)
            .map(|t| t.register_count)
            .unwrap_or_default();
        if declared.register_count != computed {
            return Err(ParseError::RegisterCountMismatch {
                line,
                level,
                declared: declared.register_count,
                computed,
            });
        }
        Ok(())
    }

    // ---- агрегаты ----

    /// Каждая запись любого типа учитывается на всех открытых уровнях
    fn count_register(&mut self) {
        for level in LEVELS {
            if let Some(totals) = self.totals_mut(level) {
                totals.register_count += 1;
            }
        }
    }

    fn totals_mut(&mut self, level: Level) -> Option<&mut Totals> {
        let document = self.document.as_mut()?;
        match level {
            Level::Document => Some(&mut document.totals),
            Level::Creditor => document
                .creditor_payments
                .get_mut(self.creditor?)
                .map(|group| &mut group.totals),
            Level::Payment => document
                .creditor_payments
                .get_mut(self.creditor?)?
                .date_payments
                .get_mut(self.payment?)
                .map(|payment| &mut payment.totals),
        }
    }

    fn ensure_document_open(&self, line: usize) -> Result<(), ParseError> {
        if self.document.is_none() || self.closed {
            return Err(ParseError::NoOpenLevel {
                line,
                level: Level::Document,
            });
        }
        Ok(())
    }

    fn document_mut(&mut self, line: usize) -> Result<&mut BatchDocument, ParseError> {
        self.document.as_mut().ok_or(ParseError::NoOpenLevel {
            line,
            level: Level::Document,
        })
    }

    fn open_creditor(&self) -> Option<&CreditorPayments> {
        self.document.as_ref()?.creditor_payments.get(self.creditor?)
    }

    fn open_date_payment(&self) -> Option<(&CreditorPayments, &DatePayment)> {
        let group = self.open_creditor()?;
        let payment = group.date_payments.get(self.payment?)?;
        Some((group, payment))
    }

    fn open_date_payment_mut(&mut self) -> Option<&mut DatePayment> {
        self.document
            .as_mut()?
            .creditor_payments
            .get_mut(self.creditor?)?
            .date_payments
            .get_mut(self.payment?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn party() -> Record {
        Record::InitiatingParty(InitiatingParty {
            id: "ES12000B12345678".into(),
            name: "ACME".into(),
            creation_date: date(2024, 1, 15),
            file_id: "F1".into(),
            entity: "2100".into(),
            office: "0001".into(),
        })
    }

    fn header(creditor_id: &str, day: u32) -> Record {
        Record::PaymentHeader {
            creditor: Creditor {
                id: creditor_id.into(),
                name: format!("NAME {creditor_id}"),
                address: Default::default(),
                country: "ES".into(),
                account: "ES9121000418450200051332".into(),
            },
            date: date(2024, 2, day),
        }
    }

    fn tx(id: &str, amount: Amount) -> Record {
        Record::Transaction(DebitTransaction {
            id: id.into(),
            mandate_id: format!("M-{id}"),
            sequence: "RCUR".into(),
            category_code: "SUPP".into(),
            amount,
            date: date(2023, 10, 1),
            debtor: crate::model::Debtor {
                entity: String::new(),
                name: "DEBTOR".into(),
                address: Default::default(),
                country: "ES".into(),
                id_type: String::new(),
                id: String::new(),
                id_issuer: String::new(),
                account_id_type: "A".into(),
                account: "ES7921000813610123456789".into(),
            },
            purpose: String::new(),
            concept: "CONCEPT".into(),
        })
    }

    fn totals(amount: Amount, debit_count: usize, register_count: usize) -> Totals {
        Totals {
            amount,
            debit_count,
            register_count,
        }
    }

    fn payment_totals(creditor_id: &str, day: u32, declared: Totals) -> Record {
        Record::PaymentTotals {
            creditor_id: creditor_id.into(),
            date: date(2024, 2, day),
            declared,
        }
    }

    fn creditor_totals(creditor_id: &str, declared: Totals) -> Record {
        Record::CreditorTotals {
            creditor_id: creditor_id.into(),
            declared,
        }
    }

    fn run(records: Vec<Record>) -> Result<BatchDocument, ParseError> {
        let mut ctx = ParseContext::default();
        for (idx, record) in records.into_iter().enumerate() {
            ctx.apply(record, idx + 1)?;
        }
        ctx.finish()
    }

    #[test]
    fn aggregates_three_levels_at_once() {
        let doc = run(vec![
            party(),
            header("C1", 1),
            tx("T1", 1000),
            tx("T2", 1500),
            payment_totals("C1", 1, totals(2500, 2, 4)),
            creditor_totals("C1", totals(2500, 2, 5)),
            Record::DocumentTotals { declared: totals(2500, 2, 7) },
        ])
        .unwrap();

        // 01 тоже входит в число записей документа
        assert_eq!(doc.totals, totals(2500, 2, 7));
        assert_eq!(doc.creditor_payments.len(), 1);
        let group = &doc.creditor_payments[0];
        assert_eq!(group.totals, totals(2500, 2, 5));
        assert_eq!(group.date_payments[0].totals, totals(2500, 2, 4));
        assert_eq!(group.date_payments[0].transactions.len(), 2);
    }

    #[test]
    fn reuses_open_creditor_group_for_next_date() {
        let doc = run(vec![
            party(),
            header("C1", 1),
            tx("T1", 1000),
            payment_totals("C1", 1, totals(1000, 1, 3)),
            header("C1", 15),
            tx("T2", 200),
            tx("T3", 300),
            payment_totals("C1", 15, totals(500, 2, 4)),
            creditor_totals("C1", totals(1500, 3, 8)),
            header("C2", 1),
            tx("T4", 42),
            payment_totals("C2", 1, totals(42, 1, 3)),
            creditor_totals("C2", totals(42, 1, 4)),
            Record::DocumentTotals { declared: totals(1542, 4, 14) },
        ])
        .unwrap();

        assert_eq!(doc.creditor_payments.len(), 2);
        assert_eq!(doc.creditor_payments[0].date_payments.len(), 2);
        assert_eq!(doc.creditor_payments[0].date_payments[1].date, date(2024, 2, 15));
        assert_eq!(doc.creditor_payments[1].creditor.id, "C2");
        assert_eq!(doc.transactions().count(), 4);
    }

    #[test]
    fn tolerates_one_cent_and_keeps_declared_amount() {
        let doc = run(vec![
            party(),
            header("C1", 1),
            tx("T1", 1000),
            payment_totals("C1", 1, totals(1001, 1, 3)),
            creditor_totals("C1", totals(1001, 1, 4)),
            Record::DocumentTotals { declared: totals(999, 1, 6) },
        ])
        .unwrap();

        assert_eq!(doc.creditor_payments[0].date_payments[0].totals.amount, 1001);
        assert_eq!(doc.creditor_payments[0].totals.amount, 1001);
        assert_eq!(doc.totals.amount, 999);
    }

    #[test]
    fn amount_beyond_tolerance_fails() {
        let err = run(vec![
            party(),
            header("C1", 1),
            tx("T1", 1000),
            payment_totals("C1", 1, totals(1002, 1, 3)),
        ])
        .unwrap_err();

        match err {
            ParseError::AmountMismatch { line, level, declared, computed } => {
                assert_eq!(line, 4);
                assert_eq!(level, Level::Payment);
                assert_eq!(declared, 1002);
                assert_eq!(computed, 1000);
            }
            other => panic!("expected AmountMismatch, got {other:?}"),
        }
    }

    #[test]
    fn debit_count_mismatch_fails() {
        let err = run(vec![
            party(),
            header("C1", 1),
            tx("T1", 1000),
            tx("T2", 1500),
            payment_totals("C1", 1, totals(2500, 3, 4)),
        ])
        .unwrap_err();

        assert!(matches!(
            err,
            ParseError::CountMismatch { level: Level::Payment, declared: 3, computed: 2, .. }
        ));
    }

    #[test]
    fn register_count_includes_totals_record() {
        let err = run(vec![
            party(),
            header("C1", 1),
            tx("T1", 1000),
            payment_totals("C1", 1, totals(1000, 1, 2)),
        ])
        .unwrap_err();

        assert!(matches!(
            err,
            ParseError::RegisterCountMismatch { level: Level::Payment, declared: 2, computed: 3, .. }
        ));
    }

    #[test]
    fn creditor_level_mismatch_is_reported_for_creditor() {
        let err = run(vec![
            party(),
            header("C1", 1),
            tx("T1", 1000),
            payment_totals("C1", 1, totals(1000, 1, 3)),
            creditor_totals("C1", totals(1000, 2, 4)),
        ])
        .unwrap_err();

        assert!(matches!(
            err,
            ParseError::CountMismatch { level: Level::Creditor, declared: 2, computed: 1, .. }
        ));
    }

    #[test]
    fn transaction_without_header_fails() {
        let err = run(vec![party(), tx("T1", 1000)]).unwrap_err();
        assert!(matches!(err, ParseError::NoOpenLevel { line: 2, level: Level::Payment }));

        let err = run(vec![tx("T1", 1000)]).unwrap_err();
        assert!(matches!(err, ParseError::NoOpenLevel { line: 1, level: Level::Document }));
    }

    #[test]
    fn transaction_after_payment_closed_fails() {
        let err = run(vec![
            party(),
            header("C1", 1),
            tx("T1", 1000),
            payment_totals("C1", 1, totals(1000, 1, 3)),
            tx("T2", 1000),
        ])
        .unwrap_err();

        assert!(matches!(err, ParseError::NoOpenLevel { line: 5, level: Level::Payment }));
    }

    #[test]
    fn totals_identity_must_match_open_level() {
        let err = run(vec![
            party(),
            header("C1", 1),
            tx("T1", 1000),
            payment_totals("C2", 1, totals(1000, 1, 3)),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            ParseError::IdentityMismatch { level: Level::Creditor, field: "creditor id", .. }
        ));

        let err = run(vec![
            party(),
            header("C1", 1),
            tx("T1", 1000),
            payment_totals("C1", 2, totals(1000, 1, 3)),
        ])
        .unwrap_err();
        match err {
            ParseError::IdentityMismatch { level, field, expected, found, .. } => {
                assert_eq!(level, Level::Payment);
                assert_eq!(field, "date");
                assert_eq!(expected, "20240201");
                assert_eq!(found, "20240202");
            }
            other => panic!("expected IdentityMismatch, got {other:?}"),
        }
    }

    #[test]
    fn header_for_other_creditor_while_group_open_fails() {
        let err = run(vec![
            party(),
            header("C1", 1),
            tx("T1", 1000),
            payment_totals("C1", 1, totals(1000, 1, 3)),
            header("C2", 1),
        ])
        .unwrap_err();

        assert!(matches!(
            err,
            ParseError::IdentityMismatch { line: 5, level: Level::Creditor, .. }
        ));
    }

    #[test]
    fn nested_levels_must_be_closed_first() {
        let err = run(vec![party(), header("C1", 1), header("C1", 2)]).unwrap_err();
        assert!(matches!(err, ParseError::UnclosedLevel { line: 3, level: Level::Payment }));

        let err = run(vec![
            party(),
            header("C1", 1),
            tx("T1", 1000),
            creditor_totals("C1", totals(1000, 1, 4)),
        ])
        .unwrap_err();
        assert!(matches!(err, ParseError::UnclosedLevel { level: Level::Payment, .. }));

        let err = run(vec![
            party(),
            header("C1", 1),
            tx("T1", 1000),
            payment_totals("C1", 1, totals(1000, 1, 3)),
            Record::DocumentTotals { declared: totals(1000, 1, 5) },
        ])
        .unwrap_err();
        assert!(matches!(err, ParseError::UnclosedLevel { level: Level::Creditor, .. }));
    }

    #[test]
    fn document_lifecycle_errors() {
        let err = run(vec![party(), party()]).unwrap_err();
        assert!(matches!(err, ParseError::DuplicateHeader { line: 2 }));

        let err = run(vec![party()]).unwrap_err();
        assert!(matches!(err, ParseError::MissingDocumentTotals));

        let err = run(vec![]).unwrap_err();
        assert!(matches!(err, ParseError::MissingDocumentTotals));

        let err = run(vec![
            party(),
            Record::DocumentTotals { declared: totals(0, 0, 2) },
            header("C1", 1),
        ])
        .unwrap_err();
        assert!(matches!(err, ParseError::NoOpenLevel { line: 3, level: Level::Document }));
    }

    #[test]
    fn empty_document_reconciles() {
        let doc = run(vec![
            party(),
            Record::DocumentTotals { declared: totals(0, 0, 2) },
        ])
        .unwrap();
        assert!(doc.creditor_payments.is_empty());
        assert_eq!(doc.totals, totals(0, 0, 2));
    }
}
