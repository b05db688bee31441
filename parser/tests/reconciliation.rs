use aeb_parser::{Level, ParseError, Totals, parse};

const CREDITOR: &str = "ES76000B12345678";

/// Строка фиксированной ширины 600 из (колонка, значение)
fn fixed(fields: &[(usize, &str)]) -> String {
    let mut chars = vec![' '; 600];
    for (start, value) in fields {
        for (i, c) in value.chars().enumerate() {
            chars[start + i] = c;
        }
    }
    chars.into_iter().collect()
}

fn header_01() -> String {
    fixed(&[
        (0, "0119143001"),
        (10, "ES12000B12345678"),
        (45, "ACME SERVICIOS SL"),
        (115, "20240115"),
        (123, "PRE2024011512000012345"),
    ])
}

fn header_02(date: &str) -> String {
    fixed(&[
        (0, "0219143002"),
        (10, CREDITOR),
        (45, date),
        (53, "ACME SERVICIOS SL"),
        (263, "ES"),
        (265, "ES9121000418450200051332"),
    ])
}

fn debit_03(id: &str, cents: u64) -> String {
    fixed(&[
        (0, "0319143003"),
        (10, id),
        (45, "MANDATE"),
        (80, "RCUR"),
        (88, format!("{cents:011}").as_str()),
        (99, "20231001"),
        (118, "DEBTOR"),
        (403, "ES7921000813610123456789"),
        (441, "CONCEPT"),
    ])
}

fn totals_04(date: &str, cents: u64, debits: usize, registers: usize) -> String {
    fixed(&[
        (0, "04"),
        (2, CREDITOR),
        (37, date),
        (45, format!("{cents:017}").as_str()),
        (62, format!("{debits:08}").as_str()),
        (70, format!("{registers:010}").as_str()),
    ])
}

fn totals_05(cents: u64, debits: usize, registers: usize) -> String {
    fixed(&[
        (0, "05"),
        (2, CREDITOR),
        (37, format!("{cents:017}").as_str()),
        (54, format!("{debits:08}").as_str()),
        (62, format!("{registers:010}").as_str()),
    ])
}

fn totals_99(cents: u64, debits: usize, registers: usize) -> String {
    fixed(&[
        (0, "99"),
        (2, format!("{cents:017}").as_str()),
        (19, format!("{debits:08}").as_str()),
        (27, format!("{registers:010}").as_str()),
    ])
}

/// Документ: 01, 02, 03 (10.00), 03 (15.00), 04, 05, 99.
/// Запись 99 считает все семь записей, включая 01 и саму себя.
fn valid_lines() -> Vec<String> {
    vec![
        header_01(),
        header_02("20240201"),
        debit_03("TX-1", 1000),
        debit_03("TX-2", 1500),
        totals_04("20240201", 2500, 2, 4),
        totals_05(2500, 2, 5),
        totals_99(2500, 2, 7),
    ]
}

#[test]
fn two_transactions_reconcile_at_every_level() {
    let doc = parse(valid_lines()).expect("valid document should parse");

    assert_eq!(
        doc.totals,
        Totals {
            amount: 2500,
            debit_count: 2,
            register_count: 7
        },
        "document totals should equal record 99"
    );
    assert_eq!(
        doc.creditor_payments[0].totals,
        Totals {
            amount: 2500,
            debit_count: 2,
            register_count: 5
        }
    );

    let payment = &doc.creditor_payments[0].date_payments[0];
    assert_eq!(payment.transactions.len(), 2);
    assert_eq!(payment.transactions[0].amount, 1000);
    assert_eq!(payment.transactions[1].amount, 1500);
}

#[test]
fn payment_totals_declaring_three_debits_fail() {
    let mut lines = valid_lines();
    lines[4] = totals_04("20240201", 2500, 3, 4);

    match parse(lines).unwrap_err() {
        ParseError::CountMismatch { line, level, declared, computed } => {
            assert_eq!(line, 5);
            assert_eq!(level, Level::Payment);
            assert_eq!(declared, 3);
            assert_eq!(computed, 2);
        }
        other => panic!("expected CountMismatch, got {other:?}"),
    }
}

#[test]
fn debit_before_any_header_fails() {
    let lines = vec![debit_03("TX-1", 1000)];
    let err = parse(lines).unwrap_err();
    assert!(
        matches!(err, ParseError::NoOpenLevel { line: 1, .. }),
        "expected NoOpenLevel, got {err:?}"
    );

    let lines = vec![header_01(), debit_03("TX-1", 1000)];
    let err = parse(lines).unwrap_err();
    assert!(
        matches!(err, ParseError::NoOpenLevel { line: 2, level: Level::Payment }),
        "expected NoOpenLevel for payment, got {err:?}"
    );
}

#[test]
fn altered_detail_amount_fails() {
    // 15.00 -> 15.02: расхождение больше цента
    let mut lines = valid_lines();
    lines[3] = debit_03("TX-2", 1502);

    let err = parse(lines).unwrap_err();
    assert!(
        matches!(
            err,
            ParseError::AmountMismatch { line: 5, level: Level::Payment, declared: 2500, computed: 2502 }
        ),
        "expected AmountMismatch, got {err:?}"
    );
}

#[test]
fn one_cent_difference_is_tolerated_and_declared_amount_kept() {
    let mut lines = valid_lines();
    lines[3] = debit_03("TX-2", 1501);

    let doc = parse(lines).expect("one cent difference is within tolerance");
    assert_eq!(doc.creditor_payments[0].date_payments[0].totals.amount, 2500);
    assert_eq!(doc.creditor_payments[0].totals.amount, 2500);
    assert_eq!(doc.totals.amount, 2500);
    assert_eq!(doc.transactions().map(|tx| tx.amount).sum::<u64>(), 2501);
}

#[test]
fn register_count_mismatch_fails_at_document_level() {
    let mut lines = valid_lines();
    lines[6] = totals_99(2500, 2, 8);

    let err = parse(lines).unwrap_err();
    assert!(
        matches!(
            err,
            ParseError::RegisterCountMismatch { level: Level::Document, declared: 8, computed: 7, .. }
        ),
        "expected RegisterCountMismatch, got {err:?}"
    );
}

#[test]
fn moving_debit_after_its_totals_fails() {
    let mut lines = valid_lines();
    let moved = lines.remove(3);
    lines.insert(4, moved);

    // 04 теперь видит одну запись 03 вместо двух
    let err = parse(lines).unwrap_err();
    assert!(
        matches!(err, ParseError::AmountMismatch { .. }),
        "expected AmountMismatch, got {err:?}"
    );
}

#[test]
fn totals_with_other_date_fail() {
    let mut lines = valid_lines();
    lines[4] = totals_04("20240202", 2500, 2, 4);

    let err = parse(lines).unwrap_err();
    assert!(
        matches!(err, ParseError::IdentityMismatch { level: Level::Payment, field: "date", .. }),
        "expected IdentityMismatch, got {err:?}"
    );
}

#[test]
fn unknown_records_and_blank_lines_are_skipped_and_not_counted() {
    let mut lines = valid_lines();
    lines.insert(3, fixed(&[(0, "0619143006"), (10, "OPTIONAL DATA")]));
    lines.insert(1, String::new());

    let doc = parse(lines).expect("unknown record types must be skipped");
    assert_eq!(doc.totals.register_count, 7);
    assert_eq!(doc.creditor_payments[0].date_payments[0].totals.register_count, 4);
    assert_eq!(doc.transactions().count(), 2);
}

#[test]
fn wrong_sub_type_fails() {
    let mut lines = valid_lines();
    lines[2] = lines[2].replacen("0319143003", "0319143009", 1);

    let err = parse(lines).unwrap_err();
    assert!(
        matches!(err, ParseError::UnexpectedSubType { line: 3, code: "03", .. }),
        "expected UnexpectedSubType, got {err:?}"
    );
}

#[test]
fn malformed_header_date_is_fatal() {
    let mut lines = valid_lines();
    lines[1] = header_02("2024021");

    let err = parse(lines).unwrap_err();
    assert!(
        matches!(err, ParseError::MalformedDate { line: 2, field: "collection date", .. }),
        "expected MalformedDate, got {err:?}"
    );
}

#[test]
fn trailing_padding_may_be_stripped() {
    let lines: Vec<String> = valid_lines()
        .into_iter()
        .map(|l| l.trim_end().to_string())
        .collect();

    let doc = parse(lines).expect("lines without trailing spaces should still parse");
    assert_eq!(doc.totals, parse(valid_lines()).unwrap().totals);
    assert_eq!(doc.transactions().next().unwrap().concept, "CONCEPT");
}
