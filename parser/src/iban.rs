use once_cell::sync::Lazy;
use regex::Regex;

static IBAN_RE: Lazy<Regex> = Lazy::new(|| {
    // ^[A-Z]{2} - 2 буквы страны
    // \d{2} - контрольные цифры
    // [A-Z0-9]{11,30} - BBAN
    Regex::new(r"^[A-Z]{2}\d{2}[A-Z0-9]{11,30}$").unwrap()
});

/// Приводит IBAN к каноническому виду: без пробелов, в верхнем регистре
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// Проверка формы и контрольной суммы IBAN (ISO 13616, mod 97 == 1)
pub fn is_valid(raw: &str) -> bool {
    let iban = normalize(raw);
    if !IBAN_RE.is_match(&iban) {
        return false;
    }

    // первые 4 символа переносятся в конец, буквы заменяются на 10..35;
    // остаток считаем по ходу, чтобы не держать большое число
    let (head, tail) = iban.split_at(4);
    let mut remainder: u32 = 0;
    for c in tail.chars().chain(head.chars()) {
        let Some(value) = c.to_digit(36) else {
            return false;
        };
        remainder = if value < 10 {
            (remainder * 10 + value) % 97
        } else {
            (remainder * 100 + value) % 97
        };
    }

    remainder == 1
}
