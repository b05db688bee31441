
/// Форматирует целочисленную сумму ("центы") в человекочитаемый формат
pub(crate) fn format_minor_units<T>(value: T, decimal_separator: char) -> String
where
    T: Into<i128>,
{
    let v: i128 = value.into();
    let v = v.unsigned_abs();
    let units = v / 100;
    let frac = v % 100;

    format!("{units}{decimal_separator}{frac:02}")
}

/// Приводит свободный текст к набору символов SEPA:
/// буквы с диакритикой заменяются базовыми, всё вне печатного ASCII выбрасывается.
pub(crate) fn sanitize_sepa_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());

    for c in raw.chars() {
        if let Some(base) = fold_diacritic(c) {
            out.push_str(base);
        } else if (' '..='~').contains(&c) {
            out.push(c);
        }
    }

    out
}

/// Латиница из ISO-8859-1 без диакритики
fn fold_diacritic(c: char) -> Option<&'static str> {
    let base = match c {
        'À'..='Å' => "A",
        'Æ' => "AE",
        'Ç' => "C",
        'È'..='Ë' => "E",
        'Ì'..='Ï' => "I",
        'Ñ' => "N",
        'Ò'..='Ö' | 'Ø' => "O",
        'Ù'..='Ü' => "U",
        'Ý' => "Y",
        'ß' => "ss",
        'à'..='å' => "a",
        'æ' => "ae",
        'ç' => "c",
        'è'..='ë' => "e",
        'ì'..='ï' => "i",
        'ñ' => "n",
        'ò'..='ö' | 'ø' => "o",
        'ù'..='ü' => "u",
        'ý' | 'ÿ' => "y",
        _ => return None,
    };
    Some(base)
}
