use std::ops::Range;
use chrono::NaiveDate;

use crate::error::ParseError;
use crate::model::Amount;

/// Строка файла фиксированной ширины вместе с её номером.
///
/// Позиции считаются в символах, а не в байтах: декодирование уже сделано.
/// Колонки за концом строки читаются как пробелы.
#[derive(Debug, Clone)]
pub(crate) struct FixedLine {
    chars: Vec<char>,
    number: usize,
}

impl FixedLine {
    pub(crate) fn new(raw: &str, number: usize) -> Self {
        let line = raw.trim_end_matches(['\r', '\n']);
        FixedLine {
            chars: line.chars().collect(),
            number,
        }
    }

    /// номер строки, с единицы
    pub(crate) fn number(&self) -> usize {
        self.number
    }

    pub(crate) fn is_blank(&self) -> bool {
        self.chars.iter().all(|c| c.is_whitespace())
    }

    /// Подстрока по колонкам [start, end) с обрезанными пробелами
    pub(crate) fn text(&self, range: Range<usize>) -> String {
        let end = range.end.min(self.chars.len());
        let start = range.start.min(end);

        self.chars[start..end]
            .iter()
            .collect::<String>()
            .trim()
            .to_string()
    }

    pub(crate) fn date(&self, range: Range<usize>, field: &'static str) -> Result<NaiveDate, ParseError> {
        let value = self.text(range);
        parse_yyyymmdd(&value).ok_or(ParseError::MalformedDate {
            line: self.number,
            field,
            value,
        })
    }

    /// Сумма в "центах": только цифры, без знака и разделителей
    pub(crate) fn money(&self, range: Range<usize>, field: &'static str) -> Result<Amount, ParseError> {
        let value = self.text(range);
        parse_digits(&value).ok_or(ParseError::MalformedAmount {
            line: self.number,
            field,
            value,
        })
    }

    pub(crate) fn count(&self, range: Range<usize>, field: &'static str) -> Result<usize, ParseError> {
        let value = self.text(range);
        parse_digits(&value)
            .and_then(|n| usize::try_from(n).ok())
            .ok_or(ParseError::MalformedCount {
                line: self.number,
                field,
                value,
            })
    }
}

/// Ровно 8 цифр YYYYMMDD, образующих существующую дату
pub(crate) fn parse_yyyymmdd(s: &str) -> Option<NaiveDate> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    // s - чистый ASCII, срезы по байтам безопасны
    let year: i32 = s[0..4].parse().ok()?;
    let month: u32 = s[4..6].parse().ok()?;
    let day: u32 = s[6..8].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Непустая строка цифр как u64 (`str::parse` сам по себе пропустил бы знак '+')
pub(crate) fn parse_digits(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// ISO-8859-1: каждый байт - это кодовая точка с тем же номером
pub(crate) fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}
