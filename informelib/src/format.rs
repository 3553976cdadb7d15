//! Форматирование для отображения: валюта (es-AR), даты, метки периодов.
//!
//! Ни одна функция здесь не возвращает ошибку: то, что не удалось
//! разобрать, отдаётся как есть.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static QUARTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<year>\d{4})-Q(?P<q>[1-4])$").expect("quarter pattern"));

/// Параметры денежного формата. По умолчанию — песо, `$ 1.234,56`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub thousands_separator: char,
    pub decimal_separator: char,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "$".into(),
            thousands_separator: '.',
            decimal_separator: ',',
        }
    }
}

impl CurrencyFormat {
    pub fn format(&self, amount: Decimal, decimals: u32) -> String {
        let mut rounded = amount.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        rounded = rounded.abs();
        rounded.rescale(decimals);

        let plain = rounded.to_string();
        let (int_part, frac_part) = match plain.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (plain.as_str(), None),
        };

        let mut out = String::with_capacity(plain.len() + self.symbol.len() + 8);
        if negative {
            out.push('-');
        }
        out.push_str(&self.symbol);
        out.push(' ');
        out.push_str(&group_thousands(int_part, self.thousands_separator));
        if let Some(f) = frac_part {
            out.push(self.decimal_separator);
            out.push_str(f);
        }
        out
    }

    /// Итоговые суммы — без копеек.
    pub fn total(&self, amount: Decimal) -> String {
        self.format(amount, 0)
    }

    /// Построчные суммы — два знака.
    pub fn amount(&self, amount: Decimal) -> String {
        self.format(amount, 2)
    }
}

fn group_thousands(digits: &str, sep: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}

pub fn format_currency(amount: Decimal, decimals: u32) -> String {
    CurrencyFormat::default().format(amount, decimals)
}

pub fn format_total(amount: Decimal) -> String {
    CurrencyFormat::default().total(amount)
}

pub fn format_amount(amount: Decimal) -> String {
    CurrencyFormat::default().amount(amount)
}

/// Разбирает `YYYY-MM-DD` или дату-время, начинающуюся с такой даты.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let t = raw.trim();
    NaiveDate::parse_from_str(t, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(t).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(t, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

/// `2024-03-01` -> `01/03/2024`; некорректная строка возвращается без изменений.
pub fn format_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(d) => d.format("%d/%m/%Y").to_string(),
        None => raw.to_string(),
    }
}

/// `2024-Q1` -> `2024 - Trimestre 1`; остальное без изменений.
pub fn format_period(code: &str) -> String {
    match QUARTER_RE.captures(code) {
        Some(caps) => format!("{} - Trimestre {}", &caps["year"], &caps["q"]),
        None => code.to_string(),
    }
}

pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format("%d/%m/%Y %H:%M").to_string()
}
