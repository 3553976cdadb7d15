use chrono::NaiveDate;
use informelib::format::{
    format_amount, format_currency, format_date, format_period, format_timestamp, format_total, CurrencyFormat,
};
use rust_decimal::Decimal;

#[test]
fn totals_have_no_decimals_and_dot_grouping() {
    assert_eq!(format_total(Decimal::new(12345, 1)), "$ 1.235");
    assert_eq!(format_total(Decimal::from(1_500_000)), "$ 1.500.000");
    assert_eq!(format_total(Decimal::ZERO), "$ 0");
    assert_eq!(format_total(Decimal::from(-1500)), "-$ 1.500");
}

#[test]
fn itemized_amounts_have_two_decimals() {
    assert_eq!(format_amount(Decimal::new(12345, 1)), "$ 1.234,50");
    assert_eq!(format_amount(Decimal::new(1_234_567_891, 3)), "$ 1.234.567,89");
    assert_eq!(format_amount(Decimal::from(7)), "$ 7,00");
    assert_eq!(format_currency(Decimal::new(5, 3), 2), "$ 0,01");
}

#[test]
fn custom_currency_format() {
    let usd = CurrencyFormat { symbol: "US$".into(), thousands_separator: ',', decimal_separator: '.' };
    assert_eq!(usd.amount(Decimal::new(123456, 2)), "US$ 1,234.56");
    assert_eq!(usd.total(Decimal::new(999, 0)), "US$ 999");
}

#[test]
fn dates_are_localized_or_passed_through() {
    assert_eq!(format_date("2024-03-01"), "01/03/2024");
    assert_eq!(format_date("2024-03-01T10:30:00"), "01/03/2024");
    assert_eq!(format_date("2024-03-01T10:30:00Z"), "01/03/2024");
    assert_eq!(format_date("not-a-date"), "not-a-date");
    assert_eq!(format_date(""), "");
}

#[test]
fn quarter_codes_get_labels() {
    assert_eq!(format_period("2024-Q1"), "2024 - Trimestre 1");
    assert_eq!(format_period("2023-Q4"), "2023 - Trimestre 4");
    assert_eq!(format_period("2024-03"), "2024-03");
    assert_eq!(format_period("2024-Q5"), "2024-Q5");
}

#[test]
fn timestamp_format() {
    let ts = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_hms_opt(14, 30, 0).unwrap();
    assert_eq!(format_timestamp(ts), "05/03/2024 14:30");
}
