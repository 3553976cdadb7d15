mod common;

use common::rental;
use informelib::{
    aggregate::{client_totals, rank_vehicles, summarize_by_client, summarize_by_period, AggregateOptions},
    format::CurrencyFormat,
    model::Granularity,
    reports::{client_report, rental_report, ReportContext},
};
use chrono::NaiveDate;
use std::str::FromStr;
use rust_decimal::Decimal;

#[test]
fn client_summary_matches_worked_example() {
    let records = vec![
        rental(1, Some("A"), Some("AA111AA"), "2024-01-05", 100, &[20]),
        rental(2, Some("A"), Some("AA111AA"), "2024-01-09", 50, &[]),
        rental(3, Some("B"), Some("BB222BB"), "2024-02-01", 200, &[]),
    ];
    let s = summarize_by_client(&records, &AggregateOptions::default());

    assert_eq!(s.len(), 2);
    assert_eq!(s[0].dni, "A");
    assert_eq!(s[0].rentals, 2);
    assert_eq!(s[0].total_rentals, Decimal::from(150));
    assert_eq!(s[0].total_penalties, Decimal::from(20));
    assert_eq!(s[0].grand_total(), Decimal::from(170));

    assert_eq!(s[1].dni, "B");
    assert_eq!(s[1].rentals, 1);
    assert_eq!(s[1].total_rentals, Decimal::from(200));
    assert_eq!(s[1].total_penalties, Decimal::ZERO);
    assert_eq!(s[1].grand_total(), Decimal::from(200));
}

#[test]
fn client_summary_keeps_first_appearance_order() {
    let records = vec![
        rental(1, Some("Z"), None, "2024-01-01", 10, &[]),
        rental(2, Some("A"), None, "2024-01-01", 10, &[]),
        rental(3, Some("Z"), None, "2024-01-01", 10, &[]),
        rental(4, Some("M"), None, "2024-01-01", 10, &[]),
    ];
    let s = summarize_by_client(&records, &AggregateOptions::default());
    let order: Vec<&str> = s.iter().map(|c| c.dni.as_str()).collect();
    assert_eq!(order, ["Z", "A", "M"]);
}

#[test]
fn penalties_can_be_left_out_of_totals() {
    let records = vec![rental(1, Some("A"), None, "2024-01-05", 100, &[20, 30])];
    let opts = AggregateOptions { include_penalties_in_totals: false, ..AggregateOptions::default() };

    let s = summarize_by_client(&records, &opts);
    assert_eq!(s[0].total_penalties, Decimal::ZERO);
    assert_eq!(s[0].grand_total(), Decimal::from(100));

    let p = summarize_by_period(&records, &opts);
    assert_eq!(p[0].total_penalties, Decimal::ZERO);
}

#[test]
fn rentals_without_client_are_excluded() {
    let records = vec![
        rental(1, None, Some("AA111AA"), "2024-01-05", 100, &[]),
        rental(2, Some(""), Some("AA111AA"), "2024-01-05", 100, &[]),
        rental(3, Some("A"), Some("AA111AA"), "2024-01-05", 40, &[]),
    ];
    let s = summarize_by_client(&records, &AggregateOptions::default());
    assert_eq!(s.len(), 1);
    assert_eq!(s[0].total_rentals, Decimal::from(40));
}

#[test]
fn monthly_buckets_are_chronological() {
    let records = vec![
        rental(1, Some("A"), None, "2024-10-01", 10, &[]),
        rental(2, Some("A"), None, "2024-09-30", 20, &[5]),
        rental(3, Some("B"), None, "2023-12-31", 30, &[]),
        rental(4, Some("B"), None, "2024-10-15T09:00:00", 40, &[]),
    ];
    let p = summarize_by_period(&records, &AggregateOptions::default());
    let labels: Vec<&str> = p.iter().map(|s| s.period.as_str()).collect();
    assert_eq!(labels, ["2023-12", "2024-09", "2024-10"]);
    assert_eq!(p[2].rentals, 2);
    assert_eq!(p[2].total_rentals, Decimal::from(50));
    assert_eq!(p[1].grand_total(), Decimal::from(25));
}

#[test]
fn quarterly_buckets() {
    let records = vec![
        rental(1, Some("A"), None, "2024-02-15", 10, &[]),
        rental(2, Some("A"), None, "2024-04-01", 10, &[]),
        rental(3, Some("A"), None, "2023-12-31", 10, &[]),
        rental(4, Some("A"), None, "2024-03-31", 10, &[]),
    ];
    let opts = AggregateOptions { period_granularity: Granularity::Quarter, ..AggregateOptions::default() };
    let p = summarize_by_period(&records, &opts);
    let labels: Vec<(&str, u64)> = p.iter().map(|s| (s.period.as_str(), s.rentals)).collect();
    assert_eq!(labels, [("2023-Q4", 1), ("2024-Q1", 2), ("2024-Q2", 1)]);
}

#[test]
fn unparseable_start_date_is_skipped() {
    let records = vec![
        rental(1, Some("A"), None, "not-a-date", 10, &[]),
        rental(2, Some("A"), None, "2024-01-01", 10, &[]),
    ];
    let p = summarize_by_period(&records, &AggregateOptions::default());
    assert_eq!(p.len(), 1);
    assert_eq!(p[0].rentals, 1);
}

#[test]
fn vehicle_ranking_breaks_ties_by_plate() {
    let mut records = Vec::new();
    for (i, plate) in ["BBB", "ZZZ", "AAA", "ZZZ", "CCC", "BBB", "AAA", "ZZZ"].iter().enumerate() {
        records.push(rental(i as i64, Some("A"), Some(*plate), "2024-01-01", 10, &[]));
    }
    records.push(rental(99, Some("A"), None, "2024-01-01", 10, &[]));

    let r = rank_vehicles(&records, None);
    let got: Vec<(&str, u64)> = r.iter().map(|v| (v.plate.as_str(), v.rentals)).collect();
    assert_eq!(got, [("ZZZ", 3), ("AAA", 2), ("BBB", 2), ("CCC", 1)]);
    assert_eq!(r[0].make.as_deref(), Some("Fiat"));

    let top = rank_vehicles(&records, Some(2));
    assert_eq!(top.len(), 2);
    assert_eq!(top[1].plate, "AAA");

    assert_eq!(rank_vehicles(&records, Some(10)).len(), 4);
}

#[test]
fn empty_input_gives_empty_summaries() {
    let opts = AggregateOptions::default();
    assert!(summarize_by_client(&[], &opts).is_empty());
    assert!(summarize_by_period(&[], &opts).is_empty());
    assert!(rank_vehicles(&[], Some(5)).is_empty());
}

#[test]
fn huge_amounts_saturate_instead_of_overflowing() {
    let mut big = rental(1, Some("A"), Some("AA111AA"), "2024-01-05", 0, &[]);
    big.base_price = Decimal::from_str("79228162514264337593543950335").unwrap();
    let one = rental(2, Some("A"), Some("AA111AA"), "2024-01-06", 1, &[]);
    let mut fine = rental(3, Some("A"), None, "2024-01-07", 0, &[1]);
    fine.penalties[0].amount = Decimal::MAX;
    let records = vec![big, one, fine];

    let opts = AggregateOptions::default();
    let clients = summarize_by_client(&records, &opts);
    assert_eq!(clients[0].total_rentals, Decimal::MAX);
    assert_eq!(clients[0].total_penalties, Decimal::MAX);
    assert_eq!(clients[0].grand_total(), Decimal::MAX);
    assert_eq!(client_totals(&clients).2, Decimal::MAX);

    let periods = summarize_by_period(&records, &opts);
    assert_eq!(periods[0].grand_total(), Decimal::MAX);

    let at = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_hms_opt(9, 0, 0).unwrap();
    let ctx = ReportContext::new(CurrencyFormat::default(), at);
    let doc = client_report(&clients, &ctx);
    assert_eq!(doc.rows.len(), 1);
    let detail = rental_report(&records, &ctx);
    assert_eq!(detail.rows.len(), 3);
}
