//! Агрегация аренд: сводки по клиентам, по периодам и рейтинг машин.
//!
//! Всё пересчитывается с нуля на каждый вызов; состояния нет.

use crate::{
    format::parse_date,
    model::{ClientSummary, Granularity, PeriodSummary, RentalRecord, VehicleRanking},
};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateOptions {
    pub period_granularity: Granularity,
    pub include_penalties_in_totals: bool,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            period_granularity: Granularity::Month,
            include_penalties_in_totals: true,
        }
    }
}

impl AggregateOptions {
    fn penalties_of(&self, r: &RentalRecord) -> Decimal {
        if self.include_penalties_in_totals {
            r.penalty_total()
        } else {
            Decimal::ZERO
        }
    }
}

/// Код периода для даты: `2024-03` или `2024-Q1`.
pub fn period_code(date: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Month => format!("{:04}-{:02}", date.year(), date.month()),
        Granularity::Quarter => format!("{:04}-Q{}", date.year(), (date.month() - 1) / 3 + 1),
    }
}

/// Группировка по DNI клиента в порядке первого появления.
pub fn summarize_by_client(records: &[RentalRecord], opts: &AggregateOptions) -> Vec<ClientSummary> {
    let mut out: Vec<ClientSummary> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut skipped = 0usize;

    for r in records {
        let (Some(dni), Some(client)) = (r.client_dni(), r.client.as_ref()) else {
            skipped += 1;
            continue;
        };

        let slot = *index.entry(dni).or_insert_with(|| {
            out.push(ClientSummary {
                dni: dni.to_string(),
                name: client.name.clone().unwrap_or_default(),
                surname: client.surname.clone().unwrap_or_default(),
                rentals: 0,
                total_rentals: Decimal::ZERO,
                total_penalties: Decimal::ZERO,
            });
            out.len() - 1
        });

        let s = &mut out[slot];
        s.rentals += 1;
        s.total_rentals = s.total_rentals.saturating_add(r.base_price);
        s.total_penalties = s.total_penalties.saturating_add(opts.penalties_of(r));
    }

    if skipped > 0 {
        warn!(skipped, "rentals without client excluded from client summary");
    }
    debug!(records = records.len(), clients = out.len(), "summarized by client");
    out
}

/// Корзины по дате начала; порядок — по возрастанию периода.
pub fn summarize_by_period(records: &[RentalRecord], opts: &AggregateOptions) -> Vec<PeriodSummary> {
    // `YYYY-MM` и `YYYY-Qn` с нулями впереди сортируются лексикографически
    let mut buckets: BTreeMap<String, PeriodSummary> = BTreeMap::new();

    for r in records {
        let Some(start) = parse_date(&r.start_date) else {
            warn!(id = r.id, start_date = %r.start_date, "unparseable start date, rental skipped");
            continue;
        };
        let code = period_code(start, opts.period_granularity);
        let s = buckets.entry(code).or_insert_with_key(|k| PeriodSummary {
            period: k.clone(),
            rentals: 0,
            total_rentals: Decimal::ZERO,
            total_penalties: Decimal::ZERO,
        });
        s.rentals += 1;
        s.total_rentals = s.total_rentals.saturating_add(r.base_price);
        s.total_penalties = s.total_penalties.saturating_add(opts.penalties_of(r));
    }

    debug!(records = records.len(), periods = buckets.len(), "summarized by period");
    buckets.into_values().collect()
}

/// Самые арендуемые машины: по убыванию числа аренд, при равенстве — по номеру.
pub fn rank_vehicles(records: &[RentalRecord], limit: Option<usize>) -> Vec<VehicleRanking> {
    let mut ranking: Vec<VehicleRanking> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for r in records {
        let (Some(plate), Some(v)) = (r.plate(), r.vehicle.as_ref()) else {
            continue;
        };
        let slot = *index.entry(plate).or_insert_with(|| {
            ranking.push(VehicleRanking {
                plate: plate.to_string(),
                make: v.make.clone(),
                model: v.model.clone(),
                year: v.year,
                rentals: 0,
            });
            ranking.len() - 1
        });
        ranking[slot].rentals += 1;
    }

    ranking.sort_by(|a, b| b.rentals.cmp(&a.rentals).then_with(|| a.plate.cmp(&b.plate)));
    if let Some(n) = limit {
        ranking.truncate(n);
    }
    ranking
}

/// Сумма, упирающаяся в границы `Decimal` вместо паники на переполнении.
pub fn saturating_sum<I: IntoIterator<Item = Decimal>>(amounts: I) -> Decimal {
    amounts.into_iter().fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Итоги по набору клиентских сводок: (аренды, санкции, всего).
pub fn client_totals(summaries: &[ClientSummary]) -> (Decimal, Decimal, Decimal) {
    let rentals = saturating_sum(summaries.iter().map(|s| s.total_rentals));
    let penalties = saturating_sum(summaries.iter().map(|s| s.total_penalties));
    (rentals, penalties, rentals.saturating_add(penalties))
}

pub fn period_totals(summaries: &[PeriodSummary]) -> (Decimal, Decimal, Decimal) {
    let rentals = saturating_sum(summaries.iter().map(|s| s.total_rentals));
    let penalties = saturating_sum(summaries.iter().map(|s| s.total_penalties));
    (rentals, penalties, rentals.saturating_add(penalties))
}
