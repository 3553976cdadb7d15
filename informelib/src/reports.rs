//! Готовые отчёты: из агрегатов в `ReportDocument`.
//!
//! Итоги в блоке `summary` считаются здесь же, из тех строк, что попали в
//! таблицу, поэтому отчёт после фильтра согласован сам с собой.

use crate::{
    aggregate::{client_totals, period_totals, saturating_sum},
    document::{build_document, ReportDocument, SummaryItem},
    format::{format_date, format_period, CurrencyFormat},
    model::{ClientSummary, MonthlyBilling, PeriodSummary, RentalRecord, VehicleRanking},
};
use chrono::{NaiveDate, NaiveDateTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Clients,
    Periods,
    Vehicles,
    Rentals,
    MonthlyBilling,
}

impl ReportKind {
    pub fn title(self) -> &'static str {
        match self {
            ReportKind::Clients => "Facturación por cliente",
            ReportKind::Periods => "Alquileres por período",
            ReportKind::Vehicles => "Vehículos más alquilados",
            ReportKind::Rentals => "Detalle de alquileres",
            ReportKind::MonthlyBilling => "Facturación mensual",
        }
    }

    /// Префикс имени файла выгрузки.
    pub fn file_prefix(self) -> &'static str {
        match self {
            ReportKind::Clients => "reporte-clientes",
            ReportKind::Periods => "reporte-periodos",
            ReportKind::Vehicles => "reporte-vehiculos",
            ReportKind::Rentals => "reporte-alquileres",
            ReportKind::MonthlyBilling => "facturacion-mensual",
        }
    }
}

/// Общие параметры оформления отчёта.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub currency: CurrencyFormat,
    pub subtitle: String,
    pub generated_at: NaiveDateTime,
}

impl ReportContext {
    pub fn new(currency: CurrencyFormat, generated_at: NaiveDateTime) -> Self {
        Self { currency, subtitle: range_subtitle(None, None), generated_at }
    }

    pub fn with_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.subtitle = range_subtitle(from, to);
        self
    }

    fn document(&self, kind: ReportKind, columns: &[&str], rows: Vec<Vec<String>>, summary: Vec<SummaryItem>) -> ReportDocument {
        build_document(
            kind.title(),
            self.subtitle.clone(),
            columns.iter().map(|c| c.to_string()).collect(),
            rows,
            Some(summary),
            self.generated_at,
        )
    }
}

pub fn range_subtitle(from: Option<NaiveDate>, to: Option<NaiveDate>) -> String {
    let fmt = |d: NaiveDate| d.format("%d/%m/%Y").to_string();
    match (from, to) {
        (Some(f), Some(t)) => format!("Período: {} - {}", fmt(f), fmt(t)),
        (Some(f), None) => format!("Desde {}", fmt(f)),
        (None, Some(t)) => format!("Hasta {}", fmt(t)),
        (None, None) => "Todos los registros".to_string(),
    }
}

pub fn client_report<'a, I>(summaries: I, ctx: &ReportContext) -> ReportDocument
where
    I: IntoIterator<Item = &'a ClientSummary>,
{
    let summaries: Vec<ClientSummary> = summaries.into_iter().cloned().collect();
    let cur = &ctx.currency;
    let rows = summaries
        .iter()
        .map(|s| {
            vec![
                s.dni.clone(),
                s.full_name(),
                s.rentals.to_string(),
                cur.total(s.total_rentals),
                cur.total(s.total_penalties),
                cur.total(s.grand_total()),
            ]
        })
        .collect();

    let (rentals, penalties, grand) = client_totals(&summaries);
    let count: u64 = summaries.iter().map(|s| s.rentals).fold(0, u64::saturating_add);
    ctx.document(
        ReportKind::Clients,
        &["DNI", "Cliente", "Alquileres", "Total alquileres", "Total sanciones", "Total"],
        rows,
        vec![
            SummaryItem::new("Clientes", summaries.len().to_string()),
            SummaryItem::new("Alquileres", count.to_string()),
            SummaryItem::new("Total alquileres", cur.total(rentals)),
            SummaryItem::new("Total sanciones", cur.total(penalties)),
            SummaryItem::new("Total general", cur.total(grand)),
        ],
    )
}

pub fn period_report<'a, I>(summaries: I, ctx: &ReportContext) -> ReportDocument
where
    I: IntoIterator<Item = &'a PeriodSummary>,
{
    let summaries: Vec<PeriodSummary> = summaries.into_iter().cloned().collect();
    let cur = &ctx.currency;
    let rows = summaries
        .iter()
        .map(|s| {
            vec![
                format_period(&s.period),
                s.rentals.to_string(),
                cur.total(s.total_rentals),
                cur.total(s.total_penalties),
                cur.total(s.grand_total()),
            ]
        })
        .collect();

    let (rentals, penalties, grand) = period_totals(&summaries);
    let count: u64 = summaries.iter().map(|s| s.rentals).fold(0, u64::saturating_add);
    ctx.document(
        ReportKind::Periods,
        &["Período", "Alquileres", "Total alquileres", "Total sanciones", "Total"],
        rows,
        vec![
            SummaryItem::new("Períodos", summaries.len().to_string()),
            SummaryItem::new("Alquileres", count.to_string()),
            SummaryItem::new("Total alquileres", cur.total(rentals)),
            SummaryItem::new("Total sanciones", cur.total(penalties)),
            SummaryItem::new("Total general", cur.total(grand)),
        ],
    )
}

pub fn vehicle_report<'a, I>(ranking: I, ctx: &ReportContext) -> ReportDocument
where
    I: IntoIterator<Item = &'a VehicleRanking>,
{
    let ranking: Vec<&VehicleRanking> = ranking.into_iter().collect();
    let rows = ranking
        .iter()
        .enumerate()
        .map(|(i, v)| {
            vec![
                (i + 1).to_string(),
                v.plate.clone(),
                v.make.clone().unwrap_or_default(),
                v.model.clone().unwrap_or_default(),
                v.year.map(|y| y.to_string()).unwrap_or_default(),
                v.rentals.to_string(),
            ]
        })
        .collect();

    let count: u64 = ranking.iter().map(|v| v.rentals).fold(0, u64::saturating_add);
    ctx.document(
        ReportKind::Vehicles,
        &["#", "Patente", "Marca", "Modelo", "Año", "Alquileres"],
        rows,
        vec![
            SummaryItem::new("Vehículos", ranking.len().to_string()),
            SummaryItem::new("Alquileres", count.to_string()),
        ],
    )
}

/// Построчный отчёт: суммы с копейками, итоги без.
pub fn rental_report<'a, I>(records: I, ctx: &ReportContext) -> ReportDocument
where
    I: IntoIterator<Item = &'a RentalRecord>,
{
    let records: Vec<&RentalRecord> = records.into_iter().collect();
    let cur = &ctx.currency;
    let rows = records
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.client_dni().unwrap_or("-").to_string(),
                r.plate().unwrap_or("-").to_string(),
                format_date(&r.start_date),
                format_date(&r.end_date),
                cur.amount(r.base_price),
                cur.amount(r.penalty_total()),
                cur.amount(r.total()),
            ]
        })
        .collect();

    let prices = saturating_sum(records.iter().map(|r| r.base_price));
    let penalties = saturating_sum(records.iter().map(|r| r.penalty_total()));
    ctx.document(
        ReportKind::Rentals,
        &["ID", "DNI", "Patente", "Inicio", "Fin", "Precio", "Sanciones", "Total"],
        rows,
        vec![
            SummaryItem::new("Alquileres", records.len().to_string()),
            SummaryItem::new("Total precios", cur.total(prices)),
            SummaryItem::new("Total sanciones", cur.total(penalties)),
            SummaryItem::new("Total general", cur.total(prices.saturating_add(penalties))),
        ],
    )
}

pub fn monthly_billing_report<'a, I>(rows: I, ctx: &ReportContext) -> ReportDocument
where
    I: IntoIterator<Item = &'a MonthlyBilling>,
{
    let billing: Vec<&MonthlyBilling> = rows.into_iter().collect();
    let cur = &ctx.currency;
    let table = billing
        .iter()
        .map(|b| {
            vec![
                b.month.clone(),
                b.rentals.to_string(),
                cur.total(b.rental_income),
                cur.total(b.penalty_income),
                cur.total(b.total()),
            ]
        })
        .collect();

    let income = saturating_sum(billing.iter().map(|b| b.rental_income));
    let penalties = saturating_sum(billing.iter().map(|b| b.penalty_income));
    ctx.document(
        ReportKind::MonthlyBilling,
        &["Mes", "Alquileres", "Ingresos alquileres", "Ingresos sanciones", "Total"],
        table,
        vec![
            SummaryItem::new("Meses", billing.len().to_string()),
            SummaryItem::new("Total facturado", cur.total(income.saturating_add(penalties))),
        ],
    )
}
