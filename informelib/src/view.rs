//! Фильтрация и сортировка списков для таблиц и отчётов.
//!
//! `apply_view` ничего не меняет во входном срезе и возвращает ссылки
//! в новом порядке. Сортировка стабильная.

use crate::{
    format::parse_date,
    model::{ClientSummary, RentalRecord, VehicleRanking},
    traits::{FieldValue, Viewable},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentalField {
    Id,
    Client,
    Plate,
    StartDate,
    EndDate,
    BasePrice,
    Penalties,
    Total,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientField {
    Dni,
    Name,
    Rentals,
    TotalRentals,
    TotalPenalties,
    GrandTotal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleField {
    Plate,
    Make,
    Model,
    Rentals,
}

impl Viewable for RentalRecord {
    type Field = RentalField;

    fn field(&self, field: RentalField) -> FieldValue<'_> {
        match field {
            RentalField::Id => FieldValue::Number(Decimal::from(self.id)),
            RentalField::Client => FieldValue::Text(Cow::Borrowed(self.client_dni().unwrap_or(""))),
            RentalField::Plate => FieldValue::Text(Cow::Borrowed(self.plate().unwrap_or(""))),
            RentalField::StartDate => FieldValue::Date(Cow::Borrowed(&self.start_date)),
            RentalField::EndDate => FieldValue::Date(Cow::Borrowed(&self.end_date)),
            RentalField::BasePrice => FieldValue::Number(self.base_price),
            RentalField::Penalties => FieldValue::Number(self.penalty_total()),
            RentalField::Total => FieldValue::Number(self.total()),
        }
    }
}

impl Viewable for ClientSummary {
    type Field = ClientField;

    fn field(&self, field: ClientField) -> FieldValue<'_> {
        match field {
            ClientField::Dni => FieldValue::Text(Cow::Borrowed(&self.dni)),
            ClientField::Name => FieldValue::Text(Cow::Owned(self.full_name())),
            ClientField::Rentals => FieldValue::Number(Decimal::from(self.rentals)),
            ClientField::TotalRentals => FieldValue::Number(self.total_rentals),
            ClientField::TotalPenalties => FieldValue::Number(self.total_penalties),
            ClientField::GrandTotal => FieldValue::Number(self.grand_total()),
        }
    }
}

impl Viewable for VehicleRanking {
    type Field = VehicleField;

    fn field(&self, field: VehicleField) -> FieldValue<'_> {
        match field {
            VehicleField::Plate => FieldValue::Text(Cow::Borrowed(&self.plate)),
            VehicleField::Make => FieldValue::Text(Cow::Borrowed(self.make.as_deref().unwrap_or(""))),
            VehicleField::Model => FieldValue::Text(Cow::Borrowed(self.model.as_deref().unwrap_or(""))),
            VehicleField::Rentals => FieldValue::Number(Decimal::from(self.rentals)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn toggled(self) -> Self {
        match self {
            Direction::Asc => Direction::Desc,
            Direction::Desc => Direction::Asc,
        }
    }
}

/// Активная сортировка таблицы. Передаётся по значению.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState<F> {
    pub field: F,
    pub direction: Direction,
}

impl<F: Copy + PartialEq> SortState<F> {
    pub fn new(field: F) -> Self {
        Self { field, direction: Direction::Asc }
    }

    /// Клик по заголовку: тот же столбец меняет направление, другой — сбрасывает на `Asc`.
    pub fn select(self, field: F) -> Self {
        if self.field == field {
            Self { field, direction: self.direction.toggled() }
        } else {
            Self::new(field)
        }
    }

    pub fn select_from(prev: Option<Self>, field: F) -> Self {
        match prev {
            Some(s) => s.select(field),
            None => Self::new(field),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFilter<F> {
    pub field: F,
    pub needle: String,
}

/// Границы включительные, любая может отсутствовать.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange<F> {
    pub field: F,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewFilter<F> {
    pub text: Option<TextFilter<F>>,
    pub dates: Option<DateRange<F>>,
}

impl<F> Default for ViewFilter<F> {
    fn default() -> Self {
        Self { text: None, dates: None }
    }
}

impl<F: Copy> ViewFilter<F> {
    pub fn with_text(mut self, field: F, needle: impl Into<String>) -> Self {
        self.text = Some(TextFilter { field, needle: needle.into() });
        self
    }

    pub fn with_dates(mut self, field: F, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.dates = Some(DateRange { field, from, to });
        self
    }

    pub fn matches<T: Viewable<Field = F>>(&self, record: &T) -> bool {
        if let Some(t) = &self.text {
            let needle = t.needle.trim().to_lowercase();
            if !needle.is_empty() {
                let value = record.field(t.field);
                let hit = value
                    .as_str()
                    .is_some_and(|s| s.to_lowercase().contains(&needle));
                if !hit {
                    return false;
                }
            }
        }

        if let Some(r) = &self.dates {
            if r.from.is_none() && r.to.is_none() {
                return true;
            }
            let value = record.field(r.field);
            let Some(date) = value.as_str().and_then(parse_date) else {
                return false;
            };
            if r.from.is_some_and(|from| date < from) || r.to.is_some_and(|to| date > to) {
                return false;
            }
        }
        true
    }
}

pub fn apply_view<'a, T: Viewable>(
    records: &'a [T],
    filter: &ViewFilter<T::Field>,
    sort: Option<&SortState<T::Field>>,
) -> Vec<&'a T> {
    let mut out: Vec<&T> = records.iter().filter(|r| filter.matches(*r)).collect();

    if let Some(s) = sort {
        out.sort_by(|a, b| {
            let ord = a.field(s.field).compare(&b.field(s.field));
            match s.direction {
                Direction::Asc => ord,
                Direction::Desc => ord.reverse(),
            }
        });
    }
    out
}
