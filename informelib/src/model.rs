//! Доменные модели — записи аренд с бэкенда и производные сводки.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientRef {
    #[serde(default, deserialize_with = "lenient::string")]
    pub dni: String,
    #[serde(default, rename = "nombre", alias = "name")]
    pub name: Option<String>,
    #[serde(default, rename = "apellido", alias = "surname")]
    pub surname: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VehicleRef {
    #[serde(default, rename = "patente", alias = "plate", deserialize_with = "lenient::string")]
    pub plate: String,
    #[serde(default, rename = "marca", alias = "make")]
    pub make: Option<String>,
    #[serde(default, rename = "modelo", alias = "model")]
    pub model: Option<String>,
    #[serde(default, rename = "anio", alias = "year", deserialize_with = "lenient::opt_int")]
    pub year: Option<i32>,
}

/// Санкция (штраф), привязанная к аренде.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PenaltyRecord {
    #[serde(default, deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(default, rename = "descripcion", alias = "description", deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default, rename = "monto", alias = "amount", deserialize_with = "lenient::decimal")]
    pub amount: Decimal,
    #[serde(default, rename = "codigo", alias = "category")]
    pub category: Option<String>,
}

/// Аренда в том виде, в каком её отдаёт бэкенд.
///
/// Даты остаются строками ISO-8601: некорректная дата не должна ломать
/// загрузку всего списка.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RentalRecord {
    #[serde(default, deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(default, rename = "cliente", alias = "client")]
    pub client: Option<ClientRef>,
    #[serde(default, rename = "vehiculo", alias = "vehicle")]
    pub vehicle: Option<VehicleRef>,
    #[serde(default, rename = "fecha_inicio", alias = "fechaInicio", deserialize_with = "lenient::string")]
    pub start_date: String,
    #[serde(default, rename = "fecha_fin", alias = "fechaFin", deserialize_with = "lenient::string")]
    pub end_date: String,
    #[serde(default, rename = "precio", alias = "precioBase", deserialize_with = "lenient::decimal")]
    pub base_price: Decimal,
    #[serde(default, rename = "sanciones", alias = "penalties")]
    pub penalties: Vec<PenaltyRecord>,
}

impl RentalRecord {
    pub fn client_dni(&self) -> Option<&str> {
        self.client.as_ref().map(|c| c.dni.as_str()).filter(|d| !d.is_empty())
    }

    pub fn plate(&self) -> Option<&str> {
        self.vehicle.as_ref().map(|v| v.plate.as_str()).filter(|p| !p.is_empty())
    }

    pub fn penalty_total(&self) -> Decimal {
        self.penalties.iter().map(|p| p.amount).fold(Decimal::ZERO, Decimal::saturating_add)
    }

    pub fn total(&self) -> Decimal {
        self.base_price.saturating_add(self.penalty_total())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Granularity {
    #[default]
    #[serde(rename = "mensual", alias = "month")]
    Month,
    #[serde(rename = "trimestral", alias = "quarter")]
    Quarter,
}

impl Granularity {
    /// Значение параметра `periodicidad` для бэкенда.
    pub fn as_query(self) -> &'static str {
        match self {
            Granularity::Month => "mensual",
            Granularity::Quarter => "trimestral",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClientSummary {
    pub dni: String,
    pub name: String,
    pub surname: String,
    pub rentals: u64,
    pub total_rentals: Decimal,
    pub total_penalties: Decimal,
}

impl ClientSummary {
    pub fn grand_total(&self) -> Decimal {
        self.total_rentals.saturating_add(self.total_penalties)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname).trim().to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeriodSummary {
    /// `YYYY-MM` или `YYYY-Qn`.
    #[serde(rename = "periodo", alias = "period")]
    pub period: String,
    #[serde(default, rename = "cantidad", alias = "rentals", deserialize_with = "lenient::count")]
    pub rentals: u64,
    #[serde(default, rename = "total_alquileres", alias = "totalRentals", deserialize_with = "lenient::decimal")]
    pub total_rentals: Decimal,
    #[serde(default, rename = "total_sanciones", alias = "totalPenalties", deserialize_with = "lenient::decimal")]
    pub total_penalties: Decimal,
}

impl PeriodSummary {
    pub fn grand_total(&self) -> Decimal {
        self.total_rentals.saturating_add(self.total_penalties)
    }

    /// Та же строка с обнулёнными санкциями.
    pub fn without_penalties(self) -> Self {
        PeriodSummary { total_penalties: Decimal::ZERO, ..self }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VehicleRanking {
    #[serde(default, rename = "patente", alias = "plate", deserialize_with = "lenient::string")]
    pub plate: String,
    #[serde(default, rename = "marca", alias = "make")]
    pub make: Option<String>,
    #[serde(default, rename = "modelo", alias = "model")]
    pub model: Option<String>,
    #[serde(default, rename = "anio", alias = "year", deserialize_with = "lenient::opt_int")]
    pub year: Option<i32>,
    #[serde(default, rename = "cantidad", alias = "rentals", deserialize_with = "lenient::count")]
    pub rentals: u64,
}

/// Строка `/reportes/facturacion-mensual`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyBilling {
    #[serde(rename = "mes", alias = "month")]
    pub month: String,
    #[serde(default, rename = "cantidad", alias = "rentals", deserialize_with = "lenient::count")]
    pub rentals: u64,
    #[serde(default, rename = "ingresos_alquileres", alias = "rentalIncome", deserialize_with = "lenient::decimal")]
    pub rental_income: Decimal,
    #[serde(default, rename = "ingresos_sanciones", alias = "penaltyIncome", deserialize_with = "lenient::decimal")]
    pub penalty_income: Decimal,
}

impl MonthlyBilling {
    pub fn total(&self) -> Decimal {
        self.rental_income.saturating_add(self.penalty_income)
    }

    pub fn without_penalties(self) -> Self {
        MonthlyBilling { penalty_income: Decimal::ZERO, ..self }
    }
}

/// Снисходительный разбор полей: кривые деньги и целые становятся нулём
/// (год — `None`), `null` в строке становится пустой строкой.
pub(crate) mod lenient {
    use rust_decimal::prelude::FromPrimitive;
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use std::str::FromStr;

    pub fn decimal<'de, D>(d: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Option::<Value>::deserialize(d)?;
        Ok(v.as_ref().map(value_to_decimal).unwrap_or_default())
    }

    pub fn int<'de, D>(d: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Option::<Value>::deserialize(d)?;
        Ok(v.as_ref().and_then(value_to_int).unwrap_or_default())
    }

    pub fn opt_int<'de, D>(d: D) -> Result<Option<i32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Option::<Value>::deserialize(d)?;
        Ok(v.as_ref().and_then(value_to_int).and_then(|n| i32::try_from(n).ok()))
    }

    pub fn count<'de, D>(d: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Option::<Value>::deserialize(d)?;
        Ok(v.as_ref()
            .and_then(value_to_int)
            .and_then(|n| u64::try_from(n).ok())
            .unwrap_or_default())
    }

    pub fn string<'de, D>(d: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Option::<Value>::deserialize(d)?;
        Ok(match v {
            Some(Value::String(s)) => s,
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        })
    }

    pub(crate) fn value_to_decimal(v: &Value) -> Decimal {
        match v {
            Value::Number(n) => Decimal::from_str(&n.to_string())
                .ok()
                .or_else(|| n.as_f64().and_then(Decimal::from_f64))
                .unwrap_or_default(),
            Value::String(s) => Decimal::from_str(s.trim()).unwrap_or_default(),
            _ => Decimal::ZERO,
        }
    }

    fn value_to_int(v: &Value) -> Option<i64> {
        match v {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}
