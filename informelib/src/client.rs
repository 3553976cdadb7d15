//! HTTP-клиент к отчётным эндпоинтам бэкенда.

use crate::{
    config::BackendSettings,
    error::{InformeError, Result},
    formats::json,
    model::{Granularity, MonthlyBilling, PeriodSummary, RentalRecord, VehicleRanking},
};
use chrono::NaiveDate;
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Rentals,
    TopVehicles,
    RentalsByPeriod,
    MonthlyBilling,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Rentals => "/reportes/alquileres",
            Endpoint::TopVehicles => "/reportes/vehiculos-mas-alquilados",
            Endpoint::RentalsByPeriod => "/reportes/alquileres-por-periodo",
            Endpoint::MonthlyBilling => "/reportes/facturacion-mensual",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<usize>,
    pub granularity: Option<Granularity>,
}

impl ReportQuery {
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        if let Some(d) = self.from {
            out.push(("desde", d.format("%Y-%m-%d").to_string()));
        }
        if let Some(d) = self.to {
            out.push(("hasta", d.format("%Y-%m-%d").to_string()));
        }
        if let Some(n) = self.limit {
            out.push(("limite", n.to_string()));
        }
        if let Some(g) = self.granularity {
            out.push(("periodicidad", g.as_query().to_string()));
        }
        out
    }
}

pub fn endpoint_url(base_url: &str, endpoint: Endpoint, query: &ReportQuery) -> Result<Url> {
    let raw = format!("{}{}", base_url.trim_end_matches('/'), endpoint.path());
    let pairs = query.pairs();
    let url = if pairs.is_empty() {
        Url::parse(&raw)
    } else {
        Url::parse_with_params(&raw, pairs)
    };
    url.map_err(|e| InformeError::Parse(format!("backend url {raw}: {e}")))
}

pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(timeout)
            .build()?;
        Ok(Self { http, base_url: base_url.into() })
    }

    pub fn from_settings(settings: &BackendSettings) -> Result<Self> {
        Self::new(settings.base_url.clone(), settings.timeout())
    }

    async fn get_list<T: DeserializeOwned>(&self, endpoint: Endpoint, query: &ReportQuery) -> Result<Vec<T>> {
        let url = endpoint_url(&self.base_url, endpoint, query)?;
        info!(%url, "fetching report data");

        let resp = self.http.get(url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(InformeError::Status { status: status.as_u16(), url: url.to_string() });
        }
        let body = resp.bytes().await?;
        json::read_records(&body[..])
    }

    pub async fn rentals(&self, query: &ReportQuery) -> Result<Vec<RentalRecord>> {
        self.get_list(Endpoint::Rentals, query).await
    }

    pub async fn top_vehicles(&self, query: &ReportQuery) -> Result<Vec<VehicleRanking>> {
        self.get_list(Endpoint::TopVehicles, query).await
    }

    pub async fn rentals_by_period(&self, query: &ReportQuery) -> Result<Vec<PeriodSummary>> {
        self.get_list(Endpoint::RentalsByPeriod, query).await
    }

    pub async fn monthly_billing(&self, query: &ReportQuery) -> Result<Vec<MonthlyBilling>> {
        self.get_list(Endpoint::MonthlyBilling, query).await
    }
}
