//! Настройки: встроенные значения по умолчанию, файл пользователя, переменные окружения.
//!
//! Приоритет (по возрастанию): `default-config.toml` → `informe.toml` (или
//! путь из `--config`) → `INFORME_*` (вложенность через `__`,
//! например `INFORME_BACKEND__BASE_URL`).

use crate::{
    aggregate::AggregateOptions,
    document::PageLayout,
    error::{InformeError, Result},
    format::CurrencyFormat,
    model::Granularity,
};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG: &str = include_str!("../default-config.toml");
pub const LOCAL_CONFIG: &str = "informe.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl BackendSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSettings {
    pub rows_per_page: usize,
    pub product_label: String,
    pub granularity: Granularity,
    pub include_penalties: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub backend: BackendSettings,
    pub locale: CurrencyFormat,
    pub report: ReportSettings,
}

impl Settings {
    pub fn load(custom: Option<&Path>) -> Result<Self> {
        let figment = Self::defaults().merge(match custom {
            Some(path) => Toml::file(path),
            None => Toml::file(LOCAL_CONFIG),
        });
        Self::from_figment(figment.merge(Env::prefixed("INFORME_").split("__")))
    }

    /// Только встроенные значения.
    pub fn defaults() -> Figment {
        Figment::new().merge(Toml::string(DEFAULT_CONFIG))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let settings: Settings = figment.extract()?;
        if settings.report.rows_per_page == 0 {
            return Err(InformeError::Parse("report.rows_per_page must be at least 1".into()));
        }
        Ok(settings)
    }

    pub fn layout(&self) -> PageLayout {
        PageLayout {
            rows_per_page: self.report.rows_per_page,
            product_label: self.report.product_label.clone(),
        }
    }

    pub fn aggregate_options(&self) -> AggregateOptions {
        AggregateOptions {
            period_granularity: self.report.granularity,
            include_penalties_in_totals: self.report.include_penalties,
        }
    }
}
