//! Единый тип ошибок публичного API.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InformeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend responded {status} for {url}")]
    Status { status: u16, url: String },

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Config error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<figment::Error> for InformeError {
    fn from(e: figment::Error) -> Self {
        InformeError::Config(Box::new(e))
    }
}

pub type Result<T> = std::result::Result<T, InformeError>;
