//! informelib — агрегация аренд автомобилей и выгрузка отчётов (PDF, CSV)

pub mod aggregate;
pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod format;
pub mod model;
pub mod reports;
pub mod traits;
pub mod view;

pub mod formats {
    pub mod csv;
    pub mod json;
    pub mod pdf;
}
