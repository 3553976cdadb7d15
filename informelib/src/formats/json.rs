//! Загрузка списков записей из JSON (ответ бэкенда или локальный файл).
//!
//! Принимается голый массив или объект с массивом в `data`. Кривые числа
//! внутри записи разбираются снисходительно (см. `model::lenient`); целиком
//! пропускается с предупреждением только то, что вообще не похоже на запись.

use crate::error::{InformeError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::io::Read;
use tracing::warn;

pub fn read_records<T: DeserializeOwned, R: Read>(r: R) -> Result<Vec<T>> {
    let root: Value = serde_json::from_reader(r)?;
    records_from_value(root)
}

pub fn records_from_value<T: DeserializeOwned>(root: Value) -> Result<Vec<T>> {
    let items = match root {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => return Err(InformeError::Parse("expected array or {\"data\": [...]}".into())),
        },
        _ => return Err(InformeError::Parse("expected array or {\"data\": [...]}".into())),
    };

    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<T>(item) {
            Ok(v) => out.push(v),
            Err(e) => warn!(index = i, error = %e, "skipping malformed record"),
        }
    }
    Ok(out)
}
