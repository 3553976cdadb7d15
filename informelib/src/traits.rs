//! Унифицированные трэйты: доступ к полям для представлений и запись документов.

use crate::{
    document::{PageLayout, ReportDocument},
    error::Result,
};
use rust_decimal::Decimal;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::io::Write;

/// Значение поля записи, как его видят фильтр и сортировка.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Number(Decimal),
    /// ISO-дата: сравнивается как строка.
    Date(Cow<'a, str>),
    Text(Cow<'a, str>),
}

impl FieldValue<'_> {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Number(_) => None,
            FieldValue::Date(s) | FieldValue::Text(s) => Some(&**s),
        }
    }

    pub fn compare(&self, other: &FieldValue<'_>) -> Ordering {
        match (self, other) {
            (FieldValue::Number(a), FieldValue::Number(b)) => a.cmp(b),
            (FieldValue::Date(a), FieldValue::Date(b)) | (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

pub trait Viewable {
    type Field: Copy + PartialEq + std::fmt::Debug;

    fn field(&self, field: Self::Field) -> FieldValue<'_>;
}

pub trait RenderFormat {
    fn render<W: Write>(w: W, doc: &ReportDocument, layout: &PageLayout) -> Result<()>;
}
