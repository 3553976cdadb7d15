//! Табличный документ отчёта и его разбиение на страницы.
//!
//! Построитель не считает бизнес-итоги: он раскладывает уже
//! отформатированные строки по страницам с общей шапкой и подвалом.

use crate::format::format_timestamp;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryItem {
    pub label: String,
    pub value: String,
}

impl SummaryItem {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self { label: label.into(), value: value.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub title: String,
    pub subtitle: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub summary: Option<Vec<SummaryItem>>,
    pub generated_at: NaiveDateTime,
}

/// Раскладка страниц: сколько строк таблицы помещается и что писать в подвале.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLayout {
    pub rows_per_page: usize,
    pub product_label: String,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            rows_per_page: 30,
            product_label: "Sistema de Alquiler de Vehículos".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageHeader<'a> {
    pub title: &'a str,
    pub generated: String,
    pub subtitle: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a> {
    /// С единицы.
    pub number: usize,
    pub total: usize,
    pub header: PageHeader<'a>,
    pub columns: &'a [String],
    pub rows: &'a [Vec<String>],
    /// Только на последней странице.
    pub summary: Option<&'a [SummaryItem]>,
    pub footer: String,
}

pub fn build_document(
    title: impl Into<String>,
    subtitle: impl Into<String>,
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    summary: Option<Vec<SummaryItem>>,
    generated_at: NaiveDateTime,
) -> ReportDocument {
    ReportDocument {
        title: title.into(),
        subtitle: subtitle.into(),
        columns,
        rows,
        summary: summary.filter(|s| !s.is_empty()),
        generated_at,
    }
}

impl ReportDocument {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.summary.is_none()
    }

    /// Строк, которые занимает блок итогов: отступ плюс по строке на пункт.
    pub fn summary_lines(&self) -> usize {
        self.summary.as_ref().map_or(0, |s| s.len() + 2)
    }

    /// Страницы документа. Пустая таблица всё равно даёт одну страницу.
    ///
    /// На последней странице под итоги оставляется место: если хвост таблицы
    /// вместе с ними не влезает, его конец переносится на новую страницу.
    pub fn paginate(&self, layout: &PageLayout) -> Vec<Page<'_>> {
        let per_page = layout.rows_per_page.max(1);
        let mut chunks: Vec<&[Vec<String>]> = if self.rows.is_empty() {
            vec![&self.rows[..]]
        } else {
            self.rows.chunks(per_page).collect()
        };
        let last_capacity = per_page.saturating_sub(self.summary_lines()).max(1);
        if let Some(last) = chunks.pop() {
            if last.len() > last_capacity {
                let (head, tail) = last.split_at(last.len() - last_capacity);
                chunks.push(head);
                chunks.push(tail);
            } else {
                chunks.push(last);
            }
        }
        let total = chunks.len();
        let generated = format_timestamp(self.generated_at);

        chunks
            .into_iter()
            .enumerate()
            .map(|(i, rows)| {
                let number = i + 1;
                Page {
                    number,
                    total,
                    header: PageHeader {
                        title: &self.title,
                        generated: generated.clone(),
                        subtitle: &self.subtitle,
                    },
                    columns: &self.columns,
                    rows,
                    summary: if number == total { self.summary.as_deref() } else { None },
                    footer: format!("Página {number} de {total} - {}", layout.product_label),
                }
            })
            .collect()
    }
}

/// `<prefix>-<YYYY-MM-DD>.pdf`
pub fn report_file_name(prefix: &str, date: NaiveDate) -> String {
    export_file_name(prefix, date, "pdf")
}

pub fn export_file_name(prefix: &str, date: NaiveDate, extension: &str) -> String {
    format!("{prefix}-{}.{extension}", date.format("%Y-%m-%d"))
}
