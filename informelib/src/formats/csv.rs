//! CSV-выгрузка отчёта: строка заголовков, строки таблицы, затем пары итогов.

use crate::{
    document::{PageLayout, ReportDocument},
    error::Result,
};
use csv::WriterBuilder;
use std::io::Write;

pub struct Csv;

impl crate::traits::RenderFormat for Csv {
    fn render<W: Write>(mut w: W, doc: &ReportDocument, _layout: &PageLayout) -> Result<()> {
        // итоги короче строк таблицы
        let mut wrt = WriterBuilder::new().flexible(true).from_writer(&mut w);

        wrt.write_record(&doc.columns)?;
        for row in &doc.rows {
            wrt.write_record(row)?;
        }
        if let Some(summary) = &doc.summary {
            for item in summary {
                wrt.write_record([item.label.as_str(), item.value.as_str()])?;
            }
        }
        wrt.flush()?;
        Ok(())
    }
}
