//! PDF через printpdf: A4, встроенная Helvetica, шапка и подвал на каждой
//! странице, блок итогов под последней строкой последней страницы.
//!
//! Ячейки не обрезаются: ширины колонок считаются по содержимому, а если
//! таблица не помещается в ширину листа, уменьшается кегль.

use crate::{
    document::{Page, PageLayout, ReportDocument},
    error::{InformeError, Result},
};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use std::io::Write;
use tracing::{debug, warn};

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 14.0;
const ROW_STEP: f32 = 6.5;
const BODY_SIZE: f32 = 9.0;
const MIN_BODY_SIZE: f32 = 5.0;
/// Средняя ширина символа Helvetica в мм на пункт кегля.
const CHAR_EM: f32 = 0.2;
const COL_GAP: f32 = 2.0;
const FOOTER_Y: f32 = MARGIN - 4.0;
/// Базовая линия заголовков колонок при шапке с подзаголовком.
const TABLE_TOP: f32 = PAGE_H - MARGIN - 4.0 - 6.0 - 6.0 - 10.0;

/// Ширина листа между полями, мм.
pub const TABLE_WIDTH: f32 = PAGE_W - 2.0 * MARGIN;

/// Сколько строк таблицы помещается между шапкой и подвалом.
pub fn max_rows_per_page() -> usize {
    ((TABLE_TOP - FOOTER_Y - ROW_STEP) / ROW_STEP + 1e-3).floor() as usize
}

/// Раскладка, у которой число строк на странице не больше, чем влезает на A4.
pub fn fit_layout(layout: &PageLayout) -> PageLayout {
    let max = max_rows_per_page();
    if layout.rows_per_page <= max {
        return layout.clone();
    }
    warn!(requested = layout.rows_per_page, max, "rows_per_page exceeds the page height, clamped");
    PageLayout { rows_per_page: max, ..layout.clone() }
}

/// Ширины колонок в мм и кегль таблицы.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnPlan {
    pub widths: Vec<f32>,
    pub font_size: f32,
}

impl ColumnPlan {
    /// Каждой колонке достаётся место под её самую длинную ячейку (или
    /// заголовок); остаток ширины делится пропорционально.
    pub fn for_table(columns: &[String], rows: &[Vec<String>]) -> Self {
        let chars: Vec<usize> = columns
            .iter()
            .enumerate()
            .map(|(i, head)| {
                rows.iter()
                    .filter_map(|r| r.get(i))
                    .map(|c| c.chars().count())
                    .chain(std::iter::once(head.chars().count()))
                    .max()
                    .unwrap_or(0)
                    .max(1)
            })
            .collect();

        let total_chars: usize = chars.iter().sum();
        let gaps = COL_GAP * chars.len() as f32;
        let font_size = ((TABLE_WIDTH - gaps) / (total_chars.max(1) as f32 * CHAR_EM)).clamp(MIN_BODY_SIZE, BODY_SIZE);

        let needed: Vec<f32> = chars.iter().map(|&c| c as f32 * CHAR_EM * font_size + COL_GAP).collect();
        let sum: f32 = needed.iter().sum();
        let scale = if sum > 0.0 && sum < TABLE_WIDTH { TABLE_WIDTH / sum } else { 1.0 };

        Self {
            widths: needed.into_iter().map(|w| w * scale).collect(),
            font_size,
        }
    }

    pub fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * CHAR_EM * self.font_size
    }

    /// Помещается ли текст в колонку вместе с отступом до следующей.
    pub fn fits(&self, column: usize, text: &str) -> bool {
        self.widths
            .get(column)
            .is_some_and(|w| self.text_width(text) + COL_GAP <= *w + 1e-3)
    }

    pub fn total_width(&self) -> f32 {
        self.widths.iter().sum()
    }

    fn x(&self, column: usize) -> f32 {
        MARGIN + self.widths[..column].iter().sum::<f32>()
    }
}

pub struct Pdf;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

fn pdf_err(e: printpdf::Error) -> InformeError {
    InformeError::Pdf(e.to_string())
}

impl crate::traits::RenderFormat for Pdf {
    fn render<W: Write>(mut w: W, doc: &ReportDocument, layout: &PageLayout) -> Result<()> {
        let layout = fit_layout(layout);
        let pages = doc.paginate(&layout);
        let plan = ColumnPlan::for_table(&doc.columns, &doc.rows);
        let (pdf, first_page, first_layer) =
            PdfDocument::new(doc.title.as_str(), Mm(PAGE_W), Mm(PAGE_H), "Capa 1");
        let fonts = Fonts {
            regular: pdf.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?,
            bold: pdf.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_err)?,
        };

        for page in &pages {
            let layer = if page.number == 1 {
                pdf.get_page(first_page).get_layer(first_layer)
            } else {
                let (p, l) = pdf.add_page(Mm(PAGE_W), Mm(PAGE_H), format!("Capa {}", page.number));
                pdf.get_page(p).get_layer(l)
            };
            draw_page(&layer, page, &plan, &fonts);
        }

        let bytes = pdf.save_to_bytes().map_err(pdf_err)?;
        debug!(pages = pages.len(), bytes = bytes.len(), font_size = plan.font_size, "pdf rendered");
        w.write_all(&bytes)?;
        Ok(())
    }
}

fn draw_page(layer: &PdfLayerReference, page: &Page<'_>, plan: &ColumnPlan, fonts: &Fonts) {
    let mut y = PAGE_H - MARGIN - 4.0;
    layer.use_text(page.header.title, 16.0, Mm(MARGIN), Mm(y), &fonts.bold);
    y -= 6.0;
    layer.use_text(
        format!("Generado: {}", page.header.generated),
        8.0,
        Mm(MARGIN),
        Mm(y),
        &fonts.regular,
    );
    if !page.header.subtitle.is_empty() {
        y -= 6.0;
        layer.use_text(page.header.subtitle, 11.0, Mm(MARGIN), Mm(y), &fonts.regular);
    }

    let cols = plan.widths.len();
    y -= 10.0;
    for (i, c) in page.columns.iter().enumerate() {
        layer.use_text(c.as_str(), plan.font_size, Mm(plan.x(i)), Mm(y), &fonts.bold);
    }

    for row in page.rows {
        y -= ROW_STEP;
        for (i, cell) in row.iter().enumerate().take(cols) {
            layer.use_text(cell.as_str(), plan.font_size, Mm(plan.x(i)), Mm(y), &fonts.regular);
        }
    }

    if let Some(summary) = page.summary {
        y -= ROW_STEP * 1.5;
        for item in summary {
            layer.use_text(format!("{}:", item.label), 10.0, Mm(MARGIN), Mm(y), &fonts.bold);
            layer.use_text(item.value.as_str(), 10.0, Mm(MARGIN + 60.0), Mm(y), &fonts.regular);
            y -= ROW_STEP;
        }
    }

    layer.use_text(page.footer.as_str(), 8.0, Mm(MARGIN), Mm(FOOTER_Y), &fonts.regular);
}
