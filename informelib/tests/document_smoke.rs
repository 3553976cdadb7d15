use chrono::{NaiveDate, NaiveDateTime};
use informelib::document::{build_document, report_file_name, PageLayout, SummaryItem};

fn generated() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_hms_opt(14, 30, 0).unwrap()
}

fn rows(n: usize) -> Vec<Vec<String>> {
    (0..n).map(|i| vec![i.to_string(), format!("fila {i}")]).collect()
}

#[test]
fn rows_are_split_and_summary_lands_on_last_page() {
    let doc = build_document(
        "Facturación por cliente",
        "Todos los registros",
        vec!["ID".into(), "Texto".into()],
        rows(65),
        Some(vec![SummaryItem::new("Total general", "$ 100")]),
        generated(),
    );
    let layout = PageLayout { rows_per_page: 30, product_label: "Alquileres".into() };
    let pages = doc.paginate(&layout);

    assert_eq!(pages.len(), 3);
    let sizes: Vec<usize> = pages.iter().map(|p| p.rows.len()).collect();
    assert_eq!(sizes, [30, 30, 5]);
    assert_eq!(pages[2].rows[4][0], "64");

    for p in &pages {
        assert_eq!(p.header.title, "Facturación por cliente");
        assert_eq!(p.header.subtitle, "Todos los registros");
        assert_eq!(p.header.generated, "05/03/2024 14:30");
        assert_eq!(p.total, 3);
        assert_eq!(p.columns.len(), 2);
    }
    assert_eq!(pages[0].footer, "Página 1 de 3 - Alquileres");
    assert_eq!(pages[2].footer, "Página 3 de 3 - Alquileres");

    assert!(pages[0].summary.is_none());
    assert!(pages[1].summary.is_none());
    assert_eq!(pages[2].summary.unwrap()[0].value, "$ 100");
}

#[test]
fn full_last_page_moves_rows_to_make_room_for_summary() {
    let summary: Vec<SummaryItem> = (0..3).map(|i| SummaryItem::new(format!("Total {i}"), "$ 1")).collect();
    let doc = build_document("T", "", vec!["ID".into(), "Texto".into()], rows(30), Some(summary), generated());
    assert_eq!(doc.summary_lines(), 5);

    let pages = doc.paginate(&PageLayout { rows_per_page: 30, ..PageLayout::default() });
    let sizes: Vec<usize> = pages.iter().map(|p| p.rows.len()).collect();
    assert_eq!(sizes, [5, 25]);
    assert_eq!(pages[1].rows[0][0], "5");
    assert!(pages[0].summary.is_none());
    assert_eq!(pages[1].summary.map(|s| s.len()), Some(3));
    assert_eq!(pages[1].footer, "Página 2 de 2 - Sistema de Alquiler de Vehículos");
}

#[test]
fn empty_table_still_has_one_page() {
    let doc = build_document("T", "", vec!["A".into()], Vec::new(), None, generated());
    let pages = doc.paginate(&PageLayout::default());
    assert_eq!(pages.len(), 1);
    assert!(pages[0].rows.is_empty());
    assert!(pages[0].summary.is_none());
    assert!(doc.is_empty());
}

#[test]
fn exact_page_fill_does_not_add_blank_page() {
    let doc = build_document("T", "", vec!["A".into()], rows(60), None, generated());
    let layout = PageLayout { rows_per_page: 30, ..PageLayout::default() };
    assert_eq!(doc.paginate(&layout).len(), 2);
}

#[test]
fn empty_summary_is_dropped() {
    let doc = build_document("T", "", vec!["A".into()], rows(1), Some(Vec::new()), generated());
    assert!(doc.summary.is_none());
}

#[test]
fn file_name_uses_prefix_and_iso_date() {
    let d = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    assert_eq!(report_file_name("reporte-clientes", d), "reporte-clientes-2024-03-05.pdf");
}
