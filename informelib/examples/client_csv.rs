use informelib::{
    aggregate::{summarize_by_client, AggregateOptions},
    document::PageLayout,
    format::CurrencyFormat,
    formats::{csv::Csv, json},
    model::RentalRecord,
    reports::{client_report, ReportContext},
    traits::RenderFormat,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Пример: аренды JSON (stdin) -> сводка по клиентам CSV (stdout)
    let records: Vec<RentalRecord> = json::read_records(std::io::BufReader::new(std::io::stdin()))?;
    let summaries = summarize_by_client(&records, &AggregateOptions::default());
    let ctx = ReportContext::new(CurrencyFormat::default(), chrono::Local::now().naive_local());
    Csv::render(std::io::stdout(), &client_report(&summaries, &ctx), &PageLayout::default())?;
    Ok(())
}
