use chrono::{Local, NaiveDate};
use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use informelib::{
    aggregate::{rank_vehicles, summarize_by_client, summarize_by_period, AggregateOptions},
    client::{BackendClient, ReportQuery},
    config::Settings,
    document::{export_file_name, ReportDocument},
    error::{InformeError, Result},
    formats::{csv::Csv, json, pdf::Pdf},
    model::{Granularity, MonthlyBilling, PeriodSummary, RentalRecord},
    reports::{self, ReportContext, ReportKind},
    traits::RenderFormat,
    view::{apply_view, ClientField, RentalField, SortState, ViewFilter},
};
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Informe {
    Clientes,
    Periodos,
    Vehiculos,
    Detalle,
    Facturacion,
}

impl Informe {
    fn kind(self) -> ReportKind {
        match self {
            Informe::Clientes => ReportKind::Clients,
            Informe::Periodos => ReportKind::Periods,
            Informe::Vehiculos => ReportKind::Vehicles,
            Informe::Detalle => ReportKind::Rentals,
            Informe::Facturacion => ReportKind::MonthlyBilling,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Fmt {
    Pdf,
    Csv,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Periodicidad {
    Mensual,
    Trimestral,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Orden {
    Id,
    Cliente,
    Patente,
    Inicio,
    Fin,
    Precio,
    Sanciones,
    Total,
}

impl Orden {
    fn rental_field(self) -> RentalField {
        match self {
            Orden::Id => RentalField::Id,
            Orden::Cliente => RentalField::Client,
            Orden::Patente => RentalField::Plate,
            Orden::Inicio => RentalField::StartDate,
            Orden::Fin => RentalField::EndDate,
            Orden::Precio => RentalField::BasePrice,
            Orden::Sanciones => RentalField::Penalties,
            Orden::Total => RentalField::Total,
        }
    }

    fn client_field(self) -> Option<ClientField> {
        match self {
            Orden::Cliente => Some(ClientField::Dni),
            Orden::Precio => Some(ClientField::TotalRentals),
            Orden::Sanciones => Some(ClientField::TotalPenalties),
            Orden::Total => Some(ClientField::GrandTotal),
            _ => None,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "informe", version, about = "Отчёты по арендам автомобилей (PDF/CSV)")]
struct Cli {
    /// Вид отчёта
    #[arg(value_enum)]
    informe: Informe,

    /// JSON-файл с арендами (`-` — stdin); без него данные берутся с бэкенда
    #[arg(short = 'i', long = "input")]
    input: Option<String>,

    /// Выходной файл (`-` — stdout); по умолчанию `<префикс>-<дата>.<формат>`
    #[arg(short = 'o', long = "output")]
    output: Option<String>,

    /// Файл настроек вместо ./informe.toml
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Адрес бэкенда, перекрывает настройки
    #[arg(long = "backend", env = "INFORME_BACKEND")]
    backend: Option<String>,

    #[arg(long = "desde")]
    desde: Option<NaiveDate>,

    #[arg(long = "hasta")]
    hasta: Option<NaiveDate>,

    /// Подстрока номера машины, без учёта регистра
    #[arg(long = "patente")]
    patente: Option<String>,

    #[arg(long = "limite")]
    limite: Option<usize>,

    #[arg(long = "periodicidad", value_enum)]
    periodicidad: Option<Periodicidad>,

    /// Не включать санкции в итоги
    #[arg(long = "sin-sanciones")]
    sin_sanciones: bool,

    #[arg(long = "orden", value_enum)]
    orden: Option<Orden>,

    /// Сортировать по убыванию
    #[arg(long = "desc", requires = "orden")]
    desc: bool,

    #[arg(long = "formato", value_enum, default_value = "pdf")]
    formato: Fmt,

    /// -v, -vv, -vvv
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn options(&self, settings: &Settings) -> AggregateOptions {
        let mut opts = settings.aggregate_options();
        if let Some(p) = self.periodicidad {
            opts.period_granularity = match p {
                Periodicidad::Mensual => Granularity::Month,
                Periodicidad::Trimestral => Granularity::Quarter,
            };
        }
        if self.sin_sanciones {
            opts.include_penalties_in_totals = false;
        }
        opts
    }

    fn query(&self, granularity: Option<Granularity>) -> ReportQuery {
        ReportQuery { from: self.desde, to: self.hasta, limit: self.limite, granularity }
    }

    fn rental_filter(&self) -> ViewFilter<RentalField> {
        let mut filter = ViewFilter::default().with_dates(RentalField::StartDate, self.desde, self.hasta);
        if let Some(p) = &self.patente {
            filter = filter.with_text(RentalField::Plate, p.clone());
        }
        filter
    }

    /// Сочетания флагов, которые парсер сам не отсекает.
    fn validate(&self) -> std::result::Result<(), String> {
        let Some(orden) = self.orden else {
            return Ok(());
        };
        match self.informe {
            Informe::Detalle => Ok(()),
            Informe::Clientes if orden.client_field().is_some() => Ok(()),
            Informe::Clientes => Err(format!(
                "--orden {} is not a column of the client report (use cliente, precio, sanciones or total)",
                orden.to_possible_value().map(|v| v.get_name().to_string()).unwrap_or_default()
            )),
            _ => Err("--orden applies only to the clientes and detalle reports".into()),
        }
    }

    /// Готовые агрегаты бэкенда не фильтруются по машине, поэтому с
    /// `--patente` аренды запрашиваются целиком и сводятся локально.
    fn aggregates_locally(&self) -> bool {
        self.input.is_some() || self.patente.is_some() || matches!(self.informe, Informe::Clientes | Informe::Detalle)
    }

    fn take(&self) -> usize {
        self.limite.unwrap_or(usize::MAX)
    }

    fn sort<F: Copy + PartialEq>(&self, field: Option<F>) -> Option<SortState<F>> {
        let state = SortState::new(field?);
        // повторный выбор того же столбца переворачивает направление
        Some(if self.desc { state.select(state.field) } else { state })
    }
}

fn init_tracing(verbose: u8) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn read_input(path: &str) -> Result<Vec<RentalRecord>> {
    let reader: Box<dyn Read> = match path {
        "-" => Box::new(io::stdin()),
        p => Box::new(File::open(p)?),
    };
    json::read_records(BufReader::new(reader))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Err(msg) = cli.validate() {
        Cli::command().error(ErrorKind::ArgumentConflict, msg).exit();
    }
    init_tracing(cli.verbose);

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(url) = &cli.backend {
        settings.backend.base_url = url.clone();
    }
    let opts = cli.options(&settings);
    let ctx = ReportContext::new(settings.locale.clone(), Local::now().naive_local())
        .with_range(cli.desde, cli.hasta);

    let backend = match cli.input {
        Some(_) => None,
        None => Some(BackendClient::from_settings(&settings.backend)?),
    };

    let rentals = match (&cli.input, &backend) {
        (Some(path), _) => read_input(path)?,
        (None, Some(b)) if cli.aggregates_locally() => b.rentals(&cli.query(None)).await?,
        _ => Vec::new(),
    };
    let filter = cli.rental_filter();
    let view = apply_view(&rentals, &filter, cli.sort(cli.orden.map(Orden::rental_field)).as_ref());
    let filtered: Vec<RentalRecord> = view.iter().map(|r| (*r).clone()).collect();

    let remote = backend.as_ref().filter(|_| !cli.aggregates_locally());
    let doc: ReportDocument = match (cli.informe, remote) {
        (Informe::Clientes, _) => {
            let summaries = summarize_by_client(&filtered, &opts);
            let sort = cli.sort(cli.orden.and_then(Orden::client_field));
            let view = apply_view(&summaries, &ViewFilter::default(), sort.as_ref());
            reports::client_report(view.into_iter().take(cli.take()), &ctx)
        }
        (Informe::Detalle, _) => reports::rental_report(filtered.iter().take(cli.take()), &ctx),
        (Informe::Periodos, None) => {
            reports::period_report(summarize_by_period(&filtered, &opts).iter().take(cli.take()), &ctx)
        }
        (Informe::Periodos, Some(b)) => {
            let mut rows = b.rentals_by_period(&cli.query(Some(opts.period_granularity))).await?;
            if !opts.include_penalties_in_totals {
                rows = rows.into_iter().map(PeriodSummary::without_penalties).collect();
            }
            reports::period_report(rows.iter().take(cli.take()), &ctx)
        }
        (Informe::Vehiculos, None) => reports::vehicle_report(&rank_vehicles(&filtered, cli.limite), &ctx),
        (Informe::Vehiculos, Some(b)) => {
            reports::vehicle_report(b.top_vehicles(&cli.query(None)).await?.iter().take(cli.take()), &ctx)
        }
        (Informe::Facturacion, None) => {
            let monthly = AggregateOptions { period_granularity: Granularity::Month, ..opts };
            let rows: Vec<MonthlyBilling> = summarize_by_period(&filtered, &monthly)
                .into_iter()
                .map(|p| MonthlyBilling {
                    month: p.period,
                    rentals: p.rentals,
                    rental_income: p.total_rentals,
                    penalty_income: p.total_penalties,
                })
                .collect();
            reports::monthly_billing_report(rows.iter().take(cli.take()), &ctx)
        }
        (Informe::Facturacion, Some(b)) => {
            let mut rows = b.monthly_billing(&cli.query(None)).await?;
            if !opts.include_penalties_in_totals {
                rows = rows.into_iter().map(MonthlyBilling::without_penalties).collect();
            }
            reports::monthly_billing_report(rows.iter().take(cli.take()), &ctx)
        }
    };

    if doc.rows.is_empty() {
        info!("no records for the selected filters");
    }

    let ext = match cli.formato {
        Fmt::Pdf => "pdf",
        Fmt::Csv => "csv",
    };
    let output = cli.output.clone().unwrap_or_else(|| {
        export_file_name(cli.informe.kind().file_prefix(), Local::now().date_naive(), ext)
    });

    let mut writer: Box<dyn Write> = match output.as_str() {
        "-" => Box::new(io::stdout()),
        path => Box::new(File::create(path)?),
    };

    let layout = settings.layout();
    match cli.formato {
        Fmt::Pdf => Pdf::render(&mut writer, &doc, &layout),
        Fmt::Csv => Csv::render(&mut writer, &doc, &layout),
    }?;

    info!(%output, rows = doc.rows.len(), "report written");
    writer.flush().map_err(InformeError::from)
}
