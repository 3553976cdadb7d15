use figment::providers::{Format, Toml};
use informelib::{config::Settings, model::Granularity};

#[test]
fn embedded_defaults_load() {
    let s = Settings::from_figment(Settings::defaults()).expect("defaults");
    assert_eq!(s.backend.base_url, "http://localhost:8080");
    assert_eq!(s.backend.timeout().as_secs(), 30);
    assert_eq!(s.locale.thousands_separator, '.');
    assert_eq!(s.locale.decimal_separator, ',');
    assert_eq!(s.report.rows_per_page, 30);
    assert_eq!(s.report.granularity, Granularity::Month);

    let opts = s.aggregate_options();
    assert!(opts.include_penalties_in_totals);
    assert_eq!(s.layout().rows_per_page, 30);
}

#[test]
fn user_values_override_defaults() {
    let figment = Settings::defaults().merge(Toml::string(
        r#"
[report]
granularity = "trimestral"
rows_per_page = 10
include_penalties = false
"#,
    ));
    let s = Settings::from_figment(figment).expect("merged");
    assert_eq!(s.report.granularity, Granularity::Quarter);
    assert_eq!(s.report.rows_per_page, 10);
    assert!(!s.aggregate_options().include_penalties_in_totals);
    // не тронутое остаётся по умолчанию
    assert_eq!(s.locale.symbol, "$");
}

#[test]
fn bad_type_is_a_config_error() {
    let figment = Settings::defaults().merge(Toml::string("[report]\nrows_per_page = \"many\"\n"));
    assert!(Settings::from_figment(figment).is_err());
}

#[test]
fn zero_rows_per_page_is_rejected() {
    let figment = Settings::defaults().merge(Toml::string("[report]\nrows_per_page = 0\n"));
    assert!(Settings::from_figment(figment).is_err());
}
