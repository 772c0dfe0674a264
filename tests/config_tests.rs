mod common;

use std::fs;

use common::temp_home;
use expense_core::{
    config::{Config, ConfigManager, Theme},
    core::services::BudgetThresholds,
};
use rust_decimal_macros::dec;

#[test]
fn saved_config_round_trips() {
    let home = temp_home();
    let manager = ConfigManager::with_base_dir(&home).unwrap();
    let config = Config {
        currency_symbol: "€".into(),
        theme: Theme::Dark,
        ui_color_enabled: false,
        budget_thresholds: BudgetThresholds {
            warning_percent: dec!(60),
            danger_percent: dec!(85),
        },
        export_dir: Some(home.join("csv")),
    };
    manager.save(&config).unwrap();

    assert!(home.join("config").join("config.json").exists());
    let loaded = ConfigManager::with_base_dir(&home).unwrap().load().unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.formatter().format(dec!(3.5)), "€3.50");
}

#[test]
fn save_leaves_no_temp_file_behind() {
    let home = temp_home();
    let manager = ConfigManager::with_base_dir(&home).unwrap();
    manager.save(&Config::default()).unwrap();
    let names: Vec<String> = fs::read_dir(home.join("config"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["config.json"]);
}

#[test]
fn malformed_config_is_reported() {
    let home = temp_home();
    let manager = ConfigManager::with_base_dir(&home).unwrap();
    fs::write(manager.path(), "{ theme: ").unwrap();
    assert!(manager.load().is_err());
}
