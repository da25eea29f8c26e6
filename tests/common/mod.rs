//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::Path;

use startup_profit::server::{AppState, ServerConfig};
use startup_profit::training::{ArtifactPaths, TrainingConfig};
use startup_profit::utils::DatasetLocator;

pub const HEADER: &str = "R&D Spend,Administration,Marketing Spend,State,Profit";

pub const STATES: [&str; 3] = ["New York", "California", "Florida"];

/// One synthetic row; profit tracks R&D spend with a small state offset
pub fn row(i: usize, state: &str, profit_scale: f64) -> String {
    let rd = 1_000.0 + i as f64 * 3_300.0;
    let admin = 60_000.0 + ((i * 37) % 50) as f64 * 1_800.0;
    let marketing = 20_000.0 + ((i * 53) % 50) as f64 * 9_000.0;
    let offset = match state {
        "California" => 1_500.0,
        "Florida" => -800.0,
        _ => 0.0,
    };
    let profit = (45_000.0 + 0.8 * rd + 0.03 * marketing + offset) * profit_scale;
    format!("{:.2},{:.2},{:.2},{},{:.2}", rd, admin, marketing, state, profit)
}

/// Write `n` rows cycling through the three states
pub fn write_dataset(path: &Path, n: usize) {
    write_rows(path, (0..n).map(|i| row(i, STATES[i % 3], 1.0)));
}

/// Write `n` rows that all belong to `state`
pub fn write_single_state_dataset(path: &Path, n: usize, state: &str) {
    write_rows(path, (0..n).map(|i| row(i, state, 1.0)));
}

/// Write `n` rows with every profit multiplied by `scale`
pub fn write_scaled_dataset(path: &Path, n: usize, scale: f64) {
    write_rows(path, (0..n).map(|i| row(i, STATES[i % 3], scale)));
}

pub fn write_rows(path: &Path, rows: impl Iterator<Item = String>) {
    let mut file = File::create(path).unwrap();
    writeln!(file, "{}", HEADER).unwrap();
    for line in rows {
        writeln!(file, "{}", line).unwrap();
    }
}

/// Training config confined to `dir`: dataset searched only inside it and
/// artifacts written into it
pub fn training_config(dir: &Path) -> TrainingConfig {
    TrainingConfig::default()
        .with_locator(DatasetLocator::rooted_at(dir).with_max_levels(1))
        .with_artifacts(ArtifactPaths::in_dir(dir))
        .with_n_estimators(25)
}

pub fn server_config(dir: &Path) -> ServerConfig {
    ServerConfig::default()
        .with_host("127.0.0.1")
        .with_port(0)
        .with_training(training_config(dir))
}

pub fn app_state(dir: &Path) -> AppState {
    AppState::load_at_startup(server_config(dir))
}
