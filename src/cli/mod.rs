//! Startup Profit CLI
//!
//! Command-line interface for serving, training and one-off predictions.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::schema::{PredictRequest, DEFAULT_STATE};
use crate::server::{run_server, ServerConfig};
use crate::training::{read_metadata_value, ProfitModel, Trainer, TrainingConfig};
use crate::utils::DatasetSource;

// ─── Styling helpers ───────────────────────────────────────────────────────────

const W: usize = 58; // box inner width

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn line_box_top()    { println!("  {}", dim("┌─────────────────────────────────────────────────────────┐")); }
fn line_box_bottom() { println!("  {}", dim("└─────────────────────────────────────────────────────────┘")); }
fn line_box_sep()    { println!("  {}", dim("├─────────────────────────────────────────────────────────┤")); }

fn line_box(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let pad = W.saturating_sub(visible_len);
    println!("  {}  {}{} {}", dim("│"), content, " ".repeat(pad), dim("│"));
}

fn line_box_center(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let total_pad = W.saturating_sub(visible_len);
    let left = total_pad / 2;
    let right = total_pad - left;
    println!("  {}  {}{}{} {}", dim("│"), " ".repeat(left), content, " ".repeat(right), dim("│"));
}

fn line_box_empty() { line_box(""); }

fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut in_escape = false;
    for c in s.chars() {
        if c == '\x1b' { in_escape = true; continue; }
        if in_escape { if c == 'm' { in_escape = false; } continue; }
        out.push(c);
    }
    out
}

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn step_ok(msg: &str) {
    println!("  {} {}", ok("✓"), msg);
}

fn step_warn(msg: &str) {
    println!("  {} {}", "!".yellow(), msg);
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "startup-profit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Startup profit prediction service")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the prediction API (default)
    Serve {
        /// Address to bind [env: API_HOST, default 0.0.0.0]
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on [env: API_PORT, default 5001]
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Train the model and write the artifact and metadata
    Train {
        /// Dataset CSV; searched for when omitted
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Model artifact output
        #[arg(long)]
        model_out: Option<PathBuf>,

        /// Metadata output
        #[arg(long)]
        meta_out: Option<PathBuf>,

        /// Number of trees
        #[arg(long)]
        trees: Option<usize>,
    },

    /// Predict profit for one startup
    Predict {
        #[arg(long, default_value_t = 0.0)]
        rd_spend: f64,

        #[arg(long, default_value_t = 0.0)]
        administration: f64,

        #[arg(long, default_value_t = 0.0)]
        marketing_spend: f64,

        #[arg(long, default_value = DEFAULT_STATE)]
        state: String,

        /// Model artifact
        #[arg(short, long)]
        model: Option<PathBuf>,
    },

    /// Show the metadata of the last training run
    Info {
        /// Metadata file
        #[arg(long)]
        meta: Option<PathBuf>,
    },
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_train(
    data: Option<PathBuf>,
    model_out: Option<PathBuf>,
    meta_out: Option<PathBuf>,
    trees: Option<usize>,
) -> anyhow::Result<()> {
    section("Train");

    let mut config = TrainingConfig::default();
    if let Some(path) = data {
        config = config.with_dataset(path);
    }
    if let Some(path) = model_out {
        config = config.with_model_path(path);
    }
    if let Some(path) = meta_out {
        config = config.with_metadata_path(path);
    }
    if let Some(n) = trees {
        config = config.with_n_estimators(n);
    }

    let (dataset, source) = config.locator.locate()?;
    match source {
        DatasetSource::Legacy => step_warn(&format!("Using legacy dataset: {}", dataset.display())),
        _ => step_ok(&format!("Found dataset: {}", dataset.display())),
    }

    step_run(&format!("Training {} trees", config.n_estimators.to_string().cyan()));
    let start = Instant::now();
    let report = Trainer::new(config).train_and_save()?;
    step_done(&format!("{:?}", start.elapsed()));

    println!();
    println!("  {:<16} {}", muted("Train R²"), format!("{:.4}", report.train_r2).white().bold());
    println!("  {:<16} {}", muted("Test R²"), format!("{:.4}", report.test_r2).white().bold());
    println!("  {:<16} {} / {}", muted("Rows"), report.train_rows, report.test_rows);
    println!();

    step_ok(&format!("Model saved to {}", report.model_path.display()));
    match &report.metadata {
        Some(meta) if meta.importances.is_empty() => {
            step_warn("Could not compute importances");
        }
        Some(_) => {}
        None => step_warn("Failed to save model metadata"),
    }
    println!();

    Ok(())
}

pub fn cmd_predict(request: PredictRequest, model_path: Option<PathBuf>) -> anyhow::Result<()> {
    section("Predict");

    let path = model_path.unwrap_or_else(|| TrainingConfig::default().artifacts.model_path);
    let model = ProfitModel::load(&path)?;
    let prediction = model.predict_one(&request)?;

    println!("  {:<18} {:.2}", muted("R&D Spend"), request.rd_spend);
    println!("  {:<18} {:.2}", muted("Administration"), request.administration);
    println!("  {:<18} {:.2}", muted("Marketing Spend"), request.marketing_spend);
    println!("  {:<18} {}", muted("State"), request.state);
    println!("  {}", dim(&"─".repeat(40)));
    println!("  {:<18} {}", muted("Profit"), format!("{:.2}", prediction).white().bold());
    println!();

    Ok(())
}

pub fn cmd_info(meta_path: Option<PathBuf>) -> anyhow::Result<()> {
    section("Model Info");

    let path = meta_path.unwrap_or_else(|| TrainingConfig::default().artifacts.metadata_path);
    let Some(meta) = read_metadata_value(&path)? else {
        anyhow::bail!("model metadata not found at {}", path.display());
    };

    print_metadata(&path, &meta);
    Ok(())
}

fn print_metadata(path: &Path, meta: &serde_json::Value) {
    println!("  {:<14} {}", muted("File"), path.display());
    for key in ["trained_on", "trained_at", "train_r2", "test_r2"] {
        if let Some(value) = meta.get(key) {
            let shown = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n
                    .as_f64()
                    .map(|v| format!("{:.4}", v))
                    .unwrap_or_else(|| n.to_string()),
                other => other.to_string(),
            };
            println!("  {:<14} {}", muted(key), shown);
        }
    }

    if let Some(importances) = meta.get("importances").and_then(|v| v.as_object()) {
        println!();
        println!("  {:<20} {:>10}", muted("Feature"), muted("Importance"));
        println!("  {}", dim(&"─".repeat(31)));
        for (name, value) in importances {
            println!("  {:<20} {:>10.4}", name, value.as_f64().unwrap_or(0.0));
        }
    }
    println!();
}

// ─── Serve ─────────────────────────────────────────────────────────────────────

pub async fn cmd_serve(host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let mut config = ServerConfig::default();
    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }

    let base = format!("http://{}:{}", config.host, config.port);

    println!();
    line_box_top();
    line_box_empty();
    line_box_center(&format!("{}", "Startup Profit API".white().bold()));
    line_box_center(&format!("{}", dim(&format!("v{}", env!("CARGO_PKG_VERSION")))));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box(&kv("Health  ", &format!("{}/", base)));
    line_box(&kv("Predict ", &format!("{}/predict", base)));
    line_box(&kv("Info    ", &format!("{}/model-info", base)));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box_center(&format!("{}", dim("ctrl+c to stop")));
    line_box_empty();
    line_box_bottom();
    println!();

    run_server(config).await
}
