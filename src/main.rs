mod cli;
mod collection;
mod config;
mod csv_input;
mod error;
mod logger;
mod orchestrator;
mod report;
mod shopify;
mod ui;

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, Command};
use config::BulkcolConfig;
use logger::RunLogger;
use orchestrator::UploadRunner;
use shopify::ShopifyClient;
use ui::RunProgress;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let result = match &cli.command {
        Command::Upload { csv } => upload(&cli, csv).await,
        Command::Report => reconcile(&cli),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            ui::print_fatal(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

/// Load config with the CLI's log override applied.
fn load_config(cli: &Cli) -> Result<BulkcolConfig> {
    let mut cfg = BulkcolConfig::load()?;
    if let Some(log) = &cli.log {
        cfg.log_path = log.clone();
    }
    Ok(cfg)
}

async fn upload(cli: &Cli, csv_path: &Path) -> Result<()> {
    let cfg = load_config(cli)?;
    cfg.validate()?;

    let text = std::fs::read_to_string(csv_path)
        .with_context(|| format!("CSV file not found: {}", csv_path.display()))?;
    let rows = csv_input::parse_records(&text)?;

    ui::print_banner(&cfg, csv_path, rows.len(), cli.verbose);

    let client = ShopifyClient::with_policy(cfg.token.clone(), cfg.base_url(), cfg.retry_policy());
    let mut run_logger = RunLogger::open(&cfg.log_path);
    let progress = RunProgress::start();
    run_logger.attach_progress(progress.bar());

    let mut runner = UploadRunner::new(client, run_logger, Duration::from_millis(cfg.pace_ms))
        .with_progress(progress);
    let summary = runner.run(&rows).await;

    ui::print_summary(&summary, &cfg.log_path);
    Ok(())
}

fn reconcile(cli: &Cli) -> Result<()> {
    let cfg = load_config(cli)?;

    let text = std::fs::read_to_string(&cfg.log_path).with_context(|| {
        format!(
            "Log file not found: {} (run `bulkcol upload` first)",
            cfg.log_path.display()
        )
    })?;
    let events = report::collect_events(&text);
    let counts = report::write_reports(&events, &cfg.success_report, &cfg.error_report)?;

    ui::print_report_summary(&counts, &cfg);
    Ok(())
}
