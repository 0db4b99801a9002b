use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use dashboard::{
    DashboardRequest, PipelineError,
    cli::Cli,
    config::{DashboardConfig, load_config_path},
    export::export_dashboard,
    logging::init_logging,
    render::{render_dashboard, render_failure},
    run_pipeline,
};
use market_data::providers::yahoo_rest::YahooProvider;

fn fail(err: &PipelineError) -> ExitCode {
    tracing::error!(error = %err, "dashboard pass failed");
    print!("{}", render_failure(err));
    ExitCode::FAILURE
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config_path(path)?,
        None => DashboardConfig::default(),
    };
    config.apply_env_overrides();
    cli.apply_overrides(&mut config);
    config.validate().context("invalid configuration")?;

    init_logging(config.logging.format)?;

    let provider = YahooProvider::new(config.source.to_yahoo_config())
        .context("failed to create market data provider")?;

    let (start, end) = cli.date_range(Local::now().date_naive());
    let request = DashboardRequest {
        ticker: cli.ticker.clone(),
        start,
        end,
        timeframe: cli.interval,
        style: cli.chart,
    };

    let dashboard = match run_pipeline(&provider, &request, &config.windows).await {
        Ok(dashboard) => dashboard,
        Err(err) => return Ok(fail(&err)),
    };

    // Exports are written before anything is printed so a failure never
    // leaves a partial dashboard on stdout.
    let files = if cli.no_export {
        None
    } else {
        match export_dashboard(&dashboard, &config.export) {
            Ok(files) => Some(files),
            Err(err) => return Ok(fail(&err)),
        }
    };

    print!("{}", render_dashboard(&dashboard));
    if let Some(files) = files {
        println!("\nSaved {}", files.csv.display());
        if let Some(charts) = files.charts {
            println!("Saved {}", charts.display());
        }
    }

    Ok(ExitCode::SUCCESS)
}
