//! File output: the `{TICKER}.csv` export and the optional chart JSON.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use metrics_engine::{
    ChartSpec,
    csv_export::{export_file_name, write_csv},
};
use serde::Serialize;
use tracing::info;

use crate::{
    config::ExportConfig,
    pipeline::{Dashboard, PipelineError},
};

/// Paths written by [`write_exports`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    pub csv: PathBuf,
    pub charts: Option<PathBuf>,
}

#[derive(Serialize)]
struct ChartBundle<'a> {
    price_chart: &'a ChartSpec,
    overlay_chart: &'a ChartSpec,
}

pub fn charts_file_name(symbol: &str) -> String {
    format!("{symbol}.charts.json")
}

/// Writes the full unformatted series (and, if enabled, the chart specs)
/// into `config.dir`, creating the directory when needed.
pub fn write_exports(dashboard: &Dashboard, config: &ExportConfig) -> anyhow::Result<ExportedFiles> {
    fs::create_dir_all(&config.dir)
        .with_context(|| format!("create export directory {}", config.dir.display()))?;

    let csv = config.dir.join(export_file_name(&dashboard.ticker));
    write_csv_file(dashboard, &csv)?;
    info!(path = %csv.display(), records = dashboard.series.len(), "CSV export written");

    let charts = if config.charts_json {
        let path = config.dir.join(charts_file_name(&dashboard.ticker));
        let bundle = ChartBundle {
            price_chart: &dashboard.metrics.price_chart,
            overlay_chart: &dashboard.metrics.overlay_chart,
        };
        let file = File::create(&path)
            .with_context(|| format!("create chart file {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &bundle)
            .map_err(anyhow::Error::from)
            .and_then(|()| writer.flush().map_err(anyhow::Error::from))
            .with_context(|| format!("write chart file {}", path.display()))?;
        info!(path = %path.display(), "chart specifications written");
        Some(path)
    } else {
        None
    };

    Ok(ExportedFiles { csv, charts })
}

/// [`write_exports`] with failures mapped into the pipeline's error taxonomy.
pub fn export_dashboard(
    dashboard: &Dashboard,
    config: &ExportConfig,
) -> Result<ExportedFiles, PipelineError> {
    write_exports(dashboard, config).map_err(PipelineError::Export)
}

fn write_csv_file(dashboard: &Dashboard, path: &Path) -> anyhow::Result<()> {
    let file =
        File::create(path).with_context(|| format!("create CSV file {}", path.display()))?;
    write_csv(&dashboard.series, BufWriter::new(file))
        .with_context(|| format!("write CSV file {}", path.display()))
}
