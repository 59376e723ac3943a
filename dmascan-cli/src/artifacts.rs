//! Run artifact export.
//!
//! Each run writes `summary.json`, `equity.csv`, and `signals.csv` into
//! `<output_dir>/<run_id>/`. The run id is the config hash plus the as-of
//! date, so re-running the same config on the same day overwrites in place
//! while a changed config lands in a fresh directory.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use dmascan_core::sim::EquityPoint;
use dmascan_core::{ScanConfig, ScanOutcome};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write all artifacts for a completed run; returns the run directory.
pub fn save_artifacts(
    outcome: &ScanOutcome,
    config: &ScanConfig,
    as_of: NaiveDate,
    output_dir: &Path,
) -> Result<PathBuf> {
    let run_dir = output_dir.join(format!("{as_of}-{}", &config.run_id()[..12]));
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create run directory {}", run_dir.display()))?;

    write_summary_json(&run_dir.join("summary.json"), outcome)?;
    write_equity_csv(&run_dir.join("equity.csv"), &outcome.backtest.equity)?;
    write_signals_csv(&run_dir.join("signals.csv"), outcome)?;

    Ok(run_dir)
}

fn write_summary_json(path: &Path, outcome: &ScanOutcome) -> Result<()> {
    let json = serde_json::to_string_pretty(&outcome.backtest.summary)?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write {}", path.display()))
}

fn write_equity_csv(path: &Path, equity: &[EquityPoint]) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    writeln!(file, "date,equity")?;
    for point in equity {
        writeln!(file, "{},{:.4}", point.date, point.equity)?;
    }
    Ok(())
}

fn write_signals_csv(path: &Path, outcome: &ScanOutcome) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    writer.write_record(["date", "ticker", "price", "in_trend"])?;
    for row in &outcome.snapshot.rows {
        writer.write_record([
            outcome.snapshot.date.to_string(),
            row.ticker.clone(),
            row.price.map(|p| format!("{p:.4}")).unwrap_or_default(),
            row.in_trend.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
