//! Command implementations for the flu forecast CLI.
//!
//! Each subcommand loads a snapshot from a hub data directory, assembles a
//! view for the requested selection and prints it as pretty JSON.

use anyhow::Context;
use chrono::NaiveDate;
use clap::Subcommand;
use flu_data::ViewContext;
use flu_hub::{is_known_model, ScoreKind, MODELS};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

pub mod dashboard;
pub mod error;
pub mod evaluation;
pub mod sources;

pub use dashboard::{dashboard, DashboardView};
pub use error::ViewError;
pub use evaluation::{evaluation, EvaluationView, EvaluationWindow};

#[derive(Subcommand)]
pub enum Command {
    /// List known locations
    Locations {
        /// Hub data directory
        #[arg(short = 'd', long)]
        data_dir: PathBuf,
    },

    /// List forecast reference dates for a location
    ReferenceDates {
        #[arg(short = 'd', long)]
        data_dir: PathBuf,

        /// Location name, e.g. "California" or "United States"
        #[arg(short = 'l', long)]
        location: String,

        /// Model to include (repeatable; defaults to every model)
        #[arg(short = 'm', long = "model")]
        models: Vec<String>,
    },

    /// Ensemble summary and trend series for one reference date
    Dashboard {
        #[arg(short = 'd', long)]
        data_dir: PathBuf,

        #[arg(short = 'l', long)]
        location: String,

        /// Model to include (repeatable; defaults to every model)
        #[arg(short = 'm', long = "model")]
        models: Vec<String>,

        /// Reference date (YYYY-MM-DD); the latest one when omitted
        #[arg(short = 'r', long)]
        reference_date: Option<NaiveDate>,
    },

    /// Interval boxes and scores of one model at a fixed horizon
    Evaluate {
        #[arg(short = 'd', long)]
        data_dir: PathBuf,

        #[arg(short = 'l', long)]
        location: String,

        #[arg(short = 'm', long)]
        model: String,

        /// Weeks ahead, 0 through 3
        #[arg(long, default_value_t = 1)]
        horizon: i32,

        /// WIS, WIS_ratio or MAPE
        #[arg(short = 's', long, default_value = "WIS")]
        score: ScoreKind,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match command {
        Command::Locations { data_dir } => run_locations(&mut out, &data_dir),
        Command::ReferenceDates {
            data_dir,
            location,
            models,
        } => run_reference_dates(&mut out, &data_dir, &location, or_all_models(models)),
        Command::Dashboard {
            data_dir,
            location,
            models,
            reference_date,
        } => {
            let ctx = ViewContext::dashboard(&location, or_all_models(models))
                .with_reference_date(reference_date);
            let snapshot = sources::load_snapshot(&data_dir)?;
            write_view(&mut out, dashboard(&snapshot, &ctx))
        }
        Command::Evaluate {
            data_dir,
            location,
            model,
            horizon,
            score,
        } => {
            let ctx = ViewContext::evaluations(&location, &model)
                .with_horizon(horizon)
                .with_score_kind(score);
            let snapshot = sources::load_snapshot(&data_dir)?;
            write_view(&mut out, evaluation(&snapshot, &ctx))
        }
    }
}

fn or_all_models(models: Vec<String>) -> Vec<String> {
    if models.is_empty() {
        return MODELS.iter().map(|m| m.to_string()).collect();
    }
    for model in models.iter().filter(|m| !is_known_model(m)) {
        log::warn!("model {} is not loaded and has no forecasts", model);
    }
    models
}

fn run_locations(out: &mut impl Write, data_dir: &Path) -> anyhow::Result<()> {
    let snapshot = sources::load_snapshot(data_dir)?;
    let locations = snapshot.query_locations()?;
    write_json(out, &locations)
}

fn run_reference_dates(
    out: &mut impl Write,
    data_dir: &Path,
    location_name: &str,
    models: Vec<String>,
) -> anyhow::Result<()> {
    let snapshot = sources::load_snapshot(data_dir)?;
    let location = snapshot.resolve_location(location_name)?;
    let dates = snapshot.query_reference_dates(&location, &models)?;
    write_json(out, &dates)
}

/// Written in place of a view when the selection has no data.
#[derive(Debug, Serialize)]
struct NoData {
    status: &'static str,
    reason: &'static str,
}

fn write_json<T: Serialize>(out: &mut impl Write, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("failed to serialize output")?;
    writeln!(out)?;
    Ok(())
}

/// Print a view, or the "no data" document for an empty selection. Other
/// view errors are returned.
fn write_view<W: Write, T: Serialize>(
    out: &mut W,
    view: Result<T, ViewError>,
) -> anyhow::Result<()> {
    match view {
        Ok(view) => write_json(out, &view),
        Err(err) => match err.empty_selection() {
            Some(reason) => {
                log::info!("no data: {}", reason);
                write_json(
                    out,
                    &NoData {
                        status: "no_data",
                        reason,
                    },
                )
            }
            None => Err(err.into()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flu_data::PipelineError;
    use flu_store::QueryError;

    fn written(f: impl FnOnce(&mut Vec<u8>) -> anyhow::Result<()>) -> serde_json::Value {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        serde_json::from_slice(&buf).unwrap()
    }

    #[test]
    fn empty_selection_prints_no_data() {
        let json = written(|out| {
            write_view::<_, DashboardView>(out, Err(PipelineError::no_models().into()))
        });
        assert_eq!(json["status"], "no_data");
        assert_eq!(json["reason"], "no models selected");
    }

    #[test]
    fn other_view_errors_propagate() {
        let mut buf = Vec::new();
        let err = write_view::<_, DashboardView>(
            &mut buf,
            Err(QueryError::UnknownLocation("Atlantis".to_string()).into()),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Atlantis"));
        assert!(buf.is_empty());
    }

    #[test]
    fn omitted_models_select_all() {
        assert_eq!(or_all_models(Vec::new()).len(), MODELS.len());
        assert_eq!(
            or_all_models(vec!["NEU_ISI-FluBcast".to_string()]),
            vec!["NEU_ISI-FluBcast".to_string()]
        );
    }

    #[test]
    fn locations_and_reference_dates_from_data_dir() {
        let dir = tempfile::tempdir().expect("create temp dir");
        sources::fixture::write_data_dir(dir.path());

        let json = written(|out| run_locations(out, dir.path()));
        assert_eq!(json[0]["location_name"], "California");
        assert_eq!(json[1]["location"], "US");

        let json = written(|out| {
            run_reference_dates(out, dir.path(), "California", or_all_models(Vec::new()))
        });
        assert_eq!(json, serde_json::json!(["2024-11-09", "2024-11-16"]));
    }

    #[test]
    fn dashboard_view_serializes() {
        let dir = tempfile::tempdir().expect("create temp dir");
        sources::fixture::write_data_dir(dir.path());
        let snapshot = sources::load_snapshot(dir.path()).unwrap();
        let ctx = ViewContext::dashboard("California", or_all_models(Vec::new()));

        let json = written(|out| write_view(out, dashboard(&snapshot, &ctx)));
        assert_eq!(json["reference_date"], "2024-11-16");
        assert_eq!(json["summary"]["activity"], "MODERATE");
        assert_eq!(json["models_active"], 3);
        assert_eq!(json["observed"].as_array().map(Vec::len), Some(3));
        assert!(json["trends"]["MOBS-GLEAM_FLUH"].get("observed").is_none());
    }
}
