//! Reading a hub data directory into snapshot sources.
//!
//! Expected layout:
//!
//! ```text
//! <data-dir>/
//!   locations.csv
//!   forecasts/<model>/*.csv
//!   target_surveillance/target-hospital-admissions.csv
//!   evaluations/WIS.csv
//!   evaluations/MAPE.csv
//!   evaluations/WIS_ratio.csv
//! ```

use anyhow::Context;
use flu_hub::{ScoreKind, MODELS};
use flu_store::{CsvSource, LoadPolicy, Snapshot, SnapshotSources};
use log::info;
use std::path::{Path, PathBuf};

pub const LOCATIONS_FILE: &str = "locations.csv";
pub const FORECASTS_DIR: &str = "forecasts";
pub const OBSERVATIONS_FILE: &str = "target_surveillance/target-hospital-admissions.csv";
pub const EVALUATIONS_DIR: &str = "evaluations";

fn read_source(path: &Path) -> anyhow::Result<CsvSource> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(CsvSource::new(path.display().to_string(), data))
}

/// CSV files directly inside `dir`, sorted by path.
fn csv_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to list {}", dir.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "csv") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Collect every source under `data_dir`.
///
/// Each allow-listed model must have a forecast directory; a missing one is
/// an error.
pub fn discover(data_dir: &Path) -> anyhow::Result<SnapshotSources> {
    let mut sources =
        SnapshotSources::default().with_locations(read_source(&data_dir.join(LOCATIONS_FILE))?);

    for model in MODELS {
        let model_dir = data_dir.join(FORECASTS_DIR).join(model);
        let files = csv_files(&model_dir)?;
        info!("{}: {} forecast files", model, files.len());
        for file in files {
            sources = sources.with_forecasts(model, read_source(&file)?);
        }
    }

    sources = sources.with_observations(read_source(&data_dir.join(OBSERVATIONS_FILE))?);

    for kind in ScoreKind::ALL {
        let path = data_dir
            .join(EVALUATIONS_DIR)
            .join(format!("{}.csv", kind.as_str()));
        sources = sources.with_scores(kind, read_source(&path)?);
    }
    Ok(sources)
}

/// Discover and load the snapshot for `data_dir` with the default policy.
pub fn load_snapshot(data_dir: &Path) -> anyhow::Result<Snapshot> {
    let sources = discover(data_dir)?;
    let snapshot = Snapshot::load(&sources, &LoadPolicy::default())
        .with_context(|| format!("failed to load {}", data_dir.display()))?;
    Ok(snapshot)
}
