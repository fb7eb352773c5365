//! In-memory SQLite snapshot of influenza forecast hub data.
//!
//! The snapshot holds the three read-only stores the dashboard queries:
//!
//! - **forecasts** - quantile forecasts per model, location, reference date
//!   and target week
//! - **observations** - observed weekly hospital admissions per location
//! - **scores** - precomputed WIS / WIS_ratio / MAPE values
//!
//! plus the location table used to resolve display names.
//!
//! # Architecture
//!
//! - In-memory SQLite via `rusqlite`, populated once inside a single
//!   transaction by [`Snapshot::load`]
//! - Load-time normalization (cutoff dates, model allow-list, quantile-only
//!   forecasts) is driven by a [`LoadPolicy`]
//! - `Rc<Connection>` handle: cheap to clone, single-threaded, no mutation
//!   after load
//! - Typed query methods returning [`flu_hub`] records
//!
//! # Usage
//!
//! ```rust
//! use flu_store::{CsvSource, LoadPolicy, Snapshot, SnapshotSources};
//!
//! let sources = SnapshotSources::default()
//!     .with_locations(CsvSource::new(
//!         "locations.csv",
//!         "location,location_name\n06,California\n",
//!     ))
//!     .with_forecasts(
//!         "MOBS-GLEAM_FLUH",
//!         CsvSource::new(
//!             "2024-11-23.csv",
//!             "reference_date,target_end_date,location,output_type,output_type_id,value\n\
//!              2024-11-23,2024-11-30,06,quantile,0.5,180\n",
//!         ),
//!     );
//! let snapshot = Snapshot::load(&sources, &LoadPolicy::default()).unwrap();
//!
//! let location = snapshot.resolve_location("California").unwrap();
//! let models = vec!["MOBS-GLEAM_FLUH".to_string()];
//! let rows = snapshot.query_forecasts(&location, &models, None, None).unwrap();
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0].horizon, 1);
//! ```

pub mod error;
pub mod schema;
mod forecast_store;
mod loader;
mod location_store;
mod observation_store;
mod score_store;

pub use error::{LoadError, QueryError};
pub use loader::{LoadCounts, LoadReport};

use chrono::NaiveDate;
use flu_hub::ScoreKind;
use rusqlite::Connection;
use std::rc::Rc;

/// Named CSV text handed to the loader. `name` only appears in errors and
/// logs (typically the file path).
#[derive(Debug, Clone)]
pub struct CsvSource {
    pub name: String,
    pub data: String,
}

impl CsvSource {
    pub fn new(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

/// Every input the snapshot is built from.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSources {
    pub locations: Vec<CsvSource>,
    /// (model, forecast file) pairs; the model comes from the directory
    /// the file was found in.
    pub forecasts: Vec<(String, CsvSource)>,
    pub observations: Vec<CsvSource>,
    pub scores: Vec<(ScoreKind, CsvSource)>,
}

impl SnapshotSources {
    pub fn with_locations(mut self, source: CsvSource) -> Self {
        self.locations.push(source);
        self
    }

    pub fn with_forecasts(mut self, model: &str, source: CsvSource) -> Self {
        self.forecasts.push((model.to_string(), source));
        self
    }

    pub fn with_observations(mut self, source: CsvSource) -> Self {
        self.observations.push(source);
        self
    }

    pub fn with_scores(mut self, kind: ScoreKind, source: CsvSource) -> Self {
        self.scores.push((kind, source));
        self
    }
}

/// Load-time filters. The defaults are the fixed hub cutoffs and model
/// allow-list from [`flu_hub`].
#[derive(Debug, Clone, PartialEq)]
pub struct LoadPolicy {
    /// Forecasts with an earlier reference date are dropped.
    pub forecast_reference_cutoff: NaiveDate,
    /// Observations with an earlier date are dropped.
    pub observation_cutoff: NaiveDate,
    /// Scores must have a reference date strictly after this one.
    pub score_reference_cutoff: NaiveDate,
    /// Scores for other models are dropped.
    pub score_models: Vec<String>,
}

impl Default for LoadPolicy {
    fn default() -> Self {
        Self {
            forecast_reference_cutoff: flu_hub::FORECAST_REFERENCE_CUTOFF,
            observation_cutoff: flu_hub::OBSERVATION_CUTOFF,
            score_reference_cutoff: flu_hub::SCORE_REFERENCE_CUTOFF,
            score_models: flu_hub::MODELS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// Read-only snapshot of all stores.
///
/// Cheaply cloneable (via `Rc`); clones share the same connection.
///
/// # Example
///
/// ```rust
/// use flu_store::{CsvSource, LoadPolicy, Snapshot, SnapshotSources};
///
/// let sources = SnapshotSources::default().with_observations(CsvSource::new(
///     "target-hospital-admissions.csv",
///     "date,location,value\n2024-11-02,US,2469\n",
/// ));
/// let snapshot = Snapshot::load(&sources, &LoadPolicy::default()).unwrap();
/// assert_eq!(snapshot.report().observations.loaded, 1);
/// ```
#[derive(Clone)]
pub struct Snapshot {
    conn: Rc<Connection>,
    report: LoadReport,
}

impl Snapshot {
    /// Build the snapshot from `sources`.
    ///
    /// Any malformed row aborts the load; nothing is returned in that case.
    pub fn load(sources: &SnapshotSources, policy: &LoadPolicy) -> Result<Self, LoadError> {
        let mut conn = Connection::open_in_memory()?;
        conn.execute_batch(schema::create_schema())?;

        let tx = conn.transaction()?;
        let report = loader::load_all(&tx, sources, policy)?;
        tx.commit()?;

        log::info!(
            "snapshot: {} locations, {} forecast rows, {} observations, {} scores",
            report.locations.loaded,
            report.forecasts.loaded,
            report.observations.loaded,
            report.scores.loaded
        );
        Ok(Self {
            conn: Rc::new(conn),
            report,
        })
    }

    /// Row counts recorded while loading.
    pub fn report(&self) -> &LoadReport {
        &self.report
    }
}
