//! Core types for influenza forecast hub data.
//!
//! Raw CSV rows (forecasts, surveillance observations, evaluation scores and
//! the location table) are deserialized into the `Raw*Row` structs and then
//! normalized into immutable records. Normalization is where dates are
//! parsed, quantile levels are discretized and horizons are derived.

pub mod dates;
pub mod error;
pub mod forecast;
pub mod location;
pub mod observation;
pub mod quantile;
pub mod score;

pub use error::RowError;
pub use forecast::{ForecastRecord, RawForecastRow};
pub use location::{LocationEntry, RawLocationRow};
pub use observation::{ObservationRecord, RawObservationRow};
pub use quantile::QuantileLevel;
pub use score::{RawScoreRow, ScoreColumns, ScoreKind, ScoreRecord};

use chrono::NaiveDate;

/// Models whose forecasts and scores are loaded.
pub const MODELS: [&str; 3] = [
    "MOBS-GLEAM_FLUH",
    "NEU_ISI-AdaptiveEnsemble",
    "NEU_ISI-FluBcast",
];

/// Location identifier of the national aggregate.
pub const US_LOCATION: &str = "US";

/// Location name that always resolves to [`US_LOCATION`].
pub const UNITED_STATES: &str = "United States";

/// Forecasts issued before this date are dropped at load.
pub const FORECAST_REFERENCE_CUTOFF: NaiveDate = date(2024, 9, 30);

/// Observations dated before this are dropped at load.
pub const OBSERVATION_CUTOFF: NaiveDate = date(2024, 10, 30);

/// Scores must have a reference date strictly after this one.
pub const SCORE_REFERENCE_CUTOFF: NaiveDate = date(2024, 9, 1);

const fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(d) => d,
        None => panic!("invalid constant date"),
    }
}

/// True if `model` is on the fixed allow-list.
pub fn is_known_model(model: &str) -> bool {
    MODELS.contains(&model)
}
