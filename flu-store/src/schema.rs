//! SQL schema definitions for the in-memory SQLite snapshot.
//!
//! The schema is applied as a single batch when the snapshot is created.

/// Returns the full SQL schema as a single batch string.
///
/// This creates the following tables:
///
/// - `locations` - location identifier and display name
/// - `forecasts` - quantile forecast values; `quantile_level` holds the
///   fixed-point key of [`flu_hub::QuantileLevel`], `horizon` is in weeks
/// - `observations` - observed weekly counts per location
/// - `scores` - precomputed evaluation scores, one row per score file row
///
/// Dates are stored as `YYYY-MM-DD` text so that text ordering is date
/// ordering.
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS locations (
        location TEXT PRIMARY KEY,
        location_name TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_locations_name ON locations(location_name);

    CREATE TABLE IF NOT EXISTS forecasts (
        model TEXT NOT NULL,
        location TEXT NOT NULL,
        reference_date TEXT NOT NULL,
        target_end_date TEXT NOT NULL,
        horizon INTEGER NOT NULL,
        quantile_level INTEGER NOT NULL,
        value REAL NOT NULL,
        PRIMARY KEY (model, location, reference_date, target_end_date, quantile_level)
    );
    CREATE INDEX IF NOT EXISTS idx_forecasts_location ON forecasts(location, reference_date);

    CREATE TABLE IF NOT EXISTS observations (
        location TEXT NOT NULL,
        date TEXT NOT NULL,
        value REAL NOT NULL,
        PRIMARY KEY (location, date)
    );
    CREATE INDEX IF NOT EXISTS idx_obs_date ON observations(date);

    CREATE TABLE IF NOT EXISTS scores (
        score_kind TEXT NOT NULL,
        model TEXT NOT NULL,
        location TEXT NOT NULL,
        reference_date TEXT NOT NULL,
        target_end_date TEXT NOT NULL,
        horizon INTEGER NOT NULL,
        value REAL NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_scores_series ON scores(score_kind, model, location, horizon);
    "#
}
