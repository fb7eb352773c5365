//! CSV loading for populating the snapshot.
//!
//! Every file is read with headers; columns are matched by name and unknown
//! columns are ignored. Rows are normalized through [`flu_hub`] and then
//! filtered by the [`LoadPolicy`].
//!
//! # CSV Formats
//!
//! - **Locations**: `location,location_name` (plus `abbreviation`, `population`)
//! - **Forecasts**: `reference_date,target_end_date,location,output_type,output_type_id,value`
//! - **Observations**: `date,location,value`
//! - **Scores**: `Model,location,reference_date,target_end_date[,horizon],<wis|MAPE|wis_ratio>`

use crate::{CsvSource, LoadError, LoadPolicy, SnapshotSources};
use flu_hub::{
    LocationEntry, ObservationRecord, RawForecastRow, RawLocationRow, RawObservationRow,
    RowError, ScoreColumns, ScoreKind,
};
use csv::StringRecord;
use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;

/// Rows kept and dropped for one table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadCounts {
    pub loaded: u64,
    pub dropped: u64,
}

/// Per-table counts of one snapshot load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub locations: LoadCounts,
    pub forecasts: LoadCounts,
    pub observations: LoadCounts,
    pub scores: LoadCounts,
}

pub(crate) fn load_all(
    conn: &Connection,
    sources: &SnapshotSources,
    policy: &LoadPolicy,
) -> Result<LoadReport, LoadError> {
    let mut report = LoadReport::default();
    for source in &sources.locations {
        add(&mut report.locations, load_locations(conn, source)?);
    }
    for (model, source) in &sources.forecasts {
        add(&mut report.forecasts, load_forecasts(conn, model, source, policy)?);
    }
    for source in &sources.observations {
        add(&mut report.observations, load_observations(conn, source, policy)?);
    }
    for (kind, source) in &sources.scores {
        add(&mut report.scores, load_scores(conn, *kind, source, policy)?);
    }
    Ok(report)
}

fn add(total: &mut LoadCounts, counts: LoadCounts) {
    total.loaded += counts.loaded;
    total.dropped += counts.dropped;
}

/// Read the header and every record of `source`, each record paired with
/// its line number.
fn read_records(
    source: &CsvSource,
) -> Result<(StringRecord, Vec<(u64, StringRecord)>), LoadError> {
    let csv_err = |source_err: csv::Error| LoadError::Csv {
        source_name: source.name.clone(),
        source: source_err,
    };
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(source.data.as_bytes());
    let headers = rdr.headers().map_err(csv_err)?.clone();

    let mut records = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(csv_err)?;
        let line = record.position().map_or(0, |p| p.line());
        records.push((line, record));
    }
    Ok((headers, records))
}

/// Read every record of `source` into `T`, paired with its line number.
fn read_rows<T: DeserializeOwned>(source: &CsvSource) -> Result<Vec<(u64, T)>, LoadError> {
    let (headers, records) = read_records(source)?;
    records
        .into_iter()
        .map(|(line, record)| {
            let row: T = record
                .deserialize(Some(&headers))
                .map_err(|source_err| LoadError::Csv {
                    source_name: source.name.clone(),
                    source: source_err,
                })?;
            Ok((line, row))
        })
        .collect()
}

fn row_err(source: &CsvSource, line: u64) -> impl Fn(RowError) -> LoadError + '_ {
    move |err| LoadError::Row {
        source_name: source.name.clone(),
        line,
        source: err,
    }
}

/// Load the location table. Later rows for the same identifier replace
/// earlier ones.
fn load_locations(conn: &Connection, source: &CsvSource) -> Result<LoadCounts, LoadError> {
    let mut stmt = conn.prepare_cached(
        "INSERT OR REPLACE INTO locations (location, location_name) VALUES (?1, ?2)",
    )?;
    let mut counts = LoadCounts::default();
    for (line, row) in read_rows::<RawLocationRow>(source)? {
        let entry = LocationEntry::try_from(&row).map_err(row_err(source, line))?;
        stmt.execute(params![entry.location, entry.location_name])?;
        counts.loaded += 1;
    }
    log::info!("loader: {} locations from {}", counts.loaded, source.name);
    Ok(counts)
}

/// Load one forecast file for `model`.
///
/// Non-quantile rows and rows issued before the reference cutoff are
/// dropped. A repeated quantile for the same forecast keeps the first value.
fn load_forecasts(
    conn: &Connection,
    model: &str,
    source: &CsvSource,
    policy: &LoadPolicy,
) -> Result<LoadCounts, LoadError> {
    let mut stmt = conn.prepare_cached(
        "INSERT OR IGNORE INTO forecasts
         (model, location, reference_date, target_end_date, horizon, quantile_level, value)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    let mut counts = LoadCounts::default();
    let mut duplicates = 0u64;
    for (line, row) in read_rows::<RawForecastRow>(source)? {
        let record = match row.normalize(model).map_err(row_err(source, line))? {
            Some(r) if r.reference_date >= policy.forecast_reference_cutoff => r,
            _ => {
                counts.dropped += 1;
                continue;
            }
        };
        let inserted = stmt.execute(params![
            record.model,
            record.location,
            record.reference_date,
            record.target_end_date,
            record.horizon,
            record.quantile_level.key(),
            record.value,
        ])?;
        if inserted == 0 {
            duplicates += 1;
            counts.dropped += 1;
        } else {
            counts.loaded += 1;
        }
    }
    if duplicates > 0 {
        log::warn!(
            "loader: {} repeated quantile rows ignored in {}",
            duplicates,
            source.name
        );
    }
    log::info!(
        "loader: {} forecast rows for {} from {}, dropped {}",
        counts.loaded,
        model,
        source.name,
        counts.dropped
    );
    Ok(counts)
}

/// Load observed counts, dropping dates before the observation cutoff.
fn load_observations(
    conn: &Connection,
    source: &CsvSource,
    policy: &LoadPolicy,
) -> Result<LoadCounts, LoadError> {
    let mut stmt = conn.prepare_cached(
        "INSERT OR REPLACE INTO observations (location, date, value) VALUES (?1, ?2, ?3)",
    )?;
    let mut counts = LoadCounts::default();
    for (line, row) in read_rows::<RawObservationRow>(source)? {
        let record = ObservationRecord::try_from(&row).map_err(row_err(source, line))?;
        if record.date < policy.observation_cutoff {
            counts.dropped += 1;
            continue;
        }
        stmt.execute(params![record.location, record.date, record.value])?;
        counts.loaded += 1;
    }
    log::info!(
        "loader: {} observations from {}, dropped {} before {}",
        counts.loaded,
        source.name,
        counts.dropped,
        policy.observation_cutoff
    );
    Ok(counts)
}

/// Load one score file of `kind`, keeping allow-listed models scored after
/// the reference cutoff.
///
/// The value comes from the kind's own column; a file without it is
/// rejected at its header line. Every row is kept, including repeats.
fn load_scores(
    conn: &Connection,
    kind: ScoreKind,
    source: &CsvSource,
    policy: &LoadPolicy,
) -> Result<LoadCounts, LoadError> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO scores
         (score_kind, model, location, reference_date, target_end_date, horizon, value)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    let (headers, records) = read_records(source)?;
    let columns = ScoreColumns::from_headers(headers.iter(), kind).map_err(row_err(source, 1))?;

    let mut counts = LoadCounts::default();
    for (line, record) in records {
        let fields: Vec<&str> = record.iter().collect();
        let score = columns
            .row(&fields)
            .normalize(kind)
            .map_err(row_err(source, line))?;
        let allowed = policy.score_models.iter().any(|m| *m == score.model);
        if !allowed || score.reference_date <= policy.score_reference_cutoff {
            counts.dropped += 1;
            continue;
        }
        stmt.execute(params![
            kind.as_str(),
            score.model,
            score.location,
            score.reference_date,
            score.target_end_date,
            score.horizon,
            score.value,
        ])?;
        counts.loaded += 1;
    }
    log::info!(
        "loader: {} {} scores from {}, dropped {}",
        counts.loaded,
        kind,
        source.name,
        counts.dropped
    );
    Ok(counts)
}
