//! Forecast store queries.

use crate::{QueryError, Snapshot};
use chrono::NaiveDate;
use flu_hub::{ForecastRecord, QuantileLevel};
use rusqlite::types::ToSql;
use rusqlite::Row;

fn model_placeholders(first: usize, count: usize) -> String {
    (first..first + count)
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ")
}

fn forecast_from_row(row: &Row<'_>) -> rusqlite::Result<ForecastRecord> {
    let key: u16 = row.get(5)?;
    let quantile_level = QuantileLevel::from_key(key)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(5, i64::from(key)))?;
    Ok(ForecastRecord {
        model: row.get(0)?,
        location: row.get(1)?,
        reference_date: row.get(2)?,
        target_end_date: row.get(3)?,
        horizon: row.get(4)?,
        quantile_level,
        value: row.get(6)?,
    })
}

impl Snapshot {
    /// Forecast rows for `location` and any of `models`.
    ///
    /// `reference_date` and `horizon` narrow the result when given. An
    /// unknown location or an empty model list yields an empty result.
    /// Rows are ordered by reference date, model, target date and quantile
    /// level.
    pub fn query_forecasts(
        &self,
        location: &str,
        models: &[String],
        reference_date: Option<NaiveDate>,
        horizon: Option<i32>,
    ) -> Result<Vec<ForecastRecord>, QueryError> {
        if models.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT model, location, reference_date, target_end_date, horizon, quantile_level, value
             FROM forecasts
             WHERE location = ?1
               AND (?2 IS NULL OR reference_date = ?2)
               AND (?3 IS NULL OR horizon = ?3)
               AND model IN ({})
             ORDER BY reference_date, model, target_end_date, quantile_level",
            model_placeholders(4, models.len())
        );
        let mut args: Vec<&dyn ToSql> = vec![&location, &reference_date, &horizon];
        args.extend(models.iter().map(|m| m as &dyn ToSql));

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(args.as_slice(), forecast_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!(
            "query: query_forecasts({}, {} models) returned {} records",
            location,
            models.len(),
            rows.len()
        );
        Ok(rows)
    }

    /// Reference dates with at least one forecast for `location` from any of
    /// `models`, ascending and without duplicates.
    pub fn query_reference_dates(
        &self,
        location: &str,
        models: &[String],
    ) -> Result<Vec<NaiveDate>, QueryError> {
        if models.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT DISTINCT reference_date FROM forecasts
             WHERE location = ?1 AND model IN ({})
             ORDER BY reference_date",
            model_placeholders(2, models.len())
        );
        let mut args: Vec<&dyn ToSql> = vec![&location];
        args.extend(models.iter().map(|m| m as &dyn ToSql));

        let mut stmt = self.conn.prepare(&sql)?;
        let dates = stmt
            .query_map(args.as_slice(), |row| row.get::<_, NaiveDate>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!(
            "query: query_reference_dates({}) returned {} dates",
            location,
            dates.len()
        );
        Ok(dates)
    }
}

#[cfg(test)]
mod tests {
    use crate::{CsvSource, LoadPolicy, Snapshot, SnapshotSources};
    use chrono::NaiveDate;
    use flu_hub::QuantileLevel;

    const HEADER: &str =
        "reference_date,target_end_date,location,output_type,output_type_id,value\n";

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn models(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn sample_snapshot() -> Snapshot {
        let gleam = format!(
            "{}\
2024-11-23,2024-11-30,US,quantile,0.975,2600
2024-11-23,2024-11-30,US,quantile,0.5,2100
2024-11-23,2024-11-30,US,quantile,0.025,1700
2024-11-23,2024-12-07,US,quantile,0.5,2300
2024-11-30,2024-12-07,US,quantile,0.5,2400
2024-11-30,2024-12-07,06,quantile,0.5,210
",
            HEADER
        );
        let flubcast = format!(
            "{}\
2024-11-16,2024-11-23,US,quantile,0.5,1900
2024-11-23,2024-11-30,US,quantile,0.5,2000
",
            HEADER
        );
        let sources = SnapshotSources::default()
            .with_forecasts("MOBS-GLEAM_FLUH", CsvSource::new("gleam.csv", gleam))
            .with_forecasts("NEU_ISI-FluBcast", CsvSource::new("flubcast.csv", flubcast));
        Snapshot::load(&sources, &LoadPolicy::default()).unwrap()
    }

    #[test]
    fn query_forecasts_filters_location_and_models() {
        let snapshot = sample_snapshot();
        let rows = snapshot
            .query_forecasts("US", &models(&["MOBS-GLEAM_FLUH"]), None, None)
            .unwrap();
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|r| r.location == "US"));
        assert!(rows.iter().all(|r| r.model == "MOBS-GLEAM_FLUH"));
    }

    #[test]
    fn query_forecasts_is_ordered() {
        let snapshot = sample_snapshot();
        let rows = snapshot
            .query_forecasts("US", &models(&["MOBS-GLEAM_FLUH"]), Some(d(2024, 11, 23)), None)
            .unwrap();
        let levels: Vec<QuantileLevel> = rows.iter().map(|r| r.quantile_level).collect();
        assert_eq!(
            levels,
            vec![
                QuantileLevel::LOWER_95,
                QuantileLevel::MEDIAN,
                QuantileLevel::UPPER_95,
                QuantileLevel::MEDIAN
            ]
        );
        assert_eq!(rows[3].target_end_date, d(2024, 12, 7));
    }

    #[test]
    fn query_forecasts_by_horizon() {
        let snapshot = sample_snapshot();
        let rows = snapshot
            .query_forecasts(
                "US",
                &models(&["MOBS-GLEAM_FLUH", "NEU_ISI-FluBcast"]),
                None,
                Some(2),
            )
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, 2300.0);
    }

    #[test]
    fn query_forecasts_unknown_location_is_empty() {
        let snapshot = sample_snapshot();
        let rows = snapshot
            .query_forecasts("99", &models(&["MOBS-GLEAM_FLUH"]), None, None)
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn query_forecasts_no_models_is_empty() {
        let snapshot = sample_snapshot();
        assert!(snapshot.query_forecasts("US", &[], None, None).unwrap().is_empty());
    }

    #[test]
    fn query_reference_dates_sorted_and_deduplicated() {
        let snapshot = sample_snapshot();
        let dates = snapshot
            .query_reference_dates("US", &models(&["MOBS-GLEAM_FLUH", "NEU_ISI-FluBcast"]))
            .unwrap();
        assert_eq!(
            dates,
            vec![d(2024, 11, 16), d(2024, 11, 23), d(2024, 11, 30)]
        );

        let dates = snapshot
            .query_reference_dates("06", &models(&["MOBS-GLEAM_FLUH"]))
            .unwrap();
        assert_eq!(dates, vec![d(2024, 11, 30)]);
    }
}
