//! Observation store queries.

use crate::{QueryError, Snapshot};
use chrono::NaiveDate;
use flu_hub::ObservationRecord;
use rusqlite::{params, OptionalExtension, Row};

fn observation_from_row(row: &Row<'_>) -> rusqlite::Result<ObservationRecord> {
    Ok(ObservationRecord {
        location: row.get(0)?,
        date: row.get(1)?,
        value: row.get(2)?,
    })
}

impl Snapshot {
    /// Observed values for `location`, ascending by date, optionally starting
    /// at `date_from` (inclusive).
    pub fn query_observations(
        &self,
        location: &str,
        date_from: Option<NaiveDate>,
    ) -> Result<Vec<ObservationRecord>, QueryError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT location, date, value FROM observations
             WHERE location = ?1 AND (?2 IS NULL OR date >= ?2)
             ORDER BY date",
        )?;
        let rows = stmt
            .query_map(params![location, date_from], observation_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!(
            "query: query_observations({}) returned {} records",
            location,
            rows.len()
        );
        Ok(rows)
    }

    /// The most recent observation for `location`, if any.
    pub fn latest_observation(
        &self,
        location: &str,
    ) -> Result<Option<ObservationRecord>, QueryError> {
        let latest = self
            .conn
            .query_row(
                "SELECT location, date, value FROM observations
                 WHERE location = ?1
                 ORDER BY date DESC
                 LIMIT 1",
                params![location],
                observation_from_row,
            )
            .optional()?;
        Ok(latest)
    }

    /// Earliest observation date across all locations.
    pub fn first_observation_date(&self) -> Result<Option<NaiveDate>, QueryError> {
        let first = self
            .conn
            .query_row("SELECT MIN(date) FROM observations", [], |row| {
                row.get::<_, Option<NaiveDate>>(0)
            })?;
        Ok(first)
    }
}

#[cfg(test)]
mod tests {
    use crate::{CsvSource, LoadPolicy, Snapshot, SnapshotSources};
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sample_snapshot() -> Snapshot {
        // Rows deliberately out of order.
        let csv = "\
date,location,value
2024-11-16,US,2900
2024-11-02,US,2469
2024-11-09,US,2650
2024-11-09,06,230
";
        let sources = SnapshotSources::default()
            .with_observations(CsvSource::new("target-hospital-admissions.csv", csv));
        Snapshot::load(&sources, &LoadPolicy::default()).unwrap()
    }

    #[test]
    fn query_observations_sorted_by_date() {
        let snapshot = sample_snapshot();
        let rows = snapshot.query_observations("US", None).unwrap();
        let dates: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![d(2024, 11, 2), d(2024, 11, 9), d(2024, 11, 16)]);
    }

    #[test]
    fn query_observations_from_date() {
        let snapshot = sample_snapshot();
        let rows = snapshot
            .query_observations("US", Some(d(2024, 11, 9)))
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].value, 2650.0);
    }

    #[test]
    fn latest_observation_is_highest_date() {
        let snapshot = sample_snapshot();
        let latest = snapshot.latest_observation("US").unwrap().unwrap();
        assert_eq!(latest.date, d(2024, 11, 16));
        assert_eq!(latest.value, 2900.0);
        assert!(snapshot.latest_observation("99").unwrap().is_none());
    }

    #[test]
    fn first_observation_date_spans_locations() {
        let snapshot = sample_snapshot();
        assert_eq!(snapshot.first_observation_date().unwrap(), Some(d(2024, 11, 2)));

        let empty = Snapshot::load(&SnapshotSources::default(), &LoadPolicy::default()).unwrap();
        assert_eq!(empty.first_observation_date().unwrap(), None);
    }
}
