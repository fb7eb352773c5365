//! Score store queries.

use crate::{QueryError, Snapshot};
use flu_hub::{ScoreKind, ScoreRecord};
use rusqlite::params;

impl Snapshot {
    /// Scores of one kind for a model, location and horizon, ascending by
    /// target date.
    pub fn query_scores(
        &self,
        model: &str,
        location: &str,
        horizon: i32,
        score_kind: ScoreKind,
    ) -> Result<Vec<ScoreRecord>, QueryError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT model, location, reference_date, target_end_date, horizon, value
             FROM scores
             WHERE score_kind = ?1 AND model = ?2 AND location = ?3 AND horizon = ?4
             ORDER BY target_end_date, reference_date, rowid",
        )?;
        let rows = stmt
            .query_map(
                params![score_kind.as_str(), model, location, horizon],
                |row| {
                    Ok(ScoreRecord {
                        model: row.get(0)?,
                        location: row.get(1)?,
                        reference_date: row.get(2)?,
                        target_end_date: row.get(3)?,
                        horizon: row.get(4)?,
                        score_kind,
                        value: row.get(5)?,
                    })
                },
            )?
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!(
            "query: query_scores({}, {}, {}, {}) returned {} records",
            model,
            location,
            horizon,
            score_kind,
            rows.len()
        );
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use crate::{CsvSource, LoadPolicy, Snapshot, SnapshotSources};
    use chrono::NaiveDate;
    use flu_hub::ScoreKind;

    fn sample_snapshot() -> Snapshot {
        let wis = "\
Model,location,reference_date,target_end_date,horizon,wis
MOBS-GLEAM_FLUH,US,2024-11-30,2024-12-07,1,140.0
MOBS-GLEAM_FLUH,US,2024-11-23,2024-11-30,1,120.5
MOBS-GLEAM_FLUH,US,2024-11-23,2024-12-07,2,210.0
NEU_ISI-FluBcast,US,2024-11-23,2024-11-30,1,99.0
";
        let mape = "\
Model,location,reference_date,target_end_date,horizon,MAPE
MOBS-GLEAM_FLUH,US,2024-11-23,2024-11-30,1,0.08
";
        let sources = SnapshotSources::default()
            .with_scores(ScoreKind::Wis, CsvSource::new("WIS.csv", wis))
            .with_scores(ScoreKind::Mape, CsvSource::new("MAPE.csv", mape));
        Snapshot::load(&sources, &LoadPolicy::default()).unwrap()
    }

    #[test]
    fn query_scores_sorted_by_target_date() {
        let snapshot = sample_snapshot();
        let rows = snapshot
            .query_scores("MOBS-GLEAM_FLUH", "US", 1, ScoreKind::Wis)
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].target_end_date,
            NaiveDate::from_ymd_opt(2024, 11, 30).unwrap()
        );
        assert_eq!(rows[0].value, 120.5);
        assert_eq!(rows[1].value, 140.0);
    }

    #[test]
    fn query_scores_separates_kinds() {
        let snapshot = sample_snapshot();
        let rows = snapshot
            .query_scores("MOBS-GLEAM_FLUH", "US", 1, ScoreKind::Mape)
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].score_kind, ScoreKind::Mape);
        assert!(snapshot
            .query_scores("MOBS-GLEAM_FLUH", "US", 1, ScoreKind::WisRatio)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn query_scores_by_horizon() {
        let snapshot = sample_snapshot();
        let rows = snapshot
            .query_scores("MOBS-GLEAM_FLUH", "US", 2, ScoreKind::Wis)
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, 210.0);
    }
}
