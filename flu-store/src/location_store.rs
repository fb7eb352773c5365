//! Location lookup.

use crate::{QueryError, Snapshot};
use flu_hub::{LocationEntry, UNITED_STATES, US_LOCATION};
use rusqlite::{params, OptionalExtension};

impl Snapshot {
    /// Resolve a display name to its location identifier.
    ///
    /// "United States" always resolves to the national sentinel "US".
    pub fn resolve_location(&self, location_name: &str) -> Result<String, QueryError> {
        let name = location_name.trim();
        if name == UNITED_STATES {
            return Ok(US_LOCATION.to_string());
        }
        self.conn
            .query_row(
                "SELECT location FROM locations WHERE location_name = ?1
                 ORDER BY location
                 LIMIT 1",
                params![name],
                |row| row.get::<_, String>(0),
            )
            .optional()?
            .ok_or_else(|| QueryError::UnknownLocation(name.to_string()))
    }

    /// All known locations ordered by name.
    pub fn query_locations(&self) -> Result<Vec<LocationEntry>, QueryError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT location, location_name FROM locations ORDER BY location_name",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(LocationEntry {
                    location: row.get(0)?,
                    location_name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("query: query_locations returned {} records", rows.len());
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use crate::{CsvSource, LoadPolicy, QueryError, Snapshot, SnapshotSources};

    fn sample_snapshot() -> Snapshot {
        let csv = "\
abbreviation,location,location_name,population
US,US,United States,334914895
CA,06,California,39029342
AL,01,Alabama,5074296
";
        let sources =
            SnapshotSources::default().with_locations(CsvSource::new("locations.csv", csv));
        Snapshot::load(&sources, &LoadPolicy::default()).unwrap()
    }

    #[test]
    fn resolve_known_location() {
        let snapshot = sample_snapshot();
        assert_eq!(snapshot.resolve_location("California").unwrap(), "06");
    }

    #[test]
    fn united_states_is_the_sentinel() {
        let empty = Snapshot::load(&SnapshotSources::default(), &LoadPolicy::default()).unwrap();
        assert_eq!(empty.resolve_location("United States").unwrap(), "US");
    }

    #[test]
    fn unknown_location_is_an_error() {
        let snapshot = sample_snapshot();
        let err = snapshot.resolve_location("Atlantis").unwrap_err();
        assert!(matches!(err, QueryError::UnknownLocation(name) if name == "Atlantis"));
    }

    #[test]
    fn query_locations_ordered_by_name() {
        let snapshot = sample_snapshot();
        let names: Vec<String> = snapshot
            .query_locations()
            .unwrap()
            .into_iter()
            .map(|l| l.location_name)
            .collect();
        assert_eq!(names, vec!["Alabama", "California", "United States"]);
    }
}
