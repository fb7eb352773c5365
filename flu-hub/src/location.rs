use serde::{Deserialize, Serialize};

use crate::RowError;

/// A `locations.csv` row; `abbreviation` and `population` are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLocationRow {
    pub location: String,
    pub location_name: String,
}

/// Maps a display name (e.g. "California") to its hub identifier ("06").
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct LocationEntry {
    pub location: String,
    pub location_name: String,
}

impl TryFrom<&RawLocationRow> for LocationEntry {
    type Error = RowError;

    fn try_from(row: &RawLocationRow) -> Result<Self, Self::Error> {
        let location = row.location.trim();
        let location_name = row.location_name.trim();
        if location.is_empty() {
            return Err(RowError::EmptyField("location"));
        }
        if location_name.is_empty() {
            return Err(RowError::EmptyField("location_name"));
        }
        Ok(LocationEntry {
            location: location.to_string(),
            location_name: location_name.to_string(),
        })
    }
}
