use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::dates::{parse_date, parse_number, parse_whole, weeks_between};
use crate::RowError;

/// The evaluation metrics shipped as precomputed score files.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum ScoreKind {
    #[serde(rename = "WIS")]
    Wis,
    #[serde(rename = "WIS_ratio")]
    WisRatio,
    #[serde(rename = "MAPE")]
    Mape,
}

impl ScoreKind {
    pub const ALL: [ScoreKind; 3] = [ScoreKind::Wis, ScoreKind::WisRatio, ScoreKind::Mape];

    /// Header of this kind's value column in its score file.
    pub fn value_column(&self) -> &'static str {
        match self {
            ScoreKind::Wis => "wis",
            ScoreKind::WisRatio => "wis_ratio",
            ScoreKind::Mape => "MAPE",
        }
    }

    /// Name used in file names, on the command line and in the store.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreKind::Wis => "WIS",
            ScoreKind::WisRatio => "WIS_ratio",
            ScoreKind::Mape => "MAPE",
        }
    }
}

impl fmt::Display for ScoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoreKind {
    type Err = RowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScoreKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RowError::UnknownScoreKind(s.to_string()))
    }
}

/// Column positions of a score file, resolved once from its header.
///
/// Each kind reads its own value column (`wis`, `MAPE` or `wis_ratio`, else a
/// generic `value`); other metric columns in the same file are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreColumns {
    model: usize,
    location: usize,
    reference_date: usize,
    target_end_date: usize,
    horizon: Option<usize>,
    value: usize,
}

impl ScoreColumns {
    pub fn from_headers<'a>(
        headers: impl IntoIterator<Item = &'a str>,
        kind: ScoreKind,
    ) -> Result<Self, RowError> {
        let headers: Vec<&str> = headers.into_iter().map(str::trim).collect();
        let find = |name: &str| headers.iter().position(|h| *h == name);
        let require = |name: &'static str| find(name).ok_or(RowError::MissingColumn(name));

        let value_column = kind.value_column();
        let value = find(value_column)
            .or_else(|| find("value"))
            .ok_or(RowError::MissingColumn(value_column))?;
        Ok(ScoreColumns {
            model: require("Model")?,
            location: require("location")?,
            reference_date: require("reference_date")?,
            target_end_date: require("target_end_date")?,
            horizon: find("horizon"),
            value,
        })
    }

    /// Pick this file's fields out of one record. Short records yield empty
    /// fields.
    pub fn row(&self, fields: &[&str]) -> RawScoreRow {
        let get = |i: usize| fields.get(i).copied().unwrap_or("").to_string();
        RawScoreRow {
            model: get(self.model),
            location: get(self.location),
            reference_date: get(self.reference_date),
            target_end_date: get(self.target_end_date),
            horizon: self.horizon.map(get),
            value: get(self.value),
        }
    }
}

/// A score file row, its value taken from the kind's own column.
#[derive(Debug, Clone, PartialEq)]
pub struct RawScoreRow {
    pub model: String,
    pub location: String,
    pub reference_date: String,
    pub target_end_date: String,
    pub horizon: Option<String>,
    pub value: String,
}

/// One scalar score for a model/location/target week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRecord {
    pub model: String,
    pub location: String,
    pub reference_date: NaiveDate,
    pub target_end_date: NaiveDate,
    pub horizon: i32,
    pub score_kind: ScoreKind,
    pub value: f64,
}

impl RawScoreRow {
    /// Normalize a row read from the `kind` score file.
    ///
    /// The file's `horizon` column is used when present; otherwise the
    /// horizon is derived from the dates.
    pub fn normalize(&self, kind: ScoreKind) -> Result<ScoreRecord, RowError> {
        let model = self.model.trim();
        if model.is_empty() {
            return Err(RowError::EmptyField("Model"));
        }
        let location = self.location.trim();
        if location.is_empty() {
            return Err(RowError::EmptyField("location"));
        }
        let reference_date = parse_date("reference_date", &self.reference_date)?;
        let target_end_date = parse_date("target_end_date", &self.target_end_date)?;
        let horizon = match self.horizon.as_deref().map(str::trim) {
            Some(h) if !h.is_empty() => parse_whole("horizon", h)?,
            _ => weeks_between(&reference_date, &target_end_date),
        };
        Ok(ScoreRecord {
            model: model.to_string(),
            location: location.to_string(),
            reference_date,
            target_end_date,
            horizon,
            score_kind: kind,
            value: parse_number("value", &self.value)?,
        })
    }
}
