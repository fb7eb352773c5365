//! The selection a query pass runs against.
//!
//! `ViewContext` bundles what the user has picked (page, location, models,
//! reference date, horizon, score kind) into one value that is handed to
//! view assembly explicitly.

use chrono::NaiveDate;
use flu_hub::{ScoreKind, MODELS, UNITED_STATES};
use serde::Serialize;
use std::fmt;

/// Which page of the dashboard is being assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    #[default]
    Dashboard,
    Evaluations,
}

/// Forecast horizon picked on the evaluation page, in weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HorizonSelection(i32);

impl HorizonSelection {
    pub const MAX: i32 = 3;
    pub const DEFAULT: HorizonSelection = HorizonSelection(1);

    /// Values outside 0..=3 fall back to the default of 1 week.
    pub fn new(weeks: i32) -> Self {
        if (0..=Self::MAX).contains(&weeks) {
            HorizonSelection(weeks)
        } else {
            log::debug!("horizon {} out of range, using {}", weeks, Self::DEFAULT.0);
            Self::DEFAULT
        }
    }

    pub fn value(&self) -> i32 {
        self.0
    }

    pub fn label(&self) -> String {
        match self.0 {
            0 => "Nowcast".to_string(),
            1 => "1 week ahead".to_string(),
            n => format!("{} weeks ahead", n),
        }
    }
}

impl Default for HorizonSelection {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for HorizonSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewContext {
    pub page: Page,
    pub location_name: String,
    pub models: Vec<String>,
    /// `None` selects the latest available reference date.
    pub reference_date: Option<NaiveDate>,
    pub horizon: HorizonSelection,
    pub score_kind: ScoreKind,
}

impl Default for ViewContext {
    /// National view of every known model.
    fn default() -> Self {
        Self {
            page: Page::Dashboard,
            location_name: UNITED_STATES.to_string(),
            models: MODELS.iter().map(|m| m.to_string()).collect(),
            reference_date: None,
            horizon: HorizonSelection::default(),
            score_kind: ScoreKind::Wis,
        }
    }
}

impl ViewContext {
    pub fn dashboard(location_name: &str, models: Vec<String>) -> Self {
        Self {
            location_name: location_name.to_string(),
            models,
            ..Self::default()
        }
    }

    pub fn evaluations(location_name: &str, model: &str) -> Self {
        Self {
            page: Page::Evaluations,
            location_name: location_name.to_string(),
            models: vec![model.to_string()],
            ..Self::default()
        }
    }

    pub fn with_reference_date(mut self, reference_date: Option<NaiveDate>) -> Self {
        self.reference_date = reference_date;
        self
    }

    pub fn with_horizon(mut self, weeks: i32) -> Self {
        self.horizon = HorizonSelection::new(weeks);
        self
    }

    pub fn with_score_kind(mut self, score_kind: ScoreKind) -> Self {
        self.score_kind = score_kind;
        self
    }
}
