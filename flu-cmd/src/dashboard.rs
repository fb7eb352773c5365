//! Dashboard page assembly.

use crate::ViewError;
use chrono::NaiveDate;
use flu_data::{
    build_trend_series, pivot, summarize, DatePoint, EnsembleSummary, PipelineError,
    QuantilePivot, TrendSeries, ViewContext,
};
use flu_hub::{ForecastRecord, MODELS};
use flu_store::Snapshot;
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything the dashboard page draws for one selection.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub location: String,
    pub location_name: String,
    pub reference_date: NaiveDate,
    /// Reference dates available for the selection, ascending.
    pub reference_dates: Vec<NaiveDate>,
    pub summary: EnsembleSummary,
    /// Trend series per model with forecast rows at `reference_date`. The
    /// observed history is carried once in `observed`, not per model.
    pub trends: BTreeMap<String, TrendSeries>,
    pub observed: Vec<DatePoint>,
    pub last_observed: Option<DatePoint>,
    pub models_active: usize,
    pub models_total: usize,
}

/// Pick the requested reference date when it is available, otherwise the
/// latest one.
fn select_reference_date(
    available: &[NaiveDate],
    requested: Option<NaiveDate>,
) -> Option<NaiveDate> {
    let latest = available.last().copied();
    match requested {
        Some(date) if available.contains(&date) => Some(date),
        Some(date) => {
            if let Some(latest) = latest {
                log::warn!(
                    "reference date {} unavailable, showing latest {}",
                    date,
                    latest
                );
            }
            latest
        }
        None => latest,
    }
}

fn pivots_by_model(records: &[ForecastRecord]) -> BTreeMap<String, QuantilePivot> {
    let mut by_model: BTreeMap<String, Vec<ForecastRecord>> = BTreeMap::new();
    for record in records {
        by_model
            .entry(record.model.clone())
            .or_default()
            .push(record.clone());
    }
    by_model
        .into_iter()
        .map(|(model, rows)| {
            let pivot = pivot(&rows);
            (model, pivot)
        })
        .collect()
}

/// Assemble the dashboard for `ctx`.
pub fn dashboard(snapshot: &Snapshot, ctx: &ViewContext) -> Result<DashboardView, ViewError> {
    if ctx.models.is_empty() {
        return Err(PipelineError::no_models().into());
    }
    let location = snapshot.resolve_location(&ctx.location_name)?;

    let reference_dates = snapshot.query_reference_dates(&location, &ctx.models)?;
    let reference_date = select_reference_date(&reference_dates, ctx.reference_date)
        .ok_or_else(PipelineError::no_forecasts)?;

    let records = snapshot.query_forecasts(&location, &ctx.models, Some(reference_date), None)?;
    let pivots = pivots_by_model(&records);
    let summary = summarize(&pivots)?;

    let trends = pivots
        .iter()
        .map(|(model, pivot)| {
            let series = build_trend_series(pivot, &[]);
            if !series.missing.is_empty() {
                log::warn!(
                    "{} at {}: {} named quantiles missing",
                    model,
                    reference_date,
                    series.missing.len()
                );
            }
            (model.clone(), series)
        })
        .collect();

    let observed = snapshot
        .query_observations(&location, None)?
        .iter()
        .map(|o| DatePoint::new(o.date, o.value))
        .collect();
    let last_observed = snapshot
        .latest_observation(&location)?
        .map(|o| DatePoint::new(o.date, o.value));

    log::info!(
        "dashboard: {} at {} with {} of {} models",
        ctx.location_name,
        reference_date,
        summary.model_count,
        ctx.models.len()
    );
    Ok(DashboardView {
        location,
        location_name: ctx.location_name.clone(),
        reference_date,
        reference_dates,
        summary,
        trends,
        observed,
        last_observed,
        models_active: ctx.models.len(),
        models_total: MODELS.len(),
    })
}
