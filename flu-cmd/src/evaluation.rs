//! Evaluation page assembly.

use crate::ViewError;
use chrono::NaiveDate;
use flu_data::{
    build_interval_boxes, build_score_series, evaluation_window, group_by_reference_date,
    DatePoint, IntervalBox, PipelineError, ViewContext,
};
use flu_hub::ScoreKind;
use flu_store::Snapshot;
use serde::Serialize;

/// X-axis range of the evaluation charts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EvaluationWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationView {
    pub location: String,
    pub location_name: String,
    pub model: String,
    pub horizon: i32,
    pub horizon_label: String,
    pub score_kind: ScoreKind,
    pub interval_boxes: Vec<IntervalBox>,
    pub observed: Vec<DatePoint>,
    pub scores: Vec<DatePoint>,
    pub window: Option<EvaluationWindow>,
}

/// Assemble the evaluation page for the first model of `ctx`.
pub fn evaluation(snapshot: &Snapshot, ctx: &ViewContext) -> Result<EvaluationView, ViewError> {
    let model = ctx.models.first().ok_or_else(PipelineError::no_models)?;
    let location = snapshot.resolve_location(&ctx.location_name)?;
    let horizon = ctx.horizon.value();

    let records =
        snapshot.query_forecasts(&location, std::slice::from_ref(model), None, Some(horizon))?;
    let interval_boxes = build_interval_boxes(&group_by_reference_date(&records));

    let observed = snapshot
        .query_observations(&location, None)?
        .iter()
        .map(|o| DatePoint::new(o.date, o.value))
        .collect();

    let scores = build_score_series(&snapshot.query_scores(
        model,
        &location,
        horizon,
        ctx.score_kind,
    )?);

    let window = evaluation_window(snapshot.first_observation_date()?, &records)
        .map(|(start, end)| EvaluationWindow { start, end });

    log::info!(
        "evaluation: {} {} {} with {} boxes, {} {} scores",
        model,
        ctx.location_name,
        ctx.horizon,
        interval_boxes.len(),
        scores.len(),
        ctx.score_kind
    );
    Ok(EvaluationView {
        location,
        location_name: ctx.location_name.clone(),
        model: model.clone(),
        horizon,
        horizon_label: ctx.horizon.label(),
        score_kind: ctx.score_kind,
        interval_boxes,
        observed,
        scores,
        window,
    })
}
