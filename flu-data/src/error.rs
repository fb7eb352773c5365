//! Pipeline error types.

/// Errors a query pass can raise. Callers render a "no data" state for
/// these rather than failing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    /// No model selected, or the selection has no forecast rows.
    #[error("no data for the current selection: {0}")]
    EmptySelection(&'static str),
}

impl PipelineError {
    pub fn no_models() -> Self {
        PipelineError::EmptySelection("no models selected")
    }

    pub fn no_forecasts() -> Self {
        PipelineError::EmptySelection("no forecast rows")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_selection_display() {
        let msg = format!("{}", PipelineError::no_models());
        assert_eq!(msg, "no data for the current selection: no models selected");
    }
}
