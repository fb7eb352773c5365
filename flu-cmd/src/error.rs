use flu_data::PipelineError;
use flu_store::QueryError;

/// Failures of a single view assembly pass.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl ViewError {
    /// The reason of an empty selection, which callers render as "no data"
    /// instead of failing.
    pub fn empty_selection(&self) -> Option<&'static str> {
        match self {
            ViewError::Pipeline(PipelineError::EmptySelection(reason)) => Some(reason),
            _ => None,
        }
    }
}
