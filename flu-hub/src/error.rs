//! Row normalization errors.

/// A field of a raw CSV row that could not be normalized.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RowError {
    #[error("invalid date in '{field}': {value:?}")]
    InvalidDate { field: &'static str, value: String },

    #[error("invalid number in '{field}': {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("quantile level {0} is outside [0, 1]")]
    QuantileOutOfRange(f64),

    #[error("unknown score kind {0:?}")]
    UnknownScoreKind(String),

    #[error("empty '{0}' field")]
    EmptyField(&'static str),

    #[error("missing '{0}' column")]
    MissingColumn(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_date_display() {
        let err = RowError::InvalidDate {
            field: "target_end_date",
            value: "tomorrow".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("target_end_date"));
        assert!(msg.contains("\"tomorrow\""));
    }

    #[test]
    fn test_quantile_display() {
        let msg = format!("{}", RowError::QuantileOutOfRange(1.5));
        assert_eq!(msg, "quantile level 1.5 is outside [0, 1]");
    }
}
