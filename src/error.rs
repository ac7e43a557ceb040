use thiserror::Error;

/// Fatal pipeline failures. Row-level problems never surface here; they are
/// counted by the stage that sees them.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("input is missing required column(s): {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("cannot parse config file: {0}")]
    ConfigFile(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_lists_columns() {
        let err = PipelineError::Schema {
            missing: vec!["close".into(), "volume".into()],
        };
        assert_eq!(
            err.to_string(),
            "input is missing required column(s): close, volume"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: PipelineError = io.into();
        assert!(matches!(err, PipelineError::Io(_)));
    }
}
