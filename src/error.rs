use thiserror::Error;

/// Errors surfaced by input validation, before any computation starts.
///
/// Numerical degeneracies inside the solve (for example an all-zero AIF)
/// are never raised as errors; they are absorbed into the output values
/// instead, see `algorithm::solver`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PerfusionError {
    #[error("AIF length {aif_len} does not match the series time extent {time_extent}")]
    ShapeMismatch { aif_len: usize, time_extent: usize },
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl PerfusionError {
    /// Creates a `PerfusionError::InvalidParameter`.
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::PerfusionError;

    #[test]
    fn test_error_display() {
        let err = PerfusionError::ShapeMismatch { aif_len: 4, time_extent: 5 };
        assert_eq!(
            err.to_string(),
            "AIF length 4 does not match the series time extent 5"
        );

        let err = PerfusionError::invalid_parameter("dt must be positive");
        assert_eq!(err.to_string(), "invalid parameter: dt must be positive");
    }
}
