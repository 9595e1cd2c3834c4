use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading pricing, reading usage or computing costs.
#[derive(Debug, Error)]
pub enum EstimatorError {
    /// The pricing document is missing, unreadable or malformed.
    #[error("configuration error: {0}")]
    Config(String),

    /// A usage figure handed to a calculator is outside its domain.
    #[error("validation error: {0}")]
    Validation(String),

    /// A usage source could not be read or contained bad observations.
    #[error("upstream data error in {source_name}: {message}")]
    UpstreamData {
        source_name: String,
        message: String,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Validation,
    UpstreamData,
    Io,
}

impl EstimatorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EstimatorError::Config(_) => ErrorKind::Config,
            EstimatorError::Validation(_) => ErrorKind::Validation,
            EstimatorError::UpstreamData { .. } => ErrorKind::UpstreamData,
            EstimatorError::Io { .. } => ErrorKind::Io,
        }
    }

    pub(crate) fn upstream(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        EstimatorError::UpstreamData {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EstimatorError>;

/// Rejects negative, NaN and infinite volumes.
pub(crate) fn ensure_volume(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(EstimatorError::Validation(format!(
            "{} must be a finite number, got {}",
            name, value
        )));
    }
    if value < 0.0 {
        return Err(EstimatorError::Validation(format!(
            "{} must be non-negative, got {}",
            name, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_volume_accepts_zero() {
        assert!(ensure_volume("standard_gb", 0.0).is_ok());
    }

    #[test]
    fn test_ensure_volume_rejects_negative_and_nan() {
        let err = ensure_volume("ia_gb", -1.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("ia_gb"));

        assert!(ensure_volume("ia_gb", f64::NAN).is_err());
        assert!(ensure_volume("ia_gb", f64::INFINITY).is_err());
    }

    #[test]
    fn test_io_error_keeps_path() {
        let err = EstimatorError::Io {
            path: PathBuf::from("/tmp/usage.jsonl"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("/tmp/usage.jsonl"));
    }
}
