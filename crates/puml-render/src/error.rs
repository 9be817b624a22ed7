//! Error type for the render boundary.

use crate::diagram::ExportError;
use crate::request::ImageFormat;

/// Error returned when a render cycle fails.
///
/// Exactly two things can go wrong at this boundary: the requested format
/// structurally cannot apply to the diagram kind (the caller may fall back
/// to another format), or the cycle produced no usable result (cancellation
/// or any other export-time failure, collapsed into one retryable signal).
/// A page index with no owning block is not an error; lookups return `None`
/// for it instead.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The requested format is structurally unsupported for this diagram
    /// kind. Propagated verbatim so the caller can pick a fallback format.
    #[error("format {} is not supported for this diagram", format.as_str())]
    Unsupported {
        /// The rejected output format.
        format: ImageFormat,
    },
    /// Rendering was cancelled or aborted. Covers external cancellation and
    /// every other export failure; the original cause is kept for logging.
    #[error("rendering was cancelled")]
    Cancelled {
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl RenderError {
    /// Cancellation requested externally, no underlying cause.
    #[must_use]
    pub fn cancelled() -> Self {
        Self::Cancelled { source: None }
    }

    /// Whether the caller can retry with a different format.
    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}

impl From<ExportError> for RenderError {
    fn from(e: ExportError) -> Self {
        match e {
            ExportError::Unsupported { format } => Self::Unsupported { format },
            ExportError::Failed(source) => Self::Cancelled {
                source: Some(source),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_passes_through_unchanged() {
        let err: RenderError = ExportError::Unsupported {
            format: ImageFormat::Eps,
        }
        .into();

        assert!(matches!(
            err,
            RenderError::Unsupported {
                format: ImageFormat::Eps
            }
        ));
    }

    #[test]
    fn test_other_export_failures_collapse_to_cancelled() {
        let io = std::io::Error::other("stream closed");
        let err: RenderError = ExportError::Failed(Box::new(io)).into();

        match err {
            RenderError::Cancelled { source } => {
                assert!(source.unwrap().to_string().contains("stream closed"));
            }
            other => panic!("expected Cancelled, got {other:?}"),
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            RenderError::cancelled().to_string(),
            "rendering was cancelled"
        );
        let err = RenderError::Unsupported {
            format: ImageFormat::Utxt,
        };
        assert_eq!(err.to_string(), "format utxt is not supported for this diagram");
    }
}
