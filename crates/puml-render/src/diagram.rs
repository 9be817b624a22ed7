//! Collaborator seams for the diagram engine and the filesystem.
//!
//! The actual layout/rendering engine is external; this module pins down
//! the contract the aggregation layer consumes. [`SourceParser`] turns a
//! document into diagrams, each [`Diagram`] exports its pages, and
//! [`FileStat`] supplies modification times for cache invalidation.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::request::{DiagramSource, ImageFormat};

/// Description string an export produces, e.g. `"(2 entities)"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiagramDescription {
    /// Free-text description of what was exported.
    pub text: String,
}

impl DiagramDescription {
    /// Create a description from text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Failure raised by [`Diagram::export_page`].
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// This diagram kind cannot be exported in the requested format.
    /// Distinct from other failures so callers can pick a fallback format.
    #[error("format {} is not supported for this diagram", format.as_str())]
    Unsupported {
        /// The rejected output format.
        format: ImageFormat,
    },
    /// Any other export failure (I/O, internal engine fault).
    #[error("export failed: {0}")]
    Failed(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// One parsed diagram unit, as exposed by the engine.
pub trait Diagram: Send + Sync {
    /// Number of pages this diagram expands to.
    fn page_count(&self) -> usize;

    /// Title of a local page, if the markup names one.
    fn title(&self, page: usize) -> Option<&str>;

    /// Filename hint for a local page, if the markup carries one.
    fn filename(&self, page: usize) -> Option<&str>;

    /// Apply a zoom factor. Called exactly once, at block construction.
    fn apply_zoom(&mut self, format: ImageFormat, zoom: f64);

    /// Export one local page in the given format into `writer`.
    ///
    /// # Errors
    ///
    /// [`ExportError::Unsupported`] when the format cannot apply to this
    /// diagram kind; [`ExportError::Failed`] for anything else.
    fn export_page(
        &self,
        writer: &mut dyn Write,
        page: usize,
        format: ImageFormat,
    ) -> Result<DiagramDescription, ExportError>;

    /// Files transitively included by this diagram's source.
    ///
    /// # Errors
    ///
    /// I/O error when include discovery fails for this diagram (e.g. an
    /// include path vanished). The caller treats this as a per-block
    /// partial failure.
    fn included_paths(&self) -> Result<Vec<PathBuf>, std::io::Error>;
}

/// Parses a document into an ordered sequence of diagrams.
pub trait SourceParser {
    /// Parse `source` into zero or more diagrams, in document order.
    fn parse(&self, source: &DiagramSource) -> Vec<Box<dyn Diagram>>;
}

/// Last-modified lookup, abstracted for testing.
pub trait FileStat {
    /// Modification time of `path` as Unix seconds, `None` if unknown.
    fn mtime(&self, path: &Path) -> Option<f64>;
}

/// [`FileStat`] backed by the real filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsFileStat;

impl FileStat for FsFileStat {
    fn mtime(&self, path: &Path) -> Option<f64> {
        let modified = std::fs::metadata(path).ok()?.modified().ok()?;
        let since_epoch = modified.duration_since(std::time::UNIX_EPOCH).ok()?;
        Some(since_epoch.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fs_file_stat_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diagram.puml");
        std::fs::write(&path, "@startuml\n@enduml").unwrap();

        let mtime = FsFileStat.mtime(&path).unwrap();

        assert!(mtime > 0.0);
    }

    #[test]
    fn test_fs_file_stat_missing_file() {
        assert_eq!(FsFileStat.mtime(Path::new("/no/such/file.puml")), None);
    }

    #[test]
    fn test_export_error_display() {
        let err = ExportError::Unsupported {
            format: ImageFormat::Eps,
        };
        assert_eq!(err.to_string(), "format eps is not supported for this diagram");
    }
}
