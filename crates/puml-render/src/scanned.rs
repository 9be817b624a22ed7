//! Scanning-backed parser.
//!
//! [`ScannedParser`] implements [`SourceParser`] on top of `puml-syntax`:
//! block fences, `newpage` page counts, titles, and `!include` discovery
//! all come from directive scanning, while the engine half — actually
//! drawing a page — is supplied by the embedder as a [`PageExporter`].
//! This keeps the aggregation layer runnable against any engine that can
//! turn one block's source into bytes.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use puml_syntax::{SourceBlock, collect_includes, inject_settings, split_blocks};

use crate::diagram::{Diagram, DiagramDescription, ExportError, SourceParser};
use crate::request::{DiagramSource, ImageFormat};

/// Engine seam: renders one page of one block's source.
pub trait PageExporter: Send + Sync {
    /// Export `page` of `block_source` in `format` into `writer`.
    ///
    /// # Errors
    ///
    /// Same contract as [`Diagram::export_page`].
    fn export(
        &self,
        writer: &mut dyn Write,
        block_source: &str,
        page: usize,
        format: ImageFormat,
        zoom: f64,
    ) -> Result<DiagramDescription, ExportError>;
}

/// A diagram whose structure comes from directive scanning and whose
/// rendering is delegated to a shared [`PageExporter`].
pub struct ScannedDiagram {
    block: SourceBlock,
    /// Block source after settings injection, handed to the exporter.
    source: String,
    search_dirs: Vec<PathBuf>,
    zoom: f64,
    exporter: Arc<dyn PageExporter>,
}

impl Diagram for ScannedDiagram {
    fn page_count(&self) -> usize {
        self.block.page_count
    }

    fn title(&self, page: usize) -> Option<&str> {
        self.block.titles.get(page)?.as_deref()
    }

    fn filename(&self, page: usize) -> Option<&str> {
        if page >= self.block.page_count {
            return None;
        }
        // The fence name is the hint for every page of the block
        self.block.name.as_deref()
    }

    fn apply_zoom(&mut self, _format: ImageFormat, zoom: f64) {
        self.zoom = zoom;
    }

    fn export_page(
        &self,
        writer: &mut dyn Write,
        page: usize,
        format: ImageFormat,
    ) -> Result<DiagramDescription, ExportError> {
        self.exporter
            .export(writer, &self.source, page, format, self.zoom)
    }

    fn included_paths(&self) -> Result<Vec<PathBuf>, std::io::Error> {
        let scan = collect_includes(&self.source, &self.search_dirs);
        if scan.warnings.is_empty() {
            Ok(scan.paths)
        } else {
            Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                scan.warnings.join("; "),
            ))
        }
    }
}

/// [`SourceParser`] built on directive scanning.
pub struct ScannedParser {
    exporter: Arc<dyn PageExporter>,
    settings: Option<String>,
    include_dirs: Vec<PathBuf>,
}

impl ScannedParser {
    /// Create a parser delegating page rendering to `exporter`.
    #[must_use]
    pub fn new(exporter: Arc<dyn PageExporter>) -> Self {
        Self {
            exporter,
            settings: None,
            include_dirs: Vec::new(),
        }
    }

    /// Environment settings injected after each block's fence when the
    /// source asks for them.
    #[must_use]
    pub fn settings(mut self, settings: impl Into<String>) -> Self {
        self.settings = Some(settings.into());
        self
    }

    /// Directories to search for `!include` files, after the document's
    /// own directory.
    #[must_use]
    pub fn include_dirs(mut self, dirs: &[PathBuf]) -> Self {
        self.include_dirs = dirs.to_vec();
        self
    }
}

impl SourceParser for ScannedParser {
    fn parse(&self, source: &DiagramSource) -> Vec<Box<dyn Diagram>> {
        // The document's own directory wins over configured include dirs
        let mut search_dirs = Vec::with_capacity(self.include_dirs.len() + 1);
        if let Some(parent) = source.source_path.as_deref().and_then(|p| p.parent()) {
            search_dirs.push(parent.to_path_buf());
        }
        search_dirs.extend(self.include_dirs.iter().cloned());

        split_blocks(&source.text)
            .into_iter()
            .map(|block| {
                let block_source = match (&self.settings, source.use_settings) {
                    (Some(settings), true) => inject_settings(&block.source, settings),
                    _ => block.source.clone(),
                };
                Box::new(ScannedDiagram {
                    block,
                    source: block_source,
                    search_dirs: search_dirs.clone(),
                    zoom: 1.0,
                    exporter: Arc::clone(&self.exporter),
                }) as Box<dyn Diagram>
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    /// Exporter double: writes "format:page@zoom" and echoes the source in
    /// the description so tests can see what the engine received.
    struct StubExporter;

    impl PageExporter for StubExporter {
        fn export(
            &self,
            writer: &mut dyn Write,
            block_source: &str,
            page: usize,
            format: ImageFormat,
            zoom: f64,
        ) -> Result<DiagramDescription, ExportError> {
            write!(writer, "{}:{page}@{zoom}", format.as_str())
                .map_err(|e| ExportError::Failed(Box::new(e)))?;
            Ok(DiagramDescription::new(block_source.lines().count().to_string()))
        }
    }

    fn parser() -> ScannedParser {
        ScannedParser::new(Arc::new(StubExporter))
    }

    #[test]
    fn test_parse_splits_blocks_in_document_order() {
        let source = DiagramSource::new(
            "@startuml\nA -> B\n@enduml\n@startuml\nC -> D\nnewpage\nD -> E\n@enduml\n",
        );

        let diagrams = parser().parse(&source);

        assert_eq!(diagrams.len(), 2);
        assert_eq!(diagrams[0].page_count(), 1);
        assert_eq!(diagrams[1].page_count(), 2);
    }

    #[test]
    fn test_parse_empty_document() {
        assert!(parser().parse(&DiagramSource::new("no diagrams")).is_empty());
    }

    #[test]
    fn test_titles_and_filename_hint() {
        let source =
            DiagramSource::new("@startuml billing\ntitle Invoices\nA -> B\nnewpage\nB -> C\n@enduml\n");

        let diagrams = parser().parse(&source);

        assert_eq!(diagrams[0].title(0), Some("Invoices"));
        assert_eq!(diagrams[0].title(1), None);
        assert_eq!(diagrams[0].filename(0), Some("billing"));
        assert_eq!(diagrams[0].filename(1), Some("billing"));
        assert_eq!(diagrams[0].filename(2), None);
    }

    #[test]
    fn test_settings_injected_only_when_requested() {
        let with = DiagramSource::new("@startuml\nA -> B\n@enduml\n").use_settings(true);
        let without = DiagramSource::new("@startuml\nA -> B\n@enduml\n");
        let parser = parser().settings("skinparam dpi 192");

        let mut out = Vec::new();
        let lines_with = parser.parse(&with)[0]
            .export_page(&mut out, 0, ImageFormat::Png)
            .unwrap();
        let lines_without = parser.parse(&without)[0]
            .export_page(&mut out, 0, ImageFormat::Png)
            .unwrap();

        // One extra line when the settings block is spliced in
        assert_eq!(lines_with.text, "4");
        assert_eq!(lines_without.text, "3");
    }

    #[test]
    fn test_zoom_threaded_to_exporter() {
        let source = DiagramSource::new("@startuml\nA -> B\n@enduml\n");
        let mut diagrams = parser().parse(&source);
        diagrams[0].apply_zoom(ImageFormat::Png, 2.5);

        let mut out = Vec::new();
        diagrams[0]
            .export_page(&mut out, 0, ImageFormat::Png)
            .unwrap();

        assert_eq!(out, b"png:0@2.5");
    }

    #[test]
    fn test_included_paths_resolved_against_document_dir() {
        let dir = tempfile::tempdir().unwrap();
        let included = dir.path().join("style.iuml");
        std::fs::write(&included, "skinparam monochrome true").unwrap();
        let doc_path = dir.path().join("flow.puml");

        let source = DiagramSource::new("@startuml\n!include style.iuml\nA -> B\n@enduml\n")
            .source_path(doc_path);

        let diagrams = parser().parse(&source);

        assert_eq!(diagrams[0].included_paths().unwrap(), vec![included]);
    }

    #[test]
    fn test_missing_include_surfaces_as_io_error() {
        let source = DiagramSource::new("@startuml\n!include gone.iuml\n@enduml\n");

        let err = parser().parse(&source)[0].included_paths().unwrap_err();

        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
        assert!(err.to_string().contains("gone.iuml"));
    }
}
