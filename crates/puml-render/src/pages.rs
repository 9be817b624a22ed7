//! The per-cycle page aggregate: flat page indexing and render dispatch.

use std::io::Write;
use std::time::Instant;

use crate::block::DiagramBlock;
use crate::cancel::CancelToken;
use crate::diagram::{DiagramDescription, FileStat, SourceParser};
use crate::error::RenderError;
use crate::included::IncludedFiles;
use crate::item::{ImageItem, normalize_description};
use crate::request::{BlockPolicy, ImageFormat, RenderRequest, RenderingType};

/// Ordered diagram blocks plus their flattened page space.
///
/// Built once per render cycle and discarded afterwards; the caller owns
/// any caching across cycles. A global page index `n` is valid iff
/// `n < total_pages()`, and resolves by walking the blocks in order,
/// subtracting each block's page count until the owner is found.
pub struct DiagramPages {
    blocks: Vec<DiagramBlock>,
    total_pages: usize,
    /// The cycle's cancellation flag, polled before each unit of work.
    cancel: CancelToken,
}

impl DiagramPages {
    /// Parse the request's document and materialize its blocks.
    ///
    /// A document that parses into more than one block is an extraction
    /// anomaly under the host convention; it is logged and handled per the
    /// request's [`BlockPolicy`], never rejected.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Cancelled`] when the cycle's token is set.
    pub fn build(
        parser: &dyn SourceParser,
        request: &RenderRequest,
        cancel: &CancelToken,
    ) -> Result<Self, RenderError> {
        let start = Instant::now();
        let parsed = parser.parse(&request.source);
        if parsed.len() > 1 {
            tracing::debug!(
                blocks = parsed.len(),
                policy = ?request.block_policy,
                "document parsed into more than one block"
            );
        }

        let mut blocks = Vec::new();
        let mut total_pages = 0;
        for diagram in parsed {
            cancel.check()?;
            let block = DiagramBlock::new(diagram, request);
            total_pages += block.page_count();
            blocks.push(block);
            if request.block_policy == BlockPolicy::FirstOnly {
                break;
            }
        }

        tracing::debug!(
            total_pages,
            blocks = blocks.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "page aggregate built"
        );
        Ok(Self {
            blocks,
            total_pages,
            cancel: cancel.clone(),
        })
    }

    /// Total page count across all materialized blocks.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// The materialized blocks, in document order.
    #[must_use]
    pub fn blocks(&self) -> &[DiagramBlock] {
        &self.blocks
    }

    /// Map a global page index to its owning block and local index.
    ///
    /// Out-of-range indices are logged and yield `None`; callers treat that
    /// as "no such page", never as a crash.
    fn resolve(&self, page: usize) -> Option<(&DiagramBlock, usize)> {
        let mut remaining = page;
        for block in &self.blocks {
            if remaining < block.page_count() {
                return Some((block, remaining));
            }
            remaining -= block.page_count();
        }
        tracing::error!(
            page,
            total_pages = self.total_pages,
            "page index out of range"
        );
        None
    }

    /// Title of a global page.
    #[must_use]
    pub fn title(&self, page: usize) -> Option<&str> {
        let (block, local) = self.resolve(page)?;
        block.title(local)
    }

    /// Filename for a global page.
    #[must_use]
    pub fn filename(&self, page: usize) -> Option<&str> {
        let (block, local) = self.resolve(page)?;
        block.filename(local)
    }

    /// Render a global page in `format` into `writer`.
    ///
    /// Returns `Ok(None)` for an out-of-range page.
    ///
    /// # Errors
    ///
    /// [`RenderError::Unsupported`] passes through from the exporter
    /// verbatim; any other export failure surfaces as
    /// [`RenderError::Cancelled`], as does a cancellation requested before
    /// the render starts.
    pub fn render_page(
        &self,
        writer: &mut dyn Write,
        page: usize,
        format: ImageFormat,
    ) -> Result<Option<DiagramDescription>, RenderError> {
        self.cancel.check()?;
        let Some((block, local)) = self.resolve(page) else {
            return Ok(None);
        };
        let description = block.diagram().export_page(writer, local, format)?;
        Ok(Some(description))
    }

    /// Second-pass vector render of one page for the hyperlink overlay.
    fn generate_svg(&self, page: usize) -> Result<Vec<u8>, RenderError> {
        let start = Instant::now();
        let mut svg = Vec::new();
        self.render_page(&mut svg, page, ImageFormat::Svg)?;
        tracing::debug!(
            page,
            bytes = svg.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "generated svg side-channel"
        );
        Ok(svg)
    }

    /// Render one global page and package it for the caller.
    ///
    /// When the requested format is already SVG the primary bytes double as
    /// the side-channel; otherwise a second vector pass runs only if the
    /// request asks for hyperlink overlays. `log_page` is the page number
    /// as the caller counts it, used only for diagnostics.
    ///
    /// # Errors
    ///
    /// Same contract as [`render_page`](Self::render_page), plus
    /// [`RenderError::Cancelled`] when the cycle's token is set before work
    /// starts.
    pub fn generate_image_item(
        &self,
        request: &RenderRequest,
        page_source: Option<&str>,
        format: ImageFormat,
        page: usize,
        log_page: usize,
        rendering_type: RenderingType,
    ) -> Result<ImageItem, RenderError> {
        self.cancel.check()?;
        let start = Instant::now();

        let mut bytes = Vec::new();
        let description = self.render_page(&mut bytes, page, format)?;
        tracing::debug!(
            format = format.as_str(),
            page = log_page,
            elapsed_ms = start.elapsed().as_millis(),
            "generated page image"
        );

        let svg_bytes = if request.format == ImageFormat::Svg {
            bytes.clone()
        } else if request.render_url_links {
            self.generate_svg(page)?
        } else {
            Vec::new()
        };

        let description = description.map(|d| normalize_description(d.text));

        Ok(ImageItem {
            base_dir: request.base_dir.clone(),
            format: request.format,
            document_source: request.source.text.clone(),
            page_source: page_source.map(ToOwned::to_owned),
            page,
            description,
            bytes,
            svg_bytes,
            rendering_type,
            title: self.title(page).map(ToOwned::to_owned),
            filename: self.filename(page).map(ToOwned::to_owned),
        })
    }

    /// Collect every file the materialized blocks transitively include,
    /// with mtimes, for the caller's cache invalidation.
    ///
    /// Each block's contribution is sorted by path; blocks contribute in
    /// document order. A block whose include discovery fails is logged and
    /// skipped without aborting collection for the others.
    #[must_use]
    pub fn included_files(&self, stat: &dyn FileStat) -> IncludedFiles {
        let start = Instant::now();
        let mut files = IncludedFiles::default();
        for (index, block) in self.blocks.iter().enumerate() {
            match block.diagram().included_paths() {
                Ok(mut paths) => {
                    paths.sort();
                    for path in paths {
                        let mtime = stat.mtime(&path).unwrap_or(0.0);
                        files.insert(path, mtime);
                    }
                }
                Err(e) => {
                    tracing::warn!(block = index, error = %e, "include discovery failed for block");
                }
            }
        }
        tracing::debug!(
            files = files.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "collected included files"
        );
        files
    }
}

impl std::fmt::Debug for DiagramPages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagramPages")
            .field("blocks", &self.blocks.len())
            .field("total_pages", &self.total_pages)
            .finish()
    }
}
