//! Render request types.

use std::path::PathBuf;

/// Output format for a rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    /// Raster output (default for the preview panel).
    #[default]
    Png,
    /// Vector output. Also the side-channel format for hyperlink overlays.
    Svg,
    /// PostScript output for print export.
    Eps,
    /// Unicode text art.
    Utxt,
}

impl ImageFormat {
    /// Parse format from a configuration string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "png" => Some(Self::Png),
            "svg" => Some(Self::Svg),
            "eps" => Some(Self::Eps),
            "utxt" => Some(Self::Utxt),
            _ => None,
        }
    }

    /// Return format as string representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
            Self::Eps => "eps",
            Self::Utxt => "utxt",
        }
    }
}

/// How a page was produced, carried on the result for the caller's cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderingType {
    /// Full render of the whole document.
    #[default]
    Normal,
    /// Incremental render of a changed page only.
    Partial,
}

/// Which parsed blocks of a document are materialized.
///
/// Host editors conventionally extract a single block around the caret, so
/// a document that parses into several blocks is an extraction anomaly;
/// `FirstOnly` reproduces that convention and drops the extras with a
/// diagnostic. `All` renders every block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockPolicy {
    /// Materialize only the first parsed block (host convention).
    #[default]
    FirstOnly,
    /// Materialize every parsed block.
    All,
}

/// Raw source text of diagram markup, plus its origin.
#[derive(Debug, Clone)]
pub struct DiagramSource {
    /// The markup text.
    pub text: String,
    /// Originating file, used for relative include resolution.
    pub source_path: Option<PathBuf>,
    /// Apply environment-specific settings during parsing.
    pub use_settings: bool,
}

impl DiagramSource {
    /// Create a source from bare text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_path: None,
            use_settings: false,
        }
    }

    /// Set the originating file path.
    #[must_use]
    pub fn source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    /// Apply environment-specific settings during parsing.
    #[must_use]
    pub fn use_settings(mut self, use_settings: bool) -> Self {
        self.use_settings = use_settings;
        self
    }
}

/// One render cycle's parameters. Immutable once built.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// Document to render.
    pub source: DiagramSource,
    /// Desired output format.
    pub format: ImageFormat,
    /// Zoom factor, 1.0 = 100%. Applied once per block at construction.
    pub zoom: f64,
    /// Base directory for the result (where exported files would land).
    pub base_dir: Option<PathBuf>,
    /// Render the SVG side-channel for hyperlink overlays.
    pub render_url_links: bool,
    /// Which parsed blocks to materialize.
    pub block_policy: BlockPolicy,
}

impl RenderRequest {
    /// Create a request with defaults: zoom 1.0, no base dir, no link
    /// overlay, first block only.
    #[must_use]
    pub fn new(source: DiagramSource, format: ImageFormat) -> Self {
        Self {
            source,
            format,
            zoom: 1.0,
            base_dir: None,
            render_url_links: false,
            block_policy: BlockPolicy::default(),
        }
    }

    /// Set the zoom factor.
    #[must_use]
    pub fn zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    /// Set the base directory.
    #[must_use]
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Request the SVG side-channel for hyperlink overlays.
    #[must_use]
    pub fn render_url_links(mut self, render: bool) -> Self {
        self.render_url_links = render;
        self
    }

    /// Set the block materialization policy.
    #[must_use]
    pub fn block_policy(mut self, policy: BlockPolicy) -> Self {
        self.block_policy = policy;
        self
    }
}
