//! Rendered page result.

use std::path::PathBuf;

use crate::request::{ImageFormat, RenderingType};

/// Marker substring in engine descriptions that carry an entity count
/// listing, e.g. `"(3 entities)"`.
const ENTITY_COUNT_MARKER: &str = "entities";

/// Token substituted for entity-count descriptions.
const ENTITY_COUNT_TOKEN: &str = "ok";

/// Collapse entity-count descriptions to a constant token.
///
/// Downstream consumers only care whether the export succeeded, and the
/// entity listing can be large. The substring check mirrors the engine's
/// free-text contract; swap in a structured flag here if the engine ever
/// grows one.
#[must_use]
pub fn normalize_description(description: String) -> String {
    if description.contains(ENTITY_COUNT_MARKER) {
        ENTITY_COUNT_TOKEN.to_owned()
    } else {
        description
    }
}

/// One rendered page, handed to the caller.
///
/// Ownership transfers to the caller; nothing here is cached by the
/// rendering layer.
#[derive(Debug, Clone)]
pub struct ImageItem {
    /// Base directory of the request.
    pub base_dir: Option<PathBuf>,
    /// Format the request asked for.
    pub format: ImageFormat,
    /// Full document source the page came from.
    pub document_source: String,
    /// Source of just this page, when the caller tracked it.
    pub page_source: Option<String>,
    /// Global page index.
    pub page: usize,
    /// Normalized export description, absent when the page was out of range.
    pub description: Option<String>,
    /// Primary rendered bytes.
    pub bytes: Vec<u8>,
    /// SVG side-channel bytes for hyperlink overlays; empty when not
    /// requested.
    pub svg_bytes: Vec<u8>,
    /// How this page was produced.
    pub rendering_type: RenderingType,
    /// Page title, if the markup names one.
    pub title: Option<String>,
    /// Page filename hint.
    pub filename: Option<String>,
}

impl ImageItem {
    /// Whether the side-channel render is present.
    #[must_use]
    pub fn has_svg(&self) -> bool {
        !self.svg_bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_entity_count_description() {
        assert_eq!(normalize_description("(3 entities)".to_owned()), "ok");
    }

    #[test]
    fn test_normalize_marker_anywhere_in_text() {
        assert_eq!(
            normalize_description("class diagram, 12 entities listed".to_owned()),
            "ok"
        );
    }

    #[test]
    fn test_normalize_keeps_other_descriptions() {
        assert_eq!(
            normalize_description("sequence diagram".to_owned()),
            "sequence diagram"
        );
        assert_eq!(normalize_description(String::new()), "");
    }
}
