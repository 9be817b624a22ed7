//! One materialized diagram block.

use std::time::Instant;

use crate::diagram::Diagram;
use crate::request::RenderRequest;

/// One independently parsed diagram unit, ready to render.
///
/// Created once from a parsed diagram and immutable thereafter: the zoom
/// factor is applied at construction, and the page count plus title and
/// filename tables are snapshotted so lookups never touch the engine again.
pub struct DiagramBlock {
    diagram: Box<dyn Diagram>,
    page_count: usize,
    titles: Vec<Option<String>>,
    filenames: Vec<Option<String>>,
}

impl DiagramBlock {
    /// Materialize a block, applying the request's zoom once.
    pub(crate) fn new(mut diagram: Box<dyn Diagram>, request: &RenderRequest) -> Self {
        let start = Instant::now();
        diagram.apply_zoom(request.format, request.zoom);
        let page_count = diagram.page_count();
        let titles = (0..page_count)
            .map(|page| diagram.title(page).map(ToOwned::to_owned))
            .collect();
        let filenames = (0..page_count)
            .map(|page| diagram.filename(page).map(ToOwned::to_owned))
            .collect();
        tracing::debug!(
            page_count,
            elapsed_ms = start.elapsed().as_millis(),
            "block materialized"
        );
        Self {
            diagram,
            page_count,
            titles,
            filenames,
        }
    }

    /// Number of pages this block expands to.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Title of a local page.
    #[must_use]
    pub fn title(&self, page: usize) -> Option<&str> {
        self.titles.get(page)?.as_deref()
    }

    /// Filename for a local page. Falls back to the page title when the
    /// markup carries no explicit filename hint.
    #[must_use]
    pub fn filename(&self, page: usize) -> Option<&str> {
        self.filenames
            .get(page)?
            .as_deref()
            .or_else(|| self.title(page))
    }

    /// The underlying diagram handle.
    #[must_use]
    pub fn diagram(&self) -> &dyn Diagram {
        self.diagram.as_ref()
    }
}

impl std::fmt::Debug for DiagramBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagramBlock")
            .field("page_count", &self.page_count)
            .field("titles", &self.titles)
            .field("filenames", &self.filenames)
            .finish_non_exhaustive()
    }
}
