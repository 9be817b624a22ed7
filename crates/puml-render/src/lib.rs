//! Rendering adapter for the diagram preview feature.
//!
//! A source document holds one or more independent diagram blocks, and each
//! block can expand into several output pages (one per `newpage` section).
//! The preview UI addresses pages by a flat, zero-based global index; this
//! crate owns the bookkeeping that maps such an index back to the right
//! block and local page, and drives the per-block renderer to produce bytes.
//!
//! # Architecture
//!
//! - [`DiagramPages`]: the per-cycle aggregate — ordered blocks plus total
//!   page count, with title/filename lookup, render dispatch, and
//!   included-file collection
//! - [`Diagram`] / [`SourceParser`]: seams for the actual diagram engine,
//!   which is a collaborator, not part of this crate
//! - [`ScannedParser`]: a [`SourceParser`] built on `puml-syntax` scanning,
//!   parameterized by a [`PageExporter`] that supplies the engine half
//! - [`CancelToken`]: cooperative, poll-based cancellation for one cycle
//!
//! The aggregate is built once per render cycle and discarded; any caching
//! of rendered bytes belongs to the caller.
//!
//! # Example
//!
//! ```ignore
//! use puml_render::{CancelToken, DiagramPages, DiagramSource, ImageFormat, RenderRequest};
//!
//! let request = RenderRequest::new(
//!     DiagramSource::new("@startuml\nA -> B\n@enduml"),
//!     ImageFormat::Png,
//! );
//! let cancel = CancelToken::new();
//! let pages = DiagramPages::build(&parser, &request, &cancel)?;
//! for page in 0..pages.total_pages() {
//!     println!("{:?}", pages.title(page));
//! }
//! ```

mod block;
mod cancel;
mod diagram;
mod error;
mod included;
mod item;
mod pages;
mod request;
mod scanned;

pub use block::DiagramBlock;
pub use cancel::CancelToken;
pub use diagram::{Diagram, DiagramDescription, ExportError, FileStat, FsFileStat, SourceParser};
pub use error::RenderError;
pub use included::IncludedFiles;
pub use item::{ImageItem, normalize_description};
pub use pages::DiagramPages;
pub use request::{BlockPolicy, DiagramSource, ImageFormat, RenderRequest, RenderingType};
pub use scanned::{PageExporter, ScannedDiagram, ScannedParser};
