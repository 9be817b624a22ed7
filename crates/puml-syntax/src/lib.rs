//! Diagram markup scanning for the preview pipeline.
//!
//! This crate provides the source-side support the rendering layer builds on:
//! - [`blocks`]: splitting a document into `@startuml` / `@enduml` fenced
//!   blocks and counting the pages each block expands to via `newpage`
//! - [`includes`]: `!include` directive discovery for cache invalidation
//! - [`item`]: lightweight syntax items for editor integration (word
//!   tokenization, presentation, rename)
//!
//! No grammar is defined here: everything is directive scanning over raw
//! text, which is all the preview feature needs.
//!
//! # Example
//!
//! ```
//! use puml_syntax::split_blocks;
//!
//! let text = "@startuml\nAlice -> Bob\nnewpage\nBob -> Carol\n@enduml\n";
//! let blocks = split_blocks(text);
//! assert_eq!(blocks.len(), 1);
//! assert_eq!(blocks[0].page_count, 2);
//! ```

mod blocks;
mod includes;
mod item;

pub use blocks::{SourceBlock, inject_settings, split_blocks};
pub use includes::{IncludeScan, collect_includes};
pub use item::{ItemPresentation, SyntaxError, SyntaxItem, rename, scan_items};
