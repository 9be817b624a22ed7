//! Syntax items for editor integration.
//!
//! The editor treats identifier-like words in diagram markup as navigable
//! items: they show up in structure views, can be renamed, and resolve
//! references by text. An item is just a word plus its byte offset; the
//! host maps offsets back into its own document model.

use std::sync::LazyLock;

use regex::Regex;

static WORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").unwrap());

/// An identifier-like word in diagram markup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxItem {
    /// Item text.
    pub text: String,
    /// Byte offset of the item within the document.
    pub offset: usize,
}

/// How an item is shown in editor structure views.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemPresentation {
    /// Presentable text (the item itself).
    pub text: String,
    /// Location hint, e.g. a containing file name or `"line: 3"`.
    pub location: Option<String>,
}

/// Error produced by item operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SyntaxError {
    /// Replacement text is not a single identifier-like word.
    #[error("'{0}' is not a valid item name")]
    InvalidName(String),
}

/// Scan a document for syntax items.
#[must_use]
pub fn scan_items(text: &str) -> Vec<SyntaxItem> {
    WORD_PATTERN
        .find_iter(text)
        .map(|m| SyntaxItem {
            text: m.as_str().to_owned(),
            offset: m.start(),
        })
        .collect()
}

impl SyntaxItem {
    /// Presentation with the containing file's name as the location.
    #[must_use]
    pub fn presentation(&self, file_name: Option<&str>) -> ItemPresentation {
        ItemPresentation {
            text: self.text.clone(),
            location: file_name.map(ToOwned::to_owned),
        }
    }

    /// Presentation locating the item by line within `document_text`.
    ///
    /// Lines are 1-based. Offsets past the end of the document yield no
    /// location rather than a bogus one.
    #[must_use]
    pub fn presentation_in_document(&self, document_text: &str) -> ItemPresentation {
        let location = (self.offset <= document_text.len()).then(|| {
            let line = document_text.as_bytes()[..self.offset]
                .iter()
                .filter(|b| **b == b'\n')
                .count()
                + 1;
            format!("line: {line}")
        });
        ItemPresentation {
            text: self.text.clone(),
            location,
        }
    }
}

/// Rename an item, producing the replacement token.
///
/// The new name must itself be a single identifier-like word; the host
/// splices the returned item's text over the old one's range.
pub fn rename(item: &SyntaxItem, new_name: &str) -> Result<SyntaxItem, SyntaxError> {
    let whole_word = WORD_PATTERN
        .find(new_name)
        .is_some_and(|m| m.start() == 0 && m.end() == new_name.len());
    if !whole_word {
        return Err(SyntaxError::InvalidName(new_name.to_owned()));
    }
    Ok(SyntaxItem {
        text: new_name.to_owned(),
        offset: item.offset,
    })
}
