//! Block extraction and page counting.
//!
//! A document may contain several independent diagram blocks, each fenced by
//! `@startuml` / `@enduml`. Within a block, `newpage` directives split the
//! diagram into multiple output pages and `title` directives name the page
//! they appear in. The optional word after `@startuml` is a filename hint.

use std::sync::LazyLock;

use regex::Regex;

static START_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@startuml(?:[ \t]+(\S+).*)?$").unwrap());
static TITLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*title[ \t]+(.+?)\s*$").unwrap());
static NEWPAGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*newpage\b").unwrap());

/// One fenced diagram block extracted from a source document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceBlock {
    /// Full block text, including the `@startuml` / `@enduml` fence lines.
    pub source: String,
    /// Filename hint from the `@startuml <name>` fence, if present.
    pub name: Option<String>,
    /// Byte offset of the block within the document.
    pub offset: usize,
    /// Number of output pages (`newpage` count + 1).
    pub page_count: usize,
    /// Per-page titles from `title` directives, keyed by local page index.
    pub titles: Vec<Option<String>>,
}

/// Split a document into fenced diagram blocks.
///
/// Text outside `@startuml` / `@enduml` fences is skipped. An unterminated
/// `@startuml` fence runs to the end of the document.
#[must_use]
pub fn split_blocks(text: &str) -> Vec<SourceBlock> {
    let mut blocks = Vec::new();
    // (start offset, fence name)
    let mut open: Option<(usize, Option<String>)> = None;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let trimmed = line.trim_end_matches(['\n', '\r']);
        match &open {
            None => {
                if let Some(caps) = START_PATTERN.captures(trimmed) {
                    let name = caps.get(1).map(|m| m.as_str().to_owned());
                    open = Some((offset, name));
                }
            }
            Some((start, name)) => {
                if trimmed.trim_start().starts_with("@enduml") {
                    let end = offset + line.len();
                    blocks.push(make_block(&text[*start..end], *start, name.clone()));
                    open = None;
                }
            }
        }
        offset += line.len();
    }

    if let Some((start, name)) = open {
        blocks.push(make_block(&text[start..], start, name));
    }

    blocks
}

fn make_block(source: &str, offset: usize, name: Option<String>) -> SourceBlock {
    let (page_count, titles) = scan_pages(source);
    SourceBlock {
        source: source.to_owned(),
        name,
        offset,
        page_count,
        titles,
    }
}

/// Count pages and collect per-page titles within one block.
///
/// Every `newpage` directive starts a new page; a `title` directive names
/// the page it appears in. A later `title` in the same page wins, matching
/// how the renderer applies directives top to bottom.
fn scan_pages(block_source: &str) -> (usize, Vec<Option<String>>) {
    let mut titles = vec![None];
    for line in block_source.lines() {
        if NEWPAGE_PATTERN.is_match(line) {
            titles.push(None);
        } else if let Some(caps) = TITLE_PATTERN.captures(line) {
            let page = titles.len() - 1;
            titles[page] = Some(caps[1].to_owned());
        }
    }
    (titles.len(), titles)
}

/// Inject environment settings after the `@startuml` fence line.
///
/// The preview host carries per-IDE settings (skinparams and the like) that
/// apply to every diagram; they take effect only inside the fence, so they
/// are spliced in right after it. Falls back to prepending when the block
/// has no fence line.
#[must_use]
pub fn inject_settings(block_source: &str, settings: &str) -> String {
    let settings = settings.trim_end();
    if settings.is_empty() {
        return block_source.to_owned();
    }

    if let Some(pos) = block_source.find("@startuml") {
        let after_fence = &block_source[pos..];
        if let Some(newline_pos) = after_fence.find('\n') {
            let insert_pos = pos + newline_pos + 1;
            let mut result =
                String::with_capacity(block_source.len() + settings.len() + 1);
            result.push_str(&block_source[..insert_pos]);
            result.push_str(settings);
            result.push('\n');
            result.push_str(&block_source[insert_pos..]);
            return result;
        }
    }
    format!("{settings}\n{block_source}")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_split_single_block() {
        let text = "@startuml\nAlice -> Bob\n@enduml\n";
        let blocks = split_blocks(text);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].source, text);
        assert_eq!(blocks[0].offset, 0);
        assert_eq!(blocks[0].name, None);
        assert_eq!(blocks[0].page_count, 1);
    }

    #[test]
    fn test_split_multiple_blocks_with_prose_between() {
        let text = "prose before\n@startuml\nA -> B\n@enduml\nprose\n@startuml\nC -> D\n@enduml\n";
        let blocks = split_blocks(text);

        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].source.contains("A -> B"));
        assert!(blocks[1].source.contains("C -> D"));
        assert_eq!(blocks[0].offset, text.find("@startuml").unwrap());
        assert!(blocks[1].offset > blocks[0].offset);
    }

    #[test]
    fn test_split_block_name_is_filename_hint() {
        let blocks = split_blocks("@startuml invoice\nA -> B\n@enduml\n");

        assert_eq!(blocks[0].name.as_deref(), Some("invoice"));
    }

    #[test]
    fn test_split_fence_with_trailing_text_takes_first_word() {
        let blocks = split_blocks("@startuml invoice draft 2\nA -> B\n@enduml\n");

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].name.as_deref(), Some("invoice"));
    }

    #[test]
    fn test_split_fence_prefix_word_is_not_a_fence() {
        assert!(split_blocks("@startumlx\nA -> B\n@enduml\n").is_empty());
    }

    #[test]
    fn test_split_unterminated_block_runs_to_end() {
        let blocks = split_blocks("@startuml\nA -> B\n");

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].source, "@startuml\nA -> B\n");
    }

    #[test]
    fn test_split_no_blocks() {
        assert!(split_blocks("just prose\nno diagrams here\n").is_empty());
    }

    #[test]
    fn test_newpage_counts_pages() {
        let blocks = split_blocks("@startuml\nA -> B\nnewpage\nB -> C\nnewpage\nC -> D\n@enduml\n");

        assert_eq!(blocks[0].page_count, 3);
    }

    #[test]
    fn test_titles_attach_to_their_page() {
        let text = "@startuml\ntitle First\nA -> B\nnewpage\nB -> C\nnewpage\ntitle Third\nC -> D\n@enduml\n";
        let blocks = split_blocks(text);

        assert_eq!(
            blocks[0].titles,
            vec![Some("First".to_owned()), None, Some("Third".to_owned())]
        );
    }

    #[test]
    fn test_later_title_in_same_page_wins() {
        let blocks = split_blocks("@startuml\ntitle Old\ntitle New\nA -> B\n@enduml\n");

        assert_eq!(blocks[0].titles, vec![Some("New".to_owned())]);
    }

    #[test]
    fn test_indented_newpage_counts() {
        let blocks = split_blocks("@startuml\nA -> B\n  newpage\nB -> C\n@enduml\n");

        assert_eq!(blocks[0].page_count, 2);
    }

    #[test]
    fn test_newpage_prefix_word_does_not_count() {
        // "newpages" is an ordinary identifier, not a directive
        let blocks = split_blocks("@startuml\nnewpages -> B\n@enduml\n");

        assert_eq!(blocks[0].page_count, 1);
    }

    #[test]
    fn test_crlf_line_endings() {
        let blocks = split_blocks("@startuml\r\nA -> B\r\n@enduml\r\n");

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].page_count, 1);
    }

    #[test]
    fn test_inject_settings_after_fence() {
        let result = inject_settings("@startuml\nA -> B\n@enduml\n", "skinparam dpi 192");

        assert_eq!(result, "@startuml\nskinparam dpi 192\nA -> B\n@enduml\n");
    }

    #[test]
    fn test_inject_settings_no_fence_prepends() {
        let result = inject_settings("A -> B\n", "skinparam dpi 192");

        assert_eq!(result, "skinparam dpi 192\nA -> B\n");
    }

    #[test]
    fn test_inject_empty_settings_is_identity() {
        let source = "@startuml\nA -> B\n@enduml\n";

        assert_eq!(inject_settings(source, ""), source);
    }

    #[test]
    fn test_inject_settings_named_fence() {
        let result = inject_settings("@startuml invoice\nA -> B\n@enduml\n", "skinparam dpi 96");

        assert_eq!(result, "@startuml invoice\nskinparam dpi 96\nA -> B\n@enduml\n");
    }
}
