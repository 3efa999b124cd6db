use crate::document::AnchorPosition;
use regex::{Regex, RegexBuilder};

/// Build the case-insensitive pattern for a closing anchor reference:
/// `#<header>]]`, optionally with an `|alias` before the closer, or the
/// Markdown link form `#<header>)` with the header plain or URL-encoded.
/// The header is escaped, so it always matches literally.
fn anchor_pattern(header: &str) -> Option<Regex> {
    let plain = regex::escape(header);
    let encoded = regex::escape(&urlencoding::encode(header));
    let pattern = format!(r"#{plain}(?:\|[^\]]*)?\]\]|#(?:{plain}|{encoded})>?\)");
    match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!("Could not build anchor pattern for {:?}: {}", header, e);
            None
        }
    }
}

/// Find the zero-based index of the first line of `document_text` containing
/// a reference to `#<header>`, ignoring case.
///
/// Empty text and an empty header both yield `None`.
pub fn locate(document_text: &str, header: &str) -> AnchorPosition {
    if header.is_empty() || document_text.is_empty() {
        return None;
    }
    let re = anchor_pattern(header)?;

    document_text
        .split('\n')
        .position(|line| re.is_match(line))
}
