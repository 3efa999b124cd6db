
use crate::document::LinkRecord;
use regex::Regex;
use std::sync::LazyLock;

// Compile regex once, reuse across calls
static WIKILINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[([^\]]+)\]\]").unwrap()
});

static FENCED_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[^\n]*\n.*?```|~~~[^\n]*\n.*?~~~").unwrap()
});

static INLINE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"`[^`]*`").unwrap()
});

// [text](target) or [text](<target> "title"); group 1 is the embed marker
static MARKDOWN_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(!?)\[[^\]]*\]\(\s*(<[^>]*>|[^)\s]+)(?:\s+"[^"]*")?\s*\)"#).unwrap()
});

static URL_SCHEME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*:").unwrap()
});

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"#([^\]]+)").unwrap()
});

/// Build the byte ranges that are inside fenced or inline code.
fn build_excluded_ranges(markdown: &str) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    for m in FENCED_CODE_RE.find_iter(markdown) {
        ranges.push((m.start(), m.end()));
    }
    for m in INLINE_CODE_RE.find_iter(markdown) {
        ranges.push((m.start(), m.end()));
    }
    ranges
}

fn is_excluded(offset: usize, excluded: &[(usize, usize)]) -> bool {
    excluded.iter().any(|&(start, end)| offset >= start && offset < end)
}

/// Extract every internal link in `markdown` as a [`LinkRecord`].
///
/// Wikilinks and relative Markdown links to `.md` notes are both collected,
/// in document order. The raw target is the link path (with any `#anchor`)
/// followed by a `]]` closer, so `[[Note#Intro|Start]]` becomes
/// `Note#Intro]]` and `[text](My%20Note.md)` becomes `My Note.md]]`. Aliases
/// are dropped; links inside code are skipped. Duplicates are preserved.
pub fn extract_link_records(markdown: &str) -> Vec<LinkRecord> {
    let excluded = build_excluded_ranges(markdown);
    let mut found: Vec<(usize, LinkRecord)> = Vec::new();

    for cap in WIKILINK_RE.captures_iter(markdown) {
        let Some(full_match) = cap.get(0) else {
            continue;
        };
        if is_excluded(full_match.start(), &excluded) {
            continue;
        }
        let content = &cap[1];
        // Strip alias (|)
        let target = content.split('|').next().unwrap_or(content);
        if target.trim().is_empty() {
            continue;
        }
        found.push((full_match.start(), LinkRecord::new(format!("{}]]", target))));
    }

    for cap in MARKDOWN_LINK_RE.captures_iter(markdown) {
        let Some(full_match) = cap.get(0) else {
            continue;
        };
        if !cap[1].is_empty() || is_excluded(full_match.start(), &excluded) {
            continue;
        }
        if let Some(target) = markdown_link_target(&cap[2]) {
            found.push((full_match.start(), LinkRecord::new(format!("{}]]", target))));
        }
    }

    found.sort_by_key(|(offset, _)| *offset);
    found.into_iter().map(|(_, record)| record).collect()
}

/// Decoded note path of a Markdown link destination, or `None` for external
/// URLs, same-document anchors and non-note files.
fn markdown_link_target(destination: &str) -> Option<String> {
    let destination = destination
        .strip_prefix('<')
        .and_then(|d| d.strip_suffix('>'))
        .unwrap_or(destination)
        .trim();
    if URL_SCHEME_RE.is_match(destination) {
        return None;
    }

    let decoded = match urlencoding::decode(destination) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => destination.to_string(),
    };
    let path = decoded.split('#').next().unwrap_or("");
    if !path.to_ascii_lowercase().ends_with(".md") {
        return None;
    }
    Some(decoded)
}

/// Header fragment of a raw link target: the first `#` followed by one or
/// more non-`]` characters. Returns `None` when there is no such fragment.
pub fn extract_header(raw_target: &str) -> Option<String> {
    HEADER_RE
        .captures(raw_target)
        .map(|cap| cap[1].to_string())
}

/// Page-name portion of a raw target: everything before the first `#`, `|`
/// or `]`, with a leading `[[` and surrounding whitespace removed.
pub fn page_name(raw_target: &str) -> &str {
    let trimmed = raw_target.trim_start();
    let body = trimmed.strip_prefix("[[").unwrap_or(trimmed);
    let end = body.find(['#', '|', ']']).unwrap_or(body.len());
    body[..end].trim()
}
