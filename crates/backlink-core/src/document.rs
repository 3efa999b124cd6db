use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Opaque document identifier. Hosts decide the format; the vault host uses
/// vault-relative paths such as `Notes/Ideas.md`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A document in the corpus: identifier plus display name.
///
/// Content is not carried here; it is read on demand through
/// [`crate::corpus::DocumentSource`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Document {
    pub id: DocumentId,
    /// File stem, e.g. "Ideas" for `Notes/Ideas.md`
    pub basename: String,
}

impl Document {
    pub fn new(id: impl Into<DocumentId>, basename: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            basename: basename.into(),
        }
    }

    /// Build a document from a path-like id, deriving the basename from the
    /// last path segment with any `.md` extension removed.
    pub fn from_path(path: &str) -> Self {
        Self::new(DocumentId::new(path), basename_of(path))
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Last path segment without a trailing `.md`.
pub fn basename_of(path: &str) -> &str {
    let file = path.rsplit('/').next().unwrap_or(path);
    file.strip_suffix(".md").unwrap_or(file)
}

/// A single outgoing reference as extracted by the link index.
///
/// `raw_target` is unparsed and may carry a `#header` fragment, e.g.
/// `Note#Intro]]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LinkRecord {
    pub raw_target: String,
}

impl LinkRecord {
    pub fn new(raw_target: impl Into<String>) -> Self {
        Self {
            raw_target: raw_target.into(),
        }
    }
}

/// Structured metadata block of a document. Only `parent` is meaningful to
/// backlink resolution.
pub type FrontmatterRecord = BTreeMap<String, Value>;

/// Everything the link index knows about one document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinkMetadata {
    pub links: Vec<LinkRecord>,
    pub frontmatter: FrontmatterRecord,
}

/// A reference found pointing at the target document.
///
/// `header`, when present, is non-empty and contains no `]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BacklinkEntry {
    pub source: Document,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
}

impl BacklinkEntry {
    /// Display label: `basename -> header`, or just the basename.
    pub fn label(&self) -> String {
        match &self.header {
            Some(header) => format!("{} -> {}", self.source.basename, header),
            None => self.source.basename.clone(),
        }
    }
}

/// Zero-based line index into a document's text; `None` means not found.
pub type AnchorPosition = Option<usize>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basename_strips_folders_and_extension() {
        assert_eq!(basename_of("Notes/Ideas.md"), "Ideas");
        assert_eq!(basename_of("Ideas.md"), "Ideas");
        assert_eq!(basename_of("Ideas"), "Ideas");
        assert_eq!(basename_of("a/b/c.txt"), "c.txt");
    }

    #[test]
    fn from_path_keeps_full_id() {
        let doc = Document::from_path("Lens/Photosynthesis.md");
        assert_eq!(doc.id.as_str(), "Lens/Photosynthesis.md");
        assert_eq!(doc.basename, "Photosynthesis");
    }

    #[test]
    fn label_includes_header_when_present() {
        let source = Document::from_path("DocA.md");
        let with_header = BacklinkEntry {
            source: source.clone(),
            header: Some("Setup".into()),
        };
        let without = BacklinkEntry { source, header: None };
        assert_eq!(with_header.label(), "DocA -> Setup");
        assert_eq!(without.label(), "DocA");
    }
}
