use crate::document::{Document, DocumentId, LinkMetadata};
use crate::error::{BacklinkError, Result};
use crate::frontmatter::{parse_frontmatter, split_frontmatter};
use crate::link_parser::extract_link_records;
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::RwLock;

/// Corpus enumeration and link-index lookup, as provided by the host.
pub trait Corpus {
    /// Every document in the corpus, in iteration order.
    fn documents(&self) -> Vec<Document>;

    /// Pre-extracted links and front matter for a document.
    fn link_metadata(&self, id: &DocumentId) -> Option<LinkMetadata>;
}

/// Asynchronous full-text read of a document.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn read(&self, id: &DocumentId) -> Result<String>;
}

/// Derive link metadata from markdown: YAML front matter plus the wikilinks
/// of the body (outside code). Links written inside front matter are not
/// body links; only `parent` there counts, via the resolver.
pub fn extract_link_metadata(markdown: &str) -> LinkMetadata {
    let (yaml, body) = split_frontmatter(markdown);
    LinkMetadata {
        links: extract_link_records(body),
        frontmatter: yaml.and_then(parse_frontmatter).unwrap_or_default(),
    }
}

/// Documents in corpus order, with each id's position for constant-time
/// lookup.
#[derive(Default)]
struct DocumentOrder {
    documents: Vec<Document>,
    positions: HashMap<DocumentId, usize>,
}

/// Ordered document list plus per-document link metadata.
///
/// Insertion order is the corpus iteration order. Re-inserting an existing id
/// replaces its metadata in place without moving it.
pub struct LinkIndex {
    order: RwLock<DocumentOrder>,
    metadata: DashMap<DocumentId, LinkMetadata>,
}

impl LinkIndex {
    pub fn new() -> Self {
        Self {
            order: RwLock::new(DocumentOrder::default()),
            metadata: DashMap::new(),
        }
    }

    pub fn insert(&self, document: Document, metadata: LinkMetadata) {
        let mut order = self.order.write().unwrap_or_else(|e| e.into_inner());
        match order.positions.get(&document.id).copied() {
            Some(pos) => order.documents[pos] = document.clone(),
            None => {
                let pos = order.documents.len();
                order.positions.insert(document.id.clone(), pos);
                order.documents.push(document.clone());
            }
        }
        self.metadata.insert(document.id, metadata);
    }

    pub fn remove(&self, id: &DocumentId) -> Option<LinkMetadata> {
        let mut order = self.order.write().unwrap_or_else(|e| e.into_inner());
        if let Some(pos) = order.positions.remove(id) {
            order.documents.remove(pos);
            // Everything after the removed slot shifts down by one
            let DocumentOrder { documents, positions } = &mut *order;
            for (i, doc) in documents.iter().enumerate().skip(pos) {
                positions.insert(doc.id.clone(), i);
            }
        }
        self.metadata.remove(id).map(|(_, m)| m)
    }

    pub fn get(&self, id: &DocumentId) -> Option<Document> {
        let order = self.order.read().unwrap_or_else(|e| e.into_inner());
        let pos = *order.positions.get(id)?;
        order.documents.get(pos).cloned()
    }

    pub fn len(&self) -> usize {
        self.metadata.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty()
    }
}

impl Default for LinkIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl Corpus for LinkIndex {
    fn documents(&self) -> Vec<Document> {
        self.order
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .documents
            .clone()
    }

    fn link_metadata(&self, id: &DocumentId) -> Option<LinkMetadata> {
        self.metadata.get(id).map(|m| m.value().clone())
    }
}

/// In-memory corpus holding document text alongside the link index.
/// Useful for embedding hosts and tests.
pub struct MemoryCorpus {
    index: LinkIndex,
    contents: DashMap<DocumentId, String>,
}

impl MemoryCorpus {
    pub fn new() -> Self {
        Self {
            index: LinkIndex::new(),
            contents: DashMap::new(),
        }
    }

    /// Add a markdown document, extracting its links and front matter.
    pub fn insert_markdown(&self, document: Document, markdown: &str) {
        let metadata = extract_link_metadata(markdown);
        self.insert(document, markdown, metadata);
    }

    /// Add a document with explicitly supplied link metadata.
    pub fn insert(&self, document: Document, content: &str, metadata: LinkMetadata) {
        self.contents.insert(document.id.clone(), content.to_string());
        self.index.insert(document, metadata);
    }

    pub fn remove(&self, id: &DocumentId) {
        self.contents.remove(id);
        self.index.remove(id);
    }

    pub fn get(&self, id: &DocumentId) -> Option<Document> {
        self.index.get(id)
    }

    /// Look up a document by exact id, falling back to the first document
    /// whose basename matches.
    pub fn find(&self, name: &str) -> Option<Document> {
        self.index.get(&DocumentId::new(name)).or_else(|| {
            self.index
                .documents()
                .into_iter()
                .find(|d| d.basename == name)
        })
    }

    pub fn index(&self) -> &LinkIndex {
        &self.index
    }
}

impl Default for MemoryCorpus {
    fn default() -> Self {
        Self::new()
    }
}

impl Corpus for MemoryCorpus {
    fn documents(&self) -> Vec<Document> {
        self.index.documents()
    }

    fn link_metadata(&self, id: &DocumentId) -> Option<LinkMetadata> {
        self.index.link_metadata(id)
    }
}

#[async_trait]
impl DocumentSource for MemoryCorpus {
    async fn read(&self, id: &DocumentId) -> Result<String> {
        self.contents
            .get(id)
            .map(|c| c.value().clone())
            .ok_or_else(|| BacklinkError::DocumentNotFound(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::LinkRecord;

    #[test]
    fn documents_follow_insertion_order() {
        let corpus = MemoryCorpus::new();
        corpus.insert_markdown(Document::from_path("b.md"), "");
        corpus.insert_markdown(Document::from_path("a.md"), "");
        corpus.insert_markdown(Document::from_path("c.md"), "");

        let ids: Vec<String> = corpus
            .documents()
            .into_iter()
            .map(|d| d.id.to_string())
            .collect();
        assert_eq!(ids, vec!["b.md", "a.md", "c.md"]);
    }

    #[test]
    fn reinsert_replaces_in_place() {
        let index = LinkIndex::new();
        index.insert(Document::from_path("a.md"), LinkMetadata::default());
        index.insert(Document::from_path("b.md"), LinkMetadata::default());
        index.insert(
            Document::from_path("a.md"),
            LinkMetadata {
                links: vec![LinkRecord::new("b]]")],
                ..Default::default()
            },
        );

        assert_eq!(index.len(), 2);
        assert_eq!(index.documents()[0].id.as_str(), "a.md");
        let meta = index.link_metadata(&"a.md".into()).unwrap();
        assert_eq!(meta.links.len(), 1);
    }

    #[test]
    fn remove_drops_document_and_metadata() {
        let corpus = MemoryCorpus::new();
        corpus.insert_markdown(Document::from_path("a.md"), "[[b]]");
        corpus.remove(&"a.md".into());
        assert!(corpus.documents().is_empty());
        assert!(corpus.link_metadata(&"a.md".into()).is_none());
        assert!(corpus.index().is_empty());
    }

    #[test]
    fn markdown_insert_extracts_links_and_frontmatter() {
        let corpus = MemoryCorpus::new();
        corpus.insert_markdown(
            Document::from_path("a.md"),
            "---\nparent: Home\n---\nSee [[Other#Intro]]",
        );
        let meta = corpus.link_metadata(&"a.md".into()).unwrap();
        assert_eq!(meta.links, vec![LinkRecord::new("Other#Intro]]")]);
        assert_eq!(meta.frontmatter["parent"], "Home");
    }

    #[test]
    fn links_inside_frontmatter_are_not_body_links() {
        let meta = extract_link_metadata("---\nparent: \"[[Home]]\"\n---\n[[Body]]");
        assert_eq!(meta.links, vec![LinkRecord::new("Body]]")]);
        assert_eq!(meta.frontmatter["parent"], "[[Home]]");
    }

    #[test]
    fn remove_keeps_later_documents_reachable() {
        let index = LinkIndex::new();
        for path in ["a.md", "b.md", "c.md", "d.md"] {
            index.insert(Document::from_path(path), LinkMetadata::default());
        }
        index.remove(&"b.md".into());
        index.insert(Document::from_path("c.md"), LinkMetadata::default());
        index.insert(Document::from_path("e.md"), LinkMetadata::default());

        let ids: Vec<String> = index.documents().into_iter().map(|d| d.id.to_string()).collect();
        assert_eq!(ids, vec!["a.md", "c.md", "d.md", "e.md"]);
        assert_eq!(index.get(&"d.md".into()).unwrap().basename, "d");
        assert!(index.get(&"b.md".into()).is_none());
    }

    #[test]
    fn find_by_id_or_basename() {
        let corpus = MemoryCorpus::new();
        corpus.insert_markdown(Document::from_path("Notes/Ideas.md"), "");
        assert!(corpus.find("Notes/Ideas.md").is_some());
        assert_eq!(corpus.find("Ideas").unwrap().id.as_str(), "Notes/Ideas.md");
        assert!(corpus.find("Missing").is_none());
    }

    #[tokio::test]
    async fn read_returns_content_or_not_found() {
        let corpus = MemoryCorpus::new();
        corpus.insert_markdown(Document::from_path("a.md"), "hello");
        assert_eq!(corpus.read(&"a.md".into()).await.unwrap(), "hello");
        assert!(matches!(
            corpus.read(&"zzz.md".into()).await,
            Err(BacklinkError::DocumentNotFound(_))
        ));
    }
}
