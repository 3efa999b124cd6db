use anyhow::{Context, Result};
use async_trait::async_trait;
use backlink_core::corpus::extract_link_metadata;
use backlink_core::{
    BacklinkError, Corpus, Document, DocumentId, DocumentSource, LinkIndex, LinkMetadata,
};
use glob_match::glob_match;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// A directory of Markdown notes indexed as a backlink corpus.
///
/// Document ids are vault-relative paths with `/` separators, e.g.
/// `Notes/Ideas.md`. Corpus order is the lexicographic order of those paths.
/// The index is a snapshot taken by [`Vault::open`]; content reads always go
/// back to disk.
pub struct Vault {
    root: PathBuf,
    index: LinkIndex,
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|s| s.starts_with('.'))
            .unwrap_or(false)
}

fn is_markdown(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("md")
}

/// Returns true if the vault-relative path matches any ignore glob.
pub fn is_ignored(relative_path: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|p| glob_match(p, relative_path))
}

/// Vault-relative path with forward slashes.
fn relative_id(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    Some(rel.to_string_lossy().replace('\\', "/"))
}

impl Vault {
    /// Scan `root` recursively and index every Markdown note.
    ///
    /// Hidden files and directories are skipped, as are paths matching
    /// `ignore`. Files that cannot be read as UTF-8 are logged and skipped.
    pub async fn open(root: &Path, ignore: &[String]) -> Result<Self> {
        let root = root
            .canonicalize()
            .with_context(|| format!("Vault directory not found: {:?}", root))?;

        let mut ids: Vec<String> = Vec::new();
        for entry in WalkDir::new(&root).into_iter().filter_entry(|e| !is_hidden(e)) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() || !is_markdown(entry.path()) {
                continue;
            }
            let Some(id) = relative_id(&root, entry.path()) else {
                continue;
            };
            if is_ignored(&id, ignore) {
                tracing::debug!("Ignoring {}", id);
                continue;
            }
            ids.push(id);
        }
        ids.sort();

        let index = LinkIndex::new();
        for id in ids {
            let markdown = match tokio::fs::read_to_string(root.join(&id)).await {
                Ok(markdown) => markdown,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", id, e);
                    continue;
                }
            };
            let metadata = extract_link_metadata(&markdown);
            tracing::debug!(
                "Indexed {}: {} links, {} front matter keys",
                id,
                metadata.links.len(),
                metadata.frontmatter.len()
            );
            index.insert(Document::from_path(&id), metadata);
        }

        tracing::debug!("Indexed {} notes in {:?}", index.len(), root);
        Ok(Self { root, index })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Find a note by vault-relative path (with or without `.md`), falling
    /// back to the first note with that basename, then to a case-insensitive
    /// basename match.
    pub fn find(&self, name: &str) -> Option<Document> {
        let name = name.trim().trim_start_matches("./");
        if name.is_empty() {
            return None;
        }

        if let Some(doc) = self.index.get(&DocumentId::new(name)) {
            return Some(doc);
        }
        if let Some(doc) = self.index.get(&DocumentId::new(format!("{}.md", name))) {
            return Some(doc);
        }

        let documents = self.index.documents();
        let basename = name.strip_suffix(".md").unwrap_or(name);
        documents
            .iter()
            .find(|d| d.basename == basename)
            .or_else(|| {
                let lower = basename.to_lowercase();
                documents.iter().find(|d| d.basename.to_lowercase() == lower)
            })
            .cloned()
    }
}

impl Corpus for Vault {
    fn documents(&self) -> Vec<Document> {
        self.index.documents()
    }

    fn link_metadata(&self, id: &DocumentId) -> Option<LinkMetadata> {
        self.index.link_metadata(id)
    }
}

#[async_trait]
impl DocumentSource for Vault {
    async fn read(&self, id: &DocumentId) -> backlink_core::Result<String> {
        // Only indexed notes are readable; ids never escape the vault root.
        if self.index.get(id).is_none() {
            return Err(BacklinkError::DocumentNotFound(id.clone()));
        }
        tokio::fs::read_to_string(self.root.join(id.as_str()))
            .await
            .map_err(|source| BacklinkError::Io {
                id: id.clone(),
                source,
            })
    }
}
