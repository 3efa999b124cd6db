use crate::corpus::Corpus;
use crate::document::{BacklinkEntry, Document, LinkMetadata};
use crate::error::{BacklinkError, Result};
use crate::frontmatter::parent_links;
use crate::link_parser::{extract_header, page_name};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// MatchStrategy
// ---------------------------------------------------------------------------

/// How a link reference is compared against the target's basename.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Case-sensitive substring containment. Loose on purpose: a target named
    /// "Note" also matches links to "My Note" and "Note 2".
    #[default]
    Substring,
    /// The link's page name (last path segment, `.md` stripped) equals the
    /// basename, ignoring case.
    Exact,
}

impl MatchStrategy {
    /// Returns true if `reference` (a raw link target or a front-matter value)
    /// refers to a document named `basename`.
    pub fn matches(self, reference: &str, basename: &str) -> bool {
        match self {
            MatchStrategy::Substring => reference.contains(basename),
            MatchStrategy::Exact => {
                let name = page_name(reference);
                let last = name.rsplit('/').next().unwrap_or(name);
                let last = last.strip_suffix(".md").unwrap_or(last);
                !last.is_empty() && last.to_lowercase() == basename.to_lowercase()
            }
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStrategy::Substring => f.write_str("substring"),
            MatchStrategy::Exact => f.write_str("exact"),
        }
    }
}

impl FromStr for MatchStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substring" => Ok(MatchStrategy::Substring),
            "exact" => Ok(MatchStrategy::Exact),
            other => Err(format!("unknown match strategy: {other} (expected substring or exact)")),
        }
    }
}

// ---------------------------------------------------------------------------
// BacklinkResolver
// ---------------------------------------------------------------------------

/// Scans a corpus for references to a target document.
///
/// Stateless apart from the strategy: every call rescans the snapshot it is
/// given, so results are never cached and go stale as soon as the corpus
/// changes.
#[derive(Clone, Copy, Debug, Default)]
pub struct BacklinkResolver {
    strategy: MatchStrategy,
}

impl BacklinkResolver {
    pub fn new(strategy: MatchStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    /// Resolve backlinks of `target` across every document of `corpus`.
    pub fn resolve(
        &self,
        target: Option<&Document>,
        corpus: &impl Corpus,
    ) -> Result<Vec<BacklinkEntry>> {
        let documents = corpus.documents();
        self.resolve_with(target, &documents, |doc| corpus.link_metadata(&doc.id))
    }

    /// Resolve backlinks of `target` over an explicit document sequence.
    ///
    /// Output follows `documents` order; within one document, link-derived
    /// entries come before `parent` front-matter entries. The target itself
    /// is scanned too, and nothing is deduplicated. Documents without link
    /// metadata contribute nothing.
    pub fn resolve_with<F>(
        &self,
        target: Option<&Document>,
        documents: &[Document],
        link_index_of: F,
    ) -> Result<Vec<BacklinkEntry>>
    where
        F: Fn(&Document) -> Option<LinkMetadata>,
    {
        let target = target.ok_or(BacklinkError::NoActiveDocument)?;
        let basename = target.basename.as_str();

        let mut backlinks = Vec::new();

        for doc in documents {
            let Some(metadata) = link_index_of(doc) else {
                continue;
            };
            let before = backlinks.len();

            for link in &metadata.links {
                if self.strategy.matches(&link.raw_target, basename) {
                    backlinks.push(BacklinkEntry {
                        source: doc.clone(),
                        header: extract_header(&link.raw_target),
                    });
                }
            }

            for parent in parent_links(&metadata.frontmatter) {
                if self.strategy.matches(&parent, basename) {
                    backlinks.push(BacklinkEntry {
                        source: doc.clone(),
                        header: None,
                    });
                }
            }

            if backlinks.len() > before {
                tracing::debug!(
                    "{} -> {}: {} references",
                    doc.id,
                    target.id,
                    backlinks.len() - before
                );
            }
        }

        tracing::debug!(
            "Resolved {} backlinks for {} across {} documents ({} matching)",
            backlinks.len(),
            target.id,
            documents.len(),
            self.strategy
        );

        Ok(backlinks)
    }
}

/// Resolve with the default substring strategy.
pub fn resolve(target: Option<&Document>, corpus: &impl Corpus) -> Result<Vec<BacklinkEntry>> {
    BacklinkResolver::default().resolve(target, corpus)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
