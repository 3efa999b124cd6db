//! Backlink discovery and resolution over a corpus of linked notes.
//!
//! The host supplies the corpus, a pre-extracted link index and content
//! reads ([`corpus`]). From those, [`backlink_resolver`] finds every reference
//! to a target note, [`anchor_locator`] finds the line a header anchor points
//! at, and [`navigation`] drives the host to open and position the result.

pub mod anchor_locator;
pub mod backlink_resolver;
pub mod corpus;
pub mod document;
pub mod error;
pub mod frontmatter;
pub mod link_parser;
pub mod navigation;
pub mod selection;

pub use anchor_locator::locate;
pub use backlink_resolver::{resolve, BacklinkResolver, MatchStrategy};
pub use corpus::{Corpus, DocumentSource, LinkIndex, MemoryCorpus};
pub use document::{
    AnchorPosition, BacklinkEntry, Document, DocumentId, FrontmatterRecord, LinkMetadata,
    LinkRecord,
};
pub use error::{BacklinkError, Result};
pub use navigation::{NavigationCoordinator, NavigationHost, NavigationOutcome};
pub use selection::BacklinkList;
