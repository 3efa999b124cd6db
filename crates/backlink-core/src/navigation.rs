use crate::anchor_locator::locate;
use crate::backlink_resolver::BacklinkResolver;
use crate::corpus::Corpus;
use crate::document::{BacklinkEntry, Document, DocumentId};
use crate::error::{BacklinkError, Result};
use crate::selection::BacklinkList;
use async_trait::async_trait;
use std::ops::Range;

/// Approximate editor line height in pixels.
pub const DEFAULT_LINE_HEIGHT_PX: u32 = 20;

/// Host primitives the coordinator drives. `open_document` must have
/// completed before the document is re-read for anchor lookup.
#[async_trait]
pub trait NavigationHost: Send + Sync {
    async fn open_document(&self, document: &Document) -> Result<()>;

    async fn read_document(&self, id: &DocumentId) -> Result<String>;

    async fn set_cursor(&self, line: usize);

    async fn scroll_into_view(&self, lines: Range<usize>);

    /// How many lines fit in the visible viewport.
    fn visible_line_capacity(&self) -> usize;

    /// Fire-and-forget user notice.
    fn notice(&self, message: &str);
}

/// Lines that fit in a viewport of `viewport_px` with the given line height.
pub fn visible_line_capacity(viewport_px: u32, line_height_px: u32) -> usize {
    if line_height_px == 0 {
        return 0;
    }
    (viewport_px / line_height_px) as usize
}

/// Scroll window that places `line` in the vertical middle of `capacity`
/// visible lines, clamped at the top of the document.
pub fn centered_scroll_range(line: usize, capacity: usize) -> Range<usize> {
    let start = line.saturating_sub(capacity / 2);
    start..start + capacity
}

/// Where a navigation request ended up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Document opened at its default position.
    Opened,
    /// Document opened with the cursor on the anchor line.
    Anchored { line: usize, scroll: Range<usize> },
    /// Header given but absent from the document; opened at default position.
    AnchorNotFound,
}

/// Thin glue between resolution results and the host's view.
pub struct NavigationCoordinator<H> {
    host: H,
    resolver: BacklinkResolver,
}

impl<H: NavigationHost> NavigationCoordinator<H> {
    pub fn new(host: H, resolver: BacklinkResolver) -> Self {
        Self { host, resolver }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Resolve backlinks for the active document into a selectable list.
    ///
    /// A missing target or an empty result is reported through a notice and
    /// yields an empty list; neither is an error for the caller.
    pub fn show_backlinks(&self, target: Option<&Document>, corpus: &impl Corpus) -> BacklinkList {
        match self.resolver.resolve(target, corpus) {
            Ok(entries) if entries.is_empty() => {
                self.host.notice(&BacklinkError::EmptyResult.to_string());
                BacklinkList::default()
            }
            Ok(entries) => BacklinkList::new(entries),
            Err(e) => {
                self.host.notice(&e.to_string());
                BacklinkList::default()
            }
        }
    }

    /// Open the referencing document and, if the entry carries a header,
    /// move the cursor to the anchor line and center it in the viewport.
    pub async fn navigate(&self, entry: &BacklinkEntry) -> Result<NavigationOutcome> {
        self.host.open_document(&entry.source).await?;

        let Some(header) = entry.header.as_deref() else {
            return Ok(NavigationOutcome::Opened);
        };

        let text = self.host.read_document(&entry.source.id).await?;
        match locate(&text, header) {
            Some(line) => {
                let capacity = self.host.visible_line_capacity();
                let scroll = centered_scroll_range(line, capacity);
                self.host.set_cursor(line).await;
                self.host.scroll_into_view(scroll.clone()).await;
                tracing::debug!("Anchored {} at line {}", entry.source.id, line);
                Ok(NavigationOutcome::Anchored { line, scroll })
            }
            None => {
                let missing = BacklinkError::AnchorNotFound {
                    header: header.to_string(),
                    basename: entry.source.basename.clone(),
                };
                tracing::warn!("{}", missing);
                self.host.notice(&missing.to_string());
                Ok(NavigationOutcome::AnchorNotFound)
            }
        }
    }
}
