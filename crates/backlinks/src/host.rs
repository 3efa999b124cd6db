use crate::vault::Vault;
use async_trait::async_trait;
use backlink_core::{Document, DocumentId, DocumentSource, NavigationHost};
use colored::Colorize;
use std::ops::Range;
use std::sync::{Arc, Mutex};

/// Where the terminal "view" currently is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewState {
    pub document: Option<DocumentId>,
    pub cursor: Option<usize>,
    pub scroll: Option<Range<usize>>,
    pub notices: Vec<String>,
}

/// Navigation host for the command line: there is no editor, so opening,
/// cursor placement and scrolling are recorded and reported by the caller.
/// Notices go straight to stderr.
pub struct TerminalHost {
    vault: Arc<Vault>,
    visible_lines: usize,
    state: Mutex<ViewState>,
    quiet: bool,
}

impl TerminalHost {
    pub fn new(vault: Arc<Vault>, visible_lines: usize) -> Self {
        Self {
            vault,
            visible_lines,
            state: Mutex::new(ViewState::default()),
            quiet: false,
        }
    }

    /// Collect notices without printing them.
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    pub fn state(&self) -> ViewState {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn update(&self, f: impl FnOnce(&mut ViewState)) {
        let mut guard = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard);
    }
}

#[async_trait]
impl NavigationHost for TerminalHost {
    async fn open_document(&self, document: &Document) -> backlink_core::Result<()> {
        tracing::debug!("Opening {}", document.id);
        self.update(|s| {
            s.document = Some(document.id.clone());
            s.cursor = None;
            s.scroll = None;
        });
        Ok(())
    }

    async fn read_document(&self, id: &DocumentId) -> backlink_core::Result<String> {
        self.vault.read(id).await
    }

    async fn set_cursor(&self, line: usize) {
        self.update(|s| s.cursor = Some(line));
    }

    async fn scroll_into_view(&self, lines: Range<usize>) {
        self.update(|s| s.scroll = Some(lines));
    }

    fn visible_line_capacity(&self) -> usize {
        self.visible_lines
    }

    fn notice(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", "notice:".yellow().bold(), message);
        }
        self.update(|s| s.notices.push(message.to_string()));
    }
}
