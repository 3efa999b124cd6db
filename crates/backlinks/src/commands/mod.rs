pub mod list;
pub mod locate;
pub mod open;

use crate::host::TerminalHost;
use crate::vault::Vault;
use backlink_core::{BacklinkList, BacklinkResolver, Document, NavigationCoordinator};
use std::path::PathBuf;
use std::sync::Arc;

/// Everything a command needs: the indexed vault and how to present results.
pub struct Session {
    pub vault: Arc<Vault>,
    pub resolver: BacklinkResolver,
    pub visible_lines: usize,
    pub json: bool,
    pub quiet: bool,
}

impl Session {
    pub fn coordinator(&self) -> NavigationCoordinator<TerminalHost> {
        let host = TerminalHost::new(self.vault.clone(), self.visible_lines);
        let host = if self.quiet { host.quiet() } else { host };
        NavigationCoordinator::new(host, self.resolver)
    }

    /// Look up the note a command acts on. A miss is logged and treated as
    /// "no active document" by the caller.
    pub fn target(&self, note: &str) -> Option<Document> {
        let target = self.vault.find(note);
        if target.is_none() {
            tracing::warn!("No note in {:?} matches {:?}", self.vault.root(), note);
        }
        target
    }

    /// Resolve backlinks of `note`, reporting misses through host notices.
    pub fn backlinks(
        &self,
        nav: &NavigationCoordinator<TerminalHost>,
        note: &str,
    ) -> (Option<Document>, BacklinkList) {
        let target = self.target(note);
        let list = nav.show_backlinks(target.as_ref(), &*self.vault);
        (target, list)
    }

    /// Absolute path of a note for display.
    pub fn path_of(&self, document: &Document) -> PathBuf {
        self.vault.root().join(document.id.as_str())
    }
}
