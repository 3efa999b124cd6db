use super::Session;
use anyhow::Result;
use backlink_core::{BacklinkEntry, DocumentId};
use serde::Serialize;

#[derive(Serialize)]
struct ListOutput<'a> {
    target: Option<&'a DocumentId>,
    backlinks: &'a [BacklinkEntry],
}

/// Execute `list`: print every backlink to `note`, in corpus order.
pub fn execute(session: &Session, note: &str) -> Result<String> {
    let nav = session.coordinator();
    let (target, list) = session.backlinks(&nav, note);

    if session.json {
        let output = ListOutput {
            target: target.as_ref().map(|t| &t.id),
            backlinks: list.entries(),
        };
        return Ok(format!("{}\n", serde_json::to_string_pretty(&output)?));
    }

    let mut output = String::new();
    match &target {
        Some(t) => output.push_str(&format!("Backlinks to {} (documents linking to this):\n", t.id)),
        None => output.push_str("Backlinks (documents linking to this):\n"),
    }
    if list.is_empty() {
        output.push_str("- (none)\n");
    } else {
        for (i, entry) in list.entries().iter().enumerate() {
            output.push_str(&format!("- [{}] {} ({})\n", i, entry.label(), entry.source.id));
        }
    }

    Ok(output)
}
