use super::Session;
use anyhow::{anyhow, Result};
use backlink_core::{locate, BacklinkError, DocumentSource, NavigationHost};

/// Execute `locate`: find the line of `note` that references `#header]]`.
pub async fn execute(session: &Session, note: &str, header: &str) -> Result<String> {
    let document = session
        .target(note)
        .ok_or_else(|| anyhow!("Document not found: {}", note))?;

    let text = session.vault.read(&document.id).await?;
    let path = session.path_of(&document).display().to_string();

    match locate(&text, header) {
        Some(line) => {
            if session.json {
                let output = serde_json::json!({
                    "document": document.id,
                    "path": path,
                    "line": line,
                });
                Ok(format!("{}\n", serde_json::to_string_pretty(&output)?))
            } else {
                Ok(format!("{}:{}\n", path, line + 1))
            }
        }
        None => {
            let missing = BacklinkError::AnchorNotFound {
                header: header.to_string(),
                basename: document.basename.clone(),
            };
            session.coordinator().host().notice(&missing.to_string());
            Ok(String::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::session;

    #[tokio::test]
    async fn prints_one_based_anchor_line() {
        let (_dir, session) = session(&[("DocB.md", "...\n## Setup]]\nmore")]).await;
        let output = execute(&session, "DocB", "setup").await.unwrap();
        assert!(output.ends_with("DocB.md:2\n"), "got {output}");
    }

    #[tokio::test]
    async fn missing_anchor_prints_nothing() {
        let (_dir, session) = session(&[("DocB.md", "no anchors")]).await;
        assert_eq!(execute(&session, "DocB", "Setup").await.unwrap(), "");
    }

    #[tokio::test]
    async fn unknown_document_is_an_error() {
        let (_dir, session) = session(&[("DocB.md", "")]).await;
        let err = execute(&session, "Nope", "Setup").await.unwrap_err();
        assert_eq!(err.to_string(), "Document not found: Nope");
    }

    #[tokio::test]
    async fn json_output_uses_zero_based_line() {
        let (_dir, mut session) = session(&[("DocB.md", "...\n## Setup]]\nmore")]).await;
        session.json = true;
        let output = execute(&session, "DocB", "Setup").await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["line"], 1);
        assert_eq!(value["document"], "DocB.md");
    }
}
