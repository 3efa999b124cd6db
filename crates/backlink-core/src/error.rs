use crate::document::DocumentId;
use thiserror::Error;

/// Conditions raised while resolving or navigating backlinks.
///
/// None of these are fatal to the host: callers surface them as notices and
/// carry on with an empty or partial result.
#[derive(Error, Debug)]
pub enum BacklinkError {
    #[error("No active file found!")]
    NoActiveDocument,

    #[error("Header \"{header}\" not found in file \"{basename}\"")]
    AnchorNotFound { header: String, basename: String },

    #[error("No backlinks found!")]
    EmptyResult,

    #[error("Document not found: {0}")]
    DocumentNotFound(DocumentId),

    #[error("Failed to read {id}: {source}")]
    Io {
        id: DocumentId,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, BacklinkError>;
