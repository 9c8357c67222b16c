use thiserror::Error;

/// The input could not be turned into a document tree.
#[derive(Debug, Error)]
pub enum DocumentParseError {
    #[error("failed to read document from reader")]
    Read(#[source] std::io::Error),
    #[error("failed to read document from HTTP response")]
    Response(#[source] reqwest::Error),
}
