//! Retrievers for resolving ontology concept labels from external browsers

mod bioportal;

use async_trait::async_trait;

pub use bioportal::BioPortalClient;

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("invalid lookup URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("no preferred label found for concept {0}")]
    MissingLabel(String),
}

/// Resolves the canonical preferred label for an ontology concept.
///
/// Resolution is best-effort by contract: callers fold an `Err` into
/// "omit this annotation" rather than aborting the run.
#[async_trait]
pub trait LabelResolver: Send + Sync {
    /// Resolve the preferred label for the concept identified by `uri`.
    async fn preferred_label(&self, uri: &str) -> Result<String, LookupError>;
}
