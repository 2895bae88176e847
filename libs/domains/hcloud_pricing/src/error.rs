use std::path::PathBuf;
use thiserror::Error;

/// Result type for price resolution
pub type PricingResult<T> = Result<T, PricingError>;

/// Errors raised while reading a plan document.
///
/// Both variants are fatal for a run: no partial report is produced.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Plan file could not be read
    #[error("Failed to read plan {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Plan bytes are not a valid plan document
    #[error("Malformed plan input: {0}")]
    MalformedInput(#[from] serde_json::Error),
}

/// Errors that can occur while resolving a price
#[derive(Debug, Error)]
pub enum PricingError {
    /// Bundled price dataset could not be loaded
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The provider does not price this resource type
    #[error("Unsupported resource type: {0}")]
    UnsupportedResourceType(String),

    /// A required attribute is absent, null or empty
    #[error("Missing attribute: {0}")]
    MissingAttribute(&'static str),

    /// An attribute is present with the wrong JSON type
    #[error("Attribute '{name}' must be a {expected}, got {found}")]
    InvalidAttribute {
        name: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// No price for a known resource
    #[error("Price not found: {0}")]
    PriceNotFound(String),

    /// The remote API has no such resource
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// Transport or decoding failure talking to the remote API
    #[error("Remote price lookup failed: {0}")]
    RemoteLookup(#[from] reqwest::Error),

    /// Remote API answered with a non-success status
    #[error("Remote API returned status {status}: {message}")]
    RemoteStatus { status: u16, message: String },

    /// Remote API answered with a price that is not a number
    #[error("Remote API returned malformed price '{0}'")]
    MalformedRemotePrice(String),

    /// Neither provider could be consulted
    #[error("No price provider available for resource type: {0}")]
    NoProviderAvailable(String),
}

impl PricingError {
    /// Whether the error came from talking to the remote API
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            PricingError::RemoteLookup(_)
                | PricingError::RemoteStatus { .. }
                | PricingError::MalformedRemotePrice(_)
        )
    }
}
