//! Error types for platform calls and the report pipeline.
//!
//! Every platform failure is caught where the call is made and degrades the
//! run by scope: the connectivity check is non-fatal, a click retrieval
//! failure skips one campaign, a malformed URL skips one link. Only a failed
//! campaign listing (and output I/O) stops the run.

use crate::utils::url_normalizer::UrlNormalizationError;

/// Failure of a single call to the marketing platform.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP {status} {title}: {detail}")]
    Http {
        status: u16,
        title: String,
        detail: String,
    },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Request task failed: {0}")]
    Join(String),
}

impl ApiError {
    /// Returns true for failures worth retrying: network errors, rate
    /// limiting and server-side errors.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Pipeline-level errors, one variant per failure scope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Connectivity check failed: {0}")]
    Connectivity(#[source] ApiError),

    #[error("Failed to list campaigns for list {list_id}: {source}")]
    Listing {
        list_id: String,
        #[source]
        source: ApiError,
    },

    #[error("Failed to retrieve click details for campaign {campaign_id}: {source}")]
    ClickRetrieval {
        campaign_id: String,
        #[source]
        source: ApiError,
    },

    #[error("Malformed URL: {0}")]
    MalformedUrl(#[from] UrlNormalizationError),

    #[error("Failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

impl AppError {
    pub fn listing(list_id: impl Into<String>, source: ApiError) -> Self {
        Self::Listing {
            list_id: list_id.into(),
            source,
        }
    }

    pub fn click_retrieval(campaign_id: impl Into<String>, source: ApiError) -> Self {
        Self::ClickRetrieval {
            campaign_id: campaign_id.into(),
            source,
        }
    }
}
