//! Service boundary to the email marketing platform.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::entities::{Campaign, ClickRecord};
use crate::error::ApiError;

/// Filter and page parameters for a campaign listing call.
///
/// Only sent campaigns are ever requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignQuery {
    pub list_id: String,
    pub since: NaiveDate,
    pub before: NaiveDate,
    pub offset: u32,
    pub count: u32,
}

impl CampaignQuery {
    /// Creates a query for the first page of campaigns sent to `list_id`
    /// between `since` and `before`.
    pub fn new(
        list_id: impl Into<String>,
        since: NaiveDate,
        before: NaiveDate,
        count: u32,
    ) -> Self {
        Self {
            list_id: list_id.into(),
            since,
            before,
            offset: 0,
            count,
        }
    }

    /// Moves the query to the page starting at `offset`.
    pub fn at_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }
}

/// One page of the campaign listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignPage {
    pub campaigns: Vec<Campaign>,
    /// Total number of campaigns matching the query across all pages.
    pub total_items: u64,
}

/// One page of per-link click details for a campaign.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickDetailsPage {
    pub records: Vec<ClickRecord>,
    /// Total number of link rows for the campaign across all pages.
    pub total_items: u64,
}

/// Platform interface used by the report pipeline.
///
/// # Implementations
///
/// - [`crate::infrastructure::mailchimp::MailchimpClient`] - Mailchimp Marketing API v3
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketingPlatform: Send + Sync {
    /// Checks that the platform is reachable and accepts the credentials.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the platform is unreachable or rejects
    /// the API key.
    async fn ping(&self) -> Result<(), ApiError>;

    /// Lists sent campaigns matching the query.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport, HTTP or decoding failures.
    async fn list_campaigns(&self, query: &CampaignQuery) -> Result<CampaignPage, ApiError>;

    /// Retrieves one page of per-link click details for a campaign.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport, HTTP or decoding failures.
    async fn click_details(
        &self,
        campaign_id: &str,
        offset: u32,
        count: u32,
    ) -> Result<ClickDetailsPage, ApiError>;
}
