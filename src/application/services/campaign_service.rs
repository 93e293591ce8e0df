//! Campaign selection service.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::entities::Campaign;
use crate::domain::platform::{CampaignQuery, MarketingPlatform};
use crate::error::AppError;

/// Largest page the campaign listing endpoint accepts.
pub const CAMPAIGN_PAGE_SIZE: u32 = 1000;

/// Service for selecting the sent campaigns of a list within a date window.
pub struct CampaignService<P: MarketingPlatform> {
    platform: Arc<P>,
    page_size: u32,
}

impl<P: MarketingPlatform> CampaignService<P> {
    /// Creates a new campaign service using the platform's maximum page size.
    pub fn new(platform: Arc<P>) -> Self {
        Self {
            platform,
            page_size: CAMPAIGN_PAGE_SIZE,
        }
    }

    /// Overrides the page size. Values are clamped to `1..=1000`.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, CAMPAIGN_PAGE_SIZE);
        self
    }

    /// Selects every sent campaign for `list_id` between `since` and `before`.
    ///
    /// `before` is passed to the platform's "before send time" filter as is.
    /// Pages are requested until `total_items` campaigns have been collected
    /// or the platform returns a short page.
    ///
    /// Campaigns are returned in the order the platform lists them.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Listing`] if any page fails. No partial list is
    /// returned, so callers never mistake a failure for an empty window.
    pub async fn select(
        &self,
        list_id: &str,
        since: NaiveDate,
        before: NaiveDate,
    ) -> Result<Vec<Campaign>, AppError> {
        let mut campaigns: Vec<Campaign> = Vec::new();
        let mut query = CampaignQuery::new(list_id, since, before, self.page_size);

        loop {
            let page = self
                .platform
                .list_campaigns(&query)
                .await
                .map_err(|e| AppError::listing(list_id, e))?;

            let fetched = page.campaigns.len();
            campaigns.extend(page.campaigns);

            tracing::debug!(
                list_id,
                offset = query.offset,
                fetched,
                total = page.total_items,
                "Fetched campaign page"
            );

            if fetched < self.page_size as usize || campaigns.len() as u64 >= page.total_items {
                break;
            }

            let next_offset = query.offset + fetched as u32;
            query = query.at_offset(next_offset);
        }

        tracing::info!(list_id, count = campaigns.len(), "Selected campaigns");

        Ok(campaigns)
    }
}
