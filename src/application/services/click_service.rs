//! Click detail retrieval service.

use std::sync::Arc;

use crate::domain::entities::ClickRecord;
use crate::domain::platform::MarketingPlatform;
use crate::error::AppError;

/// Largest page the click details endpoint accepts.
pub const CLICK_PAGE_SIZE: u32 = 100;

/// Service for retrieving every per-link click record of a campaign.
pub struct ClickService<P: MarketingPlatform> {
    platform: Arc<P>,
    page_size: u32,
}

impl<P: MarketingPlatform> ClickService<P> {
    /// Creates a new click service using the platform's maximum page size.
    pub fn new(platform: Arc<P>) -> Self {
        Self {
            platform,
            page_size: CLICK_PAGE_SIZE,
        }
    }

    /// Overrides the page size. Values are clamped to `1..=100`.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, CLICK_PAGE_SIZE);
        self
    }

    /// Retrieves all click records for `campaign_id`, in platform order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ClickRetrieval`] if any page fails.
    pub async fn fetch_records(&self, campaign_id: &str) -> Result<Vec<ClickRecord>, AppError> {
        let mut records: Vec<ClickRecord> = Vec::new();
        let mut offset = 0u32;

        loop {
            let page = self
                .platform
                .click_details(campaign_id, offset, self.page_size)
                .await
                .map_err(|e| AppError::click_retrieval(campaign_id, e))?;

            let fetched = page.records.len();
            records.extend(page.records);

            if fetched < self.page_size as usize || records.len() as u64 >= page.total_items {
                break;
            }

            offset += fetched as u32;
        }

        tracing::debug!(campaign_id, count = records.len(), "Fetched click details");

        Ok(records)
    }
}
