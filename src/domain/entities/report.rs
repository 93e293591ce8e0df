//! Report rows and the run-level report.

use super::{Campaign, NormalizedLink};

/// One output row: a surviving link within a campaign.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub campaign_title: String,
    pub link_key: String,
    pub clicks: u64,
    pub recipient_count: Option<u64>,
    /// Clicks divided by recipients. `None` when the campaign has no
    /// recipient count or a count of zero.
    pub ratio: Option<f64>,
}

impl ReportRow {
    /// Builds the row for `link` in `campaign`, computing the engagement ratio
    /// only when the recipient count is positive.
    pub fn new(campaign: &Campaign, link: &NormalizedLink) -> Self {
        let ratio = campaign
            .positive_recipients()
            .map(|recipients| link.clicks as f64 / recipients as f64);

        Self {
            campaign_title: campaign.title.clone(),
            link_key: link.key.clone(),
            clicks: link.clicks,
            recipient_count: campaign.recipient_count,
            ratio,
        }
    }
}

/// A campaign whose click details could not be retrieved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignFailure {
    pub campaign_id: String,
    pub campaign_title: String,
    pub reason: String,
}

/// Result of building a report over a set of campaigns.
///
/// Failures are carried alongside the rows so the operator can tell a
/// complete report from a partial one.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub rows: Vec<ReportRow>,
    pub failures: Vec<CampaignFailure>,
    pub campaigns_processed: usize,
    /// Click records dropped because their URL could not be normalized.
    pub malformed_links: usize,
}

impl Report {
    /// Returns true when every campaign contributed and no link was dropped
    /// for being malformed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.malformed_links == 0
    }
}
