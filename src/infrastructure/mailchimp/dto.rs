//! Response bodies of the Mailchimp Marketing API v3.
//!
//! Only the fields the report reads are declared; everything else in the
//! payload is ignored.

use serde::Deserialize;
use serde_with::{DefaultOnNull, serde_as};

use crate::domain::entities::{Campaign, ClickRecord};
use crate::domain::platform::{CampaignPage, ClickDetailsPage};

/// `GET /ping`
#[derive(Debug, Deserialize)]
pub struct PingResponse {
    #[serde(default)]
    pub health_status: String,
}

/// `GET /campaigns`
#[derive(Debug, Deserialize)]
pub struct CampaignListResponse {
    #[serde(default)]
    pub campaigns: Vec<CampaignItem>,
    #[serde(default)]
    pub total_items: u64,
}

#[derive(Debug, Deserialize)]
pub struct CampaignItem {
    pub id: String,
    #[serde(default)]
    pub settings: CampaignSettings,
    #[serde(default)]
    pub recipients: Option<CampaignRecipients>,
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct CampaignSettings {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct CampaignRecipients {
    #[serde(default)]
    pub recipient_count: Option<u64>,
}

/// `GET /reports/{campaign_id}/click-details`
#[derive(Debug, Deserialize)]
pub struct ClickDetailsResponse {
    #[serde(default)]
    pub urls_clicked: Vec<UrlClicked>,
    #[serde(default)]
    pub total_items: u64,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub struct UrlClicked {
    pub url: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub total_clicks: u64,
}

/// Problem document returned with non-2xx responses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub detail: String,
}

impl From<CampaignItem> for Campaign {
    fn from(item: CampaignItem) -> Self {
        Campaign {
            id: item.id,
            title: item.settings.title,
            recipient_count: item.recipients.and_then(|r| r.recipient_count),
        }
    }
}

impl From<CampaignListResponse> for CampaignPage {
    fn from(response: CampaignListResponse) -> Self {
        CampaignPage {
            campaigns: response.campaigns.into_iter().map(Campaign::from).collect(),
            total_items: response.total_items,
        }
    }
}

impl From<ClickDetailsResponse> for ClickDetailsPage {
    fn from(response: ClickDetailsResponse) -> Self {
        ClickDetailsPage {
            records: response
                .urls_clicked
                .into_iter()
                .map(|u| ClickRecord::new(u.url, u.total_clicks))
                .collect(),
            total_items: response.total_items,
        }
    }
}
