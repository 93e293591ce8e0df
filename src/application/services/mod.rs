//! Report pipeline services for the application layer.

pub mod campaign_service;
pub mod click_service;
pub mod report_service;

pub use campaign_service::CampaignService;
pub use click_service::ClickService;
pub use report_service::{
    CampaignOutcome, DEFAULT_MINIMUM_CLICKS, ReportProgress, ReportService, ReportSettings,
};
