//! Application layer services implementing the report pipeline.
//!
//! Services consume the [`crate::domain::platform::MarketingPlatform`] trait and
//! coordinate selection, retrieval and aggregation.
//!
//! # Available Services
//!
//! - [`services::campaign_service::CampaignService`] - Sent campaign selection
//! - [`services::click_service::ClickService`] - Paginated click detail retrieval
//! - [`services::report_service::ReportService`] - Report building and orchestration

pub mod services;
