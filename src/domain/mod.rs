//! Domain layer containing report entities and aggregation logic.
//!
//! # Architecture
//!
//! - [`entities`] - Campaigns, click records and report rows
//! - [`aggregator`] - Folds click records into per-link totals
//! - [`platform`] - Trait for the remote marketing platform
//!
//! The domain layer has no dependencies on HTTP or output formats. Concrete
//! platform clients live in [`crate::infrastructure`].

pub mod aggregator;
pub mod entities;
pub mod platform;

pub use aggregator::{AggregatedClicks, ThresholdPolicy, aggregate};
pub use platform::{CampaignPage, CampaignQuery, ClickDetailsPage, MarketingPlatform};

#[cfg(test)]
pub use platform::MockMarketingPlatform;
