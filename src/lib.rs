//! # Mailchimp Top Links
//!
//! Exports the most clicked links from Mailchimp campaigns sent over a period.
//!
//! For every sent campaign of a list within a date window, per-link click
//! details are retrieved, links differing only in query string or fragment
//! are summed together, links below a minimum click count are dropped, and an
//! engagement ratio (clicks / recipients) is computed for each remaining link.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Entities, click aggregation and the platform trait
//! - **Application Layer** ([`application`]) - Campaign selection, click retrieval and report building
//! - **Infrastructure Layer** ([`infrastructure`]) - Mailchimp HTTP client and CSV output
//!
//! ## Quick Start
//!
//! ```bash
//! export MAILCHIMP_API_KEY="0123456789abcdef-us7"
//!
//! cargo run -- --list-id 57afe96172 --since 2021-01-01 --before 2021-04-01
//! ```
//!
//! ## Configuration
//!
//! Flags are defined in [`cli::Cli`]; environment knobs are documented in
//! [`config`].

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;
pub mod utils;

pub use error::{ApiError, AppError};

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{ReportService, ReportSettings};
    pub use crate::domain::aggregator::{ThresholdPolicy, aggregate};
    pub use crate::domain::entities::{Campaign, ClickRecord, NormalizedLink, Report, ReportRow};
    pub use crate::domain::platform::{
        CampaignPage, CampaignQuery, ClickDetailsPage, MarketingPlatform,
    };
    pub use crate::error::{ApiError, AppError};
}
