//! Core domain entities representing the report data model.
//!
//! All entities live for a single report run; nothing is persisted.
//!
//! # Entity Types
//!
//! - [`Campaign`] - A sent campaign with its recipient count
//! - [`ClickRecord`] - Raw per-link clicks reported by the platform
//! - [`NormalizedLink`] - Clicks summed under a host + path key
//! - [`ReportRow`] - One output row with its engagement ratio
//! - [`Report`] - Rows plus the per-campaign failures of a run

pub mod campaign;
pub mod click;
pub mod report;

pub use campaign::Campaign;
pub use click::{ClickRecord, NormalizedLink};
pub use report::{CampaignFailure, Report, ReportRow};
