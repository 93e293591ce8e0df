//! Mailchimp Marketing API integration.
//!
//! - [`MailchimpClient`] - [`crate::domain::platform::MarketingPlatform`] over HTTP
//! - [`dto`] - Response bodies and their projection into domain types

pub mod client;
pub mod dto;

pub use client::{ClientSettings, DEFAULT_SERVER, MailchimpClient, send_time_filter};
