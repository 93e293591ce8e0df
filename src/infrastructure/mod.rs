//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer and writes
//! the finished report.
//!
//! # Modules
//!
//! - [`mailchimp`] - Mailchimp Marketing API client
//! - [`output`] - CSV report output

pub mod mailchimp;
pub mod output;
