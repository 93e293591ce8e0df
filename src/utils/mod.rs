//! Utility functions shared across the pipeline.
//!
//! - [`url_normalizer`] - Reduces clicked URLs to host + path aggregation keys

pub mod url_normalizer;
