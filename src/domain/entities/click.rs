//! Click records as reported by the platform and after aggregation.

/// Clicks on a single link occurrence within a campaign.
///
/// The same destination may be reported several times with different query
/// strings; these are folded together by [`crate::domain::aggregator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickRecord {
    pub url: String,
    pub total_clicks: u64,
}

impl ClickRecord {
    /// Creates a new ClickRecord instance.
    pub fn new(url: impl Into<String>, total_clicks: u64) -> Self {
        Self {
            url: url.into(),
            total_clicks,
        }
    }
}

/// A link after normalization, carrying the summed clicks of every record
/// that shares its key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLink {
    /// Host and path of the URL, without scheme, query or fragment.
    pub key: String,
    pub clicks: u64,
}
