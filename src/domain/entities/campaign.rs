//! Campaign entity representing one sent email blast.

/// A sent campaign selected for reporting.
///
/// Projected from the platform's campaign listing down to the fields the
/// report needs. `recipient_count` is `None` when the platform returned no
/// recipient data for the campaign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Campaign {
    pub id: String,
    pub title: String,
    pub recipient_count: Option<u64>,
}

impl Campaign {
    /// Creates a new Campaign instance.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        recipient_count: Option<u64>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            recipient_count,
        }
    }

    /// Returns the recipient count only when it can be used as a divisor.
    pub fn positive_recipients(&self) -> Option<u64> {
        self.recipient_count.filter(|count| *count > 0)
    }
}
