//! Click aggregation for a single campaign.
//!
//! Folds raw [`ClickRecord`]s into one [`NormalizedLink`] per host + path key
//! and drops links below the minimum click threshold.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::domain::entities::{ClickRecord, NormalizedLink};
use crate::error::AppError;
use crate::utils::url_normalizer::normalize_link;

/// When the minimum click threshold is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThresholdPolicy {
    /// Only the final sum of each key is compared against the threshold.
    #[default]
    FinalSum,

    /// The threshold is checked after every record. A key whose running total
    /// is below it is removed, and restarts from zero if it appears again.
    ///
    /// Matches reports produced by earlier versions of `mctl`. Can undercount
    /// or drop links whose final sum would have qualified.
    DipDeletion,
}

impl ThresholdPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FinalSum => "final-sum",
            Self::DipDeletion => "dip-deletion",
        }
    }
}

impl fmt::Display for ThresholdPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown [`ThresholdPolicy`] name.
#[derive(Debug, thiserror::Error)]
#[error("unknown threshold policy '{0}', expected 'final-sum' or 'dip-deletion'")]
pub struct ParseThresholdPolicyError(String);

impl FromStr for ThresholdPolicy {
    type Err = ParseThresholdPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "final-sum" | "final_sum" => Ok(Self::FinalSum),
            "dip-deletion" | "dip_deletion" => Ok(Self::DipDeletion),
            other => Err(ParseThresholdPolicyError(other.to_string())),
        }
    }
}

/// Links that survived aggregation for one campaign.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedClicks {
    /// Surviving links, in the order their key was (re)inserted.
    pub links: Vec<NormalizedLink>,
    /// Records skipped because their URL could not be normalized.
    pub malformed: usize,
}

#[derive(Debug, Clone, Copy)]
struct Tally {
    clicks: u64,
    inserted_at: u64,
}

#[derive(Debug, Default)]
struct Accumulator {
    totals: HashMap<String, Tally>,
    next_insert: u64,
    malformed: usize,
}

impl Accumulator {
    fn add(mut self, key: String, clicks: u64, min_clicks: u64, policy: ThresholdPolicy) -> Self {
        let inserted_at = self.next_insert;
        let tally = self.totals.entry(key.clone()).or_insert(Tally {
            clicks: 0,
            inserted_at,
        });
        if tally.inserted_at == inserted_at {
            self.next_insert += 1;
        }

        tally.clicks = tally.clicks.saturating_add(clicks);

        if policy == ThresholdPolicy::DipDeletion && tally.clicks < min_clicks {
            self.totals.remove(&key);
        }

        self
    }

    fn finish(self, min_clicks: u64) -> AggregatedClicks {
        let mut survivors: Vec<(String, Tally)> = self
            .totals
            .into_iter()
            .filter(|(_, tally)| tally.clicks >= min_clicks)
            .collect();
        survivors.sort_by_key(|(_, tally)| tally.inserted_at);

        AggregatedClicks {
            links: survivors
                .into_iter()
                .map(|(key, tally)| NormalizedLink {
                    key,
                    clicks: tally.clicks,
                })
                .collect(),
            malformed: self.malformed,
        }
    }
}

/// Aggregates click records by normalized URL and applies `min_clicks`.
///
/// Records are processed in the order received. Each URL is reduced with
/// [`normalize_link`] and its clicks added to the running total for that key.
/// Records whose URL is malformed are skipped and counted, never failing the
/// whole campaign.
///
/// The result is deterministic for a fixed input order. Under
/// [`ThresholdPolicy::FinalSum`] it does not depend on the order at all.
///
/// # Examples
///
/// ```
/// use mailchimp_top_links::domain::aggregator::{aggregate, ThresholdPolicy};
/// use mailchimp_top_links::domain::entities::ClickRecord;
///
/// let records = vec![
///     ClickRecord::new("https://x.com/a?x=1", 150),
///     ClickRecord::new("https://x.com/a?x=2", 60),
/// ];
/// let result = aggregate(&records, 200, ThresholdPolicy::FinalSum);
///
/// assert_eq!(result.links.len(), 1);
/// assert_eq!(result.links[0].key, "x.com/a");
/// assert_eq!(result.links[0].clicks, 210);
/// ```
pub fn aggregate(
    records: &[ClickRecord],
    min_clicks: u64,
    policy: ThresholdPolicy,
) -> AggregatedClicks {
    records
        .iter()
        .fold(Accumulator::default(), |mut acc, record| {
            match normalize_link(&record.url) {
                Ok(key) => acc.add(key, record.total_clicks, min_clicks, policy),
                Err(e) => {
                    let err = AppError::from(e);
                    tracing::warn!(url = %record.url, error = %err, "Skipping link");
                    acc.malformed += 1;
                    acc
                }
            }
        })
        .finish(min_clicks)
}
