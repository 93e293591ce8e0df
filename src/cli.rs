//! Command-line interface of `mctl`.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::domain::aggregator::ThresholdPolicy;
use crate::infrastructure::mailchimp::DEFAULT_SERVER;
use crate::infrastructure::output::DEFAULT_OUTPUT_FILE;

/// Exports top links from Mailchimp campaigns sent over the specified period
/// to CSV.
#[derive(Debug, Clone, Parser)]
#[command(name = "mctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Mailchimp API key
    #[arg(long, alias = "api_key", env = "MAILCHIMP_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Mailchimp server (data center prefix)
    #[arg(long, env = "MAILCHIMP_SERVER", default_value = DEFAULT_SERVER)]
    pub server: String,

    /// Mailchimp list ID
    #[arg(long, alias = "list_id")]
    pub list_id: String,

    /// Examine campaigns since this date (yyyy-mm-dd)
    #[arg(long, value_parser = parse_date)]
    pub since: NaiveDate,

    /// Examine campaigns before this date (yyyy-mm-dd)
    #[arg(long, value_parser = parse_date)]
    pub before: NaiveDate,

    /// Exclude links with fewer clicks than this
    #[arg(long, alias = "minimum_clicks", default_value_t = 200)]
    pub minimum_clicks: u64,

    /// When to apply the click threshold: final-sum or dip-deletion
    #[arg(long, default_value_t = ThresholdPolicy::FinalSum)]
    pub threshold_policy: ThresholdPolicy,

    /// CSV file to write
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,

    /// Overwrite the output file without asking
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{value}', expected yyyy-mm-dd: {e}"))
}
