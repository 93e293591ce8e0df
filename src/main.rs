//! `mctl`: Mailchimp Top Links.
//!
//! Exports top links from Mailchimp campaigns sent over the specified period
//! to CSV.
//!
//! # Usage
//!
//! ```bash
//! mctl --api-key 0123456789abcdef-us7 --list-id 57afe96172 \
//!     --since 2021-01-01 --before 2021-04-01 --minimum-clicks 200
//! ```
//!
//! # Exit Status
//!
//! Non-zero when the configuration is invalid, campaigns cannot be listed,
//! or the report cannot be written. Campaigns whose click details fail are
//! reported and skipped.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use dialoguer::Confirm;

use mailchimp_top_links::application::services::{CampaignOutcome, ReportService};
use mailchimp_top_links::cli::Cli;
use mailchimp_top_links::config::{self, Config};
use mailchimp_top_links::domain::entities::Report;
use mailchimp_top_links::error::AppError;
use mailchimp_top_links::infrastructure::mailchimp::MailchimpClient;
use mailchimp_top_links::infrastructure::output::CsvReportWriter;
use mailchimp_top_links::logging;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load(cli).context("Invalid configuration")?;

    logging::init(&config.log_level, &config.log_format);
    config.print_summary();

    if let Some(key_server) = config.server_mismatch() {
        tracing::warn!(key_server, server = %config.server, "API key data center mismatch");
        eprintln!(
            "{} API key belongs to data center '{}' but --server is '{}'",
            "Warning:".yellow().bold(),
            key_server,
            config.server
        );
    }

    if !confirm_overwrite(&config.output, config.assume_yes)? {
        println!("{}", "Cancelled".red());
        return Ok(());
    }

    let platform = Arc::new(MailchimpClient::new(&config.client_settings()));
    let service = ReportService::new(platform, config.report_settings());

    run(&service, &config).await
}

/// Opens the output file, then runs the report, appending each campaign's
/// rows as soon as it has been counted.
async fn run(service: &ReportService<MailchimpClient>, config: &Config) -> Result<()> {
    let mut writer = CsvReportWriter::create(&config.output)
        .and_then(|mut writer| writer.write_header().map(|()| writer))
        .with_context(|| format!("Failed to write {}", config.output.display()))?;

    println!(
        "{}",
        format!("Getting campaigns {} - {}", config.since, config.before).bright_blue()
    );

    let result = service
        .run_with_progress(&config.list_id, config.since, config.before, |progress| {
            let status = match progress.outcome {
                CampaignOutcome::Counted { rows } => format!("{rows} links").green(),
                CampaignOutcome::Failed => "failed".red(),
            };
            println!(
                "  [{}/{}] {} {}",
                progress.position,
                progress.total,
                progress.campaign.title.cyan(),
                status
            );

            writer.write_rows(progress.rows)?;
            Ok(())
        })
        .await;

    let report = match result {
        Ok(report) => report,
        Err(e @ AppError::Listing { .. }) => {
            drop(writer);
            if let Err(remove) = fs::remove_file(&config.output) {
                tracing::warn!(error = %remove, "Failed to remove empty report");
            }
            return Err(e).context("Campaign selection failed, no report written");
        }
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Report in {} is incomplete", config.output.display()));
        }
    };

    print_summary(&report, &config.output);

    Ok(())
}

/// Asks before replacing an existing output file, unless `--yes` was given.
fn confirm_overwrite(output: &Path, assume_yes: bool) -> Result<bool> {
    if assume_yes || !output.exists() {
        return Ok(true);
    }

    let confirmed = Confirm::new()
        .with_prompt(format!("{} exists. Overwrite?", output.display()))
        .default(false)
        .interact()
        .context("Confirmation failed, pass --yes to overwrite non-interactively")?;

    Ok(confirmed)
}

fn print_summary(report: &Report, output: &Path) {
    println!();
    println!(
        "{} {} rows from {} campaigns written to {}",
        "Done:".green().bold(),
        report.rows.len(),
        report.campaigns_processed,
        output.display().to_string().bright_white()
    );

    if report.is_complete() {
        return;
    }

    println!("{}", "Report is partial:".yellow().bold());
    for failure in &report.failures {
        eprintln!(
            "  {} {} ({}): {}",
            "skipped".red(),
            failure.campaign_title,
            failure.campaign_id,
            failure.reason
        );
    }
    if report.malformed_links > 0 {
        eprintln!(
            "  {} {} links with malformed URLs",
            "skipped".yellow(),
            report.malformed_links
        );
    }
}
