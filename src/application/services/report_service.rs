//! Report building and run orchestration.

use std::sync::Arc;

use chrono::NaiveDate;

use super::{CampaignService, ClickService};
use crate::domain::aggregator::{ThresholdPolicy, aggregate};
use crate::domain::entities::{Campaign, CampaignFailure, Report, ReportRow};
use crate::domain::platform::MarketingPlatform;
use crate::error::AppError;

/// Default minimum number of clicks for a link to be reported.
pub const DEFAULT_MINIMUM_CLICKS: u64 = 200;

/// Thresholding settings applied to every campaign of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSettings {
    pub minimum_clicks: u64,
    pub threshold_policy: ThresholdPolicy,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            minimum_clicks: DEFAULT_MINIMUM_CLICKS,
            threshold_policy: ThresholdPolicy::default(),
        }
    }
}

/// Outcome of processing one campaign, passed to progress callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignOutcome {
    /// Click details were retrieved; `rows` links survived the threshold.
    Counted { rows: usize },
    /// Click details could not be retrieved; the campaign was skipped.
    Failed,
}

/// Progress notification emitted after each campaign.
#[derive(Debug, Clone, Copy)]
pub struct ReportProgress<'a> {
    /// One-based position of the campaign in the run.
    pub position: usize,
    pub total: usize,
    pub campaign: &'a Campaign,
    pub outcome: CampaignOutcome,
    /// Rows this campaign added to the report, empty when it failed.
    pub rows: &'a [ReportRow],
}

/// Service orchestrating campaign selection, click aggregation and row
/// building for one report run.
///
/// Campaigns are processed one at a time in selection order. A click
/// retrieval failure drops that campaign from the report and is recorded in
/// [`Report::failures`]; it never aborts the run.
pub struct ReportService<P: MarketingPlatform> {
    platform: Arc<P>,
    campaigns: CampaignService<P>,
    clicks: ClickService<P>,
    settings: ReportSettings,
}

impl<P: MarketingPlatform> ReportService<P> {
    /// Creates a new report service.
    pub fn new(platform: Arc<P>, settings: ReportSettings) -> Self {
        Self {
            campaigns: CampaignService::new(platform.clone()),
            clicks: ClickService::new(platform.clone()),
            platform,
            settings,
        }
    }

    pub fn settings(&self) -> ReportSettings {
        self.settings
    }

    /// Checks platform connectivity.
    ///
    /// The result is advisory: callers report the error and carry on, since
    /// later calls fail on their own if the platform is really unreachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Connectivity`] if the ping fails.
    pub async fn check_connectivity(&self) -> Result<(), AppError> {
        self.platform.ping().await.map_err(AppError::Connectivity)?;
        tracing::info!("Platform connectivity check passed");
        Ok(())
    }

    /// Selects the sent campaigns of `list_id` between `since` and `before`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Listing`] if the platform listing fails.
    pub async fn select_campaigns(
        &self,
        list_id: &str,
        since: NaiveDate,
        before: NaiveDate,
    ) -> Result<Vec<Campaign>, AppError> {
        self.campaigns.select(list_id, since, before).await
    }

    /// Builds report rows for `campaigns`.
    ///
    /// # Errors
    ///
    /// Never fails on its own; see [`Self::build_report_with_progress`].
    pub async fn build_report(&self, campaigns: &[Campaign]) -> Result<Report, AppError> {
        self.build_report_with_progress(campaigns, |_| Ok(())).await
    }

    /// Builds report rows for `campaigns`, calling `on_progress` after each
    /// campaign has been processed with the rows it produced.
    ///
    /// Within a campaign, rows follow the aggregator's link order.
    ///
    /// # Errors
    ///
    /// Returns the first error from `on_progress`. Campaigns after it are
    /// not processed.
    pub async fn build_report_with_progress<F>(
        &self,
        campaigns: &[Campaign],
        mut on_progress: F,
    ) -> Result<Report, AppError>
    where
        F: FnMut(ReportProgress<'_>) -> Result<(), AppError>,
    {
        let mut report = Report::default();
        let total = campaigns.len();

        for (index, campaign) in campaigns.iter().enumerate() {
            let (outcome, rows) = match self.clicks.fetch_records(&campaign.id).await {
                Ok(records) => {
                    let aggregated = aggregate(
                        &records,
                        self.settings.minimum_clicks,
                        self.settings.threshold_policy,
                    );

                    if campaign.positive_recipients().is_none() {
                        tracing::warn!(
                            campaign_id = %campaign.id,
                            title = %campaign.title,
                            "Campaign has no recipients, ratio omitted"
                        );
                    }

                    report.malformed_links += aggregated.malformed;
                    let rows: Vec<ReportRow> = aggregated
                        .links
                        .iter()
                        .map(|link| ReportRow::new(campaign, link))
                        .collect();

                    tracing::debug!(
                        campaign_id = %campaign.id,
                        rows = rows.len(),
                        "Campaign counted"
                    );
                    (CampaignOutcome::Counted { rows: rows.len() }, rows)
                }
                Err(e) => {
                    tracing::error!(campaign_id = %campaign.id, error = %e, "Skipping campaign");
                    report.failures.push(CampaignFailure {
                        campaign_id: campaign.id.clone(),
                        campaign_title: campaign.title.clone(),
                        reason: e.to_string(),
                    });
                    (CampaignOutcome::Failed, Vec::new())
                }
            };

            report.campaigns_processed += 1;
            on_progress(ReportProgress {
                position: index + 1,
                total,
                campaign,
                outcome,
                rows: &rows,
            })?;
            report.rows.extend(rows);
        }

        tracing::info!(
            campaigns = report.campaigns_processed,
            rows = report.rows.len(),
            failures = report.failures.len(),
            malformed_links = report.malformed_links,
            "Report built"
        );

        Ok(report)
    }

    /// Runs the whole pipeline: connectivity check, campaign selection and
    /// report building.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Listing`] if campaigns cannot be listed. A failed
    /// connectivity check is logged and does not stop the run.
    pub async fn run(
        &self,
        list_id: &str,
        since: NaiveDate,
        before: NaiveDate,
    ) -> Result<Report, AppError> {
        self.run_with_progress(list_id, since, before, |_| Ok(())).await
    }

    /// Same as [`Self::run`], calling `on_progress` after each campaign.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Listing`] if campaigns cannot be listed, or the
    /// first error from `on_progress`.
    pub async fn run_with_progress<F>(
        &self,
        list_id: &str,
        since: NaiveDate,
        before: NaiveDate,
        on_progress: F,
    ) -> Result<Report, AppError>
    where
        F: FnMut(ReportProgress<'_>) -> Result<(), AppError>,
    {
        if let Err(e) = self.check_connectivity().await {
            tracing::error!(error = %e, "Continuing despite failed connectivity check");
        }

        let campaigns = self.select_campaigns(list_id, since, before).await?;
        tracing::info!(list_id, count = campaigns.len(), "Selected campaigns");

        self.build_report_with_progress(&campaigns, on_progress).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ClickRecord;
    use crate::domain::platform::{CampaignPage, ClickDetailsPage, MockMarketingPlatform};
    use crate::error::ApiError;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn spring_sale_clicks() -> ClickDetailsPage {
        ClickDetailsPage {
            records: vec![
                ClickRecord::new("https://x.com/a?x=1", 150),
                ClickRecord::new("https://x.com/a?x=2", 60),
            ],
            total_items: 2,
        }
    }

    #[tokio::test]
    async fn test_build_report_spring_sale() {
        let mut mock_platform = MockMarketingPlatform::new();

        mock_platform
            .expect_click_details()
            .withf(|id, _, _| id == "spring")
            .times(1)
            .returning(|_, _, _| Ok(spring_sale_clicks()));

        let service = ReportService::new(Arc::new(mock_platform), ReportSettings::default());
        let campaigns = vec![Campaign::new("spring", "Spring Sale", Some(1000))];

        let report = service.build_report(&campaigns).await.unwrap();

        assert_eq!(
            report.rows,
            vec![ReportRow {
                campaign_title: "Spring Sale".to_string(),
                link_key: "x.com/a".to_string(),
                clicks: 210,
                recipient_count: Some(1000),
                ratio: Some(0.21),
            }]
        );
        assert!(report.is_complete());
    }

    #[tokio::test]
    async fn test_build_report_dip_deletion_policy() {
        let mut mock_platform = MockMarketingPlatform::new();

        mock_platform
            .expect_click_details()
            .times(1)
            .returning(|_, _, _| Ok(spring_sale_clicks()));

        let settings = ReportSettings {
            minimum_clicks: 200,
            threshold_policy: ThresholdPolicy::DipDeletion,
        };
        let service = ReportService::new(Arc::new(mock_platform), settings);
        let campaigns = vec![Campaign::new("spring", "Spring Sale", Some(1000))];

        let report = service.build_report(&campaigns).await.unwrap();

        assert!(report.rows.is_empty());
        assert!(report.failures.is_empty());
    }

    #[tokio::test]
    async fn test_click_failure_skips_only_that_campaign() {
        let mut mock_platform = MockMarketingPlatform::new();

        mock_platform
            .expect_click_details()
            .withf(|id, _, _| id == "broken")
            .times(1)
            .returning(|_, _, _| Err(ApiError::Transport("timed out".to_string())));
        mock_platform
            .expect_click_details()
            .withf(|id, _, _| id == "spring")
            .times(1)
            .returning(|_, _, _| Ok(spring_sale_clicks()));

        let service = ReportService::new(Arc::new(mock_platform), ReportSettings::default());
        let campaigns = vec![
            Campaign::new("broken", "Broken", Some(500)),
            Campaign::new("spring", "Spring Sale", Some(1000)),
        ];

        let mut progress = Vec::new();
        let report = service
            .build_report_with_progress(&campaigns, |p| {
                let id = p.campaign.id.clone();
                progress.push((p.position, p.total, id, p.outcome, p.rows.len()));
                Ok(())
            })
            .await
            .unwrap();

        assert_eq!(report.campaigns_processed, 2);
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].campaign_title, "Spring Sale");
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].campaign_id, "broken");
        assert!(report.failures[0].reason.contains("timed out"));
        assert!(!report.is_complete());

        assert_eq!(
            progress,
            vec![
                (1, 2, "broken".to_string(), CampaignOutcome::Failed, 0),
                (2, 2, "spring".to_string(), CampaignOutcome::Counted { rows: 1 }, 1),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_and_zero_recipients_have_no_ratio() {
        let mut mock_platform = MockMarketingPlatform::new();

        mock_platform
            .expect_click_details()
            .times(2)
            .returning(|_, _, _| Ok(spring_sale_clicks()));

        let service = ReportService::new(Arc::new(mock_platform), ReportSettings::default());
        let campaigns = vec![
            Campaign::new("a", "Missing", None),
            Campaign::new("b", "Zero", Some(0)),
        ];

        let report = service.build_report(&campaigns).await.unwrap();

        assert_eq!(report.rows.len(), 2);
        assert!(report.rows.iter().all(|row| row.ratio.is_none()));
        assert_eq!(report.rows[1].recipient_count, Some(0));
    }

    #[tokio::test]
    async fn test_run_continues_after_failed_ping() {
        let mut mock_platform = MockMarketingPlatform::new();

        mock_platform.expect_ping().times(1).returning(|| {
            Err(ApiError::Http {
                status: 401,
                title: "API Key Invalid".to_string(),
                detail: "Your API key may be invalid.".to_string(),
            })
        });
        mock_platform
            .expect_list_campaigns()
            .times(1)
            .returning(|_| {
                Ok(CampaignPage {
                    campaigns: vec![Campaign::new("spring", "Spring Sale", Some(1000))],
                    total_items: 1,
                })
            });
        mock_platform
            .expect_click_details()
            .times(1)
            .returning(|_, _, _| Ok(spring_sale_clicks()));

        let service = ReportService::new(Arc::new(mock_platform), ReportSettings::default());
        let report = service
            .run("list1", date("2021-01-01"), date("2021-02-01"))
            .await
            .unwrap();

        assert_eq!(report.rows.len(), 1);
    }

    #[tokio::test]
    async fn test_run_stops_when_listing_fails() {
        let mut mock_platform = MockMarketingPlatform::new();

        mock_platform.expect_ping().times(1).returning(|| Ok(()));
        mock_platform
            .expect_list_campaigns()
            .times(1)
            .returning(|_| Err(ApiError::Transport("connection refused".to_string())));
        mock_platform.expect_click_details().never();

        let service = ReportService::new(Arc::new(mock_platform), ReportSettings::default());
        let result = service
            .run("list1", date("2021-01-01"), date("2021-02-01"))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Listing { .. }));
    }

    #[tokio::test]
    async fn test_progress_error_stops_report() {
        let mut mock_platform = MockMarketingPlatform::new();

        mock_platform
            .expect_click_details()
            .withf(|id, _, _| id == "first")
            .times(1)
            .returning(|_, _, _| Ok(spring_sale_clicks()));
        mock_platform
            .expect_click_details()
            .withf(|id, _, _| id == "second")
            .never();

        let service = ReportService::new(Arc::new(mock_platform), ReportSettings::default());
        let campaigns = vec![
            Campaign::new("first", "First", Some(1000)),
            Campaign::new("second", "Second", Some(1000)),
        ];

        let result = service
            .build_report_with_progress(&campaigns, |_| {
                Err(std::io::Error::other("disk full").into())
            })
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Output(_)));
    }

    #[tokio::test]
    async fn test_check_connectivity_maps_error() {
        let mut mock_platform = MockMarketingPlatform::new();

        mock_platform
            .expect_ping()
            .times(1)
            .returning(|| Err(ApiError::Transport("dns failure".to_string())));

        let service = ReportService::new(Arc::new(mock_platform), ReportSettings::default());

        assert!(matches!(
            service.check_connectivity().await.unwrap_err(),
            AppError::Connectivity(_)
        ));
    }
}
