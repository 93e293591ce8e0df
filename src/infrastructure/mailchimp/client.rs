//! HTTP client for the Mailchimp Marketing API v3.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use url::Url;

use super::dto::{CampaignListResponse, ClickDetailsResponse, ErrorResponse, PingResponse};
use crate::domain::platform::{CampaignPage, CampaignQuery, ClickDetailsPage, MarketingPlatform};
use crate::error::ApiError;

/// Data center used when none is configured.
pub const DEFAULT_SERVER: &str = "us7";

/// Upper bound on the delay between two attempts of the same request.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Connection settings for [`MailchimpClient`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub api_key: String,
    /// Data center prefix, e.g. `us7`.
    pub server: String,
    /// Timeout applied to every request.
    pub timeout: Duration,
    /// Retries after the first attempt, for transient failures only.
    pub retry_attempts: usize,
}

impl ClientSettings {
    pub fn new(api_key: impl Into<String>, server: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            server: server.into(),
            timeout: Duration::from_secs(30),
            retry_attempts: 1,
        }
    }

    /// Returns the API root for the configured data center.
    pub fn base_url(&self) -> String {
        format!("https://{}.api.mailchimp.com/3.0", self.server)
    }
}

/// [`MarketingPlatform`] implementation backed by the Mailchimp REST API.
///
/// Requests are blocking `ureq` calls moved onto tokio's blocking pool. Each
/// request is bounded by the configured timeout and retried with jittered
/// exponential backoff when the failure is transient.
#[derive(Clone)]
pub struct MailchimpClient {
    agent: ureq::Agent,
    base_url: String,
    authorization: String,
    retry_attempts: usize,
}

impl MailchimpClient {
    /// Creates a client for the data center named in `settings`.
    pub fn new(settings: &ClientSettings) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(settings.timeout)
            .user_agent(concat!("mctl/", env!("CARGO_PKG_VERSION")))
            .build();

        // The username is ignored by Mailchimp; only the key is checked.
        let credentials = STANDARD.encode(format!("mctl:{}", settings.api_key));

        Self {
            agent,
            base_url: settings.base_url(),
            authorization: format!("Basic {credentials}"),
            retry_attempts: settings.retry_attempts,
        }
    }

    /// Points the client at a different API root, e.g. a local test server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Builds the URL of an endpoint below the API root, percent-encoding
    /// each path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::InvalidEndpoint(format!("{}: {e}", self.base_url)))?;

        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidEndpoint(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    async fn get_json<T>(
        &self,
        segments: &[&str],
        query: Vec<(&'static str, String)>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let url = self.endpoint(segments)?;

        let strategy = ExponentialBackoff::from_millis(2)
            .factor(250)
            .max_delay(MAX_RETRY_DELAY)
            .map(jitter)
            .take(self.retry_attempts);

        RetryIf::start(
            strategy,
            || self.get_json_once::<T>(url.clone(), query.clone()),
            |e: &ApiError| {
                let transient = e.is_transient();
                if transient {
                    tracing::warn!(error = %e, url = %url.path(), "Transient failure, retrying");
                }
                transient
            },
        )
        .await
    }

    async fn get_json_once<T>(
        &self,
        url: Url,
        query: Vec<(&'static str, String)>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let agent = self.agent.clone();
        let authorization = self.authorization.clone();

        tokio::task::spawn_blocking(move || {
            tracing::debug!(url = %url, "GET");

            let mut request = agent
                .request_url("GET", &url)
                .set("Authorization", &authorization)
                .set("Accept", "application/json");
            for (name, value) in &query {
                request = request.query(name, value);
            }

            match request.call() {
                Ok(response) => response
                    .into_json::<T>()
                    .map_err(|e| ApiError::Decode(e.to_string())),
                Err(ureq::Error::Status(status, response)) => Err(status_error(status, response)),
                Err(ureq::Error::Transport(transport)) => {
                    Err(ApiError::Transport(transport.to_string()))
                }
            }
        })
        .await
        .map_err(|e| ApiError::Join(e.to_string()))?
    }
}

/// Converts a non-2xx response into [`ApiError::Http`], reading the problem
/// document when the body has one.
fn status_error(status: u16, response: ureq::Response) -> ApiError {
    let reason = response.status_text().to_string();
    let body = response.into_json::<ErrorResponse>().unwrap_or_default();

    ApiError::Http {
        status,
        title: if body.title.is_empty() {
            reason
        } else {
            body.title
        },
        detail: body.detail,
    }
}

/// Formats a calendar date as the midnight UTC timestamp the listing filters
/// expect, e.g. `2021-01-01T00:00:00+00:00`.
pub fn send_time_filter(date: NaiveDate) -> String {
    date.and_time(chrono::NaiveTime::MIN).and_utc().to_rfc3339()
}

#[async_trait]
impl MarketingPlatform for MailchimpClient {
    async fn ping(&self) -> Result<(), ApiError> {
        let response: PingResponse = self.get_json(&["ping"], Vec::new()).await?;
        tracing::debug!(health_status = %response.health_status, "Ping");
        Ok(())
    }

    async fn list_campaigns(&self, query: &CampaignQuery) -> Result<CampaignPage, ApiError> {
        let params = vec![
            ("list_id", query.list_id.clone()),
            ("status", "sent".to_string()),
            ("since_send_time", send_time_filter(query.since)),
            ("before_send_time", send_time_filter(query.before)),
            ("count", query.count.to_string()),
            ("offset", query.offset.to_string()),
        ];

        let response: CampaignListResponse = self.get_json(&["campaigns"], params).await?;
        Ok(response.into())
    }

    async fn click_details(
        &self,
        campaign_id: &str,
        offset: u32,
        count: u32,
    ) -> Result<ClickDetailsPage, ApiError> {
        let params = vec![("count", count.to_string()), ("offset", offset.to_string())];

        let response: ClickDetailsResponse = self
            .get_json(&["reports", campaign_id, "click-details"], params)
            .await?;
        Ok(response.into())
    }
}
