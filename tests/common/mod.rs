#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Mutex;
use std::thread::JoinHandle;

use async_trait::async_trait;
use chrono::NaiveDate;
use mailchimp_top_links::prelude::*;

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// In-memory platform serving fixed campaigns and click details, paging
/// them the way the real API does.
#[derive(Default)]
pub struct FakePlatform {
    pub campaigns: Vec<Campaign>,
    pub clicks: HashMap<String, Vec<ClickRecord>>,
    pub failing_campaigns: Vec<String>,
    pub fail_ping: bool,
    pub fail_listing: bool,
    pub calls: Mutex<Vec<String>>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_campaign(mut self, campaign: Campaign, clicks: Vec<ClickRecord>) -> Self {
        self.clicks.insert(campaign.id.clone(), clicks);
        self.campaigns.push(campaign);
        self
    }

    pub fn with_failing_campaign(mut self, campaign: Campaign) -> Self {
        self.failing_campaigns.push(campaign.id.clone());
        self.campaigns.push(campaign);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn page<T: Clone>(items: &[T], offset: u32, count: u32) -> Vec<T> {
    items
        .iter()
        .skip(offset as usize)
        .take(count as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl MarketingPlatform for FakePlatform {
    async fn ping(&self) -> Result<(), ApiError> {
        self.record("ping".to_string());
        if self.fail_ping {
            return Err(ApiError::Http {
                status: 401,
                title: "API Key Invalid".to_string(),
                detail: "Your API key may be invalid.".to_string(),
            });
        }
        Ok(())
    }

    async fn list_campaigns(&self, query: &CampaignQuery) -> Result<CampaignPage, ApiError> {
        self.record(format!("campaigns offset={} count={}", query.offset, query.count));
        if self.fail_listing {
            return Err(ApiError::Transport("connection refused".to_string()));
        }
        Ok(CampaignPage {
            campaigns: page(&self.campaigns, query.offset, query.count),
            total_items: self.campaigns.len() as u64,
        })
    }

    async fn click_details(
        &self,
        campaign_id: &str,
        offset: u32,
        count: u32,
    ) -> Result<ClickDetailsPage, ApiError> {
        self.record(format!("clicks {campaign_id} offset={offset} count={count}"));
        if self.failing_campaigns.iter().any(|id| id == campaign_id) {
            return Err(ApiError::Http {
                status: 500,
                title: "Internal Server Error".to_string(),
                detail: "An unexpected internal error has occurred.".to_string(),
            });
        }
        let records = self.clicks.get(campaign_id).cloned().unwrap_or_default();
        Ok(ClickDetailsPage {
            records: page(&records, offset, count),
            total_items: records.len() as u64,
        })
    }
}

/// A canned HTTP response served by [`serve`].
pub struct CannedResponse {
    pub status: u16,
    pub reason: &'static str,
    pub body: String,
}

impl CannedResponse {
    pub fn ok(body: serde_json::Value) -> Self {
        Self {
            status: 200,
            reason: "OK",
            body: body.to_string(),
        }
    }

    pub fn error(status: u16, reason: &'static str, body: serde_json::Value) -> Self {
        Self {
            status,
            reason,
            body: body.to_string(),
        }
    }
}

/// Serves `responses` in order, one connection each, on a local port.
///
/// Returns the base URL and a handle yielding the raw request heads received.
pub fn serve(responses: Vec<CannedResponse>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}/3.0", listener.local_addr().unwrap());

    let handle = std::thread::spawn(move || {
        let mut requests = Vec::new();
        for response in responses {
            let (mut stream, _) = listener.accept().unwrap();

            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            requests.push(String::from_utf8_lossy(&head).into_owned());

            let reply = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                response.status,
                response.reason,
                response.body.len(),
                response.body
            );
            stream.write_all(reply.as_bytes()).unwrap();
            stream.flush().unwrap();
        }
        requests
    });

    (base_url, handle)
}
