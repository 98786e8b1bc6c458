//! Glucose feed abstraction and the live HTTP implementation.
//!
//! `AppState` holds an `Arc<dyn GlucoseFeed>`, chosen at startup via `CGM_FEED_MODE`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};

use crate::reading::FeedError;

const FEED_TIMEOUT_SECS: u64 = 30;

/// Upstream payload exactly as received.
///
/// Every field is an untyped JSON value so that a garbled payload still decodes and the
/// normalizer gets to decide what is usable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFeedPayload {
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub trend: Option<Value>,
    #[serde(default)]
    pub time: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

/// A source of raw CGM payloads. One call is one fetch; implementations never retry.
#[async_trait]
pub trait GlucoseFeed: Send + Sync {
    async fn fetch(&self) -> Result<RawFeedPayload, FeedError>;

    /// Short label for logs and the health endpoint.
    fn name(&self) -> &'static str;
}

/// Reads the latest sensor value from the external blood sugar API.
#[derive(Clone)]
pub struct LiveFeed {
    client: Client,
    url: String,
}

impl LiveFeed {
    pub fn new(url: impl Into<String>) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(FEED_TIMEOUT_SECS))
                .build()?,
            url: url.into(),
        })
    }
}

#[async_trait]
impl GlucoseFeed for LiveFeed {
    async fn fetch(&self) -> Result<RawFeedPayload, FeedError> {
        debug!("Fetching CGM reading from {}", self.url);

        let response = self.client.get(&self.url).send().await.map_err(|e| {
            error!("CGM feed request failed: {e}");
            FeedError::Fetch(format!("API request failed: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("CGM feed returned {status}: {body}");
            return Err(FeedError::Fetch(format!(
                "API request failed with status {}: {}",
                status.as_u16(),
                body
            )));
        }

        response.json::<RawFeedPayload>().await.map_err(|e| {
            error!("CGM feed returned an undecodable body: {e}");
            FeedError::Data(format!("API returned a malformed body: {e}"))
        })
    }

    fn name(&self) -> &'static str {
        "live"
    }
}
