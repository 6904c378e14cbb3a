//! Hacker News client -- ranked top stories via the Firebase API.
//!
//! One request for the id list, then one request per story, all sequential.
//! Each request is retried under the client's [`RetryPolicy`]. Losing the id
//! list fails the whole fetch; losing a single story only drops that story.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use super::retry::RetryPolicy;
use super::{StorySource, API_BASE};
use crate::error::FetchError;
use crate::item::{Item, RawItem};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct HnClient {
    http: Client,
    base: Url,
    retry: RetryPolicy,
}

impl HnClient {
    /// Client for the public API.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_base_url(API_BASE)
    }

    /// Client for another API root (mirrors, test servers).
    ///
    /// # Errors
    /// Returns an error if `base` is not a valid URL or the HTTP client
    /// cannot be initialized.
    pub fn with_base_url(base: &str) -> Result<Self, FetchError> {
        let base = if base.ends_with('/') {
            Url::parse(base)?
        } else {
            Url::parse(&format!("{base}/"))?
        };
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("hn-pulse/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| FetchError::Request {
                url: base.to_string(),
                source,
            })?;
        Ok(Self {
            http,
            base,
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, FetchError> {
        tracing::debug!(%url, "GET");
        let resp = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        resp.json::<T>().await.map_err(|e| FetchError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    async fn get_json_with_retry<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        self.retry.run(url.as_str(), || self.get_json(&url)).await
    }

    /// Ids of the current top stories, best first.
    ///
    /// # Errors
    /// Returns an error once every attempt has failed.
    pub async fn top_story_ids(&self) -> Result<Vec<u64>, FetchError> {
        let url = self.base.join("topstories.json")?;
        self.get_json_with_retry(url).await
    }

    /// A single story, or `None` when the record is null or lacks a title.
    ///
    /// # Errors
    /// Returns an error once every attempt has failed.
    pub async fn item(&self, id: u64) -> Result<Option<Item>, FetchError> {
        let url = self.base.join(&format!("item/{id}.json"))?;
        let raw: Option<RawItem> = self.get_json_with_retry(url).await?;
        Ok(raw.and_then(Item::from_raw))
    }

    /// The first `limit` top stories in rank order.
    ///
    /// # Errors
    /// Returns an error if the id list cannot be fetched.
    pub async fn fetch_top_stories(&self, limit: usize) -> Result<Vec<Item>, FetchError> {
        let ids = self.top_story_ids().await?;
        let mut stories = Vec::with_capacity(limit.min(ids.len()));

        for id in ids.into_iter().take(limit) {
            match self.item(id).await {
                Ok(Some(item)) => stories.push(item),
                Ok(None) => tracing::debug!(id, "skipping story without title"),
                Err(e) => tracing::warn!(id, "skipping story: {e}"),
            }
        }

        tracing::debug!(fetched = stories.len(), limit, "top stories fetched");
        Ok(stories)
    }
}

impl StorySource for HnClient {
    async fn fetch_batch(&self, limit: usize) -> Result<Vec<Item>, FetchError> {
        self.fetch_top_stories(limit).await
    }
}
