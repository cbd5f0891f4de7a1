use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{SyncError, SyncResult};

/// Cache tag derived from a resource id or a list scope. Invalidation is
/// keyed on these, never on raw URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Record { channel: String, id: String },
    Collection { channel: String, parent: String },
}

impl CacheKey {
    pub fn record(channel: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Record {
            channel: channel.into(),
            id: id.into(),
        }
    }

    pub fn collection(channel: impl Into<String>, parent: impl Into<String>) -> Self {
        Self::Collection {
            channel: channel.into(),
            parent: parent.into(),
        }
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Record { channel, id } => write!(f, "{channel}/{id}"),
            Self::Collection { channel, parent } => write!(f, "{channel}?parent={parent}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PullPage<R> {
    pub items: Vec<R>,
    pub total: u64,
}

/// Canonical-record fetch, keyed by id. Implementations suspend on their own
/// HTTP timing, fully decoupled from push dispatch.
#[async_trait]
pub trait PullSource<R>: Send + Sync {
    async fn get_by_id(&self, id: &str) -> SyncResult<R>;

    async fn list_by_parent(&self, parent: &str, offset: u32, limit: u32)
        -> SyncResult<PullPage<R>>;
}

pub trait CacheInvalidator: Send + Sync {
    fn invalidate(&self, key: &CacheKey);
}

/// REST pull client: `GET {base}/v1/{channel}/{id}` for records,
/// `GET {base}/v1/{channel}?parent=…&offset=…&limit=…` for collections.
pub struct HttpPullSource {
    client: reqwest::Client,
    base_url: String,
    channel: String,
}

impl HttpPullSource {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        channel: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            channel: channel.into(),
        }
    }

    async fn fetch_json<R>(&self, url: String) -> SyncResult<R>
    where
        R: DeserializeOwned,
    {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|error| SyncError::Http(format!("pull request failed: {error}")))?;

        if !response.status().is_success() {
            return Err(SyncError::Http(format!(
                "pull request failed with status {}",
                response.status()
            )));
        }

        response
            .json::<R>()
            .await
            .map_err(|error| SyncError::Decode(error.to_string()))
    }
}

#[async_trait]
impl<R> PullSource<R> for HttpPullSource
where
    R: DeserializeOwned + Send,
{
    async fn get_by_id(&self, id: &str) -> SyncResult<R> {
        self.fetch_json(format!("{}/v1/{}/{id}", self.base_url, self.channel))
            .await
    }

    async fn list_by_parent(
        &self,
        parent: &str,
        offset: u32,
        limit: u32,
    ) -> SyncResult<PullPage<R>> {
        self.fetch_json(format!(
            "{}/v1/{}?parent={parent}&offset={offset}&limit={limit}",
            self.base_url, self.channel
        ))
        .await
    }
}
