//! HTTP client for the VK API
//!
//! This module handles the two read-only calls the archiver makes:
//! - `wall.get` with owner, offset and count, returned as the raw body so the
//!   batch can be cached verbatim
//! - `getProfiles` for a comma-joined list of user ids

use crate::api::types::{parse_profiles, Author};
use crate::api::ApiError;
use crate::config::ApiConfig;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// No timeout is set unless `timeout-secs` is configured.
///
/// # Example
///
/// ```no_run
/// use vk_wall_archive::api::build_http_client;
/// use vk_wall_archive::config::ApiConfig;
///
/// let client = build_http_client(&ApiConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &ApiConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent.as_str())
        .gzip(true)
        .brotli(true);

    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build()
}

/// Stateless client for the wall and profile endpoints
#[derive(Debug, Clone)]
pub struct VkClient {
    http: Client,
    base_url: Url,
    version: Option<String>,
}

impl VkClient {
    /// Creates a client from the API configuration
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        Ok(Self {
            http: build_http_client(config)?,
            base_url: Url::parse(&config.base_url)?,
            version: config.version.clone(),
        })
    }

    /// The underlying HTTP client, shared with attachment downloads
    pub fn http(&self) -> &Client {
        &self.http
    }

    /// Fetches one batch of wall posts and returns the raw response body
    ///
    /// # Arguments
    ///
    /// * `owner_id` - Wall owner (negative for communities)
    /// * `offset` - Index of the first post to return
    /// * `count` - Number of posts to return
    pub async fn fetch_wall(
        &self,
        owner_id: i64,
        offset: u64,
        count: u32,
    ) -> Result<String, ApiError> {
        let url = self.method_url(
            "wall.get",
            &[
                ("owner_id", owner_id.to_string()),
                ("count", count.to_string()),
                ("offset", offset.to_string()),
                ("filter", "owner".to_string()),
            ],
        )?;

        self.get_text(url).await
    }

    /// Resolves user ids to profile records in a single call
    pub async fn get_profiles(&self, user_ids: &[i64]) -> Result<Vec<Author>, ApiError> {
        let joined = user_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let url = self.method_url("getProfiles", &[("user_ids", joined)])?;
        let body = self.get_text(url).await?;
        parse_profiles(&body)
    }

    /// Builds `{base_url}/{method}?{params}[&v={version}]`
    fn method_url(&self, method: &str, params: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|_| ApiError::Malformed("base URL cannot be a base".to_string()))?
            .pop_if_empty()
            .push(method);

        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
            if let Some(version) = &self.version {
                query.append_pair("v", version);
            }
        }

        Ok(url)
    }

    async fn get_text(&self, url: Url) -> Result<String, ApiError> {
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| ApiError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| ApiError::Http {
            url: url.to_string(),
            source,
        })
    }
}
