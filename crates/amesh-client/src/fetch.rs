// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! HTTP fetch layer.
//!
//! Everything that talks to the network goes through the [`Fetcher`] trait so
//! the catalog and compositor can be driven by an in-memory implementation.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;

use crate::error::{ClientError, Result};

/// Source of remote resources.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// GET `url` and return the body.
    ///
    /// Transport failures and non-success statuses are both reported as
    /// [`ClientError::Fetch`].
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>>;

    /// GET `url` and return the body as text (lossy UTF-8).
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let bytes = self.fetch_bytes(url).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Settings for the HTTP fetcher.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Whole-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            user_agent: concat!("amesh-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// [`Fetcher`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| ClientError::Fetch {
            url: String::new(),
            reason: format!("failed to build HTTP client: {e}"),
        })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::transport(url, &e))?;

        if !response.status().is_success() {
            return Err(ClientError::status(url, response.status().as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::transport(url, &e))?;

        debug!("GET {} -> {} bytes", url, bytes.len());
        Ok(bytes.to_vec())
    }
}
