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

//! Published mesh index listing.
//!
//! The service exposes a small script whose body embeds every currently
//! available frame as a 12-digit token. The catalog fetches it once and keeps
//! the result for the life of the instance.

use std::sync::Arc;

use lazy_static::lazy_static;
use log::{debug, info, warn};
use regex::Regex;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::fetch::Fetcher;
use crate::mesh::MeshIndex;

lazy_static! {
    static ref MESH_TOKEN: Regex = Regex::new(r"[0-9]{12}").expect("valid mesh token pattern");
}

/// In-memory cache of the server's mesh index listing.
pub struct MeshIndexCatalog {
    fetcher: Arc<dyn Fetcher>,
    url: String,
    // Held across the fetch so concurrent first callers share one request.
    cache: Mutex<Vec<MeshIndex>>,
}

impl std::fmt::Debug for MeshIndexCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeshIndexCatalog")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl MeshIndexCatalog {
    #[must_use]
    pub fn new(fetcher: Arc<dyn Fetcher>, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
            cache: Mutex::new(Vec::new()),
        }
    }

    /// Return the published mesh indices, fetching them on first use.
    ///
    /// An empty listing is returned as `Ok(vec![])` and is not cached, so
    /// the next call asks the server again.
    pub async fn mesh_indices(&self) -> Result<Vec<MeshIndex>> {
        let mut cache = self.cache.lock().await;
        if !cache.is_empty() {
            debug!("Using {} cached mesh indices", cache.len());
            return Ok(cache.clone());
        }

        let body = self.fetcher.fetch_text(&self.url).await?;
        let indices = parse_mesh_indices(&body);

        if indices.is_empty() {
            warn!("Mesh index listing at {} contained no indices", self.url);
        } else {
            info!("Loaded {} mesh indices", indices.len());
            *cache = indices.clone();
        }

        Ok(indices)
    }

    /// Indices cached so far, without touching the network.
    pub async fn cached(&self) -> Vec<MeshIndex> {
        self.cache.lock().await.clone()
    }
}

/// Extract every 12-digit token from a listing body, in order.
///
/// Tokens that do not form a valid date/time (month 99, say) are dropped
/// with a warning, so the result can be shorter than the number of
/// 12-digit runs in the body.
#[must_use]
pub fn parse_mesh_indices(body: &str) -> Vec<MeshIndex> {
    MESH_TOKEN
        .find_iter(body)
        .filter_map(|m| match MeshIndex::parse(m.as_str()) {
            Ok(index) => Some(index),
            Err(e) => {
                warn!("Skipping mesh token {}: {}", m.as_str(), e);
                None
            }
        })
        .collect()
}
