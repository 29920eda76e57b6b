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

//! Client library for the Tokyo Amesh precipitation radar.
//!
//! Amesh publishes a radar frame every five minutes as a transparent GIF
//! meant to be laid over a base map and a coastline mask. This crate fetches
//! those layers, stamps the frame time onto them and produces one finished
//! image. The layers can be used independently:
//!
//! - **Mesh indices**: [`MeshIndex`] tokens and the [`MeshIndexCatalog`] of
//!   published frames
//! - **Estimation**: [`latest_candidates`] guesses recent frames from the clock
//! - **Compositing**: [`ImageCompositor`] fetches and layers one frame
//! - **Resolution**: [`LatestImageResolver`] finds the newest published frame
//!
//! # Quick Start
//!
//! ```no_run
//! use amesh_client::{Client, ClientConfig, ImageSize};
//!
//! #[tokio::main]
//! async fn main() -> amesh_client::Result<()> {
//!     let client = Client::new(ClientConfig::default())?;
//!
//!     let latest = client.download_latest_image(ImageSize::Small, "amesh.png").await?;
//!     println!("Saved frame {}", latest.index);
//!     Ok(())
//! }
//! ```
//!
//! # Estimation Only
//!
//! ```
//! use amesh_client::estimate::latest_candidates_at;
//! use amesh_client::mesh::jst;
//! use chrono::TimeZone;
//!
//! let now = jst().with_ymd_and_hms(2017, 5, 30, 13, 6, 0).unwrap();
//! let candidates = latest_candidates_at(&now, 3);
//! assert_eq!(candidates[0].as_str(), "201705301305");
//! assert_eq!(candidates[2].as_str(), "201705301255");
//! ```

pub mod catalog;
pub mod compositor;
pub mod error;
pub mod estimate;
pub mod fetch;
pub mod label;
pub mod mesh;
pub mod resolver;
pub mod size;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use image::RgbaImage;

pub use catalog::MeshIndexCatalog;
pub use compositor::ImageCompositor;
pub use error::{ClientError, Result};
pub use estimate::{latest_candidates, DEFAULT_CANDIDATE_COUNT, UPDATE_INTERVAL_MINUTES};
pub use fetch::{Fetcher, HttpConfig, HttpFetcher};
pub use label::render_label;
pub use mesh::MeshIndex;
pub use resolver::{LatestImage, LatestImageResolver};
pub use size::ImageSize;

/// Default Amesh server.
pub const DEFAULT_BASE_URL: &str = "http://tokyo-ame.jwa.or.jp";

/// Default location of the published mesh index listing.
pub const DEFAULT_MESH_INDEX_URL: &str = "http://tokyo-ame.jwa.or.jp/scripts/mesh_index.js";

/// Configuration for the full-stack client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server root for map, mask and mesh images.
    pub base_url: String,
    /// URL of the mesh index listing.
    pub mesh_index_url: String,
    /// HTTP settings.
    pub http: HttpConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            mesh_index_url: DEFAULT_MESH_INDEX_URL.to_string(),
            http: HttpConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Builder method to set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.http.timeout = timeout;
        self
    }
}

/// Full-stack client that wires all layers over one fetcher.
///
/// Each client owns its own mesh index cache.
#[derive(Debug)]
pub struct Client {
    catalog: MeshIndexCatalog,
    compositor: ImageCompositor,
    resolver: LatestImageResolver,
}

impl Client {
    /// Create a client that talks HTTP.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config.http)?;
        Ok(Self::with_fetcher(&config, Arc::new(fetcher)))
    }

    /// Create a client over any [`Fetcher`].
    #[must_use]
    pub fn with_fetcher(config: &ClientConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        let compositor = ImageCompositor::new(Arc::clone(&fetcher), config.base_url.as_str());
        Self {
            catalog: MeshIndexCatalog::new(fetcher, config.mesh_index_url.as_str()),
            resolver: LatestImageResolver::new(compositor.clone()),
            compositor,
        }
    }

    /// Published mesh indices (cached after the first successful fetch).
    pub async fn mesh_indices(&self) -> Result<Vec<MeshIndex>> {
        self.catalog.mesh_indices().await
    }

    /// Composite for one explicit frame.
    pub async fn image(&self, size: ImageSize, index: &MeshIndex) -> Result<RgbaImage> {
        self.compositor.image(size, index).await
    }

    /// Composite for one explicit frame, written to `dest`.
    pub async fn download_image(
        &self,
        size: ImageSize,
        index: &MeshIndex,
        dest: impl AsRef<Path>,
    ) -> Result<RgbaImage> {
        self.compositor.download_image(size, index, dest).await
    }

    /// Newest published frame among the default number of candidates.
    pub async fn latest_image(&self, size: ImageSize) -> Result<LatestImage> {
        self.resolver.latest_image(size, DEFAULT_CANDIDATE_COUNT).await
    }

    /// Newest published frame among `candidate_count` candidates.
    pub async fn latest_image_with(
        &self,
        size: ImageSize,
        candidate_count: usize,
    ) -> Result<LatestImage> {
        self.resolver.latest_image(size, candidate_count).await
    }

    /// Newest published frame, written to `dest`.
    pub async fn download_latest_image(
        &self,
        size: ImageSize,
        dest: impl AsRef<Path>,
    ) -> Result<LatestImage> {
        self.resolver.download_latest_image(size, dest).await
    }

    /// Newest published frame among `candidate_count` candidates, written to `dest`.
    pub async fn download_latest_image_with(
        &self,
        size: ImageSize,
        candidate_count: usize,
        dest: impl AsRef<Path>,
    ) -> Result<LatestImage> {
        self.resolver
            .download_latest_image_with(size, candidate_count, dest)
            .await
    }

    /// The mesh index catalog, e.g. to inspect what is cached.
    #[must_use]
    pub fn catalog(&self) -> &MeshIndexCatalog {
        &self.catalog
    }

    /// The compositor, for fetching individual layers.
    #[must_use]
    pub fn compositor(&self) -> &ImageCompositor {
        &self.compositor
    }

    /// The latest-image resolver, for resolving against an explicit clock.
    #[must_use]
    pub fn resolver(&self) -> &LatestImageResolver {
        &self.resolver
    }
}
