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

//! Latest image resolution.
//!
//! New frames appear a few minutes after their nominal time, so the newest
//! candidate is often not published yet. Candidates are tried one at a time,
//! newest first, and the first one that composites wins.

use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use image::RgbaImage;
use log::{info, warn};

use crate::compositor::{save_image, validate_destination, ImageCompositor};
use crate::error::{ClientError, Result};
use crate::estimate::{latest_candidates_at, DEFAULT_CANDIDATE_COUNT};
use crate::mesh::MeshIndex;
use crate::size::ImageSize;

/// A resolved frame and its composite.
#[derive(Debug, Clone)]
pub struct LatestImage {
    pub index: MeshIndex,
    pub image: RgbaImage,
}

/// Walks estimated candidates through an [`ImageCompositor`].
#[derive(Debug, Clone)]
pub struct LatestImageResolver {
    compositor: ImageCompositor,
}

impl LatestImageResolver {
    #[must_use]
    pub fn new(compositor: ImageCompositor) -> Self {
        Self { compositor }
    }

    /// Resolve the latest published frame for the current time.
    pub async fn latest_image(
        &self,
        size: ImageSize,
        candidate_count: usize,
    ) -> Result<LatestImage> {
        self.latest_image_at(size, candidate_count, &Utc::now()).await
    }

    /// Resolve the latest published frame as seen from `now`.
    ///
    /// Fetch and decode failures move on to the next candidate; any other
    /// error ends the search.
    pub async fn latest_image_at<Tz: TimeZone>(
        &self,
        size: ImageSize,
        candidate_count: usize,
        now: &DateTime<Tz>,
    ) -> Result<LatestImage> {
        for index in latest_candidates_at(now, candidate_count) {
            info!("Trying mesh index {}...", index);

            match self.compositor.image(size, &index).await {
                Ok(image) => {
                    info!("Resolved latest image at {}", index);
                    return Ok(LatestImage { index, image });
                }
                Err(e) if e.is_recoverable() => {
                    warn!("Image not found for {}: {}", index, e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(ClientError::NotFound {
            candidates: candidate_count,
        })
    }

    /// Resolve the latest frame and write it to `dest`.
    ///
    /// An empty `dest` is rejected before any request is made.
    pub async fn download_latest_image(
        &self,
        size: ImageSize,
        dest: impl AsRef<Path>,
    ) -> Result<LatestImage> {
        self.download_latest_image_with(size, DEFAULT_CANDIDATE_COUNT, dest).await
    }

    pub async fn download_latest_image_with(
        &self,
        size: ImageSize,
        candidate_count: usize,
        dest: impl AsRef<Path>,
    ) -> Result<LatestImage> {
        let dest = dest.as_ref();
        validate_destination(dest)?;

        let latest = self.latest_image(size, candidate_count).await?;
        save_image(&latest.image, dest)?;
        Ok(latest)
    }
}
