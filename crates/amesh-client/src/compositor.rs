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

//! Layered radar image compositing.
//!
//! A finished image is the base map with the radar mesh, the coastline mask
//! and the timestamp label drawn over it, in that order, all anchored at the
//! top-left corner. The three remote layers are fetched concurrently and the
//! whole operation fails if any one of them does.

use std::path::Path;
use std::sync::Arc;

use image::{imageops, DynamicImage, ImageFormat, RgbaImage};
use log::{debug, info};

use crate::error::{ClientError, Result};
use crate::fetch::Fetcher;
use crate::label::render_label;
use crate::mesh::MeshIndex;
use crate::size::ImageSize;

/// Fetches layers and builds composites.
#[derive(Clone)]
pub struct ImageCompositor {
    fetcher: Arc<dyn Fetcher>,
    base_url: String,
}

impl std::fmt::Debug for ImageCompositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCompositor")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ImageCompositor {
    #[must_use]
    pub fn new(fetcher: Arc<dyn Fetcher>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { fetcher, base_url }
    }

    /// Base map URL, e.g. `{base}/map/map000.jpg`
    #[must_use]
    pub fn map_url(&self, size: ImageSize) -> String {
        format!("{}/map/map{}.jpg", self.base_url, size.code())
    }

    /// Mask overlay URL, e.g. `{base}/map/msk000.png`
    #[must_use]
    pub fn mask_url(&self, size: ImageSize) -> String {
        format!("{}/map/msk{}.png", self.base_url, size.code())
    }

    /// Radar mesh URL, e.g. `{base}/mesh/000/201705301305.gif`
    #[must_use]
    pub fn mesh_url(&self, size: ImageSize, index: &MeshIndex) -> String {
        format!("{}/mesh/{}/{}.gif", self.base_url, size.code(), index)
    }

    pub async fn map_image(&self, size: ImageSize) -> Result<RgbaImage> {
        self.fetch_layer(&self.map_url(size), ImageFormat::Jpeg).await
    }

    pub async fn mask_image(&self, size: ImageSize) -> Result<RgbaImage> {
        self.fetch_layer(&self.mask_url(size), ImageFormat::Png).await
    }

    pub async fn mesh_image(&self, size: ImageSize, index: &MeshIndex) -> Result<RgbaImage> {
        self.fetch_layer(&self.mesh_url(size, index), ImageFormat::Gif).await
    }

    async fn fetch_layer(&self, url: &str, format: ImageFormat) -> Result<RgbaImage> {
        let bytes = self.fetcher.fetch_bytes(url).await?;
        let image = image::load_from_memory_with_format(&bytes, format).map_err(|e| {
            ClientError::Decode {
                url: url.to_string(),
                source: e,
            }
        })?;
        Ok(image.to_rgba8())
    }

    /// Build the composite for one frame.
    ///
    /// The result always has the base map's dimensions; larger layers are
    /// clipped.
    pub async fn image(&self, size: ImageSize, index: &MeshIndex) -> Result<RgbaImage> {
        debug!("Compositing {} image for {}", size, index);

        let (map, mesh, mask) = tokio::try_join!(
            self.map_image(size),
            self.mesh_image(size, index),
            self.mask_image(size),
        )?;
        let label = render_label(index);

        Ok(composite(map, &[&mesh, &mask, &label]))
    }

    /// Build the composite for one frame and write it to `dest`.
    ///
    /// The output codec follows the file extension.
    pub async fn download_image(
        &self,
        size: ImageSize,
        index: &MeshIndex,
        dest: impl AsRef<Path>,
    ) -> Result<RgbaImage> {
        let dest = dest.as_ref();
        validate_destination(dest)?;

        let image = self.image(size, index).await?;
        save_image(&image, dest)?;
        Ok(image)
    }
}

/// Draw each layer over `base` at (0, 0) with source-over alpha.
#[must_use]
pub fn composite(mut base: RgbaImage, layers: &[&RgbaImage]) -> RgbaImage {
    for layer in layers {
        imageops::overlay(&mut base, *layer, 0, 0);
    }
    base
}

pub(crate) fn validate_destination(dest: &Path) -> Result<()> {
    if dest.as_os_str().is_empty() {
        return Err(ClientError::Validation(
            "destination path is empty".to_string(),
        ));
    }
    Ok(())
}

/// Write an image, picking the codec from the path's extension.
pub fn save_image(image: &RgbaImage, dest: &Path) -> Result<()> {
    let write_error = |source| ClientError::Write {
        path: dest.to_path_buf(),
        source,
    };

    let format = ImageFormat::from_path(dest).map_err(write_error)?;
    let dynamic = DynamicImage::ImageRgba8(image.clone());

    // JPEG has no alpha channel
    let dynamic = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(dynamic.to_rgb8()),
        _ => dynamic,
    };

    dynamic.save_with_format(dest, format).map_err(write_error)?;
    info!(
        "Saved {}x{} image to {}",
        image.width(),
        image.height(),
        dest.display()
    );
    Ok(())
}
