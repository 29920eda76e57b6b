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

//! In-memory fetcher shared by the integration tests.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Mutex;
use std::time::Duration;

use amesh_client::{ClientError, Fetcher, Result};
use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

pub const BASE_URL: &str = "http://amesh.test";
pub const INDEX_URL: &str = "http://amesh.test/scripts/mesh_index.js";

/// Serves canned responses and records every requested URL.
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    responses: Mutex<HashMap<String, Vec<u8>>>,
    requests: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slow every response down so concurrent callers overlap.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn respond(&self, url: impl Into<String>, body: Vec<u8>) {
        self.responses.lock().unwrap().insert(url.into(), body);
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests_matching(&self, needle: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|url| url.contains(needle))
            .count()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        self.requests.lock().unwrap().push(url.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let body = self.responses.lock().unwrap().get(url).cloned();
        body.ok_or_else(|| ClientError::status(url, 404))
    }
}

pub fn encode(image: &RgbaImage, format: ImageFormat) -> Vec<u8> {
    let dynamic = DynamicImage::ImageRgba8(image.clone());
    let dynamic = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(dynamic.to_rgb8()),
        _ => dynamic,
    };

    let mut bytes = Cursor::new(Vec::new());
    dynamic.write_to(&mut bytes, format).unwrap();
    bytes.into_inner()
}

/// Register base map and mask layers for the small size.
///
/// The base map is 400x200, the mask 500x500 and fully transparent.
pub fn serve_static_layers(fetcher: &ScriptedFetcher) {
    serve_map_with_mask(fetcher, &RgbaImage::from_pixel(500, 500, Rgba([0, 0, 0, 0])));
}

/// Register the 400x200 base map together with a custom mask layer.
pub fn serve_map_with_mask(fetcher: &ScriptedFetcher, mask: &RgbaImage) {
    let map = RgbaImage::from_pixel(400, 200, Rgba([40, 120, 40, 255]));
    fetcher.respond(
        format!("{BASE_URL}/map/map000.jpg"),
        encode(&map, ImageFormat::Jpeg),
    );
    fetcher.respond(
        format!("{BASE_URL}/map/msk000.png"),
        encode(mask, ImageFormat::Png),
    );
}

/// Register a small radar mesh frame for `index`.
pub fn serve_mesh(fetcher: &ScriptedFetcher, index: &str) {
    let mesh = RgbaImage::from_pixel(100, 100, Rgba([200, 0, 200, 255]));
    fetcher.respond(
        format!("{BASE_URL}/mesh/000/{index}.gif"),
        encode(&mesh, ImageFormat::Gif),
    );
}
