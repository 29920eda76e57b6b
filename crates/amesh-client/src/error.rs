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

//! Error types shared by every layer of the client.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching, decoding or compositing radar images.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request failed in transport or returned a non-success status.
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// Fetched bytes were not a valid image of the expected codec.
    #[error("failed to decode image from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: image::ImageError,
    },

    /// A mesh index or size token was malformed.
    #[error("invalid format: {0}")]
    Format(String),

    /// Caller input was rejected before any network activity.
    #[error("invalid argument: {0}")]
    Validation(String),

    /// The composite could not be written to disk.
    #[error("failed to write image to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Every latest-image candidate failed.
    #[error("no image found among the {candidates} most recent candidates")]
    NotFound { candidates: usize },
}

impl ClientError {
    /// Build a fetch error for a non-success HTTP status.
    #[must_use]
    pub fn status(url: &str, status: u16) -> Self {
        Self::Fetch {
            url: url.to_string(),
            reason: format!("HTTP {status}"),
        }
    }

    /// Build a fetch error from a transport failure.
    #[must_use]
    pub fn transport(url: &str, err: &dyn std::error::Error) -> Self {
        Self::Fetch {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }

    /// Whether the error means "this frame is not available (yet)".
    ///
    /// The latest-image resolver skips to the next candidate on these and
    /// surfaces everything else.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::Decode { .. })
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClientError>;
