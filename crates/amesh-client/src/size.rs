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

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Image resolutions published by Amesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    #[default]
    Small,
    Large,
}

impl ImageSize {
    /// Path segment used by the server for this size
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            ImageSize::Small => "000",
            ImageSize::Large => "100",
        }
    }

    /// Get human-readable display name
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            ImageSize::Small => "Small",
            ImageSize::Large => "Large",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ImageSize {
    type Err = ClientError;

    /// Accepts the names (`small`, `large`) or the server codes (`000`, `100`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "small" | "000" => Ok(ImageSize::Small),
            "large" | "100" => Ok(ImageSize::Large),
            other => Err(ClientError::Format(format!("unknown image size {other:?}"))),
        }
    }
}
