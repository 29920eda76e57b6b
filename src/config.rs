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

//! Application configuration management.
//!
//! This module handles persistent configuration storage using TOML format.
//! Every field has a default so partial or older files still load; files
//! written by an older version are upgraded and saved back on load.

use std::path::PathBuf;
use std::time::Duration;

use amesh_client::{ClientConfig, ImageSize, DEFAULT_BASE_URL, DEFAULT_CANDIDATE_COUNT};
use log::info;
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "amesh";
const CONFIG_NAME: &str = "config";

/// Application configuration stored in TOML format
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Configuration schema version for migrations
    #[serde(default = "default_config_version")]
    pub config_version: u32,

    /// Amesh server root for map, mask and mesh images
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// URL of the published mesh index listing
    #[serde(default = "default_mesh_index_url")]
    pub mesh_index_url: String,

    /// Image size used when none is given on the command line
    #[serde(default)]
    pub default_size: ImageSize,

    /// Number of recent frames to try when resolving the latest image
    #[serde(default = "default_candidate_count")]
    pub candidate_count: usize,

    /// Whole-request HTTP timeout in seconds (0 disables the timeout)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Directory for images saved without an explicit path
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

// Default value functions for serde
fn default_config_version() -> u32 {
    1 // Current schema version
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_mesh_index_url() -> String {
    amesh_client::DEFAULT_MESH_INDEX_URL.to_string()
}

fn default_candidate_count() -> usize {
    DEFAULT_CANDIDATE_COUNT
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_version: default_config_version(),
            base_url: default_base_url(),
            mesh_index_url: default_mesh_index_url(),
            default_size: ImageSize::default(),
            candidate_count: default_candidate_count(),
            request_timeout_secs: default_request_timeout_secs(),
            output_dir: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from disk, upgrading older schema versions
    pub fn load() -> Result<Self, confy::ConfyError> {
        let mut config: AppConfig = confy::load(APP_NAME, CONFIG_NAME)?;

        if config.config_version < default_config_version() {
            info!(
                "Upgrading configuration from version {} to {}",
                config.config_version,
                default_config_version()
            );
            config.config_version = default_config_version();
            config.save()?;
        }

        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<(), confy::ConfyError> {
        confy::store(APP_NAME, CONFIG_NAME, self)
    }

    /// Get the config file path for display to user
    pub fn get_config_path() -> Result<PathBuf, confy::ConfyError> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)
    }

    /// Request timeout, `None` when disabled
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    /// Build the library client configuration
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            mesh_index_url: self.mesh_index_url.clone(),
            ..Default::default()
        }
        .with_timeout(self.request_timeout())
    }

    /// Directory for default output paths, falling back to the working directory
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
