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

//! Subcommand implementations.

use std::path::{Path, PathBuf};

use amesh_client::{latest_candidates, Client, ImageSize, MeshIndex};
use log::info;

use crate::config::AppConfig;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Default file name for a saved frame, e.g. `amesh-201705301305-000.png`
fn default_file_name(index: &MeshIndex, size: ImageSize) -> String {
    format!("amesh-{}-{}.png", index, size.code())
}

pub async fn latest(
    config: &AppConfig,
    size: ImageSize,
    candidates: usize,
    output: Option<PathBuf>,
) -> CommandResult {
    let client = Client::new(config.client_config())?;

    let saved = match output {
        Some(path) => {
            let latest = client
                .download_latest_image_with(size, candidates, &path)
                .await?;
            (latest.index, path)
        }
        None => {
            // The file name needs the resolved index, so resolve first
            let latest = client.latest_image_with(size, candidates).await?;
            let path = config
                .output_dir()
                .join(default_file_name(&latest.index, size));
            amesh_client::compositor::save_image(&latest.image, &path)?;
            (latest.index, path)
        }
    };

    report_saved(&saved.0, &saved.1);
    Ok(())
}

pub async fn image(
    config: &AppConfig,
    index: &str,
    size: ImageSize,
    output: Option<PathBuf>,
) -> CommandResult {
    let index = MeshIndex::parse(index)?;
    let path = output.unwrap_or_else(|| config.output_dir().join(default_file_name(&index, size)));

    let client = Client::new(config.client_config())?;
    client.download_image(size, &index, &path).await?;

    report_saved(&index, &path);
    Ok(())
}

pub async fn indices(config: &AppConfig, limit: Option<usize>) -> CommandResult {
    let client = Client::new(config.client_config())?;
    let indices = client.mesh_indices().await?;

    if indices.is_empty() {
        info!("Server published no mesh indices");
    }

    for index in indices.iter().take(limit.unwrap_or(usize::MAX)) {
        println!("{}  {}", index, amesh_client::label::label_text(index));
    }
    Ok(())
}

pub fn candidates(count: usize) {
    for index in latest_candidates(count) {
        println!("{index}");
    }
}

pub fn show_config(config: &AppConfig) -> CommandResult {
    println!("Config file: {}", AppConfig::get_config_path()?.display());
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

fn report_saved(index: &MeshIndex, path: &Path) {
    info!("Frame {} saved", index);
    println!("{}", path.display());
}
