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

mod commands;
mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use amesh_client::ImageSize;
use clap::{Parser, Subcommand};
use log::error;

use config::AppConfig;

/// Download composited Tokyo Amesh precipitation radar images.
#[derive(Debug, Parser)]
#[command(name = "amesh", version, about)]
struct Cli {
    /// Override the Amesh server root
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Override the HTTP request timeout in seconds (0 disables it)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Save the newest published radar image
    Latest {
        /// Image size: small, large, 000 or 100
        #[arg(short, long)]
        size: Option<ImageSize>,

        /// Number of recent frames to try
        #[arg(short = 'n', long)]
        candidates: Option<usize>,

        /// Output file; the extension selects the format
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Save the radar image for one mesh index
    Image {
        /// 12-digit mesh index (YYYYMMDDHHmm, JST)
        index: String,

        /// Image size: small, large, 000 or 100
        #[arg(short, long)]
        size: Option<ImageSize>,

        /// Output file; the extension selects the format
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the mesh indices published by the server
    Indices {
        /// Print at most this many indices
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Print estimated latest mesh indices without contacting the server
    Candidates {
        /// Number of candidates
        #[arg(short = 'n', long, default_value_t = amesh_client::DEFAULT_CANDIDATE_COUNT)]
        count: usize,
    },

    /// Show the configuration file location and effective settings
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        config.request_timeout_secs = timeout_secs;
    }

    match cli.command {
        Command::Latest {
            size,
            candidates,
            output,
        } => {
            let size = size.unwrap_or(config.default_size);
            let candidates = candidates.unwrap_or(config.candidate_count);
            commands::latest(&config, size, candidates, output).await?;
        }
        Command::Image {
            index,
            size,
            output,
        } => {
            let size = size.unwrap_or(config.default_size);
            commands::image(&config, &index, size, output).await?;
        }
        Command::Indices { limit } => commands::indices(&config, limit).await?,
        Command::Candidates { count } => commands::candidates(count),
        Command::Config => commands::show_config(&config)?,
    }

    Ok(())
}
