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

mod common;

use std::sync::Arc;

use amesh_client::mesh::jst;
use amesh_client::{Client, ClientConfig, ClientError, ImageSize, MeshIndex};
use chrono::{DateTime, FixedOffset, TimeZone};
use common::{serve_mesh, serve_static_layers, ScriptedFetcher, BASE_URL, INDEX_URL};

fn client(fetcher: &Arc<ScriptedFetcher>) -> Client {
    let config = ClientConfig {
        base_url: BASE_URL.to_string(),
        mesh_index_url: INDEX_URL.to_string(),
        ..Default::default()
    };
    Client::with_fetcher(&config, fetcher.clone())
}

/// Candidates at this time are 201705301305, 201705301300, 201705301255.
fn now() -> DateTime<FixedOffset> {
    jst().with_ymd_and_hms(2017, 5, 30, 13, 6, 0).unwrap()
}

#[tokio::test]
async fn test_newest_published_candidate_wins() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    serve_static_layers(&fetcher);
    serve_mesh(&fetcher, "201705301305");
    serve_mesh(&fetcher, "201705301300");
    let client = client(&fetcher);

    let latest = client
        .resolver()
        .latest_image_at(ImageSize::Small, 3, &now())
        .await
        .unwrap();

    assert_eq!(latest.index.as_str(), "201705301305");
    assert_eq!(fetcher.requests_matching("/mesh/"), 1);
}

#[tokio::test]
async fn test_falls_back_to_older_candidate() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    serve_static_layers(&fetcher);
    serve_mesh(&fetcher, "201705301300");
    let client = client(&fetcher);

    let latest = client
        .resolver()
        .latest_image_at(ImageSize::Small, 3, &now())
        .await
        .unwrap();

    assert_eq!(latest.index.as_str(), "201705301300");
    assert_eq!(latest.image.dimensions(), (400, 200));
    assert_eq!(fetcher.requests_matching("201705301305.gif"), 1);
    assert_eq!(fetcher.requests_matching("201705301300.gif"), 1);
    assert_eq!(fetcher.requests_matching("201705301255.gif"), 0);
}

#[tokio::test]
async fn test_undecodable_candidate_is_skipped() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    serve_static_layers(&fetcher);
    fetcher.respond(
        format!("{BASE_URL}/mesh/000/201705301305.gif"),
        b"not a gif".to_vec(),
    );
    serve_mesh(&fetcher, "201705301300");
    let client = client(&fetcher);

    let latest = client
        .resolver()
        .latest_image_at(ImageSize::Small, 3, &now())
        .await
        .unwrap();

    assert_eq!(latest.index.as_str(), "201705301300");
}

#[tokio::test]
async fn test_all_candidates_missing() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    serve_static_layers(&fetcher);
    let client = client(&fetcher);

    let result = client
        .resolver()
        .latest_image_at(ImageSize::Small, 3, &now())
        .await;

    assert!(matches!(result, Err(ClientError::NotFound { candidates: 3 })));
    assert_eq!(fetcher.requests_matching("/mesh/"), 3);
    assert_eq!(fetcher.requests_matching("201705301250.gif"), 0);
}

#[tokio::test]
async fn test_zero_candidates_makes_no_requests() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let client = client(&fetcher);

    let result = client
        .resolver()
        .latest_image_at(ImageSize::Small, 0, &now())
        .await;

    assert!(matches!(result, Err(ClientError::NotFound { candidates: 0 })));
    assert_eq!(fetcher.request_count(), 0);
}

#[tokio::test]
async fn test_download_latest_rejects_empty_path() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    serve_static_layers(&fetcher);
    let client = client(&fetcher);

    let result = client.download_latest_image(ImageSize::Small, "").await;

    assert!(matches!(result, Err(ClientError::Validation(_))));
    assert_eq!(fetcher.request_count(), 0);
}

#[tokio::test]
async fn test_download_image_rejects_empty_path() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let client = client(&fetcher);
    let index: MeshIndex = "201705301305".parse().unwrap();

    let result = client.download_image(ImageSize::Small, &index, "").await;

    assert!(matches!(result, Err(ClientError::Validation(_))));
    assert_eq!(fetcher.request_count(), 0);
}

#[tokio::test]
async fn test_client_mesh_indices_use_index_url() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    fetcher.respond(INDEX_URL, br#"["201705301305","201705301300"]"#.to_vec());
    let client = client(&fetcher);

    let indices = client.mesh_indices().await.unwrap();

    assert_eq!(indices.len(), 2);
    assert_eq!(fetcher.requests(), vec![INDEX_URL.to_string()]);
    assert_eq!(client.catalog().cached().await, indices);
}

#[tokio::test]
async fn test_client_compositor_fetches_single_layer() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    serve_static_layers(&fetcher);
    let client = client(&fetcher);

    let mask = client.compositor().mask_image(ImageSize::Small).await.unwrap();

    assert_eq!(mask.dimensions(), (500, 500));
    assert_eq!(fetcher.requests(), vec![format!("{BASE_URL}/map/msk000.png")]);
}
