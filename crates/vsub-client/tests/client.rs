//! Client tests against a stubbed orchestrator: API surface, adaptive
//! polling bounds, and the dual-track filmstrip loader.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vsub_client::{
    FilmstripLoader, FilmstripState, FrameSource, LoadRequest, LocalFrame, OrchestratorClient,
    PollConfig, PollOutcome, StatusPoller,
};
use vsub_models::VideoId;

fn project_json(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "title": "clip",
        "sourceUrl": "/uploads/videos/clip.mp4",
        "durationSeconds": 20.0,
        "status": status,
        "createdAt": "2026-01-01T00:00:00Z",
        "updatedAt": "2026-01-01T00:00:00Z"
    })
}

fn filmstrip_json() -> Value {
    json!({
        "filmstrip": {
            "uri": "/uploads/thumbnails/v1/filmstrip.jpg",
            "frameCount": 15,
            "frameWidthPx": 160,
            "frameHeightPx": 90,
            "totalWidthPx": 2400,
            "fileSizeBytes": 118324
        }
    })
}

/// A fast schedule so tests finish in milliseconds.
fn fast_config() -> PollConfig {
    PollConfig {
        initial: Duration::from_millis(10),
        factor: 1.2,
        max: Duration::from_millis(20),
        timeout: Duration::from_secs(5),
        max_attempts: 90,
    }
}

async fn client_for(server: &MockServer) -> Arc<OrchestratorClient> {
    Arc::new(OrchestratorClient::new(&server.uri()).expect("client"))
}

#[tokio::test]
async fn test_get_filmstrip_maps_404_to_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/videos/v1/filmstrip"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "no filmstrip"})))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let filmstrip = client.get_filmstrip(&VideoId::from("v1")).await.unwrap();
    assert!(filmstrip.is_none());
}

#[tokio::test]
async fn test_api_error_carries_server_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/videos/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "video missing"})))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.get_video(&VideoId::from("missing")).await.unwrap_err();
    match err {
        vsub_client::ClientError::Api { status, detail } => {
            assert_eq!(status, 404);
            assert_eq!(detail, "video missing");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_poller_stops_on_terminal_status() {
    let server = MockServer::start().await;
    // Two in-progress responses, then terminal.
    Mock::given(method("GET"))
        .and(path("/api/videos/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_json("v1", "transcribing")))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/videos/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_json("v1", "ready")))
        .mount(&server)
        .await;

    let poller = StatusPoller::new(client_for(&server).await, fast_config());
    let handle = poller.watch_status(VideoId::from("v1"));
    match handle.outcome().await.unwrap() {
        PollOutcome::Terminal(project) => {
            assert_eq!(project.status.as_str(), "ready");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    // Exactly three polls happened.
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_poller_times_out_on_wall_clock() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/videos/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_json("v1", "rendering")))
        .mount(&server)
        .await;

    let config = PollConfig {
        timeout: Duration::from_millis(50),
        ..fast_config()
    };
    let poller = StatusPoller::new(client_for(&server).await, config);
    let handle = poller.watch_status(VideoId::from("v1"));
    assert!(matches!(
        handle.outcome().await.unwrap(),
        PollOutcome::TimedOut
    ));
}

#[tokio::test]
async fn test_poller_respects_attempt_cap() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/videos/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_json("v1", "rendering")))
        .expect(2)
        .mount(&server)
        .await;

    let config = PollConfig {
        max_attempts: 2,
        ..fast_config()
    };
    let poller = StatusPoller::new(client_for(&server).await, config);
    let handle = poller.watch_status(VideoId::from("v1"));
    assert!(matches!(
        handle.outcome().await.unwrap(),
        PollOutcome::AttemptsExhausted
    ));
}

#[tokio::test]
async fn test_poller_swallows_transient_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/videos/v1"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "hiccup"})))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/videos/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_json("v1", "completed")))
        .mount(&server)
        .await;

    let poller = StatusPoller::new(client_for(&server).await, fast_config());
    let handle = poller.watch_status(VideoId::from("v1"));
    match handle.outcome().await.unwrap() {
        PollOutcome::Terminal(project) => assert_eq!(project.status.as_str(), "completed"),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

mockall::mock! {
    Frames {}

    #[async_trait::async_trait]
    impl FrameSource for Frames {
        async fn extract(
            &self,
            source: &Path,
            timestamps: &[f64],
            output_dir: &Path,
        ) -> vsub_client::ClientResult<Vec<LocalFrame>>;
    }
}

fn load_request(id: &str, duration: f64) -> LoadRequest {
    LoadRequest {
        video_id: VideoId::from(id),
        source_path: PathBuf::from("/tmp/clip.mp4"),
        duration_seconds: duration,
        output_dir: PathBuf::from("/tmp/frames"),
    }
}

#[tokio::test]
async fn test_filmstrip_cache_hit_skips_both_tracks() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/videos/v1/filmstrip"))
        .respond_with(ResponseTemplate::new(200).set_body_json(filmstrip_json()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/videos/v1/filmstrip"))
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&server)
        .await;

    let mut frames = MockFrames::new();
    frames.expect_extract().times(0);

    let loader = FilmstripLoader::new(client_for(&server).await, Arc::new(frames), fast_config());
    let state = loader.load(load_request("v1", 20.0)).finished().await;
    match state {
        FilmstripState::FilmstripReady(filmstrip) => assert_eq!(filmstrip.frame_count, 15),
        other => panic!("unexpected state: {other:?}"),
    }
}

#[tokio::test]
async fn test_dual_track_canvas_then_sprite_swap() {
    let server = MockServer::start().await;
    // Cache check misses, the first poll misses, the second poll hits.
    Mock::given(method("GET"))
        .and(path("/api/videos/v1/filmstrip"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "no filmstrip"})))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/videos/v1/filmstrip"))
        .respond_with(ResponseTemplate::new(200).set_body_json(filmstrip_json()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/videos/v1/filmstrip"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "status": "processing",
            "videoId": "v1",
            "message": "Filmstrip generation started"
        })))
        .expect(1)
        .mount(&server)
        .await;

    // 20 s of video means 15 canvas frames.
    let mut frames = MockFrames::new();
    frames
        .expect_extract()
        .withf(|_, timestamps, _| timestamps.len() == 15 && timestamps[0] == 0.0)
        .times(1)
        .returning(|_, timestamps, _| {
            Ok(timestamps
                .iter()
                .map(|&timestamp| LocalFrame {
                    timestamp,
                    path: PathBuf::from(format!("/tmp/frames/canvas_{timestamp:.1}.jpg")),
                })
                .collect())
        });

    let config = PollConfig {
        initial: Duration::from_millis(60),
        ..fast_config()
    };
    let loader = FilmstripLoader::new(client_for(&server).await, Arc::new(frames), config);
    let handle = loader.load(load_request("v1", 20.0));

    // The canvas track lands before the first remote poll fires.
    tokio::time::sleep(Duration::from_millis(30)).await;
    match handle.state() {
        FilmstripState::CanvasReady(local) => assert_eq!(local.len(), 15),
        other => panic!("expected canvas frames first, got {other:?}"),
    }

    match handle.finished().await {
        FilmstripState::FilmstripReady(filmstrip) => {
            assert_eq!(filmstrip.frame_count, 15);
            // Scaled into a timeline, the strip fills the container width.
            let display = filmstrip.scaled_for(800);
            assert_eq!(display.display_width_px, 800);
        }
        other => panic!("unexpected final state: {other:?}"),
    }
}

#[tokio::test]
async fn test_local_track_survives_remote_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/videos/v1/filmstrip"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "no filmstrip"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/videos/v1/filmstrip"))
        .respond_with(ResponseTemplate::new(502).set_body_json(json!({"detail": "worker down"})))
        .mount(&server)
        .await;

    let mut frames = MockFrames::new();
    frames.expect_extract().times(1).returning(|_, timestamps, _| {
        Ok(timestamps
            .iter()
            .map(|&timestamp| LocalFrame {
                timestamp,
                path: PathBuf::from("/tmp/frames/f.jpg"),
            })
            .collect())
    });

    let loader = FilmstripLoader::new(client_for(&server).await, Arc::new(frames), fast_config());
    let state = loader.load(load_request("v1", 20.0)).finished().await;
    match state {
        FilmstripState::CanvasReady(local) => assert_eq!(local.len(), 15),
        other => panic!("unexpected state: {other:?}"),
    }
}
