//! Integration tests against a mock jukebox server

use std::sync::{Arc, Mutex};
use std::time::Duration;

use jukebox_remote::core::client::RemoteClient;
use jukebox_remote::core::dispatcher::Dispatcher;
use jukebox_remote::core::poller;
use jukebox_remote::core::refresh::Refresher;
use jukebox_remote::core::surface::{Controls, Surface};
use jukebox_remote::types::{
    Command, DispatchOutcome, HistoryRegion, NowPlayingRegion, RenderedRegions, UserIdentity,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct RecordingSurface {
    renders: Mutex<Vec<RenderedRegions>>,
    alerts: Mutex<Vec<String>>,
}

impl RecordingSurface {
    fn renders(&self) -> Vec<RenderedRegions> {
        self.renders.lock().unwrap().clone()
    }

    fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

impl Surface for RecordingSurface {
    fn render(&self, regions: &RenderedRegions) {
        self.renders.lock().unwrap().push(regions.clone());
    }

    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}

struct FixedControls {
    allow_age_restricted: bool,
    identity: UserIdentity,
}

impl Controls for FixedControls {
    fn allow_age_restricted(&self) -> bool {
        self.allow_age_restricted
    }

    fn identity(&self) -> UserIdentity {
        self.identity.clone()
    }
}

struct Harness {
    dispatcher: Dispatcher,
    refresher: Arc<Refresher>,
    surface: Arc<RecordingSurface>,
}

fn harness(base_url: &str, controls: FixedControls) -> Harness {
    let client = RemoteClient::new(base_url).unwrap();
    let surface = Arc::new(RecordingSurface::default());
    let display: Arc<dyn Surface> = surface.clone();
    let refresher = Arc::new(Refresher::new(client, display));
    let dispatcher = Dispatcher::new(Arc::clone(&refresher), Arc::new(controls));
    Harness {
        dispatcher,
        refresher,
        surface,
    }
}

fn anonymous() -> FixedControls {
    FixedControls {
        allow_age_restricted: false,
        identity: UserIdentity::default(),
    }
}

fn snapshot_json() -> serde_json::Value {
    json!({
        "now": {
            "title": "Dayvan Cowboy",
            "uploader": "Boards of Canada",
            "position": 95,
            "duration": 300.0,
            "paused": false,
            "url": "https://example.invalid/stream"
        },
        "queue": [
            {"id": "a1", "title": "Roygbiv", "uploader": "Boards of Canada", "duration": 151, "added_by": "🎸 Sam"},
            {"id": "b2", "title": "Olson", "uploader": "Boards of Canada", "duration": 91, "added_by": "autoplay"}
        ],
        "history": [
            {"id": "x", "title": "T", "uploader": "U", "duration": 200, "added_by": "alice"}
        ]
    })
}

async fn mount_queue(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/queue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn requests_to(server: &MockServer, endpoint: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == endpoint)
        .count()
}

#[tokio::test]
async fn test_refresh_renders_snapshot() {
    let server = MockServer::start().await;
    mount_queue(&server, snapshot_json()).await;

    let h = harness(&server.uri(), anonymous());
    assert!(h.refresher.refresh().await);

    let renders = h.surface.renders();
    assert_eq!(renders.len(), 1);
    assert_eq!(renders[0].now_playing.toggle(), Some(Command::Pause));
    assert_eq!(renders[0].queue.count_label, "2 songs");
    assert!(matches!(renders[0].history, HistoryRegion::Visible { .. }));
}

#[tokio::test]
async fn test_refresh_tolerates_missing_history_and_null_now() {
    let server = MockServer::start().await;
    mount_queue(&server, json!({"now": null, "queue": []})).await;

    let h = harness(&server.uri(), anonymous());
    assert!(h.refresher.refresh().await);

    let renders = h.surface.renders();
    assert!(matches!(renders[0].now_playing, NowPlayingRegion::Idle { .. }));
    assert_eq!(renders[0].history, HistoryRegion::Hidden);
    assert_eq!(renders[0].queue.count_label, "0 songs");
}

#[tokio::test]
async fn test_failed_fetch_leaves_previous_render() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/queue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(snapshot_json()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/queue"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let h = harness(&server.uri(), anonymous());
    assert!(h.refresher.refresh().await);
    assert!(!h.refresher.refresh().await);

    assert_eq!(h.surface.renders().len(), 1);
    assert!(h.surface.alerts().is_empty());
}

#[tokio::test]
async fn test_add_sends_typed_payload_then_refreshes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/add"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "q": "aphex twin xtal",
            "play_next": true,
            "allow_age_restricted": true,
            "by": "🦊 DJ"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"ok": true, "item": {"id": "c3"}})),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_queue(&server, snapshot_json()).await;

    let h = harness(
        &server.uri(),
        FixedControls {
            allow_age_restricted: true,
            identity: UserIdentity {
                alias: Some("DJ".into()),
                emoji: Some("🦊".into()),
            },
        },
    );
    let outcome = h.dispatcher.add("aphex twin xtal", true).await;

    assert_eq!(outcome, DispatchOutcome::Applied);
    assert_eq!(requests_to(&server, "/queue").await, 1);
    assert_eq!(h.surface.renders().len(), 1);
    assert!(h.surface.alerts().is_empty());
}

#[tokio::test]
async fn test_whitespace_add_makes_no_call() {
    let server = MockServer::start().await;
    mount_queue(&server, snapshot_json()).await;

    let h = harness(&server.uri(), anonymous());
    let outcome = h.dispatcher.add("   ", false).await;

    assert_eq!(outcome, DispatchOutcome::Ignored);
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
    assert!(h.surface.alerts().is_empty());
}

#[tokio::test]
async fn test_rejected_add_alerts_and_still_refreshes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/add"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"ok": false, "error": "blocked"})),
        )
        .mount(&server)
        .await;
    mount_queue(&server, snapshot_json()).await;

    let h = harness(&server.uri(), anonymous());
    let outcome = h.dispatcher.add("something loud", false).await;

    assert_eq!(outcome, DispatchOutcome::Rejected("blocked".into()));
    let alerts = h.surface.alerts();
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].contains("blocked"));
    assert_eq!(requests_to(&server, "/queue").await, 1);
    assert_eq!(h.surface.renders().len(), 1);
}

#[tokio::test]
async fn test_rejected_add_without_reason_says_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/add"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": false})))
        .mount(&server)
        .await;
    mount_queue(&server, snapshot_json()).await;

    let h = harness(&server.uri(), anonymous());
    let outcome = h.dispatcher.add("x", false).await;

    assert_eq!(outcome, DispatchOutcome::Rejected("unknown".into()));
    assert_eq!(h.surface.alerts(), vec!["Error: unknown".to_string()]);
}

#[tokio::test]
async fn test_malformed_command_answer_skips_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/skip"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;
    mount_queue(&server, snapshot_json()).await;

    let h = harness(&server.uri(), anonymous());
    let outcome = h.dispatcher.dispatch(Command::Skip).await;

    assert!(matches!(outcome, DispatchOutcome::Failed(_)));
    assert_eq!(h.surface.alerts().len(), 1);
    assert_eq!(requests_to(&server, "/queue").await, 0);
    assert!(h.surface.renders().is_empty());
}

#[tokio::test]
async fn test_unreachable_server_add_fails_without_refresh() {
    // Grab a free port, then close it so connections are refused
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let h = harness(&format!("http://{}", addr), anonymous());
    let outcome = h.dispatcher.add("anything", false).await;

    let DispatchOutcome::Failed(message) = outcome else {
        panic!("expected transport failure, got {:?}", outcome);
    };
    assert_eq!(h.surface.alerts(), vec![format!("Error: {}", message)]);
    assert!(h.surface.renders().is_empty());
}

#[tokio::test]
async fn test_playback_commands_hit_their_endpoints() {
    let server = MockServer::start().await;
    for endpoint in ["/play", "/pause", "/skip"] {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("POST"))
        .and(path("/seek"))
        .and(body_json(json!({"pos": 42.0})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;
    mount_queue(&server, snapshot_json()).await;

    let h = harness(&server.uri(), anonymous());
    for command in [
        Command::Play,
        Command::Pause,
        Command::Skip,
        Command::Seek { pos: 42.0 },
    ] {
        assert_eq!(h.dispatcher.dispatch(command).await, DispatchOutcome::Applied);
    }

    assert_eq!(requests_to(&server, "/queue").await, 4);
    assert_eq!(h.surface.renders().len(), 4);
}

#[tokio::test]
async fn test_replay_searches_title_and_uploader() {
    let server = MockServer::start().await;
    mount_queue(&server, snapshot_json()).await;
    Mock::given(method("POST"))
        .and(path("/add"))
        .and(body_json(json!({
            "q": "T U",
            "play_next": false,
            "allow_age_restricted": false,
            "by": "Anonymous"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server.uri(), anonymous());
    let outcome = h.dispatcher.replay("x").await;

    assert_eq!(outcome, DispatchOutcome::Applied);
    // One lookup fetch, one post-add refresh
    assert_eq!(requests_to(&server, "/queue").await, 2);
}

#[tokio::test]
async fn test_replay_of_missing_id_is_silent() {
    let server = MockServer::start().await;
    mount_queue(&server, snapshot_json()).await;

    let h = harness(&server.uri(), anonymous());
    let outcome = h.dispatcher.replay("aged-out").await;

    assert_eq!(outcome, DispatchOutcome::Ignored);
    assert_eq!(requests_to(&server, "/add").await, 0);
    assert!(h.surface.alerts().is_empty());
    assert!(h.surface.renders().is_empty());
}

#[tokio::test]
async fn test_stale_response_is_discarded() {
    let server = MockServer::start().await;
    // First fetch answers late with an empty queue
    Mock::given(method("GET"))
        .and(path("/queue"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"queue": []}))
                .set_delay(Duration::from_millis(400)),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_queue(&server, snapshot_json()).await;

    let h = harness(&server.uri(), anonymous());

    let slow = {
        let refresher = Arc::clone(&h.refresher);
        tokio::spawn(async move { refresher.refresh().await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(h.refresher.refresh().await);
    assert!(!slow.await.unwrap());

    let renders = h.surface.renders();
    assert_eq!(renders.len(), 1);
    assert_eq!(renders[0].queue.count_label, "2 songs");
}

#[tokio::test]
async fn test_poll_loop_fetches_immediately() {
    let server = MockServer::start().await;
    mount_queue(&server, snapshot_json()).await;

    let h = harness(&server.uri(), anonymous());
    let run = poller::run(Arc::clone(&h.refresher), Duration::from_secs(60));
    let _ = tokio::time::timeout(Duration::from_millis(300), run).await;

    assert_eq!(requests_to(&server, "/queue").await, 1);
    assert_eq!(h.surface.renders().len(), 1);
}

#[tokio::test]
async fn test_poll_loop_keeps_ticking_after_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/queue"))
        .respond_with(ResponseTemplate::new(500).set_body_string("down"))
        .mount(&server)
        .await;

    let h = harness(&server.uri(), anonymous());
    let run = poller::run(Arc::clone(&h.refresher), Duration::from_millis(50));
    let elapsed = tokio::time::timeout(Duration::from_millis(275), run).await;
    assert!(elapsed.is_err(), "poll loop should never return");

    // Let in-flight ticks land
    tokio::time::sleep(Duration::from_millis(150)).await;

    assert!(requests_to(&server, "/queue").await >= 3);
    assert!(h.surface.renders().is_empty());
    assert!(h.surface.alerts().is_empty());
}
