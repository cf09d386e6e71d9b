//! Integration tests: push listener against a scripted Engine.IO polling server.

mod common;

use common::file_server::{self, TestReply, TestRequest};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use ttv_core::api::User;
use ttv_core::config::TtvConfig;
use ttv_core::push::{PushError, PushEvent, PushListener, RefreshTarget};
use ttv_core::session::Session;

const OPEN: &str =
    r#"0{"sid":"eio1","upgrades":["websocket"],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#;

fn session(base: &str, dir: &std::path::Path) -> Session {
    Session {
        server_url: base.to_string(),
        user: User {
            id: 1,
            username: "alice".into(),
        },
        cookie_jar: dir.join("cookies.txt"),
        established_at: 1_700_000_000,
    }
}

fn file_json(id: i64, name: &str, uploader: &str) -> serde_json::Value {
    json!({
        "id": id,
        "filename": name,
        "stored_filename": format!("{id}_{name}_1700000000"),
        "sha256": "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
        "uploader_id": id,
        "uploader_username": uploader,
        "upload_timestamp": 1700000000
    })
}

/// Scripted server: each GET with a sid returns the next entry of `polls`;
/// once they run out, the poll blocks for a while and returns a noop.
/// Every POST body is recorded.
fn engine_server(polls: Vec<String>, posts: Arc<Mutex<Vec<String>>>) -> String {
    let next = AtomicUsize::new(0);
    file_server::start(move |req: &TestRequest| {
        if !req.path().starts_with("/socket.io") || req.query("EIO") != Some("4") {
            return TestReply::new(404, "not found");
        }
        if req.method == "POST" {
            posts.lock().unwrap().push(req.body_text());
            return TestReply::text("ok");
        }
        if req.query("sid").is_none() {
            return TestReply::text(OPEN);
        }
        match polls.get(next.fetch_add(1, Ordering::SeqCst)) {
            Some(body) if body == "400" => TestReply::json(
                400,
                json!({"code": 1, "message": "Session ID unknown"}),
            ),
            Some(body) => TestReply::text(body),
            None => {
                std::thread::sleep(Duration::from_secs(5));
                TestReply::text("6")
            }
        }
    })
}

async fn collect(mut rx: mpsc::Receiver<PushEvent>) -> Vec<PushEvent> {
    let mut events = Vec::new();
    while let Some(ev) = rx.recv().await {
        events.push(ev);
    }
    events
}

#[tokio::test]
async fn events_are_delivered_until_server_closes() {
    let sep = '\u{1e}';
    let uploaded = json!(["new_file_uploaded", {"file": file_json(4, "d.txt", "bob"), "uploader": "bob"}]);
    let shared = json!(["file_shared_with_me", {
        "file_id": 5, "file_info": file_json(5, "e.pdf", "carol"), "sender_username": "carol"
    }]);
    let polls = vec![
        format!(
            r#"40{{"sid":"ns1"}}{sep}2{sep}42["my_response",{{"data":"Connected"}}]{sep}42{uploaded}"#
        ),
        format!("42{shared}{sep}1"),
    ];
    let posts: Arc<Mutex<Vec<String>>> = Arc::default();
    let base = engine_server(polls, Arc::clone(&posts));
    let dir = tempfile::tempdir().unwrap();

    let listener = PushListener::new(&TtvConfig::default(), &session(&base, dir.path())).unwrap();
    let (tx, rx) = mpsc::channel(16);
    let handle = listener.spawn(tx);
    let events = collect(rx).await;
    handle.await.unwrap().expect("listener ends cleanly");

    assert_eq!(events.len(), 5, "events: {events:?}");
    assert_eq!(
        events[0],
        PushEvent::Connected {
            sid: "ns1".to_string()
        }
    );
    assert!(matches!(&events[1], PushEvent::ServerGreeting(g) if g.data == "Connected"));
    match &events[2] {
        PushEvent::NewFileUploaded(n) => {
            assert_eq!(n.uploader, "bob");
            assert_eq!(n.file.stored_filename, "4_d.txt_1700000000");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(
        events[3].headline().as_deref(),
        Some("New file \"e.pdf\" shared by carol!")
    );
    assert_eq!(
        events[3].refresh_targets(),
        &[RefreshTarget::SharedFiles, RefreshTarget::DownloadCatalog]
    );
    assert_eq!(events[4], PushEvent::Disconnected);

    let posts = posts.lock().unwrap();
    assert_eq!(posts.first().map(String::as_str), Some("40"));
    assert!(posts.iter().any(|p| p == "3"), "pong expected in {posts:?}");
}

#[tokio::test]
async fn stop_token_aborts_pending_poll() {
    let posts: Arc<Mutex<Vec<String>>> = Arc::default();
    let base = engine_server(vec![r#"40{"sid":"ns1"}"#.to_string()], Arc::clone(&posts));
    let dir = tempfile::tempdir().unwrap();

    let listener = PushListener::new(&TtvConfig::default(), &session(&base, dir.path())).unwrap();
    let stop = listener.stop_token();
    let (tx, mut rx) = mpsc::channel(16);
    let handle = listener.spawn(tx);

    let first = rx.recv().await.expect("connected event");
    assert!(matches!(first, PushEvent::Connected { .. }));
    stop.store(true, Ordering::Relaxed);

    tokio::time::timeout(Duration::from_secs(4), handle)
        .await
        .expect("listener should stop before the poll returns")
        .unwrap()
        .unwrap();
    let posts = posts.lock().unwrap();
    assert_eq!(posts.last().map(String::as_str), Some("41\u{1e}1"));
}

#[tokio::test]
async fn unknown_session_is_handshake_error() {
    let posts: Arc<Mutex<Vec<String>>> = Arc::default();
    let base = engine_server(vec!["400".to_string()], posts);
    let dir = tempfile::tempdir().unwrap();

    let listener = PushListener::new(&TtvConfig::default(), &session(&base, dir.path())).unwrap();
    let (tx, rx) = mpsc::channel(16);
    let handle = listener.spawn(tx);
    assert!(collect(rx).await.is_empty());
    match handle.await.unwrap() {
        Err(PushError::Handshake(msg)) => assert!(msg.contains("Session ID unknown")),
        other => panic!("expected handshake error, got {other:?}"),
    }
}
