//! Integration tests for the session runner
//!
//! These drive a real session task over its command queue and assert on the
//! event bus and snapshot channel, including online initialization against
//! a local TCP layout server.

use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::time::timeout;
use weaver_core::config::ServerConfig;
use weaver_core::{LayoutPayload, Mode};
use weaver_events::{Direction, GameEvent, SignalSource};
use weaver_runner::{spawn_session, EventEnvelope, EventType, RunnerConfig, SystemEvent};

const WAIT: Duration = Duration::from_secs(5);

/// 5x5 layout with one collectible word next to the start cell
fn small_layout(category: &str) -> LayoutPayload {
    let mut words = vec![vec![String::new(); 5]; 5];
    let mut scores = vec![vec![0u32; 5]; 5];
    words[2][3] = "CAT".to_string();
    scores[2][3] = 15;
    words[2][4] = "END".to_string();
    LayoutPayload {
        rows: 5,
        cols: 5,
        words,
        scores,
        category: category.to_string(),
    }
}

async fn next_event(rx: &mut broadcast::Receiver<EventEnvelope>) -> EventType {
    timeout(WAIT, rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event bus closed")
        .event
}

async fn wait_for(
    rx: &mut broadcast::Receiver<EventEnvelope>,
    pred: impl Fn(&EventType) -> bool,
) -> EventType {
    loop {
        let event = next_event(rx).await;
        if pred(&event) {
            return event;
        }
    }
}

#[tokio::test]
async fn test_offline_session_starts_and_moves() {
    let handle = spawn_session(RunnerConfig::offline(1));
    let mut rx = handle.subscribe();

    let event = wait_for(&mut rx, |e| {
        matches!(e, EventType::Game(GameEvent::SessionStarted { .. }))
    })
    .await;
    if let EventType::Game(GameEvent::SessionStarted { mode, rows, cols }) = event {
        assert_eq!(mode, Mode::Offline);
        assert_eq!(rows, cols);
    }

    let snapshot = handle.snapshots().borrow().clone().expect("snapshot after init");
    assert_eq!(snapshot.player, snapshot.mid);
    assert_eq!(snapshot.score, 0);
    assert!(snapshot.collected.is_empty());

    // Two matching signals commit one move up
    handle.signal(Direction::Up, SignalSource::Button);
    handle.signal(Direction::Up, SignalSource::Button);
    wait_for(&mut rx, |e| {
        matches!(e, EventType::Game(GameEvent::PlayerMoved { .. }))
    })
    .await;

    let snapshot = handle.snapshots().borrow().clone().unwrap();
    assert_eq!(snapshot.player.row, snapshot.mid.row - 1);
    assert_eq!(snapshot.player.col, snapshot.mid.col);

    handle.shutdown();
    handle.join().await;
}

#[tokio::test]
async fn test_online_falls_back_offline_when_unreachable() {
    // Grab a free port and close the listener so nothing answers
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let handle = spawn_session(RunnerConfig::online(2, ServerConfig::new("127.0.0.1", port)));
    let mut rx = handle.subscribe();

    wait_for(&mut rx, |e| {
        matches!(e, EventType::System(SystemEvent::FellBackOffline { .. }))
    })
    .await;
    let event = wait_for(&mut rx, |e| {
        matches!(e, EventType::Game(GameEvent::SessionStarted { .. }))
    })
    .await;
    if let EventType::Game(GameEvent::SessionStarted { mode, .. }) = event {
        assert_eq!(mode, Mode::Offline);
    }

    let snapshot = handle.snapshots().borrow().clone().unwrap();
    assert_eq!(snapshot.mode, Mode::Offline);
}

#[tokio::test]
async fn test_malformed_response_falls_back_offline() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        socket.write_all(b"not a layout").await.unwrap();
    });

    let handle = spawn_session(RunnerConfig::online(3, ServerConfig::new("127.0.0.1", port)));
    let mut rx = handle.subscribe();

    wait_for(&mut rx, |e| {
        matches!(e, EventType::System(SystemEvent::FellBackOffline { .. }))
    })
    .await;
    let snapshot = handle.snapshots().borrow().clone().unwrap();
    assert_eq!(snapshot.mode, Mode::Offline);
}

#[tokio::test]
async fn test_rejected_layout_falls_back_offline() {
    // Valid JSON, but there is no END cell
    let mut payload = small_layout("Animals");
    payload.words[2][4] = String::new();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let body = serde_json::to_vec(&payload).unwrap();
        socket.write_all(&body).await.unwrap();
    });

    let handle = spawn_session(RunnerConfig::online(4, ServerConfig::new("127.0.0.1", port)));
    let mut rx = handle.subscribe();

    let event = wait_for(&mut rx, |e| {
        matches!(e, EventType::System(SystemEvent::FellBackOffline { .. }))
    })
    .await;
    if let EventType::System(SystemEvent::FellBackOffline { reason }) = event {
        assert!(reason.contains("END"), "unexpected reason: {}", reason);
    }
}

#[tokio::test]
async fn test_online_session_serves_layout_and_wins() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let body = serde_json::to_vec(&small_layout("Animals")).unwrap();
        socket.write_all(&body).await.unwrap();
    });

    let handle = spawn_session(RunnerConfig::online(5, ServerConfig::new("127.0.0.1", port)));
    let mut rx = handle.subscribe();

    let event = wait_for(&mut rx, |e| {
        matches!(e, EventType::Game(GameEvent::SessionStarted { .. }))
    })
    .await;
    if let EventType::Game(GameEvent::SessionStarted { mode, .. }) = event {
        assert_eq!(mode, Mode::Online);
    }
    let snapshot = handle.snapshots().borrow().clone().unwrap();
    assert_eq!(snapshot.category, "Animals");

    // Collect CAT, then step onto END for the win
    handle.signal(Direction::Right, SignalSource::Collision);
    handle.signal(Direction::Right, SignalSource::Collision);
    let event = wait_for(&mut rx, |e| {
        matches!(e, EventType::Game(GameEvent::WordCollected { .. }))
    })
    .await;
    if let EventType::Game(GameEvent::WordCollected { word, points, .. }) = event {
        assert_eq!(word, "CAT");
        assert_eq!(points, 15);
    }

    handle.signal(Direction::Right, SignalSource::Collision);
    handle.signal(Direction::Right, SignalSource::Collision);
    let event = wait_for(&mut rx, |e| {
        matches!(e, EventType::Game(GameEvent::GameWon { .. }))
    })
    .await;
    if let EventType::Game(GameEvent::GameWon { score, .. }) = event {
        assert_eq!(score, 15);
    }

    // Display-only guess flow after the win
    handle.submit_guess("animals maybe".to_string());
    let event = wait_for(&mut rx, |e| {
        matches!(e, EventType::Game(GameEvent::GuessReceived { .. }))
    })
    .await;
    if let EventType::Game(GameEvent::GuessReceived { guess, answer }) = event {
        assert_eq!(guess, "animals maybe");
        assert_eq!(answer, "Animals");
    }
}

#[tokio::test]
async fn test_stale_layout_discarded_after_restart() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = spawn_session(RunnerConfig::online(6, ServerConfig::new("127.0.0.1", port)));
    let mut rx = handle.subscribe();

    // The first fetch connects; hold it open without answering
    let (mut first_conn, _) = timeout(WAIT, listener.accept())
        .await
        .expect("first fetch never connected")
        .unwrap();

    // Signals sent while initializing are dropped, not queued
    handle.signal(Direction::Up, SignalSource::Button);

    // Restarting supersedes the outstanding fetch
    handle.restart();
    let (mut second_conn, _) = timeout(WAIT, listener.accept())
        .await
        .expect("restart fetch never connected")
        .unwrap();
    let body = serde_json::to_vec(&small_layout("Colors")).unwrap();
    second_conn.write_all(&body).await.unwrap();
    drop(second_conn);

    wait_for(&mut rx, |e| {
        matches!(e, EventType::Game(GameEvent::SessionStarted { .. }))
    })
    .await;
    let snapshot = handle.snapshots().borrow().clone().unwrap();
    assert_eq!(snapshot.category, "Colors");

    // Now answer the first, superseded fetch with a different web
    let body = serde_json::to_vec(&small_layout("Animals")).unwrap();
    first_conn.write_all(&body).await.unwrap();
    drop(first_conn);

    let event = wait_for(&mut rx, |e| {
        matches!(
            e,
            EventType::System(SystemEvent::StaleLayoutDiscarded { .. })
        )
    })
    .await;
    if let EventType::System(SystemEvent::StaleLayoutDiscarded { stale_epoch }) = event {
        assert_eq!(stale_epoch, 0);
    }

    // The current web is untouched and the early signal never moved anyone
    let snapshot = handle.snapshots().borrow().clone().unwrap();
    assert_eq!(snapshot.category, "Colors");
    assert_eq!(snapshot.player, snapshot.mid);
}

#[tokio::test]
async fn test_offline_restart_resets_session() {
    let handle = spawn_session(RunnerConfig::offline(7));
    let mut rx = handle.subscribe();

    wait_for(&mut rx, |e| {
        matches!(e, EventType::Game(GameEvent::SessionStarted { .. }))
    })
    .await;

    // Move once so there is state to reset
    handle.signal(Direction::Down, SignalSource::Button);
    handle.signal(Direction::Down, SignalSource::Button);
    wait_for(&mut rx, |e| {
        matches!(e, EventType::Game(GameEvent::PlayerMoved { .. }))
    })
    .await;

    handle.restart();
    let event = wait_for(&mut rx, |e| {
        matches!(e, EventType::Game(GameEvent::SessionRestarted { .. }))
    })
    .await;
    if let EventType::Game(GameEvent::SessionRestarted { mode }) = event {
        assert_eq!(mode, Mode::Offline);
    }

    let snapshot = handle.snapshots().borrow().clone().unwrap();
    assert_eq!(snapshot.score, 0);
    assert!(snapshot.collected.is_empty());
    assert_eq!(snapshot.player, snapshot.mid);
}
