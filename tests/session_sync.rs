//! End-to-end tests for the sync session against an in-memory remote,
//! driven on a paused clock so the production debounce windows (2 s, 3 s
//! for chat) run instantly.

use std::sync::{Arc, Once};
use std::time::Duration;

use chrono::NaiveDate;
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vitatrack_sync::models::{
    ChatMessage, ChatRole, DiaryDay, FoodEntry, Meal, Profile, Program,
};
use vitatrack_sync::{
    MemoryRemoteDocs, SessionState, StoreHandle, StoreRegistry, SyncConfig, SyncSession,
};

static TRACING: Once = Once::new();

/// Registry plus in-memory remote, with tracing wired to the test writer
/// so engine logs show up on failure.
fn harness() -> (StoreRegistry, Arc<MemoryRemoteDocs>) {
    TRACING.call_once(|| {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "vitatrack_sync=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .init();
    });
    (StoreRegistry::new(), Arc::new(MemoryRemoteDocs::new()))
}

async fn settle(duration: Duration) {
    tokio::time::advance(duration).await;
    // Let fired timer tasks run to completion.
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
}

fn day_doc(water_ml: u32) -> serde_json::Value {
    serde_json::to_value(DiaryDay {
        entries: Vec::new(),
        water_ml,
    })
    .unwrap()
}

#[tokio::test(start_paused = true)]
async fn empty_local_and_remote_stays_empty() {
    let (registry, remote) = harness();

    let session = SyncSession::start(&registry, remote.clone(), SyncConfig::default(), "u1").await;

    assert_eq!(session.state(), SessionState::Listening);
    assert!(registry.profile.is_empty());
    assert!(registry.diary.is_empty());
    assert_eq!(remote.total_writes(), 0);
}

#[tokio::test(start_paused = true)]
async fn bootstrap_restores_diary_days_exactly() {
    let (registry, remote) = harness();
    remote.seed("users/u1/diary/2024-01-01", day_doc(500));
    remote.seed("users/u1/diary/2024-01-02", day_doc(750));

    let _session = SyncSession::start(&registry, remote, SyncConfig::default(), "u1").await;

    let diary = registry.diary.snapshot();
    assert_eq!(diary.len(), 2);
    let jan1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let jan2 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    assert_eq!(diary.get(&jan1).unwrap().water_ml, 500);
    assert_eq!(diary.get(&jan2).unwrap().water_ml, 750);
}

#[tokio::test(start_paused = true)]
async fn non_empty_local_profile_wins_over_remote() {
    let (registry, remote) = harness();
    registry
        .profile
        .replace(Profile::new("Local").complete_onboarding());

    remote.seed(
        "users/u1",
        serde_json::to_value(Profile::new("Remote").complete_onboarding()).unwrap(),
    );

    let _session = SyncSession::start(&registry, remote, SyncConfig::default(), "u1").await;

    assert_eq!(registry.profile.snapshot().display_name, "Local");
}

#[tokio::test(start_paused = true)]
async fn bootstrap_does_not_trigger_writes() {
    let (registry, remote) = harness();
    remote.seed("users/u1/diary/2024-01-01", day_doc(500));
    remote.seed(
        "users/u1/settings/chat",
        json!([{
            "id": "7b1e9d0a-1111-4222-8333-444455556666",
            "role": "coach",
            "body": "Welcome back",
            "sent_at": "2024-01-01T08:00:00Z"
        }]),
    );

    let _session = SyncSession::start(&registry, remote.clone(), SyncConfig::default(), "u1").await;
    assert_eq!(registry.chat.snapshot().len(), 1);

    settle(Duration::from_secs(10)).await;
    assert_eq!(remote.total_writes(), 0);
}

#[tokio::test(start_paused = true)]
async fn burst_of_mutations_coalesces_into_one_write() {
    let (registry, remote) = harness();
    let _session =
        SyncSession::start(&registry, remote.clone(), SyncConfig::default(), "u1").await;

    let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    for i in 0..5 {
        registry.diary.update(|d| {
            d.entry(date).or_default().entries.push(FoodEntry::new(
                format!("Food {i}"),
                Meal::Lunch,
                100.0,
                100.0,
            ));
        });
        tokio::time::advance(Duration::from_millis(200)).await;
    }

    settle(Duration::from_secs(3)).await;

    // Exactly one write, holding the state after the fifth mutation.
    assert_eq!(remote.writes_to("users/u1/diary/2024-03-05"), 1);
    let doc = remote.document("users/u1/diary/2024-03-05").unwrap();
    assert_eq!(doc["entries"].as_array().unwrap().len(), 5);
}

#[tokio::test(start_paused = true)]
async fn mutations_apart_produce_two_writes() {
    let (registry, remote) = harness();
    let _session =
        SyncSession::start(&registry, remote.clone(), SyncConfig::default(), "u1").await;

    registry
        .programs
        .update(|p| p.push(Program::new("Starting Strength")));
    settle(Duration::from_secs(3)).await;

    registry.programs.update(|p| p.push(Program::new("PPL")));
    settle(Duration::from_secs(3)).await;

    assert_eq!(remote.writes_to("users/u1/settings/programs"), 2);
    let doc = remote.document("users/u1/settings/programs").unwrap();
    assert_eq!(doc.as_array().unwrap().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn chat_burst_writes_once_after_three_seconds() {
    let (registry, remote) = harness();
    let _session =
        SyncSession::start(&registry, remote.clone(), SyncConfig::default(), "u1").await;

    for body in ["one", "two", "three"] {
        registry
            .chat
            .update(|c| c.push(ChatMessage::new(ChatRole::User, body)));
        tokio::time::advance(Duration::from_millis(300)).await;
    }

    // 2.5 s after the last message: chat's 3 s window has not elapsed.
    settle(Duration::from_millis(2500)).await;
    assert_eq!(remote.writes_to("users/u1/settings/chat"), 0);

    settle(Duration::from_secs(1)).await;
    assert_eq!(remote.writes_to("users/u1/settings/chat"), 1);
    let doc = remote.document("users/u1/settings/chat").unwrap();
    assert_eq!(doc.as_array().unwrap().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn snapshot_is_read_at_fire_time() {
    let (registry, remote) = harness();
    let config = SyncConfig {
        // Distinct windows so the diary timer fires while chat waits.
        debounce_ms: 100,
        chat_debounce_ms: 3000,
        ..Default::default()
    };
    let _session = SyncSession::start(&registry, remote.clone(), config, "u1").await;

    let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    registry.diary.update(|d| {
        d.entry(date).or_default().water_ml = 250;
    });

    // Sneak in a second mutation before the timer fires. The write must
    // carry it even though the timer was armed by the first.
    registry.diary.update(|d| {
        d.entry(date).or_default().water_ml = 999;
    });

    settle(Duration::from_secs(1)).await;
    let doc = remote.document("users/u1/diary/2024-03-05").unwrap();
    assert_eq!(doc["water_ml"], 999);
}

#[tokio::test(start_paused = true)]
async fn teardown_cancels_pending_writes_and_stops_listening() {
    let (registry, remote) = harness();
    let session =
        SyncSession::start(&registry, remote.clone(), SyncConfig::default(), "u1").await;

    // Armed but not yet fired.
    registry
        .chat
        .update(|c| c.push(ChatMessage::new(ChatRole::User, "about to log out")));

    session.teardown();
    assert_eq!(session.state(), SessionState::TornDown);

    // The armed write was abandoned, and post-teardown mutations are
    // invisible to the engine.
    registry
        .chat
        .update(|c| c.push(ChatMessage::new(ChatRole::User, "after logout")));
    settle(Duration::from_secs(10)).await;
    assert_eq!(remote.total_writes(), 0);

    // Local state kept both messages.
    assert_eq!(registry.chat.snapshot().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn teardown_twice_is_a_noop() {
    let (registry, remote) = harness();
    let session = SyncSession::start(&registry, remote, SyncConfig::default(), "u1").await;

    session.teardown();
    session.teardown();
    assert_eq!(session.state(), SessionState::TornDown);
}

#[tokio::test(start_paused = true)]
async fn fresh_session_after_teardown_listens_again() {
    let (registry, remote) = harness();

    let first =
        SyncSession::start(&registry, remote.clone(), SyncConfig::default(), "u1").await;
    first.teardown();

    let second =
        SyncSession::start(&registry, remote.clone(), SyncConfig::default(), "u1").await;
    assert_eq!(second.state(), SessionState::Listening);

    registry
        .programs
        .update(|p| p.push(Program::new("5x5")));
    settle(Duration::from_secs(3)).await;
    assert_eq!(remote.writes_to("users/u1/settings/programs"), 1);
}

#[tokio::test(start_paused = true)]
async fn stores_debounce_independently() {
    let (registry, remote) = harness();
    let _session =
        SyncSession::start(&registry, remote.clone(), SyncConfig::default(), "u1").await;

    let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    registry.diary.update(|d| {
        d.entry(date).or_default().water_ml = 100;
    });
    registry
        .programs
        .update(|p| p.push(Program::new("PPL")));
    registry
        .chat
        .update(|c| c.push(ChatMessage::new(ChatRole::User, "hello")));

    // After 2.5 s the 2 s stores have flushed; chat (3 s) has not.
    settle(Duration::from_millis(2500)).await;
    assert_eq!(remote.writes_to("users/u1/diary/2024-03-05"), 1);
    assert_eq!(remote.writes_to("users/u1/settings/programs"), 1);
    assert_eq!(remote.writes_to("users/u1/settings/chat"), 0);

    settle(Duration::from_secs(1)).await;
    assert_eq!(remote.writes_to("users/u1/settings/chat"), 1);
}

#[tokio::test(start_paused = true)]
async fn dropped_write_is_retried_by_the_next_mutation() {
    let (registry, remote) = harness();
    let _session =
        SyncSession::start(&registry, remote.clone(), SyncConfig::default(), "u1").await;

    remote.set_fail_writes(true);
    registry
        .programs
        .update(|p| p.push(Program::new("PPL")));
    settle(Duration::from_secs(3)).await;
    assert!(remote.document("users/u1/settings/programs").is_none());

    // No retry on its own...
    settle(Duration::from_secs(10)).await;
    assert!(remote.document("users/u1/settings/programs").is_none());

    // ...but the next mutation re-arms and succeeds.
    remote.set_fail_writes(false);
    registry
        .programs
        .update(|p| p.push(Program::new("5x5")));
    settle(Duration::from_secs(3)).await;

    let doc = remote.document("users/u1/settings/programs").unwrap();
    assert_eq!(doc.as_array().unwrap().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn prefs_rerender_without_change_writes_nothing() {
    let (registry, remote) = harness();
    let _session =
        SyncSession::start(&registry, remote.clone(), SyncConfig::default(), "u1").await;

    registry.exercise_prefs.update(|_| {});
    settle(Duration::from_secs(5)).await;
    assert_eq!(remote.writes_to("users/u1/settings/exercisePrefs"), 0);

    registry
        .exercise_prefs
        .update(|p| p.favorites.push("Deadlift".to_string()));
    settle(Duration::from_secs(3)).await;
    assert_eq!(remote.writes_to("users/u1/settings/exercisePrefs"), 1);
}
