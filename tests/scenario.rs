use std::collections::HashSet;
use std::ops::{Deref, DerefMut};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use bike_messenger::models::catalog::default_messages;
use bike_messenger::services::{MessageStore, OverlayCapability, SimulatedTransport};
use bike_messenger::storage::SqliteStorage;
use bike_messenger::{App, AppConfig, MessageDraft, MessagePatch};
use tempfile::TempDir;

struct TmpApp {
    app: App,
    config: AppConfig,
    #[allow(unused)]
    tmpdir: TempDir,
}

impl Deref for TmpApp {
    type Target = App;

    fn deref(&self) -> &Self::Target {
        &self.app
    }
}

impl DerefMut for TmpApp {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.app
    }
}

impl TmpApp {
    /// Fresh session over the same database, as after an app restart.
    async fn restart(&mut self) {
        self.app = App::from_config(&self.config, OverlayCapability::Unavailable)
            .await
            .unwrap();
    }
}

async fn setup() -> TmpApp {
    let tmpdir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        data_dir: Some(tmpdir.path().to_path_buf()),
        send_delay_ms: 0,
        ..AppConfig::default()
    };
    TmpApp {
        app: App::from_config(&config, OverlayCapability::Unavailable)
            .await
            .unwrap(),
        config,
        tmpdir,
    }
}

#[tokio::test]
async fn test_lunch_stop_scenario() {
    let mut app = setup().await;
    let defaults = default_messages();
    let d = defaults.len();
    assert_eq!(app.messages(), defaults.as_slice());

    app.add_message(&MessageDraft::new("Lunch stop", "food", "#2ECC71"))
        .await
        .unwrap();
    assert_eq!(app.messages().len(), d + 1);
    let added = app.messages().last().unwrap().clone();
    assert_eq!(added.text, "Lunch stop");
    assert_eq!(added.order as usize, d);

    assert!(app.reorder_messages(d, 0).await);
    assert_eq!(app.messages()[0].id, added.id);
    assert_eq!(app.messages()[0].order, 0);
    for (before, after) in defaults.iter().zip(&app.messages()[1..]) {
        assert_eq!(after.id, before.id);
        assert_eq!(after.order, before.order + 1);
    }

    app.reset_to_defaults().await;
    assert_eq!(app.messages(), defaults.as_slice());

    app.restart().await;
    assert_eq!(app.messages(), defaults.as_slice());
}

#[tokio::test]
async fn test_edits_survive_restart() {
    let mut app = setup().await;

    app.add_message(&MessageDraft::new("  Regroup  ", "hand-wave", "#A29BFE"))
        .await
        .unwrap();
    app.update_message("default-2", &MessagePatch::text("Easy"))
        .await
        .unwrap();
    app.delete_message("default-1").await;
    app.send_message("default-4").await.unwrap().unwrap();
    app.send_message("default-4").await.unwrap().unwrap();
    let before = app.messages().to_vec();

    app.restart().await;
    assert_eq!(app.messages(), before.as_slice());

    let ids: HashSet<_> = app.messages().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids.len(), app.messages().len());
    assert!(!ids.contains("default-1"));
    for (idx, msg) in app.messages().iter().enumerate() {
        assert_eq!(msg.order as usize, idx);
    }

    let easy = app.message("default-2").unwrap();
    assert_eq!(easy.text, "Easy");
    let rested = app.message("default-4").unwrap();
    assert_eq!(rested.send_count, 2);
    assert!(rested.last_sent_at.is_some());
    assert_eq!(app.messages().last().unwrap().text, "Regroup");

    let last = app.store().last_sent().await.unwrap();
    assert_eq!(last.message_id, "default-4");
}

async fn open_session(config: &AppConfig, path: &Path) -> App {
    App::start(
        config,
        Arc::new(SqliteStorage::open(path).unwrap()),
        Arc::new(SimulatedTransport::new(Duration::ZERO)),
        OverlayCapability::Unavailable,
    )
    .await
}

#[tokio::test]
async fn test_two_sessions_last_write_wins() {
    let tmpdir = tempfile::tempdir().unwrap();
    let path = tmpdir.path().join("shared.sqlite");
    let config = AppConfig::default();

    let mut first = open_session(&config, &path).await;
    let mut second = open_session(&config, &path).await;

    first.delete_message("default-1").await;
    second
        .add_message(&MessageDraft::new("Photo stop", "camera", "#FD79A8"))
        .await
        .unwrap();

    let store = MessageStore::new(Arc::new(SqliteStorage::open(&path).unwrap()));
    assert_eq!(store.load().await, second.messages());
    assert!(store.load().await.iter().any(|m| m.id == "default-1"));
}
