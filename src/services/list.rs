use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::models::catalog::default_messages;
use crate::models::{Message, MessageDraft, MessagePatch, SendConfirmation};
use crate::services::store::MessageStore;
use crate::utils::generate_id;

fn repack(messages: &mut [Message]) {
    for (idx, msg) in messages.iter_mut().enumerate() {
        msg.order = idx as u32;
    }
}

fn fresh_id(messages: &[Message]) -> String {
    loop {
        let id = generate_id();
        if !messages.iter().any(|m| m.id == id) {
            return id;
        }
    }
}

pub fn add(messages: &[Message], draft: &MessageDraft) -> Vec<Message> {
    let mut next = messages.to_vec();
    next.push(Message {
        id: fresh_id(messages),
        text: draft.text.trim().to_string(),
        icon: draft.icon.clone(),
        color: draft.color.clone(),
        order: messages.len() as u32,
        last_sent_at: None,
        send_count: 0,
    });
    next
}

pub fn update(messages: &[Message], id: &str, patch: &MessagePatch) -> Vec<Message> {
    let mut next = messages.to_vec();
    if let Some(msg) = next.iter_mut().find(|m| m.id == id) {
        patch.apply(msg);
    }
    next
}

pub fn remove(messages: &[Message], id: &str) -> Vec<Message> {
    let mut next: Vec<Message> = messages.iter().filter(|m| m.id != id).cloned().collect();
    repack(&mut next);
    next
}

// Out-of-range indices leave the collection as it was.
pub fn reorder(messages: &[Message], from: usize, to: usize) -> Vec<Message> {
    let mut next = messages.to_vec();
    if from >= next.len() || to >= next.len() {
        log::debug!("Ignoring reorder {} -> {} on {} messages", from, to, next.len());
        return next;
    }
    let moved = next.remove(from);
    next.insert(to, moved);
    repack(&mut next);
    next
}

pub fn mark_sent(messages: &[Message], id: &str, at: DateTime<Utc>) -> Vec<Message> {
    let mut next = messages.to_vec();
    if let Some(msg) = next.iter_mut().find(|m| m.id == id) {
        msg.last_sent_at = Some(at);
        msg.send_count += 1;
    }
    next
}

/// Every call rewrites the whole collection, including no-ops on unknown ids.
pub struct MessageListService {
    store: Arc<MessageStore>,
}

impl MessageListService {
    pub fn new(store: Arc<MessageStore>) -> Self {
        Self { store }
    }

    async fn commit(&self, next: Vec<Message>) -> Vec<Message> {
        self.store.save(&next).await;
        next
    }

    pub async fn add(&self, messages: &[Message], draft: &MessageDraft) -> Vec<Message> {
        self.commit(add(messages, draft)).await
    }

    pub async fn update(&self, messages: &[Message], id: &str, patch: &MessagePatch) -> Vec<Message> {
        self.commit(update(messages, id, patch)).await
    }

    pub async fn delete(&self, messages: &[Message], id: &str) -> Vec<Message> {
        self.commit(remove(messages, id)).await
    }

    pub async fn reorder(&self, messages: &[Message], from: usize, to: usize) -> Vec<Message> {
        self.commit(reorder(messages, from, to)).await
    }

    pub async fn mark_sent(
        &self,
        messages: &[Message],
        confirmation: &SendConfirmation,
    ) -> Vec<Message> {
        let id = confirmation.message_id.as_str();
        let next = self.commit(mark_sent(messages, id, confirmation.timestamp)).await;
        if next.iter().any(|m| m.id == id) {
            self.store.save_last_sent(confirmation).await;
        }
        next
    }

    pub async fn reset_to_defaults(&self) -> Vec<Message> {
        self.commit(default_messages()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::services::store::MESSAGES_KEY;
    use crate::storage::{KeyValueStorage, MemoryStorage};
    use async_trait::async_trait;
    use chrono::{Duration, SubsecRound};
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn assert_dense(messages: &[Message]) {
        for (idx, msg) in messages.iter().enumerate() {
            assert_eq!(msg.order as usize, idx, "order of {} is off", msg.id);
        }
    }

    fn ids(messages: &[Message]) -> Vec<&str> {
        messages.iter().map(|m| m.id.as_str()).collect()
    }

    fn service() -> (MessageListService, Arc<MessageStore>) {
        let store = Arc::new(MessageStore::new(Arc::new(MemoryStorage::new())));
        (MessageListService::new(store.clone()), store)
    }

    #[test]
    fn add_appends_with_next_order_and_trimmed_text() {
        let defaults = default_messages();
        let next = add(&defaults, &MessageDraft::new("  Lunch stop ", "food", "#2ECC71"));

        assert_eq!(next.len(), defaults.len() + 1);
        let added = next.last().unwrap();
        assert_eq!(added.text, "Lunch stop");
        assert_eq!(added.order as usize, defaults.len());
        assert_eq!(added.send_count, 0);
        assert_eq!(added.last_sent_at, None);
        assert!(!defaults.iter().any(|m| m.id == added.id));
        assert_dense(&next);
    }

    #[test]
    fn repeated_adds_get_distinct_ids() {
        let mut messages = Vec::new();
        for n in 0..50 {
            messages = add(&messages, &MessageDraft::new(format!("m{}", n), "bike", "#3498DB"));
        }
        let unique: HashSet<_> = messages.iter().map(|m| m.id.clone()).collect();
        assert_eq!(unique.len(), 50);
        assert_dense(&messages);
    }

    #[test]
    fn update_merges_only_patched_fields() {
        let defaults = default_messages();
        let next = update(&defaults, "default-2", &MessagePatch::color("#000000"));
        assert_eq!(next[1].color, "#000000");
        assert_eq!(next[1].text, defaults[1].text);
        assert_eq!(next[0], defaults[0]);

        assert_eq!(update(&defaults, "missing", &MessagePatch::text("x")), defaults);
    }

    #[test]
    fn remove_repacks_survivors_in_place() {
        let defaults = default_messages();
        let next = remove(&defaults, "default-3");
        assert_eq!(next.len(), defaults.len() - 1);
        assert!(!next.iter().any(|m| m.id == "default-3"));
        assert_eq!(
            ids(&next),
            vec!["default-1", "default-2", "default-4", "default-5", "default-6"]
        );
        assert_dense(&next);

        assert_eq!(remove(&defaults, "missing"), defaults);
    }

    #[test]
    fn reorder_moves_forward_and_backward() {
        let defaults = default_messages();

        let forward = reorder(&defaults, 1, 4);
        assert_eq!(
            ids(&forward),
            vec!["default-1", "default-3", "default-4", "default-5", "default-2", "default-6"]
        );
        assert_dense(&forward);

        let backward = reorder(&defaults, 4, 1);
        assert_eq!(
            ids(&backward),
            vec!["default-1", "default-5", "default-2", "default-3", "default-4", "default-6"]
        );
        assert_dense(&backward);
    }

    #[test]
    fn reorder_swapped_back_restores_original() {
        let defaults = default_messages();
        let n = defaults.len();
        for from in 0..n {
            for to in 0..n {
                let there = reorder(&defaults, from, to);
                assert_dense(&there);
                let back = reorder(&there, to, from);
                assert_eq!(back, defaults, "{} -> {}", from, to);
            }
        }
    }

    #[test]
    fn reorder_out_of_range_is_ignored() {
        let defaults = default_messages();
        assert_eq!(reorder(&defaults, 0, defaults.len()), defaults);
        assert_eq!(reorder(&[], 0, 0), Vec::<Message>::new());
    }

    #[test]
    fn mark_sent_twice_counts_twice() {
        let defaults = default_messages();
        let first = Utc::now();
        let later = first + Duration::seconds(10);

        let once = mark_sent(&defaults, "default-1", first);
        let twice = mark_sent(&once, "default-1", later);

        assert_eq!(twice[0].send_count, 2);
        assert_eq!(twice[0].last_sent_at, Some(later));
        assert_eq!(&twice[1..], &defaults[1..]);
        assert_eq!(mark_sent(&defaults, "missing", first), defaults);
    }

    #[tokio::test]
    async fn every_operation_persists_before_returning() {
        let (svc, store) = service();
        let defaults = store.load().await;

        let added = svc
            .add(&defaults, &MessageDraft::new("Lunch stop", "food", "#2ECC71"))
            .await;
        assert_eq!(store.load().await, added);

        let moved = svc.reorder(&added, added.len() - 1, 0).await;
        assert_eq!(store.load().await, moved);

        let edited = svc.update(&moved, &moved[0].id, &MessagePatch::text("Lunch")).await;
        assert_eq!(store.load().await, edited);

        let deleted = svc.delete(&edited, "default-6").await;
        assert_eq!(store.load().await, deleted);

        let reset = svc.reset_to_defaults().await;
        assert_eq!(reset, default_messages());
        assert_eq!(store.load().await, reset);
    }

    #[tokio::test]
    async fn mark_sent_records_last_sent_slot() {
        let (svc, store) = service();
        let defaults = store.load().await;
        let at = Utc::now().trunc_subsecs(3);
        let confirmation = SendConfirmation::for_message(&defaults[1], at);

        let next = svc.mark_sent(&defaults, &confirmation).await;
        assert_eq!(next[1].send_count, 1);
        assert_eq!(next[1].last_sent_at, Some(at));
        assert_eq!(store.last_sent().await, Some(confirmation.clone()));

        let mut stray = confirmation.clone();
        stray.message_id = "missing".into();
        let untouched = svc.mark_sent(&next, &stray).await;
        assert_eq!(untouched, next);
        assert_eq!(store.last_sent().await, Some(confirmation));
    }

    /// Memory slots that count writes to the message collection.
    #[derive(Default)]
    struct CountingStorage {
        inner: MemoryStorage,
        writes: AtomicUsize,
    }

    impl CountingStorage {
        fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl KeyValueStorage for CountingStorage {
        async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if key == MESSAGES_KEY {
                self.writes.fetch_add(1, Ordering::SeqCst);
            }
            self.inner.set(key, value).await
        }
    }

    #[tokio::test]
    async fn unknown_ids_still_rewrite_the_collection() {
        let storage = Arc::new(CountingStorage::default());
        let store = Arc::new(MessageStore::new(storage.clone()));
        let svc = MessageListService::new(store.clone());
        let defaults = store.load().await;
        let base = storage.writes();

        let updated = svc.update(&defaults, "missing", &MessagePatch::text("x")).await;
        assert_eq!(updated, defaults);
        assert_eq!(storage.writes(), base + 1);

        let deleted = svc.delete(&defaults, "missing").await;
        assert_eq!(deleted, defaults);
        assert_eq!(storage.writes(), base + 2);

        let stray = SendConfirmation {
            message_id: "missing".into(),
            message_text: "Ghost".into(),
            timestamp: Utc::now(),
        };
        let marked = svc.mark_sent(&defaults, &stray).await;
        assert_eq!(marked, defaults);
        assert_eq!(storage.writes(), base + 3);
        assert_eq!(store.last_sent().await, None);
    }
}
