//! In-process draft overlay store.
//!
//! Holds at most one draft per listing for the lifetime of the process. A save
//! replaces the previous draft wholesale; drafts are removed explicitly when
//! the listing is approved or rejected. Nothing is persisted and nothing expires.
//!
//! # Usage
//!
//!   let store = DraftStore::new();
//!   store.save(listing_id, editor_id, fields).await;
//!   let draft = store.get(listing_id).await;

use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::models::{Draft, DraftField};
use crate::common::{ListingId, MemberId};
use crate::domains::listings::ListingField;

/// Thread-safe, cloneable. One coarse lock guards the whole map.
#[derive(Clone, Default)]
pub struct DraftStore {
    drafts: Arc<RwLock<HashMap<ListingId, Draft>>>,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `fields` as the listing's draft, discarding any earlier draft.
    pub async fn save(
        &self,
        listing_id: ListingId,
        editor_id: MemberId,
        fields: BTreeMap<ListingField, DraftField>,
    ) -> Draft {
        let draft = Draft {
            listing_id,
            editor_id,
            fields,
            updated_at: Utc::now(),
        };

        let mut drafts = self.drafts.write().await;
        let replaced = drafts.insert(listing_id, draft.clone()).is_some();

        debug!(
            listing_id = %listing_id,
            editor_id = %editor_id,
            fields = draft.fields.len(),
            replaced = replaced,
            "Saved draft"
        );

        draft
    }

    pub async fn get(&self, listing_id: ListingId) -> Option<Draft> {
        self.drafts.read().await.get(&listing_id).cloned()
    }

    /// Remove the listing's draft. Returns whether one existed.
    pub async fn delete(&self, listing_id: ListingId) -> bool {
        let removed = self.drafts.write().await.remove(&listing_id).is_some();
        if removed {
            debug!(listing_id = %listing_id, "Deleted draft");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.drafts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.drafts.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::listings::Provenance;

    fn fields(pairs: &[(ListingField, &str)]) -> BTreeMap<ListingField, DraftField> {
        pairs
            .iter()
            .map(|(field, value)| (*field, DraftField::new(*value, Provenance::User)))
            .collect()
    }

    #[tokio::test]
    async fn test_save_then_get_returns_saved_draft() {
        let store = DraftStore::new();
        let listing_id = ListingId::new();
        let editor_id = MemberId::new();

        let saved = store
            .save(listing_id, editor_id, fields(&[(ListingField::Name, "Cafe Nokomis")]))
            .await;
        let loaded = store.get(listing_id).await.unwrap();

        assert_eq!(loaded, saved);
        assert_eq!(loaded.editor_id, editor_id);
        assert_eq!(loaded.value(ListingField::Name), Some("Cafe Nokomis"));
    }

    #[tokio::test]
    async fn test_save_replaces_without_merging() {
        let store = DraftStore::new();
        let listing_id = ListingId::new();

        store
            .save(
                listing_id,
                MemberId::new(),
                fields(&[(ListingField::Name, "First"), (ListingField::Phone, "612-555-0100")]),
            )
            .await;
        store
            .save(listing_id, MemberId::new(), fields(&[(ListingField::Name, "Second")]))
            .await;

        let draft = store.get(listing_id).await.unwrap();
        assert_eq!(draft.value(ListingField::Name), Some("Second"));
        assert_eq!(draft.value(ListingField::Phone), None);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_missing() {
        let store = DraftStore::new();
        let listing_id = ListingId::new();

        store.save(listing_id, MemberId::new(), BTreeMap::new()).await;
        assert!(store.delete(listing_id).await);
        assert!(store.get(listing_id).await.is_none());
        assert!(!store.delete(listing_id).await);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = DraftStore::new();
        let other = store.clone();
        let listing_id = ListingId::new();

        store.save(listing_id, MemberId::new(), BTreeMap::new()).await;
        assert!(other.get(listing_id).await.is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_saves_leave_one_complete_draft() {
        let store = DraftStore::new();
        let listing_id = ListingId::new();

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    let value = format!("editor-{}", i);
                    let editor_id = MemberId::new();
                    store
                        .save(
                            listing_id,
                            editor_id,
                            fields(&[
                                (ListingField::Name, value.as_str()),
                                (ListingField::Address, value.as_str()),
                                (ListingField::Phone, value.as_str()),
                            ]),
                        )
                        .await;
                    (editor_id, value)
                })
            })
            .collect();

        let mut writes = Vec::new();
        for handle in handles {
            writes.push(handle.await.unwrap());
        }

        let draft = store.get(listing_id).await.unwrap();
        let (_, value) = writes
            .iter()
            .find(|(editor_id, _)| *editor_id == draft.editor_id)
            .expect("stored draft belongs to one of the writers");

        assert_eq!(draft.fields.len(), 3);
        assert!(draft.fields.values().all(|f| &f.value == value));
    }
}
