pub mod file;
pub mod memory;
pub mod traits;

use crate::{
    error::Result,
    models::{HistoryEntry, SketchRequest},
};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use traits::KeyValueStore;

/// Storage slot the history list is serialized into.
pub const HISTORY_SLOT: &str = "sketchHistory";

/// Past generations, most recent first, mirrored into a [`KeyValueStore`]
/// slot after every change.
pub struct SketchHistory {
    store: Arc<dyn KeyValueStore>,
    entries: Vec<HistoryEntry>,
    last_id: i64,
}

impl SketchHistory {
    /// Loads the list from the store. Entries that do not parse are skipped
    /// with a warning. Unreadable content or a slot that is not a JSON list is
    /// logged and replaced by an empty list; it is overwritten on the next
    /// change.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let entries = match store.get(HISTORY_SLOT).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Value>>(&raw) {
                Ok(values) => parse_entries(values),
                Err(e) => {
                    log::error!("Failed to parse saved sketch history: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                log::error!("Failed to load sketch history: {}", e);
                Vec::new()
            }
        };
        log::debug!("Loaded {} history entries", entries.len());

        let last_id = entries.iter().map(|e| e.id).max().unwrap_or(0);
        Self {
            store,
            entries,
            last_id,
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// A creation timestamp in milliseconds, bumped past the previous id when
    /// two generations land in the same millisecond.
    pub fn next_id(&mut self) -> i64 {
        let id = Utc::now().timestamp_millis().max(self.last_id + 1);
        self.last_id = id;
        id
    }

    /// Builds the entry for a successful generation and prepends it.
    pub async fn record(
        &mut self,
        request: &SketchRequest,
        image_url: impl Into<String>,
    ) -> Result<HistoryEntry> {
        let entry = HistoryEntry::new(self.next_id(), request, image_url);
        self.push(entry.clone()).await?;
        Ok(entry)
    }

    pub async fn push(&mut self, entry: HistoryEntry) -> Result<()> {
        self.last_id = self.last_id.max(entry.id);
        self.entries.insert(0, entry);
        self.persist().await
    }

    pub async fn clear(&mut self) -> Result<()> {
        let removed = self.entries.len();
        self.entries.clear();
        self.persist().await?;
        log::info!("🗑️  Cleared {} history entries", removed);
        Ok(())
    }

    async fn persist(&self) -> Result<()> {
        let raw = serde_json::to_string(&self.entries)?;
        self.store.set(HISTORY_SLOT, &raw).await.map_err(|e| {
            log::error!("Failed to save sketch history: {}", e);
            e
        })
    }
}

fn parse_entries(values: Vec<Value>) -> Vec<HistoryEntry> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping unreadable history entry #{}: {}", index, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AspectRatio, SketchStyle};

    fn memory() -> Arc<dyn KeyValueStore> {
        Arc::new(MemoryStore::new())
    }

    #[tokio::test]
    async fn test_entries_are_most_recent_first() {
        let store = memory();
        let mut history = SketchHistory::load(store.clone()).await;
        for text in ["first", "second", "third"] {
            history
                .record(&SketchRequest::new(text), format!("data:image/png;base64,{}", text))
                .await
                .unwrap();
        }

        let texts: Vec<&str> = history.entries().iter().map(|e| e.input_text.as_str()).collect();
        assert_eq!(texts, vec!["third", "second", "first"]);
        let ids: Vec<i64> = history.entries().iter().map(|e| e.id).collect();
        assert!(ids[0] > ids[1] && ids[1] > ids[2]);

        let reloaded = SketchHistory::load(store).await;
        assert_eq!(reloaded.entries(), history.entries());
    }

    #[tokio::test]
    async fn test_clear_empties_unconditionally() {
        let store = memory();
        let mut history = SketchHistory::load(store.clone()).await;
        history.clear().await.unwrap();
        assert!(history.is_empty());

        history
            .record(&SketchRequest::new("a"), "data:image/png;base64,AA")
            .await
            .unwrap();
        history.clear().await.unwrap();
        assert!(history.is_empty());
        assert_eq!(store.get(HISTORY_SLOT).await.unwrap().as_deref(), Some("[]"));
        assert!(SketchHistory::load(store).await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_slot_loads_empty() {
        let store = memory();
        store.set(HISTORY_SLOT, "{not json").await.unwrap();
        let history = SketchHistory::load(store).await;
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_one_bad_entry_does_not_drop_the_rest() {
        let store = memory();
        let raw = r#"[
            {"id": 3, "inputText": "odd ratio", "imageUrl": "data:image/png;base64,AA", "aspectRatio": "3:4"},
            {"id": "not-a-number", "inputText": "broken", "imageUrl": "data:image/png;base64,BB"},
            {"id": 1, "inputText": "keep me", "imageUrl": "data:image/png;base64,CC", "aspectRatio": "1:1", "style": "木炭"}
        ]"#;
        store.set(HISTORY_SLOT, raw).await.unwrap();

        let mut history = SketchHistory::load(store.clone()).await;
        assert_eq!(history.len(), 2);
        assert_eq!(history.get(3).unwrap().aspect_ratio, AspectRatio::Portrait9x16);
        let kept = history.get(1).unwrap();
        assert_eq!(kept.input_text, "keep me");
        assert_eq!(kept.aspect_ratio, AspectRatio::Square);
        assert_eq!(kept.style, SketchStyle::Charcoal);

        history
            .record(&SketchRequest::new("new"), "data:image/png;base64,DD")
            .await
            .unwrap();
        let reloaded = SketchHistory::load(store).await;
        let texts: Vec<&str> = reloaded.entries().iter().map(|e| e.input_text.as_str()).collect();
        assert_eq!(texts, vec!["new", "odd ratio", "keep me"]);
    }

    #[tokio::test]
    async fn test_ids_stay_distinct_after_reload() {
        let store = memory();
        let mut history = SketchHistory::load(store.clone()).await;
        let far_future = Utc::now().timestamp_millis() + 1_000_000;
        let request = SketchRequest::new("x").with_style(SketchStyle::Pencil);
        history
            .push(HistoryEntry::new(far_future, &request, "data:image/png;base64,AA"))
            .await
            .unwrap();

        let mut reloaded = SketchHistory::load(store).await;
        let entry = reloaded
            .record(&request.clone().with_aspect_ratio(AspectRatio::Square), "data:image/png;base64,BB")
            .await
            .unwrap();
        assert_eq!(entry.id, far_future + 1);
        assert_eq!(reloaded.get(far_future).unwrap().style, SketchStyle::Pencil);
        assert_eq!(reloaded.get(entry.id).unwrap().aspect_ratio, AspectRatio::Square);
    }

    #[tokio::test]
    async fn test_file_backed_history() {
        let dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(dir.path()));
        let mut history = SketchHistory::load(store.clone()).await;
        history
            .record(&SketchRequest::new("persist me"), "data:image/png;base64,AA")
            .await
            .unwrap();

        let raw = std::fs::read_to_string(dir.path().join("sketchHistory.json")).unwrap();
        assert!(raw.contains("\"inputText\":\"persist me\""));
        assert_eq!(SketchHistory::load(store).await.len(), 1);
    }
}
