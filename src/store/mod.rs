pub mod quote_cache;

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::ZenConfig;
use crate::core::habit::{default_habits, Habit};
use crate::core::note::{sort_recent_first, NoteMeta, VideoNote};
use crate::core::quote::CachedQuote;

pub const HABITS_KEY: &str = "habitTracker";
pub const QUOTE_KEY: &str = "zenstudy_motivational_quote";
pub const SETTINGS_KEY: &str = "settings";
pub const NOTES_PREFIX: &str = "notes_";
pub const NOTES_META_PREFIX: &str = "notes_meta_";

/// String-keyed store of JSON-encoded values, one file per key. Reads that
/// fail (missing file, malformed JSON) degrade to "no value"; writes are a
/// full replacement of the previous value, last writer wins.
pub struct KvStore {
    root: PathBuf,
}

impl KvStore {
    pub fn open(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        if let Err(e) = std::fs::create_dir_all(&root) {
            log::error!("Failed to create store directory: {}", e);
        }
        Self { root }
    }

    /// Keys map 1:1 onto file names, so the charset is restricted to what
    /// the app actually uses (letters, digits, `_`, `-`).
    fn path_for(&self, key: &str) -> Option<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            log::warn!("Rejecting store key with unsupported characters: {:?}", key);
            return None;
        }
        Some(self.root.join(format!("{}.json", key)))
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.path_for(key)?;
        let content = std::fs::read_to_string(path).ok()?;
        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Malformed value under key {:?}, treating as absent: {}", key, e);
                None
            }
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        let Some(path) = self.path_for(key) else {
            return;
        };
        match serde_json::to_string_pretty(value) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    log::error!("Failed to write key {:?}: {}", key, e);
                }
            }
            Err(e) => log::error!("Failed to serialize value for key {:?}: {}", key, e),
        }
    }

    pub fn remove(&self, key: &str) {
        let Some(path) = self.path_for(key) else {
            return;
        };
        if path.exists() {
            if let Err(e) = std::fs::remove_file(&path) {
                log::error!("Failed to remove key {:?}: {}", key, e);
            }
        }
    }

    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.root) else {
            return Vec::new();
        };
        let mut keys: Vec<String> = entries
            .filter_map(|entry| {
                let name = entry.ok()?.file_name().into_string().ok()?;
                let key = name.strip_suffix(".json")?;
                key.starts_with(prefix).then(|| key.to_string())
            })
            .collect();
        keys.sort();
        keys
    }
}

/// User preferences and setup flags, persisted as a single value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub navigation_sound: bool,
    pub setup_complete: bool,
    pub display_name: Option<String>,
    pub career_goal: Option<String>,
    pub preferred_language: Option<String>,
    pub debug_logging: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            navigation_sound: true,
            setup_complete: false,
            display_name: None,
            career_goal: None,
            preferred_language: None,
            debug_logging: false,
        }
    }
}

/// Typed facade over the key-value store. Every collection is persisted as
/// a whole on each mutation; callers never touch keys directly.
pub struct Store {
    kv: KvStore,
}

impl Store {
    pub fn open(config: &ZenConfig) -> Self {
        Self {
            kv: KvStore::open(config.store_dir()),
        }
    }

    pub fn open_at(root: impl Into<PathBuf>) -> Self {
        Self {
            kv: KvStore::open(root),
        }
    }

    /// The tracked habit collection; the starter set before anything has
    /// been saved (or after a corrupt value was discarded).
    pub fn habits(&self) -> Vec<Habit> {
        self.kv.get(HABITS_KEY).unwrap_or_else(default_habits)
    }

    pub fn save_habits(&self, habits: &[Habit]) {
        self.kv.set(HABITS_KEY, &habits);
    }

    pub fn quote(&self) -> Option<CachedQuote> {
        self.kv.get(QUOTE_KEY)
    }

    pub fn save_quote(&self, quote: &CachedQuote) {
        self.kv.set(QUOTE_KEY, quote);
    }

    pub fn settings(&self) -> Settings {
        self.kv.get(SETTINGS_KEY).unwrap_or_default()
    }

    pub fn save_settings(&self, settings: &Settings) {
        self.kv.set(SETTINGS_KEY, settings);
    }

    pub fn note_content(&self, video_id: &str) -> Option<String> {
        self.kv.get(&format!("{}{}", NOTES_PREFIX, video_id))
    }

    pub fn note_meta(&self, video_id: &str) -> Option<NoteMeta> {
        self.kv.get(&format!("{}{}", NOTES_META_PREFIX, video_id))
    }

    /// Save a note's content, stamping the meta sidecar. The creation time
    /// survives edits; `updated_at` always moves.
    pub fn save_note(&self, video_id: &str, title: Option<&str>, content: &str) {
        let now = chrono::Utc::now().to_rfc3339();
        let mut meta = self.note_meta(video_id).unwrap_or_default();
        if let Some(title) = title {
            meta.title = Some(title.to_string());
        }
        if meta.timestamp.is_none() {
            meta.timestamp = Some(now.clone());
        }
        meta.updated_at = Some(now);

        self.kv
            .set(&format!("{}{}", NOTES_PREFIX, video_id), &content);
        self.kv
            .set(&format!("{}{}", NOTES_META_PREFIX, video_id), &meta);
    }

    pub fn delete_note(&self, video_id: &str) {
        self.kv.remove(&format!("{}{}", NOTES_PREFIX, video_id));
        self.kv.remove(&format!("{}{}", NOTES_META_PREFIX, video_id));
    }

    /// All saved notes, most recently updated first. Whitespace-only notes
    /// are skipped.
    pub fn all_notes(&self) -> Vec<VideoNote> {
        let now = chrono::Utc::now().to_rfc3339();
        let mut notes: Vec<VideoNote> = self
            .kv
            .keys_with_prefix(NOTES_PREFIX)
            .into_iter()
            .filter(|key| !key.starts_with(NOTES_META_PREFIX))
            .filter_map(|key| {
                let video_id = key.strip_prefix(NOTES_PREFIX)?.to_string();
                let content: String = self.kv.get(&key)?;
                if content.trim().is_empty() {
                    return None;
                }
                let meta = self.note_meta(&video_id).unwrap_or_default();
                Some(VideoNote {
                    video_title: meta
                        .title
                        .unwrap_or_else(|| format!("Video {}", video_id)),
                    content,
                    timestamp: meta.timestamp.unwrap_or_else(|| now.clone()),
                    updated_at: meta.updated_at.unwrap_or_else(|| now.clone()),
                    video_id,
                })
            })
            .collect();
        sort_recent_first(&mut notes);
        notes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open_at(dir.path());
        (dir, store)
    }

    #[test]
    fn habits_default_to_seed_collection() {
        let (_dir, store) = temp_store();
        let habits = store.habits();
        assert_eq!(habits.len(), 13);
        assert_eq!(habits[0].name, "Drink 2L of Water");
    }

    #[test]
    fn habits_roundtrip_field_for_field() {
        let (_dir, store) = temp_store();
        let mut habits = default_habits();
        habits[0].toggle_day(15);
        habits[1].category = Some("Health".to_string());
        habits.push(Habit::new("Meditate", "#FF6B6B", 30));
        store.save_habits(&habits);
        assert_eq!(store.habits(), habits);
    }

    #[test]
    fn habits_roundtrip_empty_list_and_empty_days() {
        let (_dir, store) = temp_store();
        store.save_habits(&[]);
        assert!(store.habits().is_empty());

        let habits = vec![Habit::new("Stretch", "#4ECDC4", 31)];
        store.save_habits(&habits);
        assert_eq!(store.habits(), habits);
        assert!(store.habits()[0].completed_days.is_empty());
    }

    #[test]
    fn corrupt_value_is_treated_as_absent() {
        let (dir, store) = temp_store();
        std::fs::write(dir.path().join("habitTracker.json"), "{not json").unwrap();
        assert_eq!(store.habits().len(), 13);

        // The next save replaces the malformed entry.
        store.save_habits(&[]);
        assert!(store.habits().is_empty());
    }

    #[test]
    fn quote_roundtrip() {
        let (_dir, store) = temp_store();
        assert!(store.quote().is_none());
        let quote = CachedQuote::new("Keep going", 42);
        store.save_quote(&quote);
        assert_eq!(store.quote(), Some(quote));
    }

    #[test]
    fn settings_default_and_roundtrip() {
        let (_dir, store) = temp_store();
        let settings = store.settings();
        assert!(settings.navigation_sound);
        assert!(!settings.setup_complete);

        let mut settings = settings;
        settings.navigation_sound = false;
        settings.career_goal = Some("Backend developer".to_string());
        store.save_settings(&settings);
        assert_eq!(store.settings(), settings);
    }

    #[test]
    fn note_save_preserves_creation_time() {
        let (_dir, store) = temp_store();
        store.save_note("abc123", Some("Rust Intro"), "first draft");
        let created = store.note_meta("abc123").unwrap().timestamp;
        assert!(created.is_some());

        store.save_note("abc123", None, "second draft");
        let meta = store.note_meta("abc123").unwrap();
        assert_eq!(meta.timestamp, created);
        assert_eq!(meta.title.as_deref(), Some("Rust Intro"));
        assert_eq!(store.note_content("abc123").as_deref(), Some("second draft"));
    }

    #[test]
    fn all_notes_skips_blank_and_meta_keys() {
        let (_dir, store) = temp_store();
        store.save_note("v1", Some("One"), "content one");
        store.save_note("v2", Some("Two"), "   ");
        let notes = store.all_notes();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].video_id, "v1");
        assert_eq!(notes[0].video_title, "One");
    }

    #[test]
    fn all_notes_falls_back_to_generated_title() {
        let (_dir, store) = temp_store();
        store.save_note("xyz", None, "untitled content");
        let notes = store.all_notes();
        assert_eq!(notes[0].video_title, "Video xyz");
    }

    #[test]
    fn delete_note_removes_both_records() {
        let (_dir, store) = temp_store();
        store.save_note("v1", Some("One"), "content");
        store.delete_note("v1");
        assert!(store.note_content("v1").is_none());
        assert!(store.note_meta("v1").is_none());
        assert!(store.all_notes().is_empty());
    }

    #[test]
    fn invalid_keys_are_rejected_not_fatal() {
        let (_dir, store) = temp_store();
        store.kv.set("../escape", &"nope");
        assert!(store.kv.get::<String>("../escape").is_none());
        assert!(store.kv.get::<String>("").is_none());
    }

    #[test]
    fn keys_with_prefix_lists_only_matches() {
        let (_dir, store) = temp_store();
        store.save_note("a", None, "x");
        store.save_note("b", None, "y");
        store.save_quote(&CachedQuote::new("q", 0));
        let keys = store.kv.keys_with_prefix(NOTES_PREFIX);
        assert_eq!(keys, vec!["notes_a", "notes_b", "notes_meta_a", "notes_meta_b"]);
    }
}
