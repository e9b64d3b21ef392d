use serde::{Deserialize, Serialize};

/// Sidecar record persisted next to a note's content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// A note taken while watching one video, assembled from its content and
/// meta records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoNote {
    pub video_id: String,
    pub video_title: String,
    pub content: String,
    /// Creation time, RFC 3339.
    pub timestamp: String,
    /// Last save time, RFC 3339.
    pub updated_at: String,
}

impl VideoNote {
    /// Case-insensitive substring match over content and title.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.content.to_lowercase().contains(&query)
            || self.video_title.to_lowercase().contains(&query)
    }
}

/// Order a note list most-recently-updated first. RFC 3339 strings sort
/// chronologically as plain strings, matching the stored format.
pub fn sort_recent_first(notes: &mut [VideoNote]) {
    notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: &str, title: &str, content: &str, updated_at: &str) -> VideoNote {
        VideoNote {
            video_id: id.to_string(),
            video_title: title.to_string(),
            content: content.to_string(),
            timestamp: "2026-01-01T00:00:00Z".to_string(),
            updated_at: updated_at.to_string(),
        }
    }

    #[test]
    fn matches_content_and_title_case_insensitive() {
        let n = note("v1", "Rust Ownership", "Borrowing rules recap", "2026-01-02T00:00:00Z");
        assert!(n.matches("ownership"));
        assert!(n.matches("BORROWING"));
        assert!(!n.matches("lifetimes"));
    }

    #[test]
    fn sort_puts_newest_first() {
        let mut notes = vec![
            note("a", "A", "x", "2026-01-01T00:00:00Z"),
            note("b", "B", "y", "2026-03-01T00:00:00Z"),
            note("c", "C", "z", "2026-02-01T00:00:00Z"),
        ];
        sort_recent_first(&mut notes);
        let ids: Vec<&str> = notes.iter().map(|n| n.video_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn meta_tolerates_missing_fields() {
        let meta: NoteMeta = serde_json::from_str("{}").unwrap();
        assert_eq!(meta, NoteMeta::default());
        let meta: NoteMeta = serde_json::from_str(r#"{"title":"T"}"#).unwrap();
        assert_eq!(meta.title.as_deref(), Some("T"));
    }
}
