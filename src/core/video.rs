use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One search hit, already formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSummary {
    pub id: String,
    pub title: String,
    pub thumbnail: String,
    pub channel_name: String,
    pub duration: String,
    pub views: String,
    pub published_at: String,
}

static ISO_DURATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?").unwrap());

/// Turn an ISO 8601 duration like "PT1H2M3S" into "1:02:03" (or "4:05"
/// without an hour part). Unparseable input yields an empty string.
pub fn parse_duration(iso: &str) -> String {
    if iso.is_empty() {
        return String::new();
    }
    let Some(caps) = ISO_DURATION.captures(iso) else {
        return String::new();
    };
    let part = |i: usize| -> u32 {
        caps.get(i)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };
    let (hours, minutes, seconds) = (part(1), part(2), part(3));

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Abbreviate a raw view count: 1_234_567 -> "1.2M", 45_600 -> "45.6K".
/// Non-numeric input is passed through unchanged.
pub fn format_views(views: &str) -> String {
    let Ok(num) = views.parse::<u64>() else {
        return views.to_string();
    };
    if num >= 1_000_000 {
        format!("{:.1}M", num as f64 / 1_000_000.0)
    } else if num >= 1_000 {
        format!("{:.1}K", num as f64 / 1_000.0)
    } else {
        views.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_with_hours() {
        assert_eq!(parse_duration("PT1H2M3S"), "1:02:03");
    }

    #[test]
    fn duration_minutes_only() {
        assert_eq!(parse_duration("PT4M5S"), "4:05");
        assert_eq!(parse_duration("PT15M"), "15:00");
    }

    #[test]
    fn duration_seconds_only() {
        assert_eq!(parse_duration("PT45S"), "0:45");
    }

    #[test]
    fn duration_empty_or_garbage() {
        assert_eq!(parse_duration(""), "");
        assert_eq!(parse_duration("not-a-duration"), "");
    }

    #[test]
    fn views_abbreviate() {
        assert_eq!(format_views("1234567"), "1.2M");
        assert_eq!(format_views("45600"), "45.6K");
        assert_eq!(format_views("999"), "999");
        assert_eq!(format_views("0"), "0");
    }

    #[test]
    fn views_non_numeric_pass_through() {
        assert_eq!(format_views("n/a"), "n/a");
    }

    #[test]
    fn summary_serializes_camel_case() {
        let v = VideoSummary {
            id: "abc".to_string(),
            title: "T".to_string(),
            thumbnail: "u".to_string(),
            channel_name: "C".to_string(),
            duration: "4:05".to_string(),
            views: "1.2M".to_string(),
            published_at: "2026-01-01T00:00:00Z".to_string(),
        };
        let json = serde_json::to_string(&v).unwrap();
        assert!(json.contains("\"channelName\""));
        assert!(json.contains("\"publishedAt\""));
    }
}
