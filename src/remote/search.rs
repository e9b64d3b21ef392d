use std::collections::HashMap;

use serde_json::Value;

use super::RemoteError;
use crate::core::video::{format_views, parse_duration, VideoSummary};

const SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";
const DETAILS_URL: &str = "https://www.googleapis.com/youtube/v3/videos";

pub const DEFAULT_MAX_RESULTS: u32 = 12;

/// Result ordering requested from the search collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOption {
    #[default]
    Relevance,
    ViewCount,
    Date,
    Rating,
}

impl SortOption {
    /// Wire value for the API's `order` parameter.
    pub fn as_order(&self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::ViewCount => "viewCount",
            Self::Date => "date",
            Self::Rating => "rating",
        }
    }

    /// Parse a user-supplied mode; anything unrecognized means relevance.
    pub fn parse(s: &str) -> Self {
        match s {
            "viewCount" | "views" => Self::ViewCount,
            "date" => Self::Date,
            "rating" => Self::Rating,
            _ => Self::Relevance,
        }
    }
}

/// Client for the remote video-search collaborator. Two calls per search:
/// one for the hit list, one for durations and view counts.
pub struct VideoSearchClient {
    api_key: String,
    client: reqwest::Client,
}

impl VideoSearchClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    pub async fn search(
        &self,
        query: &str,
        max_results: u32,
        sort: SortOption,
    ) -> Result<Vec<VideoSummary>, RemoteError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(RemoteError::InvalidInput(
                "Query parameter is required".to_string(),
            ));
        }

        log::info!(
            "Searching videos for: \"{}\" with maxResults: {}, sortBy: {}",
            query,
            max_results,
            sort.as_order()
        );

        // The search surface is tuned for study material: tutorial-flavored
        // query, medium-length videos, strict safe search.
        let tutorial_query = format!("{} tutorial educational", query);
        let max_results_param = max_results.to_string();
        let resp = self
            .client
            .get(SEARCH_URL)
            .query(&[
                ("part", "snippet"),
                ("q", tutorial_query.as_str()),
                ("type", "video"),
                ("maxResults", max_results_param.as_str()),
                ("order", sort.as_order()),
                ("videoDuration", "medium"),
                ("safeSearch", "strict"),
                ("relevanceLanguage", "en"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| RemoteError::Http(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(RemoteError::Api { status, body });
        }

        let payload: Value = resp
            .json()
            .await
            .map_err(|e| RemoteError::Parse(e.to_string()))?;

        let items = match payload["items"].as_array() {
            Some(items) if !items.is_empty() => items.clone(),
            _ => {
                log::info!("No videos found for \"{}\"", query);
                return Ok(Vec::new());
            }
        };

        let video_ids: Vec<&str> = items
            .iter()
            .filter_map(|item| item["id"]["videoId"].as_str())
            .collect();

        let details = self.fetch_details(&video_ids.join(",")).await?;

        let videos = items
            .iter()
            .filter_map(|item| {
                let id = item["id"]["videoId"].as_str()?;
                let snippet = &item["snippet"];
                let (duration, views) = details
                    .get(id)
                    .cloned()
                    .unwrap_or((String::new(), "0".to_string()));
                Some(VideoSummary {
                    id: id.to_string(),
                    title: snippet["title"].as_str().unwrap_or_default().to_string(),
                    thumbnail: thumbnail_url(snippet),
                    channel_name: snippet["channelTitle"]
                        .as_str()
                        .unwrap_or_default()
                        .to_string(),
                    duration,
                    views,
                    published_at: snippet["publishedAt"]
                        .as_str()
                        .unwrap_or_default()
                        .to_string(),
                })
            })
            .collect::<Vec<_>>();

        log::info!("Returning {} videos with details", videos.len());
        Ok(videos)
    }

    /// Durations and view counts, keyed by video id.
    async fn fetch_details(&self, ids: &str) -> Result<HashMap<String, (String, String)>, RemoteError> {
        let resp = self
            .client
            .get(DETAILS_URL)
            .query(&[
                ("part", "contentDetails,statistics"),
                ("id", ids),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| RemoteError::Http(e.to_string()))?;

        let payload: Value = resp
            .json()
            .await
            .map_err(|e| RemoteError::Parse(e.to_string()))?;

        let mut map = HashMap::new();
        if let Some(items) = payload["items"].as_array() {
            for item in items {
                let Some(id) = item["id"].as_str() else {
                    continue;
                };
                let duration =
                    parse_duration(item["contentDetails"]["duration"].as_str().unwrap_or(""));
                let views = format_views(item["statistics"]["viewCount"].as_str().unwrap_or("0"));
                map.insert(id.to_string(), (duration, views));
            }
        }
        Ok(map)
    }
}

fn thumbnail_url(snippet: &Value) -> String {
    snippet["thumbnails"]["medium"]["url"]
        .as_str()
        .or_else(|| snippet["thumbnails"]["default"]["url"].as_str())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_option_wire_values() {
        assert_eq!(SortOption::Relevance.as_order(), "relevance");
        assert_eq!(SortOption::ViewCount.as_order(), "viewCount");
        assert_eq!(SortOption::Date.as_order(), "date");
        assert_eq!(SortOption::Rating.as_order(), "rating");
    }

    #[test]
    fn sort_option_parse_defaults_to_relevance() {
        assert_eq!(SortOption::parse("viewCount"), SortOption::ViewCount);
        assert_eq!(SortOption::parse("date"), SortOption::Date);
        assert_eq!(SortOption::parse("rating"), SortOption::Rating);
        assert_eq!(SortOption::parse("nonsense"), SortOption::Relevance);
        assert_eq!(SortOption::parse(""), SortOption::Relevance);
    }

    #[test]
    fn thumbnail_prefers_medium() {
        let snippet = serde_json::json!({
            "thumbnails": {
                "default": { "url": "small.jpg" },
                "medium": { "url": "medium.jpg" },
            }
        });
        assert_eq!(thumbnail_url(&snippet), "medium.jpg");

        let snippet = serde_json::json!({
            "thumbnails": { "default": { "url": "small.jpg" } }
        });
        assert_eq!(thumbnail_url(&snippet), "small.jpg");

        let snippet = serde_json::json!({});
        assert_eq!(thumbnail_url(&snippet), "");
    }

    #[tokio::test]
    async fn empty_query_is_rejected_before_any_call() {
        let client = VideoSearchClient::new("unused");
        let err = client.search("   ", 12, SortOption::Relevance).await.unwrap_err();
        assert!(matches!(err, RemoteError::InvalidInput(_)));
    }
}
