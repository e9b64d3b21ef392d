use serde_json::Value;

use super::{QuoteSource, RemoteError};

const ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

/// What the generator is asked to do with the supplied context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateAction {
    /// Freeform passthrough of the user's input.
    Notes,
    Summarize,
    Expand,
    Improve,
    Quiz,
    Flowchart,
    Motivation,
}

impl GenerateAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Notes => "notes",
            Self::Summarize => "summarize",
            Self::Expand => "expand",
            Self::Improve => "improve",
            Self::Quiz => "quiz",
            Self::Flowchart => "flowchart",
            Self::Motivation => "motivation",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "notes" => Some(Self::Notes),
            "summarize" => Some(Self::Summarize),
            "expand" => Some(Self::Expand),
            "improve" => Some(Self::Improve),
            "quiz" => Some(Self::Quiz),
            "flowchart" => Some(Self::Flowchart),
            "motivation" => Some(Self::Motivation),
            _ => None,
        }
    }
}

/// Context strings for one generation request. Unused fields stay empty.
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    pub action: Option<GenerateAction>,
    pub video_title: String,
    pub existing_notes: String,
    pub user_input: String,
    /// Habit-pattern JSON for motivation requests.
    pub habit_data: Option<Value>,
}

impl GenerateRequest {
    pub fn for_action(action: GenerateAction) -> Self {
        Self {
            action: Some(action),
            ..Self::default()
        }
    }

    /// Assemble the prompt for the configured action.
    pub fn build_prompt(&self) -> String {
        match self.action {
            Some(GenerateAction::Summarize) => format!(
                "You are a helpful study assistant. Summarize the following notes taken while watching \"{}\". \
                 Make the summary concise but comprehensive, highlighting key points and concepts:\n\n\
                 Notes:\n{}\n\nProvide a well-structured summary.",
                self.video_title, self.existing_notes
            ),
            Some(GenerateAction::Expand) => format!(
                "You are a helpful study assistant. The user is watching \"{}\" and has written this note: \"{}\". \
                 Expand on this note with more details, explanations, and related concepts that would help them \
                 understand the topic better. Keep it educational and relevant.",
                self.video_title, self.user_input
            ),
            Some(GenerateAction::Quiz) => format!(
                "You are a helpful study assistant. Based on these notes from \"{}\":\n\n{}\n\n\
                 Generate 3-5 quiz questions to test understanding of the material. Format each question with \
                 the question text followed by the answer.",
                self.video_title, self.existing_notes
            ),
            Some(GenerateAction::Improve) => format!(
                "You are a helpful study assistant. The user is watching \"{}\" and has written: \"{}\". \
                 Improve this note by making it clearer, more organized, and adding any missing context. \
                 Keep it concise but comprehensive.",
                self.video_title, self.user_input
            ),
            Some(GenerateAction::Flowchart) => format!(
                "You are a helpful study assistant. Based on these notes from \"{}\":\n\n{}\n\n\
                 Create a flowchart that maps the main concepts and how they relate. Return only a mermaid \
                 diagram inside a ```mermaid code block.",
                self.video_title, self.existing_notes
            ),
            Some(GenerateAction::Motivation) => self.build_motivation_prompt(),
            Some(GenerateAction::Notes) | None => {
                if self.user_input.is_empty() {
                    "Hello, how can I help with your notes?".to_string()
                } else {
                    self.user_input.clone()
                }
            }
        }
    }

    fn build_motivation_prompt(&self) -> String {
        let quote_only = self
            .habit_data
            .as_ref()
            .and_then(|d| d.get("requestType"))
            .and_then(Value::as_str)
            == Some("quote_only");

        if quote_only {
            return "You are an encouraging study coach. Write one short, original motivational \
                    message (at most two sentences) for a student opening their learning dashboard. \
                    Return only the message text."
                .to_string();
        }

        let data = self
            .habit_data
            .as_ref()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "{}".to_string());
        format!(
            "You are an encouraging habit coach. Here is the user's habit data for this month as \
             JSON, including per-habit completion rates, streaks, and which habits were skipped \
             today:\n\n{}\n\nWrite one short, personal motivational message (at most two sentences) \
             reacting to their progress. Celebrate live streaks, gently nudge on skipped habits. \
             Return only the message text.",
            data
        )
    }
}

/// Client for the remote text-generation collaborator.
pub struct GenerateClient {
    api_key: String,
    client: reqwest::Client,
}

impl GenerateClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Single-attempt generation call. The response text defaults to a fixed
    /// placeholder when the payload carries no candidates, mirroring the
    /// upstream service.
    pub async fn generate(&self, request: &GenerateRequest) -> Result<String, RemoteError> {
        let prompt = request.build_prompt();
        log::info!(
            "Processing {} request for video: {}",
            request.action.map(|a| a.as_str()).unwrap_or("freeform"),
            request.video_title
        );

        let body = serde_json::json!({
            "contents": [
                { "parts": [{ "text": prompt }] }
            ],
            "generationConfig": {
                "temperature": 0.7,
                "maxOutputTokens": 1024,
            }
        });

        let resp = self
            .client
            .post(ENDPOINT)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
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

        let text = payload["candidates"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|c| c["content"]["parts"].as_array())
            .and_then(|parts| parts.first())
            .and_then(|p| p["text"].as_str())
            .unwrap_or("Unable to generate response");

        Ok(text.to_string())
    }
}

impl QuoteSource for GenerateClient {
    async fn fetch_quote(&self) -> Result<String, RemoteError> {
        let mut request = GenerateRequest::for_action(GenerateAction::Motivation);
        request.habit_data = Some(serde_json::json!({
            "habits": [],
            "skippedToday": [],
            "requestType": "quote_only",
        }));
        self.generate(&request).await
    }
}

/// Pull the diagram body out of a mermaid-fenced code block, wherever it
/// sits in the text; without one, strip any generic fences and return the
/// rest.
pub fn extract_mermaid(text: &str) -> String {
    if let Some(start) = text.find("```mermaid") {
        let rest = &text[start + "```mermaid".len()..];
        let body = match rest.find("```") {
            Some(end) => &rest[..end],
            None => rest,
        };
        return body.trim().to_string();
    }
    let trimmed = text.trim();
    let body = trimmed.strip_prefix("```").unwrap_or(trimmed);
    let body = body.strip_suffix("```").unwrap_or(body);
    body.trim().to_string()
}
