use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::conversation::{Role, Turn};
use crate::error::ChatError;
use crate::persona;
use crate::sanitize::clean_reply;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
    #[serde(rename = "safetySettings")]
    safety_settings: Vec<SafetySetting>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_k: u32,
    top_p: f64,
    max_output_tokens: u32,
    candidate_count: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.8,
            top_k: 40,
            top_p: 0.9,
            max_output_tokens: 300,
            candidate_count: 1,
        }
    }
}

#[derive(Serialize)]
struct SafetySetting {
    category: String,
    threshold: String,
}

const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

fn safety_settings() -> Vec<SafetySetting> {
    SAFETY_CATEGORIES
        .iter()
        .map(|category| SafetySetting {
            category: category.to_string(),
            threshold: "BLOCK_MEDIUM_AND_ABOVE".to_string(),
        })
        .collect()
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

/// Client for the Gemini generateContent endpoint.
///
/// The credential is injected at construction; a missing key fails every
/// `complete` call up front without touching the network.
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, model: &str) -> Self {
        Self {
            http: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.to_string(),
        }
    }

    /// Point the client at a different host. Used by tests.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Send the persona plus the supplied history and return the cleaned
    /// reply text.
    pub async fn complete(&self, history: &[Turn]) -> Result<String, ChatError> {
        let key = self.api_key.as_deref().ok_or(ChatError::MissingKey)?;

        let request = build_request(history);
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let response = self
            .http
            .post(&url)
            .query(&[("key", key)])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .and_then(|detail| detail.message)
                .unwrap_or_else(|| format!("HTTP {}", status));
            return Err(ChatError::Api { status, message });
        }

        let body: GenerateResponse = response.json().await.map_err(|_| ChatError::Format)?;
        let raw = first_candidate_text(body).ok_or(ChatError::Format)?;

        Ok(clean_reply(&raw))
    }
}

fn first_candidate_text(body: GenerateResponse) -> Option<String> {
    body.candidates?
        .into_iter()
        .next()?
        .content?
        .parts?
        .into_iter()
        .next()?
        .text
}

/// Persona instruction turn, canned acknowledgment turn, then the history.
/// Turns with only whitespace are dropped before sending.
fn build_request(history: &[Turn]) -> GenerateRequest {
    let mut contents = Vec::with_capacity(history.len() + 2);
    contents.push(Content {
        role: "user".to_string(),
        parts: vec![Part {
            text: persona::PERSONA_PROMPT.to_string(),
        }],
    });
    contents.push(Content {
        role: "model".to_string(),
        parts: vec![Part {
            text: persona::PERSONA_ACK.to_string(),
        }],
    });

    for turn in history {
        if turn.text.trim().is_empty() {
            continue;
        }
        let role = match turn.role {
            Role::User => "user",
            Role::Model => "model",
        };
        contents.push(Content {
            role: role.to_string(),
            parts: vec![Part {
                text: turn.text.clone(),
            }],
        });
    }

    GenerateRequest {
        contents,
        generation_config: GenerationConfig::default(),
        safety_settings: safety_settings(),
    }
}
