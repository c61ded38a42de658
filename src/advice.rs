//! Boundary around the external text-generation provider.
//!
//! Nothing in here returns an error to the rest of the app: provider failures are logged
//! and replaced with fixed fallbacks.

use crate::config::AdviceConfig;
use crate::models::HealthLogEntry;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

pub const FALLBACK_ADVICE: &str =
    "I'm having trouble analyzing your data right now. Please try again later.";
pub const EMPTY_ADVICE: &str = "Analysis failed to yield conclusive data.";

const ANALYST_FRAMING: &str = "You are Vitali, a world-class health analyst. Provide concise, \
realistic, and actionable health advice based on the user's data. Do not use emojis. Use \
professional, encouraging tone.";
const ADVICE_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no provider api key configured")]
    Unconfigured,
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationRequest {
    pub system: Option<String>,
    pub prompt: String,
    pub temperature: Option<f32>,
    /// When set, the provider is asked for JSON matching this schema.
    pub response_schema: Option<Value>,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError>;
}

/// Gemini `generateContent` over REST.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(config: &AdviceConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent("vitali/0.1")
            .build()
            .unwrap_or_default();

        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        }
    }

    fn body(request: &GenerationRequest) -> Value {
        let mut generation_config = serde_json::Map::new();
        if let Some(temperature) = request.temperature {
            generation_config.insert("temperature".into(), json!(temperature));
        }
        if let Some(schema) = &request.response_schema {
            generation_config.insert("responseMimeType".into(), json!("application/json"));
            generation_config.insert("responseSchema".into(), schema.clone());
        }

        let mut body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": request.prompt }] }],
            "generationConfig": generation_config,
        });
        if let Some(system) = &request.system {
            body["systemInstruction"] = json!({ "parts": [{ "text": system }] });
        }
        body
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    fn text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let api_key = self.api_key.as_deref().ok_or(GenerationError::Unconfigured)?;
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);

        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(&Self::body(&request))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        Ok(parsed.text())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealIdea {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub description: String,
}

fn meal_plan_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "name": { "type": "STRING" },
                "calories": { "type": "NUMBER" },
                "protein": { "type": "NUMBER" },
                "description": { "type": "STRING" },
            },
            "required": ["name", "calories", "protein", "description"],
        },
    })
}

/// Parses a structured meal plan. Anything short of a well-formed array yields nothing.
pub fn parse_meal_plan(raw: &str) -> Vec<MealIdea> {
    let trimmed = raw.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed);

    match serde_json::from_str::<Vec<MealIdea>>(body) {
        Ok(ideas)
            if ideas.iter().all(|idea| {
                !idea.name.trim().is_empty() && idea.calories.is_finite() && idea.protein.is_finite()
            }) =>
        {
            ideas
        }
        Ok(_) => {
            warn!("meal plan contained invalid entries, discarding");
            Vec::new()
        }
        Err(err) => {
            warn!("meal plan was not valid json: {err}");
            Vec::new()
        }
    }
}

#[derive(Clone)]
pub struct AdviceGateway {
    generator: Arc<dyn TextGenerator>,
}

impl AdviceGateway {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Always yields text: the completion, or a fixed fallback.
    pub async fn ask(&self, latest: Option<&HealthLogEntry>, question: &str) -> String {
        let stats = latest
            .and_then(|entry| serde_json::to_string(entry).ok())
            .unwrap_or_else(|| "none logged".to_string());
        let request = GenerationRequest {
            system: Some(ANALYST_FRAMING.to_string()),
            prompt: format!("User Stats: {stats}. User Question: {question}"),
            temperature: Some(ADVICE_TEMPERATURE),
            response_schema: None,
        };

        match self.generator.generate(request).await {
            Ok(text) if text.trim().is_empty() => EMPTY_ADVICE.to_string(),
            Ok(text) => {
                debug!(chars = text.len(), "advice received");
                text
            }
            Err(err) => {
                warn!("advice request failed: {err}");
                FALLBACK_ADVICE.to_string()
            }
        }
    }

    pub async fn meal_plan(&self, preferences: &[String]) -> Vec<MealIdea> {
        let request = GenerationRequest {
            system: None,
            prompt: format!(
                "Generate 3 healthy meal ideas for someone who likes: {}",
                preferences.join(", ")
            ),
            temperature: None,
            response_schema: Some(meal_plan_schema()),
        };

        match self.generator.generate(request).await {
            Ok(raw) => parse_meal_plan(&raw),
            Err(err) => {
                warn!("meal plan request failed: {err}");
                Vec::new()
            }
        }
    }
}
