use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const COMPLETION_MODEL: &str = "openai/gpt-4o-mini";
const SYSTEM_PROMPT: &str = "You are a professional travel planner AI.";
const TEMPERATURE: f64 = 0.8;
const MAX_TOKENS: u32 = 800;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Facts the degraded path needs to compose a usable plan without the
/// completion service.
pub struct PlanContext<'a> {
    pub city: &'a str,
    pub days: u32,
}

pub struct GeneratedPlan {
    pub body: String,
    /// True only when the text came back from the live completion service.
    pub generated: bool,
}

/// A plan backend is total: every outcome, including network failure, folds
/// into usable text. Selected once at startup based on credential presence.
#[async_trait]
pub trait PlanBackend: Send + Sync {
    async fn generate(&self, prompt: &str, ctx: PlanContext<'_>) -> GeneratedPlan;
}

/// One line per requested day, always available.
pub fn fallback_plan(city: &str, days: u32) -> String {
    (1..=days)
        .map(|day| format!("Day {}: Explore {} and enjoy local attractions.", day, city))
        .collect::<Vec<_>>()
        .join("\n")
}

fn degraded(note: &str, ctx: &PlanContext<'_>) -> GeneratedPlan {
    GeneratedPlan {
        body: format!("({})\n\n{}", note, fallback_plan(ctx.city, ctx.days)),
        generated: false,
    }
}

/// Deterministic planner used when no OpenRouter credential is configured.
/// Skips the network entirely; this is an expected offline mode.
pub struct OfflinePlanner;

#[async_trait]
impl PlanBackend for OfflinePlanner {
    async fn generate(&self, _prompt: &str, ctx: PlanContext<'_>) -> GeneratedPlan {
        degraded("OpenRouter API key not configured", &ctx)
    }
}

pub struct OpenRouterPlanner {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenRouterPlanner {
    pub fn new(api_key: String, base_url: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            api_key,
            base_url: base_url.unwrap_or_else(|| OPENROUTER_BASE_URL.to_string()),
        }
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

#[async_trait]
impl PlanBackend for OpenRouterPlanner {
    async fn generate(&self, prompt: &str, ctx: PlanContext<'_>) -> GeneratedPlan {
        let body = json!({
            "model": COMPLETION_MODEL,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt }
            ],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS
        });

        let url = format!("{}/chat/completions", self.base_url);

        // Single bounded attempt. Itinerary text is advisory, so a fast
        // fallback beats retries or backoff here.
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", "https://trip-advisor.example")
            .header("X-Title", "AI Trip Advisor")
            .json(&body)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => match resp.json::<ChatResponse>().await {
                Ok(parsed) => match parsed.choices.into_iter().next() {
                    Some(choice) if !choice.message.content.trim().is_empty() => GeneratedPlan {
                        body: choice.message.content,
                        generated: true,
                    },
                    _ => degraded("Completion payload contained no text", &ctx),
                },
                Err(err) => {
                    log::warn!("Malformed completion payload: {}", err);
                    degraded(&format!("Malformed completion payload: {}", err), &ctx)
                }
            },
            Ok(resp) => {
                let status = resp.status();
                let text = resp.text().await.unwrap_or_default();
                log::warn!("Completion service returned {}: {}", status, text);
                degraded(&format!("Error {}: {}", status.as_u16(), text), &ctx)
            }
            Err(err) => {
                log::warn!("Completion request failed: {}", err);
                degraded(&format!("API error: {}", err), &ctx)
            }
        }
    }
}
