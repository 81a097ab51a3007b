//! Strategy generation via a local Ollama server, with a static-text
//! fallback when no model is reachable.

use reqwest::Client;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;

const SYSTEM_PROMPT: &str = "You are a world-class chess strategy expert. \
Given an opponent's weaknesses and playing patterns, provide specific, \
actionable chess strategies to exploit those weaknesses. Focus on concrete \
opening moves, tactical patterns, and strategic plans.";

pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str) -> Self {
        let client = Client::builder()
            .user_agent("OpeningScout/1.0")
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .unwrap();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    /// Check that the server is up and the configured model is pulled.
    pub async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        let resp = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(_) => return false,
        };
        if !resp.status().is_success() {
            return false;
        }
        let data: Value = match resp.json().await {
            Ok(d) => d,
            Err(_) => return false,
        };
        data["models"]
            .as_array()
            .map(|models| {
                models.iter().any(|m| {
                    m.get("name")
                        .and_then(|n| n.as_str())
                        .map(|n| n.starts_with(&self.model))
                        .unwrap_or(false)
                })
            })
            .unwrap_or(false)
    }

    /// Generate free-text advice for the given analysis block.
    pub async fn generate(&self, analysis: &str) -> Result<String, AnalyzerError> {
        let url = format!("{}/api/generate", self.base_url);
        let prompt = format!("{SYSTEM_PROMPT}\n\nNow analyze this opponent:\n{analysis}");

        let resp = self
            .client
            .post(&url)
            .json(&json!({
                "model": self.model,
                "prompt": prompt,
                "stream": false,
                "options": {
                    "temperature": 0.7,
                    "top_p": 0.9,
                    "num_predict": 1000,
                },
            }))
            .send()
            .await
            .map_err(|e| AnalyzerError::Generation(format!("Request error: {e}")))?;

        if !resp.status().is_success() {
            return Err(AnalyzerError::Generation(format!(
                "HTTP {}",
                resp.status()
            )));
        }

        let data: Value = resp
            .json()
            .await
            .map_err(|e| AnalyzerError::Generation(format!("Response parse error: {e}")))?;

        data["response"]
            .as_str()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AnalyzerError::Generation("Empty model response".into()))
    }
}

/// Text-generation strategy, selected once at startup. When the model
/// is unreachable the pipeline still produces advice, just generic.
pub enum StrategyGenerator {
    Ollama(OllamaClient),
    Generic,
}

impl StrategyGenerator {
    pub async fn select(config: &AnalyzerConfig) -> Self {
        let client = OllamaClient::new(&config.ollama_url, &config.ollama_model);
        if client.is_available().await {
            info!(model = %config.ollama_model, "Ollama model available");
            StrategyGenerator::Ollama(client)
        } else {
            warn!(
                url = %config.ollama_url,
                model = %config.ollama_model,
                "Ollama unavailable, using generic strategy text"
            );
            StrategyGenerator::Generic
        }
    }

    /// Never fails: generation errors degrade to the generic text.
    pub async fn generate_strategy(&self, analysis: &str) -> String {
        match self {
            StrategyGenerator::Ollama(client) => match client.generate(analysis).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "Strategy generation failed, using generic text");
                    generic_strategy()
                }
            },
            StrategyGenerator::Generic => generic_strategy(),
        }
    }
}

fn generic_strategy() -> String {
    [
        "General preparation advice:",
        "- Steer the game toward the openings where the opponent scores worst.",
        "- Create tactical complications against opponents prone to quick losses.",
        "- In their low-sample openings, choose sharp sidelines they are unlikely to know.",
        "- Otherwise play solid, positional chess and let the weaknesses surface.",
    ]
    .join("\n")
}
