//! Scenario generation backed by the Gemini `generateContent` API

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;

use super::generator::{
    GenerationError, ScenarioGenerator, GENERATED_VEHICLES_MAX, GENERATED_VEHICLES_MIN,
};

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin blocking client that asks Gemini for a vehicle layout.
#[derive(Debug, Clone)]
pub struct GeminiScenarioGenerator {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiScenarioGenerator {
    pub fn new(api_key: impl Into<String>) -> Result<Self, GenerationError> {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT, DEFAULT_MODEL)
    }

    /// Point the client at another endpoint or model (e.g. a local mock server).
    pub fn with_endpoint(
        api_key: impl Into<String>,
        endpoint: &str,
        model: &str,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.into(),
        })
    }

    fn instructions() -> String {
        format!(
            "You are a traffic simulation expert. Your task is to generate a vehicle setup for a V2V communication simulation based on a user's description.\n\
             The simulation area is a 3-lane highway.\n\
             - Lane 1 is the bottom lane.\n\
             - Lane 2 is the middle lane.\n\
             - Lane 3 is the top lane.\n\
             Each vehicle needs a unique ID (e.g., V1, V2), an initial X position (from 0 to 100), a lane (1, 2, or 3), an initial speed (a number from 1 to 10), and a color (e.g., 'blue', 'red', 'green', 'yellow', 'purple'). Generate between {GENERATED_VEHICLES_MIN} and {GENERATED_VEHICLES_MAX} vehicles.\n\
             You must return a valid JSON array of vehicle objects. Do not include any other text, markdown formatting, or explanations in your response."
        )
    }

    fn request_body(prompt: &str) -> serde_json::Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [
                    { "text": Self::instructions() },
                    { "text": format!("User request: \"{prompt}\"") }
                ]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "id": { "type": "STRING", "description": "Unique vehicle identifier, e.g., V1" },
                            "x": { "type": "NUMBER", "description": "Initial X position from 0 to 100" },
                            "lane": { "type": "INTEGER", "description": "Lane number: 1, 2, or 3" },
                            "speed": { "type": "NUMBER", "description": "Initial speed from 1 to 10" },
                            "color": { "type": "STRING", "description": "A common color name in lowercase" }
                        },
                        "required": ["id", "x", "lane", "speed", "color"]
                    }
                }
            }
        })
    }
}

impl ScenarioGenerator for GeminiScenarioGenerator {
    fn name(&self) -> &str {
        "gemini"
    }

    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::request_body(prompt))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GenerationError::Api(format!("{status}: {body}")));
        }

        let parsed: GenerateContentResponse = response.json()?;
        parsed
            .candidates
            .into_iter()
            .flat_map(|candidate| candidate.content.parts)
            .find_map(|part| part.text)
            .map(|text| text.trim().to_string())
            .ok_or_else(|| GenerationError::InvalidResponse("response has no text".to_string()))
    }
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

#[derive(Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}
