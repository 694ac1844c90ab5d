//! Roadmap generation boundary.
//!
//! A roadmap provider turns the traveler's context into the fixed-length,
//! chronologically ordered milestone sequence. The production implementation
//! asks Gemini for structured JSON; tests use the scripted provider from
//! [`crate::testing`].

use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;

use crate::model::{Milestone, UserContext};

/// Number of milestones in a generated roadmap, one per year of the decade.
pub const MILESTONE_COUNT: usize = 10;

/// First milestone year of the generated decade.
const FIRST_YEAR: i32 = 2026;

/// Errors from roadmap generation.
#[derive(Debug, Error)]
pub enum RoadmapError {
    #[error("Gemini API error: {0}")]
    Api(#[from] gemini::Error),

    #[error("roadmap response was not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("roadmap response was empty")]
    Empty,

    #[error("expected {MILESTONE_COUNT} milestones, got {0}")]
    WrongLength(usize),
}

/// Source of generated roadmaps.
#[async_trait]
pub trait RoadmapProvider: Send + Sync {
    /// Generate the milestone sequence for the given context.
    ///
    /// Returns exactly [`MILESTONE_COUNT`] milestones or an error; there is
    /// no partial success.
    async fn generate(&self, context: &UserContext) -> Result<Vec<Milestone>, RoadmapError>;
}

/// Configuration for the Gemini-backed provider.
#[derive(Debug, Clone)]
pub struct RoadmapConfig {
    /// The model to use (client default when unset).
    pub model: Option<String>,

    /// Temperature for generation.
    pub temperature: Option<f32>,

    /// Maximum tokens for the generated roadmap.
    pub max_output_tokens: usize,
}

impl Default for RoadmapConfig {
    fn default() -> Self {
        Self {
            model: None,
            temperature: Some(0.8),
            max_output_tokens: 8192,
        }
    }
}

/// Roadmap provider backed by the Gemini API.
pub struct GeminiRoadmap {
    client: gemini::Gemini,
    config: RoadmapConfig,
}

impl GeminiRoadmap {
    /// Create a provider with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: gemini::Gemini::new(api_key),
            config: RoadmapConfig::default(),
        }
    }

    /// Create a provider from the GEMINI_API_KEY environment variable.
    pub fn from_env() -> Result<Self, RoadmapError> {
        Ok(Self {
            client: gemini::Gemini::from_env()?,
            config: RoadmapConfig::default(),
        })
    }

    /// Configure the provider.
    pub fn with_config(mut self, config: RoadmapConfig) -> Self {
        self.config = config;
        self
    }

    fn build_prompt(context: &UserContext) -> String {
        let last_year = FIRST_YEAR + MILESTONE_COUNT as i32 - 1;
        format!(
            "Create a ten-year journey for a person named {name}, starting at the end \
             of {FIRST_YEAR} and ending at the end of {last_year}.\n\
             Current status: {status}\n\
             Ten-year goal: {goal}\n\n\
             Generate exactly {MILESTONE_COUNT} milestones, one for the end of each \
             year from {FIRST_YEAR} through {last_year}. For each year, describe what \
             has been achieved by the END of that year, the progressive evolution \
             toward the goal, a realistic challenge, and inspiring advice. Keep the \
             tone motivational, epic, and creative.",
            name = context.name,
            status = context.current_status,
            goal = context.ten_year_goal,
        )
    }

    fn response_schema() -> serde_json::Value {
        json!({
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": {
                    "year": {
                        "type": "INTEGER",
                        "description": "The specific calendar year of the milestone."
                    },
                    "title": { "type": "STRING" },
                    "description": { "type": "STRING" },
                    "advice": { "type": "STRING" },
                    "challenge": { "type": "STRING" }
                },
                "required": ["year", "title", "description", "advice", "challenge"]
            }
        })
    }
}

#[async_trait]
impl RoadmapProvider for GeminiRoadmap {
    async fn generate(&self, context: &UserContext) -> Result<Vec<Milestone>, RoadmapError> {
        let mut request = gemini::Request::new(Self::build_prompt(context))
            .with_response_schema(Self::response_schema())
            .with_max_output_tokens(self.config.max_output_tokens);

        if let Some(ref model) = self.config.model {
            request = request.with_model(model);
        }

        if let Some(temperature) = self.config.temperature {
            request = request.with_temperature(temperature);
        }

        let response = self.client.generate(request).await?;
        parse_roadmap(response.text())
    }
}

/// Parse and validate a roadmap JSON document.
///
/// Anything short of exactly [`MILESTONE_COUNT`] well-formed milestones is a
/// failure; there is no schema-violation recovery.
pub fn parse_roadmap(text: &str) -> Result<Vec<Milestone>, RoadmapError> {
    if text.trim().is_empty() {
        return Err(RoadmapError::Empty);
    }

    let milestones: Vec<Milestone> = serde_json::from_str(text)?;

    if milestones.is_empty() {
        return Err(RoadmapError::Empty);
    }
    if milestones.len() != MILESTONE_COUNT {
        return Err(RoadmapError::WrongLength(milestones.len()));
    }

    Ok(milestones)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roadmap_json(count: usize) -> String {
        let items: Vec<serde_json::Value> = (0..count)
            .map(|i| {
                json!({
                    "year": FIRST_YEAR + i as i32,
                    "title": format!("Year {i}"),
                    "description": "Achieved something",
                    "advice": "Stay the course",
                    "challenge": "A real obstacle"
                })
            })
            .collect();
        serde_json::to_string(&items).unwrap()
    }

    #[test]
    fn test_parse_valid_roadmap() {
        let milestones = parse_roadmap(&roadmap_json(MILESTONE_COUNT)).unwrap();
        assert_eq!(milestones.len(), MILESTONE_COUNT);
        assert_eq!(milestones[0].year, FIRST_YEAR);
        assert_eq!(milestones[9].year, FIRST_YEAR + 9);
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        match parse_roadmap(&roadmap_json(3)) {
            Err(RoadmapError::WrongLength(3)) => {}
            other => panic!("expected WrongLength(3), got {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_empty_array() {
        assert!(matches!(parse_roadmap("[]"), Err(RoadmapError::Empty)));
    }

    #[test]
    fn test_parse_rejects_blank_text() {
        assert!(matches!(parse_roadmap("  "), Err(RoadmapError::Empty)));
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(matches!(
            parse_roadmap("the model rambled instead"),
            Err(RoadmapError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_rejects_missing_fields() {
        let missing_advice = r#"[{"year": 2026, "title": "t", "description": "d", "challenge": "c"}]"#;
        assert!(matches!(
            parse_roadmap(missing_advice),
            Err(RoadmapError::Parse(_))
        ));
    }

    #[test]
    fn test_prompt_carries_context() {
        let context = UserContext::new("Ada", "finishing a PhD", "run a research lab");
        let prompt = GeminiRoadmap::build_prompt(&context);

        assert!(prompt.contains("Ada"));
        assert!(prompt.contains("finishing a PhD"));
        assert!(prompt.contains("run a research lab"));
        assert!(prompt.contains("2026"));
        assert!(prompt.contains("2035"));
    }

    #[test]
    fn test_schema_requires_all_fields() {
        let schema = GeminiRoadmap::response_schema();
        let required = schema["items"]["required"].as_array().unwrap();
        for field in ["year", "title", "description", "advice", "challenge"] {
            assert!(required.iter().any(|v| v == field), "missing {field}");
        }
    }
}
