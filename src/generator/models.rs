use serde::Deserialize;

/// Model tiers for generator calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Model {
    /// Drafting tier - invents the build and writes the full instruction set
    Draft,
    /// Refinement tier - repositions rejected placements, capped tighter
    Refine,
}

impl Model {
    pub fn id(&self) -> &'static str {
        match self {
            Model::Draft => "openai/gpt-4.1",
            Model::Refine => "openai/gpt-4o",
        }
    }

    pub fn max_tokens(&self) -> u32 {
        match self {
            // Instructions plus summary stay well under 400 words; the
            // refine cap mirrors the tighter budget corrections need.
            Model::Draft => 1024,
            Model::Refine => 800,
        }
    }

    pub fn temperature(&self) -> f32 {
        match self {
            Model::Draft => 0.7,
            Model::Refine => 0.5,
        }
    }
}

/// API usage information from the completion service
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
    /// Actual cost in USD when the service reports it.
    #[serde(default, alias = "total_cost")]
    pub cost: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_ids() {
        assert!(Model::Draft.id().starts_with("openai/"));
        assert_ne!(Model::Draft.id(), Model::Refine.id());
    }

    #[test]
    fn test_refine_budget_is_tighter() {
        assert!(Model::Refine.max_tokens() < Model::Draft.max_tokens());
        assert!(Model::Refine.temperature() < Model::Draft.temperature());
    }

    #[test]
    fn test_usage_deserialize_with_total_cost() {
        let json = r#"{"prompt_tokens": 100, "completion_tokens": 50, "total_tokens": 150, "total_cost": 0.0025}"#;
        let usage: Usage = serde_json::from_str(json).unwrap();
        assert_eq!(usage.total_tokens, 150);
        assert_eq!(usage.cost, Some(0.0025));
    }
}
