//! Generator collaborator
//!
//! The natural-language generation step is an external service consumed
//! through a request/response contract. One request shape covers both the
//! initial generation and corrections; the response is free-form text with
//! no structural guarantee, so everything downstream parses defensively.

pub mod client;
pub mod models;
pub mod prompts;

pub use client::GeneratorResponse;
pub use models::{Model, Usage};

use crate::brick::RejectedBrick;
use serde::Serialize;

/// One request to the generator collaborator.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationRequest {
    pub parts_list: Option<String>,
    pub theme: Option<String>,
    /// Full instruction text of the previous draft, for corrections.
    pub previous_instructions: Option<String>,
    /// Rejected placements driving a correction; empty for the initial
    /// generation.
    pub rejected_placements: Vec<RejectedBrick>,
}

impl GenerationRequest {
    pub fn initial(parts_list: impl Into<String>, theme: Option<String>) -> Self {
        Self {
            parts_list: Some(parts_list.into()),
            theme,
            ..Self::default()
        }
    }

    pub fn correction(previous_instructions: String, rejected: Vec<RejectedBrick>) -> Self {
        Self {
            previous_instructions: Some(previous_instructions),
            rejected_placements: rejected,
            ..Self::default()
        }
    }

    pub fn is_correction(&self) -> bool {
        !self.rejected_placements.is_empty()
    }
}

/// Seam between the refinement loop and the completion service, so the
/// loop is testable with a scripted stand-in.
#[allow(async_fn_in_trait)]
pub trait BuildGenerator {
    /// Produce instruction text for the request. Errors are whole-request
    /// generation failures; the caller never retries the same request.
    async fn complete(&self, request: &GenerationRequest) -> anyhow::Result<String>;
}

/// Pick prompts and model tier for a request.
fn render_request(request: &GenerationRequest) -> (&'static str, String, Model) {
    if request.is_correction() {
        let previous = request.previous_instructions.as_deref().unwrap_or_default();
        (
            prompts::CORRECTION_SYSTEM,
            prompts::correction_user_prompt(previous, &request.rejected_placements),
            Model::Refine,
        )
    } else {
        (
            prompts::GENERATION_SYSTEM,
            prompts::generation_user_prompt(
                request.parts_list.as_deref().unwrap_or_default(),
                request.theme.as_deref(),
            ),
            Model::Draft,
        )
    }
}

/// Production generator speaking the OpenRouter chat-completions API.
pub struct OpenRouterGenerator {
    api_key: String,
}

impl OpenRouterGenerator {
    pub fn new(api_key: String) -> Self {
        Self { api_key }
    }
}

impl BuildGenerator for OpenRouterGenerator {
    async fn complete(&self, request: &GenerationRequest) -> anyhow::Result<String> {
        let (system, user, model) = render_request(request);
        let response = client::call_generator(&self.api_key, system, &user, model).await?;
        if let Some(usage) = &response.usage {
            eprintln!("  Generator used {} tokens", usage.total_tokens);
        }
        Ok(response.content)
    }
}
