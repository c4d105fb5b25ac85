//! Feedback submission
//!
//! Persisting feedback is someone else's job; this module only delivers
//! `{feedback_type, comment, build_instructions}` to the configured
//! endpoint, with the final instruction text passed through verbatim.

use crate::config::Config;
use crate::generator::client::truncate_str;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackSubmission {
    pub feedback_type: String,
    pub comment: Option<String>,
    /// Final instruction text, exactly as the generator produced it.
    pub build_instructions: String,
    pub submitted_at: DateTime<Utc>,
}

impl FeedbackSubmission {
    pub fn new(
        feedback_type: impl Into<String>,
        comment: Option<String>,
        build_instructions: impl Into<String>,
    ) -> Self {
        Self {
            feedback_type: feedback_type.into(),
            comment,
            build_instructions: build_instructions.into(),
            submitted_at: Utc::now(),
        }
    }
}

/// POST a submission to the configured feedback endpoint.
///
/// A missing endpoint is an explicit error rather than a silent drop.
pub async fn submit_feedback(config: &Config, submission: &FeedbackSubmission) -> anyhow::Result<()> {
    let url = config.feedback_url.as_deref().ok_or_else(|| {
        anyhow::anyhow!(
            "No feedback endpoint configured. Set feedback_url in {}",
            Config::config_location()
        )
    })?;

    let client = reqwest::Client::new();
    let mut request = client.post(url).json(submission);
    if let Some(key) = &config.feedback_api_key {
        // Supabase-style REST auth: service key in both headers.
        request = request
            .header("apikey", key)
            .header("Authorization", format!("Bearer {}", key));
    }

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        anyhow::bail!(
            "Feedback submission failed ({}): {}",
            status,
            truncate_str(&text, 200)
        );
    }
    Ok(())
}
