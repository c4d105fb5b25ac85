use super::models::{Model, Usage};
use serde::{Deserialize, Serialize};

/// OpenRouter chat-completions endpoint
const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Rate limit retry configuration
const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_SECS: u64 = 2;
const BACKOFF_MULTIPLIER: u64 = 2;

/// Response from the completion service including usage stats
#[derive(Debug)]
pub struct GeneratorResponse {
    pub content: String,
    pub usage: Option<Usage>,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

#[derive(Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: String,
}

/// Extract a retry-after hint from a rate-limit response body, if present
fn parse_retry_after(text: &str) -> Option<u64> {
    let text_lower = text.to_lowercase();
    let pos = text_lower.find("retry")?;
    for word in text_lower[pos..].split_whitespace().skip(1).take(5) {
        if let Ok(secs) = word
            .trim_matches(|c: char| !c.is_numeric())
            .parse::<u64>()
        {
            if secs > 0 && secs < 300 {
                return Some(secs);
            }
        }
    }
    None
}

/// Call the completion service with automatic retry on rate limits.
///
/// Only 429s are retried; any other failure is surfaced once, as a single
/// generation failure for the request. The refinement loop never re-sends
/// an identical request.
pub(crate) async fn call_generator(
    api_key: &str,
    system: &str,
    user: &str,
    model: Model,
) -> anyhow::Result<GeneratorResponse> {
    let client = reqwest::Client::new();

    let request = ChatRequest {
        model: model.id().to_string(),
        messages: vec![
            Message {
                role: "system".to_string(),
                content: system.to_string(),
            },
            Message {
                role: "user".to_string(),
                content: user.to_string(),
            },
        ],
        max_tokens: model.max_tokens(),
        temperature: model.temperature(),
        stream: false,
    };

    let mut retry_count = 0;

    loop {
        let response = client
            .post(OPENROUTER_URL)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            let parsed: ChatResponse = serde_json::from_str(&text).map_err(|e| {
                anyhow::anyhow!("Failed to parse generator response: {}\n{}", e, text)
            })?;

            let content = parsed
                .choices
                .first()
                .map(|c| c.message.content.clone())
                .unwrap_or_default();

            return Ok(GeneratorResponse {
                content,
                usage: parsed.usage,
            });
        }

        if status.as_u16() == 429 && retry_count < MAX_RETRIES {
            retry_count += 1;
            let retry_after = parse_retry_after(&text)
                .unwrap_or(INITIAL_BACKOFF_SECS * BACKOFF_MULTIPLIER.pow(retry_count - 1));
            eprintln!(
                "  Generator rate limited. Retrying in {}s (attempt {}/{})",
                retry_after, retry_count, MAX_RETRIES
            );
            tokio::time::sleep(tokio::time::Duration::from_secs(retry_after)).await;
            continue;
        }

        let error_msg = match status.as_u16() {
            401 => "Invalid API key. Set OPENROUTER_API_KEY or update the config file.".to_string(),
            429 => format!(
                "Rate limited by the generator service after {} retries. Try again in a few minutes.",
                retry_count
            ),
            500..=599 => format!(
                "Generator service error ({}). The service may be temporarily unavailable.",
                status
            ),
            _ => format!("Generator API error {}: {}", status, truncate_str(&text, 200)),
        };
        return Err(anyhow::anyhow!("{}", error_msg));
    }
}

/// Truncate a string for display (Unicode-safe)
pub(crate) fn truncate_str(s: &str, max_chars: usize) -> &str {
    if s.chars().count() <= max_chars {
        s
    } else {
        let byte_idx = s
            .char_indices()
            .nth(max_chars)
            .map(|(i, _)| i)
            .unwrap_or(s.len());
        &s[..byte_idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_retry_after_finds_seconds() {
        assert_eq!(
            parse_retry_after("rate limited, retry after 12 seconds"),
            Some(12)
        );
        assert_eq!(parse_retry_after("no hint here"), None);
    }

    #[test]
    fn test_parse_retry_after_ignores_absurd_values() {
        assert_eq!(parse_retry_after("retry after 100000 seconds"), None);
    }

    #[test]
    fn test_truncate_str_unicode_safe() {
        assert_eq!(truncate_str("ééééé", 3), "ééé");
        assert_eq!(truncate_str("short", 10), "short");
    }
}
