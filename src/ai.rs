//! AI assistant integration.
//!
//! The provider is injected behind the [`Completer`] trait so handlers (and
//! tests) never depend on the concrete client. Every caller keeps a canned
//! fallback ready: chat and affirmation generation must always answer with
//! *some* text even when the provider is down or unconfigured.

use std::env;
use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("provider timed out")]
    Timeout,
    #[error("malformed provider response")]
    MalformedResponse,
    #[error("no provider configured")]
    Unconfigured,
}

#[async_trait::async_trait]
pub trait Completer: Send + Sync {
    /// Answer with free text given a prompt.
    async fn complete(&self, prompt: &str) -> Result<String, AiError>;
}

/// Thin client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl GeminiClient {
    /// Build from `GEMINI_API_KEY` / `GEMINI_MODEL` / `AI_TIMEOUT_SECS`.
    /// Returns `None` when no key is set; callers fall back to canned text.
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("GEMINI_API_KEY").ok()?;
        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".to_string());
        let timeout_secs = env::var("AI_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(15);
        Some(Self {
            client: Client::new(),
            api_key,
            model,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    async fn generate_content(&self, prompt: &str) -> Result<String, AiError> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let body = json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }]
        });

        let res = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::Request(format!("Generate Request Failed: {}", e)))?;

        if !res.status().is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(AiError::Request(format!("Generate Failed: {}", text)));
        }

        let json: Value = res
            .json()
            .await
            .map_err(|_| AiError::MalformedResponse)?;

        // Extract text from: candidates[0].content.parts[0].text
        let text = json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or(AiError::MalformedResponse)?;

        // Clean markdown code blocks if any
        let clean_text = text
            .trim()
            .trim_start_matches("```json")
            .trim_start_matches("```")
            .trim_end_matches("```")
            .trim();

        Ok(clean_text.to_string())
    }
}

#[async_trait::async_trait]
impl Completer for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, AiError> {
        match tokio::time::timeout(self.timeout, self.generate_content(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(AiError::Timeout),
        }
    }
}

/// Stand-in used when `GEMINI_API_KEY` is absent. Always fails, which routes
/// every caller onto its canned fallback.
pub struct Unconfigured;

#[async_trait::async_trait]
impl Completer for Unconfigured {
    async fn complete(&self, _prompt: &str) -> Result<String, AiError> {
        Err(AiError::Unconfigured)
    }
}

pub const FALLBACK_REPLIES: &[&str] = &[
    "I'm here with you. Would you like to tell me a bit more about how today has felt?",
    "That sounds like a lot to carry. Sometimes a short breathing exercise can help create a little space.",
    "Thank you for sharing that. What is one small thing that went okay today, even if the rest was hard?",
    "It makes sense to feel that way. Would writing a few lines in your journal help untangle it?",
    "You're taking a good step just by checking in. Be gentle with yourself today.",
];

pub const FALLBACK_AFFIRMATIONS: &[&str] = &[
    "I am allowed to take things one step at a time.",
    "My feelings are valid, and they will pass.",
    "I am building resilience with every small effort.",
    "I deserve the same kindness I offer others.",
    "Today I choose progress over perfection.",
];

/// Deterministic pick from a fallback list, rotating with the conversation.
pub fn fallback_text(list: &'static [&'static str], turn: usize) -> &'static str {
    list[turn % list.len()]
}

/// Build the chat prompt from recent history plus the new user message.
pub fn chat_prompt(history: &[(bool, String)], message: &str) -> String {
    let mut prompt = String::from(
        "You are a supportive mental-wellness assistant in a self-care app. \
         Respond with warmth in 2-4 sentences. Encourage healthy habits \
         (breathing exercises, journaling, mood check-ins) when relevant. \
         You are not a therapist and do not give medical advice.\n\n",
    );
    for (is_user, content) in history {
        let speaker = if *is_user { "User" } else { "Assistant" };
        prompt.push_str(&format!("{}: {}\n", speaker, content));
    }
    prompt.push_str(&format!("User: {}\nAssistant:", message));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_rotates_through_list() {
        let first = fallback_text(FALLBACK_REPLIES, 0);
        let wrapped = fallback_text(FALLBACK_REPLIES, FALLBACK_REPLIES.len());
        assert_eq!(first, wrapped);
        assert_ne!(first, fallback_text(FALLBACK_REPLIES, 1));
    }

    #[test]
    fn prompt_includes_history_in_order() {
        let history = vec![
            (true, "I feel anxious".to_string()),
            (false, "That sounds hard.".to_string()),
        ];
        let prompt = chat_prompt(&history, "It got worse today");
        let user_pos = prompt.find("User: I feel anxious").unwrap();
        let assistant_pos = prompt.find("Assistant: That sounds hard.").unwrap();
        let latest_pos = prompt.find("User: It got worse today").unwrap();
        assert!(user_pos < assistant_pos && assistant_pos < latest_pos);
    }
}
