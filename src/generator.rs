//! HTTP relay to the generative-language backend.
//!
//! Builds the idea-generation prompt, forwards it to the backend, and hands
//! the decoded text body to the extraction/normalization pipeline. The relay
//! does not parse the idea array itself; malformed or empty text is a
//! legitimate return value that the pipeline turns into an empty result.

use std::{env, time::Duration};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{Config, IdeaError, Result};

/// Environment variable consulted for the API key before the config file.
pub const API_KEY_ENV: &str = "IDEAFORGE_API_KEY";

/// Request body for the generateContent endpoint.
#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

/// Response body from the generateContent endpoint. Only the candidate text
/// is consumed; everything else the backend sends is ignored.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

impl GenerateResponse {
    /// Joins the text parts of the first candidate into a single payload.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

/// Client for the generation backend.
#[derive(Debug, Clone)]
pub struct GenClient {
    base_url: String,
    model: String,
    api_key: String,
    timeout_secs: u64,
}

impl GenClient {
    /// Builds a client from config. The API key is taken from the
    /// environment first, then from the config file.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| config.api_key.clone())
            .ok_or_else(|| IdeaError::MissingApiKey {
                env_var: API_KEY_ENV.to_string(),
            })?;

        Ok(Self {
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            api_key,
            timeout_secs: config.timeout_secs,
        })
    }

    /// Asks the backend for `count` idea records on `topic` and returns the
    /// raw text body of the first candidate.
    pub async fn generate_ideas(&self, topic: &str, count: usize) -> Result<String> {
        let prompt = build_idea_prompt(topic, count);
        info!(
            "Requesting {} ideas for topic '{}' from model {}",
            count, topic, self.model
        );
        debug!("Prompt payload is {} bytes", prompt.len());

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let resp = client
            .post(&url)
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    IdeaError::Backend {
                        message: format!("request timed out after {}s", self.timeout_secs),
                    }
                } else if e.is_connect() {
                    IdeaError::Backend {
                        message: format!("could not reach {}: {}", self.base_url, e),
                    }
                } else {
                    IdeaError::Http(e)
                }
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(IdeaError::Backend {
                message: format!("status {}: {}", status, truncate(&body, 300)),
            });
        }

        let body: GenerateResponse = resp.json().await?;
        let text = body.text();
        debug!("Backend returned {} bytes of text", text.len());

        Ok(text)
    }
}

/// Builds the generation prompt. The backend is asked for a bare JSON array
/// with the exact field names normalization expects, and for the Korean
/// complexity spellings the mapping recognizes. It will wrap the output in
/// prose or fences anyway often enough that extraction has to cope.
fn build_idea_prompt(topic: &str, count: usize) -> String {
    format!(
        r#"주제 "{topic}"에 대한 아이디어 {count}개를 JSON 배열로 제안해 주세요.
각 항목은 다음 필드를 가진 객체입니다:
{{"title":"짧은 제목","description":"2-3문장 설명","complexity":"간단|중간|어려움","monetizable":true,"category":"앱|웹|게임|도구 등","tags":["키워드"]}}
규칙: JSON 배열만 출력하세요. 설명 문장이나 코드 블록 없이 배열로 시작하고 배열로 끝나야 합니다."#
    )
}

/// Truncates backend error bodies for display.
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_topic_and_count() {
        let prompt = build_idea_prompt("요리", 5);
        assert!(prompt.contains("요리"));
        assert!(prompt.contains("5개"));
    }

    #[test]
    fn test_prompt_names_expected_fields_and_spellings() {
        let prompt = build_idea_prompt("travel", 3);
        for field in ["title", "description", "complexity", "monetizable", "category", "tags"] {
            assert!(prompt.contains(field), "prompt missing field {}", field);
        }
        for spelling in ["간단", "중간", "어려움"] {
            assert!(prompt.contains(spelling), "prompt missing {}", spelling);
        }
    }

    #[test]
    fn test_response_text_joins_parts() {
        let body = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "[{\"title\""}, {"text": ":\"A\"}]"}]}}
            ]
        }"#;
        let resp: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.text(), "[{\"title\":\"A\"}]");
    }

    #[test]
    fn test_response_text_empty_when_no_candidates() {
        let resp: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(resp.text(), "");
    }

    #[test]
    fn test_truncate_preserves_short_text() {
        assert_eq!(truncate("short", 300), "short");
        let long = "x".repeat(400);
        let cut = truncate(&long, 300);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 303);
    }
}
