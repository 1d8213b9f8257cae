use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{
    generator::SiteGenerator,
    html::{strip_code_fences, user_message, SYSTEM_PROMPT},
};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

pub struct GeminiGenerator {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl GeminiGenerator {
    pub fn new(
        http: reqwest::Client,
        api_key: String,
        model: Option<String>,
        base_url: Option<String>,
    ) -> Self {
        let base = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let model = model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        Self {
            http,
            api_key,
            endpoint: format!("{}/models/{}:generateContent", base.trim_end_matches('/'), model),
        }
    }
}

fn extract_text(resp: GenerateResponse) -> anyhow::Result<String> {
    let text: String = resp
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    anyhow::ensure!(!text.trim().is_empty(), "gemini response has no text");
    Ok(strip_code_fences(&text).to_string())
}

#[async_trait]
impl SiteGenerator for GeminiGenerator {
    fn name(&self) -> &'static str {
        "gemini"
    }

    #[instrument(skip(self, prompt))]
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        let user = user_message(prompt);
        let body = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: [Part { text: SYSTEM_PROMPT }],
            },
            contents: [Content {
                role: Some("user"),
                parts: [Part { text: &user }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.8,
                max_output_tokens: 8000,
            },
        };

        let resp = self
            .http
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("send request to {}", self.endpoint))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("gemini API error ({}): {}", status, text);
        }

        let parsed: GenerateResponse = resp
            .json()
            .await
            .map_err(reqwest::Error::without_url)
            .context("decode gemini response")?;
        let html = extract_text(parsed)?;
        debug!(bytes = html.len(), "gemini content received");
        Ok(html)
    }
}
