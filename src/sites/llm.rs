use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{
    generator::SiteGenerator,
    html::{strip_code_fences, user_message, SYSTEM_PROMPT},
};

/// Hosts speaking the OpenAI chat-completions wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Groq,
    OpenAi,
}

impl Provider {
    fn name(self) -> &'static str {
        match self {
            Provider::Groq => "groq",
            Provider::OpenAi => "openai",
        }
    }

    fn default_base_url(self) -> &'static str {
        match self {
            Provider::Groq => "https://api.groq.com/openai/v1",
            Provider::OpenAi => "https://api.openai.com/v1",
        }
    }

    fn default_model(self) -> &'static str {
        match self {
            Provider::Groq => "mixtral-8x7b-32768",
            Provider::OpenAi => "gpt-4o-mini",
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct ChatCompletionsGenerator {
    provider: Provider,
    http: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl ChatCompletionsGenerator {
    pub fn new(
        provider: Provider,
        http: reqwest::Client,
        api_key: String,
        model: Option<String>,
        base_url: Option<String>,
    ) -> Self {
        let base = base_url.unwrap_or_else(|| provider.default_base_url().to_string());
        Self {
            provider,
            http,
            api_key,
            model: model.unwrap_or_else(|| provider.default_model().to_string()),
            endpoint: chat_endpoint(&base),
        }
    }
}

fn chat_endpoint(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if base.ends_with("/chat/completions") {
        base.to_string()
    } else {
        format!("{base}/chat/completions")
    }
}

fn extract_content(resp: ChatResponse) -> anyhow::Result<String> {
    let content = resp
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.trim().is_empty())
        .context("completion has no content")?;
    Ok(strip_code_fences(&content).to_string())
}

#[async_trait]
impl SiteGenerator for ChatCompletionsGenerator {
    fn name(&self) -> &'static str {
        self.provider.name()
    }

    #[instrument(skip(self, prompt))]
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        let user = user_message(prompt);
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user,
                },
            ],
            temperature: 0.8,
            max_tokens: 8000,
        };

        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("send request to {}", self.endpoint))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("{} API error ({}): {}", self.provider.name(), status, text);
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .with_context(|| format!("decode {} response", self.provider.name()))?;
        let html = extract_content(parsed)?;
        debug!(provider = self.provider.name(), model = %self.model, bytes = html.len(), "completion received");
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_is_derived_from_base_url() {
        assert_eq!(
            chat_endpoint("https://api.groq.com/openai/v1/"),
            "https://api.groq.com/openai/v1/chat/completions"
        );
        assert_eq!(
            chat_endpoint("http://localhost:8000/v1/chat/completions"),
            "http://localhost:8000/v1/chat/completions"
        );
    }

    #[test]
    fn defaults_follow_provider() {
        let g = ChatCompletionsGenerator::new(
            Provider::Groq,
            reqwest::Client::new(),
            "k".into(),
            None,
            None,
        );
        assert_eq!(g.model, "mixtral-8x7b-32768");
        assert_eq!(g.endpoint, "https://api.groq.com/openai/v1/chat/completions");

        let g = ChatCompletionsGenerator::new(
            Provider::OpenAi,
            reqwest::Client::new(),
            "k".into(),
            Some("gpt-4o".into()),
            None,
        );
        assert_eq!(g.model, "gpt-4o");
        assert_eq!(g.endpoint, "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn request_serializes_in_openai_shape() {
        let body = ChatRequest {
            model: "m",
            messages: [
                ChatMessage { role: "system", content: "s" },
                ChatMessage { role: "user", content: "u" },
            ],
            temperature: 0.8,
            max_tokens: 8000,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "u");
        assert_eq!(json["max_tokens"], 8000);
    }

    #[test]
    fn content_is_unfenced() {
        let resp: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"```html\n<html></html>\n```"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_content(resp).unwrap(), "<html></html>");
    }

    #[test]
    fn empty_choices_is_an_error() {
        let resp: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(extract_content(resp).is_err());
    }
}
