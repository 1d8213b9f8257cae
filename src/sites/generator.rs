use std::{sync::Arc, time::Duration};

use anyhow::Context;
use async_trait::async_trait;

use super::{
    gemini::GeminiGenerator,
    llm::{ChatCompletionsGenerator, Provider},
    minimal::MinimalGenerator,
    template::TemplateGenerator,
};
use crate::config::{GeneratorConfig, GeneratorKind};

/// One way of turning a prompt into a complete HTML document.
#[async_trait]
pub trait SiteGenerator: Send + Sync {
    fn name(&self) -> &'static str;
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}

const HTTP_TIMEOUT: Duration = Duration::from_secs(120);

pub fn build_generator(cfg: &GeneratorConfig) -> anyhow::Result<Arc<dyn SiteGenerator>> {
    let generator: Arc<dyn SiteGenerator> = match cfg.kind {
        GeneratorKind::Template => Arc::new(TemplateGenerator),
        GeneratorKind::Minimal => Arc::new(MinimalGenerator),
        GeneratorKind::Groq | GeneratorKind::OpenAi | GeneratorKind::Gemini => {
            let api_key = cfg
                .api_key
                .clone()
                .with_context(|| format!("LLM_API_KEY is required for {:?}", cfg.kind))?;
            let http = reqwest::Client::builder()
                .timeout(HTTP_TIMEOUT)
                .build()
                .context("build http client")?;
            match cfg.kind {
                GeneratorKind::Gemini => Arc::new(GeminiGenerator::new(
                    http,
                    api_key,
                    cfg.model.clone(),
                    cfg.base_url.clone(),
                )),
                GeneratorKind::Groq => Arc::new(ChatCompletionsGenerator::new(
                    Provider::Groq,
                    http,
                    api_key,
                    cfg.model.clone(),
                    cfg.base_url.clone(),
                )),
                _ => Arc::new(ChatCompletionsGenerator::new(
                    Provider::OpenAi,
                    http,
                    api_key,
                    cfg.model.clone(),
                    cfg.base_url.clone(),
                )),
            }
        }
    };
    tracing::info!(generator = generator.name(), "site generator ready");
    Ok(generator)
}
