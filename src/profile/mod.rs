//! Profile Generator
//!
//! Turns a plant name into raw model output. The text comes back exactly as
//! the provider produced it; parsing belongs to [`crate::ingest`].

pub mod client;
pub mod prompt;

pub use client::{ChatCompletionsClient, ChatMessage};
pub use prompt::{build_prompt, PROFILE_SECTIONS};

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

/// Prompt text in, free-form completion text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[derive(Clone)]
pub struct ProfileGenerator {
    generator: Arc<dyn TextGenerator>,
}

impl ProfileGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Ask the model for a full profile of `plant_name`. Provider errors are
    /// returned as-is; there is no retry.
    pub async fn generate(&self, plant_name: &str) -> Result<String> {
        tracing::info!(plant = %plant_name, "generating plant profile");
        let prompt = build_prompt(plant_name);
        self.generator.complete(&prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct EchoGenerator {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TextGenerator for EchoGenerator {
        async fn complete(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok("  \"Family\": \"Malvaceae\"\n".to_string())
        }
    }

    #[tokio::test]
    async fn test_generate_sends_built_prompt_and_returns_raw_text() {
        let echo = Arc::new(EchoGenerator {
            prompts: Mutex::new(Vec::new()),
        });
        let generator = ProfileGenerator::new(echo.clone());

        let text = generator.generate("hibiscus").await.unwrap();

        assert_eq!(text, "  \"Family\": \"Malvaceae\"\n");
        let prompts = echo.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0], build_prompt("hibiscus"));
    }
}
