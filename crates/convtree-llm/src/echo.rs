//! Offline provider that repeats the prompt.

use crate::{Provider, ProviderError};
use async_trait::async_trait;

/// Answers every prompt with `LLM Echo: {prompt}`.
#[derive(Debug, Clone, Default)]
pub struct EchoProvider;

impl EchoProvider {
    /// Create a new echo provider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Provider for EchoProvider {
    fn name(&self) -> &str {
        "echo"
    }

    async fn ask(&self, prompt: &str) -> Result<String, ProviderError> {
        Ok(format!("LLM Echo: {prompt}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo() {
        let provider = EchoProvider::new();
        assert_eq!(provider.ask("hello").await.unwrap(), "LLM Echo: hello");
        assert_eq!(provider.ask("").await.unwrap(), "LLM Echo: ");
    }
}
