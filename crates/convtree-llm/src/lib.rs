//! Convtree LLM
//!
//! The provider seam between the shell and a language model. The shell only
//! ever sends one prompt and waits for one answer.

mod echo;
mod error;
pub mod openai;

pub use echo::EchoProvider;
pub use error::ProviderError;
pub use openai::OpenAiProvider;

use async_trait::async_trait;
use convtree_core::{ProviderConfig, ProviderKind};

/// A backend that answers a single prompt.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Human-readable provider name (e.g., "echo", "openai").
    fn name(&self) -> &str;

    /// Send `prompt` and wait for the full answer.
    async fn ask(&self, prompt: &str) -> Result<String, ProviderError>;
}

#[async_trait]
impl<P: Provider + ?Sized> Provider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn ask(&self, prompt: &str) -> Result<String, ProviderError> {
        (**self).ask(prompt).await
    }
}

/// Build the provider described by `config`.
pub fn build_provider(config: &ProviderConfig) -> Result<Box<dyn Provider>, ProviderError> {
    match config.kind {
        ProviderKind::Echo => Ok(Box::new(EchoProvider::new())),
        ProviderKind::OpenAi => Ok(Box::new(OpenAiProvider::from_config(config)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_echo_provider() {
        let provider = build_provider(&ProviderConfig::default()).unwrap();
        assert_eq!(provider.name(), "echo");
    }

    #[test]
    fn test_build_openai_without_key() {
        let config = ProviderConfig {
            kind: ProviderKind::OpenAi,
            api_key_env: "CONVTREE_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..ProviderConfig::default()
        };

        let err = build_provider(&config).err().unwrap();
        assert!(matches!(err, ProviderError::MissingApiKey(_)));
    }

    #[tokio::test]
    async fn test_boxed_provider_delegates() {
        let provider: Box<dyn Provider> = Box::new(EchoProvider::new());
        assert_eq!(provider.ask("hi").await.unwrap(), "LLM Echo: hi");
    }
}
