//! Configuration for the convtree shell.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Shell configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Input prompt shown before each line
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Character that marks a line as a command
    #[serde(default = "default_command_prefix")]
    pub command_prefix: char,

    /// File written by `save` when no name is given
    #[serde(default = "default_save_file")]
    pub default_save_file: PathBuf,

    /// Store provider failures in the tree as the response text
    #[serde(default = "default_record_provider_errors")]
    pub record_provider_errors: bool,

    /// Language model settings
    #[serde(default)]
    pub provider: ProviderConfig,
}

/// Which backend answers prompts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Offline stub that repeats the prompt
    #[default]
    Echo,
    /// OpenAI-compatible chat completions endpoint
    OpenAi,
}

/// Language model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Backend kind
    #[serde(default)]
    pub kind: ProviderKind,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// System message sent with every prompt
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Base URL of the chat completions API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_prompt() -> String {
    "REPL> ".to_string()
}

fn default_command_prefix() -> char {
    ':'
}

fn default_save_file() -> PathBuf {
    PathBuf::from("conversation.json")
}

fn default_record_provider_errors() -> bool {
    true
}

fn default_model() -> String {
    "gpt-4".to_string()
}

fn default_system_prompt() -> String {
    "You are a helpful assistant.".to_string()
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

/// Directory holding the user's config file.
pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".convtree")
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            command_prefix: default_command_prefix(),
            default_save_file: default_save_file(),
            record_provider_errors: default_record_provider_errors(),
            provider: ProviderConfig::default(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            model: default_model(),
            system_prompt: default_system_prompt(),
            api_base: default_api_base(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ShellConfig {
    /// Load configuration from `~/.convtree/config.yaml`, falling back to defaults
    pub fn load() -> Self {
        let config_path = default_config_dir().join("config.yaml");

        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_yaml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config file: {}", e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config file: {}", e);
                }
            }
        }

        Self::default()
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = ShellConfig::default();
        assert_eq!(config.prompt, "REPL> ");
        assert_eq!(config.command_prefix, ':');
        assert_eq!(config.default_save_file, PathBuf::from("conversation.json"));
        assert!(config.record_provider_errors);
        assert_eq!(config.provider.kind, ProviderKind::Echo);
        assert_eq!(config.provider.model, "gpt-4");
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "record_provider_errors: false\nprovider:\n  kind: openai\n  model: gpt-4o\n";
        let config: ShellConfig = serde_yaml::from_str(yaml).unwrap();

        assert!(!config.record_provider_errors);
        assert_eq!(config.provider.kind, ProviderKind::OpenAi);
        assert_eq!(config.provider.model, "gpt-4o");
        assert_eq!(config.provider.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.prompt, "REPL> ");
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, "prompt: \">> \"\ncommand_prefix: \"/\"\n").unwrap();

        let config = ShellConfig::load_from(&path).unwrap();
        assert_eq!(config.prompt, ">> ");
        assert_eq!(config.command_prefix, '/');
    }

    #[test]
    fn test_load_from_invalid_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, "record_provider_errors: [nope").unwrap();

        let err = ShellConfig::load_from(&path).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }
}
