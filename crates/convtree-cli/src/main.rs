//! Convtree CLI
//!
//! Interactive shell that records a conversation with a language model as a
//! navigable tree of branches.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use convtree_cli::Repl;
use convtree_core::{load_tree, ProviderKind, ShellConfig};
use convtree_llm::{build_provider, Provider};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "convtree")]
#[command(about = "Convtree - branching conversations with a language model")]
#[command(version)]
struct Cli {
    /// Name to greet
    #[arg(long, default_value = "World")]
    name: String,

    /// Backend that answers prompts
    #[arg(long, value_enum)]
    provider: Option<ProviderArg>,

    /// Model identifier sent to the provider
    #[arg(long)]
    model: Option<String>,

    /// Config file (default: ~/.convtree/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Resume from a saved conversation
    #[arg(long)]
    load: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ProviderArg {
    Echo,
    Openai,
}

impl From<ProviderArg> for ProviderKind {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Echo => ProviderKind::Echo,
            ProviderArg::Openai => ProviderKind::OpenAi,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never mix with the conversation
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ShellConfig::load_from(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => ShellConfig::load(),
    };
    if let Some(provider) = cli.provider {
        config.provider.kind = provider.into();
    }
    if let Some(model) = cli.model {
        config.provider.model = model;
    }

    let provider = build_provider(&config.provider).context("Failed to set up provider")?;
    tracing::info!(provider = provider.name(), model = %config.provider.model, "Provider ready");

    println!("Hello, {}!", cli.name);
    println!(
        "Type {}help for commands, {}exit to leave.",
        config.command_prefix, config.command_prefix
    );

    let mut repl = Repl::new(provider, config);
    if let Some(path) = &cli.load {
        let tree = load_tree(path)
            .with_context(|| format!("Failed to load conversation {}", path.display()))?;
        println!("Resumed {} exchanges from {}", tree.len() - 1, path.display());
        repl = repl.with_tree(tree);
    }

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    repl.run(stdin, &mut stdout).await?;

    Ok(())
}
