//! The command dispatcher and input loop.
//!
//! One line is fully handled, including any wait on the provider, before the
//! next one is read. The tree is the only state carried between lines.

use crate::commands::{self, Command};
use crate::signals::{CtrlC, Interrupt};
use anyhow::Result;
use convtree_core::{load_tree, save_tree, ShellConfig, Tree, TreeError};
use convtree_llm::Provider;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::{debug, error, info, warn};

/// What the loop should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line.
    Continue,
    /// End the session.
    Exit,
}

/// Interactive shell over a conversation tree.
pub struct Repl<P> {
    tree: Tree,
    provider: P,
    config: ShellConfig,
    interrupt: Box<dyn Interrupt>,
}

impl<P: Provider> Repl<P> {
    /// Create a shell with an empty tree.
    pub fn new(provider: P, config: ShellConfig) -> Self {
        Self {
            tree: Tree::new(),
            provider,
            config,
            interrupt: Box::new(CtrlC),
        }
    }

    /// Replace the Ctrl+C listener with another interrupt source.
    pub fn with_interrupt(mut self, interrupt: impl Interrupt + 'static) -> Self {
        self.interrupt = Box::new(interrupt);
        self
    }

    /// Start from an existing tree instead of an empty one.
    pub fn with_tree(mut self, tree: Tree) -> Self {
        self.tree = tree;
        self
    }

    /// The conversation so far.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Active configuration.
    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Read and handle lines until `exit` or end of input.
    ///
    /// An interrupt while waiting for input, for a branch number or for the
    /// provider is reported and the loop keeps going.
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();

        loop {
            write!(out, "{}", self.config.prompt)?;
            out.flush()?;

            let line = tokio::select! {
                line = lines.next_line() => line?,
                signal = self.interrupt.wait() => {
                    signal?;
                    self.report_interrupt(out)?;
                    continue;
                }
            };

            let Some(line) = line else {
                debug!("End of input");
                writeln!(out)?;
                break;
            };

            if self.handle_line(&line, &mut lines, out).await? == Flow::Exit {
                break;
            }
        }

        Ok(())
    }

    /// Handle one input line. `lines` supplies follow-up answers such as the
    /// branch number for `down`.
    pub async fn handle_line<R, W>(&mut self, line: &str, lines: &mut Lines<R>, out: &mut W) -> Result<Flow>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        match commands::parse(line, self.config.command_prefix) {
            Some(command) => self.run_command(command, lines, out).await,
            None => {
                self.prompt(line, out).await?;
                Ok(Flow::Continue)
            }
        }
    }

    async fn run_command<R, W>(&mut self, command: Command, lines: &mut Lines<R>, out: &mut W) -> Result<Flow>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        debug!(?command, "Running command");

        match command {
            Command::Exit => {
                writeln!(out, "Exiting REPL...")?;
                return Ok(Flow::Exit);
            }
            Command::Help => {
                writeln!(out, "Available commands:")?;
                for line in commands::help_lines(self.config.command_prefix) {
                    writeln!(out, "{line}")?;
                }
            }
            Command::Context => {
                for line in self.tree.render_full(None) {
                    writeln!(out, "{line}")?;
                }
            }
            Command::Tree => {
                for line in self.tree.render_tree(None) {
                    writeln!(out, "{line}")?;
                }
            }
            Command::Line => match self.tree.render_path() {
                Ok(view) => {
                    for line in view {
                        writeln!(out, "{line}")?;
                    }
                }
                Err(e) => report_tree_error(out, &e)?,
            },
            Command::Remove => match self.tree.delete_current() {
                Ok(node) => {
                    if node.is_root() {
                        writeln!(out, "Branch removed. Now at the start of the conversation.")?;
                    } else {
                        writeln!(out, "Branch removed. Now at: {}", node.user_input)?;
                    }
                }
                Err(e) => report_tree_error(out, &e)?,
            },
            Command::Save(path) => {
                let path = path.unwrap_or_else(|| self.config.default_save_file.clone());
                match save_tree(&self.tree, &path) {
                    Ok(()) => writeln!(out, "Conversation saved to {}", path.display())?,
                    Err(e) => {
                        warn!(error = %e, "Save failed");
                        writeln!(out, "Error: {e}")?;
                    }
                }
            }
            Command::Load(path) => self.load(path, out)?,
            Command::Up => {
                if let Err(e) = self.tree.ascend() {
                    report_tree_error(out, &e)?;
                }
            }
            Command::Down => self.down(lines, out).await?,
            Command::Unknown(input) => {
                writeln!(out, "Unknown command: {input}")?;
            }
        }

        Ok(Flow::Continue)
    }

    /// Send a prompt to the provider, unchanged, and record the exchange.
    async fn prompt<W: Write>(&mut self, input: &str, out: &mut W) -> Result<()> {
        if input.trim().is_empty() {
            return Ok(());
        }

        let answer = tokio::select! {
            answer = self.provider.ask(input) => answer,
            signal = self.interrupt.wait() => {
                signal?;
                warn!(provider = self.provider.name(), "Provider call interrupted");
                self.report_interrupt(out)?;
                return Ok(());
            }
        };

        let response = match answer {
            Ok(response) => response,
            Err(e) => {
                warn!(provider = self.provider.name(), error = %e, "Provider call failed");
                writeln!(out, "Error: {e}")?;

                if !self.config.record_provider_errors {
                    return Ok(());
                }
                format!("An error occurred: {e}")
            }
        };

        writeln!(out, "{response}")?;
        self.tree.append(input, response);

        Ok(())
    }

    async fn down<R, W>(&mut self, lines: &mut Lines<R>, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        if self.tree.current().is_leaf() {
            writeln!(out, "{}", TreeError::NoChildren)?;
            return Ok(());
        }

        writeln!(out, "Select a branch to follow:")?;
        for preview in self.tree.child_previews() {
            writeln!(out, "{preview}")?;
        }
        write!(out, "Enter the number of the branch to follow: ")?;
        out.flush()?;

        let answer = tokio::select! {
            answer = lines.next_line() => answer?,
            signal = self.interrupt.wait() => {
                signal?;
                self.report_interrupt(out)?;
                return Ok(());
            }
        };

        let Some(answer) = answer else {
            writeln!(out)?;
            return Ok(());
        };

        let Ok(choice) = answer.trim().parse::<usize>() else {
            writeln!(out, "Please enter a valid number.")?;
            return Ok(());
        };

        match choice.checked_sub(1).map(|index| self.tree.descend(index)) {
            Some(Ok(_)) => {}
            Some(Err(TreeError::IndexOutOfRange { .. })) | None => {
                writeln!(out, "Invalid choice.")?;
            }
            Some(Err(e)) => report_tree_error(out, &e)?,
        }

        Ok(())
    }

    fn report_interrupt<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(
            out,
            "\nInterrupted. Use {}exit to exit the REPL.",
            self.config.command_prefix
        )?;
        Ok(())
    }

    fn load<W: Write>(&mut self, path: Option<PathBuf>, out: &mut W) -> Result<()> {
        let path = path.unwrap_or_else(|| self.config.default_save_file.clone());

        match load_tree(&path) {
            Ok(tree) => {
                info!(path = %path.display(), nodes = tree.len(), "Replaced conversation");
                self.tree = tree;
                writeln!(out, "Conversation loaded from {}", path.display())?;
            }
            Err(e) => {
                warn!(error = %e, "Load failed");
                writeln!(out, "Error: {e}")?;
            }
        }

        Ok(())
    }
}

fn report_tree_error<W: Write>(out: &mut W, err: &TreeError) -> Result<()> {
    if let TreeError::InternalConsistency(detail) = err {
        error!(detail = %detail, "Conversation tree is inconsistent");
    }
    writeln!(out, "{err}")?;
    Ok(())
}
