//! Interrupt sources for the shell.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Notify;

/// Something that resolves when the user asks to abandon the current wait.
#[async_trait]
pub trait Interrupt: Send + Sync {
    /// Wait for the next interrupt.
    async fn wait(&self) -> std::io::Result<()>;
}

/// Ctrl+C from the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct CtrlC;

#[async_trait]
impl Interrupt for CtrlC {
    async fn wait(&self) -> std::io::Result<()> {
        tokio::signal::ctrl_c().await
    }
}

/// Interrupt raised in-process through [`ManualInterrupt::trigger`].
#[derive(Debug, Clone, Default)]
pub struct ManualInterrupt {
    notify: Arc<Notify>,
}

impl ManualInterrupt {
    /// Create an untriggered interrupt.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wake the next waiter, or the next call to `wait` if nobody waits yet.
    pub fn trigger(&self) {
        self.notify.notify_one();
    }
}

#[async_trait]
impl Interrupt for ManualInterrupt {
    async fn wait(&self) -> std::io::Result<()> {
        self.notify.notified().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_before_wait_is_kept() {
        let interrupt = ManualInterrupt::new();
        interrupt.trigger();

        let waited = tokio::time::timeout(Duration::from_secs(1), interrupt.wait()).await;
        assert!(matches!(waited, Ok(Ok(()))));
    }

    #[tokio::test]
    async fn test_wait_pends_without_trigger() {
        let interrupt = ManualInterrupt::new();
        let waited = tokio::time::timeout(Duration::from_millis(50), interrupt.wait()).await;
        assert!(waited.is_err());
    }
}
