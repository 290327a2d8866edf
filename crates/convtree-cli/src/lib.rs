//! Convtree shell
//!
//! Line-oriented REPL over a branching conversation tree. Lines starting with
//! the command prefix drive the tree; every other line is sent to the
//! provider and recorded as a new exchange.

pub mod commands;
pub mod repl;
pub mod signals;

pub use commands::{parse, Command};
pub use repl::{Flow, Repl};
pub use signals::{CtrlC, Interrupt, ManualInterrupt};
