//! # Transport Trait
//!
//! The boundary between this crate and whatever actually talks to the
//! server. A transport sends one command for one graph and hands back the
//! untyped reply tree; connection handling, topology, retries and
//! authentication all live on the other side of this trait.
//!
//! ## Implementations
//!
//! | Transport | Module | Description |
//! |-----------|--------|-------------|
//! | `MemoryTransport` | `memory` | Scripted in-memory server for tests/offline use |

pub mod memory;

use std::sync::Arc;

use crate::command::Command;
use crate::protocol::Reply;
use crate::Result;

pub use memory::{Call, MemoryTransport};

/// Executes graph commands.
///
/// Failures (network, server-side query errors) are reported as
/// [`Error::Transport`](crate::Error::Transport) and passed through
/// untouched by the decoder.
pub trait Transport: Send + Sync {
    /// Send `command <graph_id> <args...>` and return the raw reply.
    fn execute(&self, graph_id: &str, command: Command, args: &[String]) -> Result<Reply>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, graph_id: &str, command: Command, args: &[String]) -> Result<Reply> {
        (**self).execute(graph_id, command, args)
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, graph_id: &str, command: Command, args: &[String]) -> Result<Reply> {
        (**self).execute(graph_id, command, args)
    }
}
