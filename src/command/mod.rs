//! Graph commands and their per-call options.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Flag asking the server for the compact, id-based result encoding.
pub const COMPACT_FLAG: &str = "--compact";

/// Server command issued for a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    Query,
    RoQuery,
    Profile,
    Explain,
    Delete,
}

impl Command {
    pub fn as_str(self) -> &'static str {
        match self {
            Command::Query => "GRAPH.QUERY",
            Command::RoQuery => "GRAPH.RO_QUERY",
            Command::Profile => "GRAPH.PROFILE",
            Command::Explain => "GRAPH.EXPLAIN",
            Command::Delete => "GRAPH.DELETE",
        }
    }

    /// Whether a read-only graph handle may issue this command.
    pub fn is_read_only(self) -> bool {
        matches!(self, Command::RoQuery | Command::Explain)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extra arguments sent along with a query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOptions {
    /// Server-side timeout in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// `[query, "--compact", ("timeout", ms)?]`
    pub fn build_args(&self, query: String) -> Vec<String> {
        let mut args = vec![query, COMPACT_FLAG.to_string()];
        if let Some(ms) = self.timeout_ms {
            args.push("timeout".to_string());
            args.push(ms.to_string());
        }
        args
    }
}
