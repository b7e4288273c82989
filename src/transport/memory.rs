//! In-memory transport.
//!
//! Plays the server side for tests and offline use. It answers the three
//! schema introspection procedures from its own name lists, replays queued
//! replies for everything else, and records every call it receives.
//!
//! ## Limitations
//!
//! - **No query engine**: query text other than the introspection calls is
//!   not interpreted. Each call pops the next queued reply.
//! - **Single graph schema**: the name lists are shared by every graph id.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::command::{COMPACT_FLAG, Command};
use crate::cypher::procedure_call;
use crate::protocol::Reply;
use crate::schema::SchemaKind;
use crate::{Error, Result};
use super::Transport;

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub graph: String,
    pub command: Command,
    pub args: Vec<String>,
}

/// Scripted in-memory server.
#[derive(Clone, Default)]
pub struct MemoryTransport {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    labels: RwLock<Vec<String>>,
    relationship_types: RwLock<Vec<String>>,
    property_keys: RwLock<Vec<String>>,
    replies: Mutex<VecDeque<Result<Reply>>>,
    calls: Mutex<Vec<Call>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn names(&self, kind: SchemaKind) -> &RwLock<Vec<String>> {
        match kind {
            SchemaKind::Label => &self.inner.labels,
            SchemaKind::RelationshipType => &self.inner.relationship_types,
            SchemaKind::PropertyKey => &self.inner.property_keys,
        }
    }

    /// Set the server-side names of `kind`, in id order.
    pub fn set_schema(&self, kind: SchemaKind, names: impl IntoIterator<Item: Into<String>>) {
        *self.names(kind).write() = names.into_iter().map(Into::into).collect();
    }

    /// Append one name of `kind`, as creating a new label or key would.
    pub fn add_schema_name(&self, kind: SchemaKind, name: impl Into<String>) {
        self.names(kind).write().push(name.into());
    }

    /// Queue the reply for the next non-introspection call.
    pub fn push_reply(&self, reply: Reply) {
        self.inner.replies.lock().push_back(Ok(reply));
    }

    /// Queue a transport failure for the next non-introspection call.
    pub fn push_error(&self, message: impl Into<String>) {
        self.inner.replies.lock().push_back(Err(Error::Transport(message.into())));
    }

    /// Every call received so far, oldest first.
    pub fn calls(&self) -> Vec<Call> {
        self.inner.calls.lock().clone()
    }

    /// How many introspection calls for `kind` were received.
    pub fn introspection_calls(&self, kind: SchemaKind) -> usize {
        let query = procedure_call(kind.procedure(), &[], &[]);
        self.inner
            .calls
            .lock()
            .iter()
            .filter(|c| c.args.first() == Some(&query))
            .count()
    }

    fn introspection_kind(args: &[String]) -> Option<SchemaKind> {
        let query = args.first()?;
        SchemaKind::ALL
            .into_iter()
            .find(|kind| *query == procedure_call(kind.procedure(), &[], &[]))
    }

    /// Compact reply with one string column, one row per name.
    fn introspection_reply(&self, kind: SchemaKind) -> Reply {
        let column = match kind {
            SchemaKind::Label => "label",
            SchemaKind::RelationshipType => "relationshipType",
            SchemaKind::PropertyKey => "propertyKey",
        };
        let rows = self
            .names(kind)
            .read()
            .iter()
            .map(|name| Reply::Array(vec![Reply::Array(vec![Reply::Int(2), Reply::from(name.as_str())])]))
            .collect();
        Reply::Array(vec![
            Reply::Array(vec![Reply::Array(vec![Reply::Int(1), Reply::from(column)])]),
            Reply::Array(rows),
            Reply::Array(vec![
                Reply::from("Cached execution: 0"),
                Reply::from("Query internal execution time: 0.100000 milliseconds"),
            ]),
        ])
    }
}

impl Transport for MemoryTransport {
    fn execute(&self, graph_id: &str, command: Command, args: &[String]) -> Result<Reply> {
        self.inner.calls.lock().push(Call {
            graph: graph_id.to_string(),
            command,
            args: args.to_vec(),
        });

        match command {
            Command::Query | Command::RoQuery => {
                if !args.iter().any(|a| a == COMPACT_FLAG) {
                    return Err(Error::Transport("only compact replies are supported".into()));
                }
                if let Some(kind) = Self::introspection_kind(args) {
                    return Ok(self.introspection_reply(kind));
                }
            }
            Command::Delete => {
                for kind in SchemaKind::ALL {
                    self.names(kind).write().clear();
                }
            }
            Command::Profile | Command::Explain => {}
        }

        self.inner
            .replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Transport(format!("no reply queued for {command}"))))
    }
}
