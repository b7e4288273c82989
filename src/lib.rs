//! # falkordb-compact: FalkorDB Compact Result Decoder
//!
//! Decodes the compact, id-based result encoding that FalkorDB returns for
//! `GRAPH.QUERY`, `GRAPH.RO_QUERY` and friends into typed nodes, edges,
//! paths and values.
//!
//! ## Design Principles
//!
//! 1. **Transport-agnostic**: `Transport` is the only contract with the server
//! 2. **Typed DTOs**: `Node`, `Edge`, `Path`, `Value` cross every boundary
//! 3. **Decoding is a pure function** of the reply tree and the schema cache
//! 4. **All or nothing**: a malformed reply never yields a partial result
//!
//! ## Quick Start
//!
//! ```rust
//! use falkordb_compact::{Graph, PropertyMap, reply};
//! use falkordb_compact::schema::SchemaKind;
//! use falkordb_compact::transport::MemoryTransport;
//!
//! # fn example() -> falkordb_compact::Result<()> {
//! let server = MemoryTransport::new();
//! server.set_schema(SchemaKind::Label, ["Person"]);
//! server.push_reply(reply![
//!     [[2, "n"]],
//!     [[[1, [0], []]]],
//!     ["Cached execution: 0"]
//! ]);
//!
//! let graph = Graph::new("social", server);
//! let mut result = graph.query("MATCH (n:Person) RETURN n", PropertyMap::new())?;
//! while result.advance() {
//!     let node: falkordb_compact::Node = result.current().unwrap().get_as("n")?;
//!     assert!(node.has_label("Person"));
//! }
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod protocol;
pub mod schema;
pub mod execution;
pub mod command;
pub mod cypher;
pub mod transport;
pub mod export;

use tracing::debug;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    Node, Edge, Path, Value, Point, PropertyMap,
    NodeId, EdgeId, Endpoint,
};

// ============================================================================
// Re-exports: Decoding
// ============================================================================

pub use execution::{QueryResult, Record, Statistics, Column, FromValue};
pub use protocol::{Reply, ColumnType, ScalarType};
pub use schema::{SchemaCache, SchemaKind, Resolver};

// ============================================================================
// Re-exports: Commands and transport
// ============================================================================

pub use command::{Command, QueryOptions};
pub use transport::Transport;

// ============================================================================
// Top-level Graph handle
// ============================================================================

/// A named graph on the server. Owns the schema cache used to decode its
/// results; the cache lives exactly as long as the handle.
pub struct Graph<T: Transport> {
    id: String,
    transport: T,
    schema: SchemaCache,
    read_only: bool,
}

impl<T: Transport> Graph<T> {
    pub fn new(id: impl Into<String>, transport: T) -> Self {
        Self {
            id: id.into(),
            transport,
            schema: SchemaCache::new(),
            read_only: false,
        }
    }

    /// A handle that refuses every command which could write.
    pub fn read_only(id: impl Into<String>, transport: T) -> Self {
        Self { read_only: true, ..Self::new(id, transport) }
    }

    /// A handle whose schema cache starts out seeded.
    pub fn with_schema(id: impl Into<String>, transport: T, schema: SchemaCache) -> Self {
        Self { schema, ..Self::new(id, transport) }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn schema(&self) -> &SchemaCache {
        &self.schema
    }

    /// Access the underlying transport (for advanced use).
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run a query with `GRAPH.QUERY`.
    pub fn query<P>(&self, query: &str, params: P) -> Result<QueryResult>
    where
        P: Into<PropertyMap>,
    {
        self.run(Command::Query, query, &params.into(), &QueryOptions::default())
    }

    pub fn query_with<P>(&self, query: &str, params: P, options: &QueryOptions) -> Result<QueryResult>
    where
        P: Into<PropertyMap>,
    {
        self.run(Command::Query, query, &params.into(), options)
    }

    /// Run a read-only query with `GRAPH.RO_QUERY`.
    pub fn ro_query<P>(&self, query: &str, params: P) -> Result<QueryResult>
    where
        P: Into<PropertyMap>,
    {
        self.run(Command::RoQuery, query, &params.into(), &QueryOptions::default())
    }

    pub fn ro_query_with<P>(&self, query: &str, params: P, options: &QueryOptions) -> Result<QueryResult>
    where
        P: Into<PropertyMap>,
    {
        self.run(Command::RoQuery, query, &params.into(), options)
    }

    /// Execute the query and return the plan annotated with runtime metrics.
    pub fn profile<P>(&self, query: &str, params: P, options: &QueryOptions) -> Result<Vec<String>>
    where
        P: Into<PropertyMap>,
    {
        let reply = self.send(Command::Profile, query, &params.into(), options)?;
        plan_lines(&reply)
    }

    /// The execution plan for `query`, without running it.
    pub fn explain(&self, query: &str) -> Result<Vec<String>> {
        self.check_mode(Command::Explain)?;
        let reply = self.transport.execute(&self.id, Command::Explain, &[query.to_string()])?;
        plan_lines(&reply)
    }

    /// `CALL procedure(args...) YIELD ...`
    pub fn call_procedure(&self, procedure: &str, yield_columns: &[&str], args: &[Value]) -> Result<QueryResult> {
        let query = cypher::procedure_call(procedure, args, yield_columns);
        let command = if self.read_only { Command::RoQuery } else { Command::Query };
        self.run(command, &query, &PropertyMap::new(), &QueryOptions::default())
    }

    /// Drop the graph on the server. The schema cache is cleared even when
    /// the command fails.
    pub fn delete(&self) -> Result<()> {
        self.check_mode(Command::Delete)?;
        let result = self.transport.execute(&self.id, Command::Delete, &[]);
        self.schema.clear();
        debug!(graph = %self.id, "graph deleted, schema cache cleared");
        result.map(|_| ())
    }

    fn check_mode(&self, command: Command) -> Result<()> {
        if self.read_only && !command.is_read_only() {
            return Err(Error::ReadOnly(command));
        }
        Ok(())
    }

    fn send(&self, command: Command, query: &str, params: &PropertyMap, options: &QueryOptions) -> Result<Reply> {
        self.check_mode(command)?;
        let query = if params.is_empty() {
            query.to_string()
        } else {
            cypher::params_header(params) + query
        };
        self.transport.execute(&self.id, command, &options.build_args(query))
    }

    fn run(&self, command: Command, query: &str, params: &PropertyMap, options: &QueryOptions) -> Result<QueryResult> {
        let reply = self.send(command, query, params, options)?;
        QueryResult::from_reply(&reply, self)
    }

    /// Fetch the full current name list of `kind` from the server.
    ///
    /// The introspection reply carries only string scalars, so it is decoded
    /// against a detached, empty cache and never re-enters `self.schema`.
    fn fetch_schema(&self, kind: SchemaKind) -> Result<Vec<String>> {
        debug!(graph = %self.id, %kind, "fetching schema names");
        let query = cypher::procedure_call(kind.procedure(), &[], &[]);
        let args = QueryOptions::default().build_args(query);
        let reply = self.transport.execute(&self.id, Command::RoQuery, &args)?;
        let result = QueryResult::from_reply(&reply, &SchemaCache::new())?;

        result
            .records()
            .iter()
            .map(|r| match r.get_by_index(0) {
                Some(Value::String(name)) => Ok(name.clone()),
                other => Err(Error::Shape(format!(
                    "{kind} name not string: {}",
                    other.map_or("missing", Value::type_name)
                ))),
            })
            .collect()
    }
}

impl<T: Transport> Resolver for Graph<T> {
    fn resolve(&self, kind: SchemaKind, id: i64) -> Result<String> {
        self.schema.resolve_with(kind, id, |kind| self.fetch_schema(kind))
    }
}

impl<T: Transport> std::fmt::Debug for Graph<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("id", &self.id)
            .field("read_only", &self.read_only)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

/// Plan replies are an array of text lines.
fn plan_lines(reply: &Reply) -> Result<Vec<String>> {
    let lines = reply
        .as_array()
        .ok_or_else(|| Error::Shape(format!("unexpected plan response type {}", reply.type_name())))?;
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            line.as_str()
                .map(|s| s.trim().to_string())
                .ok_or_else(|| Error::Shape(format!("plan entry {i} not string")))
        })
        .collect()
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The reply, or a piece of it, does not have the expected structure.
    #[error("{0}")]
    Shape(String),

    /// A scalar payload is not the wire type its tag promises.
    #[error("{tag} scalar not {expected} (got {got})")]
    Payload {
        tag: ScalarType,
        expected: &'static str,
        got: &'static str,
    },

    #[error("invalid {what} value {input:?}")]
    InvalidNumber { what: &'static str, input: String },

    /// A schema id that is still unknown after one refresh.
    #[error("unknown {kind} index {id}")]
    UnknownSchemaId { kind: SchemaKind, id: i64 },

    #[error("unknown scalar type {0}")]
    UnknownScalarType(i64),

    #[error("unknown column type {0}")]
    UnknownColumnType(i64),

    /// Reported by the transport; passed through as is.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("graph is read-only, refusing {0}")]
    ReadOnly(Command),

    #[error("Type error: expected {expected}, got {got}")]
    TypeError { expected: String, got: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this is a local decode failure (shape, type, resolution or
    /// unknown tag) rather than something reported from outside.
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            Error::Shape(_)
                | Error::Payload { .. }
                | Error::InvalidNumber { .. }
                | Error::UnknownSchemaId { .. }
                | Error::UnknownScalarType(_)
                | Error::UnknownColumnType(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
