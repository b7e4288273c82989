//! Result assembly.
//!
//! Turns the top-level reply of a graph query into a [`QueryResult`]:
//!
//! ```text
//! [statistics]                       write-only query, no rows
//! [header, records, statistics]      everything else
//! ```
//!
//! Decoding is all or nothing. Any malformed piece aborts the whole result.

pub mod record;
pub mod stats;

use std::sync::Arc;

use tracing::trace;

use crate::model::Value;
use crate::protocol::{self, ColumnType, Reply, expect_array, expect_int, expect_str};
use crate::schema::Resolver;
use crate::{Error, Result};

pub use record::{FromValue, Record};
pub use stats::Statistics;

/// One column of the result header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    BeforeFirst,
    At(usize),
    Exhausted,
}

/// Decoded query result with a forward-only cursor.
#[derive(Debug, Clone)]
pub struct QueryResult {
    columns: Vec<Column>,
    records: Vec<Record>,
    statistics: Statistics,
    cursor: Cursor,
}

impl QueryResult {
    /// Decode a raw reply, resolving schema ids through `schema`.
    pub fn from_reply(reply: &Reply, schema: &dyn Resolver) -> Result<Self> {
        let sections = reply
            .as_array()
            .ok_or_else(|| Error::Shape(format!("unexpected response type {}", reply.type_name())))?;

        let result = match sections {
            [] => return Err(Error::Shape("empty response payload".into())),
            [statistics] => Self {
                columns: Vec::new(),
                records: Vec::new(),
                statistics: Statistics::parse(statistics)?,
                cursor: Cursor::BeforeFirst,
            },
            [header, records, statistics, ..] => {
                let columns = parse_header(header)?;
                let records = parse_records(records, &columns, schema)?;
                Self {
                    columns,
                    records,
                    statistics: Statistics::parse(statistics)?,
                    cursor: Cursor::BeforeFirst,
                }
            }
            _ => {
                return Err(Error::Shape(format!("unexpected response length {}", sections.len())));
            }
        };

        trace!(
            columns = result.columns.len(),
            records = result.records.len(),
            "decoded query result"
        );
        Ok(result)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// All records, in server order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Move to the next record. Returns `false` once every record was read.
    pub fn advance(&mut self) -> bool {
        let next = match self.cursor {
            Cursor::BeforeFirst => 0,
            Cursor::At(i) => i + 1,
            Cursor::Exhausted => return false,
        };
        if next < self.records.len() {
            self.cursor = Cursor::At(next);
            true
        } else {
            self.cursor = Cursor::Exhausted;
            false
        }
    }

    /// The record under the cursor; `None` before the first `advance` and
    /// after the last.
    pub fn current(&self) -> Option<&Record> {
        match self.cursor {
            Cursor::At(i) => self.records.get(i),
            Cursor::BeforeFirst | Cursor::Exhausted => None,
        }
    }

    /// Cursor position, `None` when not on a record.
    pub fn current_index(&self) -> Option<usize> {
        match self.cursor {
            Cursor::At(i) => Some(i),
            Cursor::BeforeFirst | Cursor::Exhausted => None,
        }
    }

    pub fn labels_added(&self) -> u64 { self.statistics.labels_added() }
    pub fn nodes_created(&self) -> u64 { self.statistics.nodes_created() }
    pub fn nodes_deleted(&self) -> u64 { self.statistics.nodes_deleted() }
    pub fn properties_set(&self) -> u64 { self.statistics.properties_set() }
    pub fn relationships_created(&self) -> u64 { self.statistics.relationships_created() }
    pub fn relationships_deleted(&self) -> u64 { self.statistics.relationships_deleted() }
    pub fn indices_created(&self) -> u64 { self.statistics.indices_created() }
    pub fn indices_deleted(&self) -> u64 { self.statistics.indices_deleted() }
    pub fn cached_execution(&self) -> bool { self.statistics.cached_execution() }

    /// Server-side execution time in milliseconds.
    pub fn internal_execution_time(&self) -> f64 {
        self.statistics.internal_execution_time()
    }
}

impl<'a> IntoIterator for &'a QueryResult {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// `[[kind, name], ...]`
fn parse_header(raw: &Reply) -> Result<Vec<Column>> {
    expect_array(raw, "header payload")?
        .iter()
        .map(|col| {
            let [kind, name, ..] = col.as_array().unwrap_or_default() else {
                return Err(Error::Shape("invalid header column format".into()));
            };
            Ok(Column {
                kind: ColumnType::try_from(expect_int(kind, "header column type")?)?,
                name: expect_str(name, "header column name")?.to_owned(),
            })
        })
        .collect()
}

fn parse_records(raw: &Reply, columns: &[Column], schema: &dyn Resolver) -> Result<Vec<Record>> {
    let rows = expect_array(raw, "records payload")?;
    let keys: Arc<[String]> = columns.iter().map(|c| c.name.clone()).collect();

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let cells = row
                .as_array()
                .ok_or_else(|| Error::Shape(format!("record {i} is not array")))?;
            if cells.len() != columns.len() {
                return Err(Error::Shape(format!(
                    "record {i} column count mismatch: got {} want {}",
                    cells.len(),
                    columns.len()
                )));
            }

            let values = cells
                .iter()
                .zip(columns)
                .enumerate()
                .map(|(idx, (cell, column))| decode_column(cell, column.kind, schema, i, idx))
                .collect::<Result<Vec<_>>>()?;
            Ok(Record::new(values, Arc::clone(&keys)))
        })
        .collect()
}

/// Node and relation columns skip the tag dispatch: their shape is known
/// from the header.
fn decode_column(
    cell: &Reply,
    kind: ColumnType,
    schema: &dyn Resolver,
    record: usize,
    column: usize,
) -> Result<Value> {
    match kind {
        ColumnType::Scalar => {
            let cell = cell.as_array().ok_or_else(|| {
                Error::Shape(format!("record {record} column {column} not scalar payload"))
            })?;
            protocol::decode_tagged(cell, schema)
        }
        ColumnType::Node => protocol::decode_node(cell, schema).map(Value::from),
        ColumnType::Relation => protocol::decode_edge(cell, schema).map(Value::from),
    }
}
