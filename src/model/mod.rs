//! # Property Graph Model
//!
//! Typed values that come out of the decoder and go into query text.
//! This module is pure data with no I/O and no wire types.

pub mod node;
pub mod edge;
pub mod path;
pub mod value;
pub mod property_map;

pub use node::{Node, NodeId};
pub use edge::{Edge, EdgeId, Endpoint};
pub use path::Path;
pub use value::{Point, Value};
pub use property_map::PropertyMap;
