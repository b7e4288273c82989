//! # Schema Cache
//!
//! The server sends labels, relationship types and property keys as small
//! integer ids. A [`SchemaCache`] maps them back to names for one graph.
//!
//! Each of the three lists is refreshed independently and lazily: a lookup
//! that falls outside the cached list triggers exactly one introspection
//! round trip, which replaces the whole list. If the id is still unknown
//! afterwards the lookup fails; there is no retry loop.
//!
//! Each list sits behind its own mutex, held across the round trip, so
//! concurrent misses on the same list are serialized and never observe a
//! half-replaced list. Cache hits on that list wait too, so a slow
//! [`Transport`](crate::Transport) stalls every lookup of that kind until the
//! round trip returns.

use std::fmt;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::{Error, Result};

/// Which of the three id spaces an id belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    Label,
    RelationshipType,
    PropertyKey,
}

impl SchemaKind {
    pub const ALL: [SchemaKind; 3] = [
        SchemaKind::Label,
        SchemaKind::RelationshipType,
        SchemaKind::PropertyKey,
    ];

    /// Procedure that lists every name of this kind, in id order.
    pub fn procedure(self) -> &'static str {
        match self {
            SchemaKind::Label => "db.labels",
            SchemaKind::RelationshipType => "db.relationshipTypes",
            SchemaKind::PropertyKey => "db.propertyKeys",
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SchemaKind::Label => "label",
            SchemaKind::RelationshipType => "relationship type",
            SchemaKind::PropertyKey => "property",
        })
    }
}

/// Turns schema ids into names while decoding.
pub trait Resolver {
    fn resolve(&self, kind: SchemaKind, id: i64) -> Result<String>;
}

/// Id → name lists for one graph.
#[derive(Debug, Default)]
pub struct SchemaCache {
    labels: Mutex<Vec<String>>,
    relationship_types: Mutex<Vec<String>>,
    property_keys: Mutex<Vec<String>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache seeded with known names, e.g. for decoding offline.
    pub fn with_data<L, R, P>(labels: L, relationship_types: R, property_keys: P) -> Self
    where
        L: IntoIterator<Item: Into<String>>,
        R: IntoIterator<Item: Into<String>>,
        P: IntoIterator<Item: Into<String>>,
    {
        Self {
            labels: Mutex::new(labels.into_iter().map(Into::into).collect()),
            relationship_types: Mutex::new(relationship_types.into_iter().map(Into::into).collect()),
            property_keys: Mutex::new(property_keys.into_iter().map(Into::into).collect()),
        }
    }

    fn slot(&self, kind: SchemaKind) -> &Mutex<Vec<String>> {
        match kind {
            SchemaKind::Label => &self.labels,
            SchemaKind::RelationshipType => &self.relationship_types,
            SchemaKind::PropertyKey => &self.property_keys,
        }
    }

    /// Cached name for `id`, without refreshing.
    pub fn get(&self, kind: SchemaKind, id: usize) -> Option<String> {
        self.slot(kind).lock().get(id).cloned()
    }

    /// Number of cached names of `kind`.
    pub fn len(&self, kind: SchemaKind) -> usize {
        self.slot(kind).lock().len()
    }

    pub fn is_empty(&self) -> bool {
        SchemaKind::ALL.iter().all(|k| self.len(*k) == 0)
    }

    /// Snapshot of the cached names of `kind`.
    pub fn names(&self, kind: SchemaKind) -> Vec<String> {
        self.slot(kind).lock().clone()
    }

    /// Replace the cached list of `kind` wholesale.
    pub fn replace(&self, kind: SchemaKind, names: Vec<String>) {
        *self.slot(kind).lock() = names;
    }

    /// Forget everything. Called when the owning graph is deleted so that a
    /// re-created graph of the same name does not reuse stale ids.
    pub fn clear(&self) {
        for kind in SchemaKind::ALL {
            self.slot(kind).lock().clear();
        }
    }

    /// Resolve `id`, refreshing the list of `kind` at most once on a miss.
    ///
    /// `refresh` must return the server's full current list for `kind` and
    /// must not call back into this cache.
    pub fn resolve_with<F>(&self, kind: SchemaKind, id: i64, refresh: F) -> Result<String>
    where
        F: FnOnce(SchemaKind) -> Result<Vec<String>>,
    {
        let index = usize::try_from(id).map_err(|_| Error::UnknownSchemaId { kind, id })?;

        let mut names = self.slot(kind).lock();
        if let Some(name) = names.get(index) {
            return Ok(name.clone());
        }

        let cached = names.len();
        *names = refresh(kind)?;
        debug!(%kind, id, cached, refreshed = names.len(), "schema cache refreshed");

        names.get(index).cloned().ok_or_else(|| {
            warn!(%kind, id, known = names.len(), "schema id unknown after refresh");
            Error::UnknownSchemaId { kind, id }
        })
    }
}

/// A bare cache never refreshes: a miss is a resolution error.
impl Resolver for SchemaCache {
    fn resolve(&self, kind: SchemaKind, id: i64) -> Result<String> {
        usize::try_from(id)
            .ok()
            .and_then(|index| self.get(kind, index))
            .ok_or(Error::UnknownSchemaId { kind, id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_hit_does_not_refresh() {
        let cache = SchemaCache::with_data(["Person"], Vec::<String>::new(), Vec::<String>::new());
        let name = cache
            .resolve_with(SchemaKind::Label, 0, |_| panic!("refresh on cache hit"))
            .unwrap();
        assert_eq!(name, "Person");
    }

    #[test]
    fn test_miss_refreshes_exactly_once() {
        let cache = SchemaCache::new();
        let calls = Cell::new(0);
        let refresh = |kind: SchemaKind| {
            assert_eq!(kind, SchemaKind::Label);
            calls.set(calls.get() + 1);
            Ok(vec!["Person".to_string(), "Admin".to_string()])
        };

        assert_eq!(cache.resolve_with(SchemaKind::Label, 1, refresh).unwrap(), "Admin");
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.resolve_with(SchemaKind::Label, 0, refresh).unwrap(), "Person");
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.len(SchemaKind::RelationshipType), 0);
    }

    #[test]
    fn test_still_unknown_after_refresh_fails() {
        let cache = SchemaCache::new();
        let calls = Cell::new(0);
        let err = cache
            .resolve_with(SchemaKind::PropertyKey, 3, |_| {
                calls.set(calls.get() + 1);
                Ok(vec!["name".to_string()])
            })
            .unwrap_err();
        assert_eq!(calls.get(), 1);
        assert_eq!(err.to_string(), "unknown property index 3");
        // The refreshed list is kept.
        assert_eq!(cache.get(SchemaKind::PropertyKey, 0).as_deref(), Some("name"));
    }

    #[test]
    fn test_refresh_replaces_rather_than_appends() {
        let cache = SchemaCache::with_data(["Old"], Vec::<String>::new(), Vec::<String>::new());
        cache
            .resolve_with(SchemaKind::Label, 1, |_| Ok(vec!["A".into(), "B".into()]))
            .unwrap();
        assert_eq!(cache.names(SchemaKind::Label), vec!["A", "B"]);
    }

    #[test]
    fn test_refresh_error_propagates() {
        let cache = SchemaCache::new();
        let err = cache
            .resolve_with(SchemaKind::Label, 0, |_| Err(Error::Transport("connection reset".into())))
            .unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }

    #[test]
    fn test_negative_id_is_unknown() {
        let cache = SchemaCache::new();
        let err = cache
            .resolve_with(SchemaKind::Label, -1, |_| panic!("no refresh for negative ids"))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownSchemaId { id: -1, .. }));
    }

    #[test]
    fn test_clear() {
        let cache = SchemaCache::with_data(["L"], ["R"], ["P"]);
        assert!(!cache.is_empty());
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.resolve(SchemaKind::Label, 0).is_err());
    }

    #[test]
    fn test_concurrent_misses_serialize() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let cache = Arc::new(SchemaCache::new());
        let refreshes = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let refreshes = Arc::clone(&refreshes);
                std::thread::spawn(move || {
                    cache
                        .resolve_with(SchemaKind::Label, 0, |_| {
                            refreshes.fetch_add(1, Ordering::SeqCst);
                            Ok(vec!["Person".into()])
                        })
                        .unwrap()
                })
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), "Person");
        }
        // The first miss fills the list; everyone after it hits.
        assert_eq!(refreshes.load(Ordering::SeqCst), 1);
    }
}
