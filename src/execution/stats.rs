//! Query statistics: `"<name>: <value> <unit>"` lines.

use std::collections::HashMap;

use crate::protocol::{Reply, expect_array, expect_str};
use crate::{Error, Result};

pub const LABELS_ADDED: &str = "Labels added";
pub const NODES_CREATED: &str = "Nodes created";
pub const NODES_DELETED: &str = "Nodes deleted";
pub const RELATIONSHIPS_DELETED: &str = "Relationships deleted";
pub const PROPERTIES_SET: &str = "Properties set";
pub const RELATIONSHIPS_CREATED: &str = "Relationships created";
pub const INDICES_CREATED: &str = "Indices created";
pub const INDICES_DELETED: &str = "Indices deleted";
pub const INTERNAL_EXECUTION_TIME: &str = "Query internal execution time";
pub const CACHED_EXECUTION: &str = "Cached execution";

/// Execution statistics by name. Missing entries read as zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statistics {
    values: HashMap<String, f64>,
}

impl Statistics {
    pub(crate) fn parse(raw: &Reply) -> Result<Self> {
        let lines = expect_array(raw, "statistics payload")?;
        let mut values = HashMap::with_capacity(lines.len());

        for line in lines {
            let line = expect_str(line, "statistic entry")?;
            let (name, rest) = line
                .split_once(": ")
                .ok_or_else(|| Error::Shape(format!("invalid statistic format: {line}")))?;
            let token = rest
                .split(' ')
                .next()
                .filter(|t| !t.is_empty())
                .ok_or_else(|| Error::Shape(format!("missing statistic value in: {line}")))?;
            let value = token.parse::<f64>().map_err(|_| Error::InvalidNumber {
                what: "statistic",
                input: token.to_owned(),
            })?;
            values.insert(name.to_owned(), value);
        }

        Ok(Self { values })
    }

    pub fn get(&self, name: &str) -> f64 {
        self.values.get(name).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn count(&self, name: &str) -> u64 {
        self.get(name) as u64
    }

    pub fn labels_added(&self) -> u64 { self.count(LABELS_ADDED) }
    pub fn nodes_created(&self) -> u64 { self.count(NODES_CREATED) }
    pub fn nodes_deleted(&self) -> u64 { self.count(NODES_DELETED) }
    pub fn properties_set(&self) -> u64 { self.count(PROPERTIES_SET) }
    pub fn relationships_created(&self) -> u64 { self.count(RELATIONSHIPS_CREATED) }
    pub fn relationships_deleted(&self) -> u64 { self.count(RELATIONSHIPS_DELETED) }
    pub fn indices_created(&self) -> u64 { self.count(INDICES_CREATED) }
    pub fn indices_deleted(&self) -> u64 { self.count(INDICES_DELETED) }

    pub fn cached_execution(&self) -> bool {
        self.get(CACHED_EXECUTION) != 0.0
    }

    /// Server-side execution time in milliseconds.
    pub fn internal_execution_time(&self) -> f64 {
        self.get(INTERNAL_EXECUTION_TIME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reply;

    #[test]
    fn test_parse_with_units() {
        let stats = Statistics::parse(&reply![
            "Nodes created: 2",
            "Properties set: 3",
            "Cached execution: 1",
            "Query internal execution time: 0.523 milliseconds"
        ])
        .unwrap();
        assert_eq!(stats.nodes_created(), 2);
        assert_eq!(stats.properties_set(), 3);
        assert!(stats.cached_execution());
        assert_eq!(stats.internal_execution_time(), 0.523);
        assert_eq!(stats.nodes_deleted(), 0);
        assert!(!stats.contains(NODES_DELETED));
    }

    #[test]
    fn test_empty_statistics() {
        let stats = Statistics::parse(&reply![]).unwrap();
        assert!(stats.is_empty());
        assert!(!stats.cached_execution());
        assert_eq!(stats.internal_execution_time(), 0.0);
    }

    #[test]
    fn test_malformed_lines() {
        let err = Statistics::parse(&reply!["Invalid Stat String"]).unwrap_err();
        assert!(err.to_string().contains("invalid statistic format"));
        let err = Statistics::parse(&reply!["Nodes created: lots"]).unwrap_err();
        assert!(matches!(err, Error::InvalidNumber { what: "statistic", .. }));
        let err = Statistics::parse(&reply!["Nodes created: "]).unwrap_err();
        assert!(err.to_string().contains("missing statistic value"));
        let err = Statistics::parse(&reply![[1]]).unwrap_err();
        assert!(err.to_string().contains("statistic entry not string"));
        let err = Statistics::parse(&Reply::from("bad-stats")).unwrap_err();
        assert!(err.to_string().contains("statistics payload is not array"));
    }
}
