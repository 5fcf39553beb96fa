// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Requests pair a target unit name with a query.

use crate::model::query::DataQuery;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One edge in the dependency graph: a named unit plus the query addressed
/// to it.
///
/// The (name, query) pair is the request's identity for the duration of one
/// resolution. It keys the resolved-values map handed to a unit's compute
/// step, and it is what the engine compares against the active ancestor chain
/// when detecting cycles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataRequest {
    name: String,
    query: DataQuery,
}

impl DataRequest {
    /// Request addressed to `name` with an empty READ query.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            query: DataQuery::new(),
        }
    }

    /// Request addressed to `name` with a specific query.
    pub fn with_query(name: impl Into<String>, query: DataQuery) -> Self {
        Self {
            name: name.into(),
            query,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn query(&self) -> &DataQuery {
        &self.query
    }
}

impl fmt::Display for DataRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{:?}]", self.name, self.query.action())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::query::DataAction;

    #[test]
    fn test_identity_covers_name_and_query() {
        let plain = DataRequest::new("Customers");
        let same = DataRequest::with_query("Customers", DataQuery::new());
        let different_query =
            DataRequest::with_query("Customers", DataQuery::new().with_parameter("id", "7"));
        let different_name = DataRequest::new("Orders");

        assert_eq!(plain, same);
        assert_ne!(plain, different_query);
        assert_ne!(plain, different_name);
    }

    #[test]
    fn test_requests_key_hash_maps() {
        use std::collections::HashMap;

        let mut resolved = HashMap::new();
        resolved.insert(DataRequest::new("Customers"), "value");

        assert_eq!(resolved.get(&DataRequest::new("Customers")), Some(&"value"));
        assert_eq!(
            resolved.get(&DataRequest::with_query(
                "Customers",
                DataQuery::new().with_action(DataAction::Delete)
            )),
            None
        );
    }
}
