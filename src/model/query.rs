// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Immutable query value objects describing what is being asked of a data unit.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The action a query asks a data unit to perform.
///
/// The four standard actions cover the usual data operations; `Custom` is the
/// escape hatch for unit-specific verbs routed through the same machinery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataAction {
    #[default]
    Read,
    Create,
    Update,
    Delete,
    Custom(String),
}

/// The addressed parameters of one request to a data unit.
///
/// A query is immutable once constructed. Forwarding a query to a dependency
/// with altered parameters goes through the `with_*` methods, which copy the
/// query rather than mutate it. Parameters are multi-valued: a key maps to an
/// ordered list of values. Ordered map storage keeps equal queries hashing
/// equally, which matters because queries participate in request identity.
///
/// Serialization across process boundaries is delegated to the transport
/// layer; the type only guarantees it is serde-representable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataQuery {
    #[serde(default)]
    action: DataAction,
    #[serde(default)]
    parameters: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    body: Option<Vec<u8>>,
    #[serde(default)]
    headers: BTreeMap<String, String>,
}

impl DataQuery {
    /// Create an empty READ query.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn action(&self) -> &DataAction {
        &self.action
    }

    /// First value for a parameter key, if any.
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values for a parameter key.
    pub fn parameter_values(&self, key: &str) -> &[String] {
        self.parameters.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn parameters(&self) -> &BTreeMap<String, Vec<String>> {
        &self.parameters
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(String::as_str)
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Copy of this query with a different action.
    pub fn with_action(&self, action: DataAction) -> Self {
        let mut query = self.clone();
        query.action = action;
        query
    }

    /// Copy of this query with one more value appended for `key`.
    pub fn with_parameter(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut query = self.clone();
        query
            .parameters
            .entry(key.into())
            .or_default()
            .push(value.into());
        query
    }

    /// Copy of this query with all values for `key` replaced.
    pub fn with_parameter_values(&self, key: impl Into<String>, values: Vec<String>) -> Self {
        let mut query = self.clone();
        query.parameters.insert(key.into(), values);
        query
    }

    /// Copy of this query with `key` removed entirely.
    pub fn without_parameter(&self, key: &str) -> Self {
        let mut query = self.clone();
        query.parameters.remove(key);
        query
    }

    /// Copy of this query carrying an opaque byte payload.
    pub fn with_body(&self, body: Vec<u8>) -> Self {
        let mut query = self.clone();
        query.body = Some(body);
        query
    }

    pub fn with_header(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut query = self.clone();
        query.headers.insert(key.into(), value.into());
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query_is_read() {
        let query = DataQuery::new();
        assert_eq!(query.action(), &DataAction::Read);
        assert!(query.parameters().is_empty());
        assert!(query.body().is_none());
    }

    #[test]
    fn test_with_parameter_copies_instead_of_mutating() {
        let original = DataQuery::new();
        let altered = original.with_parameter("id", "42");

        assert!(original.parameter("id").is_none());
        assert_eq!(altered.parameter("id"), Some("42"));
    }

    #[test]
    fn test_parameters_are_multi_valued() {
        let query = DataQuery::new()
            .with_parameter("tag", "a")
            .with_parameter("tag", "b");

        assert_eq!(query.parameter("tag"), Some("a"));
        assert_eq!(query.parameter_values("tag"), &["a", "b"]);
    }

    #[test]
    fn test_equal_queries_compare_equal() {
        let first = DataQuery::new()
            .with_action(DataAction::Update)
            .with_parameter("id", "42")
            .with_header("accept", "application/json");
        let second = DataQuery::new()
            .with_action(DataAction::Update)
            .with_parameter("id", "42")
            .with_header("accept", "application/json");

        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_action_distinguishes_queries() {
        let validate = DataQuery::new().with_action(DataAction::Custom("validate".to_string()));
        let publish = DataQuery::new().with_action(DataAction::Custom("publish".to_string()));

        assert_ne!(validate, publish);
    }
}
