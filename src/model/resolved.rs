// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The resolved-dependency map handed to a unit's compute step.

use crate::errors::ResolutionError;
use crate::model::request::DataRequest;
use serde_json::Value;
use std::collections::HashMap;

/// Values resolved for the dependency requests a unit declared, keyed by the
/// exact request. The engine assembles one of these per resolution node and
/// passes it to `compute`; it contains precisely the declared dependencies.
///
/// A declared dependency missing from the map is an engine invariant
/// violation, never a recoverable condition, so `require` fails fast with
/// `ResolutionError::MissingDependency`.
#[derive(Debug, Clone)]
pub struct ResolvedValues {
    /// Name of the unit these values were resolved for; carried so lookup
    /// failures can name the responsible unit.
    consumer: String,
    values: HashMap<DataRequest, Value>,
}

impl ResolvedValues {
    pub fn new(consumer: impl Into<String>) -> Self {
        Self {
            consumer: consumer.into(),
            values: HashMap::new(),
        }
    }

    pub fn insert(&mut self, request: DataRequest, value: Value) {
        self.values.insert(request, value);
    }

    pub fn get(&self, request: &DataRequest) -> Option<&Value> {
        self.values.get(request)
    }

    /// The resolved value for a declared dependency, or a fail-fast
    /// `MissingDependency` error if the engine never delivered it.
    pub fn require(&self, request: &DataRequest) -> Result<&Value, ResolutionError> {
        self.values
            .get(request)
            .ok_or_else(|| ResolutionError::MissingDependency {
                unit: self.consumer.clone(),
                request: request.to_string(),
            })
    }

    /// Convenience lookup by target unit name, for units that declared a
    /// single request per target. Returns the first match.
    pub fn value_for_unit(&self, unit_name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(request, _)| request.name() == unit_name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, request: &DataRequest) -> bool {
        self.values.contains_key(request)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DataRequest, &Value)> {
        self.values.iter()
    }
}
