// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! In-process dispatch backed by a unit registry.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::ResolutionError;
use crate::model::{DataContext, DataRequest, ResolvedValues};
use crate::traits::dispatcher::UnitDispatcher;
use crate::traits::unit::{DataUnit, PropagationPolicy};

/// Newtype wrapper for the name → unit mapping.
#[derive(Clone, Default)]
pub struct UnitRegistry(pub HashMap<String, Arc<dyn DataUnit>>);

impl UnitRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Register a unit under its own declared name.
    pub fn register(&mut self, unit: Arc<dyn DataUnit>) {
        self.0.insert(unit.name().to_string(), unit);
    }

    /// Get a unit by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn DataUnit>> {
        self.0.get(name)
    }

    /// Check if a unit is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Names of all registered units.
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }
}

impl std::fmt::Debug for UnitRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitRegistry")
            .field("unit_count", &self.0.len())
            .field("unit_names", &self.0.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl From<HashMap<String, Arc<dyn DataUnit>>> for UnitRegistry {
    fn from(map: HashMap<String, Arc<dyn DataUnit>>) -> Self {
        Self(map)
    }
}

/// Dispatcher for units deployed in the local process.
///
/// Unit failures are wrapped into the resolution error kind matching the
/// step that failed, carrying the responsible unit's name. An unregistered
/// target name fails with `UnknownUnit`.
pub struct LocalDispatcher {
    registry: UnitRegistry,
}

impl LocalDispatcher {
    pub fn new(registry: UnitRegistry) -> Self {
        Self { registry }
    }

    fn lookup(&self, name: &str) -> Result<&Arc<dyn DataUnit>, ResolutionError> {
        self.registry
            .get(name)
            .ok_or_else(|| ResolutionError::UnknownUnit {
                name: name.to_string(),
            })
    }
}

#[async_trait]
impl UnitDispatcher for LocalDispatcher {
    async fn dispatch_dependencies(
        &self,
        request: &DataRequest,
        ctx: &mut DataContext,
    ) -> Result<Vec<DataRequest>, ResolutionError> {
        let unit = self.lookup(request.name())?;
        unit.dependencies(request.query(), ctx)
            .await
            .map_err(|cause| ResolutionError::DependencyDeclaration {
                unit: request.name().to_string(),
                cause,
            })
    }

    async fn dispatch_compute(
        &self,
        request: &DataRequest,
        resolved: &ResolvedValues,
        ctx: &mut DataContext,
    ) -> Result<Value, ResolutionError> {
        let unit = self.lookup(request.name())?;
        unit.compute(request.query(), resolved, ctx)
            .await
            .map_err(|cause| ResolutionError::Compute {
                unit: request.name().to_string(),
                cause,
            })
    }

    fn propagation_policy(&self, unit_name: &str) -> Result<PropagationPolicy, ResolutionError> {
        Ok(self.lookup(unit_name)?.propagation_policy())
    }

    fn deployed_units(&self) -> Vec<String> {
        self.registry.names().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DataQuery;
    use serde_json::json;

    struct EchoUnit;

    #[async_trait]
    impl DataUnit for EchoUnit {
        fn name(&self) -> &str {
            "Echo"
        }

        async fn compute(
            &self,
            query: &DataQuery,
            _resolved: &ResolvedValues,
            _ctx: &mut DataContext,
        ) -> anyhow::Result<Value> {
            Ok(json!(query.parameter("text").unwrap_or_default()))
        }
    }

    struct BrokenUnit;

    #[async_trait]
    impl DataUnit for BrokenUnit {
        fn name(&self) -> &str {
            "Broken"
        }

        async fn compute(
            &self,
            _query: &DataQuery,
            _resolved: &ResolvedValues,
            _ctx: &mut DataContext,
        ) -> anyhow::Result<Value> {
            anyhow::bail!("backend unavailable")
        }
    }

    fn dispatcher() -> LocalDispatcher {
        let mut registry = UnitRegistry::new();
        registry.register(Arc::new(EchoUnit));
        registry.register(Arc::new(BrokenUnit));
        LocalDispatcher::new(registry)
    }

    #[tokio::test]
    async fn test_dispatch_routes_to_registered_unit() {
        let dispatcher = dispatcher();
        let request =
            DataRequest::with_query("Echo", DataQuery::new().with_parameter("text", "hello"));
        let mut ctx = DataContext::new("corr");

        let resolved = ResolvedValues::new("Echo");
        let value = dispatcher
            .dispatch_compute(&request, &resolved, &mut ctx)
            .await
            .unwrap();
        assert_eq!(value, json!("hello"));
    }

    #[tokio::test]
    async fn test_unknown_unit_is_reported_by_name() {
        let dispatcher = dispatcher();
        let request = DataRequest::new("Nobody");
        let mut ctx = DataContext::new("corr");

        let err = dispatcher
            .dispatch_dependencies(&request, &mut ctx)
            .await
            .unwrap_err();
        match err {
            ResolutionError::UnknownUnit { name } => assert_eq!(name, "Nobody"),
            other => panic!("expected UnknownUnit, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_compute_failure_names_the_unit() {
        let dispatcher = dispatcher();
        let request = DataRequest::new("Broken");
        let mut ctx = DataContext::new("corr");

        let resolved = ResolvedValues::new("Broken");
        let err = dispatcher
            .dispatch_compute(&request, &resolved, &mut ctx)
            .await
            .unwrap_err();
        match err {
            ResolutionError::Compute { unit, cause } => {
                assert_eq!(unit, "Broken");
                assert!(cause.to_string().contains("backend unavailable"));
            }
            other => panic!("expected Compute, got {other:?}"),
        }
    }

    #[test]
    fn test_deployed_units_lists_registry_contents() {
        let dispatcher = dispatcher();
        let mut units = dispatcher.deployed_units();
        units.sort();
        assert_eq!(units, vec!["Broken".to_string(), "Echo".to_string()]);
    }
}
