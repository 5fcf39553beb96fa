// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The dispatch boundary between the engine and deployed units.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ResolutionError;
use crate::model::{DataContext, DataRequest, ResolvedValues};
use crate::traits::unit::PropagationPolicy;

/// Routes a call to the correct — possibly remote — instance of a named
/// unit.
///
/// This is where cluster transparency lives: the engine cannot tell a local
/// call from a network hop. The in-process implementation is
/// [`LocalDispatcher`](crate::dispatch::LocalDispatcher); a transport-backed
/// implementation would serialize the query and context and slot in behind
/// the same trait.
#[async_trait]
pub trait UnitDispatcher: Send + Sync {
    /// Route a dependency-declaration call to the unit `request` addresses.
    async fn dispatch_dependencies(
        &self,
        request: &DataRequest,
        ctx: &mut DataContext,
    ) -> Result<Vec<DataRequest>, ResolutionError>;

    /// Route a compute call to the unit `request` addresses.
    async fn dispatch_compute(
        &self,
        request: &DataRequest,
        resolved: &ResolvedValues,
        ctx: &mut DataContext,
    ) -> Result<Value, ResolutionError>;

    /// The propagation policy declared by the named unit.
    fn propagation_policy(&self, unit_name: &str) -> Result<PropagationPolicy, ResolutionError>;

    /// Names of all currently deployed units.
    fn deployed_units(&self) -> Vec<String>;
}
