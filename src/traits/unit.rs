// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The contract every data unit implements.

use async_trait::async_trait;
use serde_json::Value;

use crate::model::{DataContext, DataQuery, DataRequest, ResolvedValues};

/// Controls whether a unit automatically absorbs the response metadata of the
/// dependencies *it* calls.
///
/// The policy belongs to the receiver, not the producer: a unit's own
/// metadata writes always travel up to its caller, and whether they propagate
/// further is decided by that caller's policy, one hop at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PropagationPolicy {
    /// Dependency metadata is merged into this unit's context automatically,
    /// last-write-wins in completion order.
    #[default]
    AutoMerge,
    /// No automatic merge; dependency metadata is discarded at this level
    /// unless the unit's compute step explicitly re-surfaces it.
    ManualProcess,
}

/// A named, independently deployable computation: declares the requests it
/// depends on, then computes a value from their resolved results.
///
/// Units are stateless across invocations. Anything a call needs lives in
/// the query or the context, so a single instance can serve any number of
/// concurrent resolutions.
#[async_trait]
pub trait DataUnit: Send + Sync {
    /// Routing key; unique within one deployment.
    fn name(&self) -> &str;

    /// The dependency requests this unit needs resolved before it can
    /// compute an answer for `query`. Leaf units keep the default.
    async fn dependencies(
        &self,
        query: &DataQuery,
        ctx: &mut DataContext,
    ) -> anyhow::Result<Vec<DataRequest>> {
        let _ = (query, ctx);
        Ok(Vec::new())
    }

    /// Compute the unit's value. `resolved` holds exactly the dependencies
    /// declared for this query; the unit may write response-metadata entries
    /// into `ctx`.
    async fn compute(
        &self,
        query: &DataQuery,
        resolved: &ResolvedValues,
        ctx: &mut DataContext,
    ) -> anyhow::Result<Value>;

    /// Consulted by the engine when this unit is the parent in a merge
    /// decision.
    fn propagation_policy(&self) -> PropagationPolicy {
        PropagationPolicy::default()
    }
}
