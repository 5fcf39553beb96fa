// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The request resolution engine.
//!
//! `resolve` walks a dependency tree that is discovered at request time: the
//! target unit is asked which requests it depends on, each of those is
//! resolved the same way concurrently, and the unit's compute step runs once
//! every dependency has a value. The tree is never known up front, so there
//! is no graph to validate ahead of execution; cycles are caught by checking
//! each node against the chain of requests currently active above it.
//!
//! ## Context propagation
//!
//! Every node runs on a fork of its parent's context. When a dependency
//! completes, its forked metadata map is either merged into the parent node's
//! context (parent policy `AutoMerge`, last-write-wins) or discarded (parent
//! policy `ManualProcess`). Merges happen in completion order, not
//! declaration order, so two siblings racing to write the same key is a
//! documented non-determinism. The root node uses the caller's context
//! directly, which is how top-level merges and the root unit's own writes
//! become visible to the caller.
//!
//! ## Failure and cancellation
//!
//! The first failing dependency fails the node; siblings already in flight
//! run to completion and their results are discarded. Cancellation is
//! cooperative and best-effort: a cancelled token stops nodes that have not
//! dispatched yet, and dropping the root future aborts in-flight tasks, but
//! a unit call already underway is not interrupted.

use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Semaphore, SemaphorePermit};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::errors::ResolutionError;
use crate::model::{DataContext, DataRequest, ResolvedValues};
use crate::observability::messages::engine::{
    ResolutionCompleted, ResolutionFailed, ResolutionStarted,
};
use crate::observability::messages::StructuredLog;
use crate::traits::dispatcher::UnitDispatcher;
use crate::traits::unit::PropagationPolicy;

/// Tuning knobs for a resolution engine.
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    /// Cap on concurrently executing unit invocations across the whole
    /// resolution tree. `None` leaves fan-out unbounded.
    pub max_concurrency: Option<usize>,
}

/// Resolves root requests against a dispatcher.
///
/// The engine holds no mutable state of its own; everything a resolution
/// needs is scoped to that one call graph and dropped when the root future
/// completes.
pub struct ResolutionEngine {
    shared: Arc<EngineShared>,
}

/// State threaded through every node of a resolution: the dispatch boundary,
/// the optional invocation cap, and nothing else.
struct EngineShared {
    dispatcher: Arc<dyn UnitDispatcher>,
    invocation_permits: Option<Semaphore>,
}

impl EngineShared {
    /// Permits are held only for the duration of a single unit invocation,
    /// never across a child sub-tree, so the cap cannot deadlock the
    /// recursion.
    async fn acquire_permit(&self) -> Result<Option<SemaphorePermit<'_>>, ResolutionError> {
        match &self.invocation_permits {
            Some(semaphore) => {
                semaphore
                    .acquire()
                    .await
                    .map(Some)
                    .map_err(|_| ResolutionError::Internal {
                        message: "invocation semaphore closed".to_string(),
                    })
            }
            None => Ok(None),
        }
    }
}

impl ResolutionEngine {
    pub fn new(dispatcher: Arc<dyn UnitDispatcher>) -> Self {
        Self::with_options(dispatcher, EngineOptions::default())
    }

    pub fn with_options(dispatcher: Arc<dyn UnitDispatcher>, options: EngineOptions) -> Self {
        Self {
            shared: Arc::new(EngineShared {
                dispatcher,
                invocation_permits: options.max_concurrency.map(Semaphore::new),
            }),
        }
    }

    /// Resolve a root request, merging top-level response metadata into the
    /// caller's context per the root unit's own policy.
    pub async fn resolve(
        &self,
        request: &DataRequest,
        ctx: &mut DataContext,
    ) -> Result<Value, ResolutionError> {
        self.resolve_with_cancellation(request, ctx, CancellationToken::new())
            .await
    }

    /// Resolve a root request observing a cancellation token. Cancelling the
    /// token stops sub-resolutions that have not dispatched yet; unit calls
    /// already underway finish on their own.
    pub async fn resolve_with_cancellation(
        &self,
        request: &DataRequest,
        ctx: &mut DataContext,
        token: CancellationToken,
    ) -> Result<Value, ResolutionError> {
        ResolutionStarted {
            unit: request.name(),
            correlation_id: ctx.correlation_id(),
        }
        .log();

        let started = Instant::now();
        // The root node's context is the caller's context, not a fork. The
        // engine works on an owned copy and writes it back on success.
        let outcome = resolve_node(
            Arc::clone(&self.shared),
            token,
            request.clone(),
            ctx.clone(),
            Vec::new(),
        )
        .await;

        match outcome {
            Ok((value, node_ctx)) => {
                ResolutionCompleted {
                    unit: request.name(),
                    duration: started.elapsed(),
                    metadata_entries: node_ctx.response_metadata().len(),
                }
                .log();
                *ctx = node_ctx;
                Ok(value)
            }
            Err(error) => {
                ResolutionFailed {
                    unit: request.name(),
                    error: &error,
                }
                .log();
                Err(error)
            }
        }
    }
}

type NodeOutcome = Result<(Value, DataContext), ResolutionError>;

/// Resolve one (unit, query) activation. `ctx` is this node's own context,
/// already forked by the caller (or the root context itself); `ancestors` is
/// the chain of requests active above this node.
fn resolve_node(
    shared: Arc<EngineShared>,
    token: CancellationToken,
    request: DataRequest,
    mut ctx: DataContext,
    mut ancestors: Vec<DataRequest>,
) -> Pin<Box<dyn Future<Output = NodeOutcome> + Send>> {
    Box::pin(async move {
        if token.is_cancelled() {
            return Err(ResolutionError::Cancelled);
        }

        if ancestors.contains(&request) {
            let mut chain: Vec<String> = ancestors.iter().map(ToString::to_string).collect();
            chain.push(request.to_string());
            return Err(ResolutionError::CycleDetected { chain });
        }
        ancestors.push(request.clone());

        let dependencies = {
            let _permit = shared.acquire_permit().await?;
            shared
                .dispatcher
                .dispatch_dependencies(&request, &mut ctx)
                .await?
        };
        // The merge decision below is governed by this node's own policy:
        // receiver-side, never producer-side.
        let policy = shared.dispatcher.propagation_policy(request.name())?;

        let mut resolved = ResolvedValues::new(request.name());
        if !dependencies.is_empty() {
            let mut subtasks = JoinSet::new();
            for dependency in &dependencies {
                let child_ctx = ctx.fork();
                let dependency = dependency.clone();
                let shared = Arc::clone(&shared);
                let token = token.clone();
                let ancestors = ancestors.clone();
                subtasks.spawn(async move {
                    let outcome =
                        resolve_node(shared, token, dependency.clone(), child_ctx, ancestors).await;
                    (dependency, outcome)
                });
            }

            // Join in completion order. The first failure wins; siblings
            // still in flight run to completion and their results are
            // discarded.
            let mut first_failure: Option<ResolutionError> = None;
            while let Some(joined) = subtasks.join_next().await {
                match joined {
                    Ok((dependency, Ok((value, child_ctx)))) => {
                        if first_failure.is_some() {
                            continue;
                        }
                        match policy {
                            PropagationPolicy::AutoMerge => {
                                tracing::debug!(
                                    unit = request.name(),
                                    dependency = %dependency,
                                    "merging dependency response metadata"
                                );
                                ctx.merge_response_metadata(child_ctx.into_response_metadata());
                            }
                            PropagationPolicy::ManualProcess => {
                                tracing::debug!(
                                    unit = request.name(),
                                    dependency = %dependency,
                                    "discarding dependency response metadata (manual policy)"
                                );
                            }
                        }
                        resolved.insert(dependency, value);
                    }
                    Ok((_, Err(error))) => {
                        first_failure.get_or_insert(error);
                    }
                    Err(join_error) => {
                        first_failure.get_or_insert(ResolutionError::Internal {
                            message: format!("dependency task failed: {join_error}"),
                        });
                    }
                }
            }
            if let Some(error) = first_failure {
                return Err(error);
            }

            // Every declared dependency must have produced a value before
            // compute runs; anything else is an engine bug.
            for dependency in &dependencies {
                if !resolved.contains(dependency) {
                    return Err(ResolutionError::MissingDependency {
                        unit: request.name().to_string(),
                        request: dependency.to_string(),
                    });
                }
            }
        }

        if token.is_cancelled() {
            return Err(ResolutionError::Cancelled);
        }

        let value = {
            let _permit = shared.acquire_permit().await?;
            shared
                .dispatcher
                .dispatch_compute(&request, &resolved, &mut ctx)
                .await?
        };

        Ok((value, ctx))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{LocalDispatcher, UnitRegistry};
    use crate::model::DataQuery;
    use crate::traits::unit::DataUnit;
    use async_trait::async_trait;
    use serde_json::json;

    struct Chain {
        name: &'static str,
        next: Option<&'static str>,
    }

    #[async_trait]
    impl DataUnit for Chain {
        fn name(&self) -> &str {
            self.name
        }

        async fn dependencies(
            &self,
            _query: &DataQuery,
            _ctx: &mut DataContext,
        ) -> anyhow::Result<Vec<DataRequest>> {
            Ok(self.next.map(DataRequest::new).into_iter().collect())
        }

        async fn compute(
            &self,
            _query: &DataQuery,
            _resolved: &ResolvedValues,
            _ctx: &mut DataContext,
        ) -> anyhow::Result<Value> {
            Ok(json!(self.name))
        }
    }

    fn chain_engine(options: EngineOptions) -> ResolutionEngine {
        let mut registry = UnitRegistry::new();
        registry.register(Arc::new(Chain {
            name: "Top",
            next: Some("Middle"),
        }));
        registry.register(Arc::new(Chain {
            name: "Middle",
            next: Some("Bottom"),
        }));
        registry.register(Arc::new(Chain {
            name: "Bottom",
            next: None,
        }));
        ResolutionEngine::with_options(Arc::new(LocalDispatcher::new(registry)), options)
    }

    #[tokio::test]
    async fn test_pre_cancelled_token_fails_immediately() {
        let engine = chain_engine(EngineOptions::default());
        let mut ctx = DataContext::new("corr");
        let token = CancellationToken::new();
        token.cancel();

        let err = engine
            .resolve_with_cancellation(&DataRequest::new("Top"), &mut ctx, token)
            .await
            .unwrap_err();
        assert!(matches!(err, ResolutionError::Cancelled));
    }

    #[tokio::test]
    async fn test_concurrency_cap_of_one_cannot_deadlock_the_recursion() {
        // Permits are only held across single invocations, so a three-deep
        // chain resolves even with one permit.
        let engine = chain_engine(EngineOptions {
            max_concurrency: Some(1),
        });
        let mut ctx = DataContext::new("corr");

        let value = tokio::time::timeout(
            std::time::Duration::from_secs(2),
            engine.resolve(&DataRequest::new("Top"), &mut ctx),
        )
        .await
        .expect("capped resolution must not deadlock")
        .unwrap();
        assert_eq!(value, json!("Top"));
    }
}
