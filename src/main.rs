// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Demo binary: wires a small registry of data units and resolves a root
//! request against it, printing the aggregated value and the response
//! metadata that merged up the chain.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::env;
use std::sync::Arc;
use std::time::Instant;

use dataweave::config::load_config;
use dataweave::dispatch::{LocalDispatcher, UnitRegistry};
use dataweave::engine::{EngineOptions, ResolutionEngine};
use dataweave::model::{DataContext, DataQuery, DataRequest, ResolvedValues};
use dataweave::traits::{DataUnit, PropagationPolicy, UnitDispatcher};

/// Leaf unit serving customer records.
struct CustomersUnit;

#[async_trait]
impl DataUnit for CustomersUnit {
    fn name(&self) -> &str {
        "Customers"
    }

    async fn compute(
        &self,
        query: &DataQuery,
        _resolved: &ResolvedValues,
        ctx: &mut DataContext,
    ) -> anyhow::Result<Value> {
        ctx.put_response_metadata_entry("customersSource", "in-memory");
        let id = query.parameter("id").unwrap_or("0");
        Ok(json!({ "id": id, "name": format!("Customer #{id}") }))
    }
}

/// Leaf unit serving order lines for a customer.
struct OrdersUnit;

#[async_trait]
impl DataUnit for OrdersUnit {
    fn name(&self) -> &str {
        "Orders"
    }

    async fn compute(
        &self,
        query: &DataQuery,
        _resolved: &ResolvedValues,
        ctx: &mut DataContext,
    ) -> anyhow::Result<Value> {
        ctx.put_response_metadata_entry("ordersSource", "in-memory");
        let customer = query.parameter("customer").unwrap_or("0");
        Ok(json!([
            { "customer": customer, "item": "widget", "quantity": 3 },
            { "customer": customer, "item": "gizmo", "quantity": 1 },
        ]))
    }
}

/// Aggregator joining a customer with their orders.
struct DashboardUnit;

#[async_trait]
impl DataUnit for DashboardUnit {
    fn name(&self) -> &str {
        "Dashboard"
    }

    fn propagation_policy(&self) -> PropagationPolicy {
        PropagationPolicy::AutoMerge
    }

    async fn dependencies(
        &self,
        query: &DataQuery,
        _ctx: &mut DataContext,
    ) -> anyhow::Result<Vec<DataRequest>> {
        let id = query.parameter("id").unwrap_or("0").to_string();
        Ok(vec![
            DataRequest::with_query("Customers", DataQuery::new().with_parameter("id", &id)),
            DataRequest::with_query("Orders", DataQuery::new().with_parameter("customer", &id)),
        ])
    }

    async fn compute(
        &self,
        query: &DataQuery,
        resolved: &ResolvedValues,
        ctx: &mut DataContext,
    ) -> anyhow::Result<Value> {
        ctx.put_response_metadata_entry("dashboardVersion", "1");
        let customer = resolved.value_for_unit("Customers").cloned();
        let orders = resolved.value_for_unit("Orders").cloned();
        Ok(json!({
            "requested": query.parameter("id"),
            "customer": customer,
            "orders": orders,
        }))
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let options = match args.get(1) {
        Some(path) => match load_config(path) {
            Ok(cfg) => cfg.engine_options(),
            Err(e) => {
                eprintln!("Failed to load config {path}: {e}");
                std::process::exit(1);
            }
        },
        None => EngineOptions::default(),
    };

    let mut registry = UnitRegistry::new();
    registry.register(Arc::new(CustomersUnit));
    registry.register(Arc::new(OrdersUnit));
    registry.register(Arc::new(DashboardUnit));
    let dispatcher = Arc::new(LocalDispatcher::new(registry));

    println!("Deployed units: {:?}", dispatcher.deployed_units());

    let engine = ResolutionEngine::with_options(dispatcher, options);
    let request = DataRequest::with_query(
        "Dashboard",
        DataQuery::new().with_parameter("id", "42"),
    );
    let mut ctx = DataContext::new_root().with_session_id("demo-session");

    let started = Instant::now();
    match engine.resolve(&request, &mut ctx).await {
        Ok(value) => {
            println!("\nResolved {} in {:?}", request, started.elapsed());
            println!("{}", serde_json::to_string_pretty(&value).unwrap_or_default());
            println!("\nResponse metadata:");
            for (key, entry) in ctx.response_metadata() {
                println!("  {key}: {entry}");
            }
        }
        Err(e) => {
            eprintln!("Resolution failed: {e}");
            std::process::exit(1);
        }
    }
}
