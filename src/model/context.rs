// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Request-scoped context that travels with a resolution tree.
//!
//! A context carries two kinds of state. The travel companions — correlation
//! id, session id, bearer token, attachment bag — are fixed when the root
//! context is built and shared unchanged by every node in the tree. The
//! response-metadata map is the side channel: units write entries into it
//! during compute, and the engine selectively merges those entries back up
//! the chain according to each parent's propagation policy.
//!
//! Each node operates on a fork of its parent's context: same travel
//! companions (cheap `Arc` clone for the attachment bag), fresh empty
//! metadata map. Forking is what keeps concurrent siblings from ever writing
//! the same map instance.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Per-resolution-tree-node carrier of trace, session, and credential state
/// plus the response-metadata side channel.
#[derive(Debug, Clone)]
pub struct DataContext {
    correlation_id: String,
    session_id: Option<String>,
    bearer_token: Option<String>,
    attachments: Arc<Map<String, Value>>,
    response_metadata: HashMap<String, Value>,
}

impl DataContext {
    /// Context with an explicit correlation id and nothing else set.
    pub fn new(correlation_id: impl Into<String>) -> Self {
        Self {
            correlation_id: correlation_id.into(),
            session_id: None,
            bearer_token: None,
            attachments: Arc::new(Map::new()),
            response_metadata: HashMap::new(),
        }
    }

    /// Root context with a generated v7 UUID correlation id.
    pub fn new_root() -> Self {
        Self::new(Uuid::now_v7().to_string())
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Attach a shared read-only value. Attachments are copied by reference
    /// into every fork, so they should be set before resolution starts.
    pub fn with_attachment(mut self, key: impl Into<String>, value: Value) -> Self {
        Arc::make_mut(&mut self.attachments).insert(key.into(), value);
        self
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }

    pub fn attachment(&self, key: &str) -> Option<&Value> {
        self.attachments.get(key)
    }

    /// Fork a child context for a dependency sub-call: same correlation id,
    /// session, credentials, and attachment bag; empty response-metadata map.
    pub fn fork(&self) -> Self {
        Self {
            correlation_id: self.correlation_id.clone(),
            session_id: self.session_id.clone(),
            bearer_token: self.bearer_token.clone(),
            attachments: Arc::clone(&self.attachments),
            response_metadata: HashMap::new(),
        }
    }

    pub fn response_metadata_entry(&self, key: &str) -> Option<&Value> {
        self.response_metadata.get(key)
    }

    pub fn put_response_metadata_entry(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.response_metadata.insert(key.into(), value.into());
    }

    pub fn response_metadata(&self) -> &HashMap<String, Value> {
        &self.response_metadata
    }

    /// Copy every entry of `entries` into this context's metadata map,
    /// last-write-wins on key collision.
    pub fn merge_response_metadata(&mut self, entries: HashMap<String, Value>) {
        self.response_metadata.extend(entries);
    }

    /// Consume the context, yielding its metadata map. Used by the engine
    /// when a sub-resolution hands its forked context back to the parent.
    pub fn into_response_metadata(self) -> HashMap<String, Value> {
        self.response_metadata
    }
}
