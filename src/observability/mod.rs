// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Message types follow a struct-based pattern with a `Display`
//! implementation plus the [`messages::StructuredLog`] trait, which keeps
//! log strings out of the engine code and the emitted fields consistent.
//!
//! Messages are organized by subsystem:
//! * `messages::engine` - resolution lifecycle events

pub mod messages;
