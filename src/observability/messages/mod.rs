// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for a human-readable line and
//! [`StructuredLog`] to emit the same event with structured fields through
//! `tracing`.

use tracing::Span;

pub mod engine;

/// Emit a message through `tracing` with structured fields, or open a span
/// carrying the same fields.
pub trait StructuredLog {
    /// Log this message at its intended level with structured fields.
    fn log(&self);

    /// Create a span carrying this message's fields.
    fn span(&self, name: &str) -> Span;
}
