// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for resolution engine lifecycle events.

use crate::errors::ResolutionError;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// A root resolution started.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ResolutionStarted<'a> {
    pub unit: &'a str,
    pub correlation_id: &'a str,
}

impl Display for ResolutionStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting resolution of unit '{}' (correlation {})",
            self.unit, self.correlation_id
        )
    }
}

impl StructuredLog for ResolutionStarted<'_> {
    fn log(&self) {
        tracing::info!(
            unit = self.unit,
            correlation_id = self.correlation_id,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "resolution",
            span_name = name,
            unit = self.unit,
            correlation_id = self.correlation_id,
        )
    }
}

/// A root resolution completed successfully.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ResolutionCompleted<'a> {
    pub unit: &'a str,
    pub duration: Duration,
    pub metadata_entries: usize,
}

impl Display for ResolutionCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Resolution of unit '{}' completed in {:?} with {} response metadata entries",
            self.unit, self.duration, self.metadata_entries
        )
    }
}

impl StructuredLog for ResolutionCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            unit = self.unit,
            duration_ms = self.duration.as_millis() as u64,
            metadata_entries = self.metadata_entries,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "resolution",
            span_name = name,
            unit = self.unit,
            metadata_entries = self.metadata_entries,
        )
    }
}

/// A root resolution failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ResolutionFailed<'a> {
    pub unit: &'a str,
    pub error: &'a ResolutionError,
}

impl Display for ResolutionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Resolution of unit '{}' failed: {}", self.unit, self.error)
    }
}

impl StructuredLog for ResolutionFailed<'_> {
    fn log(&self) {
        tracing::error!(
            unit = self.unit,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "resolution",
            span_name = name,
            unit = self.unit,
        )
    }
}
