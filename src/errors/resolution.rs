// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors produced while resolving a request tree.
//!
//! Every kind aborts the node it occurred at and is rethrown to the immediate
//! caller unchanged. The responsible unit's identity is attached once, at the
//! point of failure; ancestors never re-wrap, so the root `resolve` call fails
//! with the original cause.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolutionError {
    /// A unit's dependency-declaration step failed.
    #[error("unit '{unit}' failed to declare its dependencies: {cause}")]
    DependencyDeclaration {
        unit: String,
        cause: anyhow::Error,
    },

    /// A unit's compute step failed.
    #[error("unit '{unit}' failed to compute: {cause}")]
    Compute {
        unit: String,
        cause: anyhow::Error,
    },

    /// The same (unit, query) identity was revisited within the active
    /// ancestor chain of one resolution.
    #[error("dependency cycle detected: {}", chain.join(" -> "))]
    CycleDetected { chain: Vec<String> },

    /// Dispatch could not resolve the target unit name.
    #[error("no unit deployed under the name '{name}'")]
    UnknownUnit { name: String },

    /// A declared dependency was absent from the resolved map handed to
    /// compute. Always an engine bug, never user-recoverable.
    #[error("unit '{unit}' required dependency '{request}' which was never resolved")]
    MissingDependency { unit: String, request: String },

    /// The root resolution was cancelled before this node could run.
    #[error("resolution cancelled")]
    Cancelled,

    /// A resolution task failed outside unit code (e.g. a panicked task).
    #[error("internal resolution failure: {message}")]
    Internal { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_error_renders_the_chain() {
        let err = ResolutionError::CycleDetected {
            chain: vec!["A[Read]".to_string(), "B[Read]".to_string(), "A[Read]".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "dependency cycle detected: A[Read] -> B[Read] -> A[Read]"
        );
    }

    #[test]
    fn test_compute_error_preserves_the_cause() {
        let err = ResolutionError::Compute {
            unit: "Orders".to_string(),
            cause: anyhow::anyhow!("backend unavailable"),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("Orders"));
        assert!(rendered.contains("backend unavailable"));
    }
}
