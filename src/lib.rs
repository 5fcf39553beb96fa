// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod config;     // engine config loading
pub mod dispatch;   // unit dispatch implementations
pub mod engine;     // request resolution engine
pub mod errors;     // error handling
pub mod model;      // query/request/context value objects
pub mod observability;
pub mod traits;     // unit + dispatcher abstractions
