// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod context;
pub mod query;
pub mod request;
pub mod resolved;

pub use context::DataContext;
pub use query::{DataAction, DataQuery};
pub use request::DataRequest;
pub use resolved::ResolvedValues;
