pub mod resolver;

pub use resolver::{EngineOptions, ResolutionEngine};
