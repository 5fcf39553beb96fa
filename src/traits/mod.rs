pub mod dispatcher;
pub mod unit;

pub use dispatcher::UnitDispatcher;
pub use unit::{DataUnit, PropagationPolicy};
