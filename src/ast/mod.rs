//! Predicate expression model.

pub mod expr;
pub mod interchange;
pub mod operators;

pub use expr::*;
pub use interchange::JsonNode;
pub use operators::*;
