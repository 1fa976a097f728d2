//! Conversion between the builder tree and the backend's JSON shapes.

pub mod conversion;
pub mod deserialize;
pub mod flatten;
pub mod schema;
pub mod serialize;

pub use conversion::IntoProcedure;
pub use deserialize::{decode_condition, deserialize};
pub use flatten::flatten;
pub use schema::*;
pub use serialize::{condition_payload, serialize};
