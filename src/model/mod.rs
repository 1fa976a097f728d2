pub mod condition;
pub mod draft;
pub mod field;
pub mod id;
pub mod meta;
pub mod node;

pub use condition::*;
pub use draft::*;
pub use field::*;
pub use id::*;
pub use meta::*;
pub use node::*;
