//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the tenken crate.
//! Import it to get the tree, the condition model, the wire conversions and the
//! editing session without importing each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use tenken::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let json = std::fs::read_to_string("path/to/procedure.json")?;
//! let procedure = Procedure::load(FetchResponse::from_json(&json)?, IdGenerator::random())?;
//!
//! println!("{}", procedure);
//! println!("{}", serde_json::to_string_pretty(&procedure.to_payload())?);
//! # Ok(())
//! # }
//! ```

// The document and its editing operations
pub use crate::session::Session;
pub use crate::tree::{ConditionPatch, Deletion, DropTarget, Procedure, TreeFold, Visit, Walk};

// Model types
pub use crate::model::{
    Condition, ConditionGroup, ConditionId, Container, FieldType, IdGenerator, IdStrategy,
    MeterRef, Node, NodeDraft, NodeId, NodeKind, NodePatch, Operator, ProcedureMeta, Visibility,
};

// Condition evaluation
pub use crate::evaluator::{Answer, Answers, evaluate, resolve_visibility, visible_nodes};
pub use crate::trace::{ConditionTrace, TraceFormatter};

// Wire format
pub use crate::wire::{FetchResponse, IntoProcedure, ProcedurePayload, SaveRequest};

// Collaborators, configuration and persistence
pub use crate::config::EngineConfig;
pub use crate::service::{FilterOptionsService, MemoryBackend, ProcedureService};
pub use crate::snapshot::Snapshot;

// Error types
pub use crate::error::{LoadError, ServiceError, SessionError, ValidationError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
