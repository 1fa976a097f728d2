use crate::model::{ConditionId, NodeId};
use thiserror::Error;

/// Structural invariant violations found by `Procedure::validate`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Node '{0}' appears in more than one container or more than once in the same container")]
    DuplicatePlacement(NodeId),

    #[error("Node '{child}' is listed by a container that does not match its parent reference")]
    ParentMismatch { child: NodeId },

    #[error("Section '{section}' is nested inside another section or a condition")]
    NestedSection { section: NodeId },

    #[error("Field '{field}' of type '{field_type}' carries conditions, but the type is not logic-enabled")]
    ConditionsNotAllowed { field: NodeId, field_type: String },

    #[error("Condition '{condition}' uses operator '{operator}', which field '{field}' does not support")]
    UnsupportedOperator {
        condition: ConditionId,
        field: NodeId,
        operator: String,
    },

    #[error("Condition '{0}' is not owned by the field it references")]
    OrphanCondition(ConditionId),

    #[error("{0} node(s) are stored but unreachable from the root")]
    Unreachable(usize),
}

/// Errors that can occur when turning a fetched wire payload back into a `Procedure`.
#[derive(Error, Debug, Clone)]
pub enum LoadError {
    #[error("Failed to parse procedure JSON: {0}")]
    JsonParseError(String),

    #[error("Wire id '{0}' is used by more than one item")]
    DuplicateWireId(String),

    #[error("Item '{item_id}' references parent '{parent_id}', which does not exist")]
    UnknownParent { item_id: String, parent_id: String },

    #[error("Item '{item_id}' references parent '{parent_id}', which is not a field")]
    ParentNotAField { item_id: String, parent_id: String },

    #[error("Item '{item_id}' references section '{section_id}', which does not exist")]
    UnknownSection { item_id: String, section_id: String },

    #[error("Item '{0}' has a parent but no condition payload")]
    MissingCondition(String),

    #[error("Loaded procedure violates a structural invariant: {0}")]
    Invalid(#[from] ValidationError),
}

/// Errors reported by the collaborator services behind the procedure builder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Procedure '{0}' was not found")]
    NotFound(String),

    #[error("The backend rejected the request: {0}")]
    Rejected(String),

    #[error("Transport failure: {0}")]
    Transport(String),
}

/// Errors surfaced to the user by an editing `Session`.
#[derive(Error, Debug, Clone)]
pub enum SessionError {
    #[error("failed to load procedure for editing: {0}")]
    Fetch(ServiceError),

    #[error("failed to load procedure for editing: {0}")]
    Load(#[from] LoadError),

    #[error("failed to save procedure: {0}")]
    Save(ServiceError),

    #[error("failed to delete procedure: {0}")]
    Delete(ServiceError),

    #[error("The procedure has not been saved to the backend yet")]
    NotPersisted,
}

/// Errors that can occur while persisting or restoring a session snapshot.
#[derive(Error, Debug, Clone)]
pub enum SnapshotError {
    #[error("Snapshot encoding failed: {0}")]
    Encode(String),

    #[error("Snapshot decoding failed: {0}")]
    Decode(String),

    #[error("Snapshot I/O failed for '{path}': {message}")]
    Io { path: String, message: String },
}

/// Errors that can occur while reading the engine configuration.
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Could not read configuration file '{path}': {message}")]
    Read { path: String, message: String },

    #[error("Invalid configuration: {0}")]
    Parse(String),
}
