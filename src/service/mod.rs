//! Collaborator traits for the procedure backend.
//!
//! The builder never talks to a network itself. A host wires in an
//! implementation of these traits; [`MemoryBackend`] is the in-process one
//! used by the command line tools and the tests.

use crate::error::ServiceError;
use crate::model::Visibility;
use crate::wire::{FetchResponse, SaveRequest, WireReference};
use serde::{Deserialize, Serialize};

pub mod memory;

pub use memory::MemoryBackend;

/// One entry of the procedure listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcedureSummary {
    pub id: String,
    pub title: String,
    pub visibility: Visibility,
}

/// Persistence of procedures.
pub trait ProcedureService {
    /// Lists every stored procedure.
    fn fetch(&self) -> Result<Vec<ProcedureSummary>, ServiceError>;

    /// Returns one procedure in its flat stored form.
    fn fetch_by_id(&self, id: &str) -> Result<FetchResponse, ServiceError>;

    /// Stores a new procedure and returns the id the backend assigned.
    fn create(&mut self, request: &SaveRequest) -> Result<String, ServiceError>;

    /// Replaces the stored procedure `id`.
    fn update(&mut self, id: &str, request: &SaveRequest) -> Result<(), ServiceError>;

    fn delete(&mut self, id: &str) -> Result<(), ServiceError>;
}

/// Lookups that feed the metadata pickers of the builder.
pub trait FilterOptionsService {
    fn categories(&self) -> Result<Vec<WireReference>, ServiceError>;
    fn assets(&self) -> Result<Vec<WireReference>, ServiceError>;
    fn locations(&self) -> Result<Vec<WireReference>, ServiceError>;
    fn teams(&self) -> Result<Vec<WireReference>, ServiceError>;
}
