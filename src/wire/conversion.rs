use super::deserialize::deserialize;
use super::schema::FetchResponse;
use crate::error::LoadError;
use crate::model::IdGenerator;
use crate::tree::Procedure;

/// A trait for backend payloads that can be turned into a builder `Procedure`.
///
/// `FetchResponse` implements it for the standard `fetchById` shape. Other
/// sources (fixtures, exports from older backends) can implement it to feed
/// the same editing session.
///
/// # Example
///
/// ```rust,no_run
/// use tenken::prelude::*;
///
/// struct Export { title: String }
///
/// impl IntoProcedure for Export {
///     fn into_procedure(self, ids: IdGenerator) -> std::result::Result<Procedure, LoadError> {
///         let mut procedure = Procedure::empty(ids);
///         procedure.meta.title = self.title;
///         Ok(procedure)
///     }
/// }
/// ```
pub trait IntoProcedure {
    /// Consumes the payload and rebuilds the tree, drawing identities from `ids`.
    fn into_procedure(self, ids: IdGenerator) -> Result<Procedure, LoadError>;
}

impl IntoProcedure for FetchResponse {
    fn into_procedure(self, ids: IdGenerator) -> Result<Procedure, LoadError> {
        deserialize(&self, ids)
    }
}

impl IntoProcedure for &FetchResponse {
    fn into_procedure(self, ids: IdGenerator) -> Result<Procedure, LoadError> {
        deserialize(self, ids)
    }
}

impl Procedure {
    /// Rebuilds a procedure from any convertible payload.
    pub fn load<T: IntoProcedure>(source: T, ids: IdGenerator) -> Result<Self, LoadError> {
        source.into_procedure(ids)
    }
}
