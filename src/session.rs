//! The editing session: one procedure tree plus its link to the backend.

use crate::config::EngineConfig;
use crate::error::{ServiceError, SessionError};
use crate::model::{ConditionId, FieldType, IdGenerator, NodeId};
use crate::service::ProcedureService;
use crate::snapshot::Snapshot;
use crate::tree::{Deletion, Procedure};
use crate::wire::{IntoProcedure, ProcedurePayload, SaveRequest};

type DeletionListener = Box<dyn FnMut(&Deletion) + Send>;

/// Owns the tree being edited.
///
/// Structural removals made through the session are broadcast to every
/// registered deletion listener, so hosts can drop element refs, open editors
/// or cached answers keyed by the removed ids.
pub struct Session {
    procedure: Procedure,
    remote_id: Option<String>,
    config: EngineConfig,
    listeners: Vec<DeletionListener>,
}

impl Session {
    /// A session on a fresh procedure holding the configured default field.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            procedure: Procedure::from_config(&config),
            remote_id: None,
            config,
            listeners: Vec::new(),
        }
    }

    /// Opens a stored procedure for editing.
    pub fn open<S>(service: &S, id: &str, config: EngineConfig) -> Result<Self, SessionError>
    where
        S: ProcedureService + ?Sized,
    {
        let mut session = Self::new(config);
        session.load(service, id)?;
        Ok(session)
    }

    /// Replaces the current tree with the stored procedure `id`.
    ///
    /// The tree is only replaced once the fetched payload has been rebuilt
    /// successfully; on failure the session keeps what it had.
    pub fn load<S>(&mut self, service: &S, id: &str) -> Result<(), SessionError>
    where
        S: ProcedureService + ?Sized,
    {
        let response = service.fetch_by_id(id).map_err(|e| {
            log::error!("{}", SessionError::Fetch(e.clone()));
            SessionError::Fetch(e)
        })?;
        let procedure = response
            .into_procedure(IdGenerator::new(self.config.id_strategy))
            .map_err(|e| {
                log::error!("{}", SessionError::Load(e.clone()));
                SessionError::Load(e)
            })?;
        self.procedure = procedure;
        self.remote_id = Some(id.to_string());
        Ok(())
    }

    pub fn procedure(&self) -> &Procedure {
        &self.procedure
    }

    /// Direct access to the tree. Removals made this way are not broadcast;
    /// use [`Session::delete`] and friends for those.
    pub fn procedure_mut(&mut self) -> &mut Procedure {
        &mut self.procedure
    }

    pub fn remote_id(&self) -> Option<&str> {
        self.remote_id.as_deref()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Registers a listener for deletion events.
    pub fn on_delete<F>(&mut self, listener: F)
    where
        F: FnMut(&Deletion) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn delete(&mut self, id: NodeId) -> bool {
        let deletion = self.procedure.delete(id);
        self.broadcast(deletion)
    }

    pub fn remove_condition(&mut self, id: ConditionId) -> bool {
        let deletion = self.procedure.remove_condition(id);
        self.broadcast(deletion)
    }

    pub fn change_field_type(&mut self, id: NodeId, field_type: FieldType) -> bool {
        let deletion = self.procedure.change_field_type(id, field_type);
        self.broadcast(deletion)
    }

    fn broadcast(&mut self, deletion: Option<Deletion>) -> bool {
        let Some(deletion) = deletion else {
            return false;
        };
        if !deletion.is_empty() {
            for listener in &mut self.listeners {
                listener(&deletion);
            }
        }
        true
    }

    /// The wire payload, recomputed from the current tree.
    pub fn preview(&self) -> ProcedurePayload {
        self.procedure.to_payload()
    }

    pub fn save_request(&self) -> SaveRequest {
        self.procedure.to_save_request(&self.config.organization_id)
    }

    /// Creates or updates the procedure on the backend and returns its id.
    ///
    /// A failed save leaves the tree untouched so it can be retried.
    pub fn save<S>(&mut self, service: &mut S) -> Result<String, SessionError>
    where
        S: ProcedureService + ?Sized,
    {
        let request = self.save_request();
        let id = match &self.remote_id {
            Some(id) => service.update(id, &request).map(|_| id.clone()),
            None => service.create(&request),
        }
        .map_err(|e| {
            log::error!("failed to save procedure: {}", e);
            SessionError::Save(e)
        })?;
        log::info!("Saved procedure '{}' as {}", self.procedure.meta.title, id);
        self.remote_id = Some(id.clone());
        Ok(id)
    }

    /// Deletes the procedure on the backend. A procedure that is already gone
    /// counts as deleted.
    pub fn delete_remote<S>(&mut self, service: &mut S) -> Result<(), SessionError>
    where
        S: ProcedureService + ?Sized,
    {
        let id = self.remote_id.clone().ok_or(SessionError::NotPersisted)?;
        match service.delete(&id) {
            Ok(()) => {}
            Err(ServiceError::NotFound(_)) => {
                log::debug!("delete: procedure {} was already gone", id);
            }
            Err(e) => return Err(SessionError::Delete(e)),
        }
        self.remote_id = None;
        Ok(())
    }

    /// A copy of the session state that can be written to disk.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            remote_id: self.remote_id.clone(),
            procedure: self.procedure.clone(),
        }
    }

    /// Resumes from a snapshot. Listeners stay registered.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.procedure = snapshot.procedure;
        self.remote_id = snapshot.remote_id;
    }
}
