use super::{FilterOptionsService, ProcedureService, ProcedureSummary};
use crate::error::ServiceError;
use crate::wire::{FetchResponse, SaveRequest, WireReference, flatten};
use ahash::AHashMap;
use itertools::Itertools;
use uuid::Uuid;

/// Filter option lists served by a `MemoryBackend`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub categories: Vec<WireReference>,
    pub assets: Vec<WireReference>,
    pub locations: Vec<WireReference>,
    pub teams: Vec<WireReference>,
}

/// An in-process backend.
///
/// Saved requests are stored the way the real backend stores them: flattened
/// into field, heading and section records with fresh ids, so that a fetch
/// returns exactly what a remote fetch would.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    procedures: AHashMap<String, FetchResponse>,
    options: FilterOptions,
    offline: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: FilterOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Stores a fetch response as-is, e.g. one read from a file.
    pub fn insert(&mut self, response: FetchResponse) {
        self.procedures.insert(response.id.clone(), response);
    }

    /// While offline every call fails with a transport error.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    pub fn len(&self) -> usize {
        self.procedures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procedures.is_empty()
    }

    fn online(&self) -> Result<(), ServiceError> {
        if self.offline {
            return Err(ServiceError::Transport("backend unreachable".to_string()));
        }
        Ok(())
    }

    fn store(&mut self, id: &str, request: &SaveRequest) -> Result<(), ServiceError> {
        if request.payload.title.trim().is_empty() {
            return Err(ServiceError::Rejected("title must not be empty".to_string()));
        }
        let mut response = flatten(request, id);
        if let Some(previous) = self.procedures.get(id) {
            response.categories = previous.categories.clone();
            response.priority = previous.priority.clone();
        }
        self.procedures.insert(id.to_string(), response);
        Ok(())
    }
}

impl ProcedureService for MemoryBackend {
    fn fetch(&self) -> Result<Vec<ProcedureSummary>, ServiceError> {
        self.online()?;
        Ok(self
            .procedures
            .values()
            .map(|p| ProcedureSummary {
                id: p.id.clone(),
                title: p.title.clone(),
                visibility: p.visibility,
            })
            .sorted_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)))
            .collect())
    }

    fn fetch_by_id(&self, id: &str) -> Result<FetchResponse, ServiceError> {
        self.online()?;
        self.procedures
            .get(id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }

    fn create(&mut self, request: &SaveRequest) -> Result<String, ServiceError> {
        self.online()?;
        let id = Uuid::new_v4().to_string();
        self.store(&id, request)?;
        log::info!("memory backend: created procedure {}", id);
        Ok(id)
    }

    fn update(&mut self, id: &str, request: &SaveRequest) -> Result<(), ServiceError> {
        self.online()?;
        if !self.procedures.contains_key(id) {
            return Err(ServiceError::NotFound(id.to_string()));
        }
        self.store(id, request)
    }

    fn delete(&mut self, id: &str) -> Result<(), ServiceError> {
        self.online()?;
        self.procedures
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }
}

impl FilterOptionsService for MemoryBackend {
    fn categories(&self) -> Result<Vec<WireReference>, ServiceError> {
        self.online()?;
        Ok(self.options.categories.clone())
    }

    fn assets(&self) -> Result<Vec<WireReference>, ServiceError> {
        self.online()?;
        Ok(self.options.assets.clone())
    }

    fn locations(&self) -> Result<Vec<WireReference>, ServiceError> {
        self.online()?;
        Ok(self.options.locations.clone())
    }

    fn teams(&self) -> Result<Vec<WireReference>, ServiceError> {
        self.online()?;
        Ok(self.options.teams.clone())
    }
}
