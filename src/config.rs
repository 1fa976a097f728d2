use crate::error::ConfigError;
use crate::model::{FieldType, IdStrategy, Visibility};
use serde::{Deserialize, Serialize};
use std::fs;

/// Settings for new procedures and for talking to the backend.
///
/// Every key is optional in the JSON form; missing keys take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Sent as `organizationId` with every save request.
    pub organization_id: String,
    pub default_visibility: Visibility,
    pub id_strategy: IdStrategy,
    /// Label of the field a new procedure starts with.
    pub default_field_label: String,
    pub default_field_type: FieldType,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            organization_id: String::new(),
            default_visibility: Visibility::Private,
            id_strategy: IdStrategy::Random,
            default_field_label: String::new(),
            default_field_type: FieldType::TextField,
        }
    }
}

impl EngineConfig {
    /// Load a configuration from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
