//! JSON shapes exchanged with the procedure backend.
//!
//! Save requests nest condition children under their parent field. Fetch
//! responses are flat lists cross-referenced by `sectionId` and `parentId`.

use crate::error::LoadError;
use crate::model::Visibility;
use serde::{Deserialize, Serialize};

/// The wire type name used for headings.
pub const HEADING_TYPE: &str = "heading";

/// The document as derived from the builder tree, used for saving and live preview.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcedurePayload {
    pub title: String,
    pub description: String,
    pub visibility: Visibility,
    #[serde(default)]
    pub asset_ids: Vec<String>,
    #[serde(default)]
    pub location_ids: Vec<String>,
    #[serde(default)]
    pub teams_in_charge: Vec<String>,
    #[serde(default)]
    pub root_fields: Vec<WireItem>,
    #[serde(default)]
    pub sections: Vec<WireSection>,
}

/// The body of a create or update call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub organization_id: String,
    #[serde(flatten)]
    pub payload: ProcedurePayload,
}

/// A field or heading in a save request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireItem {
    pub field_name: String,
    pub field_type: String,
    pub required: bool,
    pub order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<WireConfig>,
    /// Condition children of a field; each carries its own `condition`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<WireItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<WireCondition>,
}

impl WireItem {
    pub fn is_heading(&self) -> bool {
        self.field_type == HEADING_TYPE
    }
}

/// Type-specific field configuration. Only present keys are emitted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meter_id: Option<String>,
}

impl WireConfig {
    pub fn is_empty(&self) -> bool {
        self.options.is_none() && self.meter_id.is_none()
    }
}

/// The condition under which a child record is shown.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WireCondition {
    /// The wire operator name, e.g. `one_of` or `between`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value2: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSection {
    pub section_name: String,
    pub order: u32,
    /// One-based position of the section within the whole root sequence, so
    /// root fields and sections can be interleaved again on load.
    pub position: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_description: Option<String>,
    #[serde(default)]
    pub fields: Vec<WireItem>,
}

/// A procedure as returned by `fetchById`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FetchResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub visibility: Visibility,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    pub assets: Vec<WireReference>,
    pub locations: Vec<WireReference>,
    pub teams: Vec<WireReference>,
    pub categories: Vec<WireReference>,
    pub fields: Vec<FetchedItem>,
    pub headings: Vec<FetchedItem>,
    pub sections: Vec<FetchedSection>,
}

impl FetchResponse {
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        serde_json::from_str(json).map_err(|e| LoadError::JsonParseError(e.to_string()))
    }
}

/// A reference to an external record (asset, location, team, category).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WireReference {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A flat field or heading in a fetch response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FetchedItem {
    pub id: String,
    pub field_name: String,
    pub field_type: String,
    pub required: bool,
    pub order: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<WireConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<WireCondition>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FetchedSection {
    pub id: String,
    pub section_name: String,
    pub order: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_description: Option<String>,
}
