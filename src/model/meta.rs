use serde::{Deserialize, Serialize};

/// Who can see a procedure in the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Private,
    Public,
}

/// Document-level properties carried alongside the node tree.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProcedureMeta {
    pub title: String,
    pub description: String,
    pub visibility: Visibility,
    pub asset_ids: Vec<String>,
    pub location_ids: Vec<String>,
    pub team_ids: Vec<String>,
    pub category_ids: Vec<String>,
    pub priority: Option<String>,
}
