use serde::{Deserialize, Serialize};

use crate::display::DisplayNode;
use crate::menu_tree::RebuildMode;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryChangedRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "payload")]
pub enum MenuRequest {
    QueryChanged(QueryChangedRequest),
    QueryCleared,
    StoreChanged,
    CurrentTree,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TreeResponse {
    pub generation: u64,
    /// `None` when no rebuild ran for this request.
    pub mode: Option<RebuildMode>,
    pub unavailable: Vec<String>,
    pub root: Option<DisplayNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "payload")]
pub enum MenuResponse {
    Tree(TreeResponse),
}
