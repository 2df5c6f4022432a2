use serde::{Deserialize, Serialize};

use super::ListResponse;

/// A single TFS team project.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub url: String,
    pub state: String,
    pub revision: i64,
    pub visibility: String,
}

pub type ProjectList = ListResponse<Project>;
