use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::ListResponse;

/// The group type TFS expects for library variable groups.
pub const DEFAULT_GROUP_TYPE: &str = "Vsts";

fn default_group_type() -> String {
    DEFAULT_GROUP_TYPE.to_string()
}

/// A single variable in a variable group.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    /// Secret variables come back without a value.
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_secret: Option<bool>,
}

/// The user behind a `createdBy`/`modifiedBy` audit entry.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IdentityRef {
    pub id: String,
    pub display_name: String,
    pub unique_name: String,
    pub url: String,
    pub image_url: String,
}

/// A variable group as stored on the server.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableGroup {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(rename = "type", default = "default_group_type")]
    pub group_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub variables: BTreeMap<String, Variable>,
    #[serde(default)]
    pub created_by: Option<IdentityRef>,
    #[serde(default, with = "time::serde::iso8601::option")]
    pub created_on: Option<OffsetDateTime>,
    #[serde(default)]
    pub modified_by: Option<IdentityRef>,
    #[serde(default, with = "time::serde::iso8601::option")]
    pub modified_on: Option<OffsetDateTime>,
}

pub type VariableGroupList = ListResponse<VariableGroup>;

/// Request body for creating a variable group.
///
/// The server assigns the identifier and the audit fields, so this type has
/// neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableGroupParameters {
    pub name: String,
    #[serde(rename = "type")]
    pub group_type: String,
    pub description: String,
    pub variables: BTreeMap<String, Variable>,
}

impl VariableGroupParameters {
    /// Builds a copy of `source` named `Copy of <source> (<suffix>)`.
    pub fn copy_of(source: &VariableGroup, suffix: &str) -> Self {
        Self {
            name: format!("Copy of {} ({suffix})", source.name),
            group_type: source.group_type.clone(),
            description: source.description.clone().unwrap_or_default(),
            variables: source.variables.clone(),
        }
    }
}
