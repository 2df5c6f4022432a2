pub mod project;
pub mod variablegroup;

use serde::{Deserialize, Serialize};

// Re-export common types for easier access
pub use project::ProjectList;
pub use variablegroup::{VariableGroup, VariableGroupList, VariableGroupParameters};

/// The envelope TFS wraps around every list response.
///
/// `count` is what the server reports and is taken at face value, even when it
/// disagrees with the number of entries in `value`.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub count: i64,
    #[serde(default)]
    pub value: Vec<T>,
}

impl<T> ListResponse<T> {
    /// Stable sort of the entries by a string key.
    pub fn sort_by_key_str<F>(&mut self, key: F)
    where
        F: Fn(&T) -> &str,
    {
        self.value.sort_by(|a, b| key(a).cmp(key(b)));
    }
}
