use anyhow::Result;
use async_trait::async_trait;

use crate::tfs::model::{VariableGroupList, VariableGroupParameters};

#[async_trait]
pub trait VariableGroupOperations: Send + Sync {
    /// Lists every variable group of a project the caller may use.
    async fn list_variable_groups(&self, collection: &str, project: &str)
        -> Result<VariableGroupList>;

    /// Lists the variable groups the server matches against `name`. The match
    /// is the server's and is not necessarily exact.
    async fn find_variable_groups(
        &self,
        collection: &str,
        project: &str,
        name: &str,
    ) -> Result<VariableGroupList>;

    async fn create_variable_group(
        &self,
        collection: &str,
        project: &str,
        group: &VariableGroupParameters,
    ) -> Result<()>;
}
