use anyhow::Result;
use async_trait::async_trait;

use crate::tfs::model::ProjectList;

#[async_trait]
pub trait ProjectOperations: Send + Sync {
    /// Lists the projects of a collection. An empty `collection` means the
    /// configured default.
    async fn list_projects(&self, collection: &str) -> Result<ProjectList>;
}
