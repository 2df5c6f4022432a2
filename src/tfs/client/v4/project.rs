use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info};

use crate::tfs::{client::BaseClient, model::ProjectList, traits::ProjectOperations};

use super::V4Client;

#[async_trait]
impl ProjectOperations for V4Client {
    async fn list_projects(&self, collection: &str) -> Result<ProjectList> {
        debug!("list_projects called with collection={collection:?}");

        let url = self.base.collection_url(collection, "", "projects", "")?;
        let response = self.base.get(url).await?;
        let projects: ProjectList = BaseClient::decode(response).await?;

        info!("Projects fetched: {} reported by server", projects.count);
        Ok(projects)
    }
}
