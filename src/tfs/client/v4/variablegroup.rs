use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info};
use url::form_urlencoded;

use crate::tfs::{
    client::BaseClient,
    error::TfsError,
    model::{VariableGroupList, VariableGroupParameters},
    traits::VariableGroupOperations,
};

use super::V4Client;

const AREA: &str = "distributedtask";
const RESOURCE: &str = "variablegroups";

impl V4Client {
    fn group_filter_query(group_name: &str) -> String {
        let escaped: String = form_urlencoded::byte_serialize(group_name.as_bytes()).collect();
        format!(
            "groupName={escaped}&actionFilter=use&top=50&api-version={}",
            Self::API_VERSION
        )
    }

    async fn query_variable_groups(
        &self,
        collection: &str,
        project: &str,
        query: &str,
    ) -> Result<VariableGroupList> {
        let url = self
            .base
            .project_url(collection, project, AREA, RESOURCE, query)?;
        let response = self.base.get(url).await?;
        let groups: VariableGroupList = BaseClient::decode(response).await?;
        debug!(
            "Fetched {} variable groups, server reported {}",
            groups.value.len(),
            groups.count
        );
        Ok(groups)
    }
}

#[async_trait]
impl VariableGroupOperations for V4Client {
    async fn list_variable_groups(
        &self,
        collection: &str,
        project: &str,
    ) -> Result<VariableGroupList> {
        debug!("list_variable_groups called with collection={collection:?}, project={project:?}");
        self.query_variable_groups(collection, project, &Self::group_filter_query("*"))
            .await
    }

    async fn find_variable_groups(
        &self,
        collection: &str,
        project: &str,
        name: &str,
    ) -> Result<VariableGroupList> {
        debug!("find_variable_groups called for '{name}'");
        self.query_variable_groups(collection, project, &Self::group_filter_query(name))
            .await
    }

    async fn create_variable_group(
        &self,
        collection: &str,
        project: &str,
        group: &VariableGroupParameters,
    ) -> Result<()> {
        let body = serde_json::to_string(group)?;
        let url = self.base.project_url(
            collection,
            project,
            AREA,
            RESOURCE,
            &format!("api-version={}", Self::API_VERSION),
        )?;

        let response = self.base.post(url, body).await?;
        let response = BaseClient::check_status(response)?;
        let created = response.text().await.map_err(TfsError::from)?;
        debug!("Create response: {created}");
        info!("Variable group created: {}", group.name);
        Ok(())
    }
}
