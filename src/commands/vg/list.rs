use anyhow::{Context, Result};

use super::model::ListCommand;
use crate::tfs::model::VariableGroupList;
use crate::tfs::traits::VariableGroupOperations;

impl ListCommand {
    pub async fn run(
        &self,
        client: &dyn VariableGroupOperations,
        collection: &str,
        project: &str,
    ) -> Result<()> {
        print!("{}", variable_group_report(client, collection, project).await?);
        Ok(())
    }
}

/// Fetches the variable groups of a project and renders them sorted by name,
/// each with its variable count.
pub async fn variable_group_report(
    client: &dyn VariableGroupOperations,
    collection: &str,
    project: &str,
) -> Result<String> {
    let mut groups = client
        .list_variable_groups(collection, project)
        .await
        .context("Variable group list")?;
    groups.sort_by_key_str(|group| group.name.as_str());
    Ok(render_variable_groups(collection, project, &groups))
}

pub fn render_variable_groups(collection: &str, project: &str, groups: &VariableGroupList) -> String {
    let mut report = format!(
        "\nCollection: {collection}\nProject: {project}\n\nGroups found: {}\n================\n",
        groups.count
    );
    report.extend(
        groups
            .value
            .iter()
            .map(|group| format!("{} ({} variables)\n", group.name, group.variables.len())),
    );
    report
}
