use anyhow::{Context, Result};

use super::model::ListCommand;
use crate::tfs::model::ProjectList;
use crate::tfs::traits::ProjectOperations;

impl ListCommand {
    pub async fn run(&self, client: &dyn ProjectOperations, collection: &str) -> Result<()> {
        print!("{}", project_report(client, collection).await?);
        Ok(())
    }
}

/// Fetches the projects of `collection` and renders them sorted by name.
pub async fn project_report(client: &dyn ProjectOperations, collection: &str) -> Result<String> {
    let mut projects = client
        .list_projects(collection)
        .await
        .context("Project list")?;
    projects.sort_by_key_str(|project| project.name.as_str());
    Ok(render_projects(collection, &projects))
}

pub fn render_projects(collection: &str, projects: &ProjectList) -> String {
    let mut report = format!(
        "\nCollection: {collection}\n\nProjects found: {}\n====================\n",
        projects.count
    );
    report.extend(projects.value.iter().map(|project| format!("{}\n", project.name)));
    report
}
