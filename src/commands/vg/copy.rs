use anyhow::Result;
use log::debug;
use uuid::Uuid;

use super::model::CopyCommand;
use crate::tfs::error::TfsError;
use crate::tfs::model::{VariableGroup, VariableGroupList, VariableGroupParameters};
use crate::tfs::traits::VariableGroupOperations;

/// What a successful copy produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CopyOutcome {
    pub source: String,
    pub created: VariableGroupParameters,
}

impl CopyOutcome {
    pub fn report(&self) -> String {
        format!(
            "\nCopied \n {} \nto \n {} \n (including {} variables)\n",
            self.source,
            self.created.name,
            self.created.variables.len()
        )
    }
}

impl CopyCommand {
    pub async fn run(
        &self,
        client: &dyn VariableGroupOperations,
        collection: &str,
        project: &str,
    ) -> Result<()> {
        let name = self
            .name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| TfsError::InvalidArgument {
                message: "Requires a variable group name".to_string(),
            })?;

        let outcome =
            copy_variable_group(client, collection, project, name, &unique_suffix()).await?;
        print!("{}", outcome.report());
        Ok(())
    }
}

/// Time-ordered, collision resistant suffix for copied group names.
pub fn unique_suffix() -> String {
    Uuid::now_v7().simple().to_string()
}

/// Picks the group to copy out of the server's matches for `name`.
///
/// The server matches loosely, so several groups may come back. The first
/// result is accepted when it is the only one or when its name is exactly
/// `name`.
pub fn resolve_group<'a>(
    groups: &'a VariableGroupList,
    name: &str,
) -> Result<&'a VariableGroup, TfsError> {
    let not_found = || TfsError::NotFound {
        name: name.to_string(),
    };
    if groups.count < 1 {
        return Err(not_found());
    }
    let first = groups.value.first().ok_or_else(not_found)?;
    if groups.count > 1 && first.name != name {
        return Err(TfsError::Ambiguous {
            name: name.to_string(),
        });
    }
    Ok(first)
}

/// Looks up `name` and creates a uniquely named copy of it in the same project.
pub async fn copy_variable_group(
    client: &dyn VariableGroupOperations,
    collection: &str,
    project: &str,
    name: &str,
    suffix: &str,
) -> Result<CopyOutcome> {
    debug!("Attempting to copy the group '{name}'");

    let groups = client.find_variable_groups(collection, project, name).await?;
    let source = resolve_group(&groups, name)?;
    debug!(
        "Copying '{}' (and {} variables)",
        source.name,
        source.variables.len()
    );

    let created = VariableGroupParameters::copy_of(source, suffix);
    debug!("Creating a group with the name: {}", created.name);
    client
        .create_variable_group(collection, project, &created)
        .await?;

    Ok(CopyOutcome {
        source: source.name.clone(),
        created,
    })
}
