use anyhow::Result;
use clap::Parser;

use crate::commands::connect;
use crate::tfs::config::TfsutilConfig;

/// Variable group helpers
#[derive(Parser, Debug)]
pub enum VgCommand {
    /// List variable groups
    #[clap(alias = "ls")]
    List(ListCommand),
    /// Copy a variable group and all its variables to a new variable group
    #[clap(
        after_help = "NOTE: For variable group names that contain spaces, surround the group name with quotes.\n\nExample:\ntfsutil vg copy \"Test group name\""
    )]
    Copy(CopyCommand),
}

impl VgCommand {
    pub async fn run(&self, config: &TfsutilConfig) -> Result<()> {
        let (client, connection) = connect(config)?;
        match self {
            VgCommand::List(cmd) => {
                cmd.run(&client, &connection.collection, &connection.project)
                    .await
            }
            VgCommand::Copy(cmd) => {
                cmd.run(&client, &connection.collection, &connection.project)
                    .await
            }
        }
    }
}

#[derive(Parser, Debug)]
pub struct ListCommand {}

#[derive(Parser, Debug)]
pub struct CopyCommand {
    /// Name of the variable group to copy
    pub name: Option<String>,
}
