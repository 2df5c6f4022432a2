use anyhow::Result;
use clap::Parser;

use crate::commands::connect;
use crate::tfs::config::TfsutilConfig;

/// Project helpers
#[derive(Parser, Debug)]
pub enum ProjectCommand {
    /// List projects
    #[clap(alias = "ls")]
    List(ListCommand),
}

impl ProjectCommand {
    pub async fn run(&self, config: &TfsutilConfig) -> Result<()> {
        let (client, connection) = connect(config)?;
        match self {
            ProjectCommand::List(cmd) => cmd.run(&client, &connection.collection).await,
        }
    }
}

#[derive(Parser, Debug)]
pub struct ListCommand {}
