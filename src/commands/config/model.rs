use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

/// Config file helpers
#[derive(Parser, Debug)]
pub enum ConfigCommand {
    /// Renders a config file
    #[clap(
        long_about = "Outputs a config file with default values. Write this to a file called 'tfsutil.toml' and customize the values."
    )]
    Create(CreateCommand),
}

impl ConfigCommand {
    pub fn run(&self) -> Result<()> {
        match self {
            ConfigCommand::Create(cmd) => cmd.run(),
        }
    }
}

#[derive(Parser, Debug)]
pub struct CreateCommand {
    /// Write the config to this file instead of stdout
    #[clap(short, long)]
    pub output: Option<PathBuf>,
    /// Overwrite the output file if it already exists
    #[clap(long)]
    pub force: bool,
}
