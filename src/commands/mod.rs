pub mod config;
pub mod project;
pub mod vg;

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::tfs::client::{BaseClient, V4Client};
use crate::tfs::config::{ConnectionConfig, TfsutilConfig};

/// Flags shared by every subcommand. Each falls back to an environment
/// variable and then to the config file.
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Config file (default is $HOME/tfsutil.toml, then ./tfsutil.toml)
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,
    /// TFS root url
    #[clap(short = 'u', long, env = "TFSURL", global = true)]
    pub tfsurl: Option<String>,
    /// Personal access token (available in TFS)
    #[clap(short, long, env = "PAT", global = true, hide_env_values = true)]
    pub pat: Option<String>,
    /// Collection to use when a command doesn't name one
    #[clap(short, long, env = "COLLECTION", global = true)]
    pub collection: Option<String>,
    /// Project to use when a command doesn't name one
    #[clap(long, env = "PROJECT", global = true)]
    pub project: Option<String>,
    /// Minimum level for diagnostics on stderr (DEBUG, INFO, WARN, ERROR)
    #[clap(long, env = "LOGLEVEL", global = true)]
    pub loglevel: Option<String>,
}

impl GlobalArgs {
    /// Reads the config file and layers flags and environment on top of it.
    pub fn load_config(&self) -> Result<TfsutilConfig> {
        let file = TfsutilConfig::from_file(self.config.as_ref())?;
        Ok(file.with_overrides(self.overrides()))
    }

    fn overrides(&self) -> TfsutilConfig {
        TfsutilConfig {
            tfsurl: self.tfsurl.clone(),
            pat: self.pat.clone(),
            collection: self.collection.clone(),
            project: self.project.clone(),
            loglevel: self.loglevel.clone(),
            ..TfsutilConfig::default()
        }
    }
}

/// Resolves the connection settings and builds the API client for them.
pub fn connect(config: &TfsutilConfig) -> Result<(V4Client, ConnectionConfig)> {
    let connection = ConnectionConfig::try_from(config)?;
    let base = BaseClient::try_from(&connection)?;
    Ok((V4Client::new(base), connection))
}
