use clap::Parser;

mod commands;
mod tfs;

use anyhow::Result;
use commands::config::model::ConfigCommand;
use commands::project::model::ProjectCommand;
use commands::vg::model::VgCommand;
use commands::GlobalArgs;
use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use tfs::config::LogLevel;

const LONG_ABOUT: &str = "A set of command line utilities to make your life a little easier \
when working with Team Foundation Server.

NOTE: tfsutil uses the TFS API and it requires credentials. To set the personal access \
token (PAT) credentials used with each command, pass them in using flags or create a \
config file.";

#[derive(Parser)]
#[clap(name = "tfsutil", bin_name = "tfsutil", version, about, long_about = LONG_ABOUT)]
struct TfsutilApp {
    #[clap(flatten)]
    global: GlobalArgs,
    #[clap(subcommand)]
    command: TfsutilCommand,
}

#[derive(Parser)]
enum TfsutilCommand {
    #[clap(subcommand)]
    Project(ProjectCommand),
    #[clap(subcommand)]
    Vg(VgCommand),
    #[clap(subcommand)]
    Config(ConfigCommand),
}

impl TfsutilApp {
    pub async fn run(&self) -> Result<()> {
        let config = self.global.load_config()?;
        setup_logging(config.log_level())?;
        if let Some((level, notice)) = config.source_notice() {
            log::log!(level, "{notice}");
        }

        match &self.command {
            TfsutilCommand::Project(cmd) => cmd.run(&config).await,
            TfsutilCommand::Vg(cmd) => cmd.run(&config).await,
            TfsutilCommand::Config(cmd) => cmd.run(),
        }
    }
}

fn setup_logging(log_level: LogLevel) -> Result<()> {
    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();

    TermLogger::init(
        log_level.into(),
        config,
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let app = TfsutilApp::parse();
    app.run().await
}
