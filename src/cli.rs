use std::path::PathBuf;

mod config;
mod export;
mod session;
mod terminal;
mod validate;

use clap::ArgAction;
use export::Export;
use family_record::Config;
use session::Session;
use validate::Validate;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global=true)]
    verbose: u8,

    /// The path to the configuration file
    #[arg(long, default_value = ".family.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::Session(Session::default()))
            .run(&self.config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Edit a family record interactively (default)
    ///
    /// The record lives only as long as the session. Use 'export' inside the
    /// session to write it out as CSV.
    Session(Session),

    /// Check a record file for missing required fields
    Validate(Validate),

    /// Export a record file as CSV
    Export(Export),

    /// Show or modify configuration settings
    Config(config::Command),
}

impl Command {
    fn run(self, config_path: &PathBuf) -> anyhow::Result<()> {
        match self {
            Self::Session(command) => command.run(&load_config(config_path)?)?,
            Self::Validate(command) => command.run()?,
            Self::Export(command) => command.run(&load_config(config_path)?)?,
            Self::Config(command) => command.run(config_path)?,
        }
        Ok(())
    }
}

fn load_config(path: &PathBuf) -> anyhow::Result<Config> {
    Config::load_or_default(path).map_err(|e| anyhow::anyhow!("{e}"))
}
