use std::path::Path;

use family_record::{domain::NameCase, Config};
use tracing::instrument;

use super::terminal::Notice;

#[derive(Debug, clap::Parser)]
/// Show or modify configuration
///
/// Configuration is stored in a TOML file (default: .family.toml in the
/// working directory). A missing file means the defaults apply.
///
/// Available configuration keys:
///   delimiter           Column delimiter for exports (default: ',')
///   `name_case`           upper or preserve (default: upper)
///   `require_submission`  Require 'submit' before 'export' (default: true)
///   `file_prefix`         Export file name prefix (default: `family_data`)
pub struct Command {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Debug, clap::Parser)]
enum ConfigCommand {
    /// Show all configuration values
    Show,

    /// Write a configuration file containing the defaults
    Init {
        /// Replace an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Set a configuration value
    ///
    /// Examples:
    ///   family config set delimiter ';'
    ///   family config set `name_case` preserve
    Set {
        /// Configuration key to set
        key: String,

        /// Value to set
        value: String,
    },
}

impl Command {
    #[instrument]
    pub fn run(self, config_path: &Path) -> anyhow::Result<()> {
        match self.command {
            ConfigCommand::Show => Self::show_config(config_path),
            ConfigCommand::Init { force } => Self::init_config(config_path, force),
            ConfigCommand::Set { key, value } => Self::set_config(config_path, &key, &value),
        }
    }

    fn show_config(config_path: &Path) -> anyhow::Result<()> {
        let config = Config::load_or_default(config_path).map_err(|e| anyhow::anyhow!("{e}"))?;

        println!("Configuration:");
        println!("  delimiter: {:?}", config.delimiter);
        println!("  name_case: {}", name_case_str(config.name_case));
        println!(
            "  require_submission: {} ({})",
            config.require_submission,
            if config.require_submission {
                Notice::Aside.paint("submit before export")
            } else {
                Notice::Aside.paint("export any complete record")
            }
        );
        println!("  file_prefix: {}", config.file_prefix);
        if !config_path.exists() {
            let note = format!("(defaults; {} not found)", config_path.display());
            println!("{}", Notice::Aside.paint(note));
        }
        Ok(())
    }

    fn init_config(config_path: &Path, force: bool) -> anyhow::Result<()> {
        if config_path.exists() && !force {
            anyhow::bail!(
                "{} already exists (use --force to replace it)",
                config_path.display()
            );
        }
        Config::default()
            .save(config_path)
            .map_err(|e| anyhow::anyhow!("{e}"))?;
        println!("{}", Notice::Done.paint(format!("Created {}", config_path.display())));
        Ok(())
    }

    fn set_config(config_path: &Path, key: &str, value: &str) -> anyhow::Result<()> {
        let mut config =
            Config::load_or_default(config_path).map_err(|e| anyhow::anyhow!("{e}"))?;
        Self::apply(&mut config, key, value)?;
        config
            .save(config_path)
            .map_err(|e| anyhow::anyhow!("{e}"))?;
        println!("{}", Notice::Done.paint(format!("Set {key} = {value}")));
        Ok(())
    }

    fn apply(config: &mut Config, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "delimiter" => {
                let mut chars = value.chars();
                config.delimiter = match (chars.next(), chars.next()) {
                    (Some(c), None) => Config::check_delimiter(c)?,
                    _ => anyhow::bail!("delimiter must be a single character"),
                };
            }
            "name_case" => {
                config.name_case = match value.to_ascii_lowercase().as_str() {
                    "upper" => NameCase::Upper,
                    "preserve" => NameCase::Preserve,
                    _ => anyhow::bail!("name_case must be 'upper' or 'preserve'"),
                };
            }
            "require_submission" => {
                config.require_submission = value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("require_submission must be true or false"))?;
            }
            "file_prefix" => {
                config.file_prefix = Config::check_file_prefix(value)?.to_string();
            }
            _ => anyhow::bail!(
                "Unknown configuration key: {key}\nAvailable keys: delimiter, name_case, \
                 require_submission, file_prefix"
            ),
        }
        Ok(())
    }
}

const fn name_case_str(name_case: NameCase) -> &'static str {
    match name_case {
        NameCase::Upper => "upper",
        NameCase::Preserve => "preserve",
    }
}
