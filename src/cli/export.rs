use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use family_record::{storage, Config, FamilyStore};
use tracing::instrument;

use super::terminal::Notice;

#[derive(Debug, Parser)]
#[command(about = "Export a record file as CSV")]
pub struct Export {
    /// The record file to export (YAML, or JSON with a .json extension)
    file: PathBuf,

    /// Directory to write the export to
    #[arg(long, short, value_name = "DIR", default_value = ".")]
    out: PathBuf,

    /// Print the CSV to stdout instead of writing a file
    #[arg(long, conflicts_with = "out")]
    stdout: bool,
}

impl Export {
    /// Handing a complete file to this command counts as submitting it.
    #[instrument(level = "debug", skip(config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let data = storage::load(&self.file)
            .with_context(|| format!("failed to load {}", self.file.display()))?;

        let mut store = FamilyStore::with_data(config, data);
        if let Err(failure) = store.submit() {
            for issue in &failure.issues {
                eprintln!("  • {issue}");
            }
            anyhow::bail!("Please fill in all required fields before exporting");
        }

        let today = chrono::Local::now().date_naive();
        if self.stdout {
            let export = store.export(today)?;
            println!("{}", export.contents);
        } else {
            let path = store.export_to(&self.out, today)?;
            println!(
                "{}",
                Notice::Done.paint(format!("Family data exported to {}", path.display()))
            );
        }

        Ok(())
    }
}
