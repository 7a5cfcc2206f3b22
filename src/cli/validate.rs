use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use family_record::{
    domain::{audit, Issue},
    storage,
};
use tracing::instrument;

use super::terminal::{rule_width, Notice};

#[derive(Debug, Parser)]
#[command(about = "Check a record file for missing required fields")]
pub struct Validate {
    /// The record file to check (YAML, or JSON with a .json extension)
    file: PathBuf,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress all output except errors
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
    Summary,
}

impl Validate {
    #[instrument(level = "debug", skip(self), fields(file = %self.file.display()))]
    pub fn run(self) -> anyhow::Result<()> {
        let data = storage::load(&self.file)
            .with_context(|| format!("failed to load {}", self.file.display()))?;

        let issues = audit(&data);

        if !self.quiet {
            match self.output {
                OutputFormat::Table => self.output_table(&issues, data.member_count()),
                OutputFormat::Json => Self::output_json(&issues)?,
                OutputFormat::Summary => println!("issues={}", issues.len()),
            }
        }

        // Exit with appropriate code
        if !issues.is_empty() {
            std::process::exit(2);
        }

        Ok(())
    }

    fn output_table(&self, issues: &[Issue], members: usize) {
        println!("{}", self.file.display());
        println!("{}", Notice::Aside.paint("─".repeat(rule_width())));

        if issues.is_empty() {
            let summary = format!("✓ All required fields are filled in ({members} members)");
            println!("{}", Notice::Done.paint(summary));
            return;
        }

        for issue in issues {
            println!(
                "  {:<28} {}",
                Notice::Member.paint(issue.subject.to_string()),
                Notice::Incomplete.paint(format!("{} is required", issue.field))
            );
        }
        println!();
        println!(
            "{}",
            Notice::Incomplete.paint(format!("✗ {} required field(s) missing", issues.len()))
        );
    }

    fn output_json(issues: &[Issue]) -> anyhow::Result<()> {
        use serde_json::json;

        let issues_out: Vec<_> = issues
            .iter()
            .map(|issue| {
                json!({
                    "member": issue.subject.to_string(),
                    "field": issue.field.label(),
                })
            })
            .collect();

        let output = json!({
            "status": if issues.is_empty() { "complete" } else { "incomplete" },
            "issues": issues_out,
            "summary": {
                "total_issues": issues.len(),
            }
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}
