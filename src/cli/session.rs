use std::{
    io::{self, BufRead, IsTerminal, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use family_record::{
    domain::{audit, Subject},
    storage, Config, ExportError, FamilyData, FamilyStore,
};
use tracing::{debug, instrument};

use super::terminal::Notice;

mod command;
use command::Command;

const HELP: &str = "\
Commands (indices start at 1):
  head <field>=<value>...                  edit the family head
  child add                                add a child
  child <i> set <field>=<value>...         edit a child (also status=married|unmarried)
  child <i> remove                         remove a child
  spouse <i> set <field>=<value>...        edit a married child's spouse (also grandchildren=<n>)
  grandchild <i> add                       add a grandchild to child <i>
  grandchild <i> <j> set <field>=<value>...
  grandchild <i> <j> remove
  phone <i> add <number>                   add an additional phone number to child <i>
  phone <i> <k> set <number>
  phone <i> <k> remove
  show                                     print the record
  validate                                 list missing required fields
  submit                                   submit the record
  export [DIR]                             write the CSV export
  quit                                     end the session

Fields: name, dob (YYYY-MM-DD, empty to clear), occupation, phone.
Quote values containing spaces: name=\"Asha Patil\".";

#[derive(Debug, Parser)]
pub struct Session {
    /// Seed the session with a record file (YAML, or JSON with a .json
    /// extension)
    #[arg(long, value_name = "FILE")]
    from: Option<PathBuf>,

    /// Directory exports are written to unless 'export' is given one
    #[arg(long, short, value_name = "DIR", default_value = ".")]
    out: PathBuf,

    /// Overwrite existing export files without asking
    #[arg(long, short)]
    yes: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            from: None,
            out: PathBuf::from("."),
            yes: false,
        }
    }
}

impl Session {
    #[instrument(level = "debug", skip(config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let data = match &self.from {
            Some(path) => storage::load(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => FamilyData::default(),
        };

        let interactive = io::stdin().is_terminal();
        let overwrite = if self.yes || !interactive {
            Overwrite::Always
        } else {
            Overwrite::Ask
        };

        let mut shell = Shell {
            store: FamilyStore::with_data(config, data),
            out: io::stdout(),
            export_dir: self.out,
            today: chrono::Local::now().date_naive(),
            overwrite,
            exported: true,
        };

        if interactive {
            writeln!(shell.out, "{}", Notice::Aside.paint("Type 'help' for a list of commands."))?;
            loop {
                let line = dialoguer::Input::<String>::new()
                    .with_prompt("family")
                    .allow_empty(true)
                    .interact_text()?;
                if shell.handle_line(&line)? == Flow::Quit {
                    break;
                }
            }
        } else {
            for line in io::stdin().lock().lines() {
                if shell.handle_line(&line?)? == Flow::Quit {
                    break;
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Overwrite {
    Always,
    Ask,
}

/// Executes session commands against a store, writing notices to `out`.
///
/// Every failure caused by the input is reported as a notice and the session
/// carries on; only failures to write to `out` end it.
struct Shell<W> {
    store: FamilyStore,
    out: W,
    export_dir: PathBuf,
    today: NaiveDate,
    overwrite: Overwrite,
    /// Whether the current record has been written to an export.
    exported: bool,
}

impl<W: Write> Shell<W> {
    fn handle_line(&mut self, line: &str) -> io::Result<Flow> {
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            return Ok(Flow::Continue);
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                writeln!(self.out, "{}", Notice::Failed.paint(format!("error: {e}")))?;
                return Ok(Flow::Continue);
            }
        };
        debug!(?command, "session command");

        match command {
            Command::Edit(action) => match self.store.dispatch(action) {
                Ok(()) => {
                    self.exported = false;
                    writeln!(self.out, "{}", Notice::Done.paint("ok"))?;
                }
                Err(e) => writeln!(self.out, "{}", Notice::Failed.paint(format!("error: {e}")))?,
            },
            Command::Show => self.show()?,
            Command::Validate => self.validate()?,
            Command::Submit => match self.store.submit() {
                Ok(()) => writeln!(self.out, "{}", Notice::Done.paint("Record submitted"))?,
                Err(failure) => {
                    let notice = "Please fill in all required fields before submitting";
                    writeln!(self.out, "{}", Notice::Incomplete.paint(notice))?;
                    for issue in &failure.issues {
                        writeln!(self.out, "  • {issue}")?;
                    }
                }
            },
            Command::Export(dir) => {
                let dir = dir.unwrap_or_else(|| self.export_dir.clone());
                self.export(&dir)?;
            }
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Quit => {
                if !self.exported {
                    let notice = "The record has not been exported and will be discarded";
                    writeln!(self.out, "{}", Notice::Blocked.paint(notice))?;
                }
                return Ok(Flow::Quit);
            }
        }
        Ok(Flow::Continue)
    }

    fn show(&mut self) -> io::Result<()> {
        match storage::to_yaml(self.store.data()) {
            Ok(yaml) => write!(self.out, "{yaml}")?,
            Err(e) => writeln!(self.out, "{}", Notice::Failed.paint(format!("error: {e}")))?,
        }
        let status = match (self.store.is_valid(), self.store.is_submitted()) {
            (true, true) => Notice::Done.paint("complete, submitted"),
            (true, false) => Notice::Member.paint("complete, not submitted"),
            (false, _) => Notice::Incomplete.paint("incomplete"),
        };
        writeln!(
            self.out,
            "{} {status}",
            Notice::Aside.paint(format!("# {} members,", self.store.data().member_count()))
        )
    }

    fn validate(&mut self) -> io::Result<()> {
        let issues = audit(self.store.data());
        if issues.is_empty() {
            let notice = "All required fields are filled in";
            return writeln!(self.out, "{}", Notice::Done.paint(notice));
        }
        writeln!(
            self.out,
            "{}",
            Notice::Incomplete.paint(format!("{} required field(s) missing:", issues.len()))
        )?;
        let mut current: Option<Subject> = None;
        for issue in issues {
            if current != Some(issue.subject) {
                writeln!(self.out, "  {}", Notice::Member.paint(issue.subject.to_string()))?;
                current = Some(issue.subject);
            }
            writeln!(self.out, "    • {}", issue.field)?;
        }
        Ok(())
    }

    fn export(&mut self, dir: &Path) -> io::Result<()> {
        let export = match self.store.export(self.today) {
            Ok(export) => export,
            Err(ExportError::NotSubmitted) => {
                return writeln!(
                    self.out,
                    "{}",
                    Notice::Blocked.paint("Please submit the form before exporting data")
                );
            }
            Err(e) => return writeln!(self.out, "{}", Notice::Failed.paint(format!("error: {e}"))),
        };

        let target = dir.join(&export.file_name);
        if target.exists() && self.overwrite == Overwrite::Ask {
            let replace = dialoguer::Confirm::new()
                .with_prompt(format!("{} exists. Overwrite?", target.display()))
                .default(false)
                .interact()
                .map_err(io::Error::other)?;
            if !replace {
                return writeln!(self.out, "Cancelled");
            }
        }

        match family_record::export::write_export(dir, &export) {
            Ok(path) => {
                self.exported = true;
                writeln!(
                    self.out,
                    "{}",
                    Notice::Done.paint(format!("Family data exported to {}", path.display()))
                )
            }
            Err(e) => writeln!(
                self.out,
                "{}",
                Notice::Failed.paint(format!("Failed to export family data: {e}"))
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell(dir: &Path) -> Shell<Vec<u8>> {
        Shell {
            store: FamilyStore::default(),
            out: Vec::new(),
            export_dir: dir.to_path_buf(),
            today: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            overwrite: Overwrite::Always,
            exported: true,
        }
    }

    fn run(shell: &mut Shell<Vec<u8>>, script: &str) -> String {
        shell.out.clear();
        for line in script.lines() {
            if shell.handle_line(line).unwrap() == Flow::Quit {
                break;
            }
        }
        String::from_utf8(shell.out.clone()).unwrap()
    }

    const EXAMPLE: &str = "\
head name=a dob=2000-01-01 occupation=Salaried phone=111
child add
child 1 set name=b dob=1995-01-01 occupation=Business phone=222";

    #[test]
    fn edits_build_the_record() {
        let tmp = tempfile::tempdir().unwrap();
        let mut shell = shell(tmp.path());

        run(&mut shell, EXAMPLE);

        let data = shell.store.data();
        assert_eq!(data.head.name, "A");
        assert_eq!(data.children[0].person.name, "B");
        assert!(shell.store.is_valid());
    }

    #[test]
    fn errors_are_reported_and_session_continues() {
        let tmp = tempfile::tempdir().unwrap();
        let mut shell = shell(tmp.path());

        let output = run(&mut shell, "child 3 remove\nbogus\nchild add");

        assert!(output.contains("error: there is no child 3"));
        assert!(output.contains("unknown command 'bogus'"));
        assert_eq!(shell.store.data().children.len(), 1);
    }

    #[test]
    fn export_requires_submission_then_writes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let mut shell = shell(tmp.path());
        run(&mut shell, EXAMPLE);

        let output = run(&mut shell, "export");
        assert!(output.contains("Please submit the form before exporting data"));

        let output = run(&mut shell, "submit\nexport");
        assert!(output.contains("Record submitted"));
        let path = tmp.path().join("family_data_2024-03-05.csv");
        assert!(output.contains("Family data exported to"));
        assert_eq!(std::fs::read_to_string(path).unwrap().lines().count(), 3);
    }

    #[test]
    fn incomplete_record_cannot_be_submitted() {
        let tmp = tempfile::tempdir().unwrap();
        let mut shell = shell(tmp.path());

        let output = run(&mut shell, "child add\nsubmit");

        assert!(output.contains("Please fill in all required fields before submitting"));
        assert!(output.contains("Child 1: phone number is required"));
        assert!(!shell.store.is_submitted());
    }

    #[test]
    fn validate_groups_issues_by_member() {
        let tmp = tempfile::tempdir().unwrap();
        let mut shell = shell(tmp.path());
        run(&mut shell, EXAMPLE);

        let output = run(&mut shell, "child 1 set status=married\nvalidate");

        assert!(output.contains("1 required field(s) missing"));
        assert!(output.contains("Child 1's Spouse"));
        assert!(output.contains("• name"));
    }

    #[test]
    fn show_prints_record_and_status() {
        let tmp = tempfile::tempdir().unwrap();
        let mut shell = shell(tmp.path());
        run(&mut shell, EXAMPLE);

        let output = run(&mut shell, "show");

        assert!(output.contains("name: A"));
        assert!(output.contains("# 2 members,"));
        assert!(output.contains("complete, not submitted"));
    }

    #[test]
    fn quitting_unexported_record_warns() {
        let tmp = tempfile::tempdir().unwrap();
        let mut shell = shell(tmp.path());

        let output = run(&mut shell, "child add\nquit\nchild add");

        assert!(output.contains("will be discarded"));
        assert_eq!(shell.store.data().children.len(), 1);
    }

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let mut shell = shell(tmp.path());

        let output = run(&mut shell, "# seed\n\n   \n");

        assert!(output.is_empty());
    }
}
