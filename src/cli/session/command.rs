//! Parsing of session input lines.
//!
//! Indices typed by the user are one-based, matching the relationship labels
//! in exports ("Child 1"). They are converted to zero-based positions here.

use std::{num::NonZeroUsize, path::PathBuf};

use chrono::NaiveDate;
use family_record::{
    domain::{ChildUpdate, ParseMaritalStatusError, SpouseUpdate},
    Action, MaritalStatus, Occupation, PersonUpdate,
};

/// A parsed session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Edit(Action),
    Show,
    Validate,
    Submit,
    Export(Option<PathBuf>),
    Help,
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command '{0}' (try 'help')")]
    UnknownCommand(String),
    #[error("missing {0}")]
    Missing(&'static str),
    #[error("unexpected argument '{0}'")]
    Unexpected(String),
    #[error("'{0}' is not a valid index (indices start at 1)")]
    InvalidIndex(String),
    #[error("expected <field>=<value>, got '{0}'")]
    MalformedAssignment(String),
    #[error("unknown field '{field}' for {target}")]
    UnknownField { field: String, target: &'static str },
    #[error("'{0}' is not a date (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("'{0}' is not a non-negative number")]
    InvalidNumber(String),
    #[error(transparent)]
    MaritalStatus(#[from] ParseMaritalStatusError),
    #[error("unterminated quote")]
    UnterminatedQuote,
}

impl std::str::FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let tokens = tokenize(line)?;
        let mut args = tokens.iter().map(String::as_str);
        let Some(keyword) = args.next() else {
            return Err(ParseError::Missing("command"));
        };

        let command = match keyword.to_ascii_lowercase().as_str() {
            "head" => Self::Edit(Action::UpdateHead(person_update(args, "the head")?)),
            "child" => child(args)?,
            "spouse" => {
                let child = index(args.next(), "child index")?;
                expect_keyword(args.next(), "set")?;
                Self::Edit(Action::UpdateSpouse {
                    child,
                    update: spouse_update(args)?,
                })
            }
            "grandchild" => grandchild(args)?,
            "phone" => phone(args)?,
            "show" => no_args(args, Self::Show)?,
            "validate" => no_args(args, Self::Validate)?,
            "submit" => no_args(args, Self::Submit)?,
            "export" => {
                let dir = args.next().map(PathBuf::from);
                no_args(args, Self::Export(dir))?
            }
            "help" | "?" => Self::Help,
            "quit" | "exit" => no_args(args, Self::Quit)?,
            other => return Err(ParseError::UnknownCommand(other.to_string())),
        };
        Ok(command)
    }
}

fn child<'a>(mut args: impl Iterator<Item = &'a str>) -> Result<Command, ParseError> {
    let first = args.next().ok_or(ParseError::Missing("child index or 'add'"))?;
    if first.eq_ignore_ascii_case("add") {
        return no_args(args, Command::Edit(Action::AddChild));
    }
    let index = index(Some(first), "child index")?;
    let action = match args.next().map(str::to_ascii_lowercase).as_deref() {
        Some("set") => Action::UpdateChild {
            index,
            update: child_update(args)?,
        },
        Some("remove") => no_args(args, Action::RemoveChild { index })?,
        Some(other) => return Err(ParseError::Unexpected(other.to_string())),
        None => return Err(ParseError::Missing("'set' or 'remove'")),
    };
    Ok(Command::Edit(action))
}

fn grandchild<'a>(mut args: impl Iterator<Item = &'a str>) -> Result<Command, ParseError> {
    let child = index(args.next(), "child index")?;
    let second = args
        .next()
        .ok_or(ParseError::Missing("grandchild index or 'add'"))?;
    if second.eq_ignore_ascii_case("add") {
        return no_args(args, Command::Edit(Action::AddGrandchild { child }));
    }
    let index = index(Some(second), "grandchild index")?;
    let action = match args.next().map(str::to_ascii_lowercase).as_deref() {
        Some("set") => Action::UpdateGrandchild {
            child,
            index,
            update: person_update(args, "a grandchild")?,
        },
        Some("remove") => no_args(args, Action::RemoveGrandchild { child, index })?,
        Some(other) => return Err(ParseError::Unexpected(other.to_string())),
        None => return Err(ParseError::Missing("'set' or 'remove'")),
    };
    Ok(Command::Edit(action))
}

fn phone<'a>(mut args: impl Iterator<Item = &'a str>) -> Result<Command, ParseError> {
    let child = index(args.next(), "child index")?;
    let second = args
        .next()
        .ok_or(ParseError::Missing("phone index or 'add'"))?;
    if second.eq_ignore_ascii_case("add") {
        let number = args.next().ok_or(ParseError::Missing("phone number"))?;
        return no_args(
            args,
            Command::Edit(Action::AddPhoneNumber {
                child,
                number: number.to_string(),
            }),
        );
    }
    let index = index(Some(second), "phone index")?;
    let action = match args.next().map(str::to_ascii_lowercase).as_deref() {
        Some("set") => {
            let number = args.next().ok_or(ParseError::Missing("phone number"))?;
            no_args(
                args,
                Action::UpdatePhoneNumber {
                    child,
                    index,
                    number: number.to_string(),
                },
            )?
        }
        Some("remove") => no_args(args, Action::RemovePhoneNumber { child, index })?,
        Some(other) => return Err(ParseError::Unexpected(other.to_string())),
        None => return Err(ParseError::Missing("'set' or 'remove'")),
    };
    Ok(Command::Edit(action))
}

fn person_update<'a>(
    args: impl Iterator<Item = &'a str>,
    target: &'static str,
) -> Result<PersonUpdate, ParseError> {
    let mut update = PersonUpdate::default();
    for (field, value) in assignments(args)? {
        if !apply_person_field(&mut update, field, value)? {
            return Err(unknown_field(field, target));
        }
    }
    if update.is_empty() {
        return Err(ParseError::Missing("<field>=<value>"));
    }
    Ok(update)
}

fn child_update<'a>(args: impl Iterator<Item = &'a str>) -> Result<ChildUpdate, ParseError> {
    let mut update = ChildUpdate::default();
    for (field, value) in assignments(args)? {
        if apply_person_field(&mut update.person, field, value)? {
            continue;
        }
        match field {
            "status" => update.marital_status = Some(value.parse::<MaritalStatus>()?),
            _ => return Err(unknown_field(field, "a child")),
        }
    }
    if update == ChildUpdate::default() {
        return Err(ParseError::Missing("<field>=<value>"));
    }
    Ok(update)
}

fn spouse_update<'a>(args: impl Iterator<Item = &'a str>) -> Result<SpouseUpdate, ParseError> {
    let mut update = SpouseUpdate::default();
    for (field, value) in assignments(args)? {
        if apply_person_field(&mut update.person, field, value)? {
            continue;
        }
        match field {
            "grandchildren" => {
                let count = value
                    .parse()
                    .map_err(|_| ParseError::InvalidNumber(value.to_string()))?;
                update.number_of_grandchildren = Some(count);
            }
            _ => return Err(unknown_field(field, "a spouse")),
        }
    }
    if update == SpouseUpdate::default() {
        return Err(ParseError::Missing("<field>=<value>"));
    }
    Ok(update)
}

/// Applies one of the common person fields. Returns `false` if `field` is not
/// a person field.
fn apply_person_field(
    update: &mut PersonUpdate,
    field: &str,
    value: &str,
) -> Result<bool, ParseError> {
    match field {
        "name" => update.name = Some(value.to_string()),
        "dob" => {
            update.dob = Some(if value.is_empty() {
                None
            } else {
                Some(parse_date(value)?)
            });
        }
        "occupation" => update.occupation = Some(value.parse::<Occupation>().ok()),
        "phone" => update.phone_number = Some(value.to_string()),
        _ => return Ok(false),
    }
    Ok(true)
}

fn parse_date(value: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ParseError::InvalidDate(value.to_string()))
}

fn assignments<'a>(
    args: impl Iterator<Item = &'a str>,
) -> Result<Vec<(&'a str, &'a str)>, ParseError> {
    args.map(|arg| {
        arg.split_once('=')
            .ok_or_else(|| ParseError::MalformedAssignment(arg.to_string()))
    })
    .collect()
}

fn unknown_field(field: &str, target: &'static str) -> ParseError {
    ParseError::UnknownField {
        field: field.to_string(),
        target,
    }
}

fn index(token: Option<&str>, what: &'static str) -> Result<usize, ParseError> {
    let token = token.ok_or(ParseError::Missing(what))?;
    token
        .parse::<NonZeroUsize>()
        .map(|n| n.get() - 1)
        .map_err(|_| ParseError::InvalidIndex(token.to_string()))
}

fn expect_keyword(token: Option<&str>, keyword: &'static str) -> Result<(), ParseError> {
    match token {
        Some(token) if token.eq_ignore_ascii_case(keyword) => Ok(()),
        Some(token) => Err(ParseError::Unexpected(token.to_string())),
        None => Err(ParseError::Missing(keyword)),
    }
}

fn no_args<'a, T>(mut args: impl Iterator<Item = &'a str>, value: T) -> Result<T, ParseError> {
    match args.next() {
        Some(extra) => Err(ParseError::Unexpected(extra.to_string())),
        None => Ok(value),
    }
}

/// Splits a line on whitespace, keeping double-quoted sections together.
///
/// Quotes may appear anywhere in a token, so `name="Asha Patil"` is a single
/// token `name=Asha Patil`.
fn tokenize(line: &str) -> Result<Vec<String>, ParseError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quoted {
        return Err(ParseError::UnterminatedQuote);
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}
