//! The state container that owns a family record for one editing session.
//!
//! All edits go through [`FamilyStore::dispatch`], which applies the name
//! policy and then the immutable updates on [`FamilyData`]. The store also
//! records whether the current record has been submitted, which gates
//! export when the configuration requires it.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::{
    domain::{
        mutation::MutationError,
        person::PersonUpdate,
        policy::NamePolicy,
        record::{ChildUpdate, FamilyData, SpouseUpdate},
        validate::{is_valid, ValidationFailure},
        Config, InvalidSetting,
    },
    export::{self, CsvExport},
};

/// An edit to the family record.
///
/// Indices are zero-based positions in the record's lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Update the family head.
    UpdateHead(PersonUpdate),
    /// Update a child.
    UpdateChild {
        /// Child index.
        index: usize,
        /// The changes to apply.
        update: ChildUpdate,
    },
    /// Append an empty child.
    AddChild,
    /// Remove a child.
    RemoveChild {
        /// Child index.
        index: usize,
    },
    /// Update the spouse of a married child.
    UpdateSpouse {
        /// Child index.
        child: usize,
        /// The changes to apply.
        update: SpouseUpdate,
    },
    /// Update a grandchild.
    UpdateGrandchild {
        /// Child index.
        child: usize,
        /// Grandchild index.
        index: usize,
        /// The changes to apply.
        update: PersonUpdate,
    },
    /// Append an empty grandchild to a child.
    AddGrandchild {
        /// Child index.
        child: usize,
    },
    /// Remove a grandchild.
    RemoveGrandchild {
        /// Child index.
        child: usize,
        /// Grandchild index.
        index: usize,
    },
    /// Append an additional phone number to a child.
    AddPhoneNumber {
        /// Child index.
        child: usize,
        /// The number to add.
        number: String,
    },
    /// Replace one of a child's additional phone numbers.
    UpdatePhoneNumber {
        /// Child index.
        child: usize,
        /// Phone number index.
        index: usize,
        /// The replacement number.
        number: String,
    },
    /// Remove one of a child's additional phone numbers.
    RemovePhoneNumber {
        /// Child index.
        child: usize,
        /// Phone number index.
        index: usize,
    },
}

/// Errors that can occur when exporting from a [`FamilyStore`].
#[derive(Debug, Error)]
pub enum ExportError {
    /// The record is missing required fields.
    #[error("cannot export: {0}")]
    Validation(#[from] ValidationFailure),
    /// The record must be submitted before it can be exported.
    #[error("cannot export: submit the record first")]
    NotSubmitted,
    /// The store was configured with a delimiter or file prefix that cannot
    /// produce a readable export.
    #[error("cannot export: {0}")]
    Setting(#[from] InvalidSetting),
    /// Writing the export failed.
    #[error("failed to write export: {0}")]
    Serialization(#[from] std::io::Error),
}

/// Owns the family record being edited.
#[derive(Debug)]
pub struct FamilyStore {
    data: FamilyData,
    policy: Box<dyn NamePolicy>,
    delimiter: char,
    file_prefix: String,
    require_submission: bool,
    submitted: bool,
}

impl Default for FamilyStore {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl FamilyStore {
    /// Creates a store holding an empty record.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self::with_data(config, FamilyData::default())
    }

    /// Creates a store holding the given record.
    ///
    /// The record is taken as-is; the name policy only applies to later
    /// edits.
    #[must_use]
    pub fn with_data(config: &Config, data: FamilyData) -> Self {
        Self {
            data,
            policy: Box::new(config.name_case),
            delimiter: config.delimiter,
            file_prefix: config.file_prefix.clone(),
            require_submission: config.require_submission,
            submitted: false,
        }
    }

    /// Replaces the name policy.
    #[must_use]
    pub fn with_policy(mut self, policy: impl NamePolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// The current record.
    #[must_use]
    pub const fn data(&self) -> &FamilyData {
        &self.data
    }

    /// Whether the current record has been submitted.
    ///
    /// Any successful edit clears the flag.
    #[must_use]
    pub const fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Whether the current record passes validation.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        is_valid(&self.data)
    }

    /// Applies an edit to the record.
    ///
    /// # Errors
    ///
    /// Returns a [`MutationError`] if the edit addresses a member that does
    /// not exist. The record is unchanged in that case.
    #[instrument(level = "debug", skip(self))]
    pub fn dispatch(&mut self, action: Action) -> Result<(), MutationError> {
        let data = &self.data;
        let next = match action {
            Action::UpdateHead(update) => data.update_head(&self.normalized(update)),
            Action::UpdateChild { index, update } => {
                let update = ChildUpdate {
                    person: self.normalized(update.person),
                    ..update
                };
                data.update_child(index, &update)?
            }
            Action::AddChild => data.add_child(),
            Action::RemoveChild { index } => data.remove_child(index)?,
            Action::UpdateSpouse { child, update } => {
                let update = SpouseUpdate {
                    person: self.normalized(update.person),
                    ..update
                };
                data.update_spouse(child, &update)?
            }
            Action::UpdateGrandchild {
                child,
                index,
                update,
            } => data.update_grandchild(child, index, &self.normalized(update))?,
            Action::AddGrandchild { child } => data.add_grandchild(child)?,
            Action::RemoveGrandchild { child, index } => data.remove_grandchild(child, index)?,
            Action::AddPhoneNumber { child, number } => data.add_phone_number(child, number)?,
            Action::UpdatePhoneNumber {
                child,
                index,
                number,
            } => data.update_phone_number(child, index, number)?,
            Action::RemovePhoneNumber { child, index } => data.remove_phone_number(child, index)?,
        };

        if next != self.data {
            self.data = next;
            self.submitted = false;
        }
        debug!(members = self.data.member_count(), "applied edit");
        Ok(())
    }

    /// Marks the record as submitted.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationFailure`] listing every missing field if the
    /// record is incomplete. The record stays unsubmitted in that case.
    #[instrument(level = "debug", skip(self))]
    pub fn submit(&mut self) -> Result<(), ValidationFailure> {
        ValidationFailure::check(&self.data)?;
        self.submitted = true;
        info!(members = self.data.member_count(), "record submitted");
        Ok(())
    }

    /// Serialises the record for export on the given day.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Validation`] if the record is incomplete, or
    /// [`ExportError::NotSubmitted`] if submission is required and has not
    /// happened since the last edit. A delimiter or file prefix that fails
    /// the [`Config`] checks gives [`ExportError::Setting`].
    #[instrument(level = "debug", skip(self))]
    pub fn export(&self, today: NaiveDate) -> Result<CsvExport, ExportError> {
        Config::check_delimiter(self.delimiter)?;
        Config::check_file_prefix(&self.file_prefix)?;
        ValidationFailure::check(&self.data)?;
        if self.require_submission && !self.submitted {
            return Err(ExportError::NotSubmitted);
        }
        Ok(CsvExport {
            file_name: export::file_name(&self.file_prefix, today),
            contents: export::serialize_with(&self.data, self.delimiter),
        })
    }

    /// Exports the record into a file in `dir`, returning its path.
    ///
    /// # Errors
    ///
    /// Fails as [`FamilyStore::export`] does, or with
    /// [`ExportError::Serialization`] if the file cannot be written.
    pub fn export_to(&self, dir: &Path, today: NaiveDate) -> Result<PathBuf, ExportError> {
        let export = self.export(today)?;
        let path = export::write_export(dir, &export)?;
        info!(path = %path.display(), "record exported");
        Ok(path)
    }

    fn normalized(&self, mut update: PersonUpdate) -> PersonUpdate {
        update.name = update.name.map(|name| self.policy.normalize(&name));
        update
    }
}
