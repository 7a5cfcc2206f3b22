//! Domain models for family records.
//!
//! This module contains the record hierarchy, the immutable update
//! operations on it, the required-field checks, and the store that owns a
//! record while it is being edited.

/// People and their occupations.
pub mod person;
pub use person::{Occupation, ParseOccupationError, Person, PersonUpdate};

/// The family record hierarchy.
pub mod record;
pub use record::{
    Child, ChildUpdate, FamilyData, FamilyHead, Grandchild, MaritalStatus,
    ParseMaritalStatusError, Spouse, SpouseUpdate,
};

mod mutation;
pub use mutation::MutationError;

/// Name normalisation rules.
pub mod policy;
pub use policy::{NameCase, NamePolicy};

pub mod validate;
pub use validate::{audit, is_valid, Field, Issue, Subject, ValidationFailure};

pub mod store;
pub use store::{Action, ExportError, FamilyStore};

mod config;
pub use config::{Config, InvalidSetting};
