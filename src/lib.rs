//! Multi-generational Family Records
//!
//! A family record holds a head, their children, each child's spouse and
//! the children's own children. Records are edited through immutable
//! updates, checked for required fields, and exported as delimited text.

pub mod domain;
pub use domain::{
    Action, Child, Config, ExportError, FamilyData, FamilyStore, MaritalStatus, MutationError,
    Occupation, Person, PersonUpdate, Spouse, ValidationFailure,
};

/// Flattening and serialisation of records for export.
pub mod export;
pub use export::{serialize, CsvExport};

/// Reading records from YAML and JSON files.
pub mod storage;
