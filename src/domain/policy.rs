use serde::{Deserialize, Serialize};

/// A rule applied to every name written into the record.
///
/// The [`FamilyStore`](crate::FamilyStore) runs names through its policy
/// before handing updates to the record, so entities themselves store names
/// exactly as given.
pub trait NamePolicy: std::fmt::Debug {
    /// Returns the normalised form of `name`.
    fn normalize(&self, name: &str) -> String;
}

/// The built-in name policies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameCase {
    /// Names are converted to uppercase.
    #[default]
    Upper,
    /// Names are stored verbatim.
    Preserve,
}

impl NamePolicy for NameCase {
    fn normalize(&self, name: &str) -> String {
        match self {
            Self::Upper => name.to_uppercase(),
            Self::Preserve => name.to_string(),
        }
    }
}
