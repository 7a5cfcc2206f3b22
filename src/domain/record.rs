//! The family record hierarchy.
//!
//! A [`FamilyData`] owns its whole tree by value: one head, an ordered list
//! of children, and below each child an optional spouse and an ordered list
//! of grandchildren. Positions in these lists are the only identity an
//! entity has.

use std::{fmt, str::FromStr};

use crate::domain::person::{Person, PersonUpdate};

/// The root person of the record.
pub type FamilyHead = Person;

/// A child of a [`Child`]. Grandchildren carry only the common person fields.
pub type Grandchild = Person;

/// Whether a child is married.
///
/// Only married children have their spouse validated and exported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MaritalStatus {
    /// Has a spouse.
    Married,
    /// Has no spouse.
    #[default]
    Unmarried,
}

impl MaritalStatus {
    /// The label used when displaying or exporting the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Married => "Married",
            Self::Unmarried => "Unmarried",
        }
    }
}

impl fmt::Display for MaritalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a marital status cannot be parsed.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid marital status '{0}': expected 'married' or 'unmarried'")]
pub struct ParseMaritalStatusError(String);

impl FromStr for MaritalStatus {
    type Err = ParseMaritalStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "married" => Ok(Self::Married),
            "unmarried" => Ok(Self::Unmarried),
            _ => Err(ParseMaritalStatusError(s.to_string())),
        }
    }
}

/// The spouse of a married child.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Spouse {
    /// The common person fields.
    pub person: Person,
    /// How many grandchildren the couple has.
    pub number_of_grandchildren: u32,
}

impl Spouse {
    /// Returns a copy of this spouse with the given partial update applied.
    #[must_use]
    pub fn merged(&self, update: &SpouseUpdate) -> Self {
        Self {
            person: self.person.merged(&update.person),
            number_of_grandchildren: update
                .number_of_grandchildren
                .unwrap_or(self.number_of_grandchildren),
        }
    }
}

/// A partial update to a [`Spouse`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpouseUpdate {
    /// Changes to the common person fields.
    pub person: PersonUpdate,
    /// Replacement grandchild count.
    pub number_of_grandchildren: Option<u32>,
}

/// A child of the family head.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Child {
    /// The common person fields.
    pub person: Person,
    /// Phone numbers beyond the primary one, in entry order.
    pub additional_phone_numbers: Vec<String>,
    /// Whether the child is married.
    pub marital_status: MaritalStatus,
    /// The spouse record.
    ///
    /// Always present while the child is married. It is kept, but ignored,
    /// when the child is later marked unmarried.
    pub spouse: Option<Spouse>,
    /// The child's own children, in entry order.
    pub children: Vec<Grandchild>,
}

impl Child {
    /// Returns `true` if the child is married.
    #[must_use]
    pub fn is_married(&self) -> bool {
        self.marital_status == MaritalStatus::Married
    }

    /// The spouse, if the child is married.
    ///
    /// A spouse retained from an earlier marriage is not returned.
    #[must_use]
    pub fn active_spouse(&self) -> Option<&Spouse> {
        self.spouse.as_ref().filter(|_| self.is_married())
    }

    /// Returns a copy of this child with the given partial update applied.
    ///
    /// Marking the child married creates an empty spouse if there is none.
    #[must_use]
    pub fn merged(&self, update: &ChildUpdate) -> Self {
        let marital_status = update.marital_status.unwrap_or(self.marital_status);
        let spouse = match (&self.spouse, marital_status) {
            (None, MaritalStatus::Married) => Some(Spouse::default()),
            (spouse, _) => spouse.clone(),
        };

        Self {
            person: self.person.merged(&update.person),
            additional_phone_numbers: update
                .additional_phone_numbers
                .clone()
                .unwrap_or_else(|| self.additional_phone_numbers.clone()),
            marital_status,
            spouse,
            children: self.children.clone(),
        }
    }
}

/// A partial update to a [`Child`].
///
/// The spouse and grandchildren are changed through their own operations on
/// [`FamilyData`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildUpdate {
    /// Changes to the common person fields.
    pub person: PersonUpdate,
    /// Replacement list of additional phone numbers.
    pub additional_phone_numbers: Option<Vec<String>>,
    /// Replacement marital status.
    pub marital_status: Option<MaritalStatus>,
}

impl ChildUpdate {
    /// An update that changes only the marital status.
    #[must_use]
    pub fn marital_status(status: MaritalStatus) -> Self {
        Self {
            marital_status: Some(status),
            ..Self::default()
        }
    }
}

impl From<PersonUpdate> for ChildUpdate {
    fn from(person: PersonUpdate) -> Self {
        Self {
            person,
            ..Self::default()
        }
    }
}

impl From<PersonUpdate> for SpouseUpdate {
    fn from(person: PersonUpdate) -> Self {
        Self {
            person,
            ..Self::default()
        }
    }
}

/// A complete family record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FamilyData {
    /// The head of the family.
    pub head: FamilyHead,
    /// The head's children, in entry order.
    pub children: Vec<Child>,
}

impl FamilyData {
    /// The number of people in the record who would appear in an export.
    ///
    /// This counts the head, every child, the spouse of every married child
    /// and every grandchild.
    #[must_use]
    pub fn member_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|child| {
                1 + usize::from(child.active_spouse().is_some()) + child.children.len()
            })
            .sum::<usize>()
    }
}
