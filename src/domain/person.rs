use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use non_empty_string::NonEmptyString;

/// The occupation of a person in the record.
///
/// The four named variants are the options offered when capturing a record.
/// [`Occupation::Other`] is the extension point for anything else; it holds
/// the free text exactly as entered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Occupation {
    /// Employed on a salary.
    Salaried,
    /// Runs a business.
    Business,
    /// Manages the household.
    Housewife,
    /// No longer working.
    Retired,
    /// Any occupation outside the named set.
    Other(NonEmptyString),
}

impl Occupation {
    /// The named occupations, in the order they are offered.
    pub const NAMED: [Self; 4] = [
        Self::Salaried,
        Self::Business,
        Self::Housewife,
        Self::Retired,
    ];

    /// The label used when displaying or exporting the occupation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Salaried => "Salaried",
            Self::Business => "Business",
            Self::Housewife => "Housewife",
            Self::Retired => "Retired",
            Self::Other(text) => text.as_str(),
        }
    }
}

impl fmt::Display for Occupation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an occupation from blank text.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("occupation must not be blank")]
pub struct ParseOccupationError;

impl FromStr for Occupation {
    type Err = ParseOccupationError;

    /// Named occupations match case-insensitively. Any other non-blank text
    /// becomes [`Occupation::Other`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(named) = Self::NAMED
            .into_iter()
            .find(|named| named.as_str().eq_ignore_ascii_case(trimmed))
        {
            return Ok(named);
        }
        NonEmptyString::new(trimmed.to_string())
            .map(Self::Other)
            .map_err(|_| ParseOccupationError)
    }
}

/// The fields shared by every member of the family record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Person {
    /// Full name.
    pub name: String,
    /// Date of birth, if known.
    pub dob: Option<NaiveDate>,
    /// Occupation, if given.
    pub occupation: Option<Occupation>,
    /// Primary phone number.
    pub phone_number: String,
}

impl Person {
    /// Returns a copy of this person with the given partial update applied.
    ///
    /// Fields left as `None` in the update are kept.
    #[must_use]
    pub fn merged(&self, update: &PersonUpdate) -> Self {
        Self {
            name: update.name.clone().unwrap_or_else(|| self.name.clone()),
            dob: update.dob.unwrap_or(self.dob),
            occupation: update
                .occupation
                .clone()
                .unwrap_or_else(|| self.occupation.clone()),
            phone_number: update
                .phone_number
                .clone()
                .unwrap_or_else(|| self.phone_number.clone()),
        }
    }
}

/// A partial update to a [`Person`].
///
/// Every field is optional; `None` leaves the current value untouched. The
/// nested options on `dob` and `occupation` allow a value to be cleared:
/// `Some(None)` removes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonUpdate {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement date of birth.
    pub dob: Option<Option<NaiveDate>>,
    /// Replacement occupation.
    pub occupation: Option<Option<Occupation>>,
    /// Replacement phone number.
    pub phone_number: Option<String>,
}

impl PersonUpdate {
    /// Sets the name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the date of birth.
    #[must_use]
    pub fn dob(mut self, dob: NaiveDate) -> Self {
        self.dob = Some(Some(dob));
        self
    }

    /// Clears the date of birth.
    #[must_use]
    pub fn clear_dob(mut self) -> Self {
        self.dob = Some(None);
        self
    }

    /// Sets the occupation.
    #[must_use]
    pub fn occupation(mut self, occupation: Occupation) -> Self {
        self.occupation = Some(Some(occupation));
        self
    }

    /// Clears the occupation.
    #[must_use]
    pub fn clear_occupation(mut self) -> Self {
        self.occupation = Some(None);
        self
    }

    /// Sets the phone number.
    #[must_use]
    pub fn phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    /// Returns `true` if the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.dob.is_none()
            && self.occupation.is_none()
            && self.phone_number.is_none()
    }
}

/// Returns `true` if the string is empty or only whitespace.
pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("Salaried", &Occupation::Salaried; "exact")]
    #[test_case("business", &Occupation::Business; "lowercase")]
    #[test_case("  HOUSEWIFE ", &Occupation::Housewife; "padded uppercase")]
    #[test_case("retired", &Occupation::Retired; "retired")]
    fn named_occupations_parse_case_insensitively(input: &str, expected: &Occupation) {
        assert_eq!(&input.parse::<Occupation>().unwrap(), expected);
    }

    #[test]
    fn free_text_occupation_is_other() {
        let occupation: Occupation = "Teacher, retired".parse().unwrap();
        assert_eq!(occupation.as_str(), "Teacher, retired");
        assert!(matches!(occupation, Occupation::Other(_)));
    }

    #[test]
    fn blank_occupation_is_rejected() {
        assert_eq!("   ".parse::<Occupation>(), Err(ParseOccupationError));
        assert_eq!("".parse::<Occupation>(), Err(ParseOccupationError));
    }

    #[test]
    fn merge_keeps_untouched_fields() {
        let dob = NaiveDate::from_ymd_opt(1970, 5, 17).unwrap();
        let person = Person {
            name: "RAVI".to_string(),
            dob: Some(dob),
            occupation: Some(Occupation::Business),
            phone_number: "111".to_string(),
        };

        let merged = person.merged(&PersonUpdate::default().phone_number("222"));

        assert_eq!(merged.name, "RAVI");
        assert_eq!(merged.dob, Some(dob));
        assert_eq!(merged.occupation, Some(Occupation::Business));
        assert_eq!(merged.phone_number, "222");
    }

    #[test]
    fn merge_can_clear_optional_fields() {
        let person = Person {
            dob: NaiveDate::from_ymd_opt(1970, 5, 17),
            occupation: Some(Occupation::Retired),
            ..Person::default()
        };

        let merged = person.merged(&PersonUpdate::default().clear_dob().clear_occupation());

        assert_eq!(merged.dob, None);
        assert_eq!(merged.occupation, None);
    }

    #[test]
    fn empty_update_is_detected() {
        assert!(PersonUpdate::default().is_empty());
        assert!(!PersonUpdate::default().name("x").is_empty());
    }
}
