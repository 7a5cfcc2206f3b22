//! Required-field checks over a family record.
//!
//! [`is_valid`] is the pass/fail gate used before submission and export; it
//! stops at the first missing field. [`audit`] walks the whole record and
//! reports every missing field.

use std::{fmt, ops::ControlFlow};

use crate::domain::{
    person::{is_blank, Person},
    record::FamilyData,
};

/// The member of the record an [`Issue`] refers to.
///
/// Indices are zero-based; [`fmt::Display`] renders the one-based
/// relationship label used in exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    /// The family head.
    Head,
    /// A child of the head.
    Child(usize),
    /// The spouse of a child.
    Spouse(usize),
    /// A grandchild, addressed by child and grandchild index.
    Grandchild(usize, usize),
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Head => write!(f, "Family Head"),
            Self::Child(child) => write!(f, "Child {}", child + 1),
            Self::Spouse(child) => write!(f, "Child {}'s Spouse", child + 1),
            Self::Grandchild(child, grandchild) => {
                write!(f, "Child {}'s Child {}", child + 1, grandchild + 1)
            }
        }
    }
}

/// A required field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// The person's name.
    Name,
    /// The person's date of birth.
    Dob,
    /// The person's occupation.
    Occupation,
    /// The person's primary phone number.
    PhoneNumber,
}

impl Field {
    /// A human-readable name for the field.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Dob => "date of birth",
            Self::Occupation => "occupation",
            Self::PhoneNumber => "phone number",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A required field that has no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Issue {
    /// Who the field belongs to.
    pub subject: Subject,
    /// The missing field.
    pub field: Field,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} is required", self.subject, self.field)
    }
}

/// Error returned when a record is missing required fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} required field(s) missing, first: {}", .issues.len(), first_issue(.issues))]
pub struct ValidationFailure {
    /// Every missing field, in record order.
    pub issues: Vec<Issue>,
}

fn first_issue(issues: &[Issue]) -> String {
    issues
        .first()
        .map_or_else(|| "none".to_string(), ToString::to_string)
}

impl ValidationFailure {
    /// Audits `data`, returning an error listing every missing field.
    ///
    /// # Errors
    ///
    /// Returns the failure if any required field is missing.
    pub fn check(data: &FamilyData) -> Result<(), Self> {
        let issues = audit(data);
        if issues.is_empty() {
            Ok(())
        } else {
            Err(Self { issues })
        }
    }
}

/// Returns `true` if every required field in the record has a value.
#[must_use]
pub fn is_valid(data: &FamilyData) -> bool {
    walk(data, &mut |_| ControlFlow::Break(())).is_continue()
}

/// Returns every missing required field, in record order.
#[must_use]
pub fn audit(data: &FamilyData) -> Vec<Issue> {
    let mut issues = Vec::new();
    let _ = walk(data, &mut |issue| {
        issues.push(issue);
        ControlFlow::<()>::Continue(())
    });
    issues
}

/// Visits every missing required field in record order.
///
/// The visitor decides whether to keep going.
fn walk<B>(data: &FamilyData, visit: &mut impl FnMut(Issue) -> ControlFlow<B>) -> ControlFlow<B> {
    check_person(Subject::Head, &data.head, &ALL_FIELDS, visit)?;

    for (index, child) in data.children.iter().enumerate() {
        check_person(Subject::Child(index), &child.person, &ALL_FIELDS, visit)?;

        if let Some(spouse) = child.active_spouse() {
            check_person(Subject::Spouse(index), &spouse.person, &[Field::Name], visit)?;
        }

        for (grandchild_index, grandchild) in child.children.iter().enumerate() {
            check_person(
                Subject::Grandchild(index, grandchild_index),
                grandchild,
                &[Field::Name, Field::Dob],
                visit,
            )?;
        }
    }

    ControlFlow::Continue(())
}

const ALL_FIELDS: [Field; 4] = [Field::Name, Field::Dob, Field::Occupation, Field::PhoneNumber];

fn check_person<B>(
    subject: Subject,
    person: &Person,
    required: &[Field],
    visit: &mut impl FnMut(Issue) -> ControlFlow<B>,
) -> ControlFlow<B> {
    for &field in required {
        let missing = match field {
            Field::Name => is_blank(&person.name),
            Field::Dob => person.dob.is_none(),
            Field::Occupation => person.occupation.is_none(),
            Field::PhoneNumber => is_blank(&person.phone_number),
        };
        if missing {
            visit(Issue { subject, field })?;
        }
    }
    ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use test_case::test_case;

    use super::*;
    use crate::domain::{
        person::Occupation,
        record::{Child, MaritalStatus, Spouse},
    };

    fn complete(name: &str) -> Person {
        Person {
            name: name.to_string(),
            dob: NaiveDate::from_ymd_opt(1990, 6, 1),
            occupation: Some(Occupation::Salaried),
            phone_number: "9876543210".to_string(),
        }
    }

    fn complete_family() -> FamilyData {
        FamilyData {
            head: complete("HEAD"),
            children: vec![Child {
                person: complete("CHILD"),
                marital_status: MaritalStatus::Married,
                spouse: Some(Spouse {
                    person: Person {
                        name: "SPOUSE".to_string(),
                        ..Person::default()
                    },
                    number_of_grandchildren: 1,
                }),
                children: vec![Person {
                    name: "GRANDCHILD".to_string(),
                    dob: NaiveDate::from_ymd_opt(2015, 3, 9),
                    ..Person::default()
                }],
                ..Child::default()
            }],
        }
    }

    #[test]
    fn complete_family_is_valid() {
        let data = complete_family();
        assert!(is_valid(&data));
        assert!(audit(&data).is_empty());
        assert_eq!(ValidationFailure::check(&data), Ok(()));
    }

    #[test]
    fn empty_record_is_invalid() {
        let data = FamilyData::default();
        assert!(!is_valid(&data));
        assert_eq!(audit(&data).len(), 4);
    }

    #[test_case(|d: &mut FamilyData| d.head.name.clear(), Subject::Head, Field::Name; "head name")]
    #[test_case(|d: &mut FamilyData| d.head.dob = None, Subject::Head, Field::Dob; "head dob")]
    #[test_case(|d: &mut FamilyData| d.head.occupation = None, Subject::Head, Field::Occupation; "head occupation")]
    #[test_case(|d: &mut FamilyData| d.head.phone_number = "  ".into(), Subject::Head, Field::PhoneNumber; "head phone blank")]
    #[test_case(|d: &mut FamilyData| d.children[0].person.name.clear(), Subject::Child(0), Field::Name; "child name")]
    #[test_case(|d: &mut FamilyData| d.children[0].person.dob = None, Subject::Child(0), Field::Dob; "child dob")]
    #[test_case(|d: &mut FamilyData| d.children[0].person.phone_number.clear(), Subject::Child(0), Field::PhoneNumber; "child phone")]
    #[test_case(|d: &mut FamilyData| d.children[0].person.occupation = None, Subject::Child(0), Field::Occupation; "child occupation")]
    #[test_case(|d: &mut FamilyData| d.children[0].spouse.as_mut().unwrap().person.name.clear(), Subject::Spouse(0), Field::Name; "spouse name")]
    #[test_case(|d: &mut FamilyData| d.children[0].children[0].dob = None, Subject::Grandchild(0, 0), Field::Dob; "grandchild dob")]
    #[test_case(|d: &mut FamilyData| d.children[0].children[0].name.clear(), Subject::Grandchild(0, 0), Field::Name; "grandchild name")]
    fn any_missing_required_field_is_reported(
        break_record: fn(&mut FamilyData),
        subject: Subject,
        field: Field,
    ) {
        let mut data = complete_family();
        break_record(&mut data);

        assert!(!is_valid(&data));
        assert_eq!(audit(&data), vec![Issue { subject, field }]);
    }

    #[test]
    fn spouse_of_unmarried_child_is_not_checked() {
        let mut data = complete_family();
        data.children[0].marital_status = MaritalStatus::Unmarried;
        data.children[0].spouse.as_mut().unwrap().person.name.clear();

        assert!(is_valid(&data));
    }

    #[test]
    fn optional_grandchild_fields_are_not_required() {
        let data = complete_family();
        let grandchild = &data.children[0].children[0];
        assert!(grandchild.occupation.is_none());
        assert!(grandchild.phone_number.is_empty());
        assert!(is_valid(&data));
    }

    #[test]
    fn audit_reports_every_issue_in_record_order() {
        let mut data = complete_family();
        data.head.phone_number.clear();
        data.children[0].children[0].name.clear();
        data.children[0].person.dob = None;

        let issues = audit(&data);

        assert_eq!(
            issues,
            vec![
                Issue {
                    subject: Subject::Head,
                    field: Field::PhoneNumber
                },
                Issue {
                    subject: Subject::Child(0),
                    field: Field::Dob
                },
                Issue {
                    subject: Subject::Grandchild(0, 0),
                    field: Field::Name
                },
            ]
        );
    }

    #[test]
    fn issue_display_uses_relationship_labels() {
        let issue = Issue {
            subject: Subject::Grandchild(1, 0),
            field: Field::Dob,
        };
        assert_eq!(issue.to_string(), "Child 2's Child 1: date of birth is required");
    }

    #[test]
    fn failure_message_names_first_issue() {
        let error = ValidationFailure::check(&FamilyData::default()).unwrap_err();
        assert_eq!(
            error.to_string(),
            "4 required field(s) missing, first: Family Head: name is required"
        );
    }
}
