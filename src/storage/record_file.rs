use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Child, FamilyData, MaritalStatus, Person, Spouse};

/// A family record in its serialized form.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(from = "RecordVersion")]
#[serde(into = "RecordVersion")]
pub(super) struct RecordFile {
    head: PersonFile,
    children: Vec<ChildFile>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum RecordVersion {
    #[serde(rename = "1")]
    V1 {
        head: PersonFile,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<ChildFile>,
    },
}

impl From<RecordVersion> for RecordFile {
    fn from(version: RecordVersion) -> Self {
        match version {
            RecordVersion::V1 { head, children } => Self { head, children },
        }
    }
}

impl From<RecordFile> for RecordVersion {
    fn from(record: RecordFile) -> Self {
        let RecordFile { head, children } = record;
        Self::V1 { head, children }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
struct PersonFile {
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dob: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    occupation: Option<String>,
    #[serde(default)]
    phone_number: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
struct SpouseFile {
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dob: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    occupation: Option<String>,
    #[serde(default)]
    phone_number: String,
    #[serde(default)]
    number_of_grandchildren: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
struct ChildFile {
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dob: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    occupation: Option<String>,
    #[serde(default)]
    phone_number: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    additional_phone_numbers: Vec<String>,
    #[serde(default)]
    marital_status: MaritalStatusFile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    spouse: Option<SpouseFile>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<PersonFile>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
enum MaritalStatusFile {
    #[serde(alias = "married")]
    Married,
    #[default]
    #[serde(alias = "unmarried")]
    Unmarried,
}

impl From<MaritalStatusFile> for MaritalStatus {
    fn from(status: MaritalStatusFile) -> Self {
        match status {
            MaritalStatusFile::Married => Self::Married,
            MaritalStatusFile::Unmarried => Self::Unmarried,
        }
    }
}

impl From<MaritalStatus> for MaritalStatusFile {
    fn from(status: MaritalStatus) -> Self {
        match status {
            MaritalStatus::Married => Self::Married,
            MaritalStatus::Unmarried => Self::Unmarried,
        }
    }
}

fn person(
    name: String,
    dob: Option<NaiveDate>,
    occupation: Option<&str>,
    phone_number: String,
) -> Person {
    Person {
        name,
        dob,
        // blank text means no occupation
        occupation: occupation.and_then(|text| text.parse().ok()),
        phone_number,
    }
}

impl From<PersonFile> for Person {
    fn from(file: PersonFile) -> Self {
        person(file.name, file.dob, file.occupation.as_deref(), file.phone_number)
    }
}

impl From<&Person> for PersonFile {
    fn from(person: &Person) -> Self {
        Self {
            name: person.name.clone(),
            dob: person.dob,
            occupation: person.occupation.as_ref().map(ToString::to_string),
            phone_number: person.phone_number.clone(),
        }
    }
}

impl From<SpouseFile> for Spouse {
    fn from(file: SpouseFile) -> Self {
        Self {
            person: person(file.name, file.dob, file.occupation.as_deref(), file.phone_number),
            number_of_grandchildren: file.number_of_grandchildren,
        }
    }
}

impl From<&Spouse> for SpouseFile {
    fn from(spouse: &Spouse) -> Self {
        let PersonFile {
            name,
            dob,
            occupation,
            phone_number,
        } = PersonFile::from(&spouse.person);
        Self {
            name,
            dob,
            occupation,
            phone_number,
            number_of_grandchildren: spouse.number_of_grandchildren,
        }
    }
}

impl From<ChildFile> for Child {
    fn from(file: ChildFile) -> Self {
        let marital_status = MaritalStatus::from(file.marital_status);
        let spouse = match (file.spouse, marital_status) {
            (Some(spouse), _) => Some(spouse.into()),
            (None, MaritalStatus::Married) => Some(Spouse::default()),
            (None, MaritalStatus::Unmarried) => None,
        };
        Self {
            person: person(file.name, file.dob, file.occupation.as_deref(), file.phone_number),
            additional_phone_numbers: file.additional_phone_numbers,
            marital_status,
            spouse,
            children: file.children.into_iter().map(Person::from).collect(),
        }
    }
}

impl From<&Child> for ChildFile {
    fn from(child: &Child) -> Self {
        let PersonFile {
            name,
            dob,
            occupation,
            phone_number,
        } = PersonFile::from(&child.person);
        Self {
            name,
            dob,
            occupation,
            phone_number,
            additional_phone_numbers: child.additional_phone_numbers.clone(),
            marital_status: child.marital_status.into(),
            spouse: child.spouse.as_ref().map(SpouseFile::from),
            children: child.children.iter().map(PersonFile::from).collect(),
        }
    }
}

impl From<RecordFile> for FamilyData {
    fn from(file: RecordFile) -> Self {
        Self {
            head: file.head.into(),
            children: file.children.into_iter().map(Child::from).collect(),
        }
    }
}

impl From<&FamilyData> for RecordFile {
    fn from(data: &FamilyData) -> Self {
        Self {
            head: PersonFile::from(&data.head),
            children: data.children.iter().map(ChildFile::from).collect(),
        }
    }
}
