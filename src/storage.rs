//! Reading family records from files.
//!
//! Records are stored as YAML, or as JSON when the file has a `.json`
//! extension. Both formats carry a `_version` tag so the layout can change
//! without breaking older files.

use std::{io, path::Path};

use tracing::instrument;

use crate::domain::FamilyData;

mod record_file;
use record_file::RecordFile;

/// Errors that can occur when loading a family record.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read record file: {0}")]
    Io(#[from] io::Error),
    /// The YAML could not be parsed.
    #[error("invalid YAML record: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// The JSON could not be parsed.
    #[error("invalid JSON record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Loads a record from `path`, choosing the format from its extension.
///
/// A married child without a spouse in the file is given an empty spouse.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
#[instrument(level = "debug")]
pub fn load(path: &Path) -> Result<FamilyData, LoadError> {
    let content = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        from_json(&content)
    } else {
        from_yaml(&content)
    }
}

/// Parses a record from YAML.
///
/// # Errors
///
/// Returns an error if the YAML is not a valid record.
pub fn from_yaml(content: &str) -> Result<FamilyData, LoadError> {
    let file: RecordFile = serde_yaml::from_str(content)?;
    Ok(file.into())
}

/// Parses a record from JSON.
///
/// # Errors
///
/// Returns an error if the JSON is not a valid record.
pub fn from_json(content: &str) -> Result<FamilyData, LoadError> {
    let file: RecordFile = serde_json::from_str(content)?;
    Ok(file.into())
}

/// Renders a record as YAML in the same layout [`from_yaml`] reads.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_yaml(data: &FamilyData) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(&RecordFile::from(data))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{MaritalStatus, Occupation};

    const RECORD: &str = r#"
_version: "1"
head:
  name: ASHA PATIL
  dob: 1962-04-12
  occupation: Retired
  phone_number: "9876543210"
children:
  - name: RAVI PATIL
    dob: 1988-09-30
    occupation: salaried
    phone_number: "9123456780"
    additional_phone_numbers: ["020-555-0101"]
    marital_status: Married
    spouse:
      name: MEERA PATIL
      number_of_grandchildren: 1
    children:
      - name: ANAYA PATIL
        dob: 2016-01-20
  - name: SUNITA PATIL
    occupation: "Teacher, retired"
"#;

    #[test]
    fn parses_yaml_record() {
        let data = from_yaml(RECORD).unwrap();

        assert_eq!(data.head.name, "ASHA PATIL");
        assert_eq!(data.head.dob, NaiveDate::from_ymd_opt(1962, 4, 12));
        assert_eq!(data.head.occupation, Some(Occupation::Retired));

        let ravi = &data.children[0];
        assert_eq!(ravi.person.occupation, Some(Occupation::Salaried));
        assert_eq!(ravi.additional_phone_numbers, ["020-555-0101"]);
        assert_eq!(ravi.marital_status, MaritalStatus::Married);
        assert_eq!(ravi.spouse.as_ref().unwrap().number_of_grandchildren, 1);
        assert_eq!(ravi.children[0].name, "ANAYA PATIL");

        let sunita = &data.children[1];
        assert_eq!(sunita.marital_status, MaritalStatus::Unmarried);
        assert_eq!(sunita.person.occupation.as_ref().unwrap().as_str(), "Teacher, retired");
        assert_eq!(sunita.person.dob, None);
    }

    #[test]
    fn married_child_without_spouse_gets_empty_spouse() {
        let data = from_yaml(
            "_version: \"1\"\nhead: {}\nchildren:\n  - name: B\n    marital_status: married\n",
        )
        .unwrap();

        assert!(data.children[0].spouse.is_some());
    }

    #[test]
    fn blank_occupation_is_absent() {
        let data = from_yaml("_version: \"1\"\nhead:\n  occupation: \"  \"\n").unwrap();
        assert_eq!(data.head.occupation, None);
    }

    #[test]
    fn missing_version_is_rejected() {
        assert!(matches!(
            from_yaml("head:\n  name: A\n"),
            Err(LoadError::Yaml(_))
        ));
    }

    #[test]
    fn yaml_rendering_reads_back() {
        let data = from_yaml(RECORD).unwrap();

        let rendered = to_yaml(&data).unwrap();

        assert_eq!(from_yaml(&rendered).unwrap(), data);
    }

    #[test]
    fn loads_json_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(br#"{"_version": "1", "head": {"name": "A", "dob": "2000-01-01"}}"#)
            .unwrap();

        let data = load(file.path()).unwrap();

        assert_eq!(data.head.name, "A");
        assert!(data.children.is_empty());
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            load(&tmp.path().join("missing.yaml")),
            Err(LoadError::Io(_))
        ));
    }
}
