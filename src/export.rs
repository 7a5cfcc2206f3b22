//! Export of a family record as delimited text.
//!
//! The record is flattened into one [`ExportRow`] per member, the header is
//! the union of the columns those rows carry, and every cell is quoted only
//! when it has to be.

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use tracing::{debug, instrument};

use crate::domain::FamilyData;

mod quote;
mod rows;

pub use rows::{columns, rows, Column, ExportRow};

/// A serialised export and the name of the file it belongs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    /// The file name, `{prefix}_{YYYY-MM-DD}.csv`.
    pub file_name: String,
    /// The delimited text.
    pub contents: String,
}

/// The export file name for the given prefix and day.
#[must_use]
pub fn file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}_{}.csv", date.format("%Y-%m-%d"))
}

/// Serialises the record as comma-separated text.
#[must_use]
pub fn serialize(data: &FamilyData) -> String {
    serialize_with(data, ',')
}

/// Serialises the record using the given delimiter.
///
/// The first line is the header. Lines are separated by `\n` with no
/// trailing newline.
#[must_use]
pub fn serialize_with(data: &FamilyData, delimiter: char) -> String {
    let rows = rows(data);
    let columns = columns(&rows);
    let separator = delimiter.to_string();

    let header = columns
        .iter()
        .map(|column| quote::field(column.header(), delimiter))
        .collect::<Vec<_>>()
        .join(&separator);

    let body = rows.iter().map(|row| {
        columns
            .iter()
            .map(|&column| quote::field(row.get(column).unwrap_or_default(), delimiter))
            .collect::<Vec<_>>()
            .join(&separator)
    });

    std::iter::once(header)
        .chain(body)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Writes the export into `dir`, returning the path of the written file.
///
/// The contents are written to a temporary file in `dir` first and then
/// renamed into place, so a failure never leaves a partial file behind. An
/// existing file with the same name is replaced.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be created or written, or if
/// it cannot be moved into place.
#[instrument(level = "debug", skip(export), fields(file_name = %export.file_name))]
pub fn write_export(dir: &Path, export: &CsvExport) -> io::Result<PathBuf> {
    let path = dir.join(&export.file_name);

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(export.contents.as_bytes())?;
    file.flush()?;
    file.persist(&path).map_err(|e| e.error)?;

    debug!(path = %path.display(), bytes = export.contents.len(), "export written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Child, MaritalStatus, Occupation, Person, Spouse};

    fn person(name: &str, dob: (i32, u32, u32), occupation: &str, phone: &str) -> Person {
        Person {
            name: name.to_string(),
            dob: NaiveDate::from_ymd_opt(dob.0, dob.1, dob.2),
            occupation: Some(occupation.parse().unwrap()),
            phone_number: phone.to_string(),
        }
    }

    fn example() -> FamilyData {
        FamilyData {
            head: person("A", (2000, 1, 1), "Salaried", "111"),
            children: vec![Child {
                person: person("B", (1995, 1, 1), "Business", "222"),
                ..Child::default()
            }],
        }
    }

    #[test]
    fn example_record_serialises_to_two_rows() {
        let expected = "\
Relationship,Name,DOB,Occupation,Phone Number,Additional Phone Numbers,Marital Status
Family Head,A,2000-01-01,Salaried,111,,
Child 1,B,1995-01-01,Business,222,,Unmarried";

        assert_eq!(serialize(&example()), expected);
    }

    #[test]
    fn values_with_delimiters_are_quoted() {
        let mut data = example();
        data.head.occupation = Some("Teacher, retired".parse().unwrap());

        let csv = serialize(&data);

        assert!(csv.contains(",\"Teacher, retired\","));
    }

    #[test]
    fn additional_phone_numbers_are_joined_and_quoted() {
        let mut data = example();
        data.children[0].additional_phone_numbers = vec!["333".into(), "444".into()];

        let csv = serialize(&data);

        assert!(csv.ends_with("Child 1,B,1995-01-01,Business,222,\"333, 444\",Unmarried"));
    }

    #[test]
    fn married_child_adds_spouse_row_and_column() {
        let mut data = example();
        data.children[0].marital_status = MaritalStatus::Married;
        data.children[0].spouse = Some(Spouse {
            person: Person {
                name: "C".to_string(),
                occupation: Some(Occupation::Housewife),
                ..Person::default()
            },
            number_of_grandchildren: 1,
        });
        data.children[0].children = vec![person("D", (2020, 2, 29), "Student", "")];

        let csv = serialize(&data);
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[0].ends_with(",Number of Grandchildren"));
        assert_eq!(lines[3], "Child 1's Spouse,C,,Housewife,,,,1");
        assert_eq!(lines[4], "Child 1's Child 1,D,2020-02-29,Student,,,,");
    }

    #[test]
    fn custom_delimiter_controls_quoting() {
        let mut data = example();
        data.head.occupation = Some("Teacher, retired".parse().unwrap());

        let csv = serialize_with(&data, ';');

        assert!(csv.starts_with("Relationship;Name;DOB"));
        assert!(csv.contains(";Teacher, retired;"));
    }

    #[test]
    fn file_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 11, 3).unwrap();
        assert_eq!(file_name("family_data", date), "family_data_2024-11-03.csv");
    }

    #[test]
    fn write_export_creates_file() {
        let tmp = tempfile::tempdir().unwrap();
        let export = CsvExport {
            file_name: "family_data_2024-11-03.csv".to_string(),
            contents: serialize(&example()),
        };

        let path = write_export(tmp.path(), &export).unwrap();

        assert_eq!(path, tmp.path().join("family_data_2024-11-03.csv"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), export.contents);
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[test]
    fn write_export_to_missing_directory_leaves_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing");
        let export = CsvExport {
            file_name: "out.csv".to_string(),
            contents: String::new(),
        };

        assert!(write_export(&missing, &export).is_err());
        assert!(!missing.join("out.csv").exists());
    }
}
