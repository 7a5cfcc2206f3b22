//! Flattening of the record hierarchy into export rows.

use std::fmt;

use chrono::NaiveDate;

use crate::domain::{Child, FamilyData, Person, Spouse, Subject};

/// A column of the exported table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// The member's relationship to the family head.
    Relationship,
    /// The member's name.
    Name,
    /// Date of birth as `YYYY-MM-DD`.
    Dob,
    /// Occupation label.
    Occupation,
    /// Primary phone number.
    PhoneNumber,
    /// A child's additional phone numbers.
    AdditionalPhoneNumbers,
    /// A child's marital status.
    MaritalStatus,
    /// A spouse's grandchild count.
    NumberOfGrandchildren,
}

impl Column {
    /// The header text for the column.
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::Relationship => "Relationship",
            Self::Name => "Name",
            Self::Dob => "DOB",
            Self::Occupation => "Occupation",
            Self::PhoneNumber => "Phone Number",
            Self::AdditionalPhoneNumbers => "Additional Phone Numbers",
            Self::MaritalStatus => "Marital Status",
            Self::NumberOfGrandchildren => "Number of Grandchildren",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// One member of the record, flattened into column values.
///
/// Cells are kept in the order the row defines them; a row only carries the
/// columns that apply to its kind of member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    cells: Vec<(Column, String)>,
}

impl ExportRow {
    fn person(subject: Subject, person: &Person) -> Self {
        Self {
            cells: vec![
                (Column::Relationship, subject.to_string()),
                (Column::Name, person.name.clone()),
                (Column::Dob, person.dob.map(format_date).unwrap_or_default()),
                (
                    Column::Occupation,
                    person
                        .occupation
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_default(),
                ),
                (Column::PhoneNumber, person.phone_number.clone()),
            ],
        }
    }

    fn child(index: usize, child: &Child) -> Self {
        let mut row = Self::person(Subject::Child(index), &child.person);
        row.cells.push((
            Column::AdditionalPhoneNumbers,
            child.additional_phone_numbers.join(", "),
        ));
        row.cells
            .push((Column::MaritalStatus, child.marital_status.to_string()));
        row
    }

    fn spouse(index: usize, spouse: &Spouse) -> Self {
        let mut row = Self::person(Subject::Spouse(index), &spouse.person);
        row.cells.push((
            Column::NumberOfGrandchildren,
            spouse.number_of_grandchildren.to_string(),
        ));
        row
    }

    /// The value of `column`, if this row carries it.
    #[must_use]
    pub fn get(&self, column: Column) -> Option<&str> {
        self.cells
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, value)| value.as_str())
    }

    /// The relationship label of this row.
    #[must_use]
    pub fn relationship(&self) -> &str {
        self.get(Column::Relationship).unwrap_or_default()
    }

    /// The columns this row carries, in order.
    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.cells.iter().map(|(column, _)| *column)
    }
}

/// Flattens the record into rows.
///
/// The head comes first. Each child is followed by its spouse (when
/// married) and then its children in order.
#[must_use]
pub fn rows(data: &FamilyData) -> Vec<ExportRow> {
    let mut rows = Vec::with_capacity(data.member_count());
    rows.push(ExportRow::person(Subject::Head, &data.head));

    for (index, child) in data.children.iter().enumerate() {
        rows.push(ExportRow::child(index, child));
        if let Some(spouse) = child.active_spouse() {
            rows.push(ExportRow::spouse(index, spouse));
        }
        rows.extend(
            child
                .children
                .iter()
                .enumerate()
                .map(|(grandchild, person)| {
                    ExportRow::person(Subject::Grandchild(index, grandchild), person)
                }),
        );
    }

    rows
}

/// Every column used by any of the rows, in the order first seen.
#[must_use]
pub fn columns(rows: &[ExportRow]) -> Vec<Column> {
    let mut columns: Vec<Column> = Vec::new();
    for column in rows.iter().flat_map(|row| row.columns()) {
        if !columns.contains(&column) {
            columns.push(column);
        }
    }
    columns
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
