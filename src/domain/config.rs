use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::policy::NameCase;

/// A configuration value that would produce an unreadable or misplaced
/// export.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidSetting {
    /// The delimiter collides with CSV quoting or line breaks.
    #[error("delimiter must be a single character other than '\"', CR or LF (got {0:?})")]
    Delimiter(char),
    /// The file prefix is blank or would leave the export directory.
    #[error("file_prefix must be non-blank and contain no path separators (got {0:?})")]
    FilePrefix(String),
}

/// Configuration for capturing and exporting family records.
///
/// This struct holds settings that control how names are normalised, how
/// the export is formatted, and whether a record must be submitted before
/// it can be exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Versions", into = "Versions")]
pub struct Config {
    /// The column delimiter used in exports.
    pub delimiter: char,

    /// How names are normalised when they are written into a record.
    pub name_case: NameCase,

    /// Whether a record must be submitted before it can be exported.
    ///
    /// Any edit after submission clears the submission.
    pub require_submission: bool,

    /// The prefix of the export file name.
    ///
    /// The file is named `{prefix}_{YYYY-MM-DD}.csv`.
    pub file_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            name_case: NameCase::default(),
            require_submission: true,
            file_prefix: default_file_prefix(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Loads the configuration from `path` if the file exists, falling back to
    /// the defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, String> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Checks that `delimiter` can separate CSV cells.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidSetting::Delimiter`] for `"`, CR and LF.
    pub const fn check_delimiter(delimiter: char) -> Result<char, InvalidSetting> {
        match delimiter {
            '"' | '\r' | '\n' => Err(InvalidSetting::Delimiter(delimiter)),
            _ => Ok(delimiter),
        }
    }

    /// Checks that `prefix` names a file inside the export directory.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidSetting::FilePrefix`] if the prefix is blank or
    /// contains `/` or `\`.
    pub fn check_file_prefix(prefix: &str) -> Result<&str, InvalidSetting> {
        if prefix.trim().is_empty() || prefix.contains(['/', '\\']) {
            Err(InvalidSetting::FilePrefix(prefix.to_string()))
        } else {
            Ok(prefix)
        }
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }
}

const fn default_delimiter() -> char {
    ','
}

fn default_file_prefix() -> String {
    "family_data".to_string()
}

const fn default_require_submission() -> bool {
    true
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_delimiter")]
        delimiter: char,

        #[serde(default)]
        name_case: NameCase,

        #[serde(default = "default_require_submission")]
        require_submission: bool,

        #[serde(default = "default_file_prefix")]
        file_prefix: String,
    },
}

impl TryFrom<Versions> for Config {
    type Error = InvalidSetting;

    fn try_from(versions: Versions) -> Result<Self, Self::Error> {
        match versions {
            Versions::V1 {
                delimiter,
                name_case,
                require_submission,
                file_prefix,
            } => {
                Self::check_delimiter(delimiter)?;
                Self::check_file_prefix(&file_prefix)?;
                Ok(Self {
                    delimiter,
                    name_case,
                    require_submission,
                    file_prefix,
                })
            }
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            delimiter: config.delimiter,
            name_case: config.name_case,
            require_submission: config.require_submission,
            file_prefix: config.file_prefix,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use test_case::test_case;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\ndelimiter = \";\"\nname_case = \"preserve\"\nrequire_submission = false\nfile_prefix = \"patil_family\"\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.delimiter, ';');
        assert_eq!(config.name_case, NameCase::Preserve);
        assert!(!config.require_submission);
        assert_eq!(config.file_prefix, "patil_family");
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_or_default_tolerates_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        assert_eq!(Config::load_or_default(&missing).unwrap(), Config::default());
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nname_case = \"lower\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test_case("'\"'"; "quote")]
    #[test_case(r#""\n""#; "line feed")]
    #[test_case(r#""\r""#; "carriage return")]
    fn load_rejects_delimiter_that_breaks_quoting(delimiter: &str) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "_version = \"1\"\ndelimiter = {delimiter}\n").unwrap();

        let error = Config::load(file.path()).unwrap_err();

        assert!(error.starts_with("Failed to parse config file:"));
        assert!(error.contains("delimiter must be a single character"));
    }

    #[test_case("../family"; "parent directory")]
    #[test_case("exports/family"; "subdirectory")]
    #[test_case("exports\\family"; "backslash")]
    #[test_case("   "; "blank")]
    fn file_prefix_must_stay_in_export_directory(prefix: &str) {
        assert_eq!(
            Config::check_file_prefix(prefix),
            Err(InvalidSetting::FilePrefix(prefix.to_string()))
        );
    }

    #[test]
    fn load_rejects_file_prefix_with_separator() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nfile_prefix = \"../x\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();

        assert!(error.contains("file_prefix must be non-blank"));
    }

    #[test_case(','; "comma")]
    #[test_case(';'; "semicolon")]
    #[test_case('\t'; "tab")]
    fn usable_delimiters_are_accepted(delimiter: char) {
        assert_eq!(Config::check_delimiter(delimiter), Ok(delimiter));
    }

    #[test]
    fn empty_file_returns_default() {
        // Tests that deserialising an empty file returns the default configuration.
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        let config = Config {
            delimiter: '\t',
            ..Config::default()
        };

        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
