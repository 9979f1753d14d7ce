use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of a [`ConfigError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Unknown key, or a value of the wrong type for a known key.
    Schema,
    RequiredField,
    MutualExclusion,
    Range,
    Enum,
    /// A locally referenced file is missing or unreadable.
    Reference,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Schema => "schema",
            Self::RequiredField => "required_field",
            Self::MutualExclusion => "mutual_exclusion",
            Self::Range => "range",
            Self::Enum => "enum",
            Self::Reference => "reference",
        })
    }
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown configuration keys: {}", .keys.join(", "))]
    UnknownKeys { keys: Vec<String> },

    #[error("invalid value for '{key}': {message}")]
    InvalidType { key: String, message: String },

    #[error("{field} must be specified")]
    MissingField { field: &'static str },

    #[error("{field} must be specified when {mode_field} is '{mode}'")]
    MissingFieldForMode {
        field: &'static str,
        mode_field: &'static str,
        mode: &'static str,
    },

    #[error("{field}[{index}] must not be empty")]
    BlankListEntry { field: &'static str, index: usize },

    #[error("one of {first} or {second} must be specified")]
    MissingOneOf {
        first: &'static str,
        second: &'static str,
    },

    #[error("only one of {first} or {second} may be specified")]
    MutuallyExclusive {
        first: &'static str,
        second: &'static str,
    },

    #[error("invalid {field}: {value} (must be between {min} and {max})")]
    OutOfRange {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    #[error("unsupported {field} '{value}', expected one of: {}", .allowed.join(", "))]
    UnsupportedValue {
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },

    #[error(
        "unsupported {field} {value}, expected one of: {}",
        .allowed.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
    )]
    UnsupportedNumber {
        field: &'static str,
        value: u64,
        allowed: &'static [u64],
    },

    #[error("{field} file '{}' is not readable: {reason}", .path.display())]
    UnreadableFile {
        field: &'static str,
        path: PathBuf,
        reason: String,
    },
}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownKeys { .. } | Self::InvalidType { .. } => ErrorKind::Schema,
            Self::MissingField { .. }
            | Self::MissingFieldForMode { .. }
            | Self::BlankListEntry { .. }
            | Self::MissingOneOf { .. } => ErrorKind::RequiredField,
            Self::MutuallyExclusive { .. } => ErrorKind::MutualExclusion,
            Self::OutOfRange { .. } => ErrorKind::Range,
            Self::UnsupportedValue { .. } | Self::UnsupportedNumber { .. } => ErrorKind::Enum,
            Self::UnreadableFile { .. } => ErrorKind::Reference,
        }
    }
}

/// Every error found by one `prepare` call, in the order it was found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ConfigError>);

impl ValidationErrors {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConfigError> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[ConfigError] {
        &self.0
    }

    pub fn kinds(&self) -> Vec<ErrorKind> {
        self.0.iter().map(ConfigError::kind).collect()
    }

    pub fn count(&self, kind: ErrorKind) -> usize {
        self.0.iter().filter(|e| e.kind() == kind).count()
    }

    pub fn contains(&self, kind: ErrorKind) -> bool {
        self.count(kind) > 0
    }

    pub fn into_vec(self) -> Vec<ConfigError> {
        self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.0.len() == 1 { "error" } else { "errors" };
        write!(
            f,
            "configuration validation failed ({} {noun})",
            self.0.len()
        )?;
        for err in &self.0 {
            write!(f, "\n  - {err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = ConfigError;
    type IntoIter = std::vec::IntoIter<ConfigError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ConfigError;
    type IntoIter = std::slice::Iter<'a, ConfigError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Per-call accumulator shared by the validators of one `prepare` run.
#[derive(Debug, Default)]
pub(crate) struct ValidationCtx {
    errors: Vec<ConfigError>,
    warnings: Vec<String>,
}

impl ValidationCtx {
    pub(crate) fn push(&mut self, err: ConfigError) {
        self.errors.push(err);
    }

    pub(crate) fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub(crate) fn into_result(self) -> Result<Vec<String>, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(self.warnings)
        } else {
            Err(ValidationErrors(self.errors))
        }
    }
}
