//! Error types for codec operations

use std::fmt;
use thiserror::Error;

/// Location of a failing value inside a record (e.g. `pose.names[2]`).
///
/// Paths are built from the inside out as an error propagates through nested fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldPath(String);

impl FieldPath {
    /// Returns the path as a string (empty for the record itself).
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn push_field(&mut self, name: &str) {
        self.0 = if self.0.is_empty() {
            name.to_string()
        } else if self.0.starts_with('[') {
            format!("{name}{}", self.0)
        } else {
            format!("{name}.{}", self.0)
        };
    }

    fn push_index(&mut self, index: usize) {
        self.0 = if self.0.is_empty() || self.0.starts_with('[') {
            format!("[{index}]{}", self.0)
        } else {
            format!("[{index}].{}", self.0)
        };
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("<record>")
        } else {
            f.write_str(&self.0)
        }
    }
}

/// Error type for codec operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("{field}: required value is absent")]
    NullInput { field: FieldPath },
    #[error("{field}: malformed value: {reason}")]
    MalformedValue {
        field: FieldPath,
        reason: &'static str,
    },
    #[error("{field}: truncated buffer: needed {needed} bytes, {remaining} remaining")]
    TruncatedBuffer {
        field: FieldPath,
        needed: usize,
        remaining: usize,
    },
    #[error("{field}: failed to assign decoded value: {reason}")]
    AssignFailure {
        field: FieldPath,
        reason: &'static str,
    },
    #[error("{field}: type mismatch: expected {expected}")]
    TypeMismatch {
        field: FieldPath,
        expected: &'static str,
    },
    #[error("{field}: length exceeded: {found} > {max}")]
    LengthExceeded {
        field: FieldPath,
        found: usize,
        max: usize,
    },
    #[error("{field}: invalid length: expected {expected}, found {found}")]
    InvalidLength {
        field: FieldPath,
        expected: usize,
        found: usize,
    },
    #[error("{field}: invalid bool")]
    InvalidBool { field: FieldPath },
    #[error("extra data found: {0} bytes")]
    ExtraData(usize),
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("unknown type: {0}")]
    UnknownType(String),
    #[error("invalid shape {shape}: {reason}")]
    InvalidShape { shape: String, reason: String },
}

impl Error {
    pub(crate) fn truncated(needed: usize, remaining: usize) -> Self {
        Self::TruncatedBuffer {
            field: FieldPath::default(),
            needed,
            remaining,
        }
    }

    pub(crate) fn malformed(reason: &'static str) -> Self {
        Self::MalformedValue {
            field: FieldPath::default(),
            reason,
        }
    }

    pub(crate) fn assign(reason: &'static str) -> Self {
        Self::AssignFailure {
            field: FieldPath::default(),
            reason,
        }
    }

    pub(crate) fn mismatch(expected: &'static str) -> Self {
        Self::TypeMismatch {
            field: FieldPath::default(),
            expected,
        }
    }

    pub(crate) fn exceeded(found: usize, max: usize) -> Self {
        Self::LengthExceeded {
            field: FieldPath::default(),
            found,
            max,
        }
    }

    pub(crate) fn invalid_length(expected: usize, found: usize) -> Self {
        Self::InvalidLength {
            field: FieldPath::default(),
            expected,
            found,
        }
    }

    pub(crate) fn invalid_shape(shape: &str, reason: impl Into<String>) -> Self {
        Self::InvalidShape {
            shape: shape.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns the path of the value that caused the error, if the error is tied to one.
    pub fn field(&self) -> Option<&FieldPath> {
        match self {
            Self::NullInput { field }
            | Self::MalformedValue { field, .. }
            | Self::TruncatedBuffer { field, .. }
            | Self::AssignFailure { field, .. }
            | Self::TypeMismatch { field, .. }
            | Self::LengthExceeded { field, .. }
            | Self::InvalidLength { field, .. }
            | Self::InvalidBool { field } => Some(field),
            Self::ExtraData(_)
            | Self::UnknownField(_)
            | Self::UnknownType(_)
            | Self::InvalidShape { .. } => None,
        }
    }

    fn field_mut(&mut self) -> Option<&mut FieldPath> {
        match self {
            Self::NullInput { field }
            | Self::MalformedValue { field, .. }
            | Self::TruncatedBuffer { field, .. }
            | Self::AssignFailure { field, .. }
            | Self::TypeMismatch { field, .. }
            | Self::LengthExceeded { field, .. }
            | Self::InvalidLength { field, .. }
            | Self::InvalidBool { field } => Some(field),
            _ => None,
        }
    }

    /// Prefixes the error path with a field name.
    pub fn in_field(mut self, name: &str) -> Self {
        if let Some(path) = self.field_mut() {
            path.push_field(name);
        }
        self
    }

    /// Prefixes the error path with an element index.
    pub fn at_index(mut self, index: usize) -> Self {
        if let Some(path) = self.field_mut() {
            path.push_index(index);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_building() {
        let err = Error::malformed("string not null-terminated")
            .in_field("name")
            .at_index(2)
            .in_field("entries")
            .in_field("pose");
        assert_eq!(err.field().unwrap().as_str(), "pose.entries[2].name");
        assert_eq!(
            err.to_string(),
            "pose.entries[2].name: malformed value: string not null-terminated"
        );
    }

    #[test]
    fn test_nested_indexes() {
        let err = Error::truncated(4, 1).at_index(1).at_index(0).in_field("grid");
        assert_eq!(err.field().unwrap().as_str(), "grid[0][1]");
    }

    #[test]
    fn test_root_path() {
        let err = Error::truncated(1, 0);
        assert_eq!(
            err.to_string(),
            "<record>: truncated buffer: needed 1 bytes, 0 remaining"
        );
    }

    #[test]
    fn test_pathless_errors_unchanged() {
        let err = Error::ExtraData(3).in_field("data");
        assert_eq!(err, Error::ExtraData(3));
        assert!(err.field().is_none());
    }
}
