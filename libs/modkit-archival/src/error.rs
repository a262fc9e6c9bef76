//! Error types for configuration, schema construction and query-time argument resolution.
//!
//! The archival filter itself never fails: inapplicable fields and queries are left
//! untouched. These errors cover the surrounding plumbing only.

use crate::schema::FieldId;

/// Errors raised while loading or validating [`crate::ArchivalConfig`].
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The configuration could not be extracted from the figment.
    #[error("failed to extract archival config: {0}")]
    Extract(#[from] Box<figment::Error>),

    /// The archival column name is empty.
    #[error("archival column name must not be empty")]
    EmptyColumnName,
}

/// Errors raised by the schema build pipeline.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A different type is already registered under this name.
    #[error("type '{name}' is already registered with a different definition")]
    TypeConflict { name: String },

    /// A strategy referenced a type that was never registered.
    #[error("type '{name}' is not registered")]
    UnknownType { name: String },

    /// An augmentation tried to add an argument the field already declares.
    #[error("argument '{argument}' already exists on field {field}")]
    DuplicateArgument { field: FieldId, argument: String },
}

/// Errors raised while resolving the arguments of a field occurrence at query time.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The field is not part of the built schema.
    #[error("unknown field {0}")]
    UnknownField(FieldId),

    /// The caller supplied an argument the field does not declare.
    #[error("field {field} has no argument '{argument}'")]
    UnknownArgument { field: FieldId, argument: String },

    /// An enum argument received a value outside the enum's declared values.
    #[error("'{value}' is not a valid {type_name} value for argument '{argument}' of {field}")]
    InvalidEnumValue {
        field: FieldId,
        argument: String,
        value: String,
        type_name: String,
    },

    /// An enum argument received a non-enum value.
    #[error("argument '{argument}' of {field} expects a {type_name} value")]
    TypeMismatch {
        field: FieldId,
        argument: String,
        type_name: String,
    },
}
