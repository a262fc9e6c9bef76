//! Minimal typed schema model used by the build pipeline.
//!
//! - `ObjectType` / `FieldDef`: object types and their fields, each carrying a `FieldScope`
//! - `ArgumentDef` / `ArgValue`: declared field arguments and runtime values
//! - `TypeRegistry`: named enum types, registered idempotently
//! - `SchemaBuilder`: walks fields once and runs the ordered `FieldStrategy` list

use std::collections::HashMap;
use std::fmt;

use crate::catalog::TableId;

mod builder;
mod registry;

pub use builder::{
    BuildContext, BuiltSchema, FieldAugmentation, FieldContext, FieldOutcome, FieldStrategy,
    SchemaBuilder,
};
pub use registry::{EnumType, EnumValue, TypeRegistry};

/// Identity of a field: owning object type name plus field name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId {
    pub type_name: String,
    pub field_name: String,
}

impl FieldId {
    #[must_use]
    pub fn new(type_name: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            field_name: field_name.into(),
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' of '{}'", self.field_name, self.type_name)
    }
}

/// What a field reads its rows from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSource {
    /// A catalog relation (table, view, ...).
    Table(TableId),
    /// A set-returning function; never a candidate for archival filtering.
    Function(String),
}

/// Build-time metadata describing a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldScope {
    /// The field returns a collection (connection) of rows.
    pub is_connection: bool,
    /// The field traverses a to-many relation from a parent row to its children.
    pub is_backward_relation: bool,
    /// Where the field's rows come from.
    pub source: Option<FieldSource>,
    /// The table of the object type that owns the field, for backward relations.
    pub parent_table: Option<TableId>,
}

impl FieldScope {
    /// A top-level connection over `table`.
    #[must_use]
    pub fn connection(table: TableId) -> Self {
        Self {
            is_connection: true,
            is_backward_relation: false,
            source: Some(FieldSource::Table(table)),
            parent_table: None,
        }
    }

    /// A connection from `parent` rows to their `child` rows.
    #[must_use]
    pub fn backward_relation(child: TableId, parent: TableId) -> Self {
        Self {
            is_connection: true,
            is_backward_relation: true,
            source: Some(FieldSource::Table(child)),
            parent_table: Some(parent),
        }
    }

    /// The source table id, when the field reads from a table.
    #[must_use]
    pub fn table(&self) -> Option<TableId> {
        match self.source {
            Some(FieldSource::Table(id)) => Some(id),
            Some(FieldSource::Function(_)) | None => None,
        }
    }
}

/// Runtime or default value of a field argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Null,
    Bool(bool),
    Int(i64),
    String(String),
    /// An enum literal, by name.
    Enum(String),
}

impl ArgValue {
    /// Convenience constructor for enum literals.
    #[must_use]
    pub fn enum_value(name: impl Into<String>) -> Self {
        Self::Enum(name.into())
    }
}

/// Argument values keyed by argument name.
pub type ArgMap = HashMap<String, ArgValue>;

/// A declared field argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentDef {
    pub name: String,
    /// Name of the argument's type.
    pub type_name: String,
    pub default_value: Option<ArgValue>,
    pub description: Option<String>,
}

impl ArgumentDef {
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            default_value: None,
            description: None,
        }
    }

    #[must_use]
    pub fn with_default(mut self, value: ArgValue) -> Self {
        self.default_value = Some(value);
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A field of an object type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub scope: FieldScope,
    pub args: Vec<ArgumentDef>,
}

impl FieldDef {
    #[must_use]
    pub fn new(name: impl Into<String>, scope: FieldScope) -> Self {
        Self {
            name: name.into(),
            scope,
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_arg(mut self, arg: ArgumentDef) -> Self {
        self.args.push(arg);
        self
    }

    #[must_use]
    pub fn arg(&self, name: &str) -> Option<&ArgumentDef> {
        self.args.iter().find(|a| a.name == name)
    }
}

/// An object type and its fields, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectType {
    pub name: String,
    pub fields: Vec<FieldDef>,
}

impl ObjectType {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}
