//! Named enum types referenced by field arguments.

use std::collections::BTreeMap;

use crate::error::SchemaError;

/// One member of an enum type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    /// Literal exposed to clients.
    pub name: String,
    /// Internal value the literal resolves to.
    pub value: String,
    pub description: Option<String>,
}

/// A named enum type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    pub name: String,
    pub description: Option<String>,
    pub values: Vec<EnumValue>,
}

impl EnumType {
    /// Resolves a client literal to its internal value.
    #[must_use]
    pub fn resolve(&self, literal: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|v| v.name == literal)
            .map(|v| v.value.as_str())
    }
}

/// Registry of named types available to field arguments.
///
/// Only enum types are modelled; scalar names such as `Int` or `String` are
/// accepted as argument types without registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeRegistry {
    enums: BTreeMap<String, EnumType>,
}

impl TypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `ty` under its name.
    ///
    /// Registering an identical definition again is a no-op.
    ///
    /// # Errors
    /// Returns `SchemaError::TypeConflict` if a different definition already owns the name.
    pub fn register_enum(&mut self, ty: EnumType) -> Result<(), SchemaError> {
        match self.enums.get(&ty.name) {
            Some(existing) if *existing == ty => Ok(()),
            Some(_) => Err(SchemaError::TypeConflict { name: ty.name }),
            None => {
                tracing::trace!(type_name = %ty.name, "Registering enum type");
                self.enums.insert(ty.name.clone(), ty);
                Ok(())
            }
        }
    }

    #[must_use]
    pub fn enum_type(&self, name: &str) -> Option<&EnumType> {
        self.enums.get(name)
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.enums.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.enums.is_empty()
    }
}
