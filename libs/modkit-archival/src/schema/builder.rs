//! Schema build pipeline.
//!
//! `SchemaBuilder` visits every field once and runs the registered `FieldStrategy`
//! list in order. Strategies may append arguments and attach a `QueryPredicate`;
//! the result is an immutable `BuiltSchema` that applies those predicates per query.

use std::collections::HashMap;
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::error::{QueryError, SchemaError};
use crate::query::{FieldQuery, QueryPredicate};

use super::{ArgMap, ArgValue, ArgumentDef, FieldDef, FieldId, FieldScope, ObjectType, TypeRegistry};

/// Shared lookups available to every strategy during a build.
#[derive(Clone, Copy)]
pub struct BuildContext<'a> {
    pub catalog: &'a dyn Catalog,
    pub types: &'a TypeRegistry,
}

/// The field currently being processed, with the arguments accumulated so far.
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    pub id: &'a FieldId,
    pub scope: &'a FieldScope,
    pub args: &'a [ArgumentDef],
}

impl<'a> FieldContext<'a> {
    #[must_use]
    pub fn arg(&self, name: &str) -> Option<&'a ArgumentDef> {
        self.args.iter().find(|a| a.name == name)
    }

    #[must_use]
    pub fn has_arg(&self, name: &str) -> bool {
        self.arg(name).is_some()
    }
}

/// What a strategy adds to a field.
#[derive(Debug)]
pub struct FieldAugmentation {
    /// Arguments appended to the field; names must not already exist. Empty when
    /// the strategy only reattaches a generator to arguments it added earlier.
    pub arguments: Vec<ArgumentDef>,
    /// Generator run for every query of this field.
    pub predicate: Option<Arc<dyn QueryPredicate>>,
    /// Human-readable description of the change, logged at debug level.
    pub provenance: String,
}

#[derive(Debug)]
pub enum FieldOutcome {
    Unchanged,
    Augmented(FieldAugmentation),
}

/// A pluggable step run for every field of every object type.
pub trait FieldStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Registers the types this strategy's arguments refer to.
    /// Called once per build, before any field is visited.
    ///
    /// # Errors
    /// Returns `SchemaError::TypeConflict` if a type name is taken by another definition.
    fn register_types(&self, _types: &mut TypeRegistry) -> Result<(), SchemaError> {
        Ok(())
    }

    /// Decides whether and how to augment `field`.
    ///
    /// # Errors
    /// Implementations return `SchemaError` only for mis-wired builds (e.g. a missing type).
    fn augment(
        &self,
        ctx: &BuildContext<'_>,
        field: &FieldContext<'_>,
    ) -> Result<FieldOutcome, SchemaError>;
}

/// Walks object types once and applies the ordered strategy list to every field.
pub struct SchemaBuilder {
    catalog: Arc<dyn Catalog>,
    strategies: Vec<Box<dyn FieldStrategy>>,
}

impl SchemaBuilder {
    #[must_use]
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self {
            catalog,
            strategies: Vec::new(),
        }
    }

    /// Appends a strategy; strategies run in insertion order.
    #[must_use]
    pub fn with_strategy(mut self, strategy: impl FieldStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Builds a schema from scratch.
    ///
    /// # Errors
    /// Propagates `SchemaError` from type registration, strategies or argument extension.
    pub fn build(&self, object_types: Vec<ObjectType>) -> Result<BuiltSchema, SchemaError> {
        self.build_with_types(TypeRegistry::new(), object_types)
    }

    /// Builds a schema on top of an existing type registry.
    ///
    /// # Errors
    /// Propagates `SchemaError` from type registration, strategies or argument extension.
    pub fn build_with_types(
        &self,
        mut types: TypeRegistry,
        object_types: Vec<ObjectType>,
    ) -> Result<BuiltSchema, SchemaError> {
        for strategy in &self.strategies {
            strategy.register_types(&mut types)?;
        }

        let ctx = BuildContext {
            catalog: self.catalog.as_ref(),
            types: &types,
        };
        let mut predicates: HashMap<FieldId, Vec<Arc<dyn QueryPredicate>>> = HashMap::new();
        let mut built = Vec::with_capacity(object_types.len());

        for mut object_type in object_types {
            for field in &mut object_type.fields {
                let id = FieldId::new(object_type.name.as_str(), field.name.as_str());
                let field_predicates = self.process_field(&ctx, &id, field)?;
                if !field_predicates.is_empty() {
                    predicates.entry(id).or_default().extend(field_predicates);
                }
            }
            built.push(object_type);
        }

        tracing::debug!(
            object_types = built.len(),
            filtered_fields = predicates.len(),
            "Schema build complete"
        );

        Ok(BuiltSchema {
            types,
            object_types: built,
            predicates,
        })
    }

    fn process_field(
        &self,
        ctx: &BuildContext<'_>,
        id: &FieldId,
        field: &mut FieldDef,
    ) -> Result<Vec<Arc<dyn QueryPredicate>>, SchemaError> {
        let mut generators = Vec::new();
        for strategy in &self.strategies {
            let outcome = strategy.augment(
                ctx,
                &FieldContext {
                    id,
                    scope: &field.scope,
                    args: &field.args,
                },
            )?;
            let FieldOutcome::Augmented(aug) = outcome else {
                continue;
            };
            for arg in aug.arguments {
                extend_args(&mut field.args, arg, id)?;
            }
            tracing::debug!(strategy = strategy.name(), field = %id, "{}", aug.provenance);
            generators.extend(aug.predicate);
        }
        Ok(generators)
    }
}

/// Appends `arg` unless a same-named argument already exists.
fn extend_args(
    args: &mut Vec<ArgumentDef>,
    arg: ArgumentDef,
    field: &FieldId,
) -> Result<(), SchemaError> {
    if args.iter().any(|a| a.name == arg.name) {
        return Err(SchemaError::DuplicateArgument {
            field: field.clone(),
            argument: arg.name,
        });
    }
    args.push(arg);
    Ok(())
}

/// Output of a build: augmented object types, registered types and the
/// query-time generators keyed by field.
#[derive(Debug)]
pub struct BuiltSchema {
    types: TypeRegistry,
    object_types: Vec<ObjectType>,
    predicates: HashMap<FieldId, Vec<Arc<dyn QueryPredicate>>>,
}

impl BuiltSchema {
    #[must_use]
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    #[must_use]
    pub fn object_types(&self) -> &[ObjectType] {
        &self.object_types
    }

    /// Hands back the registry and object types, e.g. to feed another build.
    #[must_use]
    pub fn into_parts(self) -> (TypeRegistry, Vec<ObjectType>) {
        (self.types, self.object_types)
    }

    #[must_use]
    pub fn field(&self, id: &FieldId) -> Option<&FieldDef> {
        self.object_types
            .iter()
            .find(|t| t.name == id.type_name)
            .and_then(|t| t.field(&id.field_name))
    }

    #[must_use]
    pub fn predicates(&self, id: &FieldId) -> &[Arc<dyn QueryPredicate>] {
        self.predicates.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Merges caller-supplied values over the field's declared defaults.
    ///
    /// Enum arguments accept `Enum` or `String` literals and resolve them through the
    /// type registry; `Null` falls back to the declared default.
    ///
    /// # Errors
    /// - `QueryError::UnknownField` / `UnknownArgument` for names the schema does not know
    /// - `QueryError::InvalidEnumValue` for literals outside the enum
    /// - `QueryError::TypeMismatch` for non-literal values passed to an enum argument
    pub fn resolve_args(&self, id: &FieldId, supplied: &ArgMap) -> Result<ArgMap, QueryError> {
        let field = self
            .field(id)
            .ok_or_else(|| QueryError::UnknownField(id.clone()))?;

        let mut resolved = ArgMap::with_capacity(field.args.len());
        for (name, value) in supplied {
            let def = field.arg(name).ok_or_else(|| QueryError::UnknownArgument {
                field: id.clone(),
                argument: name.clone(),
            })?;
            if *value == ArgValue::Null {
                continue;
            }
            resolved.insert(name.clone(), self.coerce(id, def, value)?);
        }
        for def in &field.args {
            if let Some(default) = &def.default_value {
                resolved
                    .entry(def.name.clone())
                    .or_insert_with(|| default.clone());
            }
        }
        Ok(resolved)
    }

    fn coerce(
        &self,
        id: &FieldId,
        def: &ArgumentDef,
        value: &ArgValue,
    ) -> Result<ArgValue, QueryError> {
        let Some(enum_type) = self.types.enum_type(&def.type_name) else {
            return Ok(value.clone());
        };
        let literal = match value {
            ArgValue::Enum(s) | ArgValue::String(s) => s,
            _ => {
                return Err(QueryError::TypeMismatch {
                    field: id.clone(),
                    argument: def.name.clone(),
                    type_name: def.type_name.clone(),
                });
            }
        };
        enum_type
            .resolve(literal)
            .map(ArgValue::enum_value)
            .ok_or_else(|| QueryError::InvalidEnumValue {
                field: id.clone(),
                argument: def.name.clone(),
                value: literal.clone(),
                type_name: def.type_name.clone(),
            })
    }

    /// Resolves the field occurrence's arguments and runs every generator
    /// registered for the field against `query`.
    ///
    /// # Errors
    /// Returns the `QueryError` produced by [`Self::resolve_args`].
    pub fn apply_predicates(
        &self,
        id: &FieldId,
        supplied: &ArgMap,
        query: &mut FieldQuery<'_>,
    ) -> Result<(), QueryError> {
        let args = self.resolve_args(id, supplied)?;
        for predicate in self.predicates(id) {
            predicate.apply(&args, query);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{InMemoryCatalog, TableId};
    use crate::schema::{EnumType, EnumValue};

    /// Adds a `first: Int` argument to every connection.
    struct FirstArg;

    impl FieldStrategy for FirstArg {
        fn name(&self) -> &'static str {
            "first-arg"
        }

        fn augment(
            &self,
            _ctx: &BuildContext<'_>,
            field: &FieldContext<'_>,
        ) -> Result<FieldOutcome, SchemaError> {
            if !field.scope.is_connection {
                return Ok(FieldOutcome::Unchanged);
            }
            Ok(FieldOutcome::Augmented(FieldAugmentation {
                arguments: vec![ArgumentDef::new("first", "Int")],
                predicate: None,
                provenance: format!("Adding first to {}", field.id),
            }))
        }
    }

    struct Direction;

    impl FieldStrategy for Direction {
        fn name(&self) -> &'static str {
            "direction"
        }

        fn register_types(&self, types: &mut TypeRegistry) -> Result<(), SchemaError> {
            types.register_enum(EnumType {
                name: "Direction".to_owned(),
                description: None,
                values: ["ASC", "DESC"]
                    .into_iter()
                    .map(|v| EnumValue {
                        name: v.to_owned(),
                        value: v.to_lowercase(),
                        description: None,
                    })
                    .collect(),
            })
        }

        fn augment(
            &self,
            _ctx: &BuildContext<'_>,
            _field: &FieldContext<'_>,
        ) -> Result<FieldOutcome, SchemaError> {
            Ok(FieldOutcome::Augmented(FieldAugmentation {
                arguments: vec![
                    ArgumentDef::new("direction", "Direction")
                        .with_default(ArgValue::enum_value("asc")),
                ],
                predicate: None,
                provenance: String::new(),
            }))
        }
    }

    fn object_types() -> Vec<ObjectType> {
        vec![
            ObjectType::new("Query")
                .with_field(FieldDef::new("allPosts", FieldScope::connection(TableId(1))))
                .with_field(FieldDef::new("version", FieldScope::default())),
        ]
    }

    fn builder() -> SchemaBuilder {
        SchemaBuilder::new(Arc::new(InMemoryCatalog::new()))
    }

    #[test]
    fn test_strategies_run_in_order_and_extend_args() {
        let schema = builder()
            .with_strategy(FirstArg)
            .with_strategy(Direction)
            .build(object_types())
            .unwrap();

        let all_posts = schema.field(&FieldId::new("Query", "allPosts")).unwrap();
        let names: Vec<_> = all_posts.args.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["first", "direction"]);

        let version = schema.field(&FieldId::new("Query", "version")).unwrap();
        assert_eq!(version.args.len(), 1);
    }

    #[test]
    fn test_duplicate_argument_is_rejected() {
        let err = builder()
            .with_strategy(FirstArg)
            .with_strategy(FirstArg)
            .build(object_types())
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateArgument {
                field: FieldId::new("Query", "allPosts"),
                argument: "first".to_owned(),
            }
        );
    }

    #[test]
    fn test_resolve_args_applies_defaults_and_resolves_enums() {
        let schema = builder().with_strategy(Direction).build(object_types()).unwrap();
        let id = FieldId::new("Query", "allPosts");

        let defaults = schema.resolve_args(&id, &ArgMap::new()).unwrap();
        assert_eq!(defaults.get("direction"), Some(&ArgValue::enum_value("asc")));

        let supplied =
            ArgMap::from([("direction".to_owned(), ArgValue::String("DESC".to_owned()))]);
        let resolved = schema.resolve_args(&id, &supplied).unwrap();
        assert_eq!(resolved.get("direction"), Some(&ArgValue::enum_value("desc")));

        let null = ArgMap::from([("direction".to_owned(), ArgValue::Null)]);
        let resolved = schema.resolve_args(&id, &null).unwrap();
        assert_eq!(resolved.get("direction"), Some(&ArgValue::enum_value("asc")));
    }

    #[test]
    fn test_resolve_args_errors() {
        let schema = builder().with_strategy(Direction).build(object_types()).unwrap();
        let id = FieldId::new("Query", "allPosts");

        let bad = ArgMap::from([("direction".to_owned(), ArgValue::enum_value("SIDEWAYS"))]);
        assert!(matches!(
            schema.resolve_args(&id, &bad),
            Err(QueryError::InvalidEnumValue { .. })
        ));

        let wrong_type = ArgMap::from([("direction".to_owned(), ArgValue::Int(1))]);
        assert!(matches!(
            schema.resolve_args(&id, &wrong_type),
            Err(QueryError::TypeMismatch { .. })
        ));

        let unknown = ArgMap::from([("last".to_owned(), ArgValue::Int(1))]);
        assert!(matches!(
            schema.resolve_args(&id, &unknown),
            Err(QueryError::UnknownArgument { .. })
        ));

        assert_eq!(
            schema.resolve_args(&FieldId::new("Query", "nope"), &ArgMap::new()),
            Err(QueryError::UnknownField(FieldId::new("Query", "nope")))
        );
    }

    #[test]
    fn test_built_schema_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BuiltSchema>();
    }
}
