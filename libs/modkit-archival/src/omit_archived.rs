//! Hides archived rows from connection fields unless the caller asks for them.
//!
//! For every connection over a table that has the archival marker column,
//! `OmitArchivedStrategy` adds an `includeArchived: IncludeArchivedOption` argument
//! and registers a [`FieldArchivalConfig`] that turns the argument into a filter:
//!
//! | option        | condition                                                      |
//! |---------------|----------------------------------------------------------------|
//! | `NO`          | `child.col IS <not archived>`                                  |
//! | `YES`         | none                                                           |
//! | `EXCLUSIVELY` | `child.col IS NOT <not archived>`                              |
//! | `INHERIT`     | `(parent.col IS NOT <not archived> OR child.col IS <not archived>)` |
//!
//! `<not archived>` is `FALSE` for boolean columns and `NULL` otherwise. `INHERIT`
//! falls back to `NO` when the field cannot see an archivable parent row.

use std::sync::Arc;

use sea_orm::sea_query::{Condition, SimpleExpr};

use crate::catalog::{Catalog, TableId, ValueCategory};
use crate::config::ArchivalConfig;
use crate::error::SchemaError;
use crate::option::{INCLUDE_ARCHIVED_OPTION, IncludeArchivedOption, include_archived_option_enum};
use crate::query::{FieldQuery, QueryPredicate, qualified};
use crate::schema::{
    ArgMap, ArgValue, ArgumentDef, BuildContext, FieldAugmentation, FieldContext, FieldId,
    FieldOutcome, FieldStrategy, TypeRegistry,
};

/// Name of the argument added to connection fields.
pub const INCLUDE_ARCHIVED_ARG: &str = "includeArchived";

const ARG_DESCRIPTION: &str =
    "Indicates whether archived items should be included in the results or not.";

/// The archival marker column of one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivalColumn {
    pub table: TableId,
    pub name: String,
    pub category: ValueCategory,
}

impl ArchivalColumn {
    /// Finds `column_name` on `table`, if the catalog knows it.
    #[must_use]
    pub fn lookup(catalog: &dyn Catalog, table: TableId, column_name: &str) -> Option<Self> {
        catalog.column(table, column_name).map(|c| Self {
            table: c.table,
            name: c.name.clone(),
            category: c.category,
        })
    }

    /// `alias.col IS FALSE` or `alias.col IS NULL`.
    #[must_use]
    pub fn not_archived(&self, alias: &str) -> SimpleExpr {
        let col = qualified(alias, &self.name);
        match self.category {
            ValueCategory::Boolean => col.is(false),
            ValueCategory::NullableMarker => col.is_null(),
        }
    }

    /// `alias.col IS NOT FALSE` or `alias.col IS NOT NULL`.
    #[must_use]
    pub fn archived(&self, alias: &str) -> SimpleExpr {
        let col = qualified(alias, &self.name);
        match self.category {
            ValueCategory::Boolean => col.is_not(false),
            ValueCategory::NullableMarker => col.is_not_null(),
        }
    }
}

/// Build-time decision for one connection field, evaluated for each query of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldArchivalConfig {
    field: FieldId,
    column: ArchivalColumn,
    parent_column: Option<ArchivalColumn>,
}

impl FieldArchivalConfig {
    /// `parent_column` must only be set for backward relations; its presence makes
    /// the field capable of `INHERIT`.
    #[must_use]
    pub fn new(
        field: FieldId,
        column: ArchivalColumn,
        parent_column: Option<ArchivalColumn>,
    ) -> Self {
        Self {
            field,
            column,
            parent_column,
        }
    }

    #[must_use]
    pub fn field(&self) -> &FieldId {
        &self.field
    }

    #[must_use]
    pub fn column(&self) -> &ArchivalColumn {
        &self.column
    }

    #[must_use]
    pub fn parent_column(&self) -> Option<&ArchivalColumn> {
        self.parent_column.as_ref()
    }

    #[must_use]
    pub fn capable_of_inherit(&self) -> bool {
        self.parent_column.is_some()
    }

    #[must_use]
    pub fn default_option(&self) -> IncludeArchivedOption {
        if self.capable_of_inherit() {
            IncludeArchivedOption::Inherit
        } else {
            IncludeArchivedOption::No
        }
    }

    /// Condition for `option`, or `None` when every row passes.
    ///
    /// `parent_alias` is the enclosing query's table alias, if there is one.
    #[must_use]
    pub fn condition(
        &self,
        option: IncludeArchivedOption,
        child_alias: &str,
        parent_alias: Option<&str>,
    ) -> Option<Condition> {
        if option == IncludeArchivedOption::Inherit {
            if let (Some(parent_column), Some(parent_alias)) = (&self.parent_column, parent_alias) {
                return Some(
                    Condition::all().add(
                        Condition::any()
                            .add(parent_column.archived(parent_alias))
                            .add(self.column.not_archived(child_alias)),
                    ),
                );
            }
        }
        match option {
            IncludeArchivedOption::Yes => None,
            IncludeArchivedOption::Exclusively => {
                Some(Condition::all().add(self.column.archived(child_alias)))
            }
            IncludeArchivedOption::No | IncludeArchivedOption::Inherit => {
                Some(Condition::all().add(self.column.not_archived(child_alias)))
            }
        }
    }

    fn option_from_args(&self, args: &ArgMap) -> Option<IncludeArchivedOption> {
        let literal = match args.get(INCLUDE_ARCHIVED_ARG) {
            None => return Some(self.default_option()),
            Some(ArgValue::Enum(s) | ArgValue::String(s)) => s.as_str(),
            Some(other) => {
                tracing::warn!(
                    field = %self.field,
                    value = ?other,
                    "Ignoring non-enum includeArchived value"
                );
                return None;
            }
        };
        match literal.parse::<IncludeArchivedOption>() {
            Ok(option) => Some(option),
            Err(err) => {
                tracing::warn!(field = %self.field, %err, "Ignoring includeArchived value");
                None
            }
        }
    }
}

impl QueryPredicate for FieldArchivalConfig {
    fn apply(&self, args: &ArgMap, query: &mut FieldQuery<'_>) {
        let Some(option) = self.option_from_args(args) else {
            return;
        };
        let parent_alias = query.parent().map(|p| p.table_alias().to_owned());
        let condition = self.condition(option, query.table_alias(), parent_alias.as_deref());
        if let Some(condition) = condition {
            tracing::trace!(field = %self.field, option = %option, "Applying archival filter");
            query.and_where(condition);
        }
    }
}

/// Adds `includeArchived` to connection fields over archivable tables.
#[derive(Debug, Clone, Default)]
pub struct OmitArchivedStrategy {
    config: ArchivalConfig,
}

impl OmitArchivedStrategy {
    #[must_use]
    pub fn new(config: ArchivalConfig) -> Self {
        Self { config }
    }

    /// Decides whether `field` gets archival filtering, without touching the schema.
    ///
    /// An `includeArchived` argument of another type belongs to someone else and
    /// disables filtering; one typed `IncludeArchivedOption` was added by an earlier
    /// build and is planned again so its filter is reattached.
    #[must_use]
    pub fn plan(
        &self,
        catalog: &dyn Catalog,
        field: &FieldContext<'_>,
    ) -> Option<FieldArchivalConfig> {
        let scope = field.scope;
        if !scope.is_connection {
            return None;
        }
        if field
            .arg(INCLUDE_ARCHIVED_ARG)
            .is_some_and(|a| a.type_name != INCLUDE_ARCHIVED_OPTION)
        {
            return None;
        }
        let table = catalog.table(scope.table()?)?;
        table.namespace.as_ref()?;

        let column_name = self.config.column_name.as_str();
        let Some(column) = ArchivalColumn::lookup(catalog, table.id, column_name) else {
            tracing::trace!(field = %field.id, table = %table.name, "No archival column");
            return None;
        };

        let parent_column = if scope.is_backward_relation {
            scope
                .parent_table
                .and_then(|parent| ArchivalColumn::lookup(catalog, parent, column_name))
        } else {
            None
        };

        Some(FieldArchivalConfig::new(field.id.clone(), column, parent_column))
    }
}

impl FieldStrategy for OmitArchivedStrategy {
    fn name(&self) -> &'static str {
        "omit-archived"
    }

    fn register_types(&self, types: &mut TypeRegistry) -> Result<(), SchemaError> {
        types.register_enum(include_archived_option_enum())
    }

    fn augment(
        &self,
        ctx: &BuildContext<'_>,
        field: &FieldContext<'_>,
    ) -> Result<FieldOutcome, SchemaError> {
        let Some(plan) = self.plan(ctx.catalog, field) else {
            return Ok(FieldOutcome::Unchanged);
        };
        if ctx.types.enum_type(INCLUDE_ARCHIVED_OPTION).is_none() {
            return Err(SchemaError::UnknownType {
                name: INCLUDE_ARCHIVED_OPTION.to_owned(),
            });
        }

        let default = plan.default_option();
        tracing::debug!(
            field = %field.id,
            column = %plan.column().name,
            default = %default,
            inherit = plan.capable_of_inherit(),
            "Planned archival filter"
        );

        let (arguments, provenance) = if field.has_arg(INCLUDE_ARCHIVED_ARG) {
            let provenance = format!(
                "Reattaching archival filter to connection field '{}' of '{}'",
                field.id.field_name, field.id.type_name
            );
            (Vec::new(), provenance)
        } else {
            let argument = ArgumentDef::new(INCLUDE_ARCHIVED_ARG, INCLUDE_ARCHIVED_OPTION)
                .with_default(ArgValue::enum_value(default.as_str()))
                .with_description(ARG_DESCRIPTION);
            let provenance = format!(
                "Adding includeArchived argument to connection field '{}' of '{}'",
                field.id.field_name, field.id.type_name
            );
            (vec![argument], provenance)
        };

        Ok(FieldOutcome::Augmented(FieldAugmentation {
            arguments,
            predicate: Some(Arc::new(plan)),
            provenance,
        }))
    }
}
