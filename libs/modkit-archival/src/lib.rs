#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! `ModKit` archival filtering.
//!
//! Soft-deleted ("archived") rows are hidden from connection fields by default.
//! Any connection over a table with an archival marker column (default
//! `is_archived`) gains an `includeArchived: IncludeArchivedOption` argument:
//!
//! - `NO`: exclude archived rows (default)
//! - `YES`: include everything
//! - `EXCLUSIVELY`: only archived rows
//! - `INHERIT`: behave like `YES` when the parent row is archived, like `NO`
//!   otherwise (default for backward relations whose parent is archivable)
//!
//! Boolean marker columns mean archived when `true`; any other column type means
//! archived when non-null.
//!
//! # Example
//! ```rust
//! use std::sync::Arc;
//! use modkit_archival::{
//!     ArchivalConfig, ArgMap, FieldDef, FieldId, FieldQuery, FieldScope, InMemoryCatalog,
//!     ObjectType, OmitArchivedStrategy, SchemaBuilder, TableId, ValueCategory,
//! };
//! use sea_orm::sea_query::PostgresQueryBuilder;
//!
//! let mut catalog = InMemoryCatalog::new();
//! catalog
//!     .add_table(TableId(1), Some("app"), "posts")
//!     .add_column(TableId(1), "is_archived", ValueCategory::Boolean);
//!
//! let schema = SchemaBuilder::new(Arc::new(catalog))
//!     .with_strategy(OmitArchivedStrategy::new(ArchivalConfig::default()))
//!     .build(vec![ObjectType::new("Query")
//!         .with_field(FieldDef::new("allPosts", FieldScope::connection(TableId(1))))])
//!     .unwrap();
//!
//! let mut query = FieldQuery::root("posts", "__local_0__");
//! schema
//!     .apply_predicates(&FieldId::new("Query", "allPosts"), &ArgMap::new(), &mut query)
//!     .unwrap();
//! assert!(query
//!     .to_sql(PostgresQueryBuilder)
//!     .contains(r#""__local_0__"."is_archived" IS FALSE"#));
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod introspect;
pub mod omit_archived;
pub mod option;
pub mod query;
pub mod schema;

pub use catalog::{Catalog, ColumnInfo, InMemoryCatalog, TableId, TableInfo, ValueCategory};
pub use config::{ArchivalConfig, DEFAULT_ARCHIVED_COLUMN};
pub use error::{ConfigError, QueryError, SchemaError};
pub use introspect::{PgColumnRow, load_pg_catalog};
pub use omit_archived::{
    ArchivalColumn, FieldArchivalConfig, INCLUDE_ARCHIVED_ARG, OmitArchivedStrategy,
};
pub use option::{
    INCLUDE_ARCHIVED_OPTION, IncludeArchivedOption, UnknownOption, include_archived_option_enum,
};
pub use query::{FieldQuery, QueryPredicate};
pub use schema::{
    ArgMap, ArgValue, ArgumentDef, BuildContext, BuiltSchema, EnumType, EnumValue,
    FieldAugmentation, FieldContext, FieldDef, FieldId, FieldOutcome, FieldScope, FieldSource,
    FieldStrategy, ObjectType, SchemaBuilder, TypeRegistry,
};
