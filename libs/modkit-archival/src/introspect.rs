//! PostgreSQL catalog introspection.
//!
//! Reads every relation the archival strategy may see (tables, views, materialized
//! views, foreign and partitioned tables) together with its columns and their
//! `pg_type.typcategory`, and folds the rows into an [`InMemoryCatalog`].

use sea_orm::{ConnectionTrait, DbBackend, DbErr, FromQueryResult, Statement};

use crate::catalog::{Catalog, InMemoryCatalog, TableId, ValueCategory};

const PG_CATALOG_SQL: &str = r"
SELECT c.oid::bigint        AS table_oid,
       n.nspname::text      AS namespace,
       c.relname::text      AS table_name,
       a.attname::text      AS column_name,
       t.typcategory::text  AS type_category
  FROM pg_catalog.pg_class c
  JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
  LEFT JOIN pg_catalog.pg_attribute a
         ON a.attrelid = c.oid AND a.attnum > 0 AND NOT a.attisdropped
  LEFT JOIN pg_catalog.pg_type t ON t.oid = a.atttypid
 WHERE c.relkind IN ('r', 'v', 'm', 'f', 'p')
   AND n.nspname <> 'information_schema'
   AND n.nspname !~ '^pg_'
 ORDER BY c.oid, a.attnum
";

/// One relation/column pair from the introspection query.
///
/// Relations without columns produce a single row with `column_name = None`.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct PgColumnRow {
    pub table_oid: i64,
    pub namespace: String,
    pub table_name: String,
    pub column_name: Option<String>,
    pub type_category: Option<String>,
}

/// Loads the catalog of the given schemas (all non-system schemas when empty).
///
/// # Errors
/// Returns `DbErr` if the introspection query fails or a row cannot be decoded.
pub async fn load_pg_catalog<C>(conn: &C, schemas: &[&str]) -> Result<InMemoryCatalog, DbErr>
where
    C: ConnectionTrait,
{
    let stmt = Statement::from_string(DbBackend::Postgres, PG_CATALOG_SQL);
    let rows = PgColumnRow::find_by_statement(stmt).all(conn).await?;
    let total = rows.len();

    let catalog = InMemoryCatalog::from_rows(
        rows.into_iter()
            .filter(|r| schemas.is_empty() || schemas.contains(&r.namespace.as_str())),
    );
    tracing::debug!(
        rows = total,
        tables = catalog.table_count(),
        "Loaded PostgreSQL catalog"
    );
    Ok(catalog)
}

impl InMemoryCatalog {
    /// Folds introspection rows into a catalog.
    #[must_use]
    pub fn from_rows(rows: impl IntoIterator<Item = PgColumnRow>) -> Self {
        let mut catalog = Self::new();
        for row in rows {
            let table = TableId(row.table_oid);
            if catalog.table(table).is_none() {
                catalog.add_table(table, Some(row.namespace.as_str()), row.table_name);
            }
            if let Some(column) = row.column_name {
                let category = row
                    .type_category
                    .as_deref()
                    .map_or(ValueCategory::NullableMarker, ValueCategory::from_pg_category);
                catalog.add_column(table, column, category);
            }
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(oid: i64, table: &str, column: Option<&str>, category: Option<&str>) -> PgColumnRow {
        PgColumnRow {
            table_oid: oid,
            namespace: "app".to_owned(),
            table_name: table.to_owned(),
            column_name: column.map(str::to_owned),
            type_category: category.map(str::to_owned),
        }
    }

    #[test]
    fn test_from_rows_groups_columns_by_table() {
        let catalog = InMemoryCatalog::from_rows(vec![
            row(10, "posts", Some("id"), Some("N")),
            row(10, "posts", Some("is_archived"), Some("B")),
            row(11, "comments", Some("archived_at"), Some("D")),
            row(12, "empty_view", None, None),
        ]);

        assert_eq!(catalog.table_count(), 3);
        assert_eq!(catalog.columns(TableId(10)).len(), 2);
        assert_eq!(
            catalog.column(TableId(10), "is_archived").map(|c| c.category),
            Some(ValueCategory::Boolean)
        );
        assert_eq!(
            catalog.column(TableId(11), "archived_at").map(|c| c.category),
            Some(ValueCategory::NullableMarker)
        );
        assert!(catalog.columns(TableId(12)).is_empty());
        assert_eq!(
            catalog.table(TableId(11)).and_then(|t| t.namespace.as_deref()),
            Some("app")
        );
    }
}
