//! Table and column metadata consumed by the archival strategy.
//!
//! The strategy only needs three lookups: a table by id, a column by table and
//! name, and the column's [`ValueCategory`]. `InMemoryCatalog` holds the result of
//! an introspection pass (see [`crate::introspect`]) or hand-built fixtures.

use std::collections::HashMap;
use std::fmt;

/// Catalog identifier of a relation (the `pg_class` oid for PostgreSQL).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId(pub i64);

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How "archived" is encoded in a marker column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueCategory {
    /// `true` means archived.
    Boolean,
    /// Any other type (typically a timestamp); non-null means archived.
    NullableMarker,
}

impl ValueCategory {
    /// Classifies a PostgreSQL `pg_type.typcategory` code. Only `B` is boolean.
    #[must_use]
    pub fn from_pg_category(code: &str) -> Self {
        if code == "B" {
            Self::Boolean
        } else {
            Self::NullableMarker
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    pub id: TableId,
    pub name: String,
    /// Schema the relation lives in. Relations without one are not queryable.
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub table: TableId,
    pub name: String,
    pub category: ValueCategory,
}

/// Read-only metadata lookups.
pub trait Catalog: Send + Sync {
    fn table(&self, id: TableId) -> Option<&TableInfo>;

    fn columns(&self, table: TableId) -> Vec<&ColumnInfo>;

    fn column(&self, table: TableId, name: &str) -> Option<&ColumnInfo> {
        self.columns(table).into_iter().find(|c| c.name == name)
    }
}

/// Catalog backed by in-memory maps.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    tables: HashMap<TableId, TableInfo>,
    columns: HashMap<TableId, Vec<ColumnInfo>>,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table, replacing any previous definition with the same id.
    pub fn add_table(
        &mut self,
        id: TableId,
        namespace: Option<&str>,
        name: impl Into<String>,
    ) -> &mut Self {
        self.tables.insert(
            id,
            TableInfo {
                id,
                name: name.into(),
                namespace: namespace.map(str::to_owned),
            },
        );
        self
    }

    /// Adds a column to `table`. A column with the same name is replaced.
    pub fn add_column(
        &mut self,
        table: TableId,
        name: impl Into<String>,
        category: ValueCategory,
    ) -> &mut Self {
        let name = name.into();
        let cols = self.columns.entry(table).or_default();
        cols.retain(|c| c.name != name);
        cols.push(ColumnInfo {
            table,
            name,
            category,
        });
        self
    }

    /// Number of known tables.
    #[must_use]
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}

impl Catalog for InMemoryCatalog {
    fn table(&self, id: TableId) -> Option<&TableInfo> {
        self.tables.get(&id)
    }

    fn columns(&self, table: TableId) -> Vec<&ColumnInfo> {
        self.columns
            .get(&table)
            .map(|cols| cols.iter().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_category_from_pg_category() {
        assert_eq!(ValueCategory::from_pg_category("B"), ValueCategory::Boolean);
        assert_eq!(
            ValueCategory::from_pg_category("D"),
            ValueCategory::NullableMarker
        );
        assert_eq!(
            ValueCategory::from_pg_category("b"),
            ValueCategory::NullableMarker
        );
    }

    #[test]
    fn test_column_lookup() {
        let mut catalog = InMemoryCatalog::new();
        catalog
            .add_table(TableId(1), Some("app"), "posts")
            .add_column(TableId(1), "id", ValueCategory::NullableMarker)
            .add_column(TableId(1), "is_archived", ValueCategory::Boolean);

        let col = catalog.column(TableId(1), "is_archived").unwrap();
        assert_eq!(col.category, ValueCategory::Boolean);
        assert!(catalog.column(TableId(1), "archived_at").is_none());
        assert!(catalog.column(TableId(2), "is_archived").is_none());
        assert_eq!(catalog.columns(TableId(1)).len(), 2);
    }

    #[test]
    fn test_add_column_replaces_same_name() {
        let mut catalog = InMemoryCatalog::new();
        catalog
            .add_column(TableId(1), "is_archived", ValueCategory::NullableMarker)
            .add_column(TableId(1), "is_archived", ValueCategory::Boolean);
        assert_eq!(catalog.columns(TableId(1)).len(), 1);
        assert_eq!(
            catalog.column(TableId(1), "is_archived").map(|c| c.category),
            Some(ValueCategory::Boolean)
        );
    }

    #[test]
    fn test_table_keeps_optional_namespace() {
        let mut catalog = InMemoryCatalog::new();
        catalog
            .add_table(TableId(1), Some("app"), "posts")
            .add_table(TableId(2), None, "posts");
        assert_eq!(
            catalog.table(TableId(1)).and_then(|t| t.namespace.as_deref()),
            Some("app")
        );
        assert_eq!(catalog.table(TableId(2)).map(|t| t.namespace.is_none()), Some(true));
    }
}
