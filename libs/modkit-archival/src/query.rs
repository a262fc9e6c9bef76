//! Request-scoped query builder handed to predicate generators.
//!
//! A `FieldQuery` wraps the sea-query `SelectStatement` generated for one field
//! occurrence. It knows its own table alias and, for nested fields, the query of
//! the enclosing field, so generators can refer to both rows.

use std::fmt;

use sea_orm::sea_query::{Alias, Asterisk, Condition, Expr, Query, QueryBuilder, SelectStatement};

use crate::schema::ArgMap;

/// Query-time filter generator registered for a field at build time.
///
/// Implementations hold only immutable build-time metadata, so one instance is
/// shared by all concurrent requests.
pub trait QueryPredicate: Send + Sync + fmt::Debug {
    /// Adds this generator's conditions to `query`, given the field occurrence's
    /// resolved arguments (caller values merged over declared defaults).
    fn apply(&self, args: &ArgMap, query: &mut FieldQuery<'_>);
}

/// Select statement for one field occurrence, linked to its parent's query.
pub struct FieldQuery<'p> {
    alias: String,
    statement: SelectStatement,
    parent: Option<&'p FieldQuery<'p>>,
}

impl FieldQuery<'static> {
    /// Starts a top-level query selecting `alias.*` from `table AS alias`.
    #[must_use]
    pub fn root(table: &str, alias: &str) -> Self {
        Self::with_parent(table, alias, None)
    }
}

impl<'p> FieldQuery<'p> {
    /// Starts a query nested under `parent`; the parent's alias stays resolvable.
    #[must_use]
    pub fn nested(parent: &'p FieldQuery<'p>, table: &str, alias: &str) -> Self {
        Self::with_parent(table, alias, Some(parent))
    }

    fn with_parent(table: &str, alias: &str, parent: Option<&'p FieldQuery<'p>>) -> Self {
        let statement = Query::select()
            .column((Alias::new(alias), Asterisk))
            .from_as(Alias::new(table), Alias::new(alias))
            .to_owned();
        Self {
            alias: alias.to_owned(),
            statement,
            parent,
        }
    }

    #[must_use]
    pub fn table_alias(&self) -> &str {
        &self.alias
    }

    #[must_use]
    pub fn parent(&self) -> Option<&FieldQuery<'p>> {
        self.parent
    }

    /// `"alias"."column"` for this query's table.
    #[must_use]
    pub fn column(&self, column: &str) -> Expr {
        qualified(&self.alias, column)
    }

    /// ANDs `condition` onto the statement's existing filter.
    pub fn and_where(&mut self, condition: Condition) -> &mut Self {
        self.statement.cond_where(condition);
        self
    }

    #[must_use]
    pub fn statement(&self) -> &SelectStatement {
        &self.statement
    }

    /// Mutable access for the surrounding pipeline (joins, ordering, paging).
    pub fn statement_mut(&mut self) -> &mut SelectStatement {
        &mut self.statement
    }

    /// Renders the statement with inlined values.
    #[must_use]
    pub fn to_sql<B: QueryBuilder>(&self, builder: B) -> String {
        self.statement.to_string(builder)
    }
}

impl fmt::Debug for FieldQuery<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldQuery")
            .field("alias", &self.alias)
            .field("parent", &self.parent.map(FieldQuery::table_alias))
            .finish_non_exhaustive()
    }
}

/// Alias-qualified column expression.
pub(crate) fn qualified(alias: &str, column: &str) -> Expr {
    Expr::col((Alias::new(alias), Alias::new(column)))
}
