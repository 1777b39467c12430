//! Nested SELECT statements.

use super::column::Column;
use super::expr::Expr;
use super::table::{JoinBuilder, JoinKind, TableRef};
use super::traits::QueryBuilder;
use std::fmt;
use std::sync::Arc;

/// A SELECT used as an expression or as a derived table.
///
/// `table` and `columns` are copies of the inner statement's FROM target and
/// projection; columns referenced through the subquery resolve against them.
#[derive(Clone)]
pub struct Subquery {
    pub(crate) statement: Arc<dyn QueryBuilder>,
    pub(crate) alias: Option<String>,
    pub(crate) table: Box<TableRef>,
    pub(crate) columns: Vec<Expr>,
}

impl Subquery {
    pub(crate) fn new(
        statement: Arc<dyn QueryBuilder>,
        alias: Option<String>,
        table: TableRef,
        columns: Vec<Expr>,
    ) -> Self {
        Self {
            statement,
            alias,
            table: Box::new(table),
            columns,
        }
    }

    /// Column of the derived table, qualified by its alias.
    pub fn col(&self, name: impl Into<String>) -> Column {
        Column::of(TableRef::Subquery(self.clone()), name)
    }

    pub fn join(self, right: impl Into<TableRef>) -> JoinBuilder {
        JoinBuilder::new(self.into(), right.into(), JoinKind::Inner)
    }

    pub fn left_join(self, right: impl Into<TableRef>) -> JoinBuilder {
        JoinBuilder::new(self.into(), right.into(), JoinKind::Left)
    }

    pub fn right_join(self, right: impl Into<TableRef>) -> JoinBuilder {
        JoinBuilder::new(self.into(), right.into(), JoinKind::Right)
    }
}

impl fmt::Debug for Subquery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subquery")
            .field("alias", &self.alias)
            .field("table", &self.table)
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}

/// `ANY (...)`, `ALL (...)` or `SOME (...)`.
#[derive(Clone, Debug)]
pub struct SubqueryExpr {
    pub(crate) keyword: &'static str,
    pub(crate) subquery: Subquery,
}

pub fn any(sub: Subquery) -> SubqueryExpr {
    SubqueryExpr {
        keyword: "ANY",
        subquery: sub,
    }
}

pub fn all(sub: Subquery) -> SubqueryExpr {
    SubqueryExpr {
        keyword: "ALL",
        subquery: sub,
    }
}

pub fn some(sub: Subquery) -> SubqueryExpr {
    SubqueryExpr {
        keyword: "SOME",
        subquery: sub,
    }
}
