//! SET clause entries for UPDATE and upserts.

use super::column::Column;
use super::expr::{Expr, IntoExpr};

/// `column = expression`.
#[derive(Clone, Debug)]
pub struct Assignment {
    pub(crate) column: String,
    pub(crate) value: Expr,
}

/// Assign an expression (or a plain value) to a field.
pub fn assign(column: impl Into<String>, value: impl IntoExpr) -> Assignment {
    Assignment {
        column: column.into(),
        value: value.into_expr(),
    }
}

/// One entry of a SET list.
///
/// A bare [`Column`] takes its value from context: the target entity in an
/// UPDATE, the proposed row in an upsert.
#[derive(Clone, Debug)]
pub enum Assignable {
    Column(Column),
    Assignment(Assignment),
}

impl From<Column> for Assignable {
    fn from(c: Column) -> Self {
        Assignable::Column(c)
    }
}

impl From<Assignment> for Assignable {
    fn from(a: Assignment) -> Self {
        Assignable::Assignment(a)
    }
}
