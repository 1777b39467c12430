//! Column references and aggregates.

use super::expr::{BinaryExpr, Expr, IntoExpr, MathExpr, Op, Predicate, RawExpr, raw};
use super::subquery::Subquery;
use super::table::TableRef;
use crate::value::Value;

/// Reference to a mapped field, by logical name.
///
/// `table` is `None` for the statement's own model.
#[derive(Clone, Debug)]
pub struct Column {
    pub(crate) table: Option<TableRef>,
    pub(crate) name: String,
    pub(crate) alias: Option<String>,
}

/// Column of the statement's own model.
pub fn col(name: impl Into<String>) -> Column {
    Column {
        table: None,
        name: name.into(),
        alias: None,
    }
}

impl Column {
    pub(crate) fn of(table: TableRef, name: impl Into<String>) -> Self {
        Self {
            table: Some(table),
            name: name.into(),
            alias: None,
        }
    }

    /// Logical field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Project the column under `alias`.
    pub fn as_(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    fn compare(self, op: Op, rhs: Expr) -> Predicate {
        Predicate::compare(Expr::Column(self), op, rhs)
    }

    pub fn eq(self, rhs: impl IntoExpr) -> Predicate {
        self.compare(Op::Eq, rhs.into_expr())
    }

    pub fn ne(self, rhs: impl IntoExpr) -> Predicate {
        self.compare(Op::Ne, rhs.into_expr())
    }

    pub fn lt(self, rhs: impl IntoExpr) -> Predicate {
        self.compare(Op::Lt, rhs.into_expr())
    }

    pub fn le(self, rhs: impl IntoExpr) -> Predicate {
        self.compare(Op::Le, rhs.into_expr())
    }

    pub fn gt(self, rhs: impl IntoExpr) -> Predicate {
        self.compare(Op::Gt, rhs.into_expr())
    }

    pub fn ge(self, rhs: impl IntoExpr) -> Predicate {
        self.compare(Op::Ge, rhs.into_expr())
    }

    pub fn like(self, pattern: impl IntoExpr) -> Predicate {
        self.compare(Op::Like, pattern.into_expr())
    }

    pub fn not_like(self, pattern: impl IntoExpr) -> Predicate {
        self.compare(Op::NotLike, pattern.into_expr())
    }

    /// `col IN (?,?,...)`. An empty list renders `IN (NULL)`, which matches
    /// nothing.
    pub fn in_values<V: Into<Value>>(self, values: impl IntoIterator<Item = V>) -> Predicate {
        self.compare(Op::In, Expr::Raw(value_list(values)))
    }

    pub fn not_in_values<V: Into<Value>>(self, values: impl IntoIterator<Item = V>) -> Predicate {
        self.compare(Op::NotIn, Expr::Raw(value_list(values)))
    }

    /// `col IN (SELECT ...)`.
    pub fn in_query(self, sub: Subquery) -> Predicate {
        self.compare(Op::In, Expr::Subquery(sub))
    }

    pub fn is_null(self) -> Predicate {
        Predicate(BinaryExpr::new(
            Some(Expr::Column(self)),
            Some(Op::IsNull),
            None,
        ))
    }

    pub fn is_not_null(self) -> Predicate {
        Predicate(BinaryExpr::new(
            Some(Expr::Column(self)),
            Some(Op::IsNotNull),
            None,
        ))
    }

    pub fn add(self, rhs: impl IntoExpr) -> MathExpr {
        MathExpr::new(Expr::Column(self), Op::Add, rhs.into_expr())
    }

    pub fn sub(self, rhs: impl IntoExpr) -> MathExpr {
        MathExpr::new(Expr::Column(self), Op::Sub, rhs.into_expr())
    }

    pub fn mul(self, rhs: impl IntoExpr) -> MathExpr {
        MathExpr::new(Expr::Column(self), Op::Mul, rhs.into_expr())
    }

    pub fn div(self, rhs: impl IntoExpr) -> MathExpr {
        MathExpr::new(Expr::Column(self), Op::Div, rhs.into_expr())
    }

    pub fn asc(self) -> OrderBy {
        OrderBy {
            column: self,
            desc: false,
        }
    }

    pub fn desc(self) -> OrderBy {
        OrderBy {
            column: self,
            desc: true,
        }
    }
}

fn value_list<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> RawExpr {
    let args: Vec<Value> = values.into_iter().map(Into::into).collect();
    if args.is_empty() {
        return raw("(NULL)", args);
    }
    let mut sql = String::with_capacity(args.len() * 2 + 1);
    sql.push('(');
    for i in 0..args.len() {
        if i > 0 {
            sql.push(',');
        }
        sql.push('?');
    }
    sql.push(')');
    raw(sql, args)
}

/// ORDER BY entry.
#[derive(Clone, Debug)]
pub struct OrderBy {
    pub(crate) column: Column,
    pub(crate) desc: bool,
}

/// `FN(column)` aggregate.
#[derive(Clone, Debug)]
pub struct Aggregate {
    pub(crate) func: &'static str,
    pub(crate) arg: String,
    pub(crate) table: Option<TableRef>,
    pub(crate) alias: Option<String>,
}

macro_rules! aggregate_fns {
    ($($name:ident => $func:literal),* $(,)?) => {
        $(
            #[doc = concat!("`", $func, "(column)`.")]
            pub fn $name(column: impl Into<String>) -> Aggregate {
                Aggregate {
                    func: $func,
                    arg: column.into(),
                    table: None,
                    alias: None,
                }
            }
        )*
    };
}

aggregate_fns!(
    avg => "AVG",
    sum => "SUM",
    count => "COUNT",
    max => "MAX",
    min => "MIN",
);

impl Aggregate {
    /// Resolve the argument column against `table` instead of the
    /// statement's model.
    pub fn on(mut self, table: impl Into<TableRef>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Project the aggregate under `alias`.
    pub fn as_(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    fn compare(self, op: Op, rhs: Expr) -> Predicate {
        Predicate::compare(Expr::Aggregate(self), op, rhs)
    }

    pub fn eq(self, rhs: impl IntoExpr) -> Predicate {
        self.compare(Op::Eq, rhs.into_expr())
    }

    pub fn ne(self, rhs: impl IntoExpr) -> Predicate {
        self.compare(Op::Ne, rhs.into_expr())
    }

    pub fn lt(self, rhs: impl IntoExpr) -> Predicate {
        self.compare(Op::Lt, rhs.into_expr())
    }

    pub fn le(self, rhs: impl IntoExpr) -> Predicate {
        self.compare(Op::Le, rhs.into_expr())
    }

    pub fn gt(self, rhs: impl IntoExpr) -> Predicate {
        self.compare(Op::Gt, rhs.into_expr())
    }

    pub fn ge(self, rhs: impl IntoExpr) -> Predicate {
        self.compare(Op::Ge, rhs.into_expr())
    }
}
