//! Expression tree for projections, conditions and assignments.
//!
//! Every node the builder can render is one variant of [`Expr`]. Conditions
//! are [`Predicate`]s and arithmetic is [`MathExpr`]; both are thin wrappers
//! over [`BinaryExpr`] so they stay distinct types in the fluent API while
//! sharing one rendering rule:
//!
//! ```text
//! left [" " OP] [" " right]
//! ```
//!
//! Operands that are themselves binary nodes are parenthesized. A missing
//! left operand (as in `NOT` and `EXISTS`) starts the fragment at the
//! operator.

use super::column::{Aggregate, Column};
use super::subquery::{Subquery, SubqueryExpr};
use crate::value::Value;
use chrono::NaiveDateTime;
use std::fmt;
use uuid::Uuid;

/// Expression node.
#[derive(Clone, Debug)]
pub enum Expr {
    /// Column reference, resolved against a model at build time.
    Column(Column),
    /// Literal bound as a `?` argument.
    Value(Value),
    /// `FN(column)`.
    Aggregate(Aggregate),
    /// Caller-supplied SQL fragment.
    Raw(RawExpr),
    /// Arithmetic.
    Math(MathExpr),
    /// Boolean condition.
    Predicate(Predicate),
    /// Untyped binary node built with [`binary`].
    Binary(BinaryExpr),
    /// `ANY (...)`, `ALL (...)`, `SOME (...)`.
    SubqueryPredicate(SubqueryExpr),
    /// Nested SELECT.
    Subquery(Subquery),
}

impl Expr {
    /// Alias under which the expression is projected, if any.
    pub(crate) fn selected_alias(&self) -> Option<&str> {
        match self {
            Expr::Column(c) => c.alias.as_deref(),
            Expr::Aggregate(a) => a.alias.as_deref(),
            Expr::Subquery(s) => s.alias.as_deref(),
            _ => None,
        }
    }

    pub(crate) fn is_binary(&self) -> bool {
        matches!(self, Expr::Math(_) | Expr::Predicate(_) | Expr::Binary(_))
    }
}

/// SQL operator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
    NotLike,
    In,
    NotIn,
    Exists,
    Not,
    And,
    Or,
    Add,
    Sub,
    Mul,
    Div,
    IsNull,
    IsNotNull,
    /// Any other operator, rendered verbatim.
    Other(String),
}

impl Op {
    pub fn as_str(&self) -> &str {
        match self {
            Op::Eq => "=",
            Op::Ne => "!=",
            Op::Lt => "<",
            Op::Le => "<=",
            Op::Gt => ">",
            Op::Ge => ">=",
            Op::Like => "LIKE",
            Op::NotLike => "NOT LIKE",
            Op::In => "IN",
            Op::NotIn => "NOT IN",
            Op::Exists => "EXISTS",
            Op::Not => "NOT",
            Op::And => "AND",
            Op::Or => "OR",
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
            Op::IsNull => "IS NULL",
            Op::IsNotNull => "IS NOT NULL",
            Op::Other(op) => op,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `left OP right` with every part optional.
#[derive(Clone, Debug, Default)]
pub struct BinaryExpr {
    pub(crate) left: Option<Box<Expr>>,
    pub(crate) op: Option<Op>,
    pub(crate) right: Option<Box<Expr>>,
}

impl BinaryExpr {
    pub(crate) fn new(left: Option<Expr>, op: Option<Op>, right: Option<Expr>) -> Self {
        Self {
            left: left.map(Box::new),
            op,
            right: right.map(Box::new),
        }
    }
}

/// Build an arbitrary binary node, e.g. for dialect-specific operators.
pub fn binary(left: impl IntoExpr, op: Op, right: impl IntoExpr) -> BinaryExpr {
    BinaryExpr::new(Some(left.into_expr()), Some(op), Some(right.into_expr()))
}

/// Arithmetic expression: `` `age` + ? ``.
#[derive(Clone, Debug)]
pub struct MathExpr(pub(crate) BinaryExpr);

impl MathExpr {
    pub(crate) fn new(left: Expr, op: Op, right: Expr) -> Self {
        Self(BinaryExpr::new(Some(left), Some(op), Some(right)))
    }

    pub fn add(self, rhs: impl IntoExpr) -> MathExpr {
        MathExpr::new(Expr::Math(self), Op::Add, rhs.into_expr())
    }

    pub fn sub(self, rhs: impl IntoExpr) -> MathExpr {
        MathExpr::new(Expr::Math(self), Op::Sub, rhs.into_expr())
    }

    pub fn mul(self, rhs: impl IntoExpr) -> MathExpr {
        MathExpr::new(Expr::Math(self), Op::Mul, rhs.into_expr())
    }

    pub fn div(self, rhs: impl IntoExpr) -> MathExpr {
        MathExpr::new(Expr::Math(self), Op::Div, rhs.into_expr())
    }

    pub fn eq(self, rhs: impl IntoExpr) -> Predicate {
        Predicate::compare(Expr::Math(self), Op::Eq, rhs.into_expr())
    }

    pub fn gt(self, rhs: impl IntoExpr) -> Predicate {
        Predicate::compare(Expr::Math(self), Op::Gt, rhs.into_expr())
    }

    pub fn lt(self, rhs: impl IntoExpr) -> Predicate {
        Predicate::compare(Expr::Math(self), Op::Lt, rhs.into_expr())
    }
}

/// Boolean condition used in WHERE, HAVING and JOIN ... ON.
#[derive(Clone, Debug)]
pub struct Predicate(pub(crate) BinaryExpr);

impl Predicate {
    pub(crate) fn compare(left: Expr, op: Op, right: Expr) -> Self {
        Self(BinaryExpr::new(Some(left), Some(op), Some(right)))
    }

    /// `(self) AND (rhs)`.
    pub fn and(self, rhs: Predicate) -> Predicate {
        Predicate::compare(Expr::Predicate(self), Op::And, Expr::Predicate(rhs))
    }

    /// `(self) OR (rhs)`.
    pub fn or(self, rhs: Predicate) -> Predicate {
        Predicate::compare(Expr::Predicate(self), Op::Or, Expr::Predicate(rhs))
    }
}

impl From<BinaryExpr> for Predicate {
    fn from(e: BinaryExpr) -> Self {
        Predicate(e)
    }
}

/// `NOT (p)`.
pub fn not(p: Predicate) -> Predicate {
    Predicate(BinaryExpr::new(None, Some(Op::Not), Some(Expr::Predicate(p))))
}

/// `EXISTS (subquery)`.
pub fn exists(sub: Subquery) -> Predicate {
    Predicate(BinaryExpr::new(
        None,
        Some(Op::Exists),
        Some(Expr::Subquery(sub)),
    ))
}

/// Raw SQL fragment with its own arguments.
///
/// The fragment is copied into the statement as written; its `?` markers must
/// line up with `args`.
#[derive(Clone, Debug, PartialEq)]
pub struct RawExpr {
    pub(crate) sql: String,
    pub(crate) args: Vec<Value>,
}

impl RawExpr {
    /// Use the fragment as a whole condition.
    pub fn as_predicate(self) -> Predicate {
        Predicate(BinaryExpr::new(Some(Expr::Raw(self)), None, None))
    }
}

/// Build a raw fragment: `raw("age < ?", args![18])`.
pub fn raw(sql: impl Into<String>, args: Vec<Value>) -> RawExpr {
    RawExpr {
        sql: sql.into(),
        args,
    }
}

/// Conversion into an expression operand.
///
/// Implemented for every node type and for all types that convert into a
/// [`Value`]; plain values become `?` arguments.
pub trait IntoExpr {
    fn into_expr(self) -> Expr;
}

impl IntoExpr for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}

macro_rules! impl_node {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl IntoExpr for $t {
                fn into_expr(self) -> Expr {
                    Expr::$variant(self)
                }
            }

            impl From<$t> for Expr {
                fn from(v: $t) -> Self {
                    Expr::$variant(v)
                }
            }
        )*
    };
}

impl_node!(
    Column => Column,
    Aggregate => Aggregate,
    RawExpr => Raw,
    MathExpr => Math,
    Predicate => Predicate,
    BinaryExpr => Binary,
    SubqueryExpr => SubqueryPredicate,
    Subquery => Subquery,
    Value => Value,
);

macro_rules! impl_value_operand {
    ($($t:ty),* $(,)?) => {
        $(
            impl IntoExpr for $t {
                fn into_expr(self) -> Expr {
                    Expr::Value(Value::from(self))
                }
            }
        )*
    };
}

impl_value_operand!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    f32,
    f64,
    String,
    &str,
    Vec<u8>,
    NaiveDateTime,
    Uuid,
    serde_json::Value,
);

impl<T: Into<Value>> IntoExpr for Option<T> {
    fn into_expr(self) -> Expr {
        Expr::Value(Value::from(self))
    }
}

/// Build a `Vec<Value>` argument list from mixed literals.
///
/// ```
/// use orma::{args, Value};
/// assert_eq!(args![1, "a"], vec![Value::Int(1), Value::Text("a".into())]);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($v:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::from($v)),+]
    };
}
