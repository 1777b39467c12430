//! Trait definitions for statement builders.

use crate::error::OrmResult;
use crate::value::Value;

/// A finished statement: SQL terminated by `;` and one argument per `?`.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub sql: String,
    pub args: Vec<Value>,
}

/// Base trait for all statement builders.
///
/// Building is synchronous and side-effect free; it can be called any number
/// of times, and middlewares call it to inspect the statement.
pub trait QueryBuilder: Send + Sync {
    fn build(&self) -> OrmResult<Query>;
}
