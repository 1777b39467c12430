//! Driver trait: the seam between statement execution and a database.

use crate::error::OrmResult;
use crate::row::Row;
use crate::value::Value;
use async_trait::async_trait;
use std::sync::Arc;

/// Outcome of a statement that returns no rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecResult {
    pub rows_affected: u64,
    /// Generated key of the last inserted row, when the database reports one.
    pub last_insert_id: Option<i64>,
}

/// A database connection (or pool) that runs finished statements.
///
/// SQL arrives with `?` placeholders in argument order; drivers for databases
/// with other placeholder syntaxes rewrite them.
#[async_trait]
pub trait Driver: Send + Sync {
    async fn exec(&self, sql: &str, args: &[Value]) -> OrmResult<ExecResult>;

    async fn query(&self, sql: &str, args: &[Value]) -> OrmResult<Vec<Row>>;
}

#[async_trait]
impl<D: Driver + ?Sized> Driver for Arc<D> {
    async fn exec(&self, sql: &str, args: &[Value]) -> OrmResult<ExecResult> {
        (**self).exec(sql, args).await
    }

    async fn query(&self, sql: &str, args: &[Value]) -> OrmResult<Vec<Row>> {
        (**self).query(sql, args).await
    }
}
