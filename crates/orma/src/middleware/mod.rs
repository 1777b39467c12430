//! Middleware chain wrapped around statement execution.
//!
//! A [`Handler`] runs one statement; a [`Middleware`] takes the next handler
//! and returns a new one that wraps it. `Db` folds its middlewares over the
//! terminal handler (the one that calls the driver) from last to first, so
//! the first registered middleware is the outermost:
//!
//! ```text
//! m1 -> m2 -> ... -> driver -> ... -> m2 -> m1
//! ```
//!
//! Middlewares see the statement builder, not finished SQL; call
//! `ctx.builder.build()` to inspect the query.

mod sqllog;


pub use sqllog::{LogFn, SqlLogMiddleware};

use crate::client::ExecResult;
use crate::error::{OrmError, OrmResult};
use crate::model::Model;
use crate::qb::QueryBuilder;
use crate::row::Row;
use futures_util::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// The kind of statement being executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    Select,
    Insert,
    Update,
    Delete,
    /// Caller-written SQL.
    Raw,
}

impl QueryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::Select => "SELECT",
            QueryType::Insert => "INSERT",
            QueryType::Update => "UPDATE",
            QueryType::Delete => "DELETE",
            QueryType::Raw => "RAW",
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a handler is asked to run.
#[derive(Clone)]
pub struct QueryContext {
    pub builder: Arc<dyn QueryBuilder>,
    pub query_type: QueryType,
    /// Model of the statement's entity.
    pub model: Arc<Model>,
}

impl fmt::Debug for QueryContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryContext")
            .field("query_type", &self.query_type)
            .field("table", &self.model.table_name)
            .finish_non_exhaustive()
    }
}

/// What a handler produced.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutput {
    Exec(ExecResult),
    Rows(Vec<Row>),
}

impl QueryOutput {
    pub fn into_exec(self) -> OrmResult<ExecResult> {
        match self {
            QueryOutput::Exec(res) => Ok(res),
            QueryOutput::Rows(_) => Err(OrmError::Other(
                "handler returned rows for a statement without a result set".into(),
            )),
        }
    }

    pub fn into_rows(self) -> OrmResult<Vec<Row>> {
        match self {
            QueryOutput::Rows(rows) => Ok(rows),
            QueryOutput::Exec(_) => Err(OrmError::Other(
                "handler returned an exec result for a query".into(),
            )),
        }
    }
}

pub type QueryResult = OrmResult<QueryOutput>;

pub type Handler = Arc<dyn Fn(QueryContext) -> BoxFuture<'static, QueryResult> + Send + Sync>;

pub type Middleware = Arc<dyn Fn(Handler) -> Handler + Send + Sync>;

/// Wrap an async closure as a [`Handler`].
pub fn handler<F, Fut>(f: F) -> Handler
where
    F: Fn(QueryContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = QueryResult> + Send + 'static,
{
    Arc::new(move |ctx: QueryContext| -> BoxFuture<'static, QueryResult> { Box::pin(f(ctx)) })
}

/// Wrap a closure as a [`Middleware`].
pub fn middleware<F>(f: F) -> Middleware
where
    F: Fn(Handler) -> Handler + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Fold `middlewares` around `terminal`, last to first.
pub(crate) fn chain(middlewares: &[Middleware], terminal: Handler) -> Handler {
    middlewares
        .iter()
        .rev()
        .fold(terminal, |next, m| m(next))
}
