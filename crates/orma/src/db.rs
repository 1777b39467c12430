//! The database handle: driver, dialect, registry and middlewares.

use crate::client::{Driver, ExecResult};
use crate::dialect::{Dialect, DialectKind};
use crate::error::{OrmError, OrmResult};
use crate::middleware::{self, Handler, Middleware, QueryContext, QueryOutput, QueryType, handler};
use crate::model::{Entity, Model, Registry};
use crate::qb::{Deleter, Inserter, QueryBuilder, RawQuerier, Selector, Updater};
use crate::row::Row;
use crate::value::Value;
use serde::Deserialize;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Settings for a [`Db`].
///
/// Deserializes from any serde format:
///
/// ```
/// let config: orma::DbConfig =
///     serde_json::from_str(r#"{"dialect": "sqlite", "query_timeout_ms": 500}"#).unwrap();
/// assert_eq!(config.dialect, orma::DialectKind::Sqlite);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    pub dialect: DialectKind,
    /// Per-statement timeout in milliseconds. `None` means no timeout.
    pub query_timeout_ms: Option<u64>,
}

impl DbConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dialect(mut self, kind: DialectKind) -> Self {
        self.dialect = kind;
        self
    }

    /// Cancel statements that run longer than `timeout`.
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn query_timeout(&self) -> Option<Duration> {
        self.query_timeout_ms.map(Duration::from_millis)
    }
}

struct DbInner {
    driver: Arc<dyn Driver>,
    dialect: Arc<dyn Dialect>,
    registry: Arc<Registry>,
    middlewares: Vec<Middleware>,
    config: DbConfig,
}

/// Entry point for building and running statements. Cheap to clone.
#[derive(Clone)]
pub struct Db {
    inner: Arc<DbInner>,
}

impl fmt::Debug for Db {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Db")
            .field("dialect", &self.inner.dialect.name())
            .field("middlewares", &self.inner.middlewares.len())
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl Db {
    /// A MySQL-dialect handle with a fresh registry and no middlewares.
    pub fn new(driver: impl Driver + 'static) -> Self {
        Self::builder(driver).build()
    }

    pub fn builder(driver: impl Driver + 'static) -> DbBuilder {
        DbBuilder {
            driver: Arc::new(driver),
            dialect: None,
            registry: None,
            middlewares: Vec::new(),
            config: DbConfig::default(),
        }
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.inner.dialect.as_ref()
    }

    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    pub fn config(&self) -> &DbConfig {
        &self.inner.config
    }

    pub fn select<T: Entity>(&self) -> Selector<T> {
        Selector::new(self)
    }

    pub fn insert<T: Entity>(&self) -> Inserter<T> {
        Inserter::new(self)
    }

    pub fn update<T: Entity>(&self) -> Updater<T> {
        Updater::new(self)
    }

    pub fn delete<T: Entity>(&self) -> Deleter<T> {
        Deleter::new(self)
    }

    /// Caller-written SQL whose rows map onto `T`.
    pub fn raw<T: Entity>(&self, sql: impl Into<String>, args: Vec<Value>) -> RawQuerier<T> {
        RawQuerier::new(self, sql, args)
    }

    /// Run a statement that returns no rows through the middleware chain.
    pub(crate) async fn exec_statement(
        &self,
        builder: Arc<dyn QueryBuilder>,
        query_type: QueryType,
        model: Arc<Model>,
    ) -> OrmResult<ExecResult> {
        let db = self.clone();
        let terminal = handler(move |ctx: QueryContext| {
            let db = db.clone();
            async move {
                let query = ctx.builder.build()?;
                let res = db
                    .with_timeout(db.inner.driver.exec(&query.sql, &query.args))
                    .await?;
                Ok(QueryOutput::Exec(res))
            }
        });
        self.run(builder, query_type, model, terminal)
            .await?
            .into_exec()
    }

    /// Run a statement that returns rows through the middleware chain.
    pub(crate) async fn query_statement(
        &self,
        builder: Arc<dyn QueryBuilder>,
        query_type: QueryType,
        model: Arc<Model>,
    ) -> OrmResult<Vec<Row>> {
        let db = self.clone();
        let terminal = handler(move |ctx: QueryContext| {
            let db = db.clone();
            async move {
                let query = ctx.builder.build()?;
                let rows = db
                    .with_timeout(db.inner.driver.query(&query.sql, &query.args))
                    .await?;
                Ok(QueryOutput::Rows(rows))
            }
        });
        self.run(builder, query_type, model, terminal)
            .await?
            .into_rows()
    }

    async fn run(
        &self,
        builder: Arc<dyn QueryBuilder>,
        query_type: QueryType,
        model: Arc<Model>,
        terminal: Handler,
    ) -> OrmResult<QueryOutput> {
        let ctx = QueryContext {
            builder,
            query_type,
            model,
        };
        let root = middleware::chain(&self.inner.middlewares, terminal);
        root(ctx).await
    }

    async fn with_timeout<T, F>(&self, future: F) -> OrmResult<T>
    where
        F: Future<Output = OrmResult<T>> + Send,
    {
        match self.inner.config.query_timeout() {
            Some(timeout) => {
                tokio::pin!(future);
                tokio::select! {
                    result = &mut future => result,
                    _ = tokio::time::sleep(timeout) => Err(OrmError::Timeout(timeout)),
                }
            }
            None => future.await,
        }
    }
}

/// Builder for [`Db`].
pub struct DbBuilder {
    driver: Arc<dyn Driver>,
    dialect: Option<Arc<dyn Dialect>>,
    registry: Option<Arc<Registry>>,
    middlewares: Vec<Middleware>,
    config: DbConfig,
}

impl DbBuilder {
    /// Use `config`; its dialect applies unless [`dialect`](Self::dialect)
    /// is also set.
    pub fn config(mut self, config: DbConfig) -> Self {
        self.config = config;
        self
    }

    pub fn dialect(mut self, dialect: impl Dialect + 'static) -> Self {
        self.dialect = Some(Arc::new(dialect));
        self
    }

    /// Share a registry between several handles.
    pub fn registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Append a middleware. The first one added runs outermost.
    pub fn middleware(mut self, m: impl Into<Middleware>) -> Self {
        self.middlewares.push(m.into());
        self
    }

    pub fn build(self) -> Db {
        let dialect = self
            .dialect
            .unwrap_or_else(|| self.config.dialect.dialect());
        Db {
            inner: Arc::new(DbInner {
                driver: self.driver,
                dialect,
                registry: self.registry.unwrap_or_default(),
                middlewares: self.middlewares,
                config: self.config,
            }),
        }
    }
}
