use super::{Handler, Middleware, QueryContext, handler};
use crate::value::Value;
use std::sync::Arc;
use tracing::Instrument;

/// Receives the SQL and arguments of every statement before it runs.
pub type LogFn = Arc<dyn Fn(&str, &[Value]) + Send + Sync>;

/// Logs each statement before delegating to the next handler.
///
/// The statement is built once for logging; a build error is returned without
/// calling the rest of the chain. By default SQL is emitted as a `tracing`
/// debug event on target `orma.sql`.
#[derive(Clone)]
pub struct SqlLogMiddleware {
    log_fn: LogFn,
    max_sql_length: Option<usize>,
}

impl Default for SqlLogMiddleware {
    fn default() -> Self {
        Self {
            log_fn: Arc::new(|sql: &str, args: &[Value]| {
                let args = serde_json::to_string(args).unwrap_or_default();
                tracing::debug!(target: "orma.sql", sql = %sql, args = %args, "executing");
            }),
            max_sql_length: Some(200),
        }
    }
}

impl SqlLogMiddleware {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the log function.
    pub fn log_fn(mut self, f: impl Fn(&str, &[Value]) + Send + Sync + 'static) -> Self {
        self.log_fn = Arc::new(f);
        self
    }

    /// Set maximum SQL length (in bytes) passed to the log function.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    fn truncate<'s>(&self, sql: &'s str) -> std::borrow::Cow<'s, str> {
        match self.max_sql_length {
            Some(max) if sql.len() > max => {
                let mut end = max;
                while end > 0 && !sql.is_char_boundary(end) {
                    end -= 1;
                }
                format!("{}...", &sql[..end]).into()
            }
            _ => sql.into(),
        }
    }

    pub fn build(self) -> Middleware {
        let this = Arc::new(self);
        Arc::new(move |next: Handler| -> Handler {
            let this = Arc::clone(&this);
            handler(move |ctx: QueryContext| {
                let this = Arc::clone(&this);
                let next = Arc::clone(&next);
                let span = tracing::debug_span!(
                    target: "orma.sql",
                    "query",
                    query_type = %ctx.query_type,
                    table = %ctx.model.table_name,
                );
                async move {
                    let query = ctx.builder.build()?;
                    let sql = this.truncate(&query.sql);
                    (this.log_fn)(sql.as_ref(), query.args.as_slice());
                    next(ctx).await
                }
                .instrument(span)
            })
        })
    }
}

impl From<SqlLogMiddleware> for Middleware {
    fn from(m: SqlLogMiddleware) -> Self {
        m.build()
    }
}
