//! Caller-written statements.

use super::traits::{Query, QueryBuilder};
use crate::client::ExecResult;
use crate::db::Db;
use crate::error::{OrmError, OrmResult};
use crate::middleware::QueryType;
use crate::model::Entity;
use crate::row::scan;
use crate::value::Value;
use std::marker::PhantomData;
use std::sync::Arc;

/// Raw SQL whose result rows map onto `T`.
///
/// The SQL is passed to the driver as written, with `?` placeholders.
pub struct RawQuerier<T: Entity> {
    db: Db,
    sql: String,
    args: Vec<Value>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Entity> RawQuerier<T> {
    pub fn new(db: &Db, sql: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            db: db.clone(),
            sql: sql.into(),
            args,
            _marker: PhantomData,
        }
    }

    pub async fn exec(self) -> OrmResult<ExecResult> {
        let db = self.db.clone();
        let model = db.registry().get::<T>()?;
        db.exec_statement(Arc::new(self), QueryType::Raw, model)
            .await
    }
}

impl<T: Entity + Default> RawQuerier<T> {
    /// First row, or [`OrmError::NoRows`].
    pub async fn get(self) -> OrmResult<T> {
        let db = self.db.clone();
        let model = db.registry().get::<T>()?;
        let rows = db
            .query_statement(Arc::new(self), QueryType::Raw, Arc::clone(&model))
            .await?;
        let row = rows.into_iter().next().ok_or(OrmError::NoRows)?;
        scan(&model, row)
    }

    pub async fn get_multi(self) -> OrmResult<Vec<T>> {
        let db = self.db.clone();
        let model = db.registry().get::<T>()?;
        let rows = db
            .query_statement(Arc::new(self), QueryType::Raw, Arc::clone(&model))
            .await?;
        rows.into_iter().map(|row| scan(&model, row)).collect()
    }
}

impl<T: Entity> QueryBuilder for RawQuerier<T> {
    fn build(&self) -> OrmResult<Query> {
        Ok(Query {
            sql: self.sql.clone(),
            args: self.args.clone(),
        })
    }
}
