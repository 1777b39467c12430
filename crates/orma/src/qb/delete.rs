//! DELETE statements.

use super::builder::SqlBuilder;
use super::expr::Predicate;
use super::traits::{Query, QueryBuilder};
use crate::client::ExecResult;
use crate::db::Db;
use crate::error::OrmResult;
use crate::middleware::QueryType;
use crate::model::Entity;
use std::marker::PhantomData;
use std::sync::Arc;

/// DELETE builder for entity `T`.
pub struct Deleter<T: Entity> {
    db: Db,
    table: Option<String>,
    predicates: Vec<Predicate>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Entity> Deleter<T> {
    pub fn new(db: &Db) -> Self {
        Self {
            db: db.clone(),
            table: None,
            predicates: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Delete from `table` instead of the model's table. Written verbatim.
    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Add a WHERE condition; conditions are combined with AND.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn filters(mut self, predicates: impl IntoIterator<Item = Predicate>) -> Self {
        self.predicates.extend(predicates);
        self
    }

    pub async fn exec(self) -> OrmResult<ExecResult> {
        let db = self.db.clone();
        let model = db.registry().get::<T>()?;
        db.exec_statement(Arc::new(self), QueryType::Delete, model)
            .await
    }
}

impl<T: Entity> QueryBuilder for Deleter<T> {
    fn build(&self) -> OrmResult<Query> {
        let model = self.db.registry().get::<T>()?;
        let mut b = SqlBuilder::new(self.db.dialect(), self.db.registry(), model);
        b.push_str("DELETE FROM ");
        match &self.table {
            Some(table) => b.push_str(table),
            None => b.quote_table(),
        }
        if !self.predicates.is_empty() {
            b.push_str(" WHERE ");
            b.build_predicates(&self.predicates)?;
        }
        Ok(b.finish())
    }
}
