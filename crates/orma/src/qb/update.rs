//! UPDATE statements.

use super::assign::Assignable;
use super::builder::SqlBuilder;
use super::expr::Predicate;
use super::traits::{Query, QueryBuilder};
use crate::client::ExecResult;
use crate::db::Db;
use crate::error::{OrmError, OrmResult};
use crate::middleware::QueryType;
use crate::model::Entity;
use std::sync::Arc;

/// UPDATE builder for entity `T`.
///
/// Bare columns in the SET list take their values from the entity passed to
/// [`update`](Self::update).
pub struct Updater<T: Entity> {
    db: Db,
    target: Option<T>,
    assigns: Vec<Assignable>,
    predicates: Vec<Predicate>,
}

impl<T: Entity> Updater<T> {
    pub fn new(db: &Db) -> Self {
        Self {
            db: db.clone(),
            target: None,
            assigns: Vec::new(),
            predicates: Vec::new(),
        }
    }

    /// Entity supplying values for bare-column assignments.
    pub fn update(mut self, entity: T) -> Self {
        self.target = Some(entity);
        self
    }

    /// Append one SET entry.
    pub fn set(mut self, assign: impl Into<Assignable>) -> Self {
        self.assigns.push(assign.into());
        self
    }

    /// Append several SET entries.
    pub fn set_all(mut self, assigns: impl IntoIterator<Item = Assignable>) -> Self {
        self.assigns.extend(assigns);
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
        db.exec_statement(Arc::new(self), QueryType::Update, model)
            .await
    }
}

impl<T: Entity> QueryBuilder for Updater<T> {
    fn build(&self) -> OrmResult<Query> {
        if self.assigns.is_empty() {
            return Err(OrmError::NoUpdatedColumns);
        }
        let model = self.db.registry().get::<T>()?;
        let mut b = SqlBuilder::new(self.db.dialect(), self.db.registry(), model);
        b.push_str("UPDATE ");
        b.quote_table();
        b.push_str(" SET ");
        for (i, a) in self.assigns.iter().enumerate() {
            if i > 0 {
                b.push(',');
            }
            match a {
                Assignable::Column(c) => {
                    b.build_column(c.table.as_ref(), c.name())?;
                    b.push('=');
                    let value = self
                        .target
                        .as_ref()
                        .and_then(|t| t.field_value(c.name()))
                        .ok_or_else(|| OrmError::unknown_field(c.name()))?;
                    b.push_arg(value);
                }
                Assignable::Assignment(a) => b.build_assignment(a)?,
            }
        }
        if !self.predicates.is_empty() {
            b.push_str(" WHERE ");
            b.build_predicates(&self.predicates)?;
        }
        Ok(b.finish())
    }
}
