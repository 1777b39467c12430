//! INSERT statements and upserts.

use super::assign::Assignable;
use super::builder::SqlBuilder;
use super::traits::{Query, QueryBuilder};
use crate::client::ExecResult;
use crate::db::Db;
use crate::error::{OrmError, OrmResult};
use crate::middleware::QueryType;
use crate::model::{Entity, Field};
use std::sync::Arc;

/// Conflict handling appended to an INSERT. Rendered by the dialect.
#[derive(Clone, Debug, Default)]
pub struct Upsert {
    /// Logical names of the conflict target; ignored by MySQL.
    pub conflict_columns: Vec<String>,
    pub assigns: Vec<Assignable>,
}

/// INSERT builder for entity `T`.
pub struct Inserter<T: Entity> {
    db: Db,
    rows: Vec<T>,
    columns: Vec<String>,
    upsert: Option<Upsert>,
}

impl<T: Entity> Inserter<T> {
    pub fn new(db: &Db) -> Self {
        Self {
            db: db.clone(),
            rows: Vec::new(),
            columns: Vec::new(),
            upsert: None,
        }
    }

    /// Append rows to insert.
    pub fn values(mut self, rows: impl IntoIterator<Item = T>) -> Self {
        self.rows.extend(rows);
        self
    }

    /// Insert only these fields (logical names), in this order.
    pub fn columns<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// MySQL `ON DUPLICATE KEY UPDATE`.
    pub fn on_duplicate_key(self) -> OnConflict<T> {
        OnConflict {
            inserter: self,
            conflict_columns: Vec::new(),
        }
    }

    /// `ON CONFLICT(columns) DO UPDATE`.
    pub fn on_conflict<S: Into<String>>(self, columns: impl IntoIterator<Item = S>) -> OnConflict<T> {
        OnConflict {
            inserter: self,
            conflict_columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub async fn exec(self) -> OrmResult<ExecResult> {
        let db = self.db.clone();
        let model = db.registry().get::<T>()?;
        db.exec_statement(Arc::new(self), QueryType::Insert, model)
            .await
    }
}

/// An INSERT waiting for its conflict assignments.
pub struct OnConflict<T: Entity> {
    inserter: Inserter<T>,
    conflict_columns: Vec<String>,
}

impl<T: Entity> OnConflict<T> {
    pub fn update(mut self, assigns: impl IntoIterator<Item = Assignable>) -> Inserter<T> {
        self.inserter.upsert = Some(Upsert {
            conflict_columns: self.conflict_columns,
            assigns: assigns.into_iter().collect(),
        });
        self.inserter
    }
}

impl<T: Entity> QueryBuilder for Inserter<T> {
    fn build(&self) -> OrmResult<Query> {
        if self.rows.is_empty() {
            return Err(OrmError::NoInsertedRows);
        }
        if self.upsert.as_ref().is_some_and(|u| u.assigns.is_empty()) {
            return Err(OrmError::EmptyUpsert);
        }
        let model = self.db.registry().get::<T>()?;
        let fields: Vec<Field> = if self.columns.is_empty() {
            model.fields.clone()
        } else {
            self.columns
                .iter()
                .map(|c| {
                    model
                        .field(c)
                        .cloned()
                        .ok_or_else(|| OrmError::unknown_field(c))
                })
                .collect::<OrmResult<_>>()?
        };

        let mut b = SqlBuilder::new(self.db.dialect(), self.db.registry(), model);
        b.push_str("INSERT INTO ");
        b.quote_table();
        b.push('(');
        for (i, f) in fields.iter().enumerate() {
            if i > 0 {
                b.push(',');
            }
            b.quote(&f.column);
        }
        b.push_str(") VALUES");
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                b.push(',');
            }
            b.push('(');
            for (j, f) in fields.iter().enumerate() {
                if j > 0 {
                    b.push(',');
                }
                let value = row
                    .field_value(&f.name)
                    .ok_or_else(|| OrmError::unknown_field(&f.name))?;
                b.push_arg(value);
            }
            b.push(')');
        }
        if let Some(upsert) = &self.upsert {
            let dialect = b.dialect();
            dialect.build_upsert(&mut b, upsert)?;
        }
        Ok(b.finish())
    }
}
