//! SELECT statements.

use super::builder::SqlBuilder;
use super::column::{Column, OrderBy};
use super::expr::{Expr, IntoExpr, Predicate};
use super::subquery::Subquery;
use super::table::{Table, TableRef};
use super::traits::{Query, QueryBuilder};
use crate::db::Db;
use crate::error::{OrmError, OrmResult};
use crate::middleware::QueryType;
use crate::model::Entity;
use crate::row::scan;
use crate::value::Value;
use std::marker::PhantomData;
use std::sync::Arc;

/// SELECT builder for entity `T`.
///
/// Rows are mapped onto `T` by column name, so projections used with
/// [`get`](Self::get) must only name mapped columns.
pub struct Selector<T: Entity> {
    db: Db,
    columns: Vec<Expr>,
    table: Option<TableRef>,
    predicates: Vec<Predicate>,
    group_by: Vec<Column>,
    having: Vec<Predicate>,
    order_by: Vec<OrderBy>,
    limit: Option<u32>,
    offset: Option<u32>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Entity> Selector<T> {
    pub fn new(db: &Db) -> Self {
        Self {
            db: db.clone(),
            columns: Vec::new(),
            table: None,
            predicates: Vec::new(),
            group_by: Vec::new(),
            having: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            _marker: PhantomData,
        }
    }

    /// Replace the projection. An empty projection selects `*`.
    pub fn select(mut self, columns: impl IntoIterator<Item = Expr>) -> Self {
        self.columns = columns.into_iter().collect();
        self
    }

    /// Append one projection entry.
    pub fn column(mut self, column: impl IntoExpr) -> Self {
        self.columns.push(column.into_expr());
        self
    }

    /// Read from `table` instead of the model's table.
    pub fn from(mut self, table: impl Into<TableRef>) -> Self {
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

    pub fn group_by(mut self, columns: impl IntoIterator<Item = Column>) -> Self {
        self.group_by.extend(columns);
        self
    }

    /// Add a HAVING condition; conditions are combined with AND.
    pub fn having(mut self, predicate: Predicate) -> Self {
        self.having.push(predicate);
        self
    }

    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order_by.push(order);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Turn the statement into a derived table or subquery expression.
    pub fn as_subquery(self, alias: impl Into<String>) -> Subquery {
        let table = self
            .table
            .clone()
            .unwrap_or_else(|| TableRef::Table(Table::of::<T>()));
        let columns = self.columns.clone();
        Subquery::new(Arc::new(self), Some(alias.into()), table, columns)
    }

    /// Like [`as_subquery`](Self::as_subquery) without an alias, for
    /// `IN`, `EXISTS` and `ANY`/`ALL`/`SOME`.
    pub fn into_subquery(self) -> Subquery {
        let table = self
            .table
            .clone()
            .unwrap_or_else(|| TableRef::Table(Table::of::<T>()));
        let columns = self.columns.clone();
        Subquery::new(Arc::new(self), None, table, columns)
    }
}

impl<T: Entity + Default> Selector<T> {
    /// First row, or [`OrmError::NoRows`]. Runs with `LIMIT 1`.
    pub async fn get(self) -> OrmResult<T> {
        let db = self.db.clone();
        let model = db.registry().get::<T>()?;
        let rows = db
            .query_statement(Arc::new(self.limit(1)), QueryType::Select, Arc::clone(&model))
            .await?;
        let row = rows.into_iter().next().ok_or(OrmError::NoRows)?;
        scan(&model, row)
    }

    /// All rows.
    pub async fn get_multi(self) -> OrmResult<Vec<T>> {
        let db = self.db.clone();
        let model = db.registry().get::<T>()?;
        let rows = db
            .query_statement(Arc::new(self), QueryType::Select, Arc::clone(&model))
            .await?;
        rows.into_iter().map(|row| scan(&model, row)).collect()
    }
}

impl<T: Entity> QueryBuilder for Selector<T> {
    fn build(&self) -> OrmResult<Query> {
        let model = self.db.registry().get::<T>()?;
        let mut b = SqlBuilder::new(self.db.dialect(), self.db.registry(), model);
        b.push_str("SELECT ");
        if self.columns.is_empty() {
            b.push('*');
        } else {
            for (i, c) in self.columns.iter().enumerate() {
                if i > 0 {
                    b.push(',');
                }
                b.build_selectable(c)?;
            }
        }
        b.push_str(" FROM ");
        b.build_table(self.table.as_ref())?;

        if !self.predicates.is_empty() {
            b.push_str(" WHERE ");
            b.build_predicates(&self.predicates)?;
        }
        if !self.group_by.is_empty() {
            b.push_str(" GROUP BY ");
            for (i, c) in self.group_by.iter().enumerate() {
                if i > 0 {
                    b.push(',');
                }
                b.build_column(c.table.as_ref(), &c.name)?;
            }
        }
        if !self.having.is_empty() {
            b.push_str(" HAVING ");
            b.build_predicates(&self.having)?;
        }
        if !self.order_by.is_empty() {
            b.push_str(" ORDER BY ");
            for (i, o) in self.order_by.iter().enumerate() {
                if i > 0 {
                    b.push(',');
                }
                b.build_column(o.column.table.as_ref(), &o.column.name)?;
                b.push_str(if o.desc { " DESC" } else { " ASC" });
            }
        }
        if let Some(limit) = self.limit {
            b.push_str(" LIMIT ");
            b.push_arg(Value::from(limit));
        }
        if let Some(offset) = self.offset {
            b.push_str(" OFFSET ");
            b.push_arg(Value::from(offset));
        }
        Ok(b.finish())
    }
}
