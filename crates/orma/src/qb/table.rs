//! Table references: entity tables, joins and derived tables.

use super::column::{Aggregate, Column};
use super::expr::Predicate;
use super::subquery::Subquery;
use crate::model::{Entity, EntityType};
use std::fmt;

/// Anything that can appear after `FROM` or on either side of a join.
#[derive(Clone, Debug)]
pub enum TableRef {
    Table(Table),
    Join(Box<Join>),
    Subquery(Subquery),
}

impl TableRef {
    /// Alias used to qualify column references, if any.
    pub fn alias(&self) -> Option<&str> {
        match self {
            TableRef::Table(t) => t.alias.as_deref(),
            TableRef::Join(_) => None,
            TableRef::Subquery(s) => s.alias.as_deref(),
        }
    }
}

impl From<Table> for TableRef {
    fn from(t: Table) -> Self {
        TableRef::Table(t)
    }
}

impl From<Join> for TableRef {
    fn from(j: Join) -> Self {
        TableRef::Join(Box::new(j))
    }
}

impl From<Subquery> for TableRef {
    fn from(s: Subquery) -> Self {
        TableRef::Subquery(s)
    }
}

/// The mapped table of an entity, optionally aliased.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Table {
    pub(crate) entity: EntityType,
    pub(crate) alias: Option<String>,
}

impl Table {
    pub fn of<T: Entity>() -> Self {
        Self {
            entity: EntityType::of::<T>(),
            alias: None,
        }
    }

    pub fn as_(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Column of this table.
    pub fn col(&self, name: impl Into<String>) -> Column {
        Column::of(TableRef::Table(self.clone()), name)
    }

    /// Aggregate over a column of this table.
    pub fn aggregate(&self, agg: Aggregate) -> Aggregate {
        agg.on(self.clone())
    }

    pub fn join(self, right: impl Into<TableRef>) -> JoinBuilder {
        JoinBuilder::new(self.into(), right.into(), JoinKind::Inner)
    }

    pub fn left_join(self, right: impl Into<TableRef>) -> JoinBuilder {
        JoinBuilder::new(self.into(), right.into(), JoinKind::Left)
    }

    pub fn right_join(self, right: impl Into<TableRef>) -> JoinBuilder {
        JoinBuilder::new(self.into(), right.into(), JoinKind::Right)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
}

impl JoinKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinKind::Inner => "JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two table references combined with `ON` predicates or `USING` columns.
#[derive(Clone, Debug)]
pub struct Join {
    pub(crate) left: TableRef,
    pub(crate) right: TableRef,
    pub(crate) kind: JoinKind,
    pub(crate) on: Vec<Predicate>,
    pub(crate) using: Vec<String>,
}

impl Join {
    /// Column resolved against the left side first, then the right.
    pub fn col(&self, name: impl Into<String>) -> Column {
        Column::of(TableRef::Join(Box::new(self.clone())), name)
    }

    pub fn join(self, right: impl Into<TableRef>) -> JoinBuilder {
        JoinBuilder::new(self.into(), right.into(), JoinKind::Inner)
    }

    pub fn left_join(self, right: impl Into<TableRef>) -> JoinBuilder {
        JoinBuilder::new(self.into(), right.into(), JoinKind::Left)
    }

    pub fn right_join(self, right: impl Into<TableRef>) -> JoinBuilder {
        JoinBuilder::new(self.into(), right.into(), JoinKind::Right)
    }
}

/// A join waiting for its `ON` or `USING` clause.
#[derive(Clone, Debug)]
pub struct JoinBuilder {
    left: TableRef,
    right: TableRef,
    kind: JoinKind,
}

impl JoinBuilder {
    pub(crate) fn new(left: TableRef, right: TableRef, kind: JoinKind) -> Self {
        Self { left, right, kind }
    }

    pub fn on(self, predicates: impl IntoIterator<Item = Predicate>) -> Join {
        Join {
            left: self.left,
            right: self.right,
            kind: self.kind,
            on: predicates.into_iter().collect(),
            using: Vec::new(),
        }
    }

    pub fn using<S: Into<String>>(self, columns: impl IntoIterator<Item = S>) -> Join {
        Join {
            left: self.left,
            right: self.right,
            kind: self.kind,
            on: Vec::new(),
            using: columns.into_iter().map(Into::into).collect(),
        }
    }
}
