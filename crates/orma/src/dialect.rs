//! SQL dialects.
//!
//! A dialect supplies the identifier quote character and renders the upsert
//! tail of an INSERT. Everything else the builder emits is shared.

use crate::error::{OrmError, OrmResult};
use crate::qb::{Assignable, SqlBuilder, Upsert};
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

pub trait Dialect: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    /// Identifier quote character.
    fn quote(&self) -> char;

    /// Append the conflict clause for `upsert` to an INSERT.
    fn build_upsert(&self, b: &mut SqlBuilder<'_>, upsert: &Upsert) -> OrmResult<()>;
}

/// MySQL: backtick quoting and `ON DUPLICATE KEY UPDATE`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySql;

impl Dialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote(&self) -> char {
        '`'
    }

    fn build_upsert(&self, b: &mut SqlBuilder<'_>, upsert: &Upsert) -> OrmResult<()> {
        b.push_str(" ON DUPLICATE KEY UPDATE ");
        for (i, a) in upsert.assigns.iter().enumerate() {
            if i > 0 {
                b.push(',');
            }
            match a {
                Assignable::Column(c) => {
                    b.build_column(c.table.as_ref(), c.name())?;
                    b.push_str("=VALUES(");
                    b.build_column(c.table.as_ref(), c.name())?;
                    b.push(')');
                }
                Assignable::Assignment(a) => b.build_assignment(a)?,
            }
        }
        Ok(())
    }
}

/// SQLite: backtick quoting and `ON CONFLICT(...) DO UPDATE SET`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sqlite;

impl Dialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn quote(&self) -> char {
        '`'
    }

    fn build_upsert(&self, b: &mut SqlBuilder<'_>, upsert: &Upsert) -> OrmResult<()> {
        build_on_conflict(self, b, upsert)
    }
}

/// PostgreSQL: double-quote quoting and `ON CONFLICT(...) DO UPDATE SET`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Postgres;

impl Dialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn quote(&self) -> char {
        '"'
    }

    fn build_upsert(&self, b: &mut SqlBuilder<'_>, upsert: &Upsert) -> OrmResult<()> {
        build_on_conflict(self, b, upsert)
    }
}

fn build_on_conflict(
    dialect: &dyn Dialect,
    b: &mut SqlBuilder<'_>,
    upsert: &Upsert,
) -> OrmResult<()> {
    if upsert.conflict_columns.is_empty() {
        return Err(OrmError::Other(format!(
            "{} upsert requires conflict columns",
            dialect.name()
        )));
    }
    b.push_str(" ON CONFLICT(");
    for (i, field) in upsert.conflict_columns.iter().enumerate() {
        if i > 0 {
            b.push(',');
        }
        b.build_column(None, field)?;
    }
    b.push_str(") DO UPDATE SET ");
    for (i, a) in upsert.assigns.iter().enumerate() {
        if i > 0 {
            b.push(',');
        }
        match a {
            Assignable::Column(c) => {
                b.build_column(c.table.as_ref(), c.name())?;
                b.push_str("=excluded.");
                b.build_column(c.table.as_ref(), c.name())?;
            }
            Assignable::Assignment(a) => b.build_assignment(a)?,
        }
    }
    Ok(())
}

/// Dialect selector used in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    #[default]
    MySql,
    Sqlite,
    Postgres,
}

impl DialectKind {
    pub fn dialect(self) -> Arc<dyn Dialect> {
        match self {
            DialectKind::MySql => Arc::new(MySql),
            DialectKind::Sqlite => Arc::new(Sqlite),
            DialectKind::Postgres => Arc::new(Postgres),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_chars() {
        assert_eq!(MySql.quote(), '`');
        assert_eq!(Sqlite.quote(), '`');
        assert_eq!(Postgres.quote(), '"');
    }

    #[test]
    fn test_kind_deserialize() {
        let kind: DialectKind = serde_json::from_str("\"sqlite\"").unwrap();
        assert_eq!(kind, DialectKind::Sqlite);
        let kind: DialectKind = serde_json::from_str("\"mysql\"").unwrap();
        assert_eq!(kind.dialect().name(), "mysql");
        assert!(serde_json::from_str::<DialectKind>("\"oracle\"").is_err());
    }
}
