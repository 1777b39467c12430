//! # orma
//!
//! A dialect-agnostic object-to-SQL mapper with a typed expression builder.
//!
//! ## Features
//!
//! - **Typed expressions**: columns, predicates, arithmetic, aggregates, joins and subqueries
//!   compose into one tree and render to SQL with `?` placeholders
//! - **Model registry**: table and column names are derived once per entity type and cached
//! - **Dialects**: MySQL, SQLite and PostgreSQL quoting and upserts
//! - **Middleware**: wrap statement execution; SQL logging via `tracing` ships in the box
//! - **Driver-agnostic**: any type implementing [`Driver`] can run the statements
//!
//! ## Example
//!
//! ```ignore
//! use orma::prelude::*;
//!
//! #[derive(Debug, Default, Entity)]
//! #[orm(table = "users")]
//! struct User {
//!     id: i64,
//!     #[orm(column = "name")]
//!     first_name: String,
//!     age: i32,
//! }
//!
//! let db = Db::builder(driver)
//!     .config(DbConfig::new().with_dialect(DialectKind::Sqlite))
//!     .middleware(SqlLogMiddleware::new())
//!     .build();
//!
//! // SELECT * FROM `users` WHERE `id` = ? LIMIT ?;
//! let user = db.select::<User>().filter(col("id").eq(1)).get().await?;
//!
//! // DELETE FROM `users` WHERE `age` < ?;
//! db.delete::<User>().filter(col("age").lt(18)).exec().await?;
//! ```

pub mod client;
pub mod db;
pub mod dialect;
pub mod error;
pub mod middleware;
pub mod model;
pub mod prelude;
pub mod qb;
pub mod row;
pub mod value;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(test)]
mod testing;

pub use client::{Driver, ExecResult};
pub use db::{Db, DbBuilder, DbConfig};
pub use dialect::{Dialect, DialectKind, MySql, Postgres, Sqlite};
pub use error::{OrmError, OrmResult};
pub use middleware::{
    Handler, Middleware, QueryContext, QueryOutput, QueryResult, QueryType, SqlLogMiddleware,
};
pub use model::{
    Entity, EntityDescriptor, EntityType, Field, FieldDescriptor, Model, ModelOption, Registry,
    underscore_name, with_column_name, with_table_name,
};
pub use row::Row;
pub use value::{FromValue, Value};

pub use qb::{
    Assignable, Deleter, Expr, Inserter, Predicate, Query, QueryBuilder, RawQuerier, Selector,
    Table, Updater, all, any, assign, avg, binary, col, count, exists, max, min, not, raw, some,
    sum,
};

#[cfg(feature = "postgres")]
pub use postgres::PgDriver;

#[cfg(feature = "derive")]
pub use orma_derive::Entity;
