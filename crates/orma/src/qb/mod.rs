//! Typed statement builders.
//!
//! Statements are assembled from an expression tree and rendered against the
//! entity's [`Model`](crate::model::Model) into SQL with `?` placeholders and
//! an ordered argument list. Identifiers are always quoted with the dialect's
//! quote character and every statement ends with `;`.
//!
//! # Usage
//!
//! ```ignore
//! use orma::prelude::*;
//!
//! // SELECT `id`,`first_name` FROM `user` WHERE (`age` > ?) AND (`first_name` LIKE ?);
//! let users = db
//!     .select::<User>()
//!     .select([col("id").into(), col("first_name").into()])
//!     .filter(col("age").gt(18))
//!     .filter(col("first_name").like("J%"))
//!     .get_multi()
//!     .await?;
//!
//! // UPDATE `user` SET `age`=`age` + ? WHERE `id` = ?;
//! db.update::<User>()
//!     .set(assign("age", col("age").add(1)))
//!     .filter(col("id").eq(100))
//!     .exec()
//!     .await?;
//!
//! // Joins
//! let o = Table::of::<Order>().as_("o");
//! let d = Table::of::<OrderDetail>().as_("d");
//! let join = o.clone().join(d.clone()).on([o.col("id").eq(d.col("order_id"))]);
//! let q = db.select::<Order>().from(join).build()?;
//! ```

mod assign;
mod builder;
mod column;
mod delete;
mod expr;
mod insert;
mod raw;
mod select;
mod subquery;
mod table;
mod traits;
mod update;


pub use assign::{Assignable, Assignment, assign};
pub use builder::SqlBuilder;
pub use column::{Aggregate, Column, OrderBy, avg, col, count, max, min, sum};
pub use delete::Deleter;
pub use expr::{
    BinaryExpr, Expr, IntoExpr, MathExpr, Op, Predicate, RawExpr, binary, exists, not, raw,
};
pub use insert::{Inserter, OnConflict, Upsert};
pub use raw::RawQuerier;
pub use select::Selector;
pub use subquery::{Subquery, SubqueryExpr, all, any, some};
pub use table::{Join, JoinBuilder, JoinKind, Table, TableRef};
pub use traits::{Query, QueryBuilder};
pub use update::Updater;
