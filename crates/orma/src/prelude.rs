//! Convenient imports for typical `orma` usage.
//!
//! ```ignore
//! use orma::prelude::*;
//! ```

pub use crate::{
    Db, DbConfig, DialectKind, Driver, Entity, ExecResult, OrmError, OrmResult, QueryBuilder, Row,
    SqlLogMiddleware, Value, args,
};

pub use crate::qb::{Table, all, any, assign, avg, col, count, exists, max, min, not, raw, some, sum};
