//! `tokio-postgres` backed [`Driver`].
//!
//! Statements arrive with `?` placeholders; they are rewritten to `$1, $2, ...`
//! before being sent. Arguments are encoded according to the parameter types
//! the server reports, so an `Int` bound to an `int4` column is sent as a
//! 32-bit integer.

use crate::client::{Driver, ExecResult};
use crate::error::{OrmError, OrmResult};
use crate::row::Row;
use crate::value::Value;
use async_trait::async_trait;
use bytes::BytesMut;
use chrono::NaiveDateTime;
use std::error::Error;
use tokio_postgres::Client;
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};
use uuid::Uuid;

/// Driver over a connected `tokio_postgres::Client`.
///
/// Use it together with the [`Postgres`](crate::dialect::Postgres) dialect.
pub struct PgDriver {
    client: Client,
}

impl PgDriver {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Driver for PgDriver {
    async fn exec(&self, sql: &str, args: &[Value]) -> OrmResult<ExecResult> {
        let sql = rewrite_placeholders(sql);
        let params = params_ref(args);
        let rows_affected = self.client.execute(sql.as_str(), &params).await?;
        Ok(ExecResult {
            rows_affected,
            last_insert_id: None,
        })
    }

    async fn query(&self, sql: &str, args: &[Value]) -> OrmResult<Vec<Row>> {
        let sql = rewrite_placeholders(sql);
        let params = params_ref(args);
        let rows = self.client.query(sql.as_str(), &params).await?;
        rows.iter().map(convert_row).collect()
    }
}

fn params_ref(args: &[Value]) -> Vec<&(dyn ToSql + Sync)> {
    args.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
}

/// Replace `?` with `$n`, leaving quoted literals and identifiers alone.
pub fn rewrite_placeholders(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut n = 0;
    let mut quote: Option<char> = None;
    for c in sql.chars() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
                out.push(c);
            }
            None => match c {
                '\'' | '"' => {
                    quote = Some(c);
                    out.push(c);
                }
                '?' => {
                    n += 1;
                    out.push('$');
                    out.push_str(&n.to_string());
                }
                _ => out.push(c),
            },
        }
    }
    out
}

fn convert_row(row: &tokio_postgres::Row) -> OrmResult<Row> {
    let mut columns = Vec::with_capacity(row.len());
    let mut values = Vec::with_capacity(row.len());
    for (i, column) in row.columns().iter().enumerate() {
        let value = cell(row, i, column.type_())
            .map_err(|e| OrmError::decode(column.name(), e.to_string()))?;
        columns.push(column.name().to_string());
        values.push(value);
    }
    Ok(Row::new(columns, values))
}

fn cell(
    row: &tokio_postgres::Row,
    i: usize,
    ty: &Type,
) -> Result<Value, Box<dyn Error + Sync + Send>> {
    let value = match *ty {
        Type::BOOL => row.try_get::<_, Option<bool>>(i)?.map(Value::from),
        Type::INT2 => row.try_get::<_, Option<i16>>(i)?.map(Value::from),
        Type::INT4 => row.try_get::<_, Option<i32>>(i)?.map(Value::from),
        Type::INT8 => row.try_get::<_, Option<i64>>(i)?.map(Value::from),
        Type::FLOAT4 => row.try_get::<_, Option<f32>>(i)?.map(Value::from),
        Type::FLOAT8 => row.try_get::<_, Option<f64>>(i)?.map(Value::from),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME => {
            row.try_get::<_, Option<String>>(i)?.map(Value::from)
        }
        Type::BYTEA => row.try_get::<_, Option<Vec<u8>>>(i)?.map(Value::from),
        Type::TIMESTAMP => row
            .try_get::<_, Option<NaiveDateTime>>(i)?
            .map(Value::from),
        Type::UUID => row.try_get::<_, Option<Uuid>>(i)?.map(Value::from),
        Type::JSON | Type::JSONB => row
            .try_get::<_, Option<serde_json::Value>>(i)?
            .map(Value::from),
        _ => return Err(format!("unsupported postgres type: {ty}").into()),
    };
    Ok(value.unwrap_or(Value::Null))
}

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(v) => v.to_sql(ty, out),
            Value::Int(v) => match *ty {
                Type::INT2 => i16::try_from(*v)?.to_sql(ty, out),
                Type::INT4 => i32::try_from(*v)?.to_sql(ty, out),
                Type::FLOAT4 => (*v as f32).to_sql(ty, out),
                Type::FLOAT8 => (*v as f64).to_sql(ty, out),
                _ => v.to_sql(ty, out),
            },
            Value::Float(v) => match *ty {
                Type::FLOAT4 => (*v as f32).to_sql(ty, out),
                _ => v.to_sql(ty, out),
            },
            Value::Text(v) => v.to_sql(ty, out),
            Value::Bytes(v) => v.to_sql(ty, out),
            Value::Timestamp(v) => v.to_sql(ty, out),
            Value::Uuid(v) => v.to_sql(ty, out),
            Value::Json(v) => v.to_sql(ty, out),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_placeholders() {
        assert_eq!(
            rewrite_placeholders(r#"SELECT * FROM "user" WHERE "id" = ? AND "age" > ?;"#),
            r#"SELECT * FROM "user" WHERE "id" = $1 AND "age" > $2;"#
        );
    }

    #[test]
    fn test_rewrite_skips_quoted() {
        assert_eq!(
            rewrite_placeholders(r#"SELECT '?', "a?b" FROM t WHERE x = ?"#),
            r#"SELECT '?', "a?b" FROM t WHERE x = $1"#
        );
        assert_eq!(
            rewrite_placeholders("SELECT 'it''s ?' WHERE a = ?"),
            "SELECT 'it''s ?' WHERE a = $1"
        );
    }
}
