//! Hand-written entities shared by unit tests.
//!
//! The derive macro cannot be used inside the crate that defines `Entity`, so
//! these fixtures spell the impls out through a small macro.

use crate::client::{Driver, ExecResult};
use crate::db::Db;
use crate::error::{OrmError, OrmResult};
use crate::model::{Entity, EntityDescriptor, FieldDescriptor};
use crate::row::Row;
use crate::value::{FromValue, Value};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

macro_rules! entity {
    (
        $name:ident $(table = $table:literal)? {
            $($field:ident : $ty:ty $(=> $tag:literal)?),* $(,)?
        }
    ) => {
        #[allow(non_snake_case)]
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name {
            $(pub $field: $ty),*
        }

        impl Entity for $name {
            fn descriptor() -> EntityDescriptor {
                const FIELDS: &[FieldDescriptor] = &[
                    $(FieldDescriptor::new(stringify!($field), stringify!($ty))
                        .with_tag(entity!(@tag $($tag)?))),*
                ];
                EntityDescriptor {
                    type_name: stringify!($name),
                    fields: FIELDS,
                }
            }

            $(
                fn table_name() -> Option<String> {
                    Some($table.to_string())
                }
            )?

            fn field_value(&self, field: &str) -> Option<Value> {
                match field {
                    $(stringify!($field) => Some(Value::from(self.$field.clone())),)*
                    _ => None,
                }
            }

            fn set_field(&mut self, field: &str, value: Value) -> OrmResult<()> {
                match field {
                    $(stringify!($field) => {
                        self.$field = <$ty as FromValue>::from_value(value)
                            .map_err(|e| OrmError::decode(stringify!($field), e))?;
                        Ok(())
                    })*
                    _ => Err(OrmError::unknown_field(field)),
                }
            }
        }
    };
    (@tag) => { "" };
    (@tag $tag:literal) => { $tag };
}

entity!(TestModel {
    id: i64,
    first_name: String,
    age: i32,
    last_name: Option<String>,
});

entity!(User {
    id: i64,
    name: String,
    age: i32,
});

entity!(Person table = "t" {
    id: i64,
    name: String,
    age: i32,
});

entity!(Order {
    id: i64,
    using_col1: String,
    using_col2: String,
});

entity!(OrderDetail {
    order_id: i64,
    item_id: i64,
    using_col1: String,
    using_col2: String,
});

entity!(Item { id: i64 });

entity!(CustomTable table = "custom_table_name_t" {
    name: String,
});

entity!(TaggedModel {
    id: i64 => "column=id_t",
    FirstName: String => "column=first_name_t",
    Age: i32,
});

entity!(CamelModel {
    ID: i64,
    UserID: i64,
    HTTPCode: i32,
    FirstName: String,
});

entity!(DupColumn {
    id: i64 => "column=key",
    code: String => "column=key",
});

entity!(BadTag {
    id: i64 => "column",
});

/// Entity with no mapped fields.
#[derive(Debug, Default)]
pub struct Empty;

impl Entity for Empty {
    fn descriptor() -> EntityDescriptor {
        EntityDescriptor {
            type_name: "Empty",
            fields: &[],
        }
    }

    fn field_value(&self, _: &str) -> Option<Value> {
        None
    }

    fn set_field(&mut self, field: &str, _: Value) -> OrmResult<()> {
        Err(OrmError::unknown_field(field))
    }
}

/// Driver that records every statement and answers with canned rows.
#[derive(Default)]
pub struct RecordingDriver {
    pub statements: Mutex<Vec<(String, Vec<Value>)>>,
    pub rows: Vec<Row>,
    pub delay: Option<Duration>,
}

impl RecordingDriver {
    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    pub fn statements(&self) -> Vec<(String, Vec<Value>)> {
        self.statements.lock().unwrap().clone()
    }

    async fn record(&self, sql: &str, args: &[Value]) {
        self.statements
            .lock()
            .unwrap()
            .push((sql.to_string(), args.to_vec()));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl Driver for RecordingDriver {
    async fn exec(&self, sql: &str, args: &[Value]) -> OrmResult<ExecResult> {
        self.record(sql, args).await;
        Ok(ExecResult {
            rows_affected: 1,
            last_insert_id: None,
        })
    }

    async fn query(&self, sql: &str, args: &[Value]) -> OrmResult<Vec<Row>> {
        self.record(sql, args).await;
        Ok(self.rows.clone())
    }
}

/// A MySQL-dialect `Db` over a driver that is never called.
pub fn mysql_db() -> Db {
    Db::new(RecordingDriver::default())
}
