use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use orma::prelude::*;
use orma::Postgres;

#[derive(Debug, Clone, Default, Entity)]
struct UserProfile {
    id: i64,
    #[orm(column = "nick")]
    nickname: String,
    age: i32,
    bio: Option<String>,
}

#[derive(Debug, Clone, Default, Entity)]
#[orm(table = "orders")]
struct Order {
    id: i64,
    user_id: i64,
    amount: f64,
}

#[derive(Default)]
struct Recorder {
    statements: Mutex<Vec<(String, Vec<Value>)>>,
    rows: Vec<Row>,
}

#[async_trait]
impl Driver for Recorder {
    async fn exec(&self, sql: &str, args: &[Value]) -> OrmResult<ExecResult> {
        self.statements
            .lock()
            .unwrap()
            .push((sql.to_string(), args.to_vec()));
        Ok(ExecResult {
            rows_affected: 2,
            last_insert_id: Some(10),
        })
    }

    async fn query(&self, sql: &str, args: &[Value]) -> OrmResult<Vec<Row>> {
        self.statements
            .lock()
            .unwrap()
            .push((sql.to_string(), args.to_vec()));
        Ok(self.rows.clone())
    }
}

fn sql_of(q: &dyn QueryBuilder) -> (String, Vec<Value>) {
    let q = q.build().unwrap();
    (q.sql, q.args)
}

#[test]
fn derived_model_uses_snake_case_and_column_override() {
    let db = Db::new(Recorder::default());
    let model = db.registry().get::<UserProfile>().unwrap();
    assert_eq!(model.table_name, "user_profile");
    assert_eq!(model.column_of("nickname").unwrap(), "nick");
    assert_eq!(model.column_of("bio").unwrap(), "bio");

    let orders = db.registry().get::<Order>().unwrap();
    assert_eq!(orders.table_name, "orders");
}

#[test]
fn select_with_filters_order_and_paging() {
    let db = Db::new(Recorder::default());
    let (sql, args) = sql_of(
        &db.select::<UserProfile>()
            .column(col("id"))
            .column(col("nickname").as_("n"))
            .filter(col("age").ge(18).and(col("bio").is_not_null()))
            .order_by(col("age").desc())
            .order_by(col("id").asc())
            .limit(10)
            .offset(20),
    );
    assert_eq!(
        sql,
        "SELECT `id`,`nick` AS `n` FROM `user_profile` WHERE (`age` >= ?) AND (`bio` IS NOT NULL) ORDER BY `age` DESC,`id` ASC LIMIT ? OFFSET ?;"
    );
    assert_eq!(args, [Value::Int(18), Value::Int(10), Value::Int(20)]);
}

#[test]
fn join_across_derived_entities() {
    let db = Db::new(Recorder::default());
    let u = Table::of::<UserProfile>().as_("u");
    let o = Table::of::<Order>().as_("o");
    let join = u
        .clone()
        .join(o.clone())
        .on([u.col("id").eq(o.col("user_id"))]);
    let (sql, _) = sql_of(
        &db.select::<UserProfile>()
            .column(u.col("nickname"))
            .column(sum("amount").on(o.clone()).as_("total"))
            .from(join)
            .group_by([u.col("nickname")]),
    );
    assert_eq!(
        sql,
        "SELECT `u`.`nick`,SUM(`o`.`amount`) AS `total` FROM (`user_profile` AS `u` JOIN `orders` AS `o` ON `u`.`id` = `o`.`user_id`) GROUP BY `u`.`nick`;"
    );
}

#[test]
fn unknown_field_is_reported() {
    let db = Db::new(Recorder::default());
    let err = db
        .select::<UserProfile>()
        .filter(col("missing").eq(1))
        .build()
        .unwrap_err();
    assert!(err.is_unknown_field());
}

#[test]
fn insert_renders_per_dialect() {
    let row = UserProfile {
        id: 1,
        nickname: "tom".into(),
        age: 18,
        bio: None,
    };

    let mysql = Db::new(Recorder::default());
    let (sql, args) = sql_of(
        &mysql
            .insert::<UserProfile>()
            .values([row.clone()])
            .on_duplicate_key()
            .update([col("nickname").into()]),
    );
    assert_eq!(
        sql,
        "INSERT INTO `user_profile`(`id`,`nick`,`age`,`bio`) VALUES(?,?,?,?) ON DUPLICATE KEY UPDATE `nick`=VALUES(`nick`);"
    );
    assert_eq!(
        args,
        [
            Value::Int(1),
            Value::from("tom"),
            Value::Int(18),
            Value::Null
        ]
    );

    let pg = Db::builder(Recorder::default()).dialect(Postgres).build();
    let (sql, _) = sql_of(
        &pg.insert::<UserProfile>()
            .values([row.clone()])
            .columns(["id", "age"])
            .on_conflict(["id"])
            .update([assign("age", 30).into()]),
    );
    assert_eq!(
        sql,
        r#"INSERT INTO "user_profile"("id","age") VALUES(?,?) ON CONFLICT("id") DO UPDATE SET "age"=?;"#
    );

    let sqlite = Db::builder(Recorder::default())
        .config(DbConfig::new().with_dialect(DialectKind::Sqlite))
        .build();
    assert_eq!(sqlite.dialect().name(), "sqlite");
}

#[tokio::test]
async fn update_reads_values_from_entity() {
    let driver = Arc::new(Recorder::default());
    let db = Db::new(Arc::clone(&driver));
    let res = db
        .update::<UserProfile>()
        .update(UserProfile {
            id: 3,
            nickname: "jerry".into(),
            age: 21,
            bio: Some("hi".into()),
        })
        .set(col("nickname"))
        .set(assign("age", col("age").add(1)))
        .filter(col("id").eq(3))
        .exec()
        .await
        .unwrap();
    assert_eq!(res.rows_affected, 2);

    let statements = driver.statements.lock().unwrap();
    assert_eq!(
        statements[0].0,
        "UPDATE `user_profile` SET `nick`=?,`age`=`age` + ? WHERE `id` = ?;"
    );
    assert_eq!(
        statements[0].1,
        [Value::from("jerry"), Value::Int(1), Value::Int(3)]
    );
}

#[tokio::test]
async fn get_multi_scans_rows_by_column_name() {
    let rows = vec![
        [
            ("id", Value::Int(1)),
            ("nick", Value::from("a")),
            ("age", Value::Int(30)),
            ("bio", Value::Null),
        ]
        .into_iter()
        .collect::<Row>(),
        [
            ("id", Value::Int(2)),
            ("nick", Value::from("b")),
            ("age", Value::Int(40)),
            ("bio", Value::from("x")),
        ]
        .into_iter()
        .collect::<Row>(),
    ];
    let db = Db::new(Recorder {
        rows,
        ..Recorder::default()
    });

    let users = db.select::<UserProfile>().get_multi().await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].nickname, "a");
    assert_eq!(users[0].bio, None);
    assert_eq!(users[1].age, 40);
    assert_eq!(users[1].bio.as_deref(), Some("x"));
}

#[tokio::test]
async fn scanning_unmapped_column_fails() {
    let rows = vec![[("unknown", 1)].into_iter().collect::<Row>()];
    let db = Db::new(Recorder {
        rows,
        ..Recorder::default()
    });
    let err = db.select::<UserProfile>().get().await.unwrap_err();
    assert!(matches!(err, OrmError::UnknownColumn(ref c) if c == "unknown"));
}
