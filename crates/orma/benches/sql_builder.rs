use async_trait::async_trait;
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use orma::prelude::*;

#[derive(Debug, Clone, Default, Entity)]
struct Account {
    id: i64,
    owner: String,
    balance: i64,
    #[orm(column = "created_by")]
    creator: Option<String>,
}

struct NoopDriver;

#[async_trait]
impl Driver for NoopDriver {
    async fn exec(&self, _sql: &str, _args: &[Value]) -> OrmResult<ExecResult> {
        Ok(ExecResult::default())
    }

    async fn query(&self, _sql: &str, _args: &[Value]) -> OrmResult<Vec<Row>> {
        Ok(Vec::new())
    }
}

fn bench_select_predicates(c: &mut Criterion) {
    let db = Db::new(NoopDriver);
    let mut group = c.benchmark_group("sql_builder/select_predicates");

    for n in [1, 5, 20, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let q = db
                    .select::<Account>()
                    .filters((0..n).map(|i| col("balance").gt(i as i64)))
                    .order_by(col("id").desc())
                    .limit(10);
                black_box(q.build().unwrap());
            });
        });
    }

    group.finish();
}

fn bench_insert_rows(c: &mut Criterion) {
    let db = Db::new(NoopDriver);
    let mut group = c.benchmark_group("sql_builder/insert_rows");

    for n in [1, 10, 100, 500] {
        let rows: Vec<Account> = (0..n)
            .map(|i| Account {
                id: i,
                owner: format!("owner{i}"),
                balance: i * 100,
                creator: None,
            })
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &rows, |b, rows| {
            b.iter(|| {
                let q = db.insert::<Account>().values(rows.iter().cloned());
                black_box(q.build().unwrap());
            });
        });
    }

    group.finish();
}

fn bench_in_values(c: &mut Criterion) {
    let db = Db::new(NoopDriver);
    let mut group = c.benchmark_group("sql_builder/in_values");

    for n in [5, 20, 100, 500] {
        let ids: Vec<i64> = (0..n).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &ids, |b, ids| {
            b.iter(|| {
                let q = db
                    .select::<Account>()
                    .filter(col("id").in_values(ids.iter().copied()));
                black_box(q.build().unwrap());
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_select_predicates,
    bench_insert_rows,
    bench_in_values
);
criterion_main!(benches);
