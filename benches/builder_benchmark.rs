use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sql_tablekit::prelude::*;
use std::hint::black_box;

const SCHEMA: &str = "CREATE TABLE test (
    id INTEGER PRIMARY KEY,
    a INTEGER,
    b TEXT,
    d REAL
)";

// Deterministic rows so runs are comparable
fn seeded_connection(num_rows: usize) -> Result<Connection, TablekitError> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut conn = Connection::new(ConnectionConfig::sqlite(":memory:"))?;
    conn.execute_batch(SCHEMA)?;
    conn.begin_transaction()?;
    for _ in 0..num_rows {
        conn.table("test").insert([
            ("a", RowValues::Int(rng.random_range(1..1000))),
            ("b", RowValues::Text(format!("text-{}", rng.random_range(1..1000)))),
            ("d", RowValues::Float(rng.random_range(0.0..1000.0))),
        ])?;
    }
    conn.commit()?;
    Ok(conn)
}

fn benchmark_render(c: &mut Criterion) {
    let Ok(mut conn) = seeded_connection(0) else {
        eprintln!("failed to open sqlite; skipping render benchmark");
        return;
    };

    c.bench_function("render_select", |b| {
        b.iter(|| {
            let mut query = conn.table("test");
            query
                .select(["id", "b"])
                .where_("a", Operator::Gt, black_box(10))
                .where_("b", Operator::Ne, "text-1")
                .order_by("id", Direction::Desc)
                .limit(20)
                .offset(40);
            black_box(query.render_select())
        });
    });

    c.bench_function("parse_filter", |b| {
        b.iter(|| parse_conditions(black_box("a>=10,b!=text-1,d<500")));
    });
}

fn benchmark_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("sqlite_round_trip");
    for num_rows in [100usize, 1_000] {
        let Ok(mut conn) = seeded_connection(num_rows) else {
            eprintln!("failed to seed {num_rows} rows; skipping");
            continue;
        };
        group.bench_with_input(BenchmarkId::new("get", num_rows), &num_rows, |b, _| {
            b.iter(|| {
                conn.table("test")
                    .where_("a", Operator::Lt, 500)
                    .order_by("id", Direction::Asc)
                    .get()
                    .map(|rows| black_box(rows.len()))
            });
        });
        group.bench_with_input(BenchmarkId::new("count", num_rows), &num_rows, |b, _| {
            b.iter(|| conn.table("test").where_("a", Operator::Lt, 500).count());
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_render, benchmark_round_trip);
criterion_main!(benches);
