//! Performance benchmarks for the Attendance Analytics Engine.
//!
//! This benchmark suite covers the hot paths of a dashboard refresh and an
//! attendance list interaction:
//! - Dashboard aggregation over 1,000 employees and 10,000 punches
//! - Latest-punch resolution over 10,000 punches
//! - Attendance view (window, search, sort, paginate) over 10,000 punches
//! - A full refresh through an in-memory source
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::hint::black_box;

use chrono::NaiveDateTime;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use serde_json::{Value, json};

use attendance_engine::calculation::resolve_attendance;
use attendance_engine::config::EngineConfig;
use attendance_engine::dashboard::{Dashboard, DashboardInputs, aggregate};
use attendance_engine::models::{AttendancePunch, FilterSpec};
use attendance_engine::pipeline::{AttendanceRow, ViewQuery, attendance_view};
use attendance_engine::source::{Collection, StaticSource};

const DEPARTMENTS: [&str; 5] = ["Eng", "Ops", "Sales", "Finance", "Support"];

/// Creates employee records cycling through the naming variants.
fn create_employees(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            let department = DEPARTMENTS[i % DEPARTMENTS.len()];
            let hire_date = format!("{}-0{}-15", 2015 + i % 10, 1 + i % 9);
            match i % 3 {
                0 => json!({"id": i, "department": department, "HireDate": hire_date, "salary": 4000 + i}),
                1 => json!({"id": i, "Department": department, "hireDate": hire_date, "base_salary": (5000 + i).to_string()}),
                _ => json!({"id": i, "department": department, "BaseSalary": 6000 + i}),
            }
        })
        .collect()
}

/// Creates punches spread over March 2024 for `employees` employees.
fn create_punches(count: usize, employees: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            let day = 1 + i % 28;
            let start = 6 + i % 4;
            let end = start + 7 + i % 5;
            json!({
                "ID": i,
                "EmployeeID": format!("e{}", i % employees),
                "EntryTime": format!("2024-03-{:02}T{:02}:00:00", day, start),
                "ExitTime": if i % 17 == 0 { Value::Null } else { json!(format!("2024-03-{:02}T{:02}:30:00", day, end)) },
            })
        })
        .collect()
}

fn create_inputs(employees: usize, punches: usize) -> DashboardInputs {
    DashboardInputs::default()
        .with(Collection::Employees, Ok(create_employees(employees)))
        .with(Collection::Attendance, Ok(create_punches(punches, employees)))
        .with(
            Collection::Projects,
            Ok((0..50).map(|i| json!({"id": i, "status": if i % 2 == 0 { "Active" } else { "Done" }})).collect()),
        )
}

fn now() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2024-03-15 12:00:00", "%Y-%m-%d %H:%M:%S")
        .expect("valid benchmark clock")
}

/// Benchmark: Dashboard aggregation at increasing sizes.
fn bench_aggregate(c: &mut Criterion) {
    let config = EngineConfig::default();
    let mut group = c.benchmark_group("aggregate");

    for (employees, punches) in [(100, 1_000), (1_000, 10_000)] {
        let inputs = create_inputs(employees, punches);
        group.throughput(Throughput::Elements((employees + punches) as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", employees, punches)),
            &inputs,
            |b, inputs| b.iter(|| black_box(aggregate(inputs, &config))),
        );
    }

    group.finish();
}

/// Benchmark: Latest-punch resolution over 10,000 punches.
fn bench_resolve(c: &mut Criterion) {
    let punches = AttendancePunch::from_values(&create_punches(10_000, 1_000));

    c.bench_function("resolve_attendance_10k", |b| {
        b.iter(|| black_box(resolve_attendance(&punches)))
    });
}

/// Benchmark: Attendance view over 10,000 punches.
fn bench_attendance_view(c: &mut Criterion) {
    let config = EngineConfig::default();
    let punches = AttendancePunch::from_values(&create_punches(10_000, 1_000));

    let mut query = ViewQuery::attendance_default(config.default_page_size);
    query.set_filter(FilterSpec::month(2, 2024));
    query.toggle_sort(AttendanceRow::TOTAL_HOURS);
    query.set_search_term("e1");

    c.bench_function("attendance_view_10k", |b| {
        b.iter(|| black_box(attendance_view(&punches, &query, now(), &config)))
    });
}

/// Benchmark: Full refresh through an in-memory source.
fn bench_refresh(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let source = StaticSource::new()
        .with(Collection::Employees, create_employees(1_000))
        .with(Collection::Attendance, create_punches(10_000, 1_000));
    let dashboard = Dashboard::new(source, EngineConfig::default());

    c.bench_function("refresh_1k_employees", |b| {
        b.to_async(&rt).iter(|| async { black_box(dashboard.refresh().await) })
    });
}

criterion_group!(
    benches,
    bench_aggregate,
    bench_resolve,
    bench_attendance_view,
    bench_refresh
);
criterion_main!(benches);
