use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use csv_row_index::transform::{TransformOptions, transform_file};
use tempfile::TempDir;

fn generate_orders(rows: usize) -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let csv_path = temp_dir.path().join("input.csv");
    let mut file = File::create(&csv_path).expect("create csv");
    writeln!(file, "id,ordered_at,status,note").expect("header");
    for i in 0..rows {
        let status = match i % 3 {
            0 => "shipped",
            1 => "pending",
            _ => "processing",
        };
        let day = (i % 28) + 1;
        writeln!(file, "{i},2024-01-{day:02},{status},\"free, text {i}\"").expect("row");
    }
    (temp_dir, csv_path)
}

fn bench_transform(c: &mut Criterion) {
    let (temp_dir, input) = generate_orders(50_000);
    let output = temp_dir.path().join("output.csv");

    let mut group = c.benchmark_group("append_row_numbers");
    group.sample_size(20);
    group.bench_function("quiet_50k", |b| {
        b.iter_batched(
            TransformOptions::default,
            |options| {
                transform_file(&input, &output, &options, &mut io::sink()).expect("transform")
            },
            BatchSize::SmallInput,
        )
    });
    group.bench_function("print_rows_50k", |b| {
        b.iter_batched(
            || TransformOptions {
                print_rows: true,
                ..TransformOptions::default()
            },
            |options| {
                transform_file(&input, &output, &options, &mut io::sink()).expect("transform")
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_transform);
criterion_main!(benches);
