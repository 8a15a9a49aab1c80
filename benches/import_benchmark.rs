use bike_inventory::import::{detect_delimiter, parse_csv};
use bike_inventory::models::Bike;
use bike_inventory::services::export::{build_workbook, ExportColumn};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

/// A semicolon-separated price list with quoted fields and locale numbers.
fn price_list(rows: usize) -> String {
    let mut text = String::from(
        "Model Name;Model Number;Year;Color;Category;Price;Promo Price;Pieces;Battery;Link\n",
    );
    for i in 0..rows {
        let battery = if i % 3 == 0 { "Bosch 750Wh" } else { "" };
        text.push_str(&format!(
            "\"Sonic EVO {i}\";SE{:03}{:02};2026;black;E-MTB;\"5.499,00\";4.999,00;{};{battery};https://example.com/{i}\n",
            i / 10,
            i % 10,
            i % 7
        ));
    }
    text
}

fn benchmark_csv_pipeline(c: &mut Criterion) {
    let small = price_list(100);
    let large = price_list(5_000);

    let mut group = c.benchmark_group("csv_import");

    group.bench_function("detect_delimiter", |b| {
        b.iter(|| detect_delimiter(black_box(&large)))
    });

    group.bench_function("parse_100_rows", |b| {
        b.iter(|| parse_csv(black_box(&small), 2026))
    });

    group.bench_function("parse_5000_rows", |b| {
        b.iter(|| parse_csv(black_box(&large), 2026))
    });

    group.finish();
}

fn benchmark_export(c: &mut Criterion) {
    let parsed = parse_csv(&price_list(1_000), 2026).expect("Failed to parse price list");
    let bikes: Vec<Bike> = parsed
        .records
        .into_iter()
        .enumerate()
        .map(|(i, record)| Bike::from_input(format!("b{i}"), record.input, "Bulls", 2026, "now"))
        .collect();

    c.bench_function("export_1000_rows_all_columns", |b| {
        b.iter(|| build_workbook(black_box(&bikes), &ExportColumn::ALL))
    });
}

criterion_group!(benches, benchmark_csv_pipeline, benchmark_export);
criterion_main!(benches);
