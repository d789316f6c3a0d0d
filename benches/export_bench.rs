use chrono::NaiveDate;
use criterion::{Criterion, black_box, criterion_group, criterion_main};

use beitragseinzug::core::*;
use beitragseinzug::pain008::{DirectDebitBatch, ExportOptions, read_pain008, sepa_clean};

fn collection_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 11, 1).unwrap()
}

fn member_table(n: usize) -> MemberTable {
    let columns = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
    let rows = (0..n)
        .map(|i| {
            vec![
                Cell::Text(format!("Mitglied{i}")),
                Cell::Text("Erika".into()),
                if i % 7 == 0 { Cell::Empty } else { Cell::Text("x".into()) },
                Cell::Date(NaiveDate::from_ymd_opt(2021, 3, 1).unwrap()),
                Cell::Text(" DE02120300000000202051 ".into()),
                Cell::Text("BYLADEM1001".into()),
                Cell::Text(format!("Erika Mitglied{i}")),
                Cell::Int(1200 + (i as i64 % 50) * 100),
                Cell::Text(format!("M-{i:05}")),
            ]
        })
        .collect();
    MemberTable::new(columns, rows)
}

fn build_batch(n: usize) -> DirectDebitBatch {
    let table = member_table(n);
    let members = filter_active(&table).unwrap();
    let desc = Description::new("Mitgliedsbeitrag", MonthNames::german());
    let mut batch = DirectDebitBatch::new(OrganizationProfile::new(
        "TSV Musterstadt e.V.",
        "DE89370400440532013000",
        "COBADEFFXXX",
        "DE98ZZZ09999999999",
    ));
    for entry in build_payments(&members, collection_date(), &desc).unwrap() {
        batch.add_payment(entry);
    }
    batch
}

fn options() -> ExportOptions {
    ExportOptions {
        message_id: Some("BENCH-0001".into()),
        created_at: NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap(),
    }
}

fn bench_filter_and_build(c: &mut Criterion) {
    let table = member_table(500);
    let desc = Description::new("Mitgliedsbeitrag", MonthNames::german());
    c.bench_function("filter_and_build_500", |b| {
        b.iter(|| {
            let members = filter_active(black_box(&table)).unwrap();
            black_box(build_payments(&members, collection_date(), &desc))
        });
    });
}

fn bench_export(c: &mut Criterion) {
    let small = build_batch(50);
    c.bench_function("export_50_members", |b| {
        b.iter(|| black_box(small.export(black_box(&options()))));
    });

    let large = build_batch(5000);
    c.bench_function("export_5000_members", |b| {
        b.iter(|| black_box(large.export(black_box(&options()))));
    });
}

fn bench_read_back(c: &mut Criterion) {
    let xml = build_batch(1000).export(&options()).unwrap().xml;
    c.bench_function("read_pain008_1000_members", |b| {
        b.iter(|| black_box(read_pain008(black_box(&xml))));
    });
}

fn bench_sepa_clean(c: &mut Criterion) {
    c.bench_function("sepa_clean_name", |b| {
        b.iter(|| black_box(sepa_clean(black_box("Jürgen Müßig & Söhne – Gärtnerei"))));
    });
}

criterion_group!(
    benches,
    bench_filter_and_build,
    bench_export,
    bench_read_back,
    bench_sepa_clean,
);
criterion_main!(benches);
