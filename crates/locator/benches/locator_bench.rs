//! 위치 안내 벤치마크
//!
//! 상품명 매칭, 쇼핑 목록 매칭, 방향 판정 성능을 측정합니다.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lookey_core::types::ShelfItem;
use lookey_locator::direction;
use lookey_locator::matcher;

fn create_shelf(count: usize) -> Vec<ShelfItem> {
    (0..count)
        .map(|i| {
            ShelfItem::new(
                format!("상품 {i} 500ml"),
                (i % 20) as i32 * 60,
                (i / 20) as i32 * 80,
                40,
                60,
            )
        })
        .collect()
}

fn bench_name_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("name_matching");
    group.throughput(Throughput::Elements(1));

    group.bench_function("exact", |b| {
        b.iter(|| matcher::matches(black_box("코카콜라 500ml"), black_box("코카콜라 500ml")))
    });

    group.bench_function("case_insensitive", |b| {
        b.iter(|| matcher::matches(black_box("Coca Cola 500ml"), black_box("coca cola 500ml")))
    });

    group.bench_function("whitespace_containment", |b| {
        b.iter(|| matcher::matches(black_box("코카 콜라 제로 500ml"), black_box("콜라제로")))
    });

    group.bench_function("miss", |b| {
        b.iter(|| matcher::matches(black_box("칠성사이다 1.5L"), black_box("서울우유")))
    });

    group.finish();
}

fn bench_shopping_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("shopping_list_match");
    let references: Vec<String> = (0..10).map(|i| format!("상품 {}", i * 7)).collect();

    for count in &[20usize, 100, 500] {
        let shelf = create_shelf(*count);
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &shelf, |b, shelf| {
            b.iter(|| matcher::build_match_set(black_box(shelf), black_box(references.as_slice())))
        });
    }

    group.finish();
}

fn bench_direction(c: &mut Criterion) {
    let mut group = c.benchmark_group("direction");
    group.throughput(Throughput::Elements(1));

    let anchor = ShelfItem::new("anchor", 100, 100, 20, 20);
    let diagonal = ShelfItem::new("target", 300, 300, 20, 20);
    let overlapping = ShelfItem::new("target", 105, 95, 20, 20);

    group.bench_function("diagonal", |b| {
        b.iter(|| direction::resolve(black_box(&diagonal), black_box(&anchor)))
    });

    group.bench_function("overlapping", |b| {
        b.iter(|| direction::resolve(black_box(&overlapping), black_box(&anchor)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_name_matching,
    bench_shopping_list,
    bench_direction
);
criterion_main!(benches);
