use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use chainlist_core::{Direction, List, ListConfig};

fn filled(size: usize) -> List<u64> {
    let mut list = List::with_config(ListConfig::seeded(17));
    list.append_all((0..size as u64).map(|i| i.wrapping_mul(0x9E37_79B9_7F4A_7C15)))
        .unwrap();
    list.set_comparator(|a, b| a.cmp(b));
    list
}

fn bench_positional(c: &mut Criterion) {
    let mut group = c.benchmark_group("positional");

    for size in [100usize, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("insert_delete_mid", size), &size, |b, &size| {
            let mut list = filled(size);
            let pos = size / 2;
            b.iter(|| {
                list.insert_at(black_box(pos), 7).unwrap();
                list.delete_at(black_box(pos)).unwrap()
            });
        });

        group.bench_with_input(BenchmarkId::new("get_three_quarters", size), &size, |b, &size| {
            let list = filled(size);
            b.iter(|| list.get(black_box(size * 3 / 4)).copied());
        });
    }

    group.finish();
}

fn bench_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort");

    for size in [24usize, 1_000, 10_000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut list = filled(size);
            let mut direction = Direction::Ascending;
            b.iter(|| {
                list.sort(direction).unwrap();
                direction = match direction {
                    Direction::Ascending => Direction::Descending,
                    Direction::Descending => Direction::Ascending,
                };
            });
        });
    }

    group.finish();
}

fn bench_dump(c: &mut Criterion) {
    let mut group = c.benchmark_group("dump");

    for size in [100usize, 10_000] {
        let mut list: List<Vec<u8>> = List::with_config(ListConfig::seeded(3));
        list.append_all((0..size).map(|i| format!("element-{:08}", i).into_bytes()))
            .unwrap();
        list.set_meter(|el| el.len());
        let dump = list.dump_to_bytes().unwrap();

        group.throughput(Throughput::Bytes(dump.len() as u64));
        group.bench_with_input(BenchmarkId::new("encode", size), &size, |b, _| {
            b.iter(|| list.dump_to_bytes().unwrap());
        });
        group.bench_with_input(BenchmarkId::new("restore", size), &dump, |b, data| {
            b.iter(|| {
                let mut target: List<Vec<u8>> = List::new();
                target.restore_from_bytes(black_box(data)).unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_positional, bench_sort, bench_dump);
criterion_main!(benches);
