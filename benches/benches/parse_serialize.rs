//! Benchmark: build, serialize and decode throughput.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use lumen_ir::document;
use lumen_parse::Variant;

const UNIT: &str = r#"
import { scale } from "./math";

export function render(items, options = {}) {
  const out = [];
  for (let i = 0; i < items.length; i++) {
    const item = items[i];
    if (item.hidden) continue;
    out.push(`${item.name}: ${scale(item.value, options.factor ?? 2)}`);
  }
  return out.join("\n");
}
"#;

/// Source made of `units` copies of a small module body.
fn source(units: usize) -> String {
    UNIT.repeat(units).replace("export function render", "function render")
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for units in [1, 16, 256] {
        let text = source(units);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(units), &text, |b, text| {
            b.iter(|| lumen_parse::parse(black_box(text), Variant::Script))
        });
    }
    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let arena = lumen_parse::parse(&source(64), Variant::Script).expect("bench source parses");
    let bytes = document::to_canonical_bytes(&arena);

    let mut group = c.benchmark_group("document");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("to_canonical_bytes", |b| {
        b.iter(|| document::to_canonical_bytes(black_box(&arena)))
    });
    group.bench_function("from_slice", |b| b.iter(|| document::from_slice(black_box(&bytes))));
    group.finish();
}

fn bench_boundary(c: &mut Criterion) {
    let text = source(16);
    c.bench_function("boundary_parse_release", |b| {
        b.iter(|| {
            if let Some(buffer) = lumen_boundary::parse(black_box(text.as_bytes()), Variant::Script) {
                lumen_boundary::release(buffer);
            }
        })
    });
}

criterion_group!(benches, bench_parse, bench_serialize, bench_boundary);
criterion_main!(benches);
