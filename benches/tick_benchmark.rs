use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use dust_field::{FieldConfig, ParticleField};

fn field_at_cap() -> ParticleField {
    let mut config = FieldConfig::default();
    // Small divisor forces the count up to the cap.
    config.area_per_particle = 1.0;
    ParticleField::with_seed(config, 1920.0, 1080.0, 42)
}

fn tick_benchmark(c: &mut Criterion) {
    let mut field = field_at_cap();
    c.bench_function("advance_at_cap", |b| {
        b.iter(|| black_box(&mut field).advance(1.0))
    });

    let field = field_at_cap();
    c.bench_function("scene_with_links_at_cap", |b| {
        b.iter(|| black_box(field.scene()))
    });
}

criterion_group!(benches, tick_benchmark);
criterion_main!(benches);
