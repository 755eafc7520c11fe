use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use marionette_rig_core::{parse_stored_rig_json, ParamValues};

fn bench_set_parameters(c: &mut Criterion) {
    let json = marionette_test_fixtures::rigs::json("face").expect("load face fixture");
    let mut model = parse_stored_rig_json(&json).expect("parse face rig");

    let mut values = ParamValues::default();
    values.insert("head-tilt".to_string(), 10.0);
    values.insert("mouth-open".to_string(), 0.5);
    values.insert("eye-blink".to_string(), 0.0);

    c.bench_function("rig_set_parameters", |b| {
        b.iter(|| {
            let report = model.set_parameters(black_box(&values));
            assert!(report.is_ok());
        })
    });
}

criterion_group!(benches, bench_set_parameters);
criterion_main!(benches);
