use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use formbind::domain::accessor;
use formbind::{FieldConfig, FormSession, FormSettings, Path};
use serde_json::{json, Value};

fn build_form(fields: usize) -> FormSession {
    let mut form = FormSession::new(json!({"flag": true}), &FormSettings::default());
    for i in 0..fields {
        let config = FieldConfig::new(Path::key("rows").push_index(i).push_key("name"))
            .required(true)
            .hidden_when(|item| !item["flag"].as_bool().unwrap_or(false));
        form.mount(config);
    }
    form.update();
    form
}

fn benchmark_update_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_cycle");
    for fields in [10usize, 100, 500] {
        let mut form = build_form(fields);
        let flag = form.mount(FieldConfig::new(Path::key("flag")));
        form.update();

        group.bench_with_input(BenchmarkId::from_parameter(fields), &fields, |b, _| {
            let mut on = true;
            b.iter(|| {
                on = !on;
                form.set_value(flag, json!(on));
                black_box(form.flush())
            });
        });
    }
    group.finish();
}

fn benchmark_render_only(c: &mut Criterion) {
    let form = build_form(100);
    c.bench_function("render_100_fields", |b| b.iter(|| black_box(form.render())));
}

fn benchmark_accessor(c: &mut Criterion) {
    let path = Path::parse("a.b.c.3.d").unwrap_or_else(|_| Path::key("a"));
    c.bench_function("accessor_set_get", |b| {
        b.iter(|| {
            let mut item = Value::Null;
            accessor::set(&mut item, &path, json!("x"));
            black_box(accessor::get(&item, &path).cloned())
        });
    });
}

criterion_group!(benches, benchmark_update_cycle, benchmark_render_only, benchmark_accessor);
criterion_main!(benches);
