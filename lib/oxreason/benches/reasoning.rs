#![allow(clippy::panic)]

use codspeed_criterion_compat::{
    BenchmarkId, Criterion, Throughput, criterion_group, criterion_main,
};
use oxreason::{
    Characteristic, KnowledgeModel, Property, Reasoner, Resource, Validator, ValidatorConfig,
};
use std::hint::black_box;

fn ex(name: &str) -> Resource {
    Resource::named(format!("http://example.org/{name}"))
        .unwrap_or_else(|e| panic!("invalid benchmark IRI: {e}"))
}

/// A class chain, facts typed with its most specific class and a transitive chain between them.
fn chain_model(size: usize) -> KnowledgeModel {
    let mut model = KnowledgeModel::new();
    for i in 1..size {
        model
            .classes_mut()
            .add_sub_class_of(&ex(&format!("C{}", i - 1)), &ex(&format!("C{i}")));
    }
    let part_of = ex("partOf");
    let has_part = ex("hasPart");
    let properties = model.properties_mut();
    properties.declare_property(
        Property::object(part_of.clone()).with_characteristic(Characteristic::Transitive),
    );
    properties.declare_property(Property::object(has_part.clone()));
    properties.add_inverse_of(&part_of, &has_part);
    for i in 0..size {
        let fact = ex(&format!("f{i}"));
        model.data_mut().declare_fact(fact.clone());
        model.add_class_type(&fact, &ex("C0"));
        if i > 0 {
            model.add_assertion(&ex(&format!("f{}", i - 1)), &part_of, &fact);
        }
    }
    model
}

fn reasoning(c: &mut Criterion) {
    let mut group = c.benchmark_group("reasoning");
    group.sample_size(10);
    for size in [10, 50, 100] {
        let model = chain_model(size);
        group.throughput(Throughput::Elements(model.entry_count() as u64));
        group.bench_with_input(BenchmarkId::new("chain", size), &model, |b, model| {
            let reasoner = Reasoner::new();
            b.iter(|| {
                let mut model = model.clone();
                black_box(reasoner.apply(&mut model));
            })
        });
    }
    group.finish();
}

fn validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation");
    group.sample_size(10);
    for size in [10, 50, 100] {
        let mut model = chain_model(size);
        Reasoner::new().apply(&mut model);
        group.throughput(Throughput::Elements(model.entry_count() as u64));
        group.bench_with_input(BenchmarkId::new("parallel", size), &model, |b, model| {
            let validator = Validator::new();
            b.iter(|| black_box(validator.analyze(model)))
        });
        group.bench_with_input(BenchmarkId::new("sequential", size), &model, |b, model| {
            let validator = Validator::with_config(ValidatorConfig {
                parallel: false,
                ..ValidatorConfig::default()
            });
            b.iter(|| black_box(validator.analyze(model)))
        });
    }
    group.finish();
}

criterion_group!(benches, reasoning, validation);
criterion_main!(benches);
