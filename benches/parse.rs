use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use mds_parser::{ComponentRegistry, Parser};

/// A document with `steps` steps, each carrying local metadata, a component
/// and a fenced block full of separator lookalikes.
fn generate_document(steps: usize) -> String {
    let mut out = String::from("```yaml @@\ntheme: dark\ntitle: Bench\n```\n\n");
    for i in 0..steps {
        out.push_str(&format!(
            "+++step-{i}\n\
             ```yaml @\n\
             order: {i}\n\
             tags: [a, b, c]\n\
             ```\n\n\
             # Step {i}\n\n\
             Some *emphasis* and a [link](https://example.com/{i}).\n\n\
             ```md card/featured\n\
             Card for step {i}.\n\
             ```\n\n\
             ```text\n\
             +++not-a-step\n\
             ```\n\n"
        ));
    }
    out
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    group.sample_size(10);

    let parser = Parser::with_components(ComponentRegistry::new().with("card"));
    for steps in [10, 100, 500] {
        let content = generate_document(steps);
        group.bench_with_input(BenchmarkId::from_parameter(steps), &content, |b, content| {
            b.iter(|| {
                let doc = parser.parse(std::hint::black_box(content));
                std::hint::black_box(doc)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
