use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::fs;

fn bench_parse_files(c: &mut Criterion) {
    let mathml_bytes = fs::read("tests/read/mathml.xml").unwrap();
    c.bench_function("mathml.xml - stream", |b| {
        b.iter(|| {
            let document = dom_builder::parse_stream(black_box(mathml_bytes.as_slice())).unwrap();
            black_box(document);
        });
    });

    // includes opening the file on every iteration
    c.bench_function("mathml.xml - path", |b| {
        b.iter(|| {
            let document = dom_builder::parse_path(black_box("tests/read/mathml.xml")).unwrap();
            black_box(document);
        });
    });

    // a wide, flat document to see how the tree building scales
    let mut wide = String::from("<m:math xmlns:m=\"http://www.w3.org/1998/Math/MathML\"><m:mrow>");
    for i in 0..5000 {
        wide.push_str(&format!("<m:mi mathvariant=\"normal\">x{}</m:mi><m:mo>+</m:mo>", i));
    }
    wide.push_str("</m:mrow></m:math>");

    c.bench_function("generated - 10k elements", |b| {
        b.iter(|| {
            let document = dom_builder::parse_bytes(black_box(wide.as_bytes())).unwrap();
            black_box(document);
        });
    });
}

criterion_group! {
    name = benches;
    // This can be any expression that returns a `Criterion` object.
    config = Criterion::default().significance_level(0.1).sample_size(500);
    targets = bench_parse_files
}
criterion_main!(benches);
