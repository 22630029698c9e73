use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use strata_compiler::Compiler;
use strata_xmir::XmlProgram;

/// Nested additions `local1 + (local1 + (... + 1))`
fn nested_add(depth: usize) -> String {
    let mut body = String::from(r#"<o base="int" data="bytes">00 00 00 00 00 00 00 01</o>"#);
    for _ in 0..depth {
        body = format!(
            r#"<o base=".plus" scope="type=int"><o base="local1"/>{}</o>"#,
            body
        );
    }
    body
}

fn program(methods: usize, depth: usize) -> String {
    let mut out = String::from(
        r#"<program name="bench"><objects><o base="class" name="Bench" access="33">"#,
    );
    for i in 0..methods {
        out.push_str(&format!(
            r#"<o base="method" name="m{}" access="1" descriptor="(I)I"><o base="seq" name="@">{}<o base="opcode" name="IRETURN"/></o></o>"#,
            i,
            nested_add(depth)
        ));
    }
    out.push_str("</o></objects></program>");
    out
}

fn bench_methods(c: &mut Criterion) {
    let mut group = c.benchmark_group("methods");
    let compiler = Compiler::default();

    for count in [1usize, 10, 100] {
        let source = program(count, 8);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("compile_str", count), &source, |b, source| {
            b.iter(|| compiler.compile_str(black_box(source)).unwrap());
        });
    }

    group.finish();
}

fn bench_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("depth");
    let compiler = Compiler::default();

    for depth in [4usize, 32, 128] {
        let program = XmlProgram::parse(&program(1, depth)).unwrap();
        group.bench_with_input(BenchmarkId::new("compile", depth), &program, |b, program| {
            b.iter(|| compiler.compile(black_box(program)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_methods, bench_depth);
criterion_main!(benches);
