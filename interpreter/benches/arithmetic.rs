use botka_core::Scanner;
use botka_script::{ExtraContext, Interpreter, Parser};
use criterion::{criterion_group, criterion_main, Criterion};

fn benchmark(c: &mut Criterion) {
    let src = include_str!("../tests/scripts/arithmetic.botka");
    let tokens: Vec<_> = Scanner::new().scan_tokens(src).collect();
    let expr = Parser::new(&tokens).parse().unwrap();
    let extra = ExtraContext::new();

    c.bench_function("scan and parse arithmetic", |b| {
        b.iter(|| {
            let tokens: Vec<_> = Scanner::new().scan_tokens(src).collect();
            Parser::new(&tokens).parse().unwrap();
        })
    });

    c.bench_function("evaluate arithmetic", |b| {
        b.iter(|| {
            let mut interpreter = Interpreter::new(&extra);
            interpreter.interpret(&expr).unwrap();
        })
    });
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
