use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use strand_codegen::Session;
use strand_syntax::{Node, NodeKind};
use strand_syntax::build::*;

fn countdown() -> Node {
    seq([
        assign("i", int(100)),
        while_loop(
            greater(ident("i"), int(0)),
            seq([
                if_else(
                    equal(rem(ident("i"), int(2)), int(0)),
                    print(ident("i")),
                    print(string("odd")),
                ),
                assign("i", sub(ident("i"), int(1))),
            ]),
        ),
    ])
}

fn bench_compile_simple(c: &mut Criterion) {
    let tree = print(mul(add(int(1), int(2)), int(3)));

    c.bench_function("compile_simple_expr", |b| {
        b.iter(|| {
            let mut session = Session::default();
            let _ = black_box(session.compile_program(black_box(&tree)));
        });
    });
}

fn bench_compile_control_flow(c: &mut Criterion) {
    let tree = countdown();

    c.bench_function("compile_control_flow", |b| {
        b.iter(|| {
            let mut session = Session::default();
            let _ = black_box(session.compile_program(black_box(&tree)));
        });
    });
}

fn bench_compile_many_statements(c: &mut Criterion) {
    let tree = seq((0..500).map(|i| {
        let name = format!("v{}", i % 50);
        assign(name, add(int(i), cast(NodeKind::CastInt, not(less(int(i), int(250))))))
    }));

    c.bench_function("compile_500_statements", |b| {
        b.iter(|| {
            let mut session = Session::default();
            let _ = black_box(session.compile_program(black_box(&tree)));
        });
    });
}

fn bench_compile_tasks(c: &mut Criterion) {
    let tree = seq((0..20).map(|i| multitask_inline(format!("Task{i}"), countdown())));

    c.bench_function("compile_20_inline_tasks", |b| {
        b.iter(|| {
            let mut session = Session::default();
            let _ = black_box(session.compile_program(black_box(&tree)));
        });
    });
}

criterion_group!(
    benches,
    bench_compile_simple,
    bench_compile_control_flow,
    bench_compile_many_statements,
    bench_compile_tasks
);
criterion_main!(benches);
