use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use zxopt::circuit::Circuit;
use zxopt::extract::ToCircuit;
use zxopt::simplify::{clifford_simp, to_graph_like};
use zxopt::vec_graph::*;

fn simp_random_circuit(c: &mut Criterion) {
    let circuit = Circuit::random()
        .seed(1337)
        .qubits(16)
        .depth(400)
        .clifford_t(0.1)
        .build()
        .expect("random circuit");
    let g: Graph = circuit.to_graph().expect("translation");
    let mut gl = g.clone();
    to_graph_like(&mut gl).expect("graph-like");
    let mut simplified = gl.clone();
    clifford_simp(&mut simplified).expect("simplification");

    let mut group = c.benchmark_group("random_clifford_t");
    group.sample_size(10);

    group.bench_function("to_graph_like", |b| {
        b.iter_batched_ref(
            || g.clone(),
            |g1| to_graph_like(g1),
            BatchSize::LargeInput,
        )
    });

    group.bench_function("clifford_simp", |b| {
        b.iter_batched_ref(
            || gl.clone(),
            |g1| clifford_simp(g1),
            BatchSize::LargeInput,
        )
    });

    group.bench_function("extract", |b| {
        b.iter_batched_ref(
            || simplified.clone(),
            |g1| g1.into_circuit(),
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, simp_random_circuit);
criterion_main!(benches);
