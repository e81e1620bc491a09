use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use mmbench::blocked::DEFAULT_BLOCK_SIZE;
use mmbench::{
    blocked, generate_dense, generate_sparse_csr, naive, parallel_mul, spmm_csr_dense, transposed,
};

const SEED: u64 = 403086;

fn bench_kernels(c: &mut Criterion) {
    let mut group = c.benchmark_group("matmul");
    group.sample_size(10);

    for &n in &[64usize, 128, 256] {
        let a = generate_dense(n, SEED);
        let b = generate_dense(n, SEED + 1);
        let sparse = generate_sparse_csr(n, 0.05, SEED).expect("valid density");
        group.throughput(Throughput::Elements((n * n * n) as u64));

        group.bench_with_input(BenchmarkId::new("naive", n), &n, |bench, _| {
            bench.iter(|| naive(black_box(&a), black_box(&b)))
        });
        group.bench_with_input(BenchmarkId::new("transposed", n), &n, |bench, _| {
            bench.iter(|| transposed(black_box(&a), black_box(&b)))
        });
        group.bench_with_input(BenchmarkId::new("blocked", n), &n, |bench, _| {
            bench.iter(|| blocked(black_box(&a), black_box(&b), DEFAULT_BLOCK_SIZE))
        });
        group.bench_with_input(BenchmarkId::new("sparse", n), &n, |bench, _| {
            bench.iter(|| spmm_csr_dense(black_box(&sparse), black_box(&b)))
        });
        group.bench_with_input(BenchmarkId::new("parallel_4", n), &n, |bench, _| {
            bench.iter(|| parallel_mul(black_box(&a), black_box(&b), 4))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_kernels);
criterion_main!(benches);
