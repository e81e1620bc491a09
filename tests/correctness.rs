use approx::assert_relative_eq;
use rand::distributions::Standard;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use mmbench::blocked::tiled::matmul_blocked_tiled;
use mmbench::matrix::naive_ikj::matmul_naive_ikj;
use mmbench::matrix::transposed::matmul_transposed_dot;
use mmbench::{
    BenchError, DenseMatrix, SparseCsr, blocked, generate_dense, generate_sparse_csr, naive,
    parallel_mul, spmm_csr_dense, transposed,
};

const SEED_A: u64 = 403086;
const SEED_B: u64 = 403087;

fn assert_matrices_close(expected: &DenseMatrix, actual: &DenseMatrix, name: &str) {
    assert_eq!(expected.n(), actual.n(), "{}: dimension mismatch", name);
    let diff = expected.max_relative_diff(actual).unwrap();
    assert!(diff < 1e-9, "{}: max relative difference {}", name, diff);
}

// ============================================================
// Generator
// ============================================================

#[test]
fn test_dense_generation_is_deterministic() {
    for n in [1, 4, 17, 64] {
        let first = generate_dense(n, SEED_A);
        let second = generate_dense(n, SEED_A);
        let bits = |m: &DenseMatrix| m.as_slice().iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&first), bits(&second), "n = {}", n);
    }
}

#[test]
fn test_dense_values_in_unit_interval() {
    let m = generate_dense(32, SEED_A);
    assert!(m.as_slice().iter().all(|&x| (0.0..1.0).contains(&x)));
}

#[test]
fn test_neighbouring_seeds_differ() {
    let a = generate_dense(8, SEED_A);
    let b = generate_dense(8, SEED_B);
    assert_ne!(a, b);
}

#[test]
fn test_sparse_10x10_density_0_1() {
    let csr = generate_sparse_csr(10, 0.1, SEED_A).unwrap();
    // floor(10 * 10 * 0.1) = 10, one per row
    assert!((9..=11).contains(&csr.nnz()), "nnz = {}", csr.nnz());
    assert_eq!(csr.row_ptr().len(), 11);
    assert_eq!(csr.row_ptr()[0], 0);
    assert_eq!(csr.row_ptr()[10], csr.col_idx().len());
    assert_eq!(csr.col_idx().len(), csr.vals().len());
    csr.validate().unwrap();
}

#[test]
fn test_sparse_generation_is_deterministic() {
    let first = generate_sparse_csr(50, 0.07, SEED_A).unwrap();
    let second = generate_sparse_csr(50, 0.07, SEED_A).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_sparse_rows_within_one_of_target() {
    let (n, density) = (40, 0.13);
    let csr = generate_sparse_csr(n, density, SEED_A).unwrap();
    let per_row = (n as f64 * n as f64 * density) as usize / n;
    for i in 0..n {
        let count = csr.row(i).0.len();
        assert!(
            count == per_row || count == per_row + 1,
            "row {} has {} entries, target {}",
            i,
            count,
            per_row
        );
    }
}

// ============================================================
// Hand-computed reference
// ============================================================

#[test]
fn test_4x4_matches_hand_reference() {
    let draw16 = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..16).map(|_| rng.sample(Standard)).collect::<Vec<f64>>()
    };
    let a_vals = draw16(SEED_A);
    let b_vals = draw16(SEED_B);

    // Textbook i-j-k over the raw draws
    let mut expected = [0.0f64; 16];
    for i in 0..4 {
        for j in 0..4 {
            for p in 0..4 {
                expected[i * 4 + j] += a_vals[i * 4 + p] * b_vals[p * 4 + j];
            }
        }
    }

    let a = generate_dense(4, SEED_A);
    let b = generate_dense(4, SEED_B);
    assert_eq!(a.as_slice(), a_vals.as_slice());
    assert_eq!(b.as_slice(), b_vals.as_slice());

    let c = naive(&a, &b).unwrap();
    for (got, want) in c.as_slice().iter().zip(expected) {
        assert_relative_eq!(*got, want, max_relative = 1e-12);
    }
}

#[test]
fn test_2x2_multiply() {
    let a = DenseMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    let b = DenseMatrix::from_rows(&[vec![5.0, 6.0], vec![7.0, 8.0]]).unwrap();
    let expected = vec![19.0, 22.0, 43.0, 50.0];

    assert_eq!(naive(&a, &b).unwrap().into_vec(), expected);
    assert_eq!(transposed(&a, &b).unwrap().into_vec(), expected);
    assert_eq!(blocked(&a, &b, 1).unwrap().into_vec(), expected);
    assert_eq!(parallel_mul(&a, &b, 2).unwrap().into_vec(), expected);
}

// ============================================================
// Kernel agreement
// ============================================================

#[test]
fn test_transposed_matches_naive() {
    for n in [1, 2, 3, 7, 16, 33, 64] {
        let a = generate_dense(n, SEED_A);
        let b = generate_dense(n, SEED_B);
        assert_matrices_close(
            &naive(&a, &b).unwrap(),
            &transposed(&a, &b).unwrap(),
            &format!("transposed_n_{}", n),
        );
    }
}

#[test]
fn test_tile_boundaries() {
    for n in [1, 5, 15, 16, 17, 31, 33] {
        let a = generate_dense(n, SEED_A);
        let b = generate_dense(n, SEED_B);
        let reference = naive(&a, &b).unwrap();

        for bs in [1, 2, 8, n, n + 1, 2 * n] {
            assert_matrices_close(
                &reference,
                &blocked(&a, &b, bs).unwrap(),
                &format!("blocked_n_{}_bs_{}", n, bs),
            );
        }
    }
}

#[test]
fn test_default_block_size_on_larger_matrix() {
    let n = 150;
    let a = generate_dense(n, SEED_A);
    let b = generate_dense(n, SEED_B);
    assert_matrices_close(
        &naive(&a, &b).unwrap(),
        &blocked(&a, &b, mmbench::blocked::DEFAULT_BLOCK_SIZE).unwrap(),
        "blocked_default",
    );
}

#[test]
fn test_sparse_matches_naive_on_expanded_matrix() {
    for (n, density) in [(8, 0.25), (20, 0.05), (33, 0.5), (12, 1.0)] {
        let a = generate_sparse_csr(n, density, SEED_A).unwrap();
        let b = generate_dense(n, SEED_B);
        assert_matrices_close(
            &naive(&a.to_dense(), &b).unwrap(),
            &spmm_csr_dense(&a, &b).unwrap(),
            &format!("sparse_n_{}_d_{}", n, density),
        );
    }
}

#[test]
fn test_sparse_with_no_entries_is_zero() {
    let n = 9;
    let a = SparseCsr::empty(n);
    let b = generate_dense(n, SEED_B);
    let c = spmm_csr_dense(&a, &b).unwrap();
    assert_eq!(c.n(), n);
    assert!(c.as_slice().iter().all(|&x| x == 0.0));
}

// ============================================================
// Parallel kernel
// ============================================================

#[test]
fn test_parallel_matches_naive() {
    for n in [1, 3, 10, 32] {
        let a = generate_dense(n, SEED_A);
        let b = generate_dense(n, SEED_B);
        let reference = naive(&a, &b).unwrap();

        for p in 1..=2 * n {
            assert_matrices_close(
                &reference,
                &parallel_mul(&a, &b, p).unwrap(),
                &format!("parallel_n_{}_p_{}", n, p),
            );
        }
    }
}

#[test]
fn test_parallel_zero_workers_rejected() {
    let a = generate_dense(4, SEED_A);
    assert!(matches!(
        parallel_mul(&a, &a, 0),
        Err(BenchError::InvalidParameter { .. })
    ));
}

// ============================================================
// Error paths
// ============================================================

#[test]
fn test_mismatched_dimensions() {
    let a = generate_dense(4, SEED_A);
    let b = generate_dense(5, SEED_B);

    for result in [
        naive(&a, &b),
        transposed(&a, &b),
        blocked(&a, &b, 2),
        parallel_mul(&a, &b, 2),
    ] {
        assert!(matches!(
            result,
            Err(BenchError::InvalidDimension { left: 4, right: 5 })
        ));
    }

    let s = generate_sparse_csr(4, 0.5, SEED_A).unwrap();
    assert!(matches!(
        spmm_csr_dense(&s, &b),
        Err(BenchError::InvalidDimension { .. })
    ));
}

#[test]
fn test_zero_block_size_rejected() {
    let a = generate_dense(4, SEED_A);
    assert!(matches!(
        blocked(&a, &a, 0),
        Err(BenchError::InvalidParameter { name: "block_size", .. })
    ));
}

#[test]
fn test_malformed_csr_rejected() {
    // row 0 lists column 2 twice
    let bad = SparseCsr::from_parts(3, vec![0, 2, 2, 2], vec![2, 2], vec![1.0, 1.0]);
    assert!(matches!(bad, Err(BenchError::MalformedSparse(_))));

    let short = SparseCsr::from_parts(3, vec![0, 1], vec![0], vec![1.0]);
    assert!(matches!(short, Err(BenchError::MalformedSparse(_))));
}

// ============================================================
// Slice kernels
// ============================================================

#[test]
fn test_slice_kernels_on_2x3_times_3x2() {
    let a = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]; // 2x3
    let b = vec![7.0, 8.0, 9.0, 10.0, 11.0, 12.0]; // 3x2
    let bt = vec![7.0, 9.0, 11.0, 8.0, 10.0, 12.0]; // 2x3

    let mut c_ikj = vec![0.0; 4];
    let mut c_dot = vec![0.0; 4];
    matmul_naive_ikj(&a, &b, &mut c_ikj, 2, 2, 3);
    matmul_transposed_dot(&a, &bt, &mut c_dot, 2, 2, 3);

    assert_eq!(c_ikj, vec![58.0, 64.0, 139.0, 154.0]);
    assert_eq!(c_dot, c_ikj);
}

#[test]
fn test_tiled_accumulates() {
    let n = 12;
    let a = generate_dense(n, SEED_A);
    let b = generate_dense(n, SEED_B);

    let mut c = vec![5.0; n * n];
    matmul_blocked_tiled(a.as_slice(), b.as_slice(), &mut c, n, 5);

    let product = naive(&a, &b).unwrap();
    for (got, want) in c.iter().zip(product.as_slice()) {
        assert_relative_eq!(*got, want + 5.0, max_relative = 1e-9);
    }
}

#[test]
fn test_inputs_untouched() {
    let a = generate_dense(16, SEED_A);
    let b = generate_dense(16, SEED_B);
    let (a0, b0) = (a.clone(), b.clone());

    naive(&a, &b).unwrap();
    transposed(&a, &b).unwrap();
    blocked(&a, &b, 4).unwrap();
    parallel_mul(&a, &b, 3).unwrap();

    assert_eq!(a, a0);
    assert_eq!(b, b0);
}
