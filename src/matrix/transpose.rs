/// Transpose a matrix: dst = src^T
///
/// Converts from row-major (rows × cols) to row-major (cols × rows).
/// After transpose, what was column j of src becomes row j of dst.
///
/// # Example
///
/// ```
/// use mmbench::matrix::transpose::transpose;
///
/// let src = vec![1.0, 2.0, 3.0,   // 2×3 matrix
///                4.0, 5.0, 6.0];
/// let mut dst = vec![0.0; 6];      // will be 3×2
///
/// transpose(&src, &mut dst, 2, 3);
///
/// assert_eq!(dst, vec![1.0, 4.0,   // 3×2 matrix
///                      2.0, 5.0,
///                      3.0, 6.0]);
/// ```
///
/// # Panics
///
/// Panics if either slice is shorter than `rows * cols`.
pub fn transpose(src: &[f64], dst: &mut [f64], rows: usize, cols: usize) {
    assert!(src.len() >= rows * cols, "src shorter than {rows}x{cols}");
    assert!(dst.len() >= rows * cols, "dst shorter than {cols}x{rows}");
    for i in 0..rows {
        for j in 0..cols {
            dst[j * rows + i] = src[i * cols + j];
        }
    }
}
