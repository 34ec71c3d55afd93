use nalgebra::{DMatrix, DVector};
use ndarray::parallel::prelude::*;
use ndarray::{Array2, Axis};
use rayon::ThreadPoolBuilder;

/// Truncated-SVD pseudo-inverse of the convolution operator.
///
/// Singular values at or below `rel_cutoff` times the largest singular value
/// are treated as zero when forming the inverse; this truncation is the
/// regularization that keeps the ill-conditioned deconvolution from
/// amplifying noise.
///
/// A numerically degenerate operator (for example one built from an all-zero
/// AIF) has every singular value truncated and the result is the zero
/// matrix. Downstream this yields an all-zero impulse response and zero
/// flow and volume maps rather than an error; callers that need to
/// distinguish this case must inspect the output.
pub fn truncated_pseudo_inverse(a: DMatrix<f64>, rel_cutoff: f64) -> DMatrix<f64> {
    let svd = a.svd(true, true);
    let cutoff = rel_cutoff * svd.singular_values.max();
    // cutoff is validated non-negative upstream, so this cannot fail
    svd.pseudo_inverse(cutoff).unwrap()
}

/// Apply the regularized inverse to every voxel curve at once.
///
/// Each row of `curves` is an independent right-hand side of the shared
/// linear system, so the batch is data-parallel with no synchronization:
/// the scaled inverse is read-only and no voxel's result depends on
/// another's. Rows are solved on a dedicated rayon pool.
///
/// # Arguments
/// * `a_inv` - regularized pseudo-inverse of the convolution operator
/// * `curves` - baseline-corrected voxel curves, one row per voxel
/// * `dt` - time step in seconds; the inverse is scaled by `1/dt`
/// * `num_threads` - pool size, 0 for the rayon default
///
/// # Returns
/// Impulse responses with the same shape as `curves`.
pub fn solve_impulse_responses(
    a_inv: &DMatrix<f64>,
    curves: &Array2<f64>,
    dt: f64,
    num_threads: usize,
) -> Array2<f64> {
    let (num_voxels, n) = curves.dim();
    debug_assert_eq!(n, a_inv.ncols());

    let scaled = a_inv * (1.0 / dt);

    let pool = ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .unwrap();

    let rows: Vec<Vec<f64>> = pool.install(|| {
        curves
            .axis_iter(Axis(0))
            .into_par_iter()
            .map(|curve| {
                let rhs = DVector::from_iterator(n, curve.iter().copied());
                let response = &scaled * rhs;
                response.iter().copied().collect()
            })
            .collect()
    });

    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((num_voxels, n), flat).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::dmatrix;
    use ndarray::arr2;

    #[test]
    fn test_pseudo_inverse_recovers_solution() {
        let a = dmatrix![2.0, 0.0; 1.0, 3.0];
        let x = DVector::from_vec(vec![1.0, 2.0]);
        let b = &a * &x;

        // Well-conditioned system, negligible cutoff: plain inverse
        let a_inv = truncated_pseudo_inverse(a, 1e-12);
        let recovered = &a_inv * b;

        assert!((recovered[0] - x[0]).abs() < 1e-10);
        assert!((recovered[1] - x[1]).abs() < 1e-10);
    }

    #[test]
    fn test_pseudo_inverse_degenerate_is_zero() {
        let a = DMatrix::<f64>::zeros(3, 3);
        let a_inv = truncated_pseudo_inverse(a, 0.15);

        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(a_inv[(i, j)], 0.0);
            }
        }
    }

    #[test]
    fn test_solve_scales_by_inverse_dt() {
        let a_inv = DMatrix::<f64>::identity(3, 3);
        let curves = arr2(&[[2.0, 4.0, 6.0]]);

        let impulse = solve_impulse_responses(&a_inv, &curves, 2.0, 1);

        assert!((impulse[[0, 0]] - 1.0).abs() < 1e-12);
        assert!((impulse[[0, 1]] - 2.0).abs() < 1e-12);
        assert!((impulse[[0, 2]] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_solve_thread_count_invariant() {
        let a_inv = dmatrix![0.5, 0.0, 0.0; 0.25, 0.5, 0.0; 0.1, 0.25, 0.5];
        let curves = arr2(&[
            [1.0, 2.0, 3.0],
            [0.0, -1.0, 4.0],
            [5.0, 5.0, 5.0],
            [0.0, 0.0, 0.0],
        ]);

        let serial = solve_impulse_responses(&a_inv, &curves, 1.5, 1);
        let parallel = solve_impulse_responses(&a_inv, &curves, 1.5, 4);

        assert_eq!(serial.dim(), (4, 3));
        for (s, p) in serial.iter().zip(parallel.iter()) {
            assert_eq!(s, p);
        }
    }
}
