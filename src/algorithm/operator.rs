use nalgebra::DMatrix;
use ndarray::ArrayView1;

/// Build the discrete convolution operator of the baseline-corrected AIF.
///
/// The matrix discretizes the Volterra integral equation
/// `c(t) = integral aif(tau) * r(t - tau) dtau` under a piecewise-quadratic
/// (Simpson rule) interpolation between time samples, so that `A * r`
/// reproduces a tissue curve from a residue function `r`.
///
/// Row 0 is left at zero: the first output sample contributes no constraint.
/// Row `i` only references columns `0..=i`; the lower-triangular banded
/// structure reflects causality. The matrix depends solely on the AIF, never
/// on voxel data, so it is built once and shared across all voxel solves.
///
/// Requires `aif.len() >= 2` (the rule reads the second sample).
pub fn volterra_operator(aif: ArrayView1<f64>) -> DMatrix<f64> {
    let n = aif.len();
    let mut a = DMatrix::<f64>::zeros(n, n);

    for i in 1..n {
        a[(i, 0)] = (2.0 * aif[i] + aif[i - 1]) / 6.0;
        a[(i, i)] = (2.0 * aif[0] + aif[1]) / 6.0;
    }
    for i in 2..n {
        for j in 1..i {
            a[(i, j)] = (2.0 * aif[i - j] + aif[i - j - 1]) / 6.0
                + (2.0 * aif[i - j] + aif[i - j + 1]) / 6.0;
        }
    }

    a
}
