use ndarray::{s, Array1, Array2, Axis};

/// Convert a whole-blood AIF to plasma concentration.
///
/// Contrast agent is confined to plasma, so the measured whole-blood
/// concentration is divided by (1 - hct).
pub fn to_plasma(aif: &Array1<f64>, hct: f64) -> Array1<f64> {
    aif.mapv(|c| c / (1.0 - hct))
}

/// Remove the baseline bias from a batch of voxel time curves.
///
/// The mean of the first `n_offset` samples of each row defines that row's
/// zero level; it is subtracted from every sample, and the baseline samples
/// are dropped since they carry no information beyond having set the zero.
///
/// # Arguments
/// * `curves` - one row per voxel, one column per time point
/// * `n_offset` - number of leading baseline samples, 1 <= n_offset < columns
///
/// # Returns
/// Corrected curves with `n_offset` fewer columns.
pub fn remove_baseline(curves: &Array2<f64>, n_offset: usize) -> Array2<f64> {
    let baseline = curves
        .slice(s![.., ..n_offset])
        .mean_axis(Axis(1))
        .unwrap();
    let mut corrected = curves.slice(s![.., n_offset..]).to_owned();
    corrected -= &baseline.insert_axis(Axis(1));
    corrected
}

/// Scalar variant of [`remove_baseline`] for the AIF.
pub fn remove_baseline_aif(aif: &Array1<f64>, n_offset: usize) -> Array1<f64> {
    let baseline = aif.slice(s![..n_offset]).mean().unwrap();
    aif.slice(s![n_offset..]).mapv(|c| c - baseline)
}
