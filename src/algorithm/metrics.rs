use itertools::Itertools;
use ndarray::{Array2, Axis};

/// Scale from peak impulse response (1/s) to blood flow in ml/100ml/min.
const FLOW_SCALE: f64 = 6000.0;

/// Scale from impulse response area to blood volume in ml/100ml.
const VOLUME_SCALE: f64 = 100.0;

/// Reduce each voxel's impulse response to its three perfusion descriptors.
///
/// Flow is the peak of the impulse response, volume is its area, and the
/// mean transit time is their ratio (central volume theorem). A voxel whose
/// peak is exactly zero gets `epsilon` substituted in the MTT division only;
/// the reported flow keeps the true value, so a fully degenerate voxel maps
/// to zero flow, zero volume and a finite zero MTT instead of NaN.
///
/// # Arguments
/// * `impulse` - impulse responses, one row per voxel
/// * `dt` - time step in seconds
/// * `epsilon` - positive stand-in for a zero peak in the MTT division
///
/// # Returns
/// Per-voxel flow (ml/100ml/min), volume (ml/100ml) and MTT (s) vectors.
pub fn perfusion_metrics(
    impulse: &Array2<f64>,
    dt: f64,
    epsilon: f64,
) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    impulse
        .axis_iter(Axis(0))
        .map(|curve| {
            let peak = curve.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let area = dt * curve.sum();
            let denom = if peak == 0.0 { epsilon } else { peak };
            (peak * FLOW_SCALE, area * VOLUME_SCALE, area / denom)
        })
        .multiunzip()
}
