use ndarray::{Array1, Array2, Array3, Array4};
use serde::{Deserialize, Serialize};

use crate::algorithm::{metrics, operator, preprocess, solver};
use crate::data::maps::PerfusionMaps;
use crate::error::PerfusionError;

/// Configuration for the model-free deconvolution
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeconvolutionConfig {
    /// Number of leading baseline frames (default: 1)
    pub n_offset: usize,
    /// Hematocrit used to convert the whole-blood AIF to plasma (default: 0.45)
    pub hct: f64,
    /// Stand-in for an exactly zero flow in the MTT division (default: 1e-12)
    pub epsilon: f64,
    /// Relative singular-value cutoff of the regularized inverse (default: 0.15)
    pub sv_cutoff: f64,
    /// Threads for the per-voxel solve; 0 uses the rayon default (default: 0)
    pub num_threads: usize,
}

impl Default for DeconvolutionConfig {
    fn default() -> Self {
        DeconvolutionConfig {
            n_offset: 1,
            hct: 0.45,
            epsilon: 1e-12,
            sv_cutoff: 0.15,
            num_threads: 0,
        }
    }
}

/// Model-free (non-parametric) deconvolution of a dynamic contrast-enhanced
/// volume against an arterial input function.
///
/// Runs the full pipeline: baseline correction of data and AIF, construction
/// of the AIF convolution operator, regularized inversion shared across all
/// voxels, and reduction of the per-voxel impulse responses to perfusion
/// maps. The operator and its pseudo-inverse are computed in f64 regardless
/// of the f32 storage precision, since the conditioning of the inverse
/// problem is sensitive to the working precision.
///
/// # Arguments
/// * `data` - contrast concentration over time, axes (x, y, z, time)
/// * `aif` - arterial input function, one sample per time point
/// * `dt_ms` - time between frames in milliseconds
/// * `config` - baseline, hematocrit, regularization and threading knobs
///
/// # Returns
/// Flow (ml/100ml/min), volume (ml/100ml) and mean transit time (s) maps
/// over (x, y, z), or a validation error. An AIF that is rank-deficient
/// beyond the cutoff produces all-zero flow and volume maps rather than an
/// error.
pub fn modelfree_deconv(
    data: &Array4<f32>,
    aif: &Array1<f64>,
    dt_ms: f64,
    config: &DeconvolutionConfig,
) -> Result<PerfusionMaps, PerfusionError> {
    let (nx, ny, nz, nt) = data.dim();
    validate(aif.len(), nt, dt_ms, config)?;

    let dt = dt_ms / 1000.0;
    let num_voxels = nx * ny * nz;

    // Voxel-major working copy in f64; each row is one voxel's time curve.
    // The input layout is (x, y, z, time), so a row-major flatten puts the
    // time axis contiguous per voxel.
    let standard = data.as_standard_layout();
    let curves = Array2::from_shape_vec(
        (num_voxels, nt),
        standard.iter().map(|&v| v as f64).collect(),
    )
    .unwrap();

    let aif_plasma = preprocess::to_plasma(aif, config.hct);
    let aif_corrected = preprocess::remove_baseline_aif(&aif_plasma, config.n_offset);
    let curves_corrected = preprocess::remove_baseline(&curves, config.n_offset);

    let a = operator::volterra_operator(aif_corrected.view());
    let a_inv = solver::truncated_pseudo_inverse(a, config.sv_cutoff);
    let impulse =
        solver::solve_impulse_responses(&a_inv, &curves_corrected, dt, config.num_threads);

    let (flow, volume, mtt) = metrics::perfusion_metrics(&impulse, dt, config.epsilon);

    let shape = (nx, ny, nz);
    Ok(PerfusionMaps::new(
        to_map(flow, shape),
        to_map(volume, shape),
        to_map(mtt, shape),
    ))
}

fn validate(
    aif_len: usize,
    time_extent: usize,
    dt_ms: f64,
    config: &DeconvolutionConfig,
) -> Result<(), PerfusionError> {
    if aif_len != time_extent {
        return Err(PerfusionError::ShapeMismatch { aif_len, time_extent });
    }
    if !dt_ms.is_finite() || dt_ms <= 0.0 {
        return Err(PerfusionError::invalid_parameter(format!(
            "dt must be a positive number of milliseconds, got {dt_ms}"
        )));
    }
    if config.n_offset < 1 {
        return Err(PerfusionError::invalid_parameter(
            "n_offset must be at least 1",
        ));
    }
    // The operator reads the second corrected AIF sample, so at least two
    // usable time points must remain after baseline removal
    if time_extent.saturating_sub(config.n_offset) < 2 {
        return Err(PerfusionError::invalid_parameter(format!(
            "n_offset {} leaves fewer than 2 of {} time points",
            config.n_offset, time_extent
        )));
    }
    if !(0.0..1.0).contains(&config.hct) {
        return Err(PerfusionError::invalid_parameter(format!(
            "hct must lie in [0, 1), got {}",
            config.hct
        )));
    }
    if !config.epsilon.is_finite() || config.epsilon <= 0.0 {
        return Err(PerfusionError::invalid_parameter(format!(
            "epsilon must be a small positive number, got {}",
            config.epsilon
        )));
    }
    if !config.sv_cutoff.is_finite() || config.sv_cutoff < 0.0 {
        return Err(PerfusionError::invalid_parameter(format!(
            "singular-value cutoff must be non-negative, got {}",
            config.sv_cutoff
        )));
    }
    Ok(())
}

fn to_map(values: Vec<f64>, shape: (usize, usize, usize)) -> Array3<f32> {
    let narrowed: Vec<f32> = values.into_iter().map(|v| v as f32).collect();
    Array3::from_shape_vec(shape, narrowed).unwrap()
}
