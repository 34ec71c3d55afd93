use ndarray::Array3;
use serde::{Deserialize, Serialize};

/// Perfusion parameter maps produced by the model-free deconvolution.
///
/// All three maps share the spatial shape (x, y, z) of the input volume.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PerfusionMaps {
    /// Blood flow in ml/100ml/min
    pub flow: Array3<f32>,
    /// Blood volume in ml/100ml
    pub volume: Array3<f32>,
    /// Mean transit time in seconds
    pub mtt: Array3<f32>,
}

impl PerfusionMaps {
    pub fn new(flow: Array3<f32>, volume: Array3<f32>, mtt: Array3<f32>) -> Self {
        PerfusionMaps { flow, volume, mtt }
    }

    /// Spatial shape (x, y, z) shared by the three maps.
    pub fn dim(&self) -> (usize, usize, usize) {
        self.flow.dim()
    }
}
