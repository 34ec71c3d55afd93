//! perfcore: voxel-wise perfusion parameters from dynamic contrast-enhanced
//! imaging, by model-free deconvolution against an arterial input function.
//!
//! # Modules
//! - `algorithm::preprocess`: hematocrit scaling and baseline removal
//! - `algorithm::operator`: discrete convolution operator of the AIF
//! - `algorithm::solver`: truncated-SVD pseudo-inverse and batched solve
//! - `algorithm::metrics`: flow, volume and mean transit time extraction
//! - `algorithm::deconv`: end-to-end pipeline entry point
//! - `data::maps`: perfusion map output container
//! - `error`: input validation errors

// data module
pub mod data {
    pub mod maps;
}

// algorithm module
pub mod algorithm {
    pub mod deconv;
    pub mod metrics;
    pub mod operator;
    pub mod preprocess;
    pub mod solver;
}

pub mod error;
