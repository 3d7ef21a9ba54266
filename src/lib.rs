//! Noisy image dataset generation - library crate.
//!
//! Provides channel-wise noise models with canonical naming, plus the image
//! source/sink and dataset driver used by the `noisy_dataset` binary.

pub mod image_io;
pub mod noise;
pub mod pipeline;

use std::path::PathBuf;

pub use noise::{Image, NoiseError, NoiseMode, NoiseModel, NoiseParam};

pub type DatasetResult<T> = Result<T, DatasetError>;

#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Noise error: {0}")]
    Noise(#[from] NoiseError),
    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
    #[error("Unsupported channel count: {0}")]
    UnsupportedChannels(usize),
    #[error("Input directory not found: {}", .0.display())]
    MissingInput(PathBuf),
}
