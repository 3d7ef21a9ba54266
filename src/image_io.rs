use image::{DynamicImage, GenericImageView, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};
use ndarray::Array3;
use std::path::Path;

use crate::noise::Image;
use crate::{DatasetError, DatasetResult};

/// Load an image file as `[0, 1]` floats, keeping its channel count.
pub fn load_image(path: &Path) -> DatasetResult<Image> {
    let img = image::open(path)?;
    to_float_image(&img)
}

/// Convert to a `(row, column, channel)` float array.
/// Gray, gray+alpha, RGB and RGBA keep 1, 2, 3 and 4 channels.
pub fn to_float_image(img: &DynamicImage) -> DatasetResult<Image> {
    let (width, height) = img.dimensions();
    let channels = img.color().channel_count() as usize;
    let samples = match channels {
        1 => img.to_luma32f().into_raw(),
        2 => img.to_luma_alpha32f().into_raw(),
        3 => img.to_rgb32f().into_raw(),
        4 => img.to_rgba32f().into_raw(),
        n => return Err(DatasetError::UnsupportedChannels(n)),
    };
    let samples: Vec<f64> = samples.into_iter().map(f64::from).collect();
    Ok(Array3::from_shape_vec(
        (height as usize, width as usize, channels),
        samples,
    )?)
}

/// Convert back to an 8-bit image, clamping to `[0, 1]` and rounding.
pub fn to_dynamic_image(image: &Image) -> DatasetResult<DynamicImage> {
    let (height, width, channels) = image.dim();
    let (w, h) = (width as u32, height as u32);
    let raw: Vec<u8> = image.iter().map(|&v| to_byte(v)).collect();
    let dynamic = match channels {
        1 => GrayImage::from_raw(w, h, raw).map(DynamicImage::ImageLuma8),
        2 => GrayAlphaImage::from_raw(w, h, raw).map(DynamicImage::ImageLumaA8),
        3 => RgbImage::from_raw(w, h, raw).map(DynamicImage::ImageRgb8),
        4 => RgbaImage::from_raw(w, h, raw).map(DynamicImage::ImageRgba8),
        _ => None,
    };
    dynamic.ok_or(DatasetError::UnsupportedChannels(channels))
}

/// Save as 8-bit; the format follows the file extension.
pub fn save_image(image: &Image, path: &Path) -> DatasetResult<()> {
    to_dynamic_image(image)?.save(path)?;
    Ok(())
}

fn to_byte(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
