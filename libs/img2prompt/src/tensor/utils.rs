use std::io::Cursor;
use std::path::Path;

use anyhow::Result;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, GrayAlphaImage, GrayImage, ImageFormat, RgbImage, RgbaImage};
use ndarray::{Array4, ArrayBase, ArrayViewD, Axis, Data, Dimension};
use thiserror::Error;

use crate::error::PromptError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TensorError {
    #[error("tensor has no pixels")]
    Empty,
    #[error("unsupported tensor shape {0:?}, expected (rows, cols[, channels]) with a batch of at most 1")]
    UnsupportedShape(Vec<usize>),
    #[error("unsupported channel count {0}, expected 1 to 4")]
    UnsupportedChannels(usize),
    #[error("image dimension {0} does not fit in u32")]
    TooLarge(usize),
}

const MAX_CHANNELS: usize = 4;

// Host tensors come as (batch, rows, cols, channels). Drop the batch axes
// while they are 1 and fold a single channel into a 2-D gray raster.
// A (1, rows, cols) mask whose last axis cannot be channels loses its
// batch axis too; (1, n, <=4) stays a single row of pixels.
fn squeeze(mut view: ArrayViewD<'_, f32>) -> ArrayViewD<'_, f32> {
    while view.ndim() > 3 && view.shape()[0] == 1 {
        view = view.index_axis_move(Axis(0), 0);
    }
    if view.ndim() == 3 && view.shape()[0] == 1 && view.shape()[2] > MAX_CHANNELS {
        view = view.index_axis_move(Axis(0), 0);
    }
    if view.ndim() == 3 && view.shape()[2] == 1 {
        view = view.index_axis_move(Axis(2), 0);
    }
    view
}

// Saturating: <0 -> 0, >1 -> 255, NaN -> 0, fractions truncated.
fn to_u8(value: f32) -> u8 {
    (value * 255.0) as u8
}

fn to_u32(value: usize) -> Result<u32, TensorError> {
    u32::try_from(value).map_err(|_| TensorError::TooLarge(value))
}

/// Converts a normalized `[0, 1]` tensor into an 8-bit raster.
pub fn tensor_to_image<S, D>(tensor: &ArrayBase<S, D>) -> Result<DynamicImage, TensorError>
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    if tensor.is_empty() {
        return Err(TensorError::Empty);
    }

    let view = squeeze(tensor.view().into_dyn());
    let (rows, cols, channels) = match view.shape() {
        [rows, cols] => (*rows, *cols, 1),
        [rows, cols, channels] => (*rows, *cols, *channels),
        _ => return Err(TensorError::UnsupportedShape(tensor.shape().to_vec())),
    };

    let width = to_u32(cols)?;
    let height = to_u32(rows)?;
    // iter() walks in logical order, which is row-major and channel-interleaved
    let pixels: Vec<u8> = view.iter().map(|v| to_u8(*v)).collect();

    let image = match channels {
        1 => GrayImage::from_raw(width, height, pixels).map(DynamicImage::ImageLuma8),
        2 => GrayAlphaImage::from_raw(width, height, pixels).map(DynamicImage::ImageLumaA8),
        3 => RgbImage::from_raw(width, height, pixels).map(DynamicImage::ImageRgb8),
        4 => RgbaImage::from_raw(width, height, pixels).map(DynamicImage::ImageRgba8),
        n => return Err(TensorError::UnsupportedChannels(n)),
    };

    image.ok_or_else(|| TensorError::UnsupportedShape(tensor.shape().to_vec()))
}

pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buffer = Vec::new();
    image.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;
    Ok(buffer)
}

/// Tensor -> PNG -> base64, ready to drop into a `data:image/png;base64,` URI.
pub fn tensor_to_png_base64<S, D>(tensor: &ArrayBase<S, D>) -> Result<String, PromptError>
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    let image = tensor_to_image(tensor)?;
    let png = encode_png(&image)?;
    log::debug!(
        "Encoded {}x{} image into {} PNG bytes",
        image.width(),
        image.height(),
        png.len()
    );
    Ok(STANDARD.encode(png))
}

/// Builds the host's IMAGE layout, `(1, rows, cols, 3)` in `[0, 1]`, from a decoded image.
pub fn image_to_tensor(image: &DynamicImage) -> Array4<f32> {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    Array4::from_shape_fn((1, height as usize, width as usize, 3), |(_, y, x, c)| {
        rgb.get_pixel(x as u32, y as u32)[c] as f32 / 255.0
    })
}

pub fn load_image_tensor(path: impl AsRef<Path>) -> Result<Array4<f32>> {
    let path = path.as_ref();
    let image = image::open(path)
        .map_err(|e| anyhow::anyhow!("Failed to load image from {}: {}", path.display(), e))?;
    Ok(image_to_tensor(&image))
}

/// Accepts raw base64 or a full `data:<mime>;base64,` URI.
pub fn base64_to_tensor(data: &str) -> Result<Array4<f32>> {
    let base64_part = match data.split_once(',') {
        Some((_, part)) => part,
        None => data,
    };
    let bytes = STANDARD
        .decode(base64_part.trim())
        .map_err(|e| anyhow::anyhow!("Failed to decode base64 image data: {}", e))?;
    let image = image::load_from_memory(&bytes)
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;
    Ok(image_to_tensor(&image))
}
