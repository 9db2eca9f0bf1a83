//! Image enhancement ahead of text extraction.
//!
//! The pipeline runs four steps, each feeding the next:
//!
//! 1. **Grayscale**: collapse to a single luma channel.
//! 2. **Upscale**: multiply both dimensions by `scale_factor` with a Lanczos3
//!    filter, so small label fonts cover enough pixels for the recogniser.
//! 3. **Contrast**: push every pixel away from the image mean by
//!    `contrast_factor`, widening the gap between ink and background.
//! 4. **Sharpen**: a 3x3 sharpening kernel to undo the softness the
//!    resampling step introduces.
//!
//! Every step is integer- or fixed-order float arithmetic over the pixel
//! buffer, so identical input and parameters give bit-identical output.

use std::io::Cursor;

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, ImageFormat, Luma};

use crate::error::VisionError;

/// Sharpening kernel, row-major. Weights sum to 16, which is also the
/// divisor, so flat regions pass through unchanged.
const SHARPEN_KERNEL: [i32; 9] = [-2, -2, -2, -2, 32, -2, -2, -2, -2];
const SHARPEN_SCALE: i32 = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionerParams {
    pub scale_factor: u32,
    pub contrast_factor: f32,
    /// Upper bound on the upscaled pixel count.
    pub max_output_pixels: u64,
}

impl Default for ConditionerParams {
    fn default() -> Self {
        Self {
            scale_factor: 2,
            contrast_factor: 2.0,
            max_output_pixels: 64_000_000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageConditioner {
    params: ConditionerParams,
}

/// Output of [`ImageConditioner`]: a single-channel 8-bit image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionedImage(GrayImage);

impl ConditionedImage {
    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn pixels(&self) -> &[u8] {
        self.0.as_raw()
    }

    pub fn as_gray(&self) -> &GrayImage {
        &self.0
    }

    /// Lossless PNG encoding, the format handed to the extractor.
    pub fn to_png(&self) -> Result<Vec<u8>, VisionError> {
        let mut buf = Cursor::new(Vec::new());
        self.0
            .write_to(&mut buf, ImageFormat::Png)
            .map_err(|e| VisionError::Encode(e.to_string()))?;
        Ok(buf.into_inner())
    }
}

impl ImageConditioner {
    pub fn new(params: ConditionerParams) -> Result<Self, VisionError> {
        if params.scale_factor == 0 {
            return Err(VisionError::InvalidParams(
                "scale_factor must be at least 1".to_string(),
            ));
        }
        if !(params.contrast_factor.is_finite() && params.contrast_factor > 0.0) {
            return Err(VisionError::InvalidParams(format!(
                "contrast_factor must be positive, got {}",
                params.contrast_factor
            )));
        }
        Ok(Self { params })
    }

    pub fn params(&self) -> ConditionerParams {
        self.params
    }

    /// Decode an encoded image (PNG, JPEG, ...) and condition it.
    pub fn condition_bytes(&self, bytes: &[u8]) -> Result<ConditionedImage, VisionError> {
        let decoded =
            image::load_from_memory(bytes).map_err(|e| VisionError::Decode(e.to_string()))?;
        self.condition(&decoded)
    }

    pub fn condition(&self, source: &DynamicImage) -> Result<ConditionedImage, VisionError> {
        let gray = source.to_luma8();

        let (width, height) = gray.dimensions();
        let scale = u64::from(self.params.scale_factor);
        let out_w = u64::from(width) * scale;
        let out_h = u64::from(height) * scale;
        if out_w > u64::from(u32::MAX)
            || out_h > u64::from(u32::MAX)
            || out_w * out_h > self.params.max_output_pixels
        {
            return Err(VisionError::TooLarge {
                width: out_w,
                height: out_h,
            });
        }

        let upscaled = if scale == 1 {
            gray
        } else {
            imageops::resize(&gray, out_w as u32, out_h as u32, FilterType::Lanczos3)
        };

        let contrasted = enhance_contrast(&upscaled, self.params.contrast_factor);
        let sharpened = sharpen(&contrasted);

        tracing::debug!(
            source_width = width,
            source_height = height,
            width = sharpened.width(),
            height = sharpened.height(),
            "image conditioned"
        );

        Ok(ConditionedImage(sharpened))
    }
}

/// Scale each pixel's distance from the rounded image mean by `factor`.
fn enhance_contrast(image: &GrayImage, factor: f32) -> GrayImage {
    let raw = image.as_raw();
    if raw.is_empty() {
        return image.clone();
    }

    let sum: u64 = raw.iter().map(|&p| u64::from(p)).sum();
    let mean = (sum as f64 / raw.len() as f64).round() as f32;

    let mut out = image.clone();
    for Luma([p]) in out.pixels_mut() {
        let v = mean + factor * (f32::from(*p) - mean);
        *p = v.round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Apply [`SHARPEN_KERNEL`]. Edge pixels lack a full neighbourhood and are
/// copied unchanged.
fn sharpen(image: &GrayImage) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut out = image.clone();
    if width < 3 || height < 3 {
        return out;
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut acc: i32 = 0;
            for (i, weight) in SHARPEN_KERNEL.iter().enumerate() {
                let dx = (i % 3) as u32;
                let dy = (i / 3) as u32;
                let Luma([p]) = *image.get_pixel(x + dx - 1, y + dy - 1);
                acc += weight * i32::from(p);
            }
            // Round half away from zero, then clamp into u8 range.
            let rounded = if acc >= 0 {
                (acc + SHARPEN_SCALE / 2) / SHARPEN_SCALE
            } else {
                (acc - SHARPEN_SCALE / 2) / SHARPEN_SCALE
            };
            out.put_pixel(x, y, Luma([rounded.clamp(0, 255) as u8]));
        }
    }
    out
}
