use std::io::Cursor;

use carelens_vision::condition::{ConditionerParams, ImageConditioner};
use carelens_vision::error::VisionError;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

/// A small RGB "label": dark strokes on a light background.
fn sample_label_png() -> Vec<u8> {
    let mut img = RgbImage::from_pixel(24, 12, Rgb([235, 230, 220]));
    for x in 3..21 {
        img.put_pixel(x, 4, Rgb([20, 20, 30]));
        img.put_pixel(x, 8, Rgb([40, 30, 20]));
    }
    for y in 2..10 {
        img.put_pixel(6, y, Rgb([10, 10, 10]));
    }
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

#[test]
fn output_is_grayscale_and_upscaled() {
    let conditioner = ImageConditioner::new(ConditionerParams::default()).unwrap();
    let out = conditioner.condition_bytes(&sample_label_png()).unwrap();

    assert_eq!((out.width(), out.height()), (48, 24));
    assert_eq!(out.pixels().len(), 48 * 24);
}

#[test]
fn conditioning_is_deterministic() {
    let conditioner = ImageConditioner::new(ConditionerParams::default()).unwrap();
    let png = sample_label_png();

    let a = conditioner.condition_bytes(&png).unwrap();
    let b = conditioner.condition_bytes(&png).unwrap();

    assert_eq!((a.width(), a.height()), (b.width(), b.height()));
    assert_eq!(a.pixels(), b.pixels());
    assert_eq!(a.to_png().unwrap(), b.to_png().unwrap());
}

#[test]
fn contrast_widens_ink_background_gap() {
    let png = sample_label_png();
    let gray = image::load_from_memory(&png).unwrap().to_luma8();
    let source_ink = gray.get_pixel(10, 4).0[0];
    let source_paper = gray.get_pixel(10, 1).0[0];

    let conditioner = ImageConditioner::new(ConditionerParams {
        scale_factor: 1,
        ..ConditionerParams::default()
    })
    .unwrap();
    let out = conditioner.condition_bytes(&png).unwrap();
    let ink = out.as_gray().get_pixel(10, 4).0[0];
    let paper = out.as_gray().get_pixel(10, 1).0[0];

    assert!(i32::from(paper) - i32::from(ink) > i32::from(source_paper) - i32::from(source_ink));
}

#[test]
fn undecodable_bytes_fail_with_decode_error() {
    let conditioner = ImageConditioner::new(ConditionerParams::default()).unwrap();
    let err = conditioner.condition_bytes(b"definitely not an image").unwrap_err();
    assert!(matches!(err, VisionError::Decode(_)));
}

#[test]
fn invalid_params_are_rejected() {
    let zero_scale = ConditionerParams {
        scale_factor: 0,
        ..ConditionerParams::default()
    };
    assert!(matches!(
        ImageConditioner::new(zero_scale),
        Err(VisionError::InvalidParams(_))
    ));

    let negative_contrast = ConditionerParams {
        contrast_factor: -1.0,
        ..ConditionerParams::default()
    };
    assert!(ImageConditioner::new(negative_contrast).is_err());
}

#[test]
fn oversized_output_is_refused() {
    let conditioner = ImageConditioner::new(ConditionerParams {
        max_output_pixels: 100,
        ..ConditionerParams::default()
    })
    .unwrap();
    let err = conditioner.condition_bytes(&sample_label_png()).unwrap_err();
    assert!(matches!(err, VisionError::TooLarge { width: 48, height: 24 }));
}
