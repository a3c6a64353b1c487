//! Calls into the `image` crate on `DynamicImage` handles.

use std::f32::consts::FRAC_PI_4;

use image::{imageops, DynamicImage, Rgb, RgbImage};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};

use crate::descriptor::{task, Descriptor};
use crate::error::TransformError;

const BLUR_SIGMA: f32 = 2.0;

pub fn family() -> Vec<Descriptor> {
    vec![
        Descriptor::object(
            task::INVERT,
            "image-invert",
            "image DynamicImage::invert",
            invert,
        ),
        Descriptor::object(
            task::GRAYSCALE,
            "image-grayscale",
            "image DynamicImage::grayscale",
            grayscale,
        ),
        Descriptor::object(
            task::BLUR,
            "image-blur",
            "image Gaussian blur, sigma 2",
            blur,
        ),
        Descriptor::object(
            task::ROTATE_90,
            "image-rotate90",
            "image DynamicImage::rotate90",
            rotate90,
        ),
        Descriptor::object(
            task::ROTATE_ARBITRARY,
            "image-rotate45",
            "imageproc rotate_about_center, 45 degrees bilinear, expanded canvas",
            rotate45,
        ),
    ]
}

fn invert(mut img: DynamicImage) -> Result<DynamicImage, TransformError> {
    img.invert();
    Ok(img)
}

fn grayscale(img: DynamicImage) -> Result<DynamicImage, TransformError> {
    Ok(img.grayscale())
}

fn blur(img: DynamicImage) -> Result<DynamicImage, TransformError> {
    Ok(img.blur(BLUR_SIGMA))
}

fn rotate90(img: DynamicImage) -> Result<DynamicImage, TransformError> {
    Ok(img.rotate90())
}

/// Bounding box of a `w` x `h` image turned by `theta`.
fn expanded_canvas(w: u32, h: u32, theta: f32) -> (u32, u32) {
    let (sin, cos) = theta.sin_cos();
    let (wf, hf) = (w as f32, h as f32);
    (
        (wf * cos.abs() + hf * sin.abs()).ceil() as u32,
        (wf * sin.abs() + hf * cos.abs()).ceil() as u32,
    )
}

/// Center the source on the enlarged canvas, then rotate clockwise about the canvas center.
fn rotate45(img: DynamicImage) -> Result<DynamicImage, TransformError> {
    let src = img.into_rgb8();
    let (nw, nh) = expanded_canvas(src.width(), src.height(), FRAC_PI_4);
    let mut canvas = RgbImage::new(nw, nh);
    imageops::overlay(
        &mut canvas,
        &src,
        (i64::from(nw) - i64::from(src.width())) / 2,
        (i64::from(nh) - i64::from(src.height())) / 2,
    );
    let rotated =
        rotate_about_center(&canvas, FRAC_PI_4, Interpolation::Bilinear, Rgb([0, 0, 0]));
    Ok(DynamicImage::ImageRgb8(rotated))
}
