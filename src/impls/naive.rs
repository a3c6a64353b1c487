//! Element-by-element indexing with bounds checks on every access. Slow on purpose; only run
//! with `--include-native`.

use ndarray::{Array2, Array3};

use crate::descriptor::{task, Descriptor};
use crate::error::TransformError;
use crate::frame::{luma, ArrayImage};

pub fn family() -> Vec<Descriptor> {
    vec![
        Descriptor::array(
            task::INVERT,
            "naive-invert",
            "triple indexed loop, |p - 255| per sample",
            invert,
        )
        .slow(),
        Descriptor::array(
            task::GRAYSCALE,
            "naive-grayscale",
            "double indexed loop, luma per pixel",
            grayscale,
        )
        .slow(),
    ]
}

fn invert(img: ArrayImage) -> Result<ArrayImage, TransformError> {
    let src = img.into_color()?;
    let (h, w, c) = src.dim();
    let mut res = Array3::<u8>::zeros((h, w, c));
    for i in 0..h {
        for j in 0..w {
            for k in 0..c {
                res[[i, j, k]] = (i16::from(src[[i, j, k]]) - 255).unsigned_abs() as u8;
            }
        }
    }
    Ok(ArrayImage::Color(res))
}

fn grayscale(img: ArrayImage) -> Result<ArrayImage, TransformError> {
    let src = img.into_color()?;
    let (h, w, _) = src.dim();
    let mut out = Array2::<u8>::zeros((h, w));
    for i in 0..h {
        for j in 0..w {
            out[[i, j]] = luma(src[[i, j, 0]], src[[i, j, 1]], src[[i, j, 2]]);
        }
    }
    Ok(ArrayImage::Gray(out))
}
