//! Hand-written loops over contiguous row-major sample buffers.
//!
//! Invert and grayscale go through lookup tables built on first use; the one-time build is
//! what the warmup call keeps out of the timings.

use std::f64::consts::FRAC_PI_4;
use std::sync::OnceLock;

use ndarray::{Array2, Array3};

use super::vectorized::GAUSS5;
use crate::descriptor::{task, Descriptor};
use crate::error::TransformError;
use crate::frame::ArrayImage;

const LEE_HALF_WINDOW: usize = 3;

pub fn family() -> Vec<Descriptor> {
    vec![
        Descriptor::array(
            task::INVERT,
            "loop-invert",
            "byte loop through a 256-entry lookup table",
            invert,
        )
        .with_warmup(),
        Descriptor::array(
            task::GRAYSCALE,
            "loop-grayscale",
            "pixel loop, 16.16 fixed-point luma tables",
            grayscale,
        )
        .with_warmup(),
        Descriptor::array(
            task::BLUR,
            "loop-blur",
            "5x5 Gaussian, clamped borders",
            blur,
        )
        .with_warmup(),
        Descriptor::array(
            task::EDGE_DETECT_SOBEL,
            "loop-sobel",
            "3x3 Sobel magnitude, clamped borders",
            sobel,
        )
        .grayscale()
        .with_warmup(),
        Descriptor::array(
            task::ROTATE_90,
            "loop-rotate90",
            "index remap, 90 degrees clockwise",
            rotate90,
        )
        .with_warmup(),
        Descriptor::array(
            task::ROTATE_ARBITRARY,
            "loop-rotate45",
            "45 degrees clockwise, bilinear, expanded canvas",
            rotate45,
        )
        .with_warmup(),
        Descriptor::array(
            task::LEE_FILTER,
            "loop-lee",
            "Lee speckle filter, 7x7 window",
            lee,
        )
        .grayscale()
        .with_warmup(),
    ]
}

fn invert_lut() -> &'static [u8; 256] {
    static LUT: OnceLock<[u8; 256]> = OnceLock::new();
    LUT.get_or_init(|| std::array::from_fn(|i| u8::MAX - i as u8))
}

/// Per-channel luma contributions scaled by 2^16.
fn luma_lut() -> &'static [[u32; 256]; 3] {
    static LUT: OnceLock<[[u32; 256]; 3]> = OnceLock::new();
    LUT.get_or_init(|| {
        const WEIGHTS: [f64; 3] = [0.299, 0.587, 0.114];
        std::array::from_fn(|c| std::array::from_fn(|v| (WEIGHTS[c] * v as f64 * 65536.0) as u32))
    })
}

fn color_buffer(img: ArrayImage) -> Result<(Array3<u8>, usize, usize, usize), TransformError> {
    let a = img.into_color()?;
    let (h, w, c) = a.dim();
    if !a.is_standard_layout() {
        return Err(TransformError::NonContiguous);
    }
    Ok((a, h, w, c))
}

fn gray_buffer(img: ArrayImage) -> Result<(Array2<u8>, usize, usize), TransformError> {
    let a = img.into_gray()?;
    let (h, w) = a.dim();
    if !a.is_standard_layout() {
        return Err(TransformError::NonContiguous);
    }
    Ok((a, h, w))
}

fn invert(mut img: ArrayImage) -> Result<ArrayImage, TransformError> {
    let lut = invert_lut();
    let buf = match &mut img {
        ArrayImage::Color(a) => a.as_slice_mut(),
        ArrayImage::Gray(a) => a.as_slice_mut(),
    }
    .ok_or(TransformError::NonContiguous)?;
    for v in buf.iter_mut() {
        *v = lut[usize::from(*v)];
    }
    Ok(img)
}

fn grayscale(img: ArrayImage) -> Result<ArrayImage, TransformError> {
    let (a, h, w, c) = color_buffer(img)?;
    let src = a.as_slice().ok_or(TransformError::NonContiguous)?;
    let lut = luma_lut();

    let mut out = Vec::with_capacity(h * w);
    for px in src.chunks_exact(c) {
        let sum = lut[0][usize::from(px[0])] + lut[1][usize::from(px[1])] + lut[2][usize::from(px[2])];
        out.push((sum >> 16) as u8);
    }
    Ok(ArrayImage::Gray(Array2::from_shape_vec((h, w), out)?))
}

fn blur(img: ArrayImage) -> Result<ArrayImage, TransformError> {
    let (a, h, w, ch) = color_buffer(img)?;
    let src = a.as_slice().ok_or(TransformError::NonContiguous)?;

    let mut out = vec![0u8; src.len()];
    for y in 0..h {
        for x in 0..w {
            for c in 0..ch {
                let mut sum = 0.0;
                for (ky, row) in GAUSS5.iter().enumerate() {
                    let sy = (y + ky).saturating_sub(2).min(h - 1);
                    for (kx, &weight) in row.iter().enumerate() {
                        let sx = (x + kx).saturating_sub(2).min(w - 1);
                        sum += f64::from(src[(sy * w + sx) * ch + c]) * weight;
                    }
                }
                out[(y * w + x) * ch + c] = sum.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
    Ok(ArrayImage::Color(Array3::from_shape_vec((h, w, ch), out)?))
}

fn sobel(img: ArrayImage) -> Result<ArrayImage, TransformError> {
    const GX: [[f64; 3]; 3] = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
    const GY: [[f64; 3]; 3] = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

    let (a, h, w) = gray_buffer(img)?;
    let src = a.as_slice().ok_or(TransformError::NonContiguous)?;

    let mut out = vec![0u8; src.len()];
    for y in 0..h {
        for x in 0..w {
            let (mut sx, mut sy) = (0.0f64, 0.0f64);
            for ky in 0..3 {
                let py = (y + ky).saturating_sub(1).min(h - 1);
                for kx in 0..3 {
                    let px = (x + kx).saturating_sub(1).min(w - 1);
                    let v = f64::from(src[py * w + px]);
                    sx += v * GX[ky][kx];
                    sy += v * GY[ky][kx];
                }
            }
            out[y * w + x] = sx.hypot(sy).min(255.0) as u8;
        }
    }
    Ok(ArrayImage::Gray(Array2::from_shape_vec((h, w), out)?))
}

/// Clockwise remap: the output is `h` wide and `w` tall.
fn remap90(src: &[u8], h: usize, w: usize, ch: usize) -> Vec<u8> {
    let mut out = vec![0u8; src.len()];
    for iy in 0..h {
        for ix in 0..w {
            let (ox, oy) = (h - 1 - iy, ix);
            for c in 0..ch {
                out[(oy * h + ox) * ch + c] = src[(iy * w + ix) * ch + c];
            }
        }
    }
    out
}

fn rotate90(img: ArrayImage) -> Result<ArrayImage, TransformError> {
    let (h, w) = img.dim();
    match img {
        ArrayImage::Color(a) => {
            let src = a.as_slice().ok_or(TransformError::NonContiguous)?;
            let out = remap90(src, h, w, 3);
            Ok(ArrayImage::Color(Array3::from_shape_vec((w, h, 3), out)?))
        }
        ArrayImage::Gray(a) => {
            let src = a.as_slice().ok_or(TransformError::NonContiguous)?;
            let out = remap90(src, h, w, 1);
            Ok(ArrayImage::Gray(Array2::from_shape_vec((w, h), out)?))
        }
    }
}

fn rotate45(img: ArrayImage) -> Result<ArrayImage, TransformError> {
    let (a, h, w, ch) = color_buffer(img)?;
    let src = a.as_slice().ok_or(TransformError::NonContiguous)?;

    let (cos_a, sin_a) = (FRAC_PI_4.cos(), FRAC_PI_4.sin());
    let (wf, hf) = (w as f64, h as f64);
    let nw = (wf * cos_a + hf * sin_a).ceil() as usize;
    let nh = (wf * sin_a + hf * cos_a).ceil() as usize;
    let (cx, cy) = (wf / 2.0, hf / 2.0);
    let (ncx, ncy) = (nw as f64 / 2.0, nh as f64 / 2.0);

    let mut out = vec![0u8; nw * nh * ch];
    for oy in 0..nh {
        for ox in 0..nw {
            let dx = ox as f64 - ncx;
            let dy = oy as f64 - ncy;
            let sx = dx * cos_a + dy * sin_a + cx;
            let sy = -dx * sin_a + dy * cos_a + cy;
            if !(sx >= 0.0 && sx < wf - 1.0 && sy >= 0.0 && sy < hf - 1.0) {
                continue;
            }

            let (x0, y0) = (sx.floor() as usize, sy.floor() as usize);
            let (fx, fy) = (sx - x0 as f64, sy - y0 as f64);
            for c in 0..ch {
                let at = |yy: usize, xx: usize| f64::from(src[(yy * w + xx) * ch + c]);
                let v = (1.0 - fx) * (1.0 - fy) * at(y0, x0)
                    + fx * (1.0 - fy) * at(y0, x0 + 1)
                    + (1.0 - fx) * fy * at(y0 + 1, x0)
                    + fx * fy * at(y0 + 1, x0 + 1);
                out[(oy * nw + ox) * ch + c] = v.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
    Ok(ArrayImage::Color(Array3::from_shape_vec((nh, nw, ch), out)?))
}

fn lee(img: ArrayImage) -> Result<ArrayImage, TransformError> {
    let (a, h, w) = gray_buffer(img)?;
    let src = a.as_slice().ok_or(TransformError::NonContiguous)?;
    if src.is_empty() {
        return Ok(ArrayImage::Gray(a));
    }

    let n = src.len() as f64;
    let (sum, sum_sq) = src.iter().fold((0.0f64, 0.0f64), |(s, sq), &v| {
        let v = f64::from(v);
        (s + v, sq + v * v)
    });
    let mean = sum / n;
    let overall_var = sum_sq / n - mean * mean;
    if overall_var == 0.0 {
        return Ok(ArrayImage::Gray(a));
    }

    let mut out = vec![0u8; src.len()];
    for y in 0..h {
        let (y0, y1) = (y.saturating_sub(LEE_HALF_WINDOW), (y + LEE_HALF_WINDOW + 1).min(h));
        for x in 0..w {
            let (x0, x1) = (x.saturating_sub(LEE_HALF_WINDOW), (x + LEE_HALF_WINDOW + 1).min(w));
            let (mut local_sum, mut local_sq) = (0.0f64, 0.0f64);
            for wy in y0..y1 {
                for &v in &src[wy * w + x0..wy * w + x1] {
                    let v = f64::from(v);
                    local_sum += v;
                    local_sq += v * v;
                }
            }
            let count = ((y1 - y0) * (x1 - x0)) as f64;
            let local_mean = local_sum / count;
            let local_var = local_sq / count - local_mean * local_mean;
            let weight = local_var / (local_var + overall_var);
            let v = local_mean + weight * (f64::from(src[y * w + x]) - local_mean);
            out[y * w + x] = v.round().clamp(0.0, 255.0) as u8;
        }
    }
    Ok(ArrayImage::Gray(Array2::from_shape_vec((h, w), out)?))
}
