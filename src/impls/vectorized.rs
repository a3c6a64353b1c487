//! Whole-array `ndarray` expressions: elementwise maps, axis reductions and shifted-window sums.

use ndarray::{s, Array2, Array3, ArrayView2, Axis, Zip};

use crate::descriptor::{task, Descriptor};
use crate::error::TransformError;
use crate::frame::ArrayImage;

/// 5x5 Gaussian, sigma = 1.0.
pub(crate) const GAUSS5: [[f64; 5]; 5] = [
    [0.00297, 0.01331, 0.02194, 0.01331, 0.00297],
    [0.01331, 0.05963, 0.09832, 0.05963, 0.01331],
    [0.02194, 0.09832, 0.16210, 0.09832, 0.02194],
    [0.01331, 0.05963, 0.09832, 0.05963, 0.01331],
    [0.00297, 0.01331, 0.02194, 0.01331, 0.00297],
];

pub fn family() -> Vec<Descriptor> {
    vec![
        Descriptor::array(
            task::INVERT,
            "ndarray-invert",
            "ndarray mapv bitwise NOT",
            invert,
        ),
        Descriptor::array(
            task::INVERT,
            "ndarray-absdiff",
            "ndarray mapv |255 - p|",
            invert_absdiff,
        ),
        Descriptor::array(
            task::GRAYSCALE,
            "ndarray-grayscale",
            "weighted sum of channel planes",
            grayscale,
        ),
        Descriptor::array(
            task::BLUR,
            "ndarray-blur",
            "5x5 Gaussian as 25 scaled shifted views",
            blur,
        ),
        Descriptor::array(
            task::ROTATE_90,
            "ndarray-rotate90",
            "axis permutation + column flip, made contiguous",
            rotate90,
        ),
        Descriptor::array(
            task::EDGE_DETECT_SOBEL,
            "ndarray-sobel",
            "Sobel gradients from shifted views, Zip magnitude",
            sobel,
        )
        .grayscale(),
    ]
}

fn invert(img: ArrayImage) -> Result<ArrayImage, TransformError> {
    Ok(match img {
        ArrayImage::Color(a) => ArrayImage::Color(a.mapv_into(|v| !v)),
        ArrayImage::Gray(a) => ArrayImage::Gray(a.mapv_into(|v| !v)),
    })
}

fn invert_absdiff(img: ArrayImage) -> Result<ArrayImage, TransformError> {
    Ok(match img {
        ArrayImage::Color(a) => ArrayImage::Color(a.mapv(|v| v.abs_diff(u8::MAX))),
        ArrayImage::Gray(a) => ArrayImage::Gray(a.mapv(|v| v.abs_diff(u8::MAX))),
    })
}

fn grayscale(img: ArrayImage) -> Result<ArrayImage, TransformError> {
    let a = img.into_color()?;
    let plane = |c: usize| a.index_axis(Axis(2), c).mapv(f64::from);
    let gray = plane(0) * 0.299 + plane(1) * 0.587 + plane(2) * 0.114;
    Ok(ArrayImage::Gray(gray.mapv(|v| v as u8)))
}

fn blur(img: ArrayImage) -> Result<ArrayImage, TransformError> {
    let a = img.into_color()?;
    let (h, w, c) = a.dim();
    if h == 0 || w == 0 {
        return Ok(ArrayImage::Color(a));
    }

    // Edge-replicated border of 2 on each side.
    let padded = Array3::from_shape_fn((h + 4, w + 4, c), |(y, x, k)| {
        f64::from(a[[y.saturating_sub(2).min(h - 1), x.saturating_sub(2).min(w - 1), k]])
    });

    let mut acc = Array3::<f64>::zeros((h, w, c));
    for (ky, row) in GAUSS5.iter().enumerate() {
        for (kx, &weight) in row.iter().enumerate() {
            acc.scaled_add(weight, &padded.slice(s![ky..ky + h, kx..kx + w, ..]));
        }
    }
    Ok(ArrayImage::Color(
        acc.mapv(|v| v.round().clamp(0.0, 255.0) as u8),
    ))
}

fn rotate90(img: ArrayImage) -> Result<ArrayImage, TransformError> {
    Ok(match img {
        ArrayImage::Color(a) => {
            let mut t = a.permuted_axes([1, 0, 2]);
            t.invert_axis(Axis(1));
            ArrayImage::Color(t.as_standard_layout().into_owned())
        }
        ArrayImage::Gray(a) => {
            let mut t = a.reversed_axes();
            t.invert_axis(Axis(1));
            ArrayImage::Gray(t.as_standard_layout().into_owned())
        }
    })
}

fn window(p: &Array2<f64>, dy: usize, dx: usize, h: usize, w: usize) -> ArrayView2<'_, f64> {
    p.slice(s![dy..dy + h, dx..dx + w])
}

fn sobel(img: ArrayImage) -> Result<ArrayImage, TransformError> {
    let g = img.into_gray()?;
    let (h, w) = g.dim();
    if h == 0 || w == 0 {
        return Ok(ArrayImage::Gray(g));
    }

    let p = Array2::from_shape_fn((h + 2, w + 2), |(y, x)| {
        f64::from(g[[y.saturating_sub(1).min(h - 1), x.saturating_sub(1).min(w - 1)]])
    });
    let at = |dy, dx| window(&p, dy, dx, h, w);

    let gx = &at(0, 2) - &at(0, 0) + (&at(1, 2) - &at(1, 0)) * 2.0 + &at(2, 2) - &at(2, 0);
    let gy = &at(2, 0) - &at(0, 0) + (&at(2, 1) - &at(0, 1)) * 2.0 + &at(2, 2) - &at(0, 2);

    let mag = Zip::from(&gx)
        .and(&gy)
        .map_collect(|&x, &y| x.hypot(y).min(255.0) as u8);
    Ok(ArrayImage::Gray(mag))
}
