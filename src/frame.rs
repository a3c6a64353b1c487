//! In-memory image representations handed to payload transforms.
//!
//! Two shapes share one contract:
//!
//! ```text
//! array-based   ndarray buffers: (height, width, 3) for color, (height, width) for grayscale
//! object-based  image::DynamicImage handles from the imaging library
//! ```
//!
//! The runner only ever goes through [`Frame`]: `load`, `prepare`, `clone` (the per-iteration
//! copy) and `save`. It never looks inside a representation.

use std::path::Path;

use image::error::{ParameterError, ParameterErrorKind};
use image::{DynamicImage, GrayImage, ImageError, RgbImage};
use ndarray::{Array2, Array3, Axis, ShapeError};

use crate::error::{BenchError, TransformError};

/// Which in-memory shape a transform operates on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Representation {
    Array,
    Object,
}

impl Representation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Representation::Array => "array",
            Representation::Object => "object",
        }
    }
}

/// What the harness must hand a transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputKind {
    Color,
    Grayscale,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Color => "color",
            InputKind::Grayscale => "grayscale",
        }
    }
}

/// ITU-R BT.601 luma, truncated toward zero.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    (0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b)) as u8
}

/// Array-based image: row-major `u8` samples.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArrayImage {
    Color(Array3<u8>),
    Gray(Array2<u8>),
}

impl ArrayImage {
    pub fn from_rgb(img: RgbImage) -> Result<Self, ShapeError> {
        let (w, h) = img.dimensions();
        Array3::from_shape_vec((h as usize, w as usize, 3), img.into_raw()).map(ArrayImage::Color)
    }

    pub fn from_gray(img: GrayImage) -> Result<Self, ShapeError> {
        let (w, h) = img.dimensions();
        Array2::from_shape_vec((h as usize, w as usize), img.into_raw()).map(ArrayImage::Gray)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ArrayImage::Color(_) => InputKind::Color.as_str(),
            ArrayImage::Gray(_) => InputKind::Grayscale.as_str(),
        }
    }

    /// `(height, width)`.
    pub fn dim(&self) -> (usize, usize) {
        match self {
            ArrayImage::Color(a) => (a.dim().0, a.dim().1),
            ArrayImage::Gray(a) => a.dim(),
        }
    }

    pub fn into_color(self) -> Result<Array3<u8>, TransformError> {
        match self {
            ArrayImage::Color(a) => Ok(a),
            other => Err(TransformError::Layout {
                expected: InputKind::Color.as_str(),
                found: other.kind(),
            }),
        }
    }

    pub fn into_gray(self) -> Result<Array2<u8>, TransformError> {
        match self {
            ArrayImage::Gray(a) => Ok(a),
            other => Err(TransformError::Layout {
                expected: InputKind::Grayscale.as_str(),
                found: other.kind(),
            }),
        }
    }

    pub fn to_grayscale(&self) -> ArrayImage {
        match self {
            ArrayImage::Color(a) => {
                ArrayImage::Gray(a.map_axis(Axis(2), |px| luma(px[0], px[1], px[2])))
            }
            ArrayImage::Gray(a) => ArrayImage::Gray(a.clone()),
        }
    }

    pub fn to_color(&self) -> ArrayImage {
        match self {
            ArrayImage::Color(a) => ArrayImage::Color(a.clone()),
            ArrayImage::Gray(a) => {
                let (h, w) = a.dim();
                ArrayImage::Color(Array3::from_shape_fn((h, w, 3), |(y, x, _)| a[[y, x]]))
            }
        }
    }

    /// Copy into an encoder-ready image buffer.
    pub fn to_dynamic(&self) -> Option<DynamicImage> {
        let (h, w) = self.dim();
        match self {
            ArrayImage::Color(a) => {
                let raw: Vec<u8> = a.iter().copied().collect();
                RgbImage::from_raw(w as u32, h as u32, raw).map(DynamicImage::ImageRgb8)
            }
            ArrayImage::Gray(a) => {
                let raw: Vec<u8> = a.iter().copied().collect();
                GrayImage::from_raw(w as u32, h as u32, raw).map(DynamicImage::ImageLuma8)
            }
        }
    }
}

/// One prepared benchmark input or transform output.
#[derive(Clone, Debug)]
pub enum Frame {
    Array(ArrayImage),
    Object(DynamicImage),
}

fn dimension_mismatch() -> ImageError {
    ImageError::Parameter(ParameterError::from_kind(
        ParameterErrorKind::DimensionMismatch,
    ))
}

impl Frame {
    /// Decode `path` into the requested representation family.
    pub fn load(path: &Path, representation: Representation) -> Result<Frame, BenchError> {
        let img = image::open(path).map_err(|source| BenchError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        Frame::from_dynamic(img, representation).map_err(|source| BenchError::Shape {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Sources without color (any luma depth, with or without alpha) become a single-channel
    /// array; everything else becomes RGB for the array form.
    pub fn from_dynamic(
        img: DynamicImage,
        representation: Representation,
    ) -> Result<Frame, ShapeError> {
        match representation {
            Representation::Object => Ok(Frame::Object(img)),
            Representation::Array => match img {
                DynamicImage::ImageLuma8(g) => ArrayImage::from_gray(g).map(Frame::Array),
                other if !other.color().has_color() => {
                    ArrayImage::from_gray(other.to_luma8()).map(Frame::Array)
                }
                other => ArrayImage::from_rgb(other.to_rgb8()).map(Frame::Array),
            },
        }
    }

    pub fn representation(&self) -> Representation {
        match self {
            Frame::Array(_) => Representation::Array,
            Frame::Object(_) => Representation::Object,
        }
    }

    pub fn is_color(&self) -> bool {
        match self {
            Frame::Array(a) => matches!(a, ArrayImage::Color(_)),
            Frame::Object(img) => img.color().has_color(),
        }
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Frame::Array(a) => {
                let (h, w) = a.dim();
                (w as u32, h as u32)
            }
            Frame::Object(img) => (img.width(), img.height()),
        }
    }

    /// Convert once into the layout a transform declared. Already-matching input is kept as-is.
    ///
    /// Color inputs are normalized to 8-bit RGB so every color transform sees the same channel
    /// layout regardless of how the source file was encoded.
    pub fn prepare(self, kind: InputKind) -> Frame {
        match (self, kind) {
            (Frame::Array(a @ ArrayImage::Gray(_)), InputKind::Grayscale) => Frame::Array(a),
            (Frame::Array(a), InputKind::Grayscale) => Frame::Array(a.to_grayscale()),
            (Frame::Array(a @ ArrayImage::Color(_)), InputKind::Color) => Frame::Array(a),
            (Frame::Array(a), InputKind::Color) => Frame::Array(a.to_color()),
            (Frame::Object(img @ DynamicImage::ImageLuma8(_)), InputKind::Grayscale) => {
                Frame::Object(img)
            }
            (Frame::Object(img), InputKind::Grayscale) => {
                Frame::Object(DynamicImage::ImageLuma8(img.to_luma8()))
            }
            (Frame::Object(img @ DynamicImage::ImageRgb8(_)), InputKind::Color) => {
                Frame::Object(img)
            }
            (Frame::Object(img), InputKind::Color) => {
                Frame::Object(DynamicImage::ImageRgb8(img.to_rgb8()))
            }
        }
    }

    /// Encode to `path`; the format follows the file extension.
    pub fn save(&self, path: &Path) -> Result<(), BenchError> {
        let persist = |source| BenchError::Persist {
            path: path.to_path_buf(),
            source,
        };
        match self {
            Frame::Array(a) => a
                .to_dynamic()
                .ok_or_else(dimension_mismatch)
                .and_then(|img| img.save(path))
                .map_err(persist),
            Frame::Object(img) => img.save(path).map_err(persist),
        }
    }
}
