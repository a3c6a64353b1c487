use image::DynamicImage;

use crate::error::TransformError;
use crate::frame::{ArrayImage, Frame, InputKind, Representation};

/// Task names shared by the builtin families.
pub mod task {
    pub const INVERT: &str = "invert";
    pub const GRAYSCALE: &str = "grayscale";
    pub const BLUR: &str = "blur";
    pub const ROTATE_90: &str = "rotate_90";
    pub const ROTATE_ARBITRARY: &str = "rotate_arbitrary";
    pub const EDGE_DETECT_SOBEL: &str = "edge_detect_sobel";
    pub const LEE_FILTER: &str = "lee_filter";
}

pub type ArrayFn = fn(ArrayImage) -> Result<ArrayImage, TransformError>;
pub type ObjectFn = fn(DynamicImage) -> Result<DynamicImage, TransformError>;

/// A benchmarked callable, typed by the representation it consumes and produces.
///
/// The transform owns its input: the runner hands it a fresh copy every iteration.
#[derive(Clone, Copy, Debug)]
pub enum Transform {
    Array(ArrayFn),
    Object(ObjectFn),
}

impl Transform {
    pub fn representation(&self) -> Representation {
        match self {
            Transform::Array(_) => Representation::Array,
            Transform::Object(_) => Representation::Object,
        }
    }

    pub fn apply(&self, input: Frame) -> Result<Frame, TransformError> {
        match (self, input) {
            (Transform::Array(f), Frame::Array(a)) => f(a).map(Frame::Array),
            (Transform::Object(f), Frame::Object(img)) => f(img).map(Frame::Object),
            (t, frame) => Err(TransformError::Representation {
                expected: t.representation().as_str(),
                found: frame.representation().as_str(),
            }),
        }
    }
}

/// Static record naming one benchmarked implementation and its execution requirements.
#[derive(Clone, Debug)]
pub struct Descriptor {
    pub task: &'static str,
    pub slug: &'static str,
    pub description: &'static str,
    pub transform: Transform,
    pub input: InputKind,
    /// First call carries a one-time setup cost that must stay out of the timings.
    pub warmup: bool,
    /// Member of the slow subset, skipped unless explicitly requested.
    pub slow: bool,
}

impl Descriptor {
    pub const fn new(
        task: &'static str,
        slug: &'static str,
        description: &'static str,
        transform: Transform,
    ) -> Self {
        Self {
            task,
            slug,
            description,
            transform,
            input: InputKind::Color,
            warmup: false,
            slow: false,
        }
    }

    pub const fn array(
        task: &'static str,
        slug: &'static str,
        description: &'static str,
        f: ArrayFn,
    ) -> Self {
        Self::new(task, slug, description, Transform::Array(f))
    }

    pub const fn object(
        task: &'static str,
        slug: &'static str,
        description: &'static str,
        f: ObjectFn,
    ) -> Self {
        Self::new(task, slug, description, Transform::Object(f))
    }

    pub const fn grayscale(mut self) -> Self {
        self.input = InputKind::Grayscale;
        self
    }

    pub const fn with_warmup(mut self) -> Self {
        self.warmup = true;
        self
    }

    pub const fn slow(mut self) -> Self {
        self.slow = true;
        self
    }

    pub fn representation(&self) -> Representation {
        self.transform.representation()
    }
}
