//! Deterministic synthetic input images.
//!
//! A diagonal color gradient with seeded per-pixel noise, so blur, edge and speckle filters
//! have structure to work on. The same `(width, height, seed)` always yields the same bytes.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::{Rgb, RgbImage};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::BenchError;

/// Amplitude of the additive noise, in sample units.
const NOISE: i16 = 24;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleSpec {
    pub width: u32,
    pub height: u32,
    pub seed: u64,
}

impl SampleSpec {
    pub fn file_name(&self) -> String {
        format!("synthetic-{}x{}-seed{}.png", self.width, self.height, self.seed)
    }

    pub fn generate(&self) -> RgbImage {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let span = (self.width + self.height).max(1) as f64;
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let t = (x + y) as f64 / span;
            let base = [
                (t * 255.0) as i16,
                ((1.0 - t) * 255.0) as i16,
                ((x as f64 / self.width.max(1) as f64) * 255.0) as i16,
            ];
            Rgb(base.map(|v| (v + rng.gen_range(-NOISE..=NOISE)).clamp(0, 255) as u8))
        })
    }

    /// Write the image under `dir` (created if absent) and return its path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, BenchError> {
        std::fs::create_dir_all(dir).map_err(|source| BenchError::OutputDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = dir.join(self.file_name());
        self.generate()
            .save(&path)
            .map_err(|source| BenchError::Persist {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }
}

/// `WIDTHxHEIGHT`, both non-zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl FromStr for Dimensions {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| format!("invalid dimension {v:?} in {s:?}"))
        };
        Ok(Self {
            width: parse(w)?,
            height: parse(h)?,
        })
    }
}
