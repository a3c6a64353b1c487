use std::fs;
use std::hint::black_box;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info};

use crate::descriptor::{Descriptor, Transform};
use crate::error::{BenchError, Result, TransformError};
use crate::frame::Frame;
use crate::schema::StatisticsRecord;

/// Inputs for one invocation; read-only once built.
#[derive(Clone, Debug)]
pub struct BenchConfig {
    pub image_path: PathBuf,
    pub iterations: NonZeroUsize,
    pub output_dir: PathBuf,
}

impl BenchConfig {
    pub fn new(
        image_path: impl Into<PathBuf>,
        iterations: usize,
        output_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        let iterations = NonZeroUsize::new(iterations).ok_or_else(|| {
            BenchError::Config("iteration count must be a positive integer".to_string())
        })?;
        Ok(Self {
            image_path: image_path.into(),
            iterations,
            output_dir: output_dir.into(),
        })
    }

    /// Where the last output of `slug` is written.
    pub fn output_path(&self, slug: &str) -> PathBuf {
        self.output_dir.join(format!("{slug}.png"))
    }
}

#[derive(Clone, Debug)]
pub struct Measured {
    pub timings: Vec<f64>,
    pub warmed_up: bool,
    /// Output of the final iteration.
    pub output: Frame,
}

/// Time a single call on its own copy of `input`. The copy happens before the clock starts.
fn time_once(
    transform: &Transform,
    input: &Frame,
) -> std::result::Result<(f64, Frame), TransformError> {
    let copy = input.clone();
    let start = Instant::now();
    let out = transform.apply(copy);
    let elapsed = start.elapsed();
    Ok((elapsed.as_secs_f64(), out?))
}

/// Run `transform` `iterations` times against fresh copies of `input`.
///
/// With `warmup`, one untimed call runs first and its result is discarded. The first error
/// aborts the measurement; timings are never silently truncated.
pub fn measure_frames(
    transform: &Transform,
    input: &Frame,
    iterations: NonZeroUsize,
    warmup: bool,
) -> std::result::Result<Measured, TransformError> {
    if warmup {
        black_box(transform.apply(input.clone())?);
    }

    let mut timings = Vec::with_capacity(iterations.get());
    let (first, mut output) = time_once(transform, input)?;
    timings.push(first);
    for _ in 1..iterations.get() {
        let (elapsed, out) = time_once(transform, input)?;
        timings.push(elapsed);
        output = out;
    }

    Ok(Measured {
        timings,
        warmed_up: warmup,
        output,
    })
}

fn persist(frame: &Frame, dir: &Path, path: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| BenchError::OutputDir {
        path: dir.to_path_buf(),
        source,
    })?;
    frame.save(path)
}

/// Load the configured image and benchmark `descriptor` against it.
pub fn run(descriptor: &Descriptor, config: &BenchConfig) -> Result<StatisticsRecord> {
    let frame = Frame::load(&config.image_path, descriptor.representation())?;
    let (w, h) = frame.dimensions();
    debug!(
        slug = descriptor.slug,
        path = %config.image_path.display(),
        width = w,
        height = h,
        "loaded input"
    );
    run_with_input(descriptor, frame, config)
}

/// Benchmark `descriptor` against an already-loaded frame; `config.image_path` is not read.
pub fn run_with_input(
    descriptor: &Descriptor,
    frame: Frame,
    config: &BenchConfig,
) -> Result<StatisticsRecord> {
    let input = frame.prepare(descriptor.input);

    let measured = measure_frames(
        &descriptor.transform,
        &input,
        config.iterations,
        descriptor.warmup,
    )
    .map_err(|source| BenchError::Transform {
        slug: descriptor.slug.to_string(),
        source,
    })?;

    let out_path = config.output_path(descriptor.slug);
    persist(&measured.output, &config.output_dir, &out_path)?;
    debug!(slug = descriptor.slug, path = %out_path.display(), "wrote output image");

    let record = StatisticsRecord::for_descriptor(descriptor, measured.timings)?;
    debug!(slug = descriptor.slug, warmup = measured.warmed_up, "measured");
    Ok(record)
}

/// Run every descriptor in order, one at a time. The first failure aborts the batch.
///
/// `on_start` is called before each run so the caller can report progress independently of
/// the log filter.
pub fn run_all(
    descriptors: &[&Descriptor],
    config: &BenchConfig,
    mut on_start: impl FnMut(&Descriptor),
) -> Result<Vec<StatisticsRecord>> {
    let mut records = Vec::with_capacity(descriptors.len());
    for d in descriptors {
        on_start(d);
        let record = run(d, config)?;
        info!(slug = d.slug, mean = record.summary().mean, "finished");
        records.push(record);
    }
    Ok(records)
}
