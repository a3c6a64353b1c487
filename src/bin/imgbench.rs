use clap::Parser;
use imgbench::error::BenchError;
use imgbench::harness::{self, BenchConfig};
use imgbench::impls;
use imgbench::registry::Filter;
use imgbench::report::{self, OutputFormat};
use imgbench::sample::{Dimensions, SampleSpec};
use imgbench::Descriptor;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "imgbench")]
#[command(about = "Image processing benchmark suite: one timing report per implementation")]
struct Args {
    /// Path to the input image.
    #[arg(long, value_name = "PATH", env = "IMGBENCH_IMAGE", default_value = "images/lenna.png")]
    image: PathBuf,

    /// Number of timed iterations per implementation.
    #[arg(short = 'n', long, default_value_t = 101)]
    iterations: usize,

    /// Include the slow element-by-element implementations.
    #[arg(long, default_value_t = false)]
    include_native: bool,

    /// Only run implementations of this task (e.g. `invert`).
    #[arg(long, value_name = "NAME")]
    task: Option<String>,

    /// Only run the implementation with this slug.
    #[arg(long = "impl", value_name = "SLUG")]
    implementation: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Directory for output images.
    #[arg(long, value_name = "PATH", env = "IMGBENCH_OUTPUT_DIR", default_value = "output")]
    output_dir: PathBuf,

    /// Where to write the report. If omitted, prints to stdout.
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// List the selected implementations without running them.
    #[arg(long, default_value_t = false)]
    list: bool,

    /// Benchmark a generated WIDTHxHEIGHT image instead of `--image`.
    ///
    /// The image is written into the output directory so the run can be reproduced.
    #[arg(long, value_name = "WIDTHxHEIGHT")]
    synthetic: Option<Dimensions>,

    /// Seed for `--synthetic`.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Debug-level logging on stderr (overridden by RUST_LOG).
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "imgbench=debug" } else { "imgbench=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn print_listing(selected: &[&Descriptor]) {
    println!(
        "{:<18} {:<20} {:<7} {:<10} {:<7} description",
        "task", "slug", "repr", "input", "warmup"
    );
    for d in selected {
        println!(
            "{:<18} {:<20} {:<7} {:<10} {:<7} {}",
            d.task,
            d.slug,
            d.representation().as_str(),
            d.input.as_str(),
            d.warmup,
            d.description
        );
    }
}

fn run(args: &Args) -> Result<(), BenchError> {
    let registry = impls::builtin()?;
    let filter = Filter {
        task: args.task.clone(),
        slug: args.implementation.clone(),
        include_slow: args.include_native,
    };
    let selected = registry.filter(&filter);
    if selected.is_empty() {
        return Err(BenchError::Config(
            "No implementations match the given filters.".to_string(),
        ));
    }
    debug!(selected = selected.len(), of = registry.len(), "filtered implementations");

    if args.list {
        print_listing(&selected);
        return Ok(());
    }

    let mut config = BenchConfig::new(&args.image, args.iterations, &args.output_dir)?;
    if let Some(dim) = args.synthetic {
        let spec = SampleSpec {
            width: dim.width,
            height: dim.height,
            seed: args.seed,
        };
        config.image_path = spec.write_to(&config.output_dir)?;
        info!("Generated {}", config.image_path.display());
    }

    let records = harness::run_all(&selected, &config, |d| eprintln!("Running {}...", d.slug))?;
    let text = report::render(&records, args.format)?;

    if let Some(out) = &args.out {
        fs::write(out, format!("{text}\n"))?;
    } else {
        println!("{text}");
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
