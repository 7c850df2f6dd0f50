use clap::{Parser, ValueEnum};
use ember_renderer::Accelerator;
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AcceleratorArg {
    Bvh,
    List,
}

impl From<AcceleratorArg> for Accelerator {
    fn from(arg: AcceleratorArg) -> Self {
        match arg {
            AcceleratorArg::Bvh => Accelerator::Bvh,
            AcceleratorArg::List => Accelerator::List,
        }
    }
}

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "ember")]
#[command(about = "A Monte Carlo path tracer for spheres and triangle meshes")]
pub struct Args {
    /// JSON scene description; the built-in demo scene is used without it
    #[arg(long)]
    pub scene: Option<PathBuf>,

    /// Image texture for the demo scene's ground and white sphere
    #[arg(long)]
    pub texture: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Number of samples per pixel
    #[arg(long, short = 's')]
    pub spp: Option<u32>,

    /// Number of bounces after the camera ray
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Seed for the random streams
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Worker threads (defaults to one per core)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Bucket edge length in pixels
    #[arg(long, default_value_t = ember_renderer::DEFAULT_BUCKET_SIZE)]
    pub bucket_size: u32,

    /// Intersection acceleration structure
    #[arg(long, value_enum, default_value = "bvh")]
    pub accelerator: AcceleratorArg,

    /// Output image (.ppm is written directly, other extensions via `image`)
    #[arg(short, long, default_value = "test.ppm")]
    pub output: PathBuf,

    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}
