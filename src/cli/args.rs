//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for `project create`
#[derive(Args, Debug)]
pub struct CreateProjectArgs {
    /// Display name
    #[arg(short, long)]
    pub name: String,

    /// Total media duration in seconds
    #[arg(short, long)]
    pub duration: f64,

    /// Use this id instead of a generated one
    #[arg(long)]
    pub id: Option<String>,
}

/// Arguments for the analyze command
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Project id
    #[arg(short, long)]
    pub project: String,

    /// Directory holding one encoded file per chunk (chunk-0000.mp4, ...)
    #[arg(long)]
    pub chunks: PathBuf,

    /// Answer chunks from recorded responses (<dir>/chunk-0000.json, ...)
    #[arg(long)]
    pub replay: Option<PathBuf>,

    /// Dispatch mode (sequential, parallel)
    #[arg(long)]
    pub mode: Option<String>,

    /// Chunk window in seconds
    #[arg(long)]
    pub chunk_duration: Option<f64>,

    /// Cap on concurrent calls in parallel mode
    #[arg(long)]
    pub max_concurrency: Option<usize>,

    /// Fuse scenes split by a chunk boundary
    #[arg(long)]
    pub merge_boundaries: bool,

    /// Inference API key
    #[arg(long, env = "SCENELINE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

/// Arguments naming a single project
#[derive(Args, Debug)]
pub struct ProjectArgs {
    /// Project id
    #[arg(short, long)]
    pub project: String,
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Total duration in seconds
    #[arg(short, long)]
    pub duration: f64,

    /// Chunk window in seconds (default: configured chunk duration)
    #[arg(short, long)]
    pub window: Option<f64>,
}

/// Arguments for the timecode command
#[derive(Args, Debug)]
pub struct TimecodeArgs {
    /// Time texts (SS, MM:SS, MM:SS.mmm, HH:MM:SS.mmm, A:B:C)
    #[arg(required = true)]
    pub values: Vec<String>,
}
