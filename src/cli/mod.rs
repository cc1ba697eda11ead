//! CLI module for Sceneline
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// Sceneline scene detector
///
/// Splits a project's media into fixed windows, asks a visual-inference
/// service for the cuts in each window and stitches the answers into one
/// project timeline.
#[derive(Parser, Debug)]
#[command(name = "sceneline")]
#[command(about = "Sceneline - Chunked scene detection for long videos")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (default: sceneline.toml, then config/sceneline.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Logging level
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Directory holding project files
    #[arg(long, global = true)]
    pub store_dir: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage projects
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Detect scenes in a project, replacing any previous result
    Analyze(args::AnalyzeArgs),
    /// Show analysis progress of a project
    Progress(args::ProjectArgs),
    /// List the scenes found in a project
    Scenes(args::ProjectArgs),
    /// Show the chunk plan for a duration
    Plan(args::PlanArgs),
    /// Parse time codes and print them in canonical form
    Timecode(args::TimecodeArgs),
}

/// Project subcommands
#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// Register a project for analysis
    Create(args::CreateProjectArgs),
}
