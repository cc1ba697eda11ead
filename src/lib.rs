//! Sceneline Library
//!
//! Chunked scene detection: plan fixed windows over a project's media,
//! dispatch them to a visual-inference service, and aggregate the
//! chunk-relative answers into an absolute, sequenced scene timeline.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod error;
pub mod planner;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use app::{AnalyzeInteractor, AnalyzeRequest, ProgressInteractor, RunHandle};
pub use config::AppConfig;
pub use domain::errors::{ChunkFailure, DomainError};
pub use domain::model::{AnalysisSummary, Project, ProjectId, ProjectStatus, ProgressReport, Scene};
pub use error::{SceneError, SceneResult};
