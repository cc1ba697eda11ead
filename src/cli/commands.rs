//! Command implementations

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::app::{AnalyzeRequest, AppContainer, ContainerOptions, DefaultAppContainer};
use crate::cli::args::{AnalyzeArgs, CreateProjectArgs, PlanArgs, ProjectArgs, TimecodeArgs};
use crate::cli::{Commands, ProjectCommands};
use crate::config::AppConfig;
use crate::domain::model::{Project, ProjectId, ProjectStatus, Scene};
use crate::planner::ChunkPlanner;
use crate::ports::ProjectStorePort;
use crate::utils::time::{TimeCodeFormatter, TimeCodeParser};

/// Dispatch a parsed command
pub async fn execute(command: Commands, config: &AppConfig) -> Result<()> {
    match command {
        Commands::Project {
            command: ProjectCommands::Create(args),
        } => create_project(args, config).await,
        Commands::Analyze(args) => analyze(args, config).await,
        Commands::Progress(args) => progress(args, config).await,
        Commands::Scenes(args) => scenes(args, config).await,
        Commands::Plan(args) => plan(args, config),
        Commands::Timecode(args) => timecode(args),
    }
}

/// Execute `project create`
pub async fn create_project(args: CreateProjectArgs, config: &AppConfig) -> Result<()> {
    let mut project = Project::new(args.name, args.duration)?;
    if let Some(id) = &args.id {
        project = project.with_id(ProjectId::parse(id)?);
    }
    let id = project.id.clone();

    let container = DefaultAppContainer::new(config, ContainerOptions::default());
    container
        .project_store()
        .create_project(project)
        .await
        .context("Failed to create project")?;

    println!("{}", id);
    Ok(())
}

/// Execute the analyze command
pub async fn analyze(args: AnalyzeArgs, config: &AppConfig) -> Result<()> {
    let project_id = ProjectId::parse(&args.project)?;
    info!(project_id = %project_id, chunks = %args.chunks.display(), "Starting analyze operation");
    if let Some(replay) = &args.replay {
        info!(replay = %replay.display(), "Replaying recorded inference responses");
    }

    let container = DefaultAppContainer::new(
        config,
        ContainerOptions {
            chunk_dir: Some(args.chunks),
            replay_dir: args.replay,
        },
    );

    let handle = container
        .analyze_interactor()
        .start(AnalyzeRequest::new(project_id, args.api_key))
        .await?;
    info!(project_id = %handle.project_id(), "Analysis running, Ctrl-C cancels");

    let token = handle.cancellation_token();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling analysis");
            token.cancel();
        }
    });
    let outcome = handle.wait().await;
    interrupt.abort();
    let summary = outcome?;

    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("Failed to serialize analysis summary")?
    );

    if summary.status == ProjectStatus::Error {
        return Err(anyhow::anyhow!(
            "{}",
            summary
                .error
                .unwrap_or_else(|| "Analysis failed".to_string())
        ));
    }
    Ok(())
}

/// Execute the progress command
pub async fn progress(args: ProjectArgs, config: &AppConfig) -> Result<()> {
    let id = ProjectId::parse(&args.project)?;
    let container = DefaultAppContainer::new(config, ContainerOptions::default());
    let report = container.progress_interactor().progress(&id).await?;

    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to serialize progress report")?
    );
    Ok(())
}

/// Scene as printed, with canonical time codes next to the raw seconds
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SceneView<'a> {
    sequence: u32,
    start: String,
    end: String,
    start_time: f64,
    end_time: f64,
    description: &'a str,
}

impl<'a> From<&'a Scene> for SceneView<'a> {
    fn from(scene: &'a Scene) -> Self {
        Self {
            sequence: scene.sequence,
            start: TimeCodeFormatter::format(scene.start_time),
            end: TimeCodeFormatter::format(scene.end_time),
            start_time: scene.start_time,
            end_time: scene.end_time,
            description: &scene.description,
        }
    }
}

/// Execute the scenes command
pub async fn scenes(args: ProjectArgs, config: &AppConfig) -> Result<()> {
    let id = ProjectId::parse(&args.project)?;
    let container = DefaultAppContainer::new(config, ContainerOptions::default());
    let project = container.project_store().read_project(&id).await?;

    let views: Vec<SceneView<'_>> = project.scenes.iter().map(SceneView::from).collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&views).context("Failed to serialize scenes")?
    );
    Ok(())
}

/// Execute the plan command
pub fn plan(args: PlanArgs, config: &AppConfig) -> Result<()> {
    let window = args.window.unwrap_or(config.chunk_duration_secs);
    let chunks = ChunkPlanner::plan(args.duration, window)?;
    info!(chunks = chunks.len(), window, "Planned chunks");

    println!(
        "{}",
        serde_json::to_string_pretty(&chunks).context("Failed to serialize chunk plan")?
    );
    Ok(())
}

#[derive(Debug, Serialize)]
struct TimecodeView<'a> {
    input: &'a str,
    seconds: f64,
    canonical: String,
    recognized: bool,
}

/// Execute the timecode command
pub fn timecode(args: TimecodeArgs) -> Result<()> {
    let views: Vec<TimecodeView<'_>> = args
        .values
        .iter()
        .map(|input| {
            let seconds = TimeCodeParser::parse(input);
            TimecodeView {
                input,
                seconds,
                canonical: TimeCodeFormatter::format(seconds),
                recognized: TimeCodeParser::try_parse(input).is_ok(),
            }
        })
        .collect();

    println!(
        "{}",
        serde_json::to_string_pretty(&views).context("Failed to serialize time codes")?
    );
    Ok(())
}
