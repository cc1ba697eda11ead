// Analyze interactor - Orchestrates one analysis run of a project

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::engine::{ChunkDispatcher, DispatchOptions, TimelineAggregator};
use crate::planner::{ChunkPlanner, DEFAULT_CHUNK_DURATION};
use crate::ports::*;

/// Run-level settings taken from configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    pub chunk_duration: f64,
    pub dispatch: DispatchOptions,
    pub merge_boundary_scenes: bool,
    pub boundary_tolerance: f64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            chunk_duration: DEFAULT_CHUNK_DURATION,
            dispatch: DispatchOptions::default(),
            merge_boundary_scenes: false,
            boundary_tolerance: 0.5,
        }
    }
}

impl AnalysisSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            chunk_duration: config.chunk_duration_secs,
            dispatch: config.dispatch_options(),
            merge_boundary_scenes: config.merge_boundary_scenes,
            boundary_tolerance: config.boundary_tolerance_secs,
        }
    }
}

/// Request to analyse (or reprocess) a project
#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    pub project_id: ProjectId,
    /// Raw credential as supplied by the caller
    pub credential: Option<String>,
    /// Overrides the configured dispatch mode
    pub mode: Option<DispatchMode>,
    /// Overrides the configured chunk window
    pub chunk_duration: Option<f64>,
}

impl AnalyzeRequest {
    pub fn new(project_id: ProjectId, credential: Option<String>) -> Self {
        Self {
            project_id,
            credential,
            mode: None,
            chunk_duration: None,
        }
    }
}

/// Handle on a spawned run
pub struct RunHandle {
    project_id: ProjectId,
    cancel: CancellationToken,
    join: JoinHandle<Result<AnalysisSummary, DomainError>>,
}

impl RunHandle {
    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    /// Token that cancels this run when triggered
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Stop dispatching; scenes already appended are kept
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub async fn wait(self) -> Result<AnalysisSummary, DomainError> {
        match self.join.await {
            Ok(outcome) => outcome,
            Err(e) if e.is_cancelled() => Err(DomainError::Cancelled),
            Err(e) => Err(DomainError::Internal(format!("Analysis task failed: {}", e))),
        }
    }
}

type ActiveRuns = Arc<Mutex<HashSet<ProjectId>>>;

/// Marks a project as having a run in flight until dropped.
///
/// Exclusion holds within this process only; separate processes sharing a
/// project store are not coordinated.
struct RunGuard {
    active: ActiveRuns,
    project_id: ProjectId,
}

impl RunGuard {
    fn acquire(active: &ActiveRuns, project_id: &ProjectId) -> Result<Self, DomainError> {
        let mut runs = active.lock().unwrap_or_else(PoisonError::into_inner);
        if !runs.insert(project_id.clone()) {
            return Err(DomainError::AnalysisInProgress(project_id.to_string()));
        }
        Ok(Self {
            active: Arc::clone(active),
            project_id: project_id.clone(),
        })
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.project_id);
    }
}

/// Everything checked before a run may touch the project
struct PreparedRun {
    project: Project,
    credential: Credential,
    settings: AnalysisSettings,
    _guard: RunGuard,
}

/// Interactor for the analysis trigger
#[derive(Clone)]
pub struct AnalyzeInteractor {
    store: Arc<dyn ProjectStorePort>,
    inference: Arc<dyn InferencePort>,
    chunks: Arc<dyn ChunkSourcePort>,
    settings: AnalysisSettings,
    active: ActiveRuns,
}

impl AnalyzeInteractor {
    /// Create new analyze interactor with injected ports
    pub fn new(
        store: Arc<dyn ProjectStorePort>,
        inference: Arc<dyn InferencePort>,
        chunks: Arc<dyn ChunkSourcePort>,
        settings: AnalysisSettings,
    ) -> Self {
        Self {
            store,
            inference,
            chunks,
            settings,
            active: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Run an analysis to completion
    pub async fn run(&self, request: AnalyzeRequest) -> Result<AnalysisSummary, DomainError> {
        let prepared = self.prepare(request).await?;
        self.execute(prepared, CancellationToken::new()).await
    }

    /// Start an analysis in the background.
    ///
    /// Credential, concurrency and existence checks happen before this
    /// returns, so a rejected run never spawns.
    pub async fn start(&self, request: AnalyzeRequest) -> Result<RunHandle, DomainError> {
        let prepared = self.prepare(request).await?;
        let project_id = prepared.project.id.clone();
        let cancel = CancellationToken::new();

        let interactor = self.clone();
        let token = cancel.clone();
        let join = tokio::spawn(async move { interactor.execute(prepared, token).await });

        Ok(RunHandle {
            project_id,
            cancel,
            join,
        })
    }

    async fn prepare(&self, request: AnalyzeRequest) -> Result<PreparedRun, DomainError> {
        let credential = Credential::parse(request.credential.as_deref())?;
        self.inference.validate_credential(&credential).await?;

        let guard = RunGuard::acquire(&self.active, &request.project_id)?;
        let project = self.store.read_project(&request.project_id).await?;

        let mut settings = self.settings.clone();
        if let Some(mode) = request.mode {
            settings.dispatch.mode = mode;
        }
        if let Some(chunk_duration) = request.chunk_duration {
            settings.chunk_duration = chunk_duration;
        }

        Ok(PreparedRun {
            project,
            credential,
            settings,
            _guard: guard,
        })
    }

    async fn execute(
        &self,
        prepared: PreparedRun,
        cancel: CancellationToken,
    ) -> Result<AnalysisSummary, DomainError> {
        let project_id = prepared.project.id.clone();
        match self.analyze(&prepared, &cancel).await {
            Ok(summary) => Ok(summary),
            Err(e) => {
                error!(project_id = %project_id, error = %e, "Analysis aborted");
                if let Err(status_error) = self
                    .store
                    .set_status(&project_id, ProjectStatus::Error, Some(e.to_string()))
                    .await
                {
                    warn!(project_id = %project_id, error = %status_error, "Failed to record analysis error");
                }
                Err(e)
            }
        }
    }

    async fn analyze(
        &self,
        prepared: &PreparedRun,
        cancel: &CancellationToken,
    ) -> Result<AnalysisSummary, DomainError> {
        let project = &prepared.project;
        let id = &project.id;
        let settings = &prepared.settings;

        // Reprocessing starts from an empty timeline
        self.store.clear_scenes(id).await?;
        self.store
            .set_status(id, ProjectStatus::Analyzing, None)
            .await?;

        let chunks = ChunkPlanner::plan(project.duration, settings.chunk_duration)?;
        info!(
            project_id = %id,
            duration = project.duration,
            chunks = chunks.len(),
            mode = ?settings.dispatch.mode,
            "Starting analysis"
        );

        let dispatcher = ChunkDispatcher::new(
            Arc::clone(&self.inference),
            Arc::clone(&self.chunks),
            prepared.credential.clone(),
            settings.dispatch.clone(),
        );
        let dispatch_cancel = cancel.child_token();
        let mut results = dispatcher.dispatch(chunks.clone(), dispatch_cancel.clone());

        let mut aggregator = TimelineAggregator::new();
        let mut tally = RunTally::new(chunks.len());

        loop {
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!(project_id = %id, "Analysis cancelled");
                    tally.cancelled = true;
                    break;
                }
                next = results.recv() => match next {
                    Some(result) => result,
                    None => break,
                },
            };

            let chunk = chunks.get(result.index).ok_or_else(|| {
                DomainError::Internal(format!("Result for unplanned chunk {}", result.index))
            })?;
            let scenes = aggregator.aggregate(chunk, result.scenes())?;
            if !scenes.is_empty() {
                self.store.append_scenes(id, &scenes).await?;
            }

            match result.outcome {
                Ok(_) => tally.record_success(scenes.len()),
                Err(failure) => {
                    let unauthorized = failure.is_unauthorized();
                    tally.record_failure(result.index, failure);
                    if unauthorized {
                        warn!(project_id = %id, chunk = result.index, "Credential rejected, stopping dispatch");
                        dispatch_cancel.cancel();
                        break;
                    }
                }
            }
        }
        drop(results);

        if settings.merge_boundary_scenes && !tally.cancelled {
            tally.scenes_found = self.merge_boundaries(id, &chunks, settings).await?;
        }

        let (status, message) = RunPolicy::conclude(&tally);
        self.store.set_status(id, status, message.clone()).await?;

        info!(
            project_id = %id,
            status = %status,
            scenes = tally.scenes_found,
            failed_chunks = tally.failures.len(),
            "Analysis finished"
        );

        Ok(AnalysisSummary {
            project_id: id.clone(),
            chunks_total: tally.chunks_total,
            chunks_succeeded: tally.chunks_succeeded,
            chunks_failed: tally.failures,
            scenes_found: tally.scenes_found,
            status,
            error: message,
        })
    }

    /// Fuse scenes split by chunk boundaries; returns the final scene count
    async fn merge_boundaries(
        &self,
        id: &ProjectId,
        chunks: &[ChunkDescriptor],
        settings: &AnalysisSettings,
    ) -> Result<usize, DomainError> {
        let project = self.store.read_project(id).await?;
        let boundaries = ChunkPlanner::boundaries(chunks);
        let merged = merge_boundary_scenes(&project.scenes, &boundaries, settings.boundary_tolerance);

        if merged.len() != project.scenes.len() {
            info!(
                project_id = %id,
                before = project.scenes.len(),
                after = merged.len(),
                "Merged boundary scenes"
            );
            let count = merged.len();
            self.store.replace_scenes(id, merged).await?;
            return Ok(count);
        }
        Ok(project.scenes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_guard_is_exclusive_and_released_on_drop() {
        let active: ActiveRuns = Arc::new(Mutex::new(HashSet::new()));
        let id = ProjectId::parse("p1").unwrap();

        let guard = RunGuard::acquire(&active, &id).unwrap();
        assert_eq!(
            RunGuard::acquire(&active, &id).err(),
            Some(DomainError::AnalysisInProgress("p1".to_string()))
        );

        drop(guard);
        assert!(RunGuard::acquire(&active, &id).is_ok());
    }

    #[test]
    fn test_settings_from_config() {
        let config = AppConfig {
            chunk_duration_secs: 60.0,
            dispatch_mode: DispatchMode::Parallel,
            max_concurrency: Some(2),
            merge_boundary_scenes: true,
            ..AppConfig::default()
        };
        let settings = AnalysisSettings::from_config(&config);
        assert_eq!(settings.chunk_duration, 60.0);
        assert_eq!(settings.dispatch.mode, DispatchMode::Parallel);
        assert_eq!(settings.dispatch.max_concurrency, Some(2));
        assert!(settings.merge_boundary_scenes);
    }
}
