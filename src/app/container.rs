use std::path::PathBuf;
use std::sync::Arc;

use crate::adapters::{
    DirectoryChunkSource, HttpInferenceAdapter, JsonFileProjectStore, ReplayInferenceAdapter,
};
use crate::app::{
    analyze_interactor::{AnalysisSettings, AnalyzeInteractor},
    progress_interactor::ProgressInteractor,
};
use crate::config::AppConfig;
use crate::ports::{ChunkSourcePort, InferencePort, ProjectStorePort};

pub trait AppContainer: Send + Sync {
    fn analyze_interactor(&self) -> Arc<AnalyzeInteractor>;
    fn progress_interactor(&self) -> Arc<ProgressInteractor>;
    fn project_store(&self) -> Arc<dyn ProjectStorePort>;
}

/// Adapter choices that come from the command line rather than config
#[derive(Debug, Clone, Default)]
pub struct ContainerOptions {
    /// Directory of pre-encoded chunk files
    pub chunk_dir: Option<PathBuf>,
    /// Replay recorded responses from this directory instead of calling the service
    pub replay_dir: Option<PathBuf>,
}

pub struct DefaultAppContainer {
    analyze_interactor: Arc<AnalyzeInteractor>,
    progress_interactor: Arc<ProgressInteractor>,
    project_store: Arc<dyn ProjectStorePort>,
}

impl DefaultAppContainer {
    pub fn new(config: &AppConfig, options: ContainerOptions) -> Self {
        let store_port: Arc<dyn ProjectStorePort> =
            Arc::new(JsonFileProjectStore::new(config.store_dir.clone()));

        let inference_port: Arc<dyn InferencePort> = match options.replay_dir {
            Some(dir) => Arc::new(ReplayInferenceAdapter::new(dir)),
            None => Arc::new(HttpInferenceAdapter::new(&config.inference)),
        };

        let chunk_dir = options.chunk_dir.unwrap_or_else(|| PathBuf::from("."));
        let chunk_port: Arc<dyn ChunkSourcePort> = Arc::new(DirectoryChunkSource::new(chunk_dir));

        Self::with_ports(
            store_port,
            inference_port,
            chunk_port,
            AnalysisSettings::from_config(config),
        )
    }

    /// Wire interactors over explicit ports
    pub fn with_ports(
        store_port: Arc<dyn ProjectStorePort>,
        inference_port: Arc<dyn InferencePort>,
        chunk_port: Arc<dyn ChunkSourcePort>,
        settings: AnalysisSettings,
    ) -> Self {
        let analyze_interactor = Arc::new(AnalyzeInteractor::new(
            Arc::clone(&store_port),
            inference_port,
            chunk_port,
            settings,
        ));

        let progress_interactor = Arc::new(ProgressInteractor::new(Arc::clone(&store_port)));

        Self {
            analyze_interactor,
            progress_interactor,
            project_store: store_port,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn analyze_interactor(&self) -> Arc<AnalyzeInteractor> {
        Arc::clone(&self.analyze_interactor)
    }

    fn progress_interactor(&self) -> Arc<ProgressInteractor> {
        Arc::clone(&self.progress_interactor)
    }

    fn project_store(&self) -> Arc<dyn ProjectStorePort> {
        Arc::clone(&self.project_store)
    }
}
