// Application layer - Use case interactors

pub mod analyze_interactor;
pub mod container;
pub mod progress_interactor;

// Re-export interactors
pub use analyze_interactor::{AnalysisSettings, AnalyzeInteractor, AnalyzeRequest, RunHandle};
pub use container::{AppContainer, ContainerOptions, DefaultAppContainer};
pub use progress_interactor::ProgressInteractor;
