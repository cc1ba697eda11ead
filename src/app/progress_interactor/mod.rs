// Progress interactor - Read-through view for polling clients

use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::model::{ProgressReport, ProjectId};
use crate::engine::ProgressEstimator;
use crate::ports::ProjectStorePort;

/// Interactor for the progress endpoint
pub struct ProgressInteractor {
    store: Arc<dyn ProjectStorePort>,
}

impl ProgressInteractor {
    pub fn new(store: Arc<dyn ProjectStorePort>) -> Self {
        Self { store }
    }

    /// Current progress of a project; never mutates it
    pub async fn progress(&self, id: &ProjectId) -> Result<ProgressReport, DomainError> {
        let project = self.store.read_project(id).await?;
        Ok(ProgressEstimator::report(&project))
    }
}
