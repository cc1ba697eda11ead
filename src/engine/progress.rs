//! Progress estimation for polling clients

use crate::domain::model::{Project, ProjectStatus, ProgressReport};

/// Percent credited per scene found while analysing
pub const PERCENT_PER_SCENE: usize = 5;
/// Ceiling while analysis is still running
pub const ANALYZING_CAP: u8 = 90;

/// Derives a bounded completion percentage from project state.
///
/// While analysing, the value depends only on the scene count, so it never
/// decreases as long as scenes are only appended.
pub struct ProgressEstimator;

impl ProgressEstimator {
    pub fn estimate(project: &Project) -> u8 {
        Self::estimate_for(project.status, project.scene_count())
    }

    pub fn estimate_for(status: ProjectStatus, scene_count: usize) -> u8 {
        match status {
            ProjectStatus::Analyzed => 100,
            ProjectStatus::Analyzing => scene_count
                .saturating_mul(PERCENT_PER_SCENE)
                .min(ANALYZING_CAP as usize) as u8,
            ProjectStatus::Uploaded | ProjectStatus::Error => 0,
        }
    }

    /// Full read-through view of a project
    pub fn report(project: &Project) -> ProgressReport {
        ProgressReport {
            status: project.status,
            progress: Self::estimate(project),
            scenes_found: project.scene_count(),
            is_analyzing: project.is_analyzing(),
            error: project.error.clone(),
            last_modified: project.last_modified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyzing_is_monotonic_and_capped() {
        let values: Vec<u8> = [0, 1, 5, 20, 40]
            .iter()
            .map(|&count| ProgressEstimator::estimate_for(ProjectStatus::Analyzing, count))
            .collect();

        assert_eq!(values, vec![0, 5, 25, 90, 90]);
        assert!(values.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn test_analyzed_is_always_complete() {
        assert_eq!(ProgressEstimator::estimate_for(ProjectStatus::Analyzed, 0), 100);
        assert_eq!(ProgressEstimator::estimate_for(ProjectStatus::Analyzed, 500), 100);
    }

    #[test]
    fn test_other_statuses_are_zero() {
        assert_eq!(ProgressEstimator::estimate_for(ProjectStatus::Uploaded, 3), 0);
        assert_eq!(ProgressEstimator::estimate_for(ProjectStatus::Error, 12), 0);
    }

    #[test]
    fn test_huge_scene_count_does_not_overflow() {
        assert_eq!(
            ProgressEstimator::estimate_for(ProjectStatus::Analyzing, usize::MAX),
            ANALYZING_CAP
        );
    }

    #[test]
    fn test_report_mirrors_project() {
        let mut project = Project::new("reel", 100.0).unwrap();
        project.set_status(ProjectStatus::Error, Some("All 1 chunks failed".to_string()));

        let report = ProgressEstimator::report(&project);
        assert_eq!(report.status, ProjectStatus::Error);
        assert_eq!(report.progress, 0);
        assert!(!report.is_analyzing);
        assert_eq!(report.error.as_deref(), Some("All 1 chunks failed"));
        assert_eq!(report.last_modified, project.last_modified);
    }
}
