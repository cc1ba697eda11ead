//! Offset correction of chunk-relative scenes into the project timeline

use crate::domain::errors::DomainError;
use crate::domain::model::{ChunkDescriptor, RawScene, Scene};
use crate::utils::time::TimeCodeParser;

/// Turns per-chunk raw scenes into absolute, sequenced scenes.
///
/// Chunks must be fed in ascending index order. Scenes are not deduplicated
/// across chunk boundaries here; see `domain::rules::merge_boundary_scenes`.
#[derive(Debug, Clone)]
pub struct TimelineAggregator {
    next_sequence: u32,
    last_index: Option<usize>,
}

impl Default for TimelineAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl TimelineAggregator {
    pub fn new() -> Self {
        Self::continuing_after(0)
    }

    /// Continue numbering after `existing` scenes
    pub fn continuing_after(existing: usize) -> Self {
        Self {
            next_sequence: existing as u32 + 1,
            last_index: None,
        }
    }

    /// Offset-correct one chunk's scenes, preserving their order.
    ///
    /// An end time before the start time is clamped to the start time.
    pub fn aggregate(
        &mut self,
        chunk: &ChunkDescriptor,
        raw_scenes: &[RawScene],
    ) -> Result<Vec<Scene>, DomainError> {
        if let Some(last) = self.last_index {
            if chunk.index <= last {
                return Err(DomainError::Internal(format!(
                    "Chunk {} aggregated after chunk {}",
                    chunk.index, last
                )));
            }
        }
        self.last_index = Some(chunk.index);

        let scenes = raw_scenes
            .iter()
            .map(|raw| {
                let start_time = chunk.start_offset + TimeCodeParser::parse(&raw.start_time);
                let mut end_time = chunk.start_offset + TimeCodeParser::parse(&raw.end_time);
                if end_time < start_time {
                    tracing::debug!(
                        chunk = chunk.index,
                        start = %raw.start_time,
                        end = %raw.end_time,
                        "Clamping negative-duration scene"
                    );
                    end_time = start_time;
                }

                let scene = Scene {
                    sequence: self.next_sequence,
                    start_time,
                    end_time,
                    description: raw.description.trim().to_string(),
                };
                self.next_sequence += 1;
                scene
            })
            .collect();

        Ok(scenes)
    }
}
