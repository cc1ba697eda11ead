// Domain rules - Business logic and policies

use serde::Deserialize;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Instruction contract sent with every chunk.
///
/// Times are chunk-relative; the parser accepts every grammar the service
/// has been seen to emit, but `MM:SS.mmm` is the one asked for.
pub const SCENE_INSTRUCTIONS: &str = r#"You are a film editor's assistant. Watch this video segment and list every shot boundary (visual cut) in it.

Return a JSON object with exactly one key, "scenes": an array of objects in chronological order, each with:
- "startTime": when the shot starts, relative to the start of this segment, formatted MM:SS.mmm
- "endTime": when the shot ends, relative to the start of this segment, formatted MM:SS.mmm
- "description": a short description of the shot (under 15 words)

If the segment contains no distinguishable shots, return {"scenes": []}. Do not include any other text."#;

/// Validates raw inference output into typed scenes
pub struct ResponseValidator;

#[derive(Deserialize)]
struct SceneEnvelope {
    scenes: Option<Vec<RawScene>>,
}

impl ResponseValidator {
    /// Parse the model's text output into raw scenes.
    ///
    /// Anything that is not an object carrying a `scenes` array is malformed.
    pub fn parse(text: &str) -> Result<Vec<RawScene>, ChunkFailure> {
        let body = Self::strip_code_fence(text);
        if body.is_empty() {
            return Err(ChunkFailure::Malformed("empty response".to_string()));
        }

        let envelope: SceneEnvelope = serde_json::from_str(body)
            .map_err(|e| ChunkFailure::Malformed(format!("invalid scene JSON: {}", e)))?;

        envelope
            .scenes
            .ok_or_else(|| ChunkFailure::Malformed("response has no \"scenes\" array".to_string()))
    }

    /// Models sometimes wrap JSON in a Markdown fence
    fn strip_code_fence(text: &str) -> &str {
        let trimmed = text.trim();
        let Some(rest) = trimmed.strip_prefix("```") else {
            return trimmed;
        };
        // Drop the info string ("json") up to the first newline
        let rest = match rest.find('\n') {
            Some(pos) => &rest[pos + 1..],
            None => rest,
        };
        rest.strip_suffix("```").unwrap_or(rest).trim()
    }
}

/// Tally of one run, fed chunk by chunk
#[derive(Debug, Clone, Default)]
pub struct RunTally {
    pub chunks_total: usize,
    pub chunks_succeeded: usize,
    pub failures: Vec<FailedChunk>,
    pub scenes_found: usize,
    pub cancelled: bool,
    pub credential_rejected: bool,
}

impl RunTally {
    pub fn new(chunks_total: usize) -> Self {
        Self {
            chunks_total,
            ..Self::default()
        }
    }

    pub fn record_success(&mut self, scenes: usize) {
        self.chunks_succeeded += 1;
        self.scenes_found += scenes;
    }

    pub fn record_failure(&mut self, index: usize, failure: ChunkFailure) {
        if failure.is_unauthorized() {
            self.credential_rejected = true;
        }
        self.failures.push(FailedChunk { index, failure });
    }
}

/// Terminal status decision for a run
pub struct RunPolicy;

impl RunPolicy {
    /// Decide the project status once dispatch has stopped.
    ///
    /// Partial success is success; only cancellation, a rejected credential
    /// or the failure of every chunk marks the project as errored.
    pub fn conclude(tally: &RunTally) -> (ProjectStatus, Option<String>) {
        if tally.cancelled {
            return (ProjectStatus::Error, Some("Analysis cancelled".to_string()));
        }

        if tally.credential_rejected {
            let reason = tally
                .failures
                .iter()
                .find(|f| f.failure.is_unauthorized())
                .map(|f| f.failure.to_string())
                .unwrap_or_else(|| "credential rejected".to_string());
            return (
                ProjectStatus::Error,
                Some(format!(
                    "Inference credential rejected ({}); configure a valid API key and reprocess",
                    reason
                )),
            );
        }

        if tally.chunks_total > 0 && tally.failures.len() >= tally.chunks_total {
            let first = tally
                .failures
                .first()
                .map(|f| f.failure.to_string())
                .unwrap_or_default();
            return (
                ProjectStatus::Error,
                Some(format!(
                    "All {} chunks failed; first failure: {}",
                    tally.chunks_total, first
                )),
            );
        }

        (ProjectStatus::Analyzed, None)
    }
}

/// Fuse scenes that a chunk boundary split in two.
///
/// A pair is fused when the earlier scene starts before a boundary, the
/// later one starts at or after it, and both the earlier end and the later
/// start lie within `tolerance` of that boundary. Cuts inside one chunk are
/// never fused. Sequence numbers are reassigned densely from 1.
pub fn merge_boundary_scenes(scenes: &[Scene], boundaries: &[f64], tolerance: f64) -> Vec<Scene> {
    let mut merged: Vec<Scene> = Vec::with_capacity(scenes.len());

    for scene in scenes {
        if let Some(previous) = merged.last_mut() {
            let split_by_boundary = boundaries.iter().any(|&boundary| {
                previous.start_time < boundary
                    && scene.start_time >= boundary
                    && (previous.end_time - boundary).abs() <= tolerance
                    && (scene.start_time - boundary).abs() <= tolerance
            });

            if split_by_boundary {
                previous.start_time = previous.start_time.min(scene.start_time);
                previous.end_time = previous.end_time.max(scene.end_time);
                if previous.description.trim().is_empty() {
                    previous.description = scene.description.clone();
                }
                continue;
            }
        }
        merged.push(scene.clone());
    }

    for (position, scene) in merged.iter_mut().enumerate() {
        scene.sequence = position as u32 + 1;
    }

    merged
}

#[cfg(test)]
mod tests;
