//! Chunk planning: splitting media into fixed time windows

use crate::domain::errors::DomainError;
use crate::domain::model::{ChunkDescriptor, PayloadRef};

/// Default window length in seconds
pub const DEFAULT_CHUNK_DURATION: f64 = 240.0;

/// Upper bound on the number of windows a single plan may produce
pub const MAX_CHUNKS: usize = 100_000;

/// Splits a media duration into contiguous, non-overlapping windows
pub struct ChunkPlanner;

impl ChunkPlanner {
    /// Plan windows of `window_size` seconds covering `[0, total_duration)`.
    ///
    /// The last window is shortened to end exactly at `total_duration`.
    /// A non-positive duration yields no chunks; a plan needing more than
    /// [`MAX_CHUNKS`] windows is rejected. Each descriptor's index is its
    /// position, which is also the processing order.
    pub fn plan(total_duration: f64, window_size: f64) -> Result<Vec<ChunkDescriptor>, DomainError> {
        if !window_size.is_finite() || window_size <= 0.0 {
            return Err(DomainError::BadArgs(format!(
                "Chunk window must be a positive number of seconds, got {}",
                window_size
            )));
        }
        if !total_duration.is_finite() || total_duration <= 0.0 {
            return Ok(Vec::new());
        }

        let count = (total_duration / window_size).ceil();
        if count > MAX_CHUNKS as f64 {
            return Err(DomainError::BadArgs(format!(
                "Chunk window of {}s splits {}s into more than {} chunks",
                window_size, total_duration, MAX_CHUNKS
            )));
        }
        let count = count as usize;
        let mut chunks = Vec::with_capacity(count);

        for index in 0..count {
            // Offsets are computed from the index, not accumulated
            let start_offset = index as f64 * window_size;
            if start_offset >= total_duration {
                break;
            }
            let end_offset = ((index + 1) as f64 * window_size).min(total_duration);

            chunks.push(ChunkDescriptor {
                index,
                start_offset,
                end_offset,
                payload: PayloadRef::for_chunk(index),
            });
        }

        tracing::debug!(
            total_duration,
            window_size,
            chunks = chunks.len(),
            "Planned analysis chunks"
        );

        Ok(chunks)
    }

    /// Internal boundaries between consecutive chunks
    pub fn boundaries(chunks: &[ChunkDescriptor]) -> Vec<f64> {
        chunks.iter().skip(1).map(|c| c.start_offset).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_rejects_too_many_windows() {
        let result = ChunkPlanner::plan(1.0e6, 1.0e-12);
        assert!(matches!(result, Err(DomainError::BadArgs(_))));

        let at_limit = ChunkPlanner::plan(MAX_CHUNKS as f64, 1.0).unwrap();
        assert_eq!(at_limit.len(), MAX_CHUNKS);
        assert!(ChunkPlanner::plan(MAX_CHUNKS as f64 + 1.0, 1.0).is_err());
    }

    #[test]
    fn test_plan_shortens_final_window() {
        let chunks = ChunkPlanner::plan(700.0, 240.0).unwrap();
        let windows: Vec<(f64, f64)> = chunks.iter().map(|c| (c.start_offset, c.end_offset)).collect();
        assert_eq!(windows, vec![(0.0, 240.0), (240.0, 480.0), (480.0, 700.0)]);
        assert_eq!(
            chunks.iter().map(|c| c.index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_plan_exact_multiple() {
        let chunks = ChunkPlanner::plan(480.0, 240.0).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].end_offset, 480.0);
    }

    #[test]
    fn test_plan_shorter_than_window() {
        let chunks = ChunkPlanner::plan(12.5, 240.0).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].start_offset, 0.0);
        assert_eq!(chunks[0].end_offset, 12.5);
    }

    #[test]
    fn test_plan_empty_input() {
        assert!(ChunkPlanner::plan(0.0, 240.0).unwrap().is_empty());
        assert!(ChunkPlanner::plan(-5.0, 240.0).unwrap().is_empty());
        assert!(ChunkPlanner::plan(f64::NAN, 240.0).unwrap().is_empty());
    }

    #[test]
    fn test_plan_rejects_bad_window() {
        assert!(ChunkPlanner::plan(700.0, 0.0).is_err());
        assert!(ChunkPlanner::plan(700.0, -1.0).is_err());
    }

    #[test]
    fn test_plan_is_contiguous() {
        let chunks = ChunkPlanner::plan(1000.3, 7.0).unwrap();
        assert_eq!(chunks.first().unwrap().start_offset, 0.0);
        assert_eq!(chunks.last().unwrap().end_offset, 1000.3);
        for pair in chunks.windows(2) {
            assert_eq!(pair[0].end_offset, pair[1].start_offset);
            assert!(pair[0].duration() > 0.0);
        }
    }

    #[test]
    fn test_payload_refs_follow_index() {
        let chunks = ChunkPlanner::plan(500.0, 240.0).unwrap();
        assert_eq!(chunks[2].payload.as_str(), "chunk-0002");
    }

    #[test]
    fn test_boundaries() {
        let chunks = ChunkPlanner::plan(700.0, 240.0).unwrap();
        assert_eq!(ChunkPlanner::boundaries(&chunks), vec![240.0, 480.0]);
    }
}
