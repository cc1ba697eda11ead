//! Analysis engine: chunk dispatch, timeline aggregation and progress

pub mod aggregator;
pub mod dispatcher;
pub mod progress;

pub use aggregator::TimelineAggregator;
pub use dispatcher::{ChunkDispatcher, DispatchOptions, DEFAULT_CHUNK_TIMEOUT};
pub use progress::ProgressEstimator;
