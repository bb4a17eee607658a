pub mod chunk_aggregator;
pub mod merge_reducer;
pub mod parallel_processor;

pub use chunk_aggregator::ChunkAggregator;
pub use merge_reducer::MergeReducer;
pub use parallel_processor::{CancelHandle, ParallelProcessor, ProcessingReport};
