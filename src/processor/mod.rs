//! Streaming batch processing pipeline

pub mod gather;
pub mod pipeline;
pub mod reader;
pub mod scheduler;

pub use gather::ByteGather;
pub use pipeline::Processor;
pub use reader::BatchReader;
pub use scheduler::OrderedScheduler;

use std::thread;

/// Tuning for the worker pool and in-flight queue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Worker threads; defaults to the available parallelism
    pub worker_count: Option<usize>,
    /// Maximum batches read but not yet written; defaults to workers + 2
    pub buffer_capacity: Option<usize>,
}

impl PipelineConfig {
    /// Set the number of worker threads
    pub fn with_worker_count(mut self, count: usize) -> Self {
        self.worker_count = Some(count);
        self
    }

    /// Set the in-flight queue depth
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = Some(capacity);
        self
    }

    /// Effective worker count
    pub fn worker_count(&self) -> usize {
        if let Some(count) = self.worker_count {
            return count.max(1);
        }
        thread::available_parallelism()
            .map(|v| v.get())
            .unwrap_or(1)
    }

    /// Effective queue depth
    pub fn buffer_capacity(&self) -> usize {
        match self.buffer_capacity {
            Some(capacity) => capacity.max(1),
            None => self.worker_count() + 2,
        }
    }
}

/// Audio processing pipeline result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessingStats {
    /// Batches written to the sink
    pub batches_processed: u64,
    /// Samples per channel written to the sink
    pub samples_written: u64,
    /// Bytes written to the sink
    pub bytes_written: u64,
}
