use serde::{Deserialize, Serialize};

/// Statistics for one applied mini-batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchStats {
    /// 1-based iteration number.
    pub iteration: usize,
    /// Total iterations requested for this run.
    pub total_iterations: usize,
    /// Samples actually drawn; less than the batch size at the end of a pass.
    pub samples: usize,
    /// Mean squared-error loss over the batch, measured before the update.
    pub mean_loss: f32,
    /// Wall-clock duration of this batch in milliseconds.
    pub elapsed_ms: u64,
}

/// Summary of a finished `train_loop` run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainReport {
    pub iterations: usize,
    pub samples_seen: usize,
    /// Full passes over the dataset completed by the sampler.
    pub passes: usize,
    /// Mean loss of the last batch.
    pub last_loss: f32,
    pub elapsed_ms: u64,
}
