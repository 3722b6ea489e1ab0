pub mod batch_stats;
pub mod evaluate;
pub mod loop_fn;
pub mod sampler;
pub mod train_config;
pub mod trainer;

pub use batch_stats::{BatchStats, TrainReport};
pub use evaluate::{evaluate, Evaluation};
pub use loop_fn::train_loop;
pub use sampler::BatchSampler;
pub use train_config::{Checkpoint, TrainConfig};
pub use trainer::Trainer;
