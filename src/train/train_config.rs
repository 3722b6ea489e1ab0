use std::path::PathBuf;

use crate::config::Config;

/// Periodic save of the parameters during a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoint {
    pub path: PathBuf,
    /// Save after every `every`-th iteration.
    pub every: usize,
}

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `iterations`: number of mini-batches to draw and apply
/// - `batch_size`: samples per mini-batch; the last batch of a pass may
///   be shorter
/// - `learning_rate`: η; each step descends by `η / samples` on the summed
///   gradient
/// - `report_every`: log an `info` line every this many iterations
/// - `checkpoint`: optional periodic save of the parameters
#[derive(Debug, Clone, PartialEq)]
pub struct TrainConfig {
    pub iterations: usize,
    pub batch_size: usize,
    pub learning_rate: f32,
    pub report_every: usize,
    pub checkpoint: Option<Checkpoint>,
}

impl TrainConfig {
    /// Creates a `TrainConfig` with no checkpointing.
    pub fn new(iterations: usize, batch_size: usize, learning_rate: f32) -> Self {
        TrainConfig {
            iterations,
            batch_size,
            learning_rate,
            report_every: 1000,
            checkpoint: None,
        }
    }

    pub fn with_checkpoint(mut self, path: impl Into<PathBuf>, every: usize) -> Self {
        self.checkpoint = Some(Checkpoint {
            path: path.into(),
            every,
        });
        self
    }
}

impl From<&Config> for TrainConfig {
    fn from(config: &Config) -> Self {
        let train = TrainConfig::new(config.iterations, config.batch_size, config.learning_rate);
        match config.checkpoint_every {
            Some(every) => train.with_checkpoint(config.weights_path.clone(), every),
            None => train,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkpoint_targets_weights_file() {
        let mut config = Config::default();
        config.checkpoint_every = Some(250);
        let train = TrainConfig::from(&config);
        assert_eq!(train.iterations, 20_000);
        assert_eq!(train.batch_size, 100);
        assert_eq!(
            train.checkpoint,
            Some(Checkpoint {
                path: PathBuf::from("weights.bin"),
                every: 250
            })
        );
        assert_eq!(TrainConfig::from(&Config::default()).checkpoint, None);
    }
}
