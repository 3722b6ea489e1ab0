use std::time::Instant;

use crate::data::{check_topology, Dataset, CLASSES, PIXELS};
use crate::error::{Error, Result};
use crate::loss::SquaredError;
use crate::math::one_hot_into;
use crate::network::{Gradients, Network};
use crate::optim::Sgd;
use crate::train::batch_stats::BatchStats;

/// Reusable scratch state for mini-batch training on digit records.
///
/// Holds the per-sample gradient buffer, the batch accumulator, and the
/// input/target vectors so that no allocation happens per sample.
pub struct Trainer {
    sgd: Sgd,
    sample: Gradients,
    summed: Gradients,
    input: Vec<f32>,
    target: Vec<f32>,
}

impl Trainer {
    /// Fails with `ShapeMismatch` unless the network reads 784 pixels and
    /// emits 10 class scores.
    pub fn new(network: &Network, sgd: Sgd) -> Result<Trainer> {
        check_topology(network.topology())?;
        Ok(Trainer {
            sgd,
            sample: network.gradient_buffer()?,
            summed: network.gradient_buffer()?,
            input: vec![0.0; PIXELS],
            target: vec![0.0; CLASSES],
        })
    }

    /// Runs one mini-batch: per sample set input, forward, backward against
    /// a one-hot target and accumulate; then one descent step scaled by the
    /// number of samples, and a reset of the accumulator.
    ///
    /// `iteration` and `total_iterations` are only copied into the returned
    /// stats. An empty `indices` slice leaves the network unchanged.
    pub fn train_batch(
        &mut self,
        network: &mut Network,
        dataset: &Dataset,
        indices: &[usize],
        iteration: usize,
        total_iterations: usize,
    ) -> Result<BatchStats> {
        let t_start = Instant::now();
        let mut total_loss = 0.0f32;

        if let Some(&idx) = indices.iter().find(|&&idx| idx >= dataset.len()) {
            return Err(Error::MalformedDataset(format!(
                "index {} is out of range for {} records",
                idx,
                dataset.len()
            )));
        }

        for digit in indices.iter().filter_map(|&idx| dataset.get(idx)) {
            digit.normalize_into(&mut self.input);
            one_hot_into(&mut self.target, digit.label());

            network.set_input(&self.input)?;
            network.forward();
            total_loss += SquaredError::loss(&network.output(), &self.target);

            network.backward(&mut self.sample, &self.target);
            self.summed.accumulate(&self.sample);
        }

        if !indices.is_empty() {
            self.sgd.step(network, &self.summed, indices.len());
            self.summed.reset();
        }

        Ok(BatchStats {
            iteration,
            total_iterations,
            samples: indices.len(),
            mean_loss: total_loss / indices.len().max(1) as f32,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        })
    }
}
