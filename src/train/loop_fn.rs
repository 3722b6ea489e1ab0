use std::time::Instant;

use log::{debug, info};
use rand::Rng;

use crate::data::Dataset;
use crate::error::{Error, Result};
use crate::network::Network;
use crate::optim::Sgd;
use crate::train::batch_stats::TrainReport;
use crate::train::sampler::BatchSampler;
use crate::train::train_config::TrainConfig;
use crate::train::trainer::Trainer;

/// Trains `network` on `dataset` for `config.iterations` mini-batches.
///
/// Batches come from a `BatchSampler` driven by `rng`; pass a seeded
/// generator for a reproducible run. When a checkpoint is configured the
/// parameters are saved after every `every`-th iteration. The final
/// parameters are left in `network`; saving them is up to the caller.
///
/// Fails if the dataset is empty, the network does not fit digit records,
/// or a checkpoint cannot be written.
pub fn train_loop<G: Rng + ?Sized>(
    network: &mut Network,
    dataset: &Dataset,
    config: &TrainConfig,
    rng: &mut G,
) -> Result<TrainReport> {
    if dataset.is_empty() {
        return Err(Error::MalformedDataset("training set is empty".to_owned()));
    }
    if config.batch_size == 0 {
        return Err(Error::Config("batch size must be at least 1".to_owned()));
    }

    let mut trainer = Trainer::new(network, Sgd::new(config.learning_rate))?;
    let mut sampler = BatchSampler::new(dataset.len());
    let report_every = config.report_every.max(1);
    let t_start = Instant::now();
    let mut samples_seen = 0;
    let mut last_loss = 0.0;

    info!(
        "training {} network ({} parameters) on {} records: {} iterations of batch {}, learning rate {}",
        network.topology(),
        network.parameter_count(),
        dataset.len(),
        config.iterations,
        config.batch_size,
        config.learning_rate
    );

    for iteration in 1..=config.iterations {
        let batch = sampler.next_batch(config.batch_size, rng);
        let stats = trainer.train_batch(network, dataset, &batch, iteration, config.iterations)?;
        samples_seen += stats.samples;
        last_loss = stats.mean_loss;

        debug!(
            "batch {}/{}: {} samples, loss {:.6}, {} ms",
            stats.iteration, stats.total_iterations, stats.samples, stats.mean_loss, stats.elapsed_ms
        );
        if iteration % report_every == 0 || iteration == config.iterations {
            info!(
                "iteration {}/{}: loss {:.6}, pass {}",
                iteration,
                config.iterations,
                stats.mean_loss,
                sampler.completed_passes() + 1
            );
        }

        if let Some(ref checkpoint) = config.checkpoint {
            if iteration % checkpoint.every.max(1) == 0 {
                network.save(&checkpoint.path)?;
                info!(
                    "checkpoint at iteration {} written to {}",
                    iteration,
                    checkpoint.path.display()
                );
            }
        }
    }

    let report = TrainReport {
        iterations: config.iterations,
        samples_seen,
        passes: sampler.completed_passes(),
        last_loss,
        elapsed_ms: t_start.elapsed().as_millis() as u64,
    };
    info!(
        "training finished: {} samples over {} full passes in {} ms",
        report.samples_seen, report.passes, report.elapsed_ms
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::digits::tests::records;
    use crate::data::{CLASSES, PIXELS};
    use crate::network::Topology;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup(seed: u64) -> (Network, Dataset, StdRng) {
        let mut rng = StdRng::seed_from_u64(seed);
        let topology = Topology::new(vec![PIXELS, 6, CLASSES]).unwrap();
        let mut net: Network = Network::allocate(&topology).unwrap();
        net.xavier_fill(&mut rng);
        let dataset = Dataset::from_bytes(records(&[2, 5, 7, 2, 5], &[10, 90, 180, 20, 100])).unwrap();
        (net, dataset, rng)
    }

    #[test]
    fn counts_samples_and_passes() {
        let (mut net, dataset, mut rng) = setup(1);
        let config = TrainConfig::new(6, 2, 0.5);
        let report = train_loop(&mut net, &dataset, &config, &mut rng).unwrap();
        // Passes of 5 records in batches of 2 yield 2, 2, 1 samples.
        assert_eq!(report.samples_seen, 10);
        assert_eq!(report.passes, 2);
        assert_eq!(report.iterations, 6);
    }

    #[test]
    fn same_seed_same_result() {
        let run = |seed| {
            let (mut net, dataset, mut rng) = setup(seed);
            train_loop(&mut net, &dataset, &TrainConfig::new(10, 3, 1.0), &mut rng).unwrap();
            net
        };
        assert_eq!(run(9), run(9));
    }

    #[test]
    fn writes_checkpoints() {
        let (mut net, dataset, mut rng) = setup(2);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ckpt.bin");
        let config = TrainConfig::new(4, 5, 0.5).with_checkpoint(&path, 2);
        train_loop(&mut net, &dataset, &config, &mut rng).unwrap();

        let saved = Network::load(&path).unwrap();
        for (a, b) in saved.layers().iter().zip(net.layers()).skip(1) {
            for (na, nb) in a.neurons().iter().zip(b.neurons()) {
                assert_eq!(na.bias, nb.bias);
                assert_eq!(na.weights(), nb.weights());
            }
        }
    }

    #[test]
    fn empty_dataset_is_rejected() {
        let (mut net, _, mut rng) = setup(3);
        let empty = Dataset::from_bytes(Vec::new()).unwrap();
        let err = train_loop(&mut net, &empty, &TrainConfig::new(1, 1, 1.0), &mut rng).unwrap_err();
        assert!(matches!(err, Error::MalformedDataset(_)));
    }
}
