//! Run configuration.
//!
//! Every field has a default, so a JSON file only needs the keys it
//! changes. Keys are camelCase, e.g. `{"batchSize": 32, "topology": [784, 64, 10]}`.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::digits::{check_topology, CLASSES, PIXELS};
use crate::error::{Error, Result};
use crate::network::Topology;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Training records.
    pub dataset_path: PathBuf,
    /// Records scored by `infer`.
    pub test_dataset_path: PathBuf,
    /// Binary parameter file written by training and read by inference.
    pub weights_path: PathBuf,
    /// Samples per mini-batch.
    pub batch_size: usize,
    /// Learning rate η; each step descends by `η / batch` on the summed gradient.
    pub learning_rate: f32,
    /// Number of mini-batches to train on.
    pub iterations: usize,
    pub topology: Topology,
    /// Seed for weight initialization and batch sampling; OS entropy when absent.
    pub seed: Option<u64>,
    /// Save the weights every this many iterations while training.
    pub checkpoint_every: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            dataset_path: PathBuf::from("train.bin"),
            test_dataset_path: PathBuf::from("test.bin"),
            weights_path: PathBuf::from("weights.bin"),
            batch_size: 100,
            learning_rate: 1.0,
            iterations: 20_000,
            topology: Topology::new(vec![PIXELS, 16, 16, CLASSES])
                .expect("default topology is valid"),
            seed: None,
            checkpoint_every: None,
        }
    }
}

impl Config {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        let file = File::open(path).map_err(Error::io_at(path))?;
        let config: Config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(Error::io_at(path))?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Checks the hyperparameters and that the topology fits digit records.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::Config("batchSize must be at least 1".to_owned()));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(Error::Config(format!(
                "learningRate must be a positive number, got {}",
                self.learning_rate
            )));
        }
        if self.iterations == 0 {
            return Err(Error::Config("iterations must be at least 1".to_owned()));
        }
        if self.checkpoint_every == Some(0) {
            return Err(Error::Config("checkpointEvery must be at least 1".to_owned()));
        }
        check_topology(&self.topology).map_err(|e| {
            Error::Config(format!(
                "topology {} does not fit digit records: {}",
                self.topology, e
            ))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_run() {
        let config = Config::default();
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.learning_rate, 1.0);
        assert_eq!(config.iterations, 20_000);
        assert_eq!(config.topology.widths(), &[784, 16, 16, 10]);
        assert_eq!(config.weights_path, PathBuf::from("weights.bin"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"batchSize": 32, "topology": [784, 64, 10], "seed": 9}"#)
                .unwrap();
        assert_eq!(config.batch_size, 32);
        assert_eq!(config.topology.widths(), &[784, 64, 10]);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.iterations, 20_000);
    }

    #[test]
    fn unknown_keys_and_bad_topologies_are_rejected() {
        assert!(serde_json::from_str::<Config>(r#"{"batch": 32}"#).is_err());
        assert!(serde_json::from_str::<Config>(r#"{"topology": [784]}"#).is_err());
    }

    #[test]
    fn validation_catches_bad_values() {
        let mut config = Config::default();
        config.batch_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.learning_rate = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.topology = Topology::new(vec![784, 16, 9]).unwrap();
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = Config::default();
        config.checkpoint_every = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        let mut config = Config::default();
        config.seed = Some(3);
        config.checkpoint_every = Some(500);
        config.save_json(&path).unwrap();
        assert_eq!(Config::load_json(&path).unwrap(), config);
    }
}
