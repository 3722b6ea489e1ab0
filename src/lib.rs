pub mod activation;
pub mod config;
pub mod data;
pub mod error;
pub mod layers;
pub mod loss;
pub mod math;
pub mod network;
pub mod optim;
pub mod train;

// Convenience re-exports
pub use activation::Sigmoid;
pub use config::Config;
pub use data::Dataset;
pub use error::{Error, Result};
pub use layers::{Layer, Neuron};
pub use network::{Gradients, Network, Topology};
pub use optim::Sgd;
pub use train::{evaluate, train_loop, BatchSampler, Evaluation, TrainConfig};
