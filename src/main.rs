//! Command-line driver: trains a digit classifier or scores one.
//!
//!   digitnet train --dataset train.bin --weights weights.bin --iterations 20000
//!   digitnet infer --dataset test.bin --weights weights.bin
//!
//! Settings come from defaults, then an optional `--config` JSON file, then
//! command-line flags. Set `RUST_LOG=debug` to see every batch and prediction.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use digitnet::data::CLASSES;
use digitnet::{evaluate, train_loop, Config, Dataset, Network, TrainConfig, Topology};

#[derive(Parser, Debug)]
#[command(name = "digitnet")]
#[command(about = "Train and run a sigmoid feed-forward network on 28x28 digit records")]
struct Cli {
    /// JSON configuration file; flags override its values
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train with mini-batch gradient descent and save the weights
    Train(TrainArgs),
    /// Load saved weights and report accuracy on a dataset
    Infer(InferArgs),
}

#[derive(Args, Debug)]
struct TrainArgs {
    /// Training records (785 bytes each)
    #[arg(short, long)]
    dataset: Option<PathBuf>,

    /// Where to write the trained weights
    #[arg(short, long)]
    weights: Option<PathBuf>,

    #[arg(long)]
    batch_size: Option<usize>,

    #[arg(long)]
    learning_rate: Option<f32>,

    #[arg(long)]
    iterations: Option<usize>,

    /// Comma-separated layer widths, e.g. 784,16,16,10
    #[arg(long)]
    topology: Option<Topology>,

    /// Seed for initialization and sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Save the weights every N iterations
    #[arg(long)]
    checkpoint_every: Option<usize>,

    /// Continue from the existing weights file instead of a fresh network
    #[arg(long)]
    resume: bool,
}

#[derive(Args, Debug)]
struct InferArgs {
    /// Records to classify (785 bytes each)
    #[arg(short, long)]
    dataset: Option<PathBuf>,

    /// Trained weights to load
    #[arg(short, long)]
    weights: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_json(path)
            .with_context(|| format!("cannot read configuration {}", path.display()))?,
        None => Config::default(),
    };

    match cli.command {
        Command::Train(args) => {
            apply_train_args(&mut config, &args);
            config.validate()?;
            run_train(&config, args.resume)
        }
        Command::Infer(args) => {
            if let Some(dataset) = args.dataset {
                config.test_dataset_path = dataset;
            }
            if let Some(weights) = args.weights {
                config.weights_path = weights;
            }
            run_infer(&config)
        }
    }
}

fn apply_train_args(config: &mut Config, args: &TrainArgs) {
    if let Some(ref dataset) = args.dataset {
        config.dataset_path = dataset.clone();
    }
    if let Some(ref weights) = args.weights {
        config.weights_path = weights.clone();
    }
    if let Some(batch_size) = args.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(learning_rate) = args.learning_rate {
        config.learning_rate = learning_rate;
    }
    if let Some(iterations) = args.iterations {
        config.iterations = iterations;
    }
    if let Some(ref topology) = args.topology {
        config.topology = topology.clone();
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.checkpoint_every.is_some() {
        config.checkpoint_every = args.checkpoint_every;
    }
}

fn run_train(config: &Config, resume: bool) -> Result<()> {
    let dataset = Dataset::load(&config.dataset_path)
        .with_context(|| format!("cannot load training set {}", config.dataset_path.display()))?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut network = if resume {
        let network = Network::load(&config.weights_path)
            .with_context(|| format!("cannot resume from {}", config.weights_path.display()))?;
        info!("resuming from {} ({})", config.weights_path.display(), network.topology());
        network
    } else {
        let mut network: Network = Network::allocate(&config.topology)?;
        network.xavier_fill(&mut rng);
        info!("initialized {} network with Xavier weights", network.topology());
        network
    };

    train_loop(&mut network, &dataset, &TrainConfig::from(config), &mut rng)?;

    network
        .save(&config.weights_path)
        .with_context(|| format!("cannot save weights to {}", config.weights_path.display()))?;
    info!("weights saved to {}", config.weights_path.display());
    Ok(())
}

fn run_infer(config: &Config) -> Result<()> {
    let dataset = Dataset::load(&config.test_dataset_path).with_context(|| {
        format!("cannot load test set {}", config.test_dataset_path.display())
    })?;
    let mut network = Network::load(&config.weights_path)
        .with_context(|| format!("cannot load weights {}", config.weights_path.display()))?;
    info!("loaded {} network from {}", network.topology(), config.weights_path.display());

    let eval = evaluate(&mut network, &dataset)?;

    println!("Success: {}/{}", eval.correct, eval.total);
    println!("Accuracy: {:.2}%", eval.accuracy() * 100.0);
    println!();
    println!("Confusion matrix (rows: ground truth, columns: prediction)");
    print!("     ");
    for class in 0..CLASSES {
        print!("{:>6}", class);
    }
    println!();
    for (truth, row) in eval.confusion.iter().enumerate() {
        print!("{:>5}", truth);
        for count in row {
            print!("{:>6}", count);
        }
        println!();
    }
    Ok(())
}
