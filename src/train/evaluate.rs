use log::debug;
use serde::{Deserialize, Serialize};

use crate::data::{check_topology, Dataset, CLASSES, PIXELS};
use crate::error::Result;
use crate::network::Network;

/// Classification results over a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub correct: usize,
    pub total: usize,
    /// `confusion[truth][predicted]` counts.
    pub confusion: Vec<Vec<usize>>,
}

impl Evaluation {
    /// Fraction of records classified correctly, in `[0, 1]`. Zero for an
    /// empty dataset.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64
    }
}

/// Predicts every record (arg-max of the output layer) and tallies the
/// results. Each prediction is logged at debug level.
pub fn evaluate(network: &mut Network, dataset: &Dataset) -> Result<Evaluation> {
    check_topology(network.topology())?;
    let mut input = vec![0.0f32; PIXELS];
    let mut eval = Evaluation {
        correct: 0,
        total: 0,
        confusion: vec![vec![0; CLASSES]; CLASSES],
    };

    for (i, digit) in dataset.iter().enumerate() {
        digit.normalize_into(&mut input);
        let predicted = network.predict(&input)?;
        let truth = digit.label();
        debug!("record {}: ground truth {}, prediction {}", i, truth, predicted);

        eval.total += 1;
        if predicted == truth {
            eval.correct += 1;
        }
        eval.confusion[truth][predicted] += 1;
    }
    Ok(eval)
}
