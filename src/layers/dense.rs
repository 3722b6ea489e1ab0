use std::mem::size_of;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One unit of a fully-connected layer.
///
/// In a parameter network `activation` is the neuron's output; in a gradient
/// buffer it holds the error term δ for the last backward pass. Input-layer
/// neurons carry no weights and their bias is unused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neuron {
    pub activation: f32,
    pub bias: f32,
    pub(crate) weights: Vec<f32>,
}

impl Neuron {
    fn allocate(fan_in: usize) -> Result<Neuron> {
        Ok(Neuron {
            activation: 0.0,
            bias: 0.0,
            weights: try_filled(fan_in, 0.0)?,
        })
    }

    /// Incoming weights, one per neuron of the previous layer.
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Mutable view of the incoming weights. The length is fixed.
    pub fn weights_mut(&mut self) -> &mut [f32] {
        &mut self.weights
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub(crate) neurons: Vec<Neuron>,
}

impl Layer {
    /// Allocates `width` zeroed neurons, each with `fan_in` weights.
    pub fn allocate(width: usize, fan_in: usize) -> Result<Layer> {
        let mut neurons = Vec::new();
        neurons
            .try_reserve_exact(width)
            .map_err(|_| Error::AllocationFailure {
                bytes: width.saturating_mul(size_of::<Neuron>()),
            })?;
        for _ in 0..width {
            neurons.push(Neuron::allocate(fan_in)?);
        }
        Ok(Layer { neurons })
    }

    /// Number of neurons in the layer.
    pub fn width(&self) -> usize {
        self.neurons.len()
    }

    /// Number of weights each neuron carries.
    pub fn fan_in(&self) -> usize {
        self.neurons.first().map_or(0, |n| n.weights.len())
    }

    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub fn neurons_mut(&mut self) -> &mut [Neuron] {
        &mut self.neurons
    }

    /// Copies every activation of the layer into a fresh vector.
    pub fn activations(&self) -> Vec<f32> {
        self.neurons.iter().map(|n| n.activation).collect()
    }

    /// Sets every weight and bias of the layer to the given constants.
    pub fn fill(&mut self, weight: f32, bias: f32) {
        for neuron in &mut self.neurons {
            neuron.bias = bias;
            neuron.weights.fill(weight);
        }
    }
}

/// `vec![value; len]` that reports exhaustion instead of aborting.
fn try_filled(len: usize, value: f32) -> Result<Vec<f32>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| Error::AllocationFailure {
            bytes: len.saturating_mul(size_of::<f32>()),
        })?;
    v.resize(len, value);
    Ok(v)
}
