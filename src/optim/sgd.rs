use crate::network::{Gradients, Network};

impl Network {
    /// Plain gradient-descent step: `param -= rate * grad` for every bias
    /// and weight of layers `1..L`. No momentum, regularization or clipping.
    ///
    /// # Panics
    /// Panics if `grads` has a different topology.
    pub fn descend(&mut self, grads: &Gradients, rate: f32) {
        self.assert_same_topology(grads);
        for (layer, grad) in self.layers.iter_mut().zip(&grads.layers).skip(1) {
            for (n, g) in layer.neurons.iter_mut().zip(&grad.neurons) {
                n.bias -= g.bias * rate;
                for (w, gw) in n.weights.iter_mut().zip(&g.weights) {
                    *w -= gw * rate;
                }
            }
        }
    }
}

/// Mini-batch stochastic gradient descent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sgd {
    pub learning_rate: f32,
}

impl Sgd {
    pub fn new(learning_rate: f32) -> Sgd {
        Sgd { learning_rate }
    }

    /// Step size that turns a gradient summed over `samples` into an
    /// average-gradient step of `learning_rate`.
    pub fn rate_for(&self, samples: usize) -> f32 {
        self.learning_rate / samples.max(1) as f32
    }

    /// Applies the summed gradients of a `samples`-sized batch to `network`.
    pub fn step(&self, network: &mut Network, summed: &Gradients, samples: usize) {
        network.descend(summed, self.rate_for(samples));
    }
}
