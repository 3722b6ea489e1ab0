use crate::network::Gradients;

impl Gradients {
    /// Adds every bias and weight of `sample` into this buffer.
    ///
    /// Called once per sample of a mini-batch. Layer 0 and the δ stored in
    /// `activation` are not summed.
    ///
    /// # Panics
    /// Panics if the two buffers have different topologies.
    pub fn accumulate(&mut self, sample: &Gradients) {
        self.assert_same_topology(sample);
        for (acc, grad) in self.layers.iter_mut().zip(&sample.layers).skip(1) {
            for (a, g) in acc.neurons.iter_mut().zip(&grad.neurons) {
                a.bias += g.bias;
                for (aw, gw) in a.weights.iter_mut().zip(&g.weights) {
                    *aw += gw;
                }
            }
        }
    }

    /// Zeroes every bias and weight, readying the buffer for the next batch.
    pub fn reset(&mut self) {
        for layer in self.layers.iter_mut().skip(1) {
            layer.fill(0.0, 0.0);
        }
    }

    /// Multiplies every bias and weight by `factor`.
    pub fn scale(&mut self, factor: f32) {
        for layer in self.layers.iter_mut().skip(1) {
            for neuron in &mut layer.neurons {
                neuron.bias *= factor;
                for w in &mut neuron.weights {
                    *w *= factor;
                }
            }
        }
    }
}
