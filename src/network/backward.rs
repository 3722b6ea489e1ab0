use crate::activation::Sigmoid;
use crate::loss::SquaredError;
use crate::network::network::{Gradients, Network};

impl Network {
    /// Backpropagates the squared-error loss against `target` into `grads`.
    ///
    /// Must follow a `forward` call on the same input: the sigmoid derivative
    /// is taken from the stored activations. For every layer `i > 0` the
    /// neuron's δ is written to `grads`' activation and bias fields and
    /// `δ * a_prev[k]` to its weights; earlier gradient contents are
    /// overwritten, not added to. `self` is not modified.
    ///
    /// # Panics
    /// Panics if `grads` has a different topology or `target` is not as wide
    /// as the output layer.
    pub fn backward(&self, grads: &mut Gradients, target: &[f32]) {
        self.assert_same_topology(grads);
        let last = self.layers.len() - 1;
        assert_eq!(
            target.len(),
            self.layers[last].width(),
            "target has {} values for {} outputs",
            target.len(),
            self.layers[last].width()
        );

        for i in (1..=last).rev() {
            // Layer i is written while layer i + 1 (already done) is read.
            let (lower, upper) = grads.layers.split_at_mut(i + 1);
            let grad_layer = &mut lower[i];
            let layer = &self.layers[i];
            let prev = &self.layers[i - 1];

            for (j, (g, neuron)) in grad_layer.neurons.iter_mut().zip(&layer.neurons).enumerate() {
                let upstream = if i == last {
                    SquaredError::derivative(neuron.activation, target[j])
                } else {
                    let mut sum = 0.0f32;
                    for (d, next) in upper[0].neurons.iter().zip(&self.layers[i + 1].neurons) {
                        sum += d.activation * next.weights[j];
                    }
                    sum
                };
                let delta = upstream * Sigmoid::derivative_from_output(neuron.activation);

                g.activation = delta;
                g.bias = delta;
                for (w, p) in g.weights.iter_mut().zip(&prev.neurons) {
                    *w = delta * p.activation;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Topology;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn constant_network(widths: &[usize], weight: f32) -> Network {
        let mut net: Network = Network::allocate(&Topology::new(widths.to_vec()).unwrap()).unwrap();
        for layer in net.layers_mut().iter_mut().skip(1) {
            layer.fill(weight, 0.0);
        }
        net
    }

    #[test]
    fn output_delta_matches_worked_example() {
        let mut net = constant_network(&[2, 2, 1], 0.5);
        let mut grads = net.gradient_buffer().unwrap();
        net.set_input(&[0.0, 1.0]).unwrap();
        net.forward();
        net.backward(&mut grads, &[1.0]);

        let out = &grads.layers()[2].neurons()[0];
        assert_abs_diff_eq!(out.activation, -0.158_733, epsilon = 1e-5);
        assert_eq!(out.bias, out.activation);

        let hidden = net.layers()[1].activations();
        assert_abs_diff_eq!(out.weights()[0], out.bias * hidden[0], epsilon = 1e-7);
        assert_abs_diff_eq!(out.weights()[1], out.bias * hidden[1], epsilon = 1e-7);

        // Hidden δ = σ'(a) * δ_out * w, and the zero input yields a zero weight gradient.
        let h = &grads.layers()[1].neurons()[0];
        let expected = hidden[0] * (1.0 - hidden[0]) * out.bias * 0.5;
        assert_abs_diff_eq!(h.bias, expected, epsilon = 1e-7);
        assert_eq!(h.weights()[0], 0.0);
        assert_abs_diff_eq!(h.weights()[1], h.bias, epsilon = 1e-7);
    }

    #[test]
    fn backward_overwrites_previous_gradients() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut net = constant_network(&[3, 4, 2], 0.0);
        net.xavier_fill(&mut rng);
        let input: Vec<f32> = (0..3).map(|_| rng.gen()).collect();
        net.set_input(&input).unwrap();
        net.forward();

        let mut fresh = net.gradient_buffer().unwrap();
        net.backward(&mut fresh, &[0.0, 1.0]);

        let mut dirty = net.gradient_buffer().unwrap();
        for layer in dirty.layers_mut() {
            layer.fill(9.0, 9.0);
        }
        net.backward(&mut dirty, &[0.0, 1.0]);

        for (a, b) in fresh.layers().iter().zip(dirty.layers()).skip(1) {
            assert_eq!(a, b);
        }
    }

    #[test]
    #[should_panic(expected = "target has")]
    fn wrong_target_width_panics() {
        let net = constant_network(&[2, 2], 0.1);
        let mut grads = net.gradient_buffer().unwrap();
        net.backward(&mut grads, &[1.0]);
    }
}
