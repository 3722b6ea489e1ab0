use rand::Rng;

use crate::network::network::Network;

/// Glorot uniform bound for a layer: `sqrt(6 / (fan_in + fan_out))`.
pub fn xavier_limit(fan_in: usize, fan_out: usize) -> f32 {
    (6.0 / (fan_in + fan_out) as f32).sqrt()
}

impl Network {
    /// Xavier (Glorot) uniform initialization.
    ///
    /// Every weight of layer `i > 0` is drawn independently from
    /// `[-limit, limit]`, with `limit = xavier_limit(arch[i-1], arch[i])`.
    /// Biases are left untouched (zero after `allocate`). Pass a seeded
    /// generator for a reproducible network.
    pub fn xavier_fill<G: Rng + ?Sized>(&mut self, rng: &mut G) {
        for i in 1..self.layers.len() {
            let limit = xavier_limit(self.layers[i - 1].width(), self.layers[i].width());
            for neuron in &mut self.layers[i].neurons {
                for w in &mut neuron.weights {
                    *w = rng.gen_range(-limit..=limit);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Topology;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn filled(widths: &[usize], seed: u64) -> Network {
        let topology = Topology::new(widths.to_vec()).unwrap();
        let mut net: Network = Network::allocate(&topology).unwrap();
        net.xavier_fill(&mut StdRng::seed_from_u64(seed));
        net
    }

    #[test]
    fn weights_stay_within_layer_limit() {
        for (seed, widths) in [
            (1u64, vec![784, 16, 16, 10]),
            (2, vec![2, 3, 1]),
            (3, vec![5, 40, 7, 3]),
        ] {
            let net = filled(&widths, seed);
            for i in 1..widths.len() {
                let limit = xavier_limit(widths[i - 1], widths[i]);
                for neuron in net.layers()[i].neurons() {
                    assert_eq!(neuron.bias, 0.0);
                    for &w in neuron.weights() {
                        assert!(w >= -limit && w <= limit, "{} outside ±{}", w, limit);
                    }
                }
            }
        }
    }

    #[test]
    fn weights_are_not_degenerate() {
        let net = filled(&[20, 20], 7);
        let weights = net.layers()[1].neurons()[0].weights();
        assert!(weights.iter().any(|&w| w > 0.0));
        assert!(weights.iter().any(|&w| w < 0.0));
    }

    #[test]
    fn same_seed_same_network() {
        assert_eq!(filled(&[6, 4, 2], 42), filled(&[6, 4, 2], 42));
        assert_ne!(filled(&[6, 4, 2], 42), filled(&[6, 4, 2], 43));
    }
}
