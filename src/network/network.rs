use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::marker::PhantomData;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::activation::Sigmoid;
use crate::error::{Error, Result};
use crate::layers::Layer;
use crate::math::argmax;
use crate::network::topology::Topology;

mod sealed {
    pub trait Sealed {}
}

/// What a `Network` buffer is used for. Both roles share one layout.
pub trait Role: sealed::Sealed + std::fmt::Debug + Clone + Copy + PartialEq + Default {}

/// Live weights and biases; activations are written by `forward`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Params;

/// Per-parameter loss gradients; `activation` holds δ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Grads;

impl sealed::Sealed for Params {}
impl sealed::Sealed for Grads {}
impl Role for Params {}
impl Role for Grads {}

/// A gradient buffer shaped like some parameter network.
pub type Gradients = Network<Grads>;

/// Fully-connected sigmoid network: layers own neurons, neurons own their
/// incoming weights.
///
/// The same buffer type stores parameters (`Network<Params>`) and gradients
/// (`Network<Grads>`). For every layer `i > 0`, each neuron carries exactly
/// `topology[i - 1]` weights; layer 0 neurons carry none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Network<R: Role = Params> {
    topology: Topology,
    pub(crate) layers: Vec<Layer>,
    #[serde(skip)]
    role: PhantomData<R>,
}

impl<R: Role> Network<R> {
    /// Allocates a zeroed buffer for `topology`.
    ///
    /// Fails with `AllocationFailure` if memory cannot be obtained.
    pub fn allocate(topology: &Topology) -> Result<Network<R>> {
        let widths = topology.widths();
        let mut layers = Vec::new();
        layers
            .try_reserve_exact(widths.len())
            .map_err(|_| Error::AllocationFailure {
                bytes: widths.len().saturating_mul(std::mem::size_of::<Layer>()),
            })?;
        for (i, &width) in widths.iter().enumerate() {
            let fan_in = if i == 0 { 0 } else { widths[i - 1] };
            layers.push(Layer::allocate(width, fan_in)?);
        }
        Ok(Network {
            topology: topology.clone(),
            layers,
            role: PhantomData,
        })
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Mutable access to the layers. The number of layers cannot change.
    pub fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    pub fn parameter_count(&self) -> usize {
        self.topology.parameter_count()
    }

    /// Verifies that the buffer matches its topology; used after loading
    /// from a self-describing format.
    pub(crate) fn check_shape(&self) -> Result<()> {
        let widths = self.topology.widths();
        if self.layers.len() != widths.len() {
            return Err(Error::MalformedTopology(format!(
                "topology declares {} layers but {} are stored",
                widths.len(),
                self.layers.len()
            )));
        }
        for (i, layer) in self.layers.iter().enumerate() {
            let fan_in = if i == 0 { 0 } else { widths[i - 1] };
            if layer.width() != widths[i]
                || layer.neurons().iter().any(|n| n.weights().len() != fan_in)
            {
                return Err(Error::MalformedTopology(format!(
                    "layer {} does not match width {} with fan-in {}",
                    i, widths[i], fan_in
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn assert_same_topology<S: Role>(&self, other: &Network<S>) {
        assert_eq!(
            self.topology, other.topology,
            "buffers have different topologies ({} vs {})",
            self.topology, other.topology
        );
    }
}

impl Network<Params> {
    /// Allocates a zeroed gradient buffer with this network's topology.
    pub fn gradient_buffer(&self) -> Result<Gradients> {
        Network::allocate(&self.topology)
    }

    /// Writes `input` into the layer-0 activations.
    pub fn set_input(&mut self, input: &[f32]) -> Result<()> {
        let layer = &mut self.layers[0];
        if input.len() != layer.width() {
            return Err(Error::ShapeMismatch {
                expected: layer.width(),
                actual: input.len(),
            });
        }
        for (neuron, &x) in layer.neurons.iter_mut().zip(input) {
            neuron.activation = x;
        }
        Ok(())
    }

    /// Propagates the layer-0 activations through every later layer.
    ///
    /// Overwrites all activations in layers `1..L`. Deterministic: the same
    /// parameters and input always produce bit-identical activations.
    pub fn forward(&mut self) {
        for i in 1..self.layers.len() {
            let (done, rest) = self.layers.split_at_mut(i);
            let prev = &done[i - 1];
            for neuron in &mut rest[0].neurons {
                let mut z = 0.0f32;
                for (w, p) in neuron.weights.iter().zip(&prev.neurons) {
                    z += w * p.activation;
                }
                z += neuron.bias;
                neuron.activation = Sigmoid::function(z);
            }
        }
    }

    /// Activations of the output layer.
    pub fn output(&self) -> Vec<f32> {
        self.layers[self.layers.len() - 1].activations()
    }

    /// Runs a forward pass on `input` and returns the arg-max output index.
    pub fn predict(&mut self, input: &[f32]) -> Result<usize> {
        self.set_input(input)?;
        self.forward();
        Ok(argmax(&self.output()))
    }

    /// Serializes the network to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(Error::io_at(path))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        debug!("wrote {} as JSON to {}", self.topology, path.display());
        Ok(())
    }

    /// Deserializes a network from a JSON file previously written by
    /// `save_json`, re-checking that the stored layers match the topology.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Network> {
        let path = path.as_ref();
        let file = File::open(path).map_err(Error::io_at(path))?;
        let network: Network = serde_json::from_reader(BufReader::new(file))?;
        network.check_shape()?;
        Ok(network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn topology(widths: &[usize]) -> Topology {
        Topology::new(widths.to_vec()).unwrap()
    }

    fn constant_network(widths: &[usize], weight: f32, bias: f32) -> Network {
        let mut net: Network = Network::allocate(&topology(widths)).unwrap();
        for layer in net.layers_mut().iter_mut().skip(1) {
            layer.fill(weight, bias);
        }
        net
    }

    #[test]
    fn allocation_follows_topology() {
        let net: Network = Network::allocate(&topology(&[4, 3, 2])).unwrap();
        assert_eq!(net.layers().len(), 3);
        assert_eq!(net.layers()[0].fan_in(), 0);
        assert_eq!(net.layers()[1].fan_in(), 4);
        assert_eq!(net.layers()[2].fan_in(), 3);
        assert_eq!(net.layers()[2].width(), 2);
        assert!(net.check_shape().is_ok());
    }

    #[test]
    fn forward_matches_hand_computation() {
        let mut net = constant_network(&[2, 2, 1], 0.5, 0.0);
        net.set_input(&[0.0, 1.0]).unwrap();
        net.forward();

        let hidden = net.layers()[1].activations();
        assert_abs_diff_eq!(hidden[0], 0.622_459_3, epsilon = 1e-6);
        assert_abs_diff_eq!(hidden[1], 0.622_459_3, epsilon = 1e-6);
        assert_abs_diff_eq!(net.output()[0], 0.650_777_7, epsilon = 1e-6);
    }

    #[test]
    fn forward_is_bit_identical_across_calls() {
        let mut net = constant_network(&[3, 4, 2], 0.3, -0.1);
        net.layers_mut()[1].neurons_mut()[2].weights_mut()[1] = -0.7;
        net.set_input(&[0.2, 0.9, 0.4]).unwrap();
        net.forward();
        let first = net.output();
        net.forward();
        net.forward();
        let again = net.output();
        assert_eq!(
            first.iter().map(|x| x.to_bits()).collect::<Vec<_>>(),
            again.iter().map(|x| x.to_bits()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn set_input_rejects_wrong_width() {
        let mut net = constant_network(&[3, 2], 0.1, 0.0);
        let err = net.set_input(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { expected: 3, actual: 2 }));
    }

    #[test]
    fn predict_picks_largest_output() {
        let mut net = constant_network(&[2, 3], 0.0, 0.0);
        net.layers_mut()[1].neurons_mut()[2].bias = 4.0;
        assert_eq!(net.predict(&[0.5, 0.5]).unwrap(), 2);
    }

    #[test]
    fn json_round_trip_keeps_parameters() {
        let net = constant_network(&[3, 2, 2], 0.25, 0.125);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.json");
        net.save_json(&path).unwrap();
        let loaded = Network::load_json(&path).unwrap();
        assert_eq!(net, loaded);
    }

    #[test]
    fn json_with_wrong_shape_is_rejected() {
        let net = constant_network(&[3, 2], 0.25, 0.0);
        let mut value = serde_json::to_value(&net).unwrap();
        value["topology"] = serde_json::json!([4, 2]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, value.to_string()).unwrap();
        assert!(matches!(
            Network::load_json(&path),
            Err(Error::MalformedTopology(_))
        ));
    }
}
