use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Ordered layer widths of a network, input layer first.
///
/// A valid topology has at least two layers and no zero-width layer. It is
/// fixed once a `Network` has been allocated from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Topology(Vec<usize>);

impl Topology {
    pub fn new(widths: Vec<usize>) -> Result<Topology> {
        if widths.len() < 2 {
            return Err(Error::MalformedTopology(format!(
                "a network needs at least 2 layers, got {}",
                widths.len()
            )));
        }
        if let Some(i) = widths.iter().position(|&w| w == 0) {
            return Err(Error::MalformedTopology(format!(
                "layer {} has width 0",
                i
            )));
        }
        Ok(Topology(widths))
    }

    pub fn widths(&self) -> &[usize] {
        &self.0
    }

    /// Number of layers, input layer included.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn input_width(&self) -> usize {
        self.0[0]
    }

    pub fn output_width(&self) -> usize {
        self.0[self.0.len() - 1]
    }

    /// Weights plus biases over all non-input layers.
    pub fn parameter_count(&self) -> usize {
        self.0.windows(2).map(|w| w[1] * (w[0] + 1)).sum()
    }
}

impl TryFrom<Vec<usize>> for Topology {
    type Error = Error;

    fn try_from(widths: Vec<usize>) -> Result<Topology> {
        Topology::new(widths)
    }
}

impl From<Topology> for Vec<usize> {
    fn from(topology: Topology) -> Vec<usize> {
        topology.0
    }
}

/// Formats as comma-separated widths, e.g. `784,16,16,10`.
impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|w| w.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

impl FromStr for Topology {
    type Err = Error;

    fn from_str(s: &str) -> Result<Topology> {
        let widths = s
            .split(',')
            .map(|part| {
                part.trim().parse::<usize>().map_err(|e| {
                    Error::MalformedTopology(format!("invalid layer width '{}': {}", part.trim(), e))
                })
            })
            .collect::<Result<Vec<usize>>>()?;
        Topology::new(widths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_single_layer_and_zero_width() {
        assert!(matches!(Topology::new(vec![784]), Err(Error::MalformedTopology(_))));
        assert!(matches!(Topology::new(vec![]), Err(Error::MalformedTopology(_))));
        assert!(matches!(Topology::new(vec![4, 0, 2]), Err(Error::MalformedTopology(_))));
    }

    #[test]
    fn no_layer_cap() {
        let topology = Topology::new(vec![3; 300]).unwrap();
        assert_eq!(topology.depth(), 300);
    }

    #[test]
    fn parameter_count_includes_biases() {
        let topology = Topology::new(vec![784, 16, 16, 10]).unwrap();
        assert_eq!(topology.parameter_count(), 16 * 785 + 16 * 17 + 10 * 17);
    }

    #[test]
    fn parses_and_displays_comma_list() {
        let topology: Topology = "784, 16,10".parse().unwrap();
        assert_eq!(topology.widths(), &[784, 16, 10]);
        assert_eq!(topology.to_string(), "784,16,10");
        assert!("784,x".parse::<Topology>().is_err());
    }

    #[test]
    fn json_is_validated() {
        let topology: Topology = serde_json::from_str("[2,3,1]").unwrap();
        assert_eq!(topology.output_width(), 1);
        assert!(serde_json::from_str::<Topology>("[2]").is_err());
    }
}
