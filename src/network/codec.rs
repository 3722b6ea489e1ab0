//! Compact binary parameter format.
//!
//! ```text
//! u8                layer count L
//! i32 × L           layer widths, input first
//! for i in 1..L, for each neuron j of layer i:
//!     f32 × arch[i-1]   incoming weights, in input order
//!     f32               bias
//! ```
//!
//! There is no magic number or version tag, and integers and floats use the
//! host's native byte order. The total length is
//! `1 + 4L + 4 Σ arch[i] (arch[i-1] + 1)`.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::network::network::Network;
use crate::network::topology::Topology;

/// Exact encoded size of a network with this topology, or `None` if it
/// overflows `usize`.
pub fn encoded_len(widths: &[usize]) -> Option<usize> {
    let header = widths.len().checked_mul(4)?.checked_add(1)?;
    widths.windows(2).try_fold(header, |acc, w| {
        let per_layer = w[0].checked_add(1)?.checked_mul(w[1])?.checked_mul(4)?;
        acc.checked_add(per_layer)
    })
}

impl Network {
    /// Encodes topology and parameters. Activations are not stored.
    ///
    /// Fails with `MalformedTopology` if the network has more than 255
    /// layers or a layer wider than `i32::MAX`, which the header cannot hold.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let widths = self.topology().widths();
        let layer_count = u8::try_from(widths.len()).map_err(|_| {
            Error::MalformedTopology(format!(
                "{} layers cannot be stored, the format holds at most {}",
                widths.len(),
                u8::MAX
            ))
        })?;
        let len = encoded_len(widths)
            .ok_or_else(|| Error::MalformedTopology("encoded size overflows".to_owned()))?;

        let mut out = Vec::with_capacity(len);
        out.push(layer_count);
        for &width in widths {
            let width = i32::try_from(width).map_err(|_| {
                Error::MalformedTopology(format!("layer width {} exceeds i32::MAX", width))
            })?;
            out.extend_from_slice(&width.to_ne_bytes());
        }
        for layer in &self.layers[1..] {
            for neuron in &layer.neurons {
                for w in &neuron.weights {
                    out.extend_from_slice(&w.to_ne_bytes());
                }
                out.extend_from_slice(&neuron.bias.to_ne_bytes());
            }
        }
        Ok(out)
    }

    /// Decodes a network, allocating it from the stored topology.
    ///
    /// Every read is bounds-checked: a short buffer yields `TruncatedFile`
    /// and a header with fewer than two layers or a non-positive width
    /// yields `MalformedTopology`. Bytes past the declared length are
    /// ignored with a warning.
    pub fn decode(bytes: &[u8]) -> Result<Network> {
        let mut cursor = ByteCursor::new(bytes);

        let [layer_count] = cursor.take::<1>()?;
        if layer_count < 2 {
            return Err(Error::MalformedTopology(format!(
                "header declares {} layers, at least 2 are required",
                layer_count
            )));
        }
        cursor.expect(1 + 4 * layer_count as usize);

        let mut widths = Vec::with_capacity(layer_count as usize);
        for i in 0..layer_count {
            let width = i32::from_ne_bytes(cursor.take::<4>()?);
            if width <= 0 {
                return Err(Error::MalformedTopology(format!(
                    "layer {} has width {}",
                    i, width
                )));
            }
            widths.push(width as usize);
        }

        let total = encoded_len(&widths)
            .ok_or_else(|| Error::MalformedTopology("declared size overflows".to_owned()))?;
        // Checked before allocating so a corrupt header cannot request a huge buffer.
        cursor.expect(total);
        cursor.require(total)?;

        let topology = Topology::new(widths)?;
        let mut network: Network = Network::allocate(&topology)?;
        for layer in &mut network.layers[1..] {
            for neuron in &mut layer.neurons {
                for w in &mut neuron.weights {
                    *w = f32::from_ne_bytes(cursor.take::<4>()?);
                }
                neuron.bias = f32::from_ne_bytes(cursor.take::<4>()?);
            }
        }

        if cursor.remaining() > 0 {
            warn!(
                "ignoring {} trailing bytes after {} parameter bytes",
                cursor.remaining(),
                total
            );
        }
        Ok(network)
    }

    /// Writes the binary encoding to `writer`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.encode()?)?;
        writer.flush()?;
        Ok(())
    }

    /// Reads the whole of `reader` and decodes it.
    pub fn read_from<R: Read>(mut reader: R) -> Result<Network> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Network::decode(&bytes)
    }

    /// Saves the parameters to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(Error::io_at(path))?;
        self.write_to(BufWriter::new(file)).map_err(|e| match e {
            Error::Stream(source) => Error::Io {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        debug!("saved {} network to {}", self.topology(), path.display());
        Ok(())
    }

    /// Loads a network previously written by `save`.
    pub fn load(path: impl AsRef<Path>) -> Result<Network> {
        let path = path.as_ref();
        let file = File::open(path).map_err(Error::io_at(path))?;
        let mut bytes = Vec::new();
        BufReader::new(file)
            .read_to_end(&mut bytes)
            .map_err(Error::io_at(path))?;
        let network = Network::decode(&bytes)?;
        debug!("loaded {} network from {}", network.topology(), path.display());
        Ok(network)
    }
}

/// Bounds-checked reader over a byte slice.
struct ByteCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
    /// Length the header implies so far; reported on truncation.
    expected: usize,
}

impl<'a> ByteCursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        ByteCursor { bytes, pos: 0, expected: 1 }
    }

    fn expect(&mut self, len: usize) {
        self.expected = self.expected.max(len);
    }

    fn require(&self, len: usize) -> Result<()> {
        if self.bytes.len() < len {
            return Err(Error::TruncatedFile {
                expected: len,
                actual: self.bytes.len(),
            });
        }
        Ok(())
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        let end = self.pos + N;
        let chunk = self.bytes.get(self.pos..end).ok_or(Error::TruncatedFile {
            expected: self.expected.max(end),
            actual: self.bytes.len(),
        })?;
        let mut out = [0u8; N];
        out.copy_from_slice(chunk);
        self.pos = end;
        Ok(out)
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }
}
