//! Fixed-size labeled digit records.
//!
//! A dataset file is a flat concatenation of 785-byte records: one label
//! byte (0-9) followed by 784 row-major pixel intensities (0-255) of a
//! 28x28 grayscale image. There is no header.

use std::fs;
use std::path::Path;

use log::info;

use crate::error::{Error, Result};
use crate::network::Topology;

pub const IMAGE_SIDE: usize = 28;
pub const PIXELS: usize = IMAGE_SIDE * IMAGE_SIDE;
pub const RECORD_LEN: usize = 1 + PIXELS;
pub const CLASSES: usize = 10;

/// An in-memory dataset of digit records.
#[derive(Debug, Clone)]
pub struct Dataset {
    bytes: Vec<u8>,
}

/// Borrowed view of one record.
#[derive(Debug, Clone, Copy)]
pub struct Digit<'a> {
    record: &'a [u8],
}

impl Dataset {
    /// Reads an entire dataset file into memory.
    pub fn load(path: impl AsRef<Path>) -> Result<Dataset> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(Error::io_at(path))?;
        let dataset = Dataset::from_bytes(bytes)?;
        info!("loaded {} records from {}", dataset.len(), path.display());
        Ok(dataset)
    }

    /// Validates raw record bytes: the length must be a multiple of the
    /// record size and every label must name one of the ten classes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Dataset> {
        if bytes.len() % RECORD_LEN != 0 {
            return Err(Error::MalformedDataset(format!(
                "{} bytes is not a whole number of {}-byte records ({} left over)",
                bytes.len(),
                RECORD_LEN,
                bytes.len() % RECORD_LEN
            )));
        }
        if let Some((i, record)) = bytes
            .chunks_exact(RECORD_LEN)
            .enumerate()
            .find(|(_, r)| r[0] as usize >= CLASSES)
        {
            return Err(Error::MalformedDataset(format!(
                "record {} has label {}, expected 0-{}",
                i,
                record[0],
                CLASSES - 1
            )));
        }
        Ok(Dataset { bytes })
    }

    pub fn len(&self) -> usize {
        self.bytes.len() / RECORD_LEN
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Record `index`, or `None` if out of range.
    pub fn get(&self, index: usize) -> Option<Digit<'_>> {
        let start = index.checked_mul(RECORD_LEN)?;
        let record = self.bytes.get(start..start + RECORD_LEN)?;
        Some(Digit { record })
    }

    pub fn iter(&self) -> impl Iterator<Item = Digit<'_>> {
        self.bytes.chunks_exact(RECORD_LEN).map(|record| Digit { record })
    }
}

/// Checks that a network can read digit records and emit one output per class.
pub fn check_topology(topology: &Topology) -> Result<()> {
    if topology.input_width() != PIXELS {
        return Err(Error::ShapeMismatch {
            expected: PIXELS,
            actual: topology.input_width(),
        });
    }
    if topology.output_width() != CLASSES {
        return Err(Error::ShapeMismatch {
            expected: CLASSES,
            actual: topology.output_width(),
        });
    }
    Ok(())
}

impl<'a> Digit<'a> {
    pub fn label(&self) -> usize {
        self.record[0] as usize
    }

    pub fn pixels(&self) -> &'a [u8] {
        &self.record[1..]
    }

    /// Writes the pixels scaled to `[0, 1]` into `out`.
    ///
    /// # Panics
    /// Panics if `out` is not exactly `PIXELS` long.
    pub fn normalize_into(&self, out: &mut [f32]) {
        assert_eq!(out.len(), PIXELS, "pixel buffer must hold {} values", PIXELS);
        for (o, &p) in out.iter_mut().zip(self.pixels()) {
            *o = p as f32 / 255.0;
        }
    }
}
