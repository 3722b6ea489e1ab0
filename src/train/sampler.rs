use rand::Rng;

/// Draws mini-batches of dataset indices without replacement.
///
/// Keeps a permutation of `0..total` split by a cursor into a drawn prefix
/// and an undrawn suffix. Each draw swaps a uniformly chosen undrawn index
/// to the cursor (a lazy Fisher-Yates shuffle), so every index appears
/// exactly once per pass. A new pass continues from the permutation left by
/// the previous one rather than restarting from the identity.
#[derive(Debug, Clone)]
pub struct BatchSampler {
    index: Vec<usize>,
    used: usize,
    passes: usize,
}

impl BatchSampler {
    pub fn new(total: usize) -> BatchSampler {
        BatchSampler {
            index: (0..total).collect(),
            used: 0,
            passes: 0,
        }
    }

    pub fn total(&self) -> usize {
        self.index.len()
    }

    /// Indices still undrawn in the current pass.
    pub fn remaining(&self) -> usize {
        self.index.len() - self.used
    }

    /// Number of passes that have been fully drawn.
    pub fn completed_passes(&self) -> usize {
        self.passes
    }

    /// Draws up to `batch_size` indices.
    ///
    /// If the current pass is already exhausted when the call starts, a new
    /// pass begins. If it runs out part-way through the call, the batch is
    /// returned short rather than mixing two passes, so the result may hold
    /// fewer than `batch_size` indices. An empty sampler returns an empty
    /// batch.
    pub fn next_batch<G: Rng + ?Sized>(&mut self, batch_size: usize, rng: &mut G) -> Vec<usize> {
        let total = self.index.len();
        let mut batch = Vec::with_capacity(batch_size.min(total));
        for slot in 0..batch_size {
            if self.used == total {
                if slot == 0 && total > 0 {
                    self.used = 0;
                } else {
                    break;
                }
            }
            let r = rng.gen_range(self.used..total);
            self.index.swap(r, self.used);
            batch.push(self.index[self.used]);
            self.used += 1;
            if self.used == total {
                self.passes += 1;
            }
        }
        batch
    }
}
