/// Index of the maximum element in a slice.
///
/// Ties resolve to the lowest index, so a network whose outputs are all
/// equal predicts class 0. Returns 0 for an empty slice.
pub fn argmax(v: &[f32]) -> usize {
    let mut best = 0;
    for (i, &x) in v.iter().enumerate().skip(1) {
        if x > v[best] {
            best = i;
        }
    }
    best
}

/// Overwrites `out` with a one-hot encoding of `class`.
///
/// # Panics
/// Panics if `class >= out.len()`.
pub fn one_hot_into(out: &mut [f32], class: usize) {
    assert!(
        class < out.len(),
        "class {} is out of range for {} outputs",
        class,
        out.len()
    );
    out.fill(0.0);
    out[class] = 1.0;
}
