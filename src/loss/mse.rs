/// Sum-of-squares error, `Σ (a_j - t_j)²`.
///
/// Unlike a mean-squared error this is not divided by the output width, so
/// its derivative is exactly `2(a - t)`.
pub struct SquaredError;

impl SquaredError {
    pub fn loss(predicted: &[f32], expected: &[f32]) -> f32 {
        predicted
            .iter()
            .zip(expected)
            .map(|(a, t)| (a - t) * (a - t))
            .sum()
    }

    /// Gradient of the loss with respect to one output activation.
    #[inline]
    pub fn derivative(predicted: f32, expected: f32) -> f32 {
        2.0 * (predicted - expected)
    }
}
