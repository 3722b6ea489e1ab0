/// The logistic activation used by every non-input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sigmoid;

impl Sigmoid {
    /// `1 / (1 + e^-x)`
    #[inline]
    pub fn function(x: f32) -> f32 {
        1.0 / (1.0 + (-x).exp())
    }

    /// Derivative of the sigmoid expressed in terms of its own output.
    ///
    /// `a` must already be `sigmoid(z)`; the result is then `σ'(z) = a(1 - a)`.
    /// Passing a raw pre-activation here gives a meaningless value.
    #[inline]
    pub fn derivative_from_output(a: f32) -> f32 {
        a * (1.0 - a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn midpoint_is_one_half() {
        assert_eq!(Sigmoid::function(0.0), 0.5);
        assert_eq!(Sigmoid::derivative_from_output(0.5), 0.25);
    }

    #[test]
    fn saturates_without_overflow() {
        assert_abs_diff_eq!(Sigmoid::function(100.0), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(Sigmoid::function(-100.0), 0.0, epsilon = 1e-6);
        assert!(Sigmoid::function(-1000.0).is_finite());
    }

    #[test]
    fn derivative_matches_finite_difference() {
        for &z in &[-2.0f32, -0.3, 0.0, 0.7, 1.9] {
            let h = 1e-3;
            let numeric = (Sigmoid::function(z + h) - Sigmoid::function(z - h)) / (2.0 * h);
            let analytic = Sigmoid::derivative_from_output(Sigmoid::function(z));
            assert_abs_diff_eq!(numeric, analytic, epsilon = 1e-3);
        }
    }
}
