use crate::error::NetworkError;
use crate::math::matrix::Matrix;

/// Logistic function `1 / (1 + e^-z)`.
///
/// Strictly inside `(0, 1)` only while `f64` can tell the result apart from the
/// bounds: it rounds to exactly `1.0` from `z ≈ 36.8` upward, and `e^-z`
/// overflows to infinity below `z ≈ -709.8`, giving exactly `0.0`.
pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Sigmoid applied to every entry of `m`.
pub fn activate(m: &Matrix) -> Matrix {
    m.map_indexed(|_, _, z| sigmoid(z))
}

/// Derivative of the sigmoid expressed through its own output: `y ⊙ (1 - y)`.
///
/// `activated` must already hold sigmoid outputs, not pre-activations.
pub fn sigmoid_prime(activated: &Matrix) -> Result<Matrix, NetworkError> {
    let one_minus = activated.scale(-1.0).add_scalar(1.0);
    activated.hadamard(&one_minus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn sigmoid_of_zero_is_half() {
        assert_eq!(sigmoid(0.0), 0.5);
    }

    #[test]
    fn sigmoid_is_increasing_and_bounded() {
        let mut prev = sigmoid(-30.0);
        assert!(prev > 0.0);
        for step in -299..=300 {
            let y = sigmoid(step as f64 / 10.0);
            assert!(y > prev, "not increasing at z = {}", step as f64 / 10.0);
            assert!(y > 0.0 && y < 1.0);
            prev = y;
        }
    }

    #[test]
    fn sigmoid_saturates_only_at_f64_limits() {
        assert!(sigmoid(36.0) < 1.0);
        assert_eq!(sigmoid(37.0), 1.0);
        assert!(sigmoid(-709.0) > 0.0);
        assert_eq!(sigmoid(-710.0), 0.0);
        assert_eq!(sigmoid(f64::MAX), 1.0);
        assert_eq!(sigmoid(f64::MIN), 0.0);
    }

    #[test]
    fn sigmoid_prime_matches_analytic_derivative() {
        let z = Matrix::column(&[-2.0, 0.0, 1.5]);
        let y = activate(&z);
        let d = sigmoid_prime(&y).unwrap();
        for (i, zi) in [-2.0f64, 0.0, 1.5].iter().enumerate() {
            let expected = (-zi).exp() / (1.0 + (-zi).exp()).powi(2);
            assert_abs_diff_eq!(d.get(i, 0).unwrap(), expected, epsilon = 1e-12);
        }
        assert_eq!(d.get(1, 0), Some(0.25));
    }
}
