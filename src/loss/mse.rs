pub struct MseLoss;

impl MseLoss {
    /// Sum of squared errors: Σ(predicted - expected)²
    pub fn sum_squared_error(predicted: &[f64], expected: &[f64]) -> f64 {
        predicted.iter().zip(expected.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum()
    }

    /// Scalar MSE: mean((predicted - expected)²)
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        let n = predicted.len() as f64;
        MseLoss::sum_squared_error(predicted, expected) / n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squared_error_and_mean() {
        let p = [0.5, 0.25];
        let e = [1.0, 0.0];
        assert_eq!(MseLoss::sum_squared_error(&p, &e), 0.3125);
        assert_eq!(MseLoss::loss(&p, &e), 0.15625);
    }
}
