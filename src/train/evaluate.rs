use crate::data::encoding::Sample;
use crate::error::NetworkError;
use crate::loss::mse::MseLoss;
use crate::network::network::{argmax, Network};

/// Result of scoring a network against labelled samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub correct: usize,
    pub total: usize,
    /// Mean over samples of the summed squared output error.
    pub mean_squared_error: f64,
}

impl Evaluation {
    /// Fraction of samples classified correctly, in [0, 1]; `0.0` when empty.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64
    }
}

/// Predicts every sample and compares the top activation against its label.
///
/// Every target must have `output_count` entries; a shorter or longer one
/// fails with `DimensionMismatch`.
pub fn evaluate(network: &Network, samples: &[Sample]) -> Result<Evaluation, NetworkError> {
    let mut correct = 0;
    let mut total_error = 0.0;

    for sample in samples {
        if sample.target.len() != network.output_count() {
            return Err(NetworkError::mismatch("evaluate target", network.output_count(), sample.target.len()));
        }
        let output = network.predict(&sample.input)?.to_column_vec();
        if argmax(&output) == sample.label {
            correct += 1;
        }
        total_error += MseLoss::sum_squared_error(&output, &sample.target);
    }

    let total = samples.len();
    let mean_squared_error = if total == 0 { 0.0 } else { total_error / total as f64 };
    Ok(Evaluation { correct, total, mean_squared_error })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::matrix::Matrix;

    // Output unit 0 follows input 0, output unit 1 follows input 1.
    fn identity_like() -> Network {
        Network::from_weights(
            0.1,
            Matrix::from_rows(vec![vec![8.0, 0.0], vec![0.0, 8.0]]).unwrap(),
            Matrix::from_rows(vec![vec![8.0, -8.0], vec![-8.0, 8.0]]).unwrap(),
        ).unwrap()
    }

    #[test]
    fn counts_top_activation_matches() {
        let net = identity_like();
        let samples = vec![
            Sample { label: 0, input: vec![0.9, 0.1], target: vec![0.99, 0.01] },
            Sample { label: 1, input: vec![0.1, 0.9], target: vec![0.01, 0.99] },
            Sample { label: 1, input: vec![0.9, 0.1], target: vec![0.01, 0.99] },
        ];
        let eval = evaluate(&net, &samples).unwrap();
        assert_eq!(eval.correct, 2);
        assert_eq!(eval.total, 3);
        assert!((eval.accuracy() - 2.0 / 3.0).abs() < 1e-12);
        assert!(eval.mean_squared_error > 0.0);
    }

    #[test]
    fn target_length_must_match_outputs() {
        let net = identity_like();
        for target in [vec![0.99], vec![0.99, 0.01, 0.01]] {
            let samples = vec![Sample { label: 0, input: vec![0.9, 0.1], target }];
            let err = evaluate(&net, &samples).unwrap_err();
            assert!(matches!(err, NetworkError::DimensionMismatch { .. }));
        }
    }

    #[test]
    fn empty_set_scores_zero() {
        let eval = evaluate(&identity_like(), &[]).unwrap();
        assert_eq!(eval.total, 0);
        assert_eq!(eval.accuracy(), 0.0);
    }
}
