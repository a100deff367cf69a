use rand::Rng;

use crate::activation::sigmoid::{activate, sigmoid_prime};
use crate::error::NetworkError;
use crate::math::matrix::Matrix;
use crate::network::init::fan_in_uniform;
use crate::network::spec::NetworkSpec;

/// Single-hidden-layer perceptron with sigmoid units, trained one sample at a time.
///
/// `hidden_weights` is `hidden_count x input_count` and `output_weights` is
/// `output_count x hidden_count`. They are the only state that changes after
/// construction; `train` replaces both wholesale.
#[derive(Debug, Clone)]
pub struct Network {
    input_count: usize,
    hidden_count: usize,
    output_count: usize,
    learning_rate: f64,
    hidden_weights: Matrix,
    output_weights: Matrix,
}

/// Activations kept from a forward pass for the backward pass.
struct ForwardPass {
    inputs: Matrix,
    hidden_outputs: Matrix,
    final_outputs: Matrix,
}

impl Network {
    /// Builds a network with fan-in scaled random weights drawn from the thread RNG.
    pub fn new(
        input_count: usize,
        hidden_count: usize,
        output_count: usize,
        learning_rate: f64,
    ) -> Result<Network, NetworkError> {
        Network::with_rng(input_count, hidden_count, output_count, learning_rate, &mut rand::thread_rng())
    }

    /// Same as [`Network::new`] but draws weights from `rng`, so a seeded RNG
    /// gives reproducible networks.
    pub fn with_rng<R: Rng + ?Sized>(
        input_count: usize,
        hidden_count: usize,
        output_count: usize,
        learning_rate: f64,
        rng: &mut R,
    ) -> Result<Network, NetworkError> {
        validate(input_count, hidden_count, output_count, learning_rate)?;
        let hidden_weights = fan_in_uniform(hidden_count, input_count, rng);
        let output_weights = fan_in_uniform(output_count, hidden_count, rng);
        Ok(Network {
            input_count,
            hidden_count,
            output_count,
            learning_rate,
            hidden_weights,
            output_weights,
        })
    }

    /// Builds a network around explicit weight matrices. Layer sizes are read
    /// from the matrix shapes.
    pub fn from_weights(
        learning_rate: f64,
        hidden_weights: Matrix,
        output_weights: Matrix,
    ) -> Result<Network, NetworkError> {
        let (hidden_count, input_count) = hidden_weights.shape();
        let output_count = output_weights.rows();
        validate(input_count, hidden_count, output_count, learning_rate)?;
        if output_weights.cols() != hidden_count {
            return Err(NetworkError::mismatch(
                "from_weights",
                format!("output weights with {} columns", hidden_count),
                format!("{} columns", output_weights.cols()),
            ));
        }
        Ok(Network {
            input_count,
            hidden_count,
            output_count,
            learning_rate,
            hidden_weights,
            output_weights,
        })
    }

    pub fn from_spec(spec: &NetworkSpec) -> Result<Network, NetworkError> {
        Network::new(spec.input_count, spec.hidden_count, spec.output_count, spec.learning_rate)
    }

    pub fn spec(&self) -> NetworkSpec {
        NetworkSpec {
            input_count: self.input_count,
            hidden_count: self.hidden_count,
            output_count: self.output_count,
            learning_rate: self.learning_rate,
        }
    }

    pub fn input_count(&self) -> usize {
        self.input_count
    }

    pub fn hidden_count(&self) -> usize {
        self.hidden_count
    }

    pub fn output_count(&self) -> usize {
        self.output_count
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn hidden_weights(&self) -> &Matrix {
        &self.hidden_weights
    }

    pub fn output_weights(&self) -> &Matrix {
        &self.output_weights
    }

    /// Replaces both weight matrices. Shapes must match the configured layer
    /// sizes exactly; nothing is changed on error.
    pub fn set_weights(&mut self, hidden_weights: Matrix, output_weights: Matrix) -> Result<(), NetworkError> {
        let expected_hidden = (self.hidden_count, self.input_count);
        let expected_output = (self.output_count, self.hidden_count);
        if hidden_weights.shape() != expected_hidden {
            return Err(NetworkError::mismatch(
                "set_weights (hidden)",
                format!("{}x{}", expected_hidden.0, expected_hidden.1),
                format!("{}x{}", hidden_weights.rows(), hidden_weights.cols()),
            ));
        }
        if output_weights.shape() != expected_output {
            return Err(NetworkError::mismatch(
                "set_weights (output)",
                format!("{}x{}", expected_output.0, expected_output.1),
                format!("{}x{}", output_weights.rows(), output_weights.cols()),
            ));
        }
        self.hidden_weights = hidden_weights;
        self.output_weights = output_weights;
        Ok(())
    }

    /// Forward pass only. Returns the `output_count x 1` activations, each in `(0, 1)`.
    pub fn predict(&self, input: &[f64]) -> Result<Matrix, NetworkError> {
        let inputs = self.input_column(input)?;
        Ok(self.forward(inputs)?.final_outputs)
    }

    /// Index of the strongest output for `input`.
    pub fn classify(&self, input: &[f64]) -> Result<usize, NetworkError> {
        Ok(argmax(&self.predict(input)?.to_column_vec()))
    }

    /// One online backpropagation step on a single (input, target) pair.
    ///
    /// Both weight deltas are derived from the weights as they were before the
    /// call; the new matrices are only assigned once every delta is computed.
    pub fn train(&mut self, input: &[f64], target: &[f64]) -> Result<(), NetworkError> {
        let inputs = self.input_column(input)?;
        if target.len() != self.output_count {
            return Err(NetworkError::mismatch("train target", self.output_count, target.len()));
        }
        let targets = Matrix::column(target);

        let ForwardPass { inputs, hidden_outputs, final_outputs } = self.forward(inputs)?;

        let output_errors = targets.sub(&final_outputs)?;
        // Uses output weights before this step's update.
        let hidden_errors = self.output_weights.transpose().product(&output_errors)?;

        // Δw = lr · (E ⊙ y(1 - y)) · prevᵀ
        let delta_output = output_errors
            .hadamard(&sigmoid_prime(&final_outputs)?)?
            .product(&hidden_outputs.transpose())?
            .scale(self.learning_rate);
        let delta_hidden = hidden_errors
            .hadamard(&sigmoid_prime(&hidden_outputs)?)?
            .product(&inputs.transpose())?
            .scale(self.learning_rate);

        let output_weights = self.output_weights.add(&delta_output)?;
        let hidden_weights = self.hidden_weights.add(&delta_hidden)?;

        self.output_weights = output_weights;
        self.hidden_weights = hidden_weights;
        Ok(())
    }

    fn input_column(&self, input: &[f64]) -> Result<Matrix, NetworkError> {
        if input.len() != self.input_count {
            return Err(NetworkError::mismatch("network input", self.input_count, input.len()));
        }
        Ok(Matrix::column(input))
    }

    fn forward(&self, inputs: Matrix) -> Result<ForwardPass, NetworkError> {
        let hidden_inputs = self.hidden_weights.product(&inputs)?;
        let hidden_outputs = activate(&hidden_inputs);
        let final_inputs = self.output_weights.product(&hidden_outputs)?;
        let final_outputs = activate(&final_inputs);
        Ok(ForwardPass { inputs, hidden_outputs, final_outputs })
    }
}

/// Index of the maximum value; the first index wins ties, `0` for an empty slice.
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}

fn validate(
    input_count: usize,
    hidden_count: usize,
    output_count: usize,
    learning_rate: f64,
) -> Result<(), NetworkError> {
    for (name, count) in [("input_count", input_count), ("hidden_count", hidden_count), ("output_count", output_count)] {
        if count == 0 {
            return Err(NetworkError::InvalidConfiguration(format!("{} must be positive, got 0", name)));
        }
    }
    if !(learning_rate.is_finite() && learning_rate > 0.0) {
        return Err(NetworkError::InvalidConfiguration(format!(
            "learning_rate must be a positive finite number, got {}",
            learning_rate
        )));
    }
    Ok(())
}
