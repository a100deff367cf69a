use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::NetworkError;

/// Layer sizes and learning rate of a network, without its weights.
///
/// Saved as `spec.json` next to the weight artifacts so a model directory can
/// be turned back into a network of the right shape before the weights are
/// loaded into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub input_count: usize,
    pub hidden_count: usize,
    pub output_count: usize,
    pub learning_rate: f64,
}

impl NetworkSpec {
    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), NetworkError> {
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file written by `save_json`.
    pub fn load_json(path: impl AsRef<Path>) -> Result<NetworkSpec, NetworkError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|e| NetworkError::Persistence(format!("{}: {}", path.display(), e)))?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
