use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::NetworkError;
use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::network::spec::NetworkSpec;

const MAGIC: &[u8; 4] = b"FMLP";
const VERSION: u32 = 1;

pub const SPEC_FILE: &str = "spec.json";
pub const HIDDEN_WEIGHTS_FILE: &str = "hidden.weights";
pub const OUTPUT_WEIGHTS_FILE: &str = "output.weights";

// ---------------------------------------------------------------------------
// Single matrix codec
// ---------------------------------------------------------------------------

/// Writes `m` as one binary artifact.
///
/// Layout (little-endian): magic `FMLP`, version `u32`, rows `u64`, cols `u64`,
/// then `rows * cols` `f64` values in row-major order.
pub fn write_matrix<W: Write>(writer: &mut W, m: &Matrix) -> Result<(), NetworkError> {
    writer.write_all(MAGIC)?;
    writer.write_all(&VERSION.to_le_bytes())?;
    writer.write_all(&(m.rows() as u64).to_le_bytes())?;
    writer.write_all(&(m.cols() as u64).to_le_bytes())?;
    for value in m.iter() {
        writer.write_all(&value.to_le_bytes())?;
    }
    Ok(())
}

/// Reads one artifact written by [`write_matrix`].
pub fn read_matrix<R: Read>(reader: &mut R) -> Result<Matrix, NetworkError> {
    let mut magic = [0u8; 4];
    read_exact(reader, &mut magic, "magic")?;
    if &magic != MAGIC {
        return Err(NetworkError::Persistence(format!("bad magic {:?}, not a weight file", magic)));
    }

    let mut buf4 = [0u8; 4];
    read_exact(reader, &mut buf4, "version")?;
    let version = u32::from_le_bytes(buf4);
    if version != VERSION {
        return Err(NetworkError::Persistence(format!("unsupported weight format version {}", version)));
    }

    let mut buf8 = [0u8; 8];
    read_exact(reader, &mut buf8, "row count")?;
    let rows = u64::from_le_bytes(buf8) as usize;
    read_exact(reader, &mut buf8, "column count")?;
    let cols = u64::from_le_bytes(buf8) as usize;

    let len = rows.checked_mul(cols)
        .ok_or_else(|| NetworkError::Persistence(format!("shape {}x{} overflows", rows, cols)))?;

    let mut values = Vec::new();
    for i in 0..len {
        read_exact(reader, &mut buf8, "matrix data")
            .map_err(|_| NetworkError::Persistence(format!(
                "truncated matrix data: expected {} values, found {}", len, i
            )))?;
        values.push(f64::from_le_bytes(buf8));
    }

    Matrix::from_row_major(rows, cols, &values)
}

fn read_exact<R: Read>(reader: &mut R, buf: &mut [u8], what: &str) -> Result<(), NetworkError> {
    reader.read_exact(buf)
        .map_err(|e| NetworkError::Persistence(format!("failed to read {}: {}", what, e)))
}

pub fn save_matrix(path: impl AsRef<Path>, m: &Matrix) -> Result<(), NetworkError> {
    let path = path.as_ref();
    let file = File::create(path)
        .map_err(|e| NetworkError::Persistence(format!("{}: {}", path.display(), e)))?;
    let mut writer = BufWriter::new(file);
    write_matrix(&mut writer, m)?;
    writer.flush()?;
    Ok(())
}

pub fn load_matrix(path: impl AsRef<Path>) -> Result<Matrix, NetworkError> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| NetworkError::Persistence(format!("{}: {}", path.display(), e)))?;
    read_matrix(&mut BufReader::new(file))
}

// ---------------------------------------------------------------------------
// Model directory
// ---------------------------------------------------------------------------

/// Writes `spec.json`, `hidden.weights` and `output.weights` into `dir`,
/// creating the directory if needed.
pub fn save_model(network: &Network, dir: impl AsRef<Path>) -> Result<(), NetworkError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)
        .map_err(|e| NetworkError::Persistence(format!("{}: {}", dir.display(), e)))?;
    network.spec().save_json(dir.join(SPEC_FILE))?;
    save_matrix(dir.join(HIDDEN_WEIGHTS_FILE), network.hidden_weights())?;
    save_matrix(dir.join(OUTPUT_WEIGHTS_FILE), network.output_weights())?;
    Ok(())
}

/// Loads both weight artifacts from `dir` into an existing network.
///
/// Fails with `DimensionMismatch` if the stored shapes differ from the
/// network's layer sizes; the network is left unchanged on any error.
pub fn load_weights(network: &mut Network, dir: impl AsRef<Path>) -> Result<(), NetworkError> {
    let dir = dir.as_ref();
    let hidden = load_matrix(dir.join(HIDDEN_WEIGHTS_FILE))?;
    let output = load_matrix(dir.join(OUTPUT_WEIGHTS_FILE))?;
    network.set_weights(hidden, output)
}

/// Rebuilds a network from `spec.json` and loads its weights.
pub fn load_model(dir: impl AsRef<Path>) -> Result<Network, NetworkError> {
    let dir = dir.as_ref();
    let spec = NetworkSpec::load_json(dir.join(SPEC_FILE))?;
    let mut network = Network::from_spec(&spec)?;
    load_weights(&mut network, dir)?;
    Ok(network)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(m: &Matrix) -> Vec<u8> {
        let mut buf = Vec::new();
        write_matrix(&mut buf, m).unwrap();
        buf
    }

    #[test]
    fn header_layout() {
        let m = Matrix::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        let buf = encode(&m);
        assert_eq!(buf.len(), 4 + 4 + 8 + 8 + 6 * 8);
        assert_eq!(&buf[0..4], b"FMLP");
        assert_eq!(u32::from_le_bytes(buf[4..8].try_into().unwrap()), 1);
        assert_eq!(u64::from_le_bytes(buf[8..16].try_into().unwrap()), 2);
        assert_eq!(u64::from_le_bytes(buf[16..24].try_into().unwrap()), 3);
        // row-major: the second value is row 0, column 1
        assert_eq!(f64::from_le_bytes(buf[32..40].try_into().unwrap()), 2.0);
    }

    #[test]
    fn decodes_what_it_encodes() {
        let m = Matrix::from_rows(vec![vec![0.1, -7.25], vec![f64::MIN_POSITIVE, 1e300]]).unwrap();
        let back = read_matrix(&mut encode(&m).as_slice()).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn truncated_data_is_rejected() {
        let m = Matrix::filled(3, 3, 0.5);
        let buf = encode(&m);
        let cut = &buf[..buf.len() - 4];
        let err = read_matrix(&mut &cut[..]).unwrap_err();
        assert!(matches!(err, NetworkError::Persistence(_)));
        assert!(err.to_string().contains("truncated"));

        let header_only = &buf[..10];
        assert!(matches!(read_matrix(&mut &header_only[..]), Err(NetworkError::Persistence(_))));
    }

    #[test]
    fn foreign_or_future_files_are_rejected() {
        let mut buf = encode(&Matrix::filled(1, 1, 1.0));
        buf[0] = b'X';
        assert!(read_matrix(&mut buf.as_slice()).is_err());

        let mut buf = encode(&Matrix::filled(1, 1, 1.0));
        buf[4] = 9;
        let err = read_matrix(&mut buf.as_slice()).unwrap_err();
        assert!(err.to_string().contains("version"));
    }

    #[test]
    fn missing_model_directory_is_a_persistence_error() {
        let dir = std::env::temp_dir().join("ferrite-mlp-missing-model-dir");
        let mut net = Network::new(2, 2, 2, 0.1).unwrap();
        assert!(matches!(load_weights(&mut net, &dir), Err(NetworkError::Persistence(_))));
        assert!(matches!(load_model(&dir), Err(NetworkError::Persistence(_))));
    }
}
