pub mod weights;

pub use weights::{load_model, load_weights, read_matrix, save_model, write_matrix};
