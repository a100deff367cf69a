pub mod math;
pub mod activation;
pub mod error;
pub mod network;
pub mod loss;
pub mod persist;
pub mod data;
pub mod train;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::sigmoid::sigmoid;
pub use error::NetworkError;
pub use network::network::{argmax, Network};
pub use network::spec::NetworkSpec;
pub use loss::mse::MseLoss;
pub use data::encoding::Sample;
pub use persist::weights::{load_model, load_weights, save_model};
pub use train::{evaluate, train_loop, EpochStats, Evaluation, TrainConfig};
