pub mod csv;
pub mod encoding;
pub mod error;
pub mod image;

pub use encoding::{one_hot_target, scale_pixel, Sample};
pub use error::DatasetError;
