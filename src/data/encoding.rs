//! Encoding shared by the dataset reader and the image decoder.
//!
//! Raw intensities in `[0, 255]` map onto `[0.01, 1.0]` so that no input is
//! exactly zero. Targets use `0.99` for the true class and `0.01` elsewhere,
//! values the sigmoid output can actually reach.

pub const TARGET_ON: f64 = 0.99;
pub const TARGET_OFF: f64 = 0.01;

/// `value / 255 * 0.99 + 0.01`
pub fn scale_pixel(value: f64) -> f64 {
    value / 255.0 * 0.99 + 0.01
}

/// Inverts an 8-bit intensity (`255 - value`) before scaling it.
///
/// Rendered images are dark-on-light while the training corpus is
/// light-on-dark.
pub fn scale_inverted_pixel(value: u8) -> f64 {
    scale_pixel(f64::from(255 - value))
}

/// Target vector of length `class_count`: all `0.01` except `0.99` at `label`.
pub fn one_hot_target(label: usize, class_count: usize) -> Vec<f64> {
    let mut target = vec![TARGET_OFF; class_count];
    if let Some(slot) = target.get_mut(label) {
        *slot = TARGET_ON;
    }
    target
}

/// One labelled record, already encoded for the network.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub label: usize,
    pub input: Vec<f64>,
    pub target: Vec<f64>,
}

impl Sample {
    /// Encodes raw `[0, 255]` pixels and a class label.
    pub fn from_raw(label: usize, pixels: &[f64], class_count: usize) -> Sample {
        Sample {
            label,
            input: pixels.iter().map(|&p| scale_pixel(p)).collect(),
            target: one_hot_target(label, class_count),
        }
    }
}
