//! Command-line driver: trains on the MNIST CSV dump or scores a saved model.
//!
//!   cargo run --release -- --mnist train
//!   cargo run --release -- --mnist predict
//!   cargo run --release -- --image digit.png

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use ferrite_mlp::data::csv::load_mnist_csv;
use ferrite_mlp::data::image::load_digit_image;
use ferrite_mlp::{argmax, evaluate, load_weights, save_model, train_loop, Network, NetworkError, TrainConfig};

// 28 x 28 pixels, one input per pixel; digits 0 to 9.
const IMAGE_SIDE: u32 = 28;
const INPUT_COUNT: usize = (IMAGE_SIDE * IMAGE_SIDE) as usize;
const CLASS_COUNT: usize = 10;

#[derive(Parser, Debug)]
#[command(name = "ferrite-mlp", version, about = "Single-hidden-layer perceptron for MNIST digits")]
struct Cli {
    /// Either `train` or `predict`; any other value does nothing
    #[arg(long, default_value = "")]
    mnist: String,

    /// Classify a single 28x28 image with the saved weights
    #[arg(long)]
    image: Option<PathBuf>,

    #[arg(long, default_value = "mnist_dataset/mnist_train.csv")]
    train_data: PathBuf,

    #[arg(long, default_value = "mnist_dataset/mnist_test.csv")]
    test_data: PathBuf,

    /// Directory holding spec.json, hidden.weights and output.weights
    #[arg(long, default_value = "data")]
    model_dir: PathBuf,

    #[arg(long, default_value_t = 5)]
    epochs: usize,

    #[arg(long, default_value_t = 200)]
    hidden: usize,

    #[arg(long, default_value_t = 0.1)]
    learning_rate: f64,

    /// Seed for the initial weights; random when omitted
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut net = match cli.seed {
        Some(seed) => Network::with_rng(INPUT_COUNT, cli.hidden, CLASS_COUNT, cli.learning_rate, &mut StdRng::seed_from_u64(seed)),
        None => Network::new(INPUT_COUNT, cli.hidden, CLASS_COUNT, cli.learning_rate),
    }
    .context("invalid network configuration")?;

    let mut weights_loaded = false;
    match cli.mnist.as_str() {
        "train" => {
            mnist_train(&mut net, &cli)?;
            save_model(&net, &cli.model_dir)
                .with_context(|| format!("cannot save model to {}", cli.model_dir.display()))?;
            weights_loaded = true;
        }
        "predict" => {
            restore_weights(&mut net, &cli.model_dir)?;
            weights_loaded = true;
            mnist_predict(&net, &cli.test_data)?;
        }
        _ => {}
    }

    if let Some(path) = &cli.image {
        if !weights_loaded {
            restore_weights(&mut net, &cli.model_dir)?;
        }
        let class = predict_image(&net, path)?;
        println!("prediction: {}", class);
    }

    Ok(())
}

fn mnist_train(net: &mut Network, cli: &Cli) -> Result<()> {
    let samples = load_mnist_csv(&cli.train_data, INPUT_COUNT, CLASS_COUNT)
        .with_context(|| format!("cannot read training data {}", cli.train_data.display()))?;

    let t1 = Instant::now();
    let history = train_loop(net, &samples, &TrainConfig::new(cli.epochs))?;
    for stats in &history {
        println!("epoch {}/{}: {} samples in {} ms", stats.epoch, stats.total_epochs, stats.samples, stats.elapsed_ms);
    }
    println!("\nTime taken to train: {:?}", t1.elapsed());
    Ok(())
}

fn mnist_predict(net: &Network, test_data: &Path) -> Result<()> {
    let samples = load_mnist_csv(test_data, INPUT_COUNT, CLASS_COUNT)
        .with_context(|| format!("cannot read test data {}", test_data.display()))?;

    let t1 = Instant::now();
    let eval = evaluate(net, &samples)?;
    println!("Time taken to check: {:?}", t1.elapsed());
    println!("score: {} / {} ({:.2}%)", eval.correct, eval.total, eval.accuracy() * 100.0);
    Ok(())
}

/// Prints the output column for the image at `path` and returns the winning class.
fn predict_image(net: &Network, path: &Path) -> Result<usize> {
    let input = load_digit_image(path, IMAGE_SIDE, IMAGE_SIDE)
        .with_context(|| format!("cannot read image {}", path.display()))?;
    let output = net.predict(&input)?.to_column_vec();
    for (digit, activation) in output.iter().enumerate() {
        println!("{}: {:.4}", digit, activation);
    }
    Ok(argmax(&output))
}

/// Loads saved weights. A missing or unreadable model is reported and the
/// run continues with the freshly initialized weights; a model of another
/// shape is fatal.
fn restore_weights(net: &mut Network, model_dir: &Path) -> Result<()> {
    match load_weights(net, model_dir) {
        Ok(()) => Ok(()),
        Err(NetworkError::Persistence(msg)) => {
            eprintln!("warning: no usable saved weights in {} ({}); using fresh weights", model_dir.display(), msg);
            Ok(())
        }
        Err(e) => Err(e).with_context(|| format!("saved model in {} does not fit this network", model_dir.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn image_prediction_is_top_activation_of_single_pass() {
        let path = std::env::temp_dir().join(format!("ferrite-mlp-digit-{}.png", std::process::id()));
        let mut img = GrayImage::from_pixel(IMAGE_SIDE, IMAGE_SIDE, Luma([255]));
        for y in 4..24 {
            img.put_pixel(14, y, Luma([0]));
        }
        img.save(&path).unwrap();

        let net = Network::with_rng(INPUT_COUNT, 16, CLASS_COUNT, 0.1, &mut StdRng::seed_from_u64(8)).unwrap();
        let input = load_digit_image(&path, IMAGE_SIDE, IMAGE_SIDE).unwrap();
        let class = predict_image(&net, &path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(class, argmax(&net.predict(&input).unwrap().to_column_vec()));
        assert_eq!(class, net.classify(&input).unwrap());
    }
}
