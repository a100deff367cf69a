use std::sync::atomic::Ordering;
use std::time::Instant;

use rand::seq::SliceRandom;

use crate::data::encoding::Sample;
use crate::error::NetworkError;
use crate::network::network::Network;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

/// Trains `network` for `config.epochs` online passes over `samples`, one
/// `Network::train` call per sample, and returns the stats of every
/// completed epoch.
///
/// # Early termination
/// The loop stops early if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true` (checked before every sample; the
///   interrupted epoch is not reported).
///
/// # Errors
/// The first failing training step aborts the run; the weights keep every
/// update made before it.
pub fn train_loop(
    network: &mut Network,
    samples: &[Sample],
    config: &TrainConfig,
) -> Result<Vec<EpochStats>, NetworkError> {
    let mut history = Vec::with_capacity(config.epochs);
    let mut order: Vec<usize> = (0..samples.len()).collect();

    for epoch in 1..=config.epochs {
        let t_start = Instant::now();

        if config.shuffle {
            order.shuffle(&mut rand::thread_rng());
        }

        let mut stopped = false;
        for &idx in &order {
            if stop_requested(config) {
                stopped = true;
                break;
            }
            let sample = &samples[idx];
            network.train(&sample.input, &sample.target)?;
        }
        if stopped {
            break;
        }

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            samples: samples.len(),
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        history.push(stats.clone());

        if let Some(ref tx) = config.progress_tx {
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                break;
            }
        }
    }

    Ok(history)
}

fn stop_requested(config: &TrainConfig) -> bool {
    config.stop_flag
        .as_ref()
        .map(|flag| flag.load(Ordering::Relaxed))
        .unwrap_or(false)
}
