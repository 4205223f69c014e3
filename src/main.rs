//! XOR demonstration: trains a small sigmoid network with cross-entropy cost
//! and prints its parameters and predictions as training progresses.
//!
//! Usage: `backprop-nn [network-spec.json] [train-config.json]`

use std::time::{SystemTime, UNIX_EPOCH};

use backprop_nn::{
    ActivationFunction, CostFunction, LayerSpec, Matrix, Network, NetworkSpec, SharedRandom,
    TrainConfig, TrainMode, TrainingPair,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const REPORT_EVERY: usize = 10_000;

fn default_spec() -> NetworkSpec {
    NetworkSpec::new(
        CostFunction::CrossEntropy,
        0.005,
        (-1.0, 1.0),
        (-1.0, 1.0),
        2,
        vec![
            LayerSpec::new(2, ActivationFunction::Sigmoid),
            LayerSpec::new(2, ActivationFunction::Sigmoid),
            LayerSpec::new(1, ActivationFunction::Sigmoid),
        ],
    )
}

fn xor_data() -> Vec<TrainingPair> {
    [([1.0, 1.0], 0.0), ([1.0, 0.0], 1.0), ([0.0, 1.0], 1.0), ([0.0, 0.0], 0.0)]
        .iter()
        .map(|(x, y)| (Matrix::from_column(x), Matrix::from_column(&[*y])))
        .collect()
}

fn main() -> backprop_nn::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let spec = match args.next() {
        Some(path) => NetworkSpec::load_json(&path)?,
        None => default_spec(),
    };
    let config = match args.next() {
        Some(path) => TrainConfig::load_json(&path)?,
        None => TrainConfig::new(1_000_000, TrainMode::MiniBatch { batch_size: 4 }),
    };

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let mut rng = SharedRandom::from_seed(seed);
    let mut network = Network::new(&spec, &mut rng)?;
    let data = xor_data();
    info!(seed, steps = config.steps, mode = ?config.mode, "starting training");

    let mut done = 0;
    while done < config.steps {
        let steps = REPORT_EVERY.min(config.steps - done);
        let cost = backprop_nn::train_loop(&mut network, &data, &TrainConfig { steps, ..config }, &mut rng)?;
        done += steps;

        print!("{}", network.render_weights());
        print!("{}", network.render_biases());
        for (input, _) in &data {
            let label = format!("{}, {}: ", input[0], input[1]);
            print!("{}", network.forward(input)?.render(&label));
        }
        println!("Step {done}.");
        info!(step = done, cost, "report");
    }
    Ok(())
}
