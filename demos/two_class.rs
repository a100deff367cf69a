use ferrite_mlp::{MseLoss, Network};

fn main() {
    let mut network = Network::new(2, 3, 2, 0.3).expect("valid layer sizes");

    let inputs = [[0.1, 0.9], [0.9, 0.1]];
    let targets = [[0.99, 0.01], [0.01, 0.99]];
    let iterations = 1000;

    for i in 0..iterations {
        let k = i % 2;
        network.train(&inputs[k], &targets[k]).expect("matching shapes");

        if i % 200 == 0 {
            let error: f64 = inputs.iter().zip(targets.iter())
                .map(|(x, t)| MseLoss::sum_squared_error(&network.predict(x).unwrap().to_column_vec(), t))
                .sum();
            println!("Iteration {i}: squared error = {error:.6}");
        }
    }

    for input in &inputs {
        let output = network.predict(input).unwrap().to_column_vec();
        println!("Input: {:?} -> Output: {:.4?} -> class {}", input, output, network.classify(input).unwrap());
    }
}
