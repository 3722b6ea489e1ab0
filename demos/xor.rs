use digitnet::loss::SquaredError;
use digitnet::{Network, Sgd, Topology};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> digitnet::Result<()> {
    let mut rng = StdRng::seed_from_u64(7);
    let mut network: Network = Network::allocate(&Topology::new(vec![2, 3, 1])?)?;
    network.xavier_fill(&mut rng);

    let inputs: [[f32; 2]; 4] = [[1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]];
    let expected_outputs: [[f32; 1]; 4] = [[1.0], [0.0], [1.0], [0.0]];

    let optimizer = Sgd::new(2.0);
    let mut sample = network.gradient_buffer()?;
    let mut summed = network.gradient_buffer()?;
    let epochs = 10000;

    for epoch in 0..epochs {
        let mut loss = 0.0;
        for (input, expected) in inputs.iter().zip(expected_outputs.iter()) {
            network.set_input(input)?;
            network.forward();
            loss += SquaredError::loss(&network.output(), expected);
            network.backward(&mut sample, expected);
            summed.accumulate(&sample);
        }
        optimizer.step(&mut network, &summed, inputs.len());
        summed.reset();

        if epoch % 1000 == 0 {
            println!("Epoch {epoch}: loss = {:.6}", loss / inputs.len() as f32);
        }
    }

    for input in &inputs {
        network.set_input(input)?;
        network.forward();
        println!("Input: {:?} -> Output: {:.4}", input, network.output()[0]);
    }
    Ok(())
}
