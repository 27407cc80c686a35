use ann::{config::FitConfig, network::Classifier};
use ndarray::{concatenate, Array2, Axis};
use ndarray_rand::{
    rand::{rngs::StdRng, SeedableRng},
    rand_distr::Normal,
    RandomExt,
};

// Run with `RUST_LOG=info cargo run --example blobs` to see the training curve.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut rng = StdRng::seed_from_u64(0);
    let noise = Normal::new(0.0, 0.8)?;
    let centers = [(-2.0, -2.0), (2.0, 2.0), (-2.0, 2.0)];
    let blobs = centers
        .iter()
        .map(|&(cx, cy)| {
            let mut blob = Array2::random_using((100, 2), noise, &mut rng);
            blob.column_mut(0).mapv_inplace(|v| v + cx);
            blob.column_mut(1).mapv_inplace(|v| v + cy);
            blob
        })
        .collect::<Vec<_>>();
    let views = blobs.iter().map(|b| b.view()).collect::<Vec<_>>();
    let x = concatenate(Axis(0), &views)?;
    let y = (0..x.nrows()).map(|i| i / 100).collect::<Vec<_>>();

    let mut model = Classifier::new(
        FitConfig::new(vec![8, 8])
            .batch_size(32)
            .epochs(300)
            .show_curve(true),
    );
    model.fit(x.view(), &y)?;

    println!("train accuracy: {}", model.score(x.view(), &y)?);
    Ok(())
}
