use ann::{config::FitConfig, network::Classifier, utils::train_test_split};
use csv::Reader;
use ndarray::Array2;
use ndarray_rand::rand::thread_rng;
use std::{error::Error, path::Path};

const LABELS: [&str; 3] = ["Iris-setosa", "Iris-versicolor", "Iris-virginica"];

// Load iris dataset available here: https://www.kaggle.com/arshid/iris-flower-dataset
fn load_iris(file_path: impl AsRef<Path>) -> Result<(Array2<f64>, Vec<usize>), Box<dyn Error>> {
    let mut reader = Reader::from_path(file_path)?;
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for row in reader.records() {
        let row = row?;
        for field in row.iter().take(4) {
            xs.push(field.parse::<f64>()?);
        }
        let label = LABELS
            .iter()
            .position(|&l| l == &row[4])
            .ok_or("unknown iris label")?;
        ys.push(label);
    }
    Ok((Array2::from_shape_vec((ys.len(), 4), xs)?, ys))
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let (x, y) = load_iris("./IRIS.csv")?;
    let (x_train, y_train, x_test, y_test) =
        train_test_split(x.view(), &y, 0.25, &mut thread_rng())?;

    let mut model = Classifier::new(
        FitConfig::new(vec![10, 10])
            .learning_rate(1e-3)
            .batch_size(16)
            .epochs(3000),
    );
    model.fit(x_train.view(), &y_train)?;

    println!("accuracy: {}", model.score(x_test.view(), &y_test)?);
    Ok(())
}
