use ndarray::{Array2, ArrayView2, Axis};
use ndarray_rand::rand::{seq::SliceRandom, Rng};

use crate::error::{Error, Result};

/// Split dataset into train and test data.
/// `test_ratio` is a ratio of the number of test data to the whole dataset.
/// Returns `(x_train, y_train, x_test, y_test)`.
pub fn train_test_split<R: Rng + ?Sized>(
    x: ArrayView2<f64>,
    y: &[usize],
    test_ratio: f64,
    rng: &mut R,
) -> Result<(Array2<f64>, Vec<usize>, Array2<f64>, Vec<usize>)> {
    if x.nrows() != y.len() {
        return Err(Error::ShapeMismatch {
            what: "labels",
            got: y.len(),
            expected: x.nrows(),
        });
    }
    if !(0.0..1.0).contains(&test_ratio) {
        return Err(Error::InvalidInput("test ratio must be in [0, 1)"));
    }

    let mut indices = (0..y.len()).collect::<Vec<_>>();
    indices.shuffle(rng);
    let n_trains = (y.len() as f64 * (1.0 - test_ratio)) as usize;
    let (train, test) = indices.split_at(n_trains);

    Ok((
        x.select(Axis(0), train),
        train.iter().map(|&i| y[i]).collect(),
        x.select(Axis(0), test),
        test.iter().map(|&i| y[i]).collect(),
    ))
}
