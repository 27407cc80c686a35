use std::{collections::BTreeSet, vec};

use ndarray::{Array2, ArrayView2, Axis};
use ndarray_rand::rand::{seq::index::sample, Rng};

use crate::error::{Error, Result};

/// Number of distinct labels in `labels`.
pub fn count_classes(labels: &[usize]) -> usize {
    labels.iter().collect::<BTreeSet<_>>().len()
}

/// Encode class ids as one-hot rows of width `n_classes`.
pub fn one_hot(labels: &[usize], n_classes: usize) -> Result<Array2<f64>> {
    let mut encoded = Array2::zeros((labels.len(), n_classes));
    for (row, &label) in labels.iter().enumerate() {
        if label >= n_classes {
            return Err(Error::InvalidLabel { label, n_classes });
        }
        encoded[[row, label]] = 1.0;
    }
    Ok(encoded)
}

/// Index of the largest entry in each row. Ties go to the lowest index.
pub fn argmax_rows(probs: ArrayView2<f64>) -> Vec<usize> {
    probs
        .lanes(Axis(1))
        .into_iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .fold(
                    (0, f64::NEG_INFINITY),
                    |(max_index, max_elem), (index, &elem)| {
                        if elem > max_elem {
                            (index, elem)
                        } else {
                            (max_index, max_elem)
                        }
                    },
                )
                .0
        })
        .collect()
}

/// Sampler produces the order in which samples are visited during an epoch.
pub enum Sampler<R> {
    Sequential(usize),
    Random(usize, R),
}

impl<R: Rng> Sampler<R> {
    pub fn sample(&mut self) -> Vec<usize> {
        match self {
            Self::Sequential(size) => (0..*size).collect(),
            Self::Random(size, rng) => sample(rng, *size, *size).into_vec(),
        }
    }
}

/// One mini-batch: features, one-hot targets and the raw class ids, all
/// drawn with the same permutation.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub input: Array2<f64>,
    pub target: Array2<f64>,
    pub labels: Vec<usize>,
}

/// Yields full mini-batches in the order given by `indices`.
///
/// A trailing batch smaller than `batch_size` is dropped, so exactly
/// `n_samples / batch_size` batches come out per epoch.
pub struct Batches<'a> {
    indices: vec::IntoIter<usize>,
    batch_size: usize,
    input: ArrayView2<'a, f64>,
    target: ArrayView2<'a, f64>,
    labels: &'a [usize],
}

impl<'a> Batches<'a> {
    pub fn new(
        indices: Vec<usize>,
        batch_size: usize,
        input: ArrayView2<'a, f64>,
        target: ArrayView2<'a, f64>,
        labels: &'a [usize],
    ) -> Self {
        Self {
            indices: indices.into_iter(),
            batch_size,
            input,
            target,
            labels,
        }
    }
}

impl<'a> Iterator for Batches<'a> {
    type Item = Batch;

    fn next(&mut self) -> Option<Self::Item> {
        if self.batch_size == 0 {
            return None;
        }
        let indices = self
            .indices
            .by_ref()
            .take(self.batch_size)
            .collect::<Vec<_>>();
        if indices.len() != self.batch_size {
            return None;
        }
        Some(Batch {
            input: self.input.select(Axis(0), &indices),
            target: self.target.select(Axis(0), &indices),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        })
    }
}

/// Wraps a training set and hands out a freshly ordered set of batches each epoch.
pub struct DataLoader<'a, R> {
    sampler: Sampler<R>,
    input: ArrayView2<'a, f64>,
    target: ArrayView2<'a, f64>,
    labels: &'a [usize],
}

impl<'a, R: Rng> DataLoader<'a, R> {
    pub fn new(
        input: ArrayView2<'a, f64>,
        target: ArrayView2<'a, f64>,
        labels: &'a [usize],
    ) -> Result<Self> {
        let size = input.nrows();
        if target.nrows() != size {
            return Err(Error::ShapeMismatch {
                what: "target rows",
                got: target.nrows(),
                expected: size,
            });
        }
        if labels.len() != size {
            return Err(Error::ShapeMismatch {
                what: "labels",
                got: labels.len(),
                expected: size,
            });
        }
        Ok(Self {
            sampler: Sampler::Sequential(size),
            input,
            target,
            labels,
        })
    }

    pub fn size(&self) -> usize {
        self.input.nrows()
    }

    /// Visit samples in a new random order every epoch.
    pub fn shuffle(mut self, rng: R) -> Self {
        self.sampler = Sampler::Random(self.size(), rng);
        self
    }

    /// Create the batches of one epoch.
    pub fn batch(&mut self, batch_size: usize) -> Batches<'a> {
        Batches::new(
            self.sampler.sample(),
            batch_size,
            self.input,
            self.target,
            self.labels,
        )
    }
}
