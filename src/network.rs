use log::{debug, info, trace, warn};
use ndarray::{Array1, Array2, ArrayView2};
use ndarray_rand::rand::{rngs::StdRng, SeedableRng};

use crate::{
    activation::Activations,
    backward::backward,
    config::FitConfig,
    data::{argmax_rows, count_classes, one_hot, DataLoader},
    error::{Error, Result},
    forward::{forward, LayerOutputs},
    loss::objective,
    metrics::accuracy,
    params::Parameters,
};

/// Width of the text curve printed when `show_curve` is set.
const CURVE_POINTS: usize = 20;

/// State produced by a completed `fit`.
#[derive(Debug, Clone)]
struct Trained {
    params: Parameters,
    activations: Activations,
    outputs: LayerOutputs,
}

/// Feedforward classifier with ReLU/sigmoid/tanh hidden layers and a softmax output.
#[derive(Debug, Clone)]
pub struct Classifier {
    config: FitConfig,
    loss_history: Vec<f64>,
    trained: Option<Trained>,
}

impl Classifier {
    pub fn new(config: FitConfig) -> Self {
        Self {
            config,
            loss_history: Vec::new(),
            trained: None,
        }
    }

    pub fn config(&self) -> &FitConfig {
        &self.config
    }

    /// Train on `x` (samples x features) with one class id per row.
    ///
    /// The number of classes is the number of distinct labels; every label
    /// must lie in `[0, n_classes)`. Parameters are re-initialized on every
    /// call. The loss of each processed batch is appended to the history.
    pub fn fit(&mut self, x: ArrayView2<f64>, labels: &[usize]) -> Result<()> {
        self.config.validate()?;
        let (n_samples, n_features) = x.dim();
        if n_samples == 0 {
            return Err(Error::InvalidInput("training set is empty"));
        }
        if labels.len() != n_samples {
            return Err(Error::ShapeMismatch {
                what: "labels",
                got: labels.len(),
                expected: n_samples,
            });
        }

        let n_classes = count_classes(labels);
        let target = one_hot(labels, n_classes)?;
        let layer_sizes = self.config.layer_sizes(n_features, n_classes);
        let activations = self.config.activations()?;

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut params = Parameters::initialize(&layer_sizes, &mut rng)?;
        let rule = self.config.update_rule();

        let batch_size = self.config.batch_size.unwrap_or(n_samples);
        let n_batches = n_samples / batch_size;
        if n_batches == 0 {
            warn!(
                "batch size {} exceeds {} samples, no batch will be processed",
                batch_size, n_samples
            );
        }
        info!(
            "training {:?} network for {} epochs, {} batches of {} per epoch",
            layer_sizes, self.config.epochs, n_batches, batch_size
        );

        let mut loader = DataLoader::new(x.view(), target.view(), labels)?.shuffle(rng);
        self.loss_history.clear();
        self.trained = None;

        for epoch in 0..self.config.epochs {
            let mut epoch_loss = 0.0;
            for batch in loader.batch(batch_size) {
                let outputs = forward(batch.input.view(), &activations, &params)?;
                let loss = objective(
                    batch.target.view(),
                    outputs.output().view(),
                    &params,
                    rule.l2,
                )?;
                if log::log_enabled!(log::Level::Trace) {
                    let predicted = argmax_rows(outputs.output().view());
                    trace!(
                        "epoch {}: batch loss {:.6}, batch accuracy {:.3}",
                        epoch,
                        loss,
                        accuracy(&batch.labels, &predicted)?
                    );
                }
                self.loss_history.push(loss);
                epoch_loss += loss;

                backward(
                    batch.target.view(),
                    &outputs,
                    &mut params,
                    &activations,
                    &rule,
                )?;
            }
            if n_batches > 0 {
                debug!(
                    "epoch {}: mean batch loss {:.6}",
                    epoch,
                    epoch_loss / n_batches as f64
                );
            }
        }

        // Refresh the cache over the full, unshuffled dataset.
        let outputs = forward(x, &activations, &params)?;
        if let Some(last) = self.loss_history.last() {
            info!(
                "training finished after {} batches, last loss {:.6}",
                self.loss_history.len(),
                last
            );
        }
        if self.config.show_curve {
            self.log_curve();
        }

        self.trained = Some(Trained {
            params,
            activations,
            outputs,
        });
        Ok(())
    }

    fn trained(&self) -> Result<&Trained> {
        self.trained.as_ref().ok_or(Error::NotFitted)
    }

    /// Class probabilities for every row of `x`.
    pub fn predict_proba(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        let trained = self.trained()?;
        let outputs = forward(x, &trained.activations, &trained.params)?;
        Ok(outputs.output().clone())
    }

    /// Most probable class id for every row of `x`.
    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<usize>> {
        let probs = self.predict_proba(x)?;
        Ok(Array1::from(argmax_rows(probs.view())))
    }

    /// Accuracy of `predict(x)` against `labels`.
    pub fn score(&self, x: ArrayView2<f64>, labels: &[usize]) -> Result<f64> {
        let predicted = self.predict(x)?;
        accuracy(labels, &predicted.to_vec())
    }

    /// One objective value per processed batch, oldest first.
    pub fn loss_history(&self) -> &[f64] {
        &self.loss_history
    }

    pub fn parameters(&self) -> Result<&Parameters> {
        Ok(&self.trained()?.params)
    }

    pub fn activations(&self) -> Result<&Activations> {
        Ok(&self.trained()?.activations)
    }

    /// Layer outputs of the trained network on the full training set.
    pub fn layer_outputs(&self) -> Result<&LayerOutputs> {
        Ok(&self.trained()?.outputs)
    }

    pub fn layer_sizes(&self) -> Result<&[usize]> {
        Ok(self.trained()?.params.layer_sizes())
    }

    fn log_curve(&self) {
        let history = &self.loss_history;
        if history.is_empty() {
            return;
        }
        let step = (history.len() / CURVE_POINTS).max(1);
        let max_loss = history.iter().cloned().fold(f64::MIN_POSITIVE, f64::max);
        info!("training curve ({} batches):", history.len());
        for (i, loss) in history.iter().enumerate().step_by(step) {
            let width = (loss / max_loss * 50.0).round() as usize;
            info!("{:>8} {:>12.6} {}", i, loss, "#".repeat(width));
        }
    }
}
