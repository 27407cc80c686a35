use crate::{
    activation::{Activation, Activations},
    backward::UpdateRule,
    error::{Error, Result},
};

/// Hyper-parameters of a training run.
///
/// Defaults: ReLU on every hidden layer, learning rate `1e-3`, no weight decay,
/// momentum `0.9`, `1000` epochs and full-batch gradient descent.
#[derive(Debug, Clone, PartialEq)]
pub struct FitConfig {
    pub hidden_layer_sizes: Vec<usize>,
    /// One activation per hidden layer; `None` means ReLU everywhere.
    pub hidden_activations: Option<Vec<Activation>>,
    pub learning_rate: f64,
    /// L2 weight-decay coefficient.
    pub l2: f64,
    pub momentum: f64,
    pub epochs: usize,
    /// `None` trains on the whole dataset at once.
    pub batch_size: Option<usize>,
    /// Report the loss curve through the logger once training ends.
    pub show_curve: bool,
    /// Seed for initialization and shuffling; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            hidden_layer_sizes: Vec::new(),
            hidden_activations: None,
            learning_rate: 1e-3,
            l2: 0.0,
            momentum: 0.9,
            epochs: 1000,
            batch_size: None,
            show_curve: false,
            seed: None,
        }
    }
}

impl FitConfig {
    pub fn new(hidden_layer_sizes: Vec<usize>) -> Self {
        Self {
            hidden_layer_sizes,
            ..Self::default()
        }
    }

    pub fn hidden_activations(self, hidden_activations: Vec<Activation>) -> Self {
        Self {
            hidden_activations: Some(hidden_activations),
            ..self
        }
    }

    pub fn learning_rate(self, learning_rate: f64) -> Self {
        Self {
            learning_rate,
            ..self
        }
    }

    pub fn l2(self, l2: f64) -> Self {
        Self { l2, ..self }
    }

    pub fn momentum(self, momentum: f64) -> Self {
        Self { momentum, ..self }
    }

    pub fn epochs(self, epochs: usize) -> Self {
        Self { epochs, ..self }
    }

    pub fn batch_size(self, batch_size: usize) -> Self {
        Self {
            batch_size: Some(batch_size),
            ..self
        }
    }

    pub fn show_curve(self, show_curve: bool) -> Self {
        Self { show_curve, ..self }
    }

    pub fn seed(self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }

    /// Reject settings that would make training meaningless before anything is allocated.
    pub fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() || self.learning_rate < 0.0 {
            return Err(Error::InvalidInput(
                "learning rate must be finite and non-negative",
            ));
        }
        if !self.l2.is_finite() || self.l2 < 0.0 {
            return Err(Error::InvalidInput(
                "L2 coefficient must be finite and non-negative",
            ));
        }
        if !self.momentum.is_finite() || self.momentum < 0.0 {
            return Err(Error::InvalidInput(
                "momentum must be finite and non-negative",
            ));
        }
        if self.batch_size == Some(0) {
            return Err(Error::InvalidInput("batch size must be positive"));
        }
        if self.hidden_layer_sizes.contains(&0) {
            return Err(Error::InvalidInput("layer sizes must be positive"));
        }
        Ok(())
    }

    /// `[n_features, hidden..., n_classes]`.
    pub fn layer_sizes(&self, n_features: usize, n_classes: usize) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.hidden_layer_sizes.len() + 2);
        sizes.push(n_features);
        sizes.extend_from_slice(&self.hidden_layer_sizes);
        sizes.push(n_classes);
        sizes
    }

    /// Activation assignment for the configured hidden layers plus the softmax output.
    pub fn activations(&self) -> Result<Activations> {
        let n_hidden = self.hidden_layer_sizes.len();
        match &self.hidden_activations {
            None => Ok(Activations::relu(n_hidden)),
            Some(hidden) if hidden.len() < n_hidden => {
                Err(Error::MissingActivation {
                    layer: hidden.len(),
                })
            }
            Some(hidden) if hidden.len() > n_hidden => Err(Error::ShapeMismatch {
                what: "hidden activations",
                got: hidden.len(),
                expected: n_hidden,
            }),
            Some(hidden) => Activations::new(hidden.clone()),
        }
    }

    pub fn update_rule(&self) -> UpdateRule {
        UpdateRule {
            learning_rate: self.learning_rate,
            momentum: self.momentum,
            l2: self.l2,
        }
    }
}
