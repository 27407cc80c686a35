use ndarray::{Array2, Axis};

use crate::error::{Error, Result};

/// Logistic function applied element-wise.
pub fn sigmoid(h: &Array2<f64>) -> Array2<f64> {
    h.mapv(|v| 1.0 / (1.0 + (-v).exp()))
}

/// Hyperbolic tangent applied element-wise.
pub fn tanh(h: &Array2<f64>) -> Array2<f64> {
    h.mapv(f64::tanh)
}

/// Rectified linear unit applied element-wise.
pub fn relu(h: &Array2<f64>) -> Array2<f64> {
    h.mapv(|v| if v > 0.0 { v } else { 0.0 })
}

/// Row-wise softmax. Each output row is a probability distribution.
///
/// The row maximum is subtracted before exponentiating so that large inputs
/// do not overflow.
pub fn softmax(h: &Array2<f64>) -> Array2<f64> {
    let mut out = h.to_owned();
    for mut row in out.lanes_mut(Axis(1)) {
        let max_element = row.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
        row.mapv_inplace(|v| (v - max_element).exp());
        let exp_sum = row.sum();
        row /= exp_sum;
    }
    out
}

/// The fixed set of activation functions a layer can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Activation {
    Sigmoid,
    Tanh,
    Relu,
    /// Only valid on the output layer.
    Softmax,
}

impl Activation {
    pub fn compute(self, h: &Array2<f64>) -> Array2<f64> {
        match self {
            Activation::Sigmoid => sigmoid(h),
            Activation::Tanh => tanh(h),
            Activation::Relu => relu(h),
            Activation::Softmax => softmax(h),
        }
    }

    /// Local derivative expressed in terms of the cached output `z = self.compute(h)`.
    ///
    /// Softmax has no element-wise derivative; its gradient is folded into the
    /// output error together with cross-entropy.
    pub fn derivative(self, z: &Array2<f64>) -> Result<Array2<f64>> {
        match self {
            Activation::Sigmoid => Ok(z.mapv(|v| v * (1.0 - v))),
            Activation::Tanh => Ok(z.mapv(|v| 1.0 - v * v)),
            Activation::Relu => Ok(z.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 })),
            Activation::Softmax => Err(Error::UnsupportedActivation(self)),
        }
    }

    fn has_derivative(self) -> bool {
        !matches!(self, Activation::Softmax)
    }
}

/// Activation assignment for every weight layer of a network.
///
/// Hidden layers carry any activation with a derivative; the output layer is
/// always softmax and cannot be overridden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activations {
    hidden: Vec<Activation>,
}

impl Activations {
    /// Fails with `UnsupportedActivation` if a hidden layer is given softmax,
    /// since backpropagation through it would fail mid-training.
    pub fn new(hidden: Vec<Activation>) -> Result<Self> {
        if let Some(&bad) = hidden.iter().find(|a| !a.has_derivative()) {
            return Err(Error::UnsupportedActivation(bad));
        }
        Ok(Self { hidden })
    }

    /// ReLU on each of `n_hidden` hidden layers.
    pub fn relu(n_hidden: usize) -> Self {
        Self {
            hidden: vec![Activation::Relu; n_hidden],
        }
    }

    /// Number of weight layers covered, output layer included.
    pub fn n_layers(&self) -> usize {
        self.hidden.len() + 1
    }

    pub fn hidden(&self) -> &[Activation] {
        &self.hidden
    }

    /// Activation of weight layer `layer` (0-based).
    pub fn get(&self, layer: usize) -> Result<Activation> {
        match layer.cmp(&self.hidden.len()) {
            std::cmp::Ordering::Less => Ok(self.hidden[layer]),
            std::cmp::Ordering::Equal => Ok(Activation::Softmax),
            std::cmp::Ordering::Greater => Err(Error::MissingActivation { layer }),
        }
    }
}
