use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use ndarray_rand::{rand::Rng, rand_distr::StandardNormal, RandomExt};

use crate::error::{check_dim, Error, Result};

/// Weights, biases and momentum velocities of one weight layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerParams {
    weight: Array2<f64>,
    bias: Array1<f64>,
    velocity_weight: Array2<f64>,
    velocity_bias: Array1<f64>,
}

impl LayerParams {
    fn new(weight: Array2<f64>, bias: Array1<f64>) -> Self {
        let velocity_weight = Array2::zeros(weight.raw_dim());
        let velocity_bias = Array1::zeros(bias.raw_dim());
        Self {
            weight,
            bias,
            velocity_weight,
            velocity_bias,
        }
    }

    /// Shape: (inputs, outputs).
    pub fn weight(&self) -> &Array2<f64> {
        &self.weight
    }

    pub fn bias(&self) -> &Array1<f64> {
        &self.bias
    }

    pub fn velocity_weight(&self) -> &Array2<f64> {
        &self.velocity_weight
    }

    pub fn velocity_bias(&self) -> &Array1<f64> {
        &self.velocity_bias
    }
}

/// All trainable state of a network, one entry per weight layer.
///
/// Layer `i` maps `layer_sizes[i]` inputs to `layer_sizes[i + 1]` outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    layer_sizes: Vec<usize>,
    layers: Vec<LayerParams>,
}

fn check_layer_sizes(layer_sizes: &[usize]) -> Result<()> {
    if layer_sizes.len() < 2 {
        return Err(Error::ShapeMismatch {
            what: "layer sizes",
            got: layer_sizes.len(),
            expected: 2,
        });
    }
    if layer_sizes.contains(&0) {
        return Err(Error::InvalidInput("layer sizes must be positive"));
    }
    Ok(())
}

impl Parameters {
    /// Draw weights and biases from a standard normal distribution. Velocities start at zero.
    pub fn initialize<R: Rng + ?Sized>(layer_sizes: &[usize], rng: &mut R) -> Result<Self> {
        check_layer_sizes(layer_sizes)?;
        let layers = layer_sizes
            .windows(2)
            .map(|pair| {
                let weight = Array2::random_using((pair[0], pair[1]), StandardNormal, rng);
                let bias = Array1::random_using(pair[1], StandardNormal, rng);
                LayerParams::new(weight, bias)
            })
            .collect();
        Ok(Self {
            layer_sizes: layer_sizes.to_vec(),
            layers,
        })
    }

    /// All weights and biases set to zero.
    pub fn zeros(layer_sizes: &[usize]) -> Result<Self> {
        check_layer_sizes(layer_sizes)?;
        let layers = layer_sizes
            .windows(2)
            .map(|pair| LayerParams::new(Array2::zeros((pair[0], pair[1])), Array1::zeros(pair[1])))
            .collect();
        Ok(Self {
            layer_sizes: layer_sizes.to_vec(),
            layers,
        })
    }

    /// Build from explicit `(weight, bias)` pairs, checking that the shapes chain.
    pub fn from_layers(layers: Vec<(Array2<f64>, Array1<f64>)>) -> Result<Self> {
        let first = layers.first().ok_or(Error::ShapeMismatch {
            what: "layer sizes",
            got: 1,
            expected: 2,
        })?;
        let mut layer_sizes = vec![first.0.nrows()];
        for (weight, bias) in &layers {
            let inputs = *layer_sizes.last().unwrap_or(&0);
            if weight.nrows() != inputs {
                return Err(Error::ShapeMismatch {
                    what: "weight rows",
                    got: weight.nrows(),
                    expected: inputs,
                });
            }
            if bias.len() != weight.ncols() {
                return Err(Error::ShapeMismatch {
                    what: "bias length",
                    got: bias.len(),
                    expected: weight.ncols(),
                });
            }
            layer_sizes.push(weight.ncols());
        }
        check_layer_sizes(&layer_sizes)?;

        Ok(Self {
            layer_sizes,
            layers: layers
                .into_iter()
                .map(|(weight, bias)| LayerParams::new(weight, bias))
                .collect(),
        })
    }

    pub fn layer_sizes(&self) -> &[usize] {
        &self.layer_sizes
    }

    /// Number of weight layers.
    pub fn n_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn input_dim(&self) -> usize {
        self.layer_sizes[0]
    }

    pub fn output_dim(&self) -> usize {
        self.layer_sizes[self.layer_sizes.len() - 1]
    }

    pub fn layer(&self, layer: usize) -> Result<&LayerParams> {
        self.layers.get(layer).ok_or(Error::ShapeMismatch {
            what: "layer index",
            got: layer,
            expected: self.layers.len(),
        })
    }

    pub fn layers(&self) -> &[LayerParams] {
        &self.layers
    }

    /// Sum of squared weights over all layers. Biases are not penalized.
    pub fn squared_weight_sum(&self) -> f64 {
        self.layers
            .iter()
            .map(|layer| layer.weight.fold(0.0, |acc, w| acc + w * w))
            .sum()
    }

    /// Classical momentum step on one layer:
    /// `v = momentum * v - learning_rate * grad`, then `param += v`.
    pub fn apply_update(
        &mut self,
        layer: usize,
        weight_gradient: ArrayView2<f64>,
        bias_gradient: ArrayView1<f64>,
        learning_rate: f64,
        momentum: f64,
    ) -> Result<()> {
        let n_layers = self.layers.len();
        let params = self.layers.get_mut(layer).ok_or(Error::ShapeMismatch {
            what: "layer index",
            got: layer,
            expected: n_layers,
        })?;
        check_dim(
            ["weight gradient rows", "weight gradient columns"],
            weight_gradient.dim(),
            params.weight.dim(),
        )?;
        if bias_gradient.len() != params.bias.len() {
            return Err(Error::ShapeMismatch {
                what: "bias gradient",
                got: bias_gradient.len(),
                expected: params.bias.len(),
            });
        }

        params.velocity_weight *= momentum;
        params
            .velocity_weight
            .scaled_add(-learning_rate, &weight_gradient);
        params.velocity_bias *= momentum;
        params.velocity_bias.scaled_add(-learning_rate, &bias_gradient);

        params.weight += &params.velocity_weight;
        params.bias += &params.velocity_bias;
        Ok(())
    }
}
