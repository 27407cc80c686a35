use ndarray::{Array2, ArrayView2};

use crate::{
    activation::Activations,
    error::{Error, Result},
    params::Parameters,
};

/// Per-layer activations of one forward pass.
///
/// Index 0 holds the input batch and index `n_layers()` the class
/// probabilities. Rebuilt from scratch on every pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerOutputs {
    outputs: Vec<Array2<f64>>,
}

impl LayerOutputs {
    pub fn input(&self) -> &Array2<f64> {
        &self.outputs[0]
    }

    /// Output-layer probabilities, one row per sample.
    pub fn output(&self) -> &Array2<f64> {
        &self.outputs[self.outputs.len() - 1]
    }

    pub fn get(&self, index: usize) -> Option<&Array2<f64>> {
        self.outputs.get(index)
    }

    /// Number of weight layers that produced this cache.
    pub fn n_layers(&self) -> usize {
        self.outputs.len() - 1
    }

    pub fn batch_size(&self) -> usize {
        self.input().nrows()
    }
}

/// Checks that `activations` covers exactly the weight layers of `params`.
pub(crate) fn check_activations(activations: &Activations, params: &Parameters) -> Result<()> {
    let assigned = activations.n_layers();
    let needed = params.n_layers();
    if assigned < needed {
        // The layer that would wrongly get the softmax is still missing its own activation.
        return Err(Error::MissingActivation {
            layer: assigned - 1,
        });
    }
    if assigned > needed {
        return Err(Error::ShapeMismatch {
            what: "activation layers",
            got: assigned,
            expected: needed,
        });
    }
    Ok(())
}

/// Run `x` through every layer: `H = Z_prev W + b`, `Z = activation(H)`.
pub fn forward(
    x: ArrayView2<f64>,
    activations: &Activations,
    params: &Parameters,
) -> Result<LayerOutputs> {
    check_activations(activations, params)?;
    if x.ncols() != params.input_dim() {
        return Err(Error::ShapeMismatch {
            what: "input features",
            got: x.ncols(),
            expected: params.input_dim(),
        });
    }

    let mut outputs = Vec::with_capacity(params.n_layers() + 1);
    outputs.push(x.to_owned());
    for (layer, layer_params) in params.layers().iter().enumerate() {
        let activation = activations.get(layer)?;
        let previous = &outputs[layer];
        let pre_activation = previous.dot(layer_params.weight()) + layer_params.bias();
        outputs.push(activation.compute(&pre_activation));
    }

    Ok(LayerOutputs { outputs })
}
