use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::{
    activation::Activations,
    error::{check_dim, Error, Result},
    forward::{check_activations, LayerOutputs},
    params::Parameters,
};

/// Hyper-parameters of the momentum update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdateRule {
    pub learning_rate: f64,
    pub momentum: f64,
    /// L2 weight-decay coefficient.
    pub l2: f64,
}

/// Gradient of the objective with respect to one layer's parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    pub weight: Array2<f64>,
    pub bias: Array1<f64>,
}

/// Error signal `dH = Z_L - Y`, valid because the output layer is softmax
/// paired with cross-entropy.
fn output_error(target: ArrayView2<f64>, outputs: &LayerOutputs) -> Result<Array2<f64>> {
    let probs = outputs.output();
    check_dim(
        ["one-hot target rows", "one-hot target columns"],
        target.dim(),
        probs.dim(),
    )?;
    Ok(probs - &target)
}

fn check_cache(outputs: &LayerOutputs, params: &Parameters) -> Result<()> {
    if outputs.n_layers() != params.n_layers() {
        return Err(Error::ShapeMismatch {
            what: "cached layers",
            got: outputs.n_layers(),
            expected: params.n_layers(),
        });
    }
    Ok(())
}

/// Gradient for `layer` given its error signal, plus the error signal of the
/// layer below (none for the first layer). Reads the current, not yet updated, weights.
fn layer_step(
    layer: usize,
    error: &Array2<f64>,
    outputs: &LayerOutputs,
    params: &Parameters,
    activations: &Activations,
    l2: f64,
) -> Result<(Gradient, Option<Array2<f64>>)> {
    let weight = params.layer(layer)?.weight();
    let layer_input = outputs.get(layer).ok_or(Error::ShapeMismatch {
        what: "cached layers",
        got: outputs.n_layers(),
        expected: params.n_layers(),
    })?;

    let mut weight_grad = layer_input.t().dot(error);
    if l2 != 0.0 {
        weight_grad.scaled_add(l2, weight);
    }
    let bias_grad = error.sum_axis(Axis(0));

    let next_error = if layer > 0 {
        let derivative = activations.get(layer - 1)?.derivative(layer_input)?;
        Some(error.dot(&weight.t()) * derivative)
    } else {
        None
    };

    Ok((
        Gradient {
            weight: weight_grad,
            bias: bias_grad,
        },
        next_error,
    ))
}

/// Gradients of the L2-regularized objective for every layer, in layer order.
/// Leaves the parameters untouched.
pub fn gradients(
    target: ArrayView2<f64>,
    outputs: &LayerOutputs,
    params: &Parameters,
    activations: &Activations,
    l2: f64,
) -> Result<Vec<Gradient>> {
    check_activations(activations, params)?;
    check_cache(outputs, params)?;

    let mut error = output_error(target, outputs)?;
    let mut grads = Vec::with_capacity(params.n_layers());
    for layer in (0..params.n_layers()).rev() {
        let (grad, next_error) = layer_step(layer, &error, outputs, params, activations, l2)?;
        grads.push(grad);
        if let Some(next_error) = next_error {
            error = next_error;
        }
    }
    grads.reverse();
    Ok(grads)
}

/// Propagate the output error from the last layer down to the first and apply
/// the momentum update to each layer as soon as its gradient is known.
///
/// The error for layer `l - 1` is computed from layer `l`'s weights before they
/// are updated.
pub fn backward(
    target: ArrayView2<f64>,
    outputs: &LayerOutputs,
    params: &mut Parameters,
    activations: &Activations,
    rule: &UpdateRule,
) -> Result<()> {
    check_activations(activations, params)?;
    check_cache(outputs, params)?;

    let mut error = output_error(target, outputs)?;
    for layer in (0..params.n_layers()).rev() {
        let (grad, next_error) = layer_step(layer, &error, outputs, params, activations, rule.l2)?;
        params.apply_update(
            layer,
            grad.weight.view(),
            grad.bias.view(),
            rule.learning_rate,
            rule.momentum,
        )?;
        if let Some(next_error) = next_error {
            error = next_error;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{
        activation::Activation, assert_rel_eq_arr1, assert_rel_eq_arr2, forward::forward,
    };

    use super::*;

    use approx::assert_relative_eq;
    use ndarray::{arr1, arr2};

    fn small_network() -> (Parameters, Activations) {
        let params = Parameters::from_layers(vec![
            (arr2(&[[0.5, -1.0], [1.0, 0.25]]), arr1(&[0.1, -0.1])),
            (arr2(&[[1.0, -1.0], [-0.5, 0.5]]), arr1(&[0.0, 0.0])),
        ])
        .unwrap();
        let activations = Activations::new(vec![Activation::Sigmoid]).unwrap();
        (params, activations)
    }

    #[test]
    fn output_layer_gradient() {
        let (params, activations) = small_network();
        let x = arr2(&[[1.0, 2.0], [-1.0, 0.5]]);
        let y = arr2(&[[1.0, 0.0], [0.0, 1.0]]);
        let outputs = forward(x.view(), &activations, &params).unwrap();
        let grads = gradients(y.view(), &outputs, &params, &activations, 0.0).unwrap();

        let error = outputs.output() - &y;
        let hidden = outputs.get(1).unwrap();
        assert_eq!(2, grads.len());
        assert_rel_eq_arr2!(grads[1].weight, hidden.t().dot(&error), epsilon = 1e-12);
        assert_rel_eq_arr1!(grads[1].bias, error.sum_axis(Axis(0)), epsilon = 1e-12);
    }

    #[test]
    fn weight_decay_adds_scaled_weights() {
        let (params, activations) = small_network();
        let x = arr2(&[[1.0, 2.0]]);
        let y = arr2(&[[0.0, 1.0]]);
        let outputs = forward(x.view(), &activations, &params).unwrap();
        let plain = gradients(y.view(), &outputs, &params, &activations, 0.0).unwrap();
        let decayed = gradients(y.view(), &outputs, &params, &activations, 0.5).unwrap();

        for (layer, (p, d)) in plain.iter().zip(&decayed).enumerate() {
            let weight = params.layer(layer).unwrap().weight();
            assert_rel_eq_arr2!(d.weight, &p.weight + &(weight * 0.5), epsilon = 1e-12);
            assert_rel_eq_arr1!(d.bias, p.bias);
        }
    }

    #[test]
    fn backward_applies_momentum_step_with_pre_update_weights() {
        let (mut params, activations) = small_network();
        let original = params.clone();
        let x = arr2(&[[1.0, 2.0], [-1.0, 0.5], [0.0, -1.0]]);
        let y = arr2(&[[1.0, 0.0], [0.0, 1.0], [1.0, 0.0]]);
        let outputs = forward(x.view(), &activations, &params).unwrap();
        let grads = gradients(y.view(), &outputs, &params, &activations, 0.1).unwrap();

        let rule = UpdateRule {
            learning_rate: 0.05,
            momentum: 0.9,
            l2: 0.1,
        };
        backward(y.view(), &outputs, &mut params, &activations, &rule).unwrap();

        for (layer, grad) in grads.iter().enumerate() {
            let before = original.layer(layer).unwrap();
            let after = params.layer(layer).unwrap();
            assert_rel_eq_arr2!(
                after.weight().clone(),
                before.weight() - &(&grad.weight * 0.05),
                epsilon = 1e-12
            );
            assert_rel_eq_arr1!(
                after.bias().clone(),
                before.bias() - &(&grad.bias * 0.05),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn target_shape_must_match_output() {
        let (params, activations) = small_network();
        let x = arr2(&[[1.0, 2.0]]);
        let y = arr2(&[[0.0, 1.0, 0.0]]);
        let outputs = forward(x.view(), &activations, &params).unwrap();
        assert_eq!(
            Err(Error::ShapeMismatch {
                what: "one-hot target columns",
                got: 3,
                expected: 2
            }),
            gradients(y.view(), &outputs, &params, &activations, 0.0)
        );

        let transposed = arr2(&[[0.0], [1.0]]);
        assert_eq!(
            Err(Error::ShapeMismatch {
                what: "one-hot target rows",
                got: 2,
                expected: 1
            }),
            gradients(transposed.view(), &outputs, &params, &activations, 0.0)
        );
    }

    #[test]
    fn bias_gradient_sums_over_batch() {
        let params = Parameters::zeros(&[1, 2]).unwrap();
        let activations = Activations::relu(0);
        let x = arr2(&[[1.0], [2.0], [3.0]]);
        let y = arr2(&[[1.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);
        let outputs = forward(x.view(), &activations, &params).unwrap();
        let grads = gradients(y.view(), &outputs, &params, &activations, 0.0).unwrap();

        // Every row starts at [0.5, 0.5].
        assert_rel_eq_arr1!(arr1(&[-0.5, 0.5]), grads[0].bias);
        assert_rel_eq_arr2!(arr2(&[[0.0, 0.0]]), grads[0].weight);
    }
}
