use ann::{
    activation::{Activation, Activations},
    backward::gradients,
    data::one_hot,
    forward::forward,
    loss::objective,
    params::Parameters,
};
use approx::assert_relative_eq;
use ndarray::{Array1, Array2};
use ndarray_rand::{
    rand::{rngs::StdRng, SeedableRng},
    rand_distr::StandardNormal,
    RandomExt,
};

const EPS: f64 = 1e-5;
const L2: f64 = 0.1;

fn loss_at(
    layers: &[(Array2<f64>, Array1<f64>)],
    x: &Array2<f64>,
    target: &Array2<f64>,
    activations: &Activations,
) -> f64 {
    let params = Parameters::from_layers(layers.to_vec()).unwrap();
    let outputs = forward(x.view(), activations, &params).unwrap();
    objective(target.view(), outputs.output().view(), &params, L2).unwrap()
}

fn check_against_finite_differences(activations: Activations, layer_sizes: &[usize]) {
    let mut rng = StdRng::seed_from_u64(23);
    let params = Parameters::initialize(layer_sizes, &mut rng).unwrap();
    let x = Array2::random_using((5, layer_sizes[0]), StandardNormal, &mut rng);
    let n_classes = layer_sizes[layer_sizes.len() - 1];
    let labels = (0..5).map(|i| i % n_classes).collect::<Vec<_>>();
    let target = one_hot(&labels, n_classes).unwrap();

    let outputs = forward(x.view(), &activations, &params).unwrap();
    let grads = gradients(target.view(), &outputs, &params, &activations, L2).unwrap();

    let layers = params
        .layers()
        .iter()
        .map(|layer| (layer.weight().clone(), layer.bias().clone()))
        .collect::<Vec<_>>();

    for (l, grad) in grads.iter().enumerate() {
        for ((i, j), &analytic) in grad.weight.indexed_iter() {
            let mut plus = layers.clone();
            plus[l].0[[i, j]] += EPS;
            let mut minus = layers.clone();
            minus[l].0[[i, j]] -= EPS;
            let numeric = (loss_at(&plus, &x, &target, &activations)
                - loss_at(&minus, &x, &target, &activations))
                / (2.0 * EPS);
            assert_relative_eq!(analytic, numeric, epsilon = 1e-6, max_relative = 1e-5);
        }
        for (k, &analytic) in grad.bias.indexed_iter() {
            let mut plus = layers.clone();
            plus[l].1[k] += EPS;
            let mut minus = layers.clone();
            minus[l].1[k] -= EPS;
            let numeric = (loss_at(&plus, &x, &target, &activations)
                - loss_at(&minus, &x, &target, &activations))
                / (2.0 * EPS);
            assert_relative_eq!(analytic, numeric, epsilon = 1e-6, max_relative = 1e-5);
        }
    }
}

#[test]
fn gradients_match_finite_differences_tanh_sigmoid() {
    let activations = Activations::new(vec![Activation::Tanh, Activation::Sigmoid]).unwrap();
    check_against_finite_differences(activations, &[3, 4, 3, 2]);
}

#[test]
fn gradients_match_finite_differences_softmax_only() {
    check_against_finite_differences(Activations::relu(0), &[4, 3]);
}

#[test]
fn gradients_match_finite_differences_relu() {
    // Random inputs keep pre-activations away from the kink at zero.
    check_against_finite_differences(Activations::relu(1), &[2, 5, 3]);
}
