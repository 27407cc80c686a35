use ndarray::{ArrayView2, Zip};

use crate::{
    error::{check_dim, Result},
    params::Parameters,
};

/// Lower bound on probabilities before taking the logarithm.
const MIN_PROBABILITY: f64 = 1e-300;

/// Cross-entropy summed over the batch: `-sum(t * ln(p))`.
pub fn cross_entropy(target: ArrayView2<f64>, probs: ArrayView2<f64>) -> Result<f64> {
    check_dim(
        ["cross-entropy target rows", "cross-entropy target columns"],
        target.dim(),
        probs.dim(),
    )?;
    let loss = Zip::from(&target).and(&probs).fold(0.0, |loss, &t, &p| {
        if t == 0.0 {
            loss
        } else {
            loss - t * p.max(MIN_PROBABILITY).ln()
        }
    });
    Ok(loss)
}

/// Cross-entropy plus the L2 penalty `(l2 / 2) * sum(W^2)`.
///
/// Only recorded for diagnostics; the penalty gradient is added separately
/// during the backward pass.
pub fn objective(
    target: ArrayView2<f64>,
    probs: ArrayView2<f64>,
    params: &Parameters,
    l2: f64,
) -> Result<f64> {
    let penalty = if l2 == 0.0 {
        0.0
    } else {
        0.5 * l2 * params.squared_weight_sum()
    };
    Ok(cross_entropy(target, probs)? + penalty)
}

#[cfg(test)]
mod tests {
    use crate::error::Error;

    use super::*;

    use approx::assert_relative_eq;
    use ndarray::{arr1, arr2};

    #[test]
    fn compute_cross_entropy() {
        let probs = arr2(&[[0.7, 0.2, 0.1], [0.25, 0.25, 0.5]]);
        let target = arr2(&[[1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
        let loss = cross_entropy(target.view(), probs.view()).unwrap();
        assert_relative_eq!(-(0.7f64.ln() + 0.5f64.ln()), loss, epsilon = 1e-12);
    }

    #[test]
    fn zero_probability_stays_finite() {
        let probs = arr2(&[[1.0, 0.0]]);
        let target = arr2(&[[0.0, 1.0]]);
        let loss = cross_entropy(target.view(), probs.view()).unwrap();
        assert!(loss.is_finite());
        assert!(loss > 600.0);
    }

    #[test]
    fn objective_adds_half_l2() {
        let params = Parameters::from_layers(vec![(arr2(&[[1.0, 2.0]]), arr1(&[5.0, 5.0]))])
            .unwrap();
        let probs = arr2(&[[0.5, 0.5]]);
        let target = arr2(&[[1.0, 0.0]]);
        let value = objective(target.view(), probs.view(), &params, 0.2).unwrap();
        assert_relative_eq!(2.0f64.ln() + 0.5, value, epsilon = 1e-12);
    }

    #[test]
    fn shapes_must_agree() {
        let probs = arr2(&[[0.5, 0.5]]);
        let target = arr2(&[[1.0, 0.0, 0.0]]);
        assert!(cross_entropy(target.view(), probs.view()).is_err());

        let transposed = arr2(&[[1.0], [0.0]]);
        assert_eq!(
            Err(Error::ShapeMismatch {
                what: "cross-entropy target rows",
                got: 2,
                expected: 1
            }),
            cross_entropy(transposed.view(), probs.view())
        );
    }
}
