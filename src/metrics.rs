use crate::error::{Error, Result};

/// Compute accuracy of the predicted labels `y_pred` to the correct labels `y_true`.
pub fn accuracy<Label>(y_true: &[Label], y_pred: &[Label]) -> Result<f64>
where
    Label: Eq,
{
    if y_true.len() != y_pred.len() {
        return Err(Error::ShapeMismatch {
            what: "predicted labels",
            got: y_pred.len(),
            expected: y_true.len(),
        });
    }
    if y_true.is_empty() {
        return Err(Error::InvalidInput("accuracy of an empty label set"));
    }
    let n_corrects = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count();
    Ok(n_corrects as f64 / y_true.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn compute_accuracy() {
        let y_true = [0, 1, 2, 1, 0];
        let y_pred = [0, 2, 2, 1, 1];
        assert_relative_eq!(0.6, accuracy(&y_true, &y_pred).unwrap());
    }

    #[test]
    fn lengths_must_match() {
        assert!(accuracy(&[0, 1], &[0]).is_err());
        assert!(accuracy::<usize>(&[], &[]).is_err());
    }
}
