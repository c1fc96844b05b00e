//! Small vector helpers shared by the mock simulations.

use rand::Rng;

use crate::core::error::{Result, SingularisError};

pub const NORM_EPSILON: f64 = 1e-12;

pub fn sum_of_squares(state: &[f64]) -> f64 {
    state.iter().map(|&x| x * x).sum()
}

/// Scales a state so its sum of squares is 1.
pub fn normalize_state(state: &[f64]) -> Result<Vec<f64>> {
    let norm = sum_of_squares(state).sqrt();
    if norm < NORM_EPSILON || !norm.is_finite() {
        return Err(SingularisError::invalid_operation("Cannot normalize a zero vector."));
    }
    Ok(state.iter().map(|&val| val / norm).collect())
}

pub fn inner_product(state1: &[f64], state2: &[f64]) -> Result<f64> {
    if state1.len() != state2.len() {
        return Err(SingularisError::invalid_operation(&format!(
            "States must have the same length for inner product ({} vs {}).",
            state1.len(),
            state2.len()
        )));
    }
    Ok(state1.iter().zip(state2.iter()).map(|(&a, &b)| a * b).sum())
}

/// Samples an index from a probability vector. Rounding slack lands on the
/// last index.
pub fn measure_state<R: Rng + ?Sized>(probabilities: &[f64], rng: &mut R) -> Result<usize> {
    if probabilities.is_empty() {
        return Err(SingularisError::invalid_operation("Cannot measure an empty state."));
    }
    let random_value: f64 = rng.gen();
    let mut cumulative = 0.0;
    for (index, &p) in probabilities.iter().enumerate() {
        cumulative += p;
        if random_value < cumulative {
            return Ok(index);
        }
    }
    Ok(probabilities.len() - 1)
}

/// Shannon entropy in bits, ignoring zero entries.
pub fn shannon_entropy(probabilities: &[f64]) -> f64 {
    probabilities
        .iter()
        .filter(|&&p| p > NORM_EPSILON)
        .map(|&p| -p * p.log2())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn normalize_and_inner_product() {
        let n = normalize_state(&[3.0, 4.0]).unwrap();
        assert!((n[0] - 0.6).abs() < 1e-12);
        assert!((inner_product(&n, &n).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_vector_is_an_error() {
        assert!(normalize_state(&[0.0, 0.0]).is_err());
        assert!(inner_product(&[1.0], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn measurement_respects_certain_outcomes() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..50 {
            assert_eq!(measure_state(&[0.0, 1.0, 0.0], &mut rng).unwrap(), 1);
        }
    }

    #[test]
    fn entropy_of_uniform_distribution() {
        assert!((shannon_entropy(&[0.25; 4]) - 2.0).abs() < 1e-12);
        assert_eq!(shannon_entropy(&[1.0, 0.0]), 0.0);
    }
}
