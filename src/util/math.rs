//! Activation helpers for decoding raw network outputs.

/// Logistic function mapping any real input into (0, 1).
pub(crate) fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// In-place softmax with max subtraction for numerical stability.
///
/// An empty slice is left untouched.
pub(crate) fn softmax_in_place(logits: &mut [f32]) {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let mut sum = 0.0f32;
    for value in logits.iter_mut() {
        *value = (*value - max).exp();
        sum += *value;
    }
    if sum > 0.0 {
        for value in logits.iter_mut() {
            *value /= sum;
        }
    }
}

/// Index and value of the largest element; the first maximum wins on ties.
pub(crate) fn argmax(values: &[f32]) -> (usize, f32) {
    let mut best_idx = 0;
    let mut best = f32::NEG_INFINITY;
    for (idx, &value) in values.iter().enumerate() {
        if value > best {
            best = value;
            best_idx = idx;
        }
    }
    (best_idx, best)
}

#[cfg(test)]
mod tests {
    use super::{argmax, sigmoid, softmax_in_place};

    #[test]
    fn sigmoid_maps_known_points() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-6);
        assert!(sigmoid(20.0) > 0.999_999);
        assert!(sigmoid(-20.0) < 1e-6);
    }

    #[test]
    fn softmax_sums_to_one() {
        let mut logits = [1.0f32, 2.0, 3.0, 4.0];
        softmax_in_place(&mut logits);
        let sum: f32 = logits.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(logits.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn softmax_is_stable_for_large_logits() {
        let mut logits = [1000.0f32, 1000.0, 1000.0];
        softmax_in_place(&mut logits);
        for value in logits {
            assert!((value - 1.0 / 3.0).abs() < 1e-6);
        }
    }

    #[test]
    fn argmax_prefers_first_on_ties() {
        assert_eq!(argmax(&[0.5, 0.5, 0.1]), (0, 0.5));
        assert_eq!(argmax(&[0.1, 0.9, 0.2]).0, 1);
    }
}
