/// Default tolerance used by `almost_equals`.
pub const EPSILON: f64 = 1e-6;

/// Writes `softmax(scores / temperature)` into `scores` in place.
///
/// The maximum is subtracted before exponentiating, so large but finite
/// logits do not overflow. Non-finite logits propagate as NaN and are left
/// for the caller to reject.
pub fn softmax_with_temperature(scores: &mut [f64], temperature: f64) {
    if scores.is_empty() {
        return;
    }
    for s in scores.iter_mut() {
        *s /= temperature;
    }
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let mut total = 0.0;
    for s in scores.iter_mut() {
        *s = (*s - max).exp();
        total += *s;
    }
    for s in scores.iter_mut() {
        *s /= total;
    }
}

pub fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

pub fn almost_equals(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn softmax_sums_to_one() {
        let mut s = vec![1.0, 2.0, 3.0];
        softmax_with_temperature(&mut s, 1.0);
        assert_abs_diff_eq!(sum(&s), 1.0, epsilon = 1e-12);
        assert!(s[2] > s[1] && s[1] > s[0]);
    }

    #[test]
    fn high_temperature_flattens() {
        let mut cold = vec![0.0, 4.0];
        let mut hot = cold.clone();
        softmax_with_temperature(&mut cold, 0.5);
        softmax_with_temperature(&mut hot, 10.0);
        assert!(hot[1] < cold[1]);
        assert!((hot[0] - hot[1]).abs() < (cold[0] - cold[1]).abs());
    }

    #[test]
    fn large_logits_do_not_overflow() {
        let mut s = vec![1000.0, 1001.0];
        softmax_with_temperature(&mut s, 1.0);
        assert!(s.iter().all(|p| p.is_finite()));
        assert!(almost_equals(sum(&s), 1.0));
    }
}
