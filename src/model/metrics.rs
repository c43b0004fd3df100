//! Binary classification scores, positive class = 1.

pub fn accuracy(truth: &[usize], predicted: &[usize]) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let hits = truth.iter().zip(predicted).filter(|(t, p)| t == p).count();
    hits as f64 / truth.len() as f64
}

/// F1 of the positive class; 0 when there are no true positives.
pub fn f1(truth: &[usize], predicted: &[usize]) -> f64 {
    let (mut tp, mut fp, mut fn_) = (0usize, 0usize, 0usize);
    for (&t, &p) in truth.iter().zip(predicted) {
        match (t == 1, p == 1) {
            (true, true) => tp += 1,
            (false, true) => fp += 1,
            (true, false) => fn_ += 1,
            (false, false) => {}
        }
    }
    if tp == 0 {
        return 0.0;
    }
    2.0 * tp as f64 / (2 * tp + fp + fn_) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_match_hand_counts() {
        let truth = [1, 0, 1, 1, 0];
        let pred = [1, 1, 0, 1, 0];
        assert!((accuracy(&truth, &pred) - 0.6).abs() < 1e-12);
        // tp=2 fp=1 fn=1
        assert!((f1(&truth, &pred) - 4.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn no_positives_scores_zero() {
        assert_eq!(f1(&[0, 0], &[0, 0]), 0.0);
        assert_eq!(accuracy(&[], &[]), 0.0);
    }
}
