use marker::grade::{
    HIGH_SIMILARITY_CUTOFF, LOW_SIMILARITY_CUTOFF, MAX_PENALTY, SimilarityTier, penalty,
};

#[test]
fn penalty_is_zero_below_the_low_cutoff() {
    for similarity in [-0.5, 0.0, 0.1, 0.29, 0.299999] {
        assert_eq!(penalty(similarity), 0.0, "similarity: {similarity}");
    }
}

#[test]
fn penalty_is_zero_at_and_above_the_high_cutoff() {
    for similarity in [0.6, 0.75, 1.0, 1.5] {
        assert_eq!(penalty(similarity), 0.0, "similarity: {similarity}");
    }
}

#[test]
fn penalty_is_maximal_at_the_low_cutoff() {
    assert_eq!(penalty(LOW_SIMILARITY_CUTOFF), MAX_PENALTY);
}

#[test]
fn penalty_matches_the_linear_ramp() {
    assert!((penalty(0.45) - 20.0).abs() < 1e-9);
    assert!((penalty(0.375) - 30.0).abs() < 1e-9);
    assert!((penalty(0.525) - 10.0).abs() < 1e-9);
}

#[test]
fn penalty_decreases_monotonically_across_the_band() {
    let samples = [0.30, 0.35, 0.40, 0.45, 0.50, 0.55, 0.5999];
    for pair in samples.windows(2) {
        assert!(
            penalty(pair[0]) > penalty(pair[1]),
            "penalty({}) should exceed penalty({})",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn penalty_vanishes_approaching_the_high_cutoff() {
    let almost = HIGH_SIMILARITY_CUTOFF - 1e-7;
    let value = penalty(almost);
    assert!(value > 0.0);
    assert!(value < 0.001);
}

#[test]
fn tier_boundaries_are_exact() {
    assert_eq!(SimilarityTier::classify(0.299999), SimilarityTier::Low);
    assert_eq!(SimilarityTier::classify(LOW_SIMILARITY_CUTOFF), SimilarityTier::Mid);
    assert_eq!(SimilarityTier::classify(0.599999), SimilarityTier::Mid);
    assert_eq!(SimilarityTier::classify(HIGH_SIMILARITY_CUTOFF), SimilarityTier::High);
}
