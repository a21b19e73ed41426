use super::*;
use crate::foundation::rng::SeededRandom;

struct Fixed(f64);

impl RandomSource for Fixed {
    fn next_unit(&mut self) -> f64 {
        self.0
    }
}

#[test]
fn starts_calm() {
    assert_eq!(WindField::new().value(), 0.0);
}

#[test]
fn with_value_clamps_and_rejects_nan() {
    assert_eq!(WindField::with_value(5.0).value(), WIND_LIMIT);
    assert_eq!(WindField::with_value(-5.0).value(), -WIND_LIMIT);
    assert_eq!(WindField::with_value(f64::NAN).value(), 0.0);
    assert_eq!(WindField::with_value(0.3).value(), 0.3);
}

#[test]
fn advance_steps_by_sampled_delta() {
    let mut wind = WindField::new();
    wind.advance(&mut Fixed(1.0));
    assert!((wind.value() - WIND_JITTER).abs() < 1e-15);
    wind.advance(&mut Fixed(0.0));
    assert!(wind.value().abs() < 1e-15);
}

#[test]
fn saturates_at_the_limit_under_constant_push() {
    let mut wind = WindField::with_value(1.19);
    for _ in 0..10 {
        wind.advance(&mut Fixed(0.999_999));
    }
    assert_eq!(wind.value(), WIND_LIMIT);

    let mut wind = WindField::with_value(-1.19);
    for _ in 0..10 {
        wind.advance(&mut Fixed(0.0));
    }
    assert_eq!(wind.value(), -WIND_LIMIT);
}

#[test]
fn stays_bounded_over_long_random_walks() {
    for (seed, start) in [(1u64, 0.0), (2, 1.2), (3, -1.2), (4, 0.7)] {
        let mut rng = SeededRandom::new(seed);
        let mut wind = WindField::with_value(start);
        for _ in 0..50_000 {
            wind.advance(&mut rng);
            assert!((-WIND_LIMIT..=WIND_LIMIT).contains(&wind.value()));
        }
    }
}
