use crate::fixed::to_fixed;

#[test]
fn round_exact_halves_away_from_zero() {
    assert_eq!(to_fixed(0.25, 1), "0.3");
    assert_eq!(to_fixed(0.75, 1), "0.8");
    assert_eq!(to_fixed(-0.25, 1), "-0.3");
    assert_eq!(to_fixed(2.5, 0), "3");
    assert_eq!(to_fixed(1.03125, 4), "1.0313");
}

#[test]
fn keep_values_that_are_no_exact_tie() {
    // 0.15 is stored slightly below the half.
    assert_eq!(to_fixed(0.15, 1), "0.1");
    assert_eq!(to_fixed(123.456, 1), "123.5");
    assert_eq!(to_fixed(6.82064321, 4), "6.8206");
    assert_eq!(to_fixed(0.0, 1), "0.0");
}

#[test]
fn format_non_finite_values() {
    assert_eq!(to_fixed(f64::NAN, 1), "NaN");
    assert_eq!(to_fixed(f64::INFINITY, 1), "inf");
}
