//! Tests for compound unit algebra and SI normalization

use pretty_assertions::assert_eq;
use quantcalc::Unit;

fn unit(numerator: &[&str], denominator: &[&str]) -> Unit {
    Unit::new(numerator.iter().copied(), denominator.iter().copied())
}

/// Asserts a normalization result, comparing the multiplier with a relative
/// tolerance since table factors compound through floating point.
fn assert_normalizes(input: Unit, multiplier: f64, expected: Unit) {
    let (actual_multiplier, actual) = input.normalize().unwrap();
    assert_eq!(actual, expected, "normalized unit of '{}'", input);
    assert!(
        (actual_multiplier - multiplier).abs() <= multiplier.abs() * 1e-9,
        "multiplier of '{}': expected {}, got {}",
        input,
        multiplier,
        actual_multiplier
    );
}

#[test]
fn test_empty_unit() {
    let empty = Unit::dimensionless();
    assert!(empty.is_empty());
    assert_eq!(empty.to_string(), "");
    assert_eq!(unit(&["a"], &[]).numerator(), vec!["a"]);
}

#[test]
fn test_construction_cancels_common_symbols() {
    let u = unit(&["a", "b", "a"], &["a", "c"]);
    assert_eq!(u.numerator(), vec!["a", "b"]);
    assert_eq!(u.denominator(), vec!["c"]);
    assert!(unit(&["m"], &["m"]).is_empty());
}

#[test]
fn test_equality_ignores_order() {
    assert_eq!(unit(&["a", "b"], &["c", "d"]), unit(&["b", "a"], &["d", "c"]));
    assert_ne!(unit(&["a"], &["b"]), unit(&["b"], &["a"]));
}

#[test]
fn test_multiply_and_divide() {
    let a = unit(&["meter"], &["second"]);
    let b = unit(&["second"], &[]);
    assert_eq!(a.multiply(&b).unwrap(), unit(&["meter"], &[]));
    assert_eq!(b.multiply(&a).unwrap(), unit(&["meter"], &[]));
    assert_eq!(a.divide(&b).unwrap(), unit(&["meter"], &["second", "second"]));
    assert_eq!(a.divide(&a).unwrap(), Unit::dimensionless());
    assert_eq!(Unit::dimensionless().multiply(&a).unwrap(), a);
}

#[test]
fn test_exponent_overflow() {
    let huge = unit(&["meter"], &[]).powi(i32::MAX).unwrap();
    assert!(huge.multiply(&unit(&["meter"], &[])).is_err());
    assert!(huge.divide(&unit(&[], &["meter"])).is_err());
    assert!(huge.divide(&unit(&["meter"], &[])).is_ok());
    assert!(huge.multiply(&unit(&["m"], &[])).unwrap().normalize().is_err());
}

#[test]
fn test_rendering() {
    assert_eq!(unit(&["a", "a", "c"], &["b", "d"]).to_string(), "a^2 c / b d");
    assert_eq!(unit(&["a"], &["b"]).to_string(), "a / b");
    assert_eq!(unit(&["meter", "meter"], &[]).to_string(), "meter^2");
}

#[test]
fn test_parse_rendered_unit() {
    let rendered = unit(&["a", "a", "c"], &["b", "d"]);
    assert_eq!(rendered.to_string().parse::<Unit>().unwrap(), rendered);
    assert_eq!("meter / second".parse::<Unit>().unwrap(), unit(&["meter"], &["second"]));
}

#[test]
fn test_normalize_basic() {
    assert_normalizes(Unit::dimensionless(), 1.0, Unit::dimensionless());
    assert_normalizes(unit(&["m"], &[]), 1.0, unit(&["meter"], &[]));
    assert_normalizes(unit(&["m"], &["m"]), 1.0, Unit::dimensionless());
    assert_normalizes(unit(&["kilometer"], &[]), 1000.0, unit(&["meter"], &[]));
    assert_normalizes(unit(&["meter"], &["kilometer"]), 0.001, Unit::dimensionless());
    assert_normalizes(unit(&["milligram"], &[]), 0.001, unit(&["gram"], &[]));
}

#[test]
fn test_normalize_compound() {
    assert_normalizes(
        unit(&["milligram"], &["kilometer"]),
        0.000001,
        unit(&["gram"], &["meter"]),
    );
    assert_normalizes(
        unit(&["unknown", "milligram"], &["kilometer"]),
        0.000001,
        unit(&["unknown", "gram"], &["meter"]),
    );
}

#[test]
fn test_normalize_data_units() {
    assert_normalizes(unit(&["B"], &[]), 8.0, unit(&["bit"], &[]));
    assert_normalizes(unit(&["byte"], &[]), 8.0, unit(&["bit"], &[]));
    assert_normalizes(unit(&["bit"], &[]), 1.0, unit(&["bit"], &[]));
    assert_normalizes(unit(&["unknown"], &[]), 1.0, unit(&["unknown"], &[]));
    assert_normalizes(unit(&["KB"], &[]), 8000.0, unit(&["bit"], &[]));
    assert_normalizes(unit(&["gb"], &[]), 1e9, unit(&["bit"], &[]));
    assert_normalizes(unit(&["TB"], &[]), 8e12, unit(&["bit"], &[]));
}

#[test]
fn test_normalize_alternative_units() {
    assert_normalizes(unit(&["km"], &["h"]), 1000.0 / 3600.0, unit(&["meter"], &["second"]));
    assert_normalizes(unit(&["in"], &[]), 0.0254, unit(&["meter"], &[]));
    assert_normalizes(unit(&["mile"], &[]), 1609.34, unit(&["meter"], &[]));
    assert_normalizes(unit(&["pound"], &[]), 453.592, unit(&["gram"], &[]));
    assert_normalizes(unit(&["week"], &[]), 604_800.0, unit(&["second"], &[]));
}

#[test]
fn test_serde_as_string() {
    let u = unit(&["meter"], &["second"]);
    let json = serde_json::to_string(&u).unwrap();
    assert_eq!(json, "\"meter / second\"");
    assert_eq!(serde_json::from_str::<Unit>(&json).unwrap(), u);
}
