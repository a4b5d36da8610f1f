//! Tests for derived results

use pretty_assertions::assert_eq;
use quantcalc::{Derived, EvalError, Percentage, Value, expand::source_expression};

fn expand(input: &str) -> Vec<Derived> {
    let _ = env_logger::builder().is_test(true).try_init();
    match quantcalc::evaluate(input) {
        Ok(value) => quantcalc::expand(&value),
        Err(e) => panic!("Failed to evaluate '{}': {}", input, e),
    }
}

fn rendered(derived: &[Derived]) -> Vec<(&str, String)> {
    derived
        .iter()
        .map(|d| match &d.value {
            Ok(value) => (d.label, quantcalc::render(value)),
            Err(e) => panic!("Derived '{}' failed: {}", d.source, e),
        })
        .collect()
}

#[test]
fn test_percentage_expansion() {
    let derived = expand("15%");
    assert_eq!(
        rendered(&derived),
        vec![
            ("Complement", "85%".to_string()),
            ("Inverse", "6.66666666667".to_string()),
        ]
    );
    assert_eq!(derived[0].source, "100% - 15%");
    assert_eq!(derived[1].source, "1 / 15%");

    match &derived[0].value {
        Ok(Value::Percentage(p)) => assert!((p.fraction - 0.85).abs() < 1e-12),
        other => panic!("Expected a percentage, got {:?}", other),
    }
    match &derived[1].value {
        Ok(Value::Number(n)) => assert!((n - 1.0 / 0.15).abs() < 1e-12),
        other => panic!("Expected a number, got {:?}", other),
    }
}

#[test]
fn test_tuple_expansion() {
    let derived = expand("(2, 8)");
    assert_eq!(
        rendered(&derived),
        vec![
            ("Ratio", "400%".to_string()),
            ("Inverse ratio", "25%".to_string()),
            ("Decibels", "6.02059991328".to_string()),
        ]
    );
    match &derived[2].value {
        Ok(Value::Number(db)) => assert!((db - 6.0206).abs() < 1e-4),
        other => panic!("Expected a number, got {:?}", other),
    }
}

#[test]
fn test_tuple_of_measures() {
    let derived = expand("(2 km, 500 m)");
    assert_eq!(
        rendered(&derived),
        vec![
            ("Ratio", "25%".to_string()),
            ("Inverse ratio", "400%".to_string()),
            ("Decibels", "-6.02059991328".to_string()),
        ]
    );
}

#[test]
fn test_failing_entry_does_not_affect_others() {
    let derived = expand("(2, -8)");
    assert_eq!(derived.len(), 3);
    assert!(derived[0].value.is_ok());
    assert!(derived[1].value.is_ok());
    assert!(matches!(
        derived[2].value,
        Err(EvalError::DomainError {
            function: "log10",
            ..
        })
    ));

    let derived = expand("0%");
    assert!(derived[0].value.is_ok());
    assert!(matches!(
        derived[1].value,
        Err(EvalError::DivisionByZero { .. })
    ));
}

#[test]
fn test_nothing_to_expand() {
    assert!(expand("42").is_empty());
    assert!(expand("10 km").is_empty());
}

#[test]
fn test_expansion_is_one_level_deep() {
    // Derived results are plain values; expanding one is a separate call.
    let derived = expand("15%");
    let complement = derived[0].value.clone().unwrap();
    assert_eq!(complement, Value::Percentage(Percentage::new(1.0 - 0.15)));
    assert_eq!(quantcalc::expand(&complement).len(), 2);
}

#[test]
fn test_serialize_derived() {
    let derived = expand("(2, 8)");
    let json = serde_json::to_value(&derived[0]).unwrap();
    assert_eq!(json["label"], "Ratio");
    assert_eq!(json["source"], "8 / 2 in %");
    assert_eq!(json["value"]["Ok"]["kind"], "percentage");
}

#[test]
fn test_tuple_of_powered_units() {
    let derived = expand("(2 m ^ 2, 4 m ^ 2)");
    assert_eq!(derived[0].source, "(16 * 1 meter ^ 2) / (4 * 1 meter ^ 2) in %");
    assert_eq!(
        rendered(&derived),
        vec![
            ("Ratio", "400%".to_string()),
            ("Inverse ratio", "25%".to_string()),
            ("Decibels", "6.02059991328".to_string()),
        ]
    );
}

#[test]
fn test_tuple_of_compound_units() {
    let derived = expand("(2 m/s, 8 m/s)");
    assert_eq!(derived[0].source, "8 meter/second / 2 meter/second in %");
    assert_eq!(
        rendered(&derived),
        vec![
            ("Ratio", "400%".to_string()),
            ("Inverse ratio", "25%".to_string()),
            ("Decibels", "6.02059991328".to_string()),
        ]
    );
}

fn assert_close(actual: &Value, expected: &Value, context: &str) {
    let close = |a: f64, b: f64| (a - b).abs() <= b.abs() * 1e-9 + 1e-12;
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => assert!(close(*a, *b), "{}: {} vs {}", context, a, b),
        (Value::Percentage(a), Value::Percentage(b)) => {
            assert!(close(a.fraction, b.fraction), "{}: {} vs {}", context, a, b)
        }
        (Value::Measure(a), Value::Measure(b)) => {
            assert_eq!(a.unit, b.unit, "{}", context);
            assert!(close(a.value, b.value), "{}: {} vs {}", context, a, b);
        }
        (Value::Tuple(a1, a2), Value::Tuple(b1, b2)) => {
            assert_close(a1, b1, context);
            assert_close(a2, b2, context);
        }
        _ => panic!("{}: {:?} is not {:?}", context, actual, expected),
    }
}

#[test]
fn test_sources_evaluate_back_to_their_values() {
    let inputs = [
        "42",
        "-8",
        "0.1 + 0.2",
        "15%",
        "2 m ^ 2",
        "10 km / 2 h",
        "10 / 2 s",
        "5 meter in centimeter",
        "10 km/h in m/s",
        "3 in",
        "3 widget",
        "(2 m ^ 2, 4 m ^ 2)",
        "(2 m/s, 8 m/s)",
        "(10 / 2 s, 1 / 4 s)",
        "(15%, 42)",
    ];
    for input in inputs {
        let value = quantcalc::evaluate(input).unwrap();
        let source = source_expression(&value).to_string();
        match quantcalc::evaluate(&source) {
            Ok(again) => assert_close(&again, &value, &source),
            Err(e) => panic!("Source '{}' of '{}' failed: {}", source, input, e),
        }

        for d in expand(input) {
            if let Ok(expected) = &d.value {
                assert_close(&quantcalc::evaluate(&d.source).unwrap(), expected, &d.source);
            }
        }
    }
}
