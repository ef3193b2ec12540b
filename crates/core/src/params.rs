//! Pure helpers for pulling option values out of a `serde_json::Value` object.
//!
//! Two substitution rules exist, mirroring how the options have always been
//! read:
//!
//! - **truthy** (`param_f64_truthy`, `param_usize_truthy`, `param_string_truthy`):
//!   a missing key, a wrong type, `0`, `NaN` or `""` all count as absent.
//! - **typed** (`param_f64`, `param_bool`): any value of the right type is
//!   accepted, including `0` and `false`.
//!
//! None of these fail; they always produce a usable value.

use serde_json::Value;

/// Extracts an `f64`, returning `default` if missing or not a number.
///
/// Accepts `0.0`.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Extracts a non-zero `f64`, or `None` when missing, zero, NaN, or not a number.
pub fn param_f64_truthy(params: &Value, name: &str) -> Option<f64> {
    params
        .get(name)
        .and_then(Value::as_f64)
        .filter(|v| *v != 0.0 && !v.is_nan())
}

/// Extracts a positive integer, returning `default` if missing, zero, or not
/// a non-negative integer.
///
/// Fractional numbers are truncated toward zero first, so `2.7` reads as `2`
/// and `0.5` falls back to the default.
pub fn param_usize_truthy(params: &Value, name: &str, default: usize) -> usize {
    let Some(v) = params.get(name) else {
        return default;
    };
    let n = v
        .as_u64()
        .or_else(|| v.as_f64().filter(|f| *f >= 1.0).map(|f| f as u64));
    match n {
        Some(n) if n > 0 => n as usize,
        _ => default,
    }
}

/// Extracts an `i64`, returning `default` if missing, zero, or not an integer.
pub fn param_i64_truthy(params: &Value, name: &str, default: i64) -> i64 {
    params
        .get(name)
        .and_then(Value::as_i64)
        .filter(|v| *v != 0)
        .unwrap_or(default)
}

/// Extracts a `bool`, returning `default` if missing or not a boolean.
pub fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

/// Extracts a non-empty string, or `None` when missing, empty, or not a string.
pub fn param_string_truthy(params: &Value, name: &str) -> Option<String> {
    params
        .get(name)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // -- param_f64 --

    #[test]
    fn param_f64_accepts_zero() {
        let params = json!({"rateX": 0});
        assert_eq!(param_f64(&params, "rateX", 2.0), 0.0);
    }

    #[test]
    fn param_f64_extracts_integer_as_float() {
        let params = json!({"rateY": 3});
        assert!((param_f64(&params, "rateY", 2.0) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_when_wrong_type() {
        let params = json!({"rateX": "fast"});
        assert!((param_f64(&params, "rateX", 2.0) - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_for_non_object() {
        let params = json!("not an object");
        assert!((param_f64(&params, "rateX", 7.0) - 7.0).abs() < f64::EPSILON);
    }

    // -- param_f64_truthy --

    #[test]
    fn param_f64_truthy_treats_zero_as_absent() {
        let params = json!({"distance": 0});
        assert_eq!(param_f64_truthy(&params, "distance"), None);
    }

    #[test]
    fn param_f64_truthy_keeps_negative_values() {
        let params = json!({"rate": -0.5});
        assert_eq!(param_f64_truthy(&params, "rate"), Some(-0.5));
    }

    #[test]
    fn param_f64_truthy_ignores_null_and_strings() {
        assert_eq!(param_f64_truthy(&json!({"distance": null}), "distance"), None);
        assert_eq!(param_f64_truthy(&json!({"distance": "80"}), "distance"), None);
    }

    // -- param_usize_truthy --

    #[test]
    fn param_usize_truthy_extracts_integer() {
        assert_eq!(param_usize_truthy(&json!({"count": 42}), "count", 100), 42);
    }

    #[test]
    fn param_usize_truthy_zero_falls_back() {
        assert_eq!(param_usize_truthy(&json!({"count": 0}), "count", 100), 100);
    }

    #[test]
    fn param_usize_truthy_truncates_fractions() {
        assert_eq!(param_usize_truthy(&json!({"count": 2.7}), "count", 100), 2);
        assert_eq!(param_usize_truthy(&json!({"count": 0.5}), "count", 100), 100);
    }

    #[test]
    fn param_usize_truthy_rejects_negative() {
        assert_eq!(param_usize_truthy(&json!({"count": -4}), "count", 100), 100);
    }

    // -- param_i64_truthy --

    #[test]
    fn param_i64_truthy_zero_falls_back() {
        assert_eq!(param_i64_truthy(&json!({"zIndex": 0}), "zIndex", 1), 1);
        assert_eq!(param_i64_truthy(&json!({"zIndex": -3}), "zIndex", 1), -3);
    }

    // -- param_bool --

    #[test]
    fn param_bool_accepts_false() {
        assert!(!param_bool(&json!({"line": false}), "line", true));
    }

    #[test]
    fn param_bool_returns_default_for_wrong_type() {
        assert!(param_bool(&json!({"line": 0}), "line", true));
    }

    // -- param_string_truthy --

    #[test]
    fn param_string_truthy_empty_is_absent() {
        assert_eq!(param_string_truthy(&json!({"color": ""}), "color"), None);
        assert_eq!(
            param_string_truthy(&json!({"color": "#f00"}), "color").as_deref(),
            Some("#f00")
        );
    }
}
