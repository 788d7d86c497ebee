//! Attribute coercion. Failures become `None`, never errors.

pub fn coerce_int(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

pub fn coerce_float(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_a_value_not_absent() {
        assert_eq!(coerce_int("0"), Some(0));
        assert_eq!(coerce_float("0.0"), Some(0.0));
    }

    #[test]
    fn int_rejects_empty_and_garbage() {
        assert_eq!(coerce_int(""), None);
        assert_eq!(coerce_int("12a"), None);
        assert_eq!(coerce_int("1.5"), None);
        assert_eq!(coerce_int("-42"), Some(-42));
        assert_eq!(coerce_int(" 7 "), Some(7));
    }

    #[test]
    fn float_parses_coordinates() {
        assert_eq!(coerce_float("37.5"), Some(37.5));
        assert_eq!(coerce_float("-122.0"), Some(-122.0));
        assert_eq!(coerce_float("abc"), None);
        assert_eq!(coerce_float(""), None);
    }
}
