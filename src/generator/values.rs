use crate::screen::screen_model::{Input, InputType};

/// Longest value produced by padding up to a declared `minlength`.
pub const MAX_PADDED_LENGTH: usize = 1024;

/// Integral values below this magnitude are printed without a fraction.
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

/// A value that should pass the input's validation.
///
/// Checks the input type first, then name/label heuristics, then clamps the
/// result to any declared length or numeric bounds.
pub fn valid_value(input: &Input) -> String {
    if input.input_type == InputType::Select {
        return input
            .options
            .iter()
            .find(|o| !o.value.is_empty())
            .map(|o| o.value.clone())
            .unwrap_or_default();
    }

    if matches!(input.input_type, InputType::Number | InputType::Range) {
        return numeric_value(input);
    }

    let hint = format!("{} {}", input.field_name(), input.label);
    let raw = guess_value(&hint, Some(input.input_type.as_str()));
    clamp_length(raw, input)
}

/// Guess a plausible value from a field description and input type.
pub fn guess_value(label: &str, input_type: Option<&str>) -> String {
    // Type is authoritative for typed inputs
    if let Some(t) = input_type {
        match t {
            "email" => return "user@example.com".into(),
            "password" => return "TestPass123!".into(),
            "tel" => return "555-0100".into(),
            "url" => return "https://example.com".into(),
            "number" | "range" => return "42".into(),
            "date" => return "2025-01-15".into(),
            _ => {}
        }
    }

    let l = label.to_lowercase();

    // Label-based heuristics (checked in order)
    if l.contains("email") {
        return "user@example.com".into();
    }
    if l.contains("password") {
        return "TestPass123!".into();
    }
    if l.contains("phone") || l.contains("tel") {
        return "555-0100".into();
    }
    if l.contains("url") || l.contains("website") {
        return "https://example.com".into();
    }
    if l.contains("zip") || l.contains("postal") {
        return "90210".into();
    }
    if l.contains("username") || l.contains("user") || l.contains("login") {
        return "testuser".into();
    }
    if l.contains("name") {
        return "Jane Doe".into();
    }
    if l.contains("search") || l.contains("query") {
        return "test query".into();
    }
    if l.contains("date") {
        return "2025-01-15".into();
    }
    if l.contains("number") || l.contains("amount") || l.contains("quantity") {
        return "42".into();
    }

    "test".into()
}

fn numeric_value(input: &Input) -> String {
    let bound = |attr: &str| {
        input
            .constraint(attr)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite())
    };

    let mut value = 42.0_f64;
    if let Some(max) = bound("max") {
        value = value.min(max);
    }
    if let Some(min) = bound("min") {
        value = value.max(min);
    }

    if value.fract() == 0.0 && value.abs() < EXACT_INTEGER_LIMIT {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

fn clamp_length(mut value: String, input: &Input) -> String {
    if let Some(min) = input.constraint("minlength").and_then(|v| v.parse::<usize>().ok()) {
        let min = min.min(MAX_PADDED_LENGTH);
        let len = value.chars().count();
        if len < min {
            value.extend(std::iter::repeat_n('x', min - len));
        }
    }
    if let Some(max) = input.constraint("maxlength").and_then(|v| v.parse::<usize>().ok()) {
        if value.chars().count() > max {
            value = value.chars().take(max).collect();
        }
    }
    value
}
