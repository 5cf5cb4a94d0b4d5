use serde::{Deserialize, Serialize};

use crate::screen::screen_model::{Input, InputType};

/// Which boundary inputs the synthesizer enumerates as edge cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryPolicy {
    #[serde(default = "default_true")]
    pub empty_value: bool,

    #[serde(default = "default_true")]
    pub over_length: bool,

    #[serde(default = "default_true")]
    pub type_mismatch: bool,

    /// Length treated as the limit when an input declares no `maxlength`
    #[serde(default = "default_max_length")]
    pub default_max_length: usize,

    /// Element that signals a successful submission without navigation
    #[serde(default = "default_success_selector")]
    pub success_selector: String,
}

impl Default for BoundaryPolicy {
    fn default() -> Self {
        Self {
            empty_value: true,
            over_length: true,
            type_mismatch: true,
            default_max_length: 255,
            success_selector: default_success_selector(),
        }
    }
}

fn default_true() -> bool { true }
fn default_max_length() -> usize { 255 }
fn default_success_selector() -> String { "[role=\"status\"], .success".to_string() }

impl BoundaryPolicy {
    /// Boundary edge cases for one input, in a fixed order.
    pub fn edge_cases_for(&self, input: &Input) -> Vec<String> {
        let field = input.field_name();
        let mut cases = Vec::new();

        if self.empty_value {
            cases.push(format!("{}: empty string", field));
        }

        if self.over_length && accepts_length(&input.input_type) {
            let declared = input
                .constraint("maxlength")
                .and_then(|m| m.parse::<usize>().ok());
            // A limit of usize::MAX cannot be exceeded.
            match declared {
                Some(max) => {
                    if let Some(over) = max.checked_add(1) {
                        cases.push(format!(
                            "{}: {} characters (exceeds maxlength {})",
                            field, over, max
                        ));
                    }
                }
                None => {
                    if let Some(over) = self.default_max_length.checked_add(1) {
                        cases.push(format!(
                            "{}: over-length string of {} characters",
                            field, over
                        ));
                    }
                }
            }
        }

        if self.type_mismatch {
            if let Some(bad) = mismatched_value(&input.input_type) {
                cases.push(format!("{}: type-mismatched value '{}'", field, bad));
            }
        }

        cases
    }
}

fn accepts_length(input_type: &InputType) -> bool {
    !matches!(
        input_type,
        InputType::Number | InputType::Range | InputType::Date
    )
}

/// A value of the wrong shape for typed inputs. Free text has none.
pub fn mismatched_value(input_type: &InputType) -> Option<&'static str> {
    match input_type {
        InputType::Email => Some("not-an-email"),
        InputType::Url => Some("not a url"),
        InputType::Number | InputType::Range => Some("abc"),
        InputType::Tel => Some("phone-number"),
        InputType::Date => Some("31/31/2024"),
        _ => None,
    }
}
