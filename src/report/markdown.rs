use crate::spec::spec_model::{Step, TestCaseSpec};

// ============================================================================
// Markdown reporter — one table row per test case
// ============================================================================

/// Render test cases as a Markdown table with columns
/// Title | Preconditions | Steps | Expected Results | Edge Cases.
pub fn render_markdown(test_cases: &[TestCaseSpec]) -> String {
    let mut md = String::from("| Title | Preconditions | Steps | Expected Results | Edge Cases |\n");
    md.push_str("|-------|---------------|-------|------------------|------------|\n");

    for tc in test_cases {
        let steps = tc
            .steps
            .iter()
            .map(describe_step)
            .collect::<Vec<_>>()
            .join("; ");

        let expected = format!(
            "{} ({})",
            tc.expected_result.kind(),
            tc.expected_result.target()
        );

        let edge_cases = tc
            .edge_cases
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("; ");

        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            escape_cell(&tc.title),
            escape_cell(&tc.preconditions),
            escape_cell(&steps),
            escape_cell(&expected),
            escape_cell(&edge_cases),
        ));
    }

    md
}

/// `fill username with 'testuser'`, `click submit`.
pub fn describe_step(step: &Step) -> String {
    match &step.value {
        Some(value) => format!("{} {} with '{}'", step.action.as_str(), step.field, value),
        None => format!("{} {}", step.action.as_str(), step.field),
    }
}

/// Keep cell content on one line and out of the column separators.
fn escape_cell(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('|', "\\|")
        .replace(['\n', '\r'], " ")
}
