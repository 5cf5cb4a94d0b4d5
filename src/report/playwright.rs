use crate::analysis::result::AnalysisResult;
use crate::generator::pom::ts_string;
use crate::spec::spec_model::{ExpectedResult, Step, StepAction};

/// Render a Playwright test file driving the generated page object.
///
/// The page object is imported from `./<Class>`, matching the file names
/// used by `write_outputs`.
pub fn render_spec_file(result: &AnalysisResult, page_url: &str) -> String {
    let class_name = &result.metadata.page_object;
    let mut out = format!(
        "import {{ test, expect }} from '@playwright/test';\nimport {{ {class} }} from './{class}';\n",
        class = class_name
    );

    for tc in &result.test_cases {
        out.push('\n');
        out.push_str(&format!(
            "test({}, async ({{ page }}) => {{\n",
            ts_string(&tc.title)
        ));
        out.push_str(&format!("  const pageObject = new {}(page);\n", class_name));
        out.push_str(&format!(
            "  // {}\n",
            tc.preconditions.replace(['\n', '\r'], " ")
        ));
        out.push_str(&format!("  await pageObject.goto({});\n", ts_string(page_url)));

        for step in &tc.steps {
            out.push_str(&render_step(step));
        }

        out.push_str(&match &tc.expected_result {
            ExpectedResult::Redirect { url } => format!(
                "  await expect(page).toHaveURL(new URL({}, {}).href);\n",
                ts_string(url),
                ts_string(page_url)
            ),
            ExpectedResult::ElementVisible { selector } => format!(
                "  await expect(page.locator({}).first()).toBeVisible();\n",
                ts_string(selector)
            ),
        });

        out.push_str("});\n");
    }

    out
}

fn render_step(step: &Step) -> String {
    let locator = format!("page.locator({}).first()", ts_string(&step.selector));
    let value = step.value.as_deref().unwrap_or_default();

    match step.action {
        StepAction::Fill => format!("  await {}.fill({});\n", locator, ts_string(value)),
        StepAction::Select => {
            format!("  await {}.selectOption({});\n", locator, ts_string(value))
        }
        StepAction::Click => format!("  await {}.click();\n", locator),
        StepAction::Assert => match value {
            "focusable" => format!(
                "  await {locator}.focus();\n  await expect({locator}).toBeFocused();\n",
                locator = locator
            ),
            "non-empty" => format!(
                "  await expect({}).toHaveAttribute('alt', /\\S/);\n",
                locator
            ),
            "accessible name" => {
                format!("  await expect({}).toHaveAccessibleName(/\\S/);\n", locator)
            }
            _ => format!("  await expect({}).toBeVisible();\n", locator),
        },
    }
}
