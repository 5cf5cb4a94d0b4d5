use serde::{Deserialize, Serialize};

use crate::spec::spec_model::TestCaseSpec;

/// The `test_cases.json` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseDocument {
    pub test_cases: Vec<TestCaseSpec>,
}

/// Pretty-printed `{"testCases": [...]}`.
pub fn render_json(test_cases: &[TestCaseSpec]) -> Result<String, serde_json::Error> {
    let document = TestCaseDocument {
        test_cases: test_cases.to_vec(),
    };
    serde_json::to_string_pretty(&document)
}
