use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// A synthesized test case. Serializes to the `testCases` JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseSpec {
    /// Human-readable title
    pub title: String,

    pub category: Category,

    pub priority: Priority,

    /// State the page must be in before the steps run
    pub preconditions: String,

    /// Ordered steps
    pub steps: Vec<Step>,

    #[serde(rename = "expectedResults")]
    pub expected_result: ExpectedResult,

    /// Boundary inputs and failure modes worth trying, in insertion order
    pub edge_cases: IndexSet<String>,
}

/// Ordered for tie-breaking: navigation < form < image < accessibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Navigation,
    Form,
    Image,
    Accessibility,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Navigation => "navigation",
            Category::Form => "form",
            Category::Image => "image",
            Category::Accessibility => "accessibility",
        }
    }
}

/// Ordered so that sorting ascending puts `High` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

/// A single step of a test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub action: StepAction,

    /// Field name as a reader would refer to it (input name, element label)
    pub field: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Locator used when the step is rendered as executable test code
    pub selector: String,
}

impl Step {
    pub fn fill(field: &str, value: &str, selector: String) -> Self {
        Self {
            action: StepAction::Fill,
            field: field.to_string(),
            value: Some(value.to_string()),
            selector,
        }
    }

    pub fn select(field: &str, value: &str, selector: String) -> Self {
        Self {
            action: StepAction::Select,
            field: field.to_string(),
            value: Some(value.to_string()),
            selector,
        }
    }

    pub fn click(field: &str, selector: String) -> Self {
        Self {
            action: StepAction::Click,
            field: field.to_string(),
            value: None,
            selector,
        }
    }

    pub fn assert(field: &str, expectation: Option<&str>, selector: String) -> Self {
        Self {
            action: StepAction::Assert,
            field: field.to_string(),
            value: expectation.map(str::to_string),
            selector,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepAction {
    Fill,
    /// Choose an option of a `<select>`
    Select,
    Click,
    Assert,
}

impl StepAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepAction::Fill => "fill",
            StepAction::Select => "select",
            StepAction::Click => "click",
            StepAction::Assert => "assert",
        }
    }
}

/// What must hold after the steps run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ExpectedResult {
    /// The browser ends up at `url`
    Redirect { url: String },

    /// An element matching `selector` is visible
    ElementVisible { selector: String },
}

impl ExpectedResult {
    pub fn kind(&self) -> &'static str {
        match self {
            ExpectedResult::Redirect { .. } => "redirect",
            ExpectedResult::ElementVisible { .. } => "elementVisible",
        }
    }

    pub fn target(&self) -> &str {
        match self {
            ExpectedResult::Redirect { url } => url,
            ExpectedResult::ElementVisible { selector } => selector,
        }
    }
}
