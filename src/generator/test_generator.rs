use std::collections::HashSet;

use indexmap::IndexSet;
use tracing::debug;

use crate::generator::values::valid_value;
use crate::screen::screen_model::{
    Form, Image, Input, InputType, Link, LinkTarget, Navigation, PageInventory,
};
use crate::spec::boundary::BoundaryPolicy;
use crate::spec::spec_model::{Category, ExpectedResult, Priority, Step, TestCaseSpec};

/// A generated case plus the document position of the element it came from.
struct Candidate {
    position: usize,
    spec: TestCaseSpec,
}

// ============================================================================
// Test plan synthesis
// ============================================================================

/// Synthesize test cases with the default boundary policy.
pub fn synthesize(inventory: &PageInventory) -> Vec<TestCaseSpec> {
    synthesize_with(inventory, &BoundaryPolicy::default())
}

/// Synthesize test cases for every element of a classified inventory.
///
/// Output is ordered by priority, then by document position of the
/// originating element, then by category. An empty inventory yields no cases.
pub fn synthesize_with(inventory: &PageInventory, policy: &BoundaryPolicy) -> Vec<TestCaseSpec> {
    let mut candidates = Vec::new();

    for nav in &inventory.navigation {
        candidates.push(navigation_case(nav));
    }

    let mut seen_links = HashSet::new();
    for link in &inventory.links {
        if seen_links.insert((link.href.as_str(), link.display_name())) {
            candidates.push(link_case(link));
        }
    }

    for form in &inventory.forms {
        candidates.push(happy_path_case(form, policy));
        for (index, input) in form.inputs.iter().enumerate() {
            if input.required && !input.disabled {
                candidates.push(missing_required_case(form, index, policy));
            }
        }
    }

    for image in &inventory.images {
        if image.is_decorative() {
            debug!(src = %image.src, "skipping decorative image");
            continue;
        }
        candidates.push(image_case(image));
    }

    candidates.extend(accessibility_cases(inventory));

    // Stable sort: equal keys keep generation order.
    candidates.sort_by_key(|c| (c.spec.priority, c.position, c.spec.category));
    candidates.into_iter().map(|c| c.spec).collect()
}

// ============================================================================
// Navigation
// ============================================================================

fn navigation_case(nav: &Navigation) -> Candidate {
    let selector = nav.selector();
    let name = if nav.label.is_empty() {
        format!("{}", nav.index + 1)
    } else {
        format!("'{}'", nav.label)
    };

    Candidate {
        position: nav.position,
        spec: TestCaseSpec {
            title: format!("Navigation region {} is visible", name),
            category: Category::Navigation,
            priority: Priority::High,
            preconditions: "Page is loaded".into(),
            steps: vec![Step::assert("navigation", Some("visible"), selector.clone())],
            expected_result: ExpectedResult::ElementVisible { selector },
            edge_cases: edge_cases([
                "Navigation menu not rendered",
                "Navigation menu not keyboard accessible",
            ]),
        },
    }
}

fn link_case(link: &Link) -> Candidate {
    let selector = link.selector();
    let name = link.display_name();
    let mut steps = vec![Step::assert(name, Some("visible"), selector.clone())];

    let (title, expected_result, edges) = match &link.target {
        LinkTarget::Internal { path } => {
            steps.push(Step::click(name, selector.clone()));
            (
                format!("Link '{}' navigates to {}", name, path),
                ExpectedResult::Redirect { url: path.clone() },
                edge_cases(["Link target page not found", "Link href is invalid"]),
            )
        }
        target => {
            let edge = match target {
                LinkTarget::External { .. } => "External site unreachable",
                LinkTarget::Fragment => "Fragment target missing from page",
                LinkTarget::NonNavigable => "Link handler not attached",
                _ => "Link has no href",
            };
            (
                format!("Link '{}' exists", name),
                ExpectedResult::ElementVisible {
                    selector: selector.clone(),
                },
                edge_cases([edge]),
            )
        }
    };

    let priority = if link.in_navigation {
        Priority::High
    } else {
        Priority::Low
    };

    Candidate {
        position: link.position,
        spec: TestCaseSpec {
            title,
            category: Category::Navigation,
            priority,
            preconditions: format!("Link '{}' is present on the page", name),
            steps,
            expected_result,
            edge_cases: edges,
        },
    }
}

// ============================================================================
// Forms
// ============================================================================

fn happy_path_case(form: &Form, policy: &BoundaryPolicy) -> Candidate {
    let mut steps = fill_steps(form, None);
    steps.push(submit_step(form));

    let expected_result = if form.navigates() {
        ExpectedResult::Redirect {
            url: form.action.clone(),
        }
    } else {
        ExpectedResult::ElementVisible {
            selector: policy.success_selector.clone(),
        }
    };

    let edges = form
        .inputs
        .iter()
        .filter(|i| !i.disabled && !i.readonly && i.input_type.is_fillable())
        .flat_map(|i| policy.edge_cases_for(i))
        .collect();

    Candidate {
        position: form.position,
        spec: TestCaseSpec {
            title: format!("Submit {} with valid data", form.display_name()),
            category: Category::Form,
            priority: Priority::High,
            preconditions: form_preconditions(form),
            steps,
            expected_result,
            edge_cases: edges,
        },
    }
}

fn missing_required_case(form: &Form, omitted: usize, policy: &BoundaryPolicy) -> Candidate {
    let input = &form.inputs[omitted];
    let field = input.field_name();

    let mut steps = fill_steps(form, Some(omitted));
    steps.push(submit_step(form));

    let mut edges = IndexSet::new();
    if policy.empty_value && input.input_type.is_fillable() {
        edges.insert(format!("{}: whitespace-only value", field));
    }

    Candidate {
        position: form.position,
        spec: TestCaseSpec {
            title: format!(
                "Submit {} without required field '{}'",
                form.display_name(),
                field
            ),
            category: Category::Form,
            priority: Priority::Medium,
            preconditions: form_preconditions(form),
            steps,
            expected_result: ExpectedResult::ElementVisible {
                selector: format!("{}:invalid", scoped(form, input)),
            },
            edge_cases: edges,
        },
    }
}

fn form_preconditions(form: &Form) -> String {
    let mut name = form.display_name();
    if let Some(first) = name.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    format!("{} is present and accessible on the page", name)
}

/// Steps that put every usable control into a valid state, optionally
/// leaving one out.
fn fill_steps(form: &Form, skip: Option<usize>) -> Vec<Step> {
    let mut steps = Vec::new();
    let mut clicked_radios = HashSet::new();

    for (index, input) in form.inputs.iter().enumerate() {
        if Some(index) == skip || input.disabled || input.readonly {
            continue;
        }
        let field = input.field_name();

        match &input.input_type {
            InputType::Select => {
                let value = valid_value(input);
                if !value.is_empty() {
                    steps.push(Step::select(field, &value, scoped(form, input)));
                }
            }
            InputType::Checkbox if input.required => {
                steps.push(Step::click(field, scoped(form, input)));
            }
            InputType::Radio if input.required => {
                if clicked_radios.insert(input.name.as_str()) {
                    steps.push(Step::click(field, scoped(form, input)));
                }
            }
            t if t.is_fillable() => {
                steps.push(Step::fill(field, &valid_value(input), scoped(form, input)));
            }
            _ => {}
        }
    }

    steps
}

fn submit_step(form: &Form) -> Step {
    match form.submit_control() {
        Some(control) => Step::click(control.field_name(), scoped(form, control)),
        None => Step::click("submit", format!("{} >> [type=\"submit\"]", form.selector())),
    }
}

fn scoped(form: &Form, input: &Input) -> String {
    format!("{} >> {}", form.selector(), input.selector())
}

// ============================================================================
// Images
// ============================================================================

fn image_case(image: &Image) -> Candidate {
    let selector = image.selector();
    let name = if image.src.is_empty() {
        selector.clone()
    } else {
        image.src.clone()
    };

    let mut edges = IndexSet::new();
    match image.alt.as_deref() {
        None => {
            edges.insert("Missing alt text".to_string());
        }
        Some(alt) if alt.trim().is_empty() => {
            edges.insert("Empty alt text".to_string());
        }
        Some(_) => {}
    }
    edges.insert("Non-descriptive alt text".to_string());

    Candidate {
        position: image.position,
        spec: TestCaseSpec {
            title: format!("Image '{}' has alternative text", name),
            category: Category::Image,
            priority: Priority::Low,
            preconditions: "Image is rendered on the page".into(),
            steps: vec![Step::assert("alt", Some("non-empty"), selector.clone())],
            expected_result: ExpectedResult::ElementVisible {
                selector: format!("{}[alt]:not([alt=\"\"])", selector),
            },
            edge_cases: edges,
        },
    }
}

// ============================================================================
// Accessibility
// ============================================================================

/// An interactive element as seen by the accessibility checks.
struct Interactive {
    position: usize,
    kind: &'static str,
    field: String,
    selector: String,
    accessible: bool,
}

fn interactive_elements(inventory: &PageInventory) -> Vec<Interactive> {
    let mut seen = HashSet::new();
    let mut elements = Vec::new();

    for link in &inventory.links {
        elements.push(Interactive {
            position: link.position,
            kind: "Link",
            field: link.display_name().to_string(),
            selector: link.selector(),
            accessible: link.accessible,
        });
    }
    for button in inventory.buttons.iter().filter(|b| !b.disabled) {
        let field = if button.text.is_empty() {
            button.kind.clone()
        } else {
            button.text.clone()
        };
        elements.push(Interactive {
            position: button.position,
            kind: "Button",
            field,
            selector: button.selector(),
            accessible: button.accessible,
        });
    }
    for form in &inventory.forms {
        for input in form
            .inputs
            .iter()
            .filter(|i| !i.disabled && i.input_type != InputType::Hidden)
        {
            elements.push(Interactive {
                position: input.position,
                kind: "Input",
                field: input.field_name().to_string(),
                selector: scoped(form, input),
                accessible: input.accessible,
            });
        }
    }

    // Form buttons appear both as inputs and buttons; keep the first.
    elements.retain(|e| seen.insert(e.position));
    elements.sort_by_key(|e| e.position);
    elements
}

fn accessibility_cases(inventory: &PageInventory) -> Vec<Candidate> {
    let elements = interactive_elements(inventory);
    let mut cases: Vec<Candidate> = elements
        .iter()
        .filter(|e| !e.accessible)
        .map(|e| Candidate {
            position: e.position,
            spec: TestCaseSpec {
                title: format!("{} '{}' has an accessible name", e.kind, e.field),
                category: Category::Accessibility,
                priority: Priority::Low,
                preconditions: "Page is loaded".into(),
                steps: vec![Step::assert(
                    &e.field,
                    Some("accessible name"),
                    e.selector.clone(),
                )],
                expected_result: ExpectedResult::ElementVisible {
                    selector: e.selector.clone(),
                },
                edge_cases: edge_cases(["Screen reader announces the element without a name"]),
            },
        })
        .collect();

    if !elements.is_empty() {
        cases.push(Candidate {
            position: usize::MAX,
            spec: TestCaseSpec {
                title: "All interactive elements are keyboard reachable".into(),
                category: Category::Accessibility,
                priority: Priority::Low,
                preconditions: "Page is loaded and focus starts at the document".into(),
                steps: elements
                    .iter()
                    .map(|e| Step::assert(&e.field, Some("focusable"), e.selector.clone()))
                    .collect(),
                expected_result: ExpectedResult::ElementVisible {
                    selector: ":focus-visible".into(),
                },
                edge_cases: edge_cases([
                    "Focus trapped inside a component",
                    "Tab order differs from visual order",
                    "Focus indicator not visible",
                ]),
            },
        });
    }

    cases
}

fn edge_cases<const N: usize>(items: [&str; N]) -> IndexSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}
