use std::collections::HashMap;
use std::sync::LazyLock;

use indexmap::IndexSet;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::analysis::error::AnalysisError;
use crate::screen::screen_model::{
    AttributeMap, Button, Form, FormMethod, Heading, Image, Input, InputType, Link, LinkTarget,
    NavItem, Navigation, PageInventory, SelectOption,
};

static LABEL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("label[for]").expect("Failed to parse label selector - this is a bug")
});

static OPTION_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("option").expect("Failed to parse option selector - this is a bug")
});

static ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a").expect("Failed to parse anchor selector - this is a bug")
});

/// Attributes copied verbatim into `accessibility_attributes` besides `aria-*`.
const ACCESSIBILITY_ATTRIBUTES: &[&str] = &["role", "title", "tabindex", "alt"];

/// Raw constraint attributes kept on inputs for the classifier.
const CONSTRAINT_ATTRIBUTES: &[&str] = &["maxlength", "minlength", "pattern", "min", "max", "step"];

const NON_NAVIGABLE_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "sms:", "data:"];

// ============================================================================
// Entry points
// ============================================================================

/// Extract the structural inventory of a page.
///
/// Links are classified without a base URL: relative hrefs count as internal,
/// absolute ones as external.
pub fn extract(markup: &str) -> Result<PageInventory, AnalysisError> {
    extract_from(markup, None)
}

/// Extract the structural inventory, resolving link targets against `base`.
///
/// Parsing is lenient: malformed fragments are repaired the way browsers do.
/// Input that contains no markup at all fails with `AnalysisError::Parsing`,
/// while well-formed markup without testable elements yields an empty
/// inventory.
pub fn extract_from(markup: &str, base: Option<&Url>) -> Result<PageInventory, AnalysisError> {
    if markup.trim().is_empty() {
        return Err(AnalysisError::InvalidInput("markup is empty".into()));
    }
    if markup.contains('\0') {
        return Err(AnalysisError::Parsing("markup contains NUL bytes".into()));
    }
    if !contains_tag(markup) {
        return Err(AnalysisError::Parsing("no markup tags found".into()));
    }

    let document = Html::parse_document(markup);
    if !document.errors.is_empty() {
        debug!(
            count = document.errors.len(),
            "parser recovered from malformed markup"
        );
    }

    let mut inventory = PageInventory::default();

    // Pre-order traversal: enumeration index is the document position.
    for (position, node) in document.root_element().descendants().enumerate() {
        let Some(el) = ElementRef::wrap(node) else {
            continue;
        };

        match el.value().name() {
            "form" => {
                let index = inventory.forms.len();
                inventory.forms.push(extract_form(el, index, position));
            }
            "a" => inventory.links.push(extract_link(el, base, position)),
            "button" => inventory.buttons.push(extract_button(el, position)),
            "input" if is_button_input(el) => {
                inventory.buttons.push(extract_button(el, position))
            }
            "img" => inventory.images.push(extract_image(el, position)),
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                inventory.headings.push(extract_heading(el, position))
            }
            _ => {}
        }

        if is_navigation(el) {
            let index = inventory.navigation.len();
            inventory
                .navigation
                .push(extract_navigation(el, index, position));
        }
    }

    Ok(inventory)
}

/// True if the text contains at least one start tag, end tag, comment or
/// doctype.
fn contains_tag(markup: &str) -> bool {
    markup
        .as_bytes()
        .windows(2)
        .any(|w| w[0] == b'<' && (w[1].is_ascii_alphabetic() || w[1] == b'/' || w[1] == b'!'))
}

// ============================================================================
// Forms
// ============================================================================

fn extract_form(el: ElementRef, index: usize, position: usize) -> Form {
    let mut labels: HashMap<String, String> = HashMap::new();
    for label in el.select(&LABEL_SELECTOR) {
        if let Some(target) = label.value().attr("for") {
            labels
                .entry(target.to_string())
                .or_insert_with(|| element_text(label));
        }
    }

    // Subtree nodes follow the form contiguously in pre-order.
    let inputs = el
        .descendants()
        .enumerate()
        .filter_map(|(offset, node)| ElementRef::wrap(node).map(|ctrl| (offset, ctrl)))
        .filter(|(_, ctrl)| {
            matches!(
                ctrl.value().name(),
                "input" | "select" | "textarea" | "button"
            )
        })
        .map(|(offset, ctrl)| extract_input(ctrl, &labels, position + offset))
        .collect();

    let enctype = attr(el, "enctype");

    Form {
        action: attr(el, "action"),
        method: FormMethod::from(attr(el, "method")),
        identifier: attr(el, "id"),
        class_names: class_names(el),
        novalidate: el.value().attr("novalidate").is_some(),
        enctype: if enctype.is_empty() {
            "application/x-www-form-urlencoded".to_string()
        } else {
            enctype
        },
        inputs,
        index,
        position,
    }
}

fn extract_input(ctrl: ElementRef, labels: &HashMap<String, String>, position: usize) -> Input {
    let tag = ctrl.value().name();
    let input_type = match tag {
        "select" => InputType::Select,
        "textarea" => InputType::Textarea,
        "button" => match ctrl.value().attr("type") {
            Some(t) => InputType::parse(t),
            None => InputType::Submit,
        },
        _ => InputType::parse(ctrl.value().attr("type").unwrap_or("text")),
    };

    let identifier = attr(ctrl, "id");

    let value = match tag {
        "textarea" => ctrl.text().collect::<String>(),
        "button" => ctrl
            .value()
            .attr("value")
            .map(str::to_string)
            .unwrap_or_else(|| element_text(ctrl)),
        _ => attr(ctrl, "value"),
    };

    let label = labels
        .get(&identifier)
        .filter(|_| !identifier.is_empty())
        .cloned()
        .or_else(|| enclosing_label(ctrl))
        .unwrap_or_default();

    let mut constraints = AttributeMap::new();
    for name in CONSTRAINT_ATTRIBUTES {
        if let Some(v) = ctrl.value().attr(name) {
            let v = v.trim();
            if !v.is_empty() {
                constraints.insert(name.to_string(), v.to_string());
            }
        }
    }

    let options = if input_type == InputType::Select {
        ctrl.select(&OPTION_SELECTOR)
            .map(|opt| {
                let text = element_text(opt);
                SelectOption {
                    value: opt
                        .value()
                        .attr("value")
                        .map(str::to_string)
                        .unwrap_or_else(|| text.clone()),
                    text,
                    selected: opt.value().attr("selected").is_some(),
                }
            })
            .collect()
    } else {
        Vec::new()
    };

    Input {
        input_type,
        tag: tag.to_string(),
        name: attr(ctrl, "name"),
        identifier,
        class_names: class_names(ctrl),
        required: ctrl.value().attr("required").is_some(),
        disabled: ctrl.value().attr("disabled").is_some(),
        readonly: ctrl.value().attr("readonly").is_some(),
        placeholder: attr(ctrl, "placeholder"),
        value,
        label,
        constraints,
        options,
        validation_rules: AttributeMap::new(),
        accessibility_attributes: accessibility_attributes(ctrl),
        accessible: true,
        position,
    }
}

/// Text of a `<label>` wrapping the control, searched up to the form.
fn enclosing_label(ctrl: ElementRef) -> Option<String> {
    ctrl.ancestors()
        .filter_map(ElementRef::wrap)
        .take_while(|a| a.value().name() != "form")
        .find(|a| a.value().name() == "label")
        .map(element_text)
}

// ============================================================================
// Links, buttons, images, headings, navigation
// ============================================================================

fn extract_link(el: ElementRef, base: Option<&Url>, position: usize) -> Link {
    let href = attr(el, "href").trim().to_string();
    let in_navigation = el
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(is_navigation);

    Link {
        text: element_text(el),
        target: classify_target(&href, base),
        href,
        identifier: attr(el, "id"),
        class_names: class_names(el),
        accessibility_attributes: accessibility_attributes(el),
        in_navigation,
        accessible: true,
        position,
    }
}

/// Classify where an href leads relative to the page's origin.
pub fn classify_target(href: &str, base: Option<&Url>) -> LinkTarget {
    let href = href.trim();
    if href.is_empty() {
        return LinkTarget::Missing;
    }
    if href.starts_with('#') {
        return LinkTarget::Fragment;
    }
    let lower = href.to_ascii_lowercase();
    if NON_NAVIGABLE_SCHEMES.iter().any(|s| lower.starts_with(s)) {
        return LinkTarget::NonNavigable;
    }

    let resolved = match base {
        Some(b) => b.join(href).ok(),
        None => Url::parse(href).ok(),
    };

    match (resolved, base) {
        (Some(url), Some(b)) if url.origin() == b.origin() => LinkTarget::Internal {
            path: path_of(&url),
        },
        (Some(url), _) if matches!(url.scheme(), "http" | "https") => LinkTarget::External {
            url: url.to_string(),
        },
        (Some(_), _) => LinkTarget::NonNavigable,
        (None, _) if href.starts_with("//") => LinkTarget::External {
            url: href.to_string(),
        },
        (None, _) => LinkTarget::Internal {
            path: href.to_string(),
        },
    }
}

fn path_of(url: &Url) -> String {
    let mut path = url.path().to_string();
    if let Some(query) = url.query() {
        path.push('?');
        path.push_str(query);
    }
    if let Some(fragment) = url.fragment() {
        path.push('#');
        path.push_str(fragment);
    }
    path
}

fn is_button_input(el: ElementRef) -> bool {
    el.value()
        .attr("type")
        .map(|t| t.trim().to_ascii_lowercase())
        .is_some_and(|t| matches!(t.as_str(), "button" | "submit" | "reset"))
}

fn extract_button(el: ElementRef, position: usize) -> Button {
    let tag = el.value().name().to_string();
    let (text, kind) = if tag == "button" {
        let kind = el
            .value()
            .attr("type")
            .map(|t| t.trim().to_ascii_lowercase())
            .unwrap_or_else(|| "submit".to_string());
        (element_text(el), kind)
    } else {
        (
            attr(el, "value").trim().to_string(),
            attr(el, "type").trim().to_ascii_lowercase(),
        )
    };

    Button {
        text,
        kind,
        tag,
        name: attr(el, "name"),
        identifier: attr(el, "id"),
        class_names: class_names(el),
        accessibility_attributes: accessibility_attributes(el),
        disabled: el.value().attr("disabled").is_some(),
        accessible: true,
        position,
    }
}

fn extract_image(el: ElementRef, position: usize) -> Image {
    Image {
        src: attr(el, "src"),
        alt: el.value().attr("alt").map(str::to_string),
        identifier: attr(el, "id"),
        class_names: class_names(el),
        accessibility_attributes: accessibility_attributes(el),
        position,
    }
}

fn extract_heading(el: ElementRef, position: usize) -> Heading {
    let level = el.value().name()[1..].parse().unwrap_or(1);
    Heading {
        level,
        text: element_text(el),
        identifier: attr(el, "id"),
        class_names: class_names(el),
        accessibility_attributes: accessibility_attributes(el),
        position,
    }
}

fn is_navigation(el: ElementRef) -> bool {
    el.value().name() == "nav"
        || el
            .value()
            .attr("role")
            .is_some_and(|r| r.trim().eq_ignore_ascii_case("navigation"))
}

fn extract_navigation(el: ElementRef, index: usize, position: usize) -> Navigation {
    let items = el
        .select(&ANCHOR_SELECTOR)
        .map(|a| NavItem {
            text: element_text(a),
            href: attr(a, "href"),
        })
        .collect();

    Navigation {
        items,
        label: attr(el, "aria-label"),
        tag: el.value().name().to_string(),
        identifier: attr(el, "id"),
        class_names: class_names(el),
        accessibility_attributes: accessibility_attributes(el),
        index,
        position,
    }
}

// ============================================================================
// Attribute helpers
// ============================================================================

fn attr(el: ElementRef, name: &str) -> String {
    el.value().attr(name).unwrap_or_default().to_string()
}

fn class_names(el: ElementRef) -> IndexSet<String> {
    el.value()
        .attr("class")
        .unwrap_or_default()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn accessibility_attributes(el: ElementRef) -> AttributeMap {
    el.value()
        .attrs()
        .filter(|(name, _)| name.starts_with("aria-") || ACCESSIBILITY_ATTRIBUTES.contains(name))
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

/// Visible text with whitespace runs collapsed.
fn element_text(el: ElementRef) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
