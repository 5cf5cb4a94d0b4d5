use crate::screen::screen_model::{
    AttributeMap, Button, Form, Input, InputType, Link, PageInventory,
};

/// Pattern implied by `type="email"` when no explicit pattern is given.
pub const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

/// Annotate an inventory with validation rules, required flags and
/// accessible-name flags. Returns a new inventory; the input is consumed.
pub fn classify(inventory: PageInventory) -> PageInventory {
    let PageInventory {
        forms,
        links,
        buttons,
        images,
        headings,
        navigation,
    } = inventory;

    PageInventory {
        forms: forms.into_iter().map(classify_form).collect(),
        links: links.into_iter().map(classify_link).collect(),
        buttons: buttons.into_iter().map(classify_button).collect(),
        images,
        headings,
        navigation,
    }
}

fn classify_form(form: Form) -> Form {
    Form {
        inputs: form.inputs.into_iter().map(classify_input).collect(),
        ..form
    }
}

fn classify_input(input: Input) -> Input {
    let required = input.required
        || input
            .accessibility_attributes
            .get("aria-required")
            .is_some_and(|v| v.eq_ignore_ascii_case("true"));

    let input = Input { required, ..input };
    let validation_rules = validation_rules(&input);
    let accessible = input.input_type == InputType::Hidden || has_input_name(&input);

    Input {
        validation_rules,
        accessible,
        ..input
    }
}

fn classify_link(link: Link) -> Link {
    let accessible = !link.text.is_empty() || has_aria_name(&link.accessibility_attributes);
    Link { accessible, ..link }
}

fn classify_button(button: Button) -> Button {
    let default_label = button.tag == "input" && matches!(button.kind.as_str(), "submit" | "reset");
    let accessible = !button.text.is_empty()
        || has_aria_name(&button.accessibility_attributes)
        || default_label;
    Button {
        accessible,
        ..button
    }
}

// ============================================================================
// Validation rules
// ============================================================================

/// Derive rules from the input type, then from explicit attributes.
///
/// Explicit attributes override type-implied values of the same rule.
pub fn validation_rules(input: &Input) -> AttributeMap {
    let mut rules = AttributeMap::new();

    if input.required {
        rules.insert("required".into(), "true".into());
    }

    let format = match input.input_type {
        InputType::Email => Some("email"),
        InputType::Url => Some("url"),
        InputType::Number | InputType::Range => Some("number"),
        InputType::Tel => Some("tel"),
        InputType::Date => Some("date"),
        _ => None,
    };
    if let Some(format) = format {
        rules.insert("format".into(), format.into());
    }
    if input.input_type == InputType::Email {
        rules.insert("pattern".into(), EMAIL_PATTERN.into());
    }

    for (attr, rule) in [
        ("pattern", "pattern"),
        ("minlength", "minLength"),
        ("maxlength", "maxLength"),
        ("min", "min"),
        ("max", "max"),
        ("step", "step"),
    ] {
        if let Some(value) = input.constraint(attr) {
            rules.insert(rule.into(), value.into());
        }
    }

    rules
}

// ============================================================================
// Accessible names
// ============================================================================

fn has_aria_name(attrs: &AttributeMap) -> bool {
    ["aria-label", "aria-labelledby", "title"]
        .iter()
        .any(|k| attrs.get(*k).is_some_and(|v| !v.trim().is_empty()))
}

fn has_input_name(input: &Input) -> bool {
    if !input.label.trim().is_empty() || has_aria_name(&input.accessibility_attributes) {
        return true;
    }
    if input.input_type.is_button_like() && !input.value.trim().is_empty() {
        return true;
    }
    if input.input_type == InputType::Image
        && input
            .accessibility_attributes
            .get("alt")
            .is_some_and(|v| !v.trim().is_empty())
    {
        return true;
    }
    // Submit and reset buttons get a browser-supplied default label.
    matches!(input.input_type, InputType::Submit | InputType::Reset)
}
