use crate::screen::screen_model::{NAVIGATION_SELECTOR, PageInventory};

const INDENT: &str = "    ";

/// Names imported by the generated module; a class may not shadow them.
const IMPORTED_NAMES: &[&str] = &["Page", "Locator"];

/// Turn free text into a class identifier.
///
/// Keeps ASCII letters and digits only, prefixes `Page` when the result would
/// start with a digit, and upper-cases the first letter. An empty result
/// becomes `GeneratedPage`; a result equal to an imported name gets an
/// `Object` suffix. Total and pure; distinct inputs may collide.
pub fn sanitize_identifier(name: &str) -> String {
    let kept: String = name.chars().filter(|c| c.is_ascii_alphanumeric()).collect();

    let mut ident = match kept.chars().next() {
        None => return "GeneratedPage".to_string(),
        Some(c) if c.is_ascii_digit() => format!("Page{}", kept),
        Some(_) => kept,
    };

    if let Some(first) = ident.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    if IMPORTED_NAMES.contains(&ident.as_str()) {
        ident.push_str("Object");
    }
    ident
}

/// Generate a Playwright page-object module for the inventory.
///
/// Sections for absent element kinds are omitted, so an empty inventory
/// produces a class with only a constructor and `goto`. Output is a pure
/// function of the inputs.
pub fn generate(inventory: &PageInventory, page_name: &str) -> String {
    let class_name = sanitize_identifier(page_name);

    let mut methods = vec![method(
        "async goto(url: string)",
        &["await this.page.goto(url);".to_string()],
    )];

    let locators = locator_methods(inventory);
    if !locators.is_empty() {
        methods.push(section("Locators", locators));
    }

    let actions = action_methods(inventory);
    if !actions.is_empty() {
        methods.push(section("Actions", actions));
    }

    let assertions = assertion_methods(inventory);
    if !assertions.is_empty() {
        methods.push(section("Assertions", assertions));
    }

    format!(
        "import {{ Page, Locator, expect }} from '@playwright/test';\n\
         \n\
         export class {class_name} {{\n\
         {INDENT}readonly page: Page;\n\
         \n\
         {INDENT}constructor(page: Page) {{\n\
         {INDENT}{INDENT}this.page = page;\n\
         {INDENT}}}\n\
         \n\
         {body}\n\
         }}\n",
        class_name = class_name,
        body = methods.join("\n\n"),
    )
}

// ============================================================================
// Method groups
// ============================================================================

fn locator_methods(inventory: &PageInventory) -> Vec<String> {
    let mut out = Vec::new();

    let categories = [
        ("getNavigation", NAVIGATION_SELECTOR, !inventory.navigation.is_empty()),
        ("getLinks", "a", !inventory.links.is_empty()),
        (
            "getButtons",
            "button, input[type=\"button\"], input[type=\"submit\"], input[type=\"reset\"]",
            !inventory.buttons.is_empty(),
        ),
        ("getImages", "img", !inventory.images.is_empty()),
        ("getHeadings", "h1, h2, h3, h4, h5, h6", !inventory.headings.is_empty()),
        ("getForms", "form", !inventory.forms.is_empty()),
    ];

    for (name, selector, present) in categories {
        if present {
            out.push(method(
                &format!("{}(): Locator", name),
                &[format!("return this.page.locator({});", ts_string(selector))],
            ));
        }
    }

    for form in &inventory.forms {
        out.push(method(
            &format!("getForm{}(): Locator", form.index + 1),
            &[format!(
                "return this.page.locator('form').nth({});",
                form.index
            )],
        ));
    }

    out
}

fn action_methods(inventory: &PageInventory) -> Vec<String> {
    let mut out = Vec::new();

    for form in &inventory.forms {
        let n = form.index + 1;

        out.push(method(
            &format!("async fillForm{}(data: Record<string, string>)", n),
            &[
                format!("const form = this.getForm{}();", n),
                "for (const [name, value] of Object.entries(data)) {".to_string(),
                format!("{INDENT}await form.locator(`[name=\"${{name}}\"]`).fill(value);"),
                "}".to_string(),
            ],
        ));

        let submit = match form.submit_control() {
            Some(control) => format!(
                "await this.getForm{}().locator({}).first().click();",
                n,
                ts_string(&control.selector())
            ),
            None => format!(
                "await this.getForm{}().evaluate((f) => (f as HTMLFormElement).requestSubmit());",
                n
            ),
        };
        out.push(method(&format!("async submitForm{}()", n), &[submit]));
    }

    if !inventory.links.is_empty() {
        out.push(method(
            "async clickLink(text: string)",
            &["await this.page.locator('a', { hasText: text }).first().click();".to_string()],
        ));
    }

    if !inventory.buttons.is_empty() {
        out.push(method(
            "async clickButton(text: string)",
            &["await this.page.getByRole('button', { name: text }).first().click();".to_string()],
        ));
    }

    out
}

fn assertion_methods(inventory: &PageInventory) -> Vec<String> {
    let mut out = Vec::new();

    if !inventory.navigation.is_empty() {
        out.push(method(
            "async assertNavigationVisible()",
            &["await expect(this.getNavigation().first()).toBeVisible();".to_string()],
        ));
    }

    if !inventory.links.is_empty() {
        out.push(method(
            "async assertLinkExists(text: string)",
            &["await expect(this.page.locator('a', { hasText: text }).first()).toBeVisible();"
                .to_string()],
        ));
    }

    if !inventory.images.is_empty() {
        out.push(method(
            "async assertImagesHaveAlt()",
            &[
                "for (const image of await this.getImages().all()) {".to_string(),
                format!("{INDENT}await expect(image).toHaveAttribute('alt', /\\S/);"),
                "}".to_string(),
            ],
        ));
    }

    if !inventory.forms.is_empty() {
        out.push(method(
            "async assertFormExists(index: number)",
            &["await expect(this.getForms().nth(index)).toBeVisible();".to_string()],
        ));
    }

    out
}

// ============================================================================
// Text helpers
// ============================================================================

fn method(signature: &str, body: &[String]) -> String {
    let mut text = format!("{INDENT}{} {{\n", signature);
    for line in body {
        text.push_str(INDENT);
        text.push_str(INDENT);
        text.push_str(line);
        text.push('\n');
    }
    text.push_str(INDENT);
    text.push('}');
    text
}

fn section(title: &str, methods: Vec<String>) -> String {
    format!("{INDENT}// {}\n{}", title, methods.join("\n\n"))
}

/// Single-quoted TypeScript string literal.
pub fn ts_string(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
        .replace('\r', "\\r");
    format!("'{}'", escaped)
}
