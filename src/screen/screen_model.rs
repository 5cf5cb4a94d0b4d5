use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Open-ended attribute mapping with document insertion order preserved.
pub type AttributeMap = IndexMap<String, String>;

// ============================================================================
// Page inventory
// ============================================================================

/// Immutable snapshot of the testable structure of one page.
///
/// Each sequence is in document order. Built once by the extractor; the
/// classifier produces a new annotated value rather than mutating this one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInventory {
    pub forms: Vec<Form>,
    pub links: Vec<Link>,
    pub buttons: Vec<Button>,
    pub images: Vec<Image>,
    pub headings: Vec<Heading>,
    pub navigation: Vec<Navigation>,
}

impl PageInventory {
    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
            && self.links.is_empty()
            && self.buttons.is_empty()
            && self.images.is_empty()
            && self.headings.is_empty()
            && self.navigation.is_empty()
    }

    pub fn element_counts(&self) -> ElementCounts {
        ElementCounts {
            forms: self.forms.len(),
            inputs: self.forms.iter().map(|f| f.inputs.len()).sum(),
            links: self.links.len(),
            buttons: self.buttons.len(),
            images: self.images.len(),
            headings: self.headings.len(),
            navigation: self.navigation.len(),
        }
    }
}

/// Number of extracted elements per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementCounts {
    pub forms: usize,
    pub inputs: usize,
    pub links: usize,
    pub buttons: usize,
    pub images: usize,
    pub headings: usize,
    pub navigation: usize,
}

// ============================================================================
// Forms
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub action: String,
    pub method: FormMethod,
    #[serde(rename = "id")]
    pub identifier: String,
    pub class_names: IndexSet<String>,
    pub novalidate: bool,
    pub enctype: String,
    pub inputs: Vec<Input>,
    /// Ordinal among the page's forms.
    pub index: usize,
    pub position: usize,
}

impl Form {
    pub fn selector(&self) -> String {
        if !self.identifier.is_empty() {
            id_selector("form", &self.identifier)
        } else {
            format!("form >> nth={}", self.index)
        }
    }

    /// Human-facing name used in test titles.
    pub fn display_name(&self) -> String {
        if self.identifier.is_empty() {
            format!("form {}", self.index + 1)
        } else {
            format!("form '{}'", self.identifier)
        }
    }

    pub fn submit_control(&self) -> Option<&Input> {
        self.inputs
            .iter()
            .find(|i| i.input_type.is_submit() && !i.disabled)
    }

    /// Whether submitting is expected to navigate to `action`.
    pub fn navigates(&self) -> bool {
        let action = self.action.trim();
        !action.is_empty()
            && !action.starts_with('#')
            && !action.to_ascii_lowercase().starts_with("javascript:")
            && !matches!(&self.method, FormMethod::Other(m) if m == "DIALOG")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FormMethod {
    Get,
    Post,
    Other(String),
}

impl FormMethod {
    pub fn as_str(&self) -> &str {
        match self {
            FormMethod::Get => "GET",
            FormMethod::Post => "POST",
            FormMethod::Other(m) => m,
        }
    }
}

impl From<String> for FormMethod {
    fn from(raw: String) -> Self {
        let upper = raw.trim().to_ascii_uppercase();
        match upper.as_str() {
            "" | "GET" => FormMethod::Get,
            "POST" => FormMethod::Post,
            _ => FormMethod::Other(upper),
        }
    }
}

impl From<FormMethod> for String {
    fn from(method: FormMethod) -> Self {
        method.as_str().to_string()
    }
}

// ============================================================================
// Inputs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    #[serde(rename = "type")]
    pub input_type: InputType,
    /// Element tag: `input`, `select`, `textarea` or `button`.
    pub tag: String,
    pub name: String,
    #[serde(rename = "id")]
    pub identifier: String,
    pub class_names: IndexSet<String>,
    pub required: bool,
    pub disabled: bool,
    pub readonly: bool,
    pub placeholder: String,
    pub value: String,
    /// Text of the associated `<label>`.
    pub label: String,
    /// Raw constraint attributes as written (`maxlength`, `pattern`, ...).
    pub constraints: AttributeMap,
    pub options: Vec<SelectOption>,
    /// Filled by the classifier.
    pub validation_rules: AttributeMap,
    pub accessibility_attributes: AttributeMap,
    /// Filled by the classifier. `false` when no accessible name exists.
    pub accessible: bool,
    pub position: usize,
}

impl Input {
    /// Identifier used in steps: name, then id, then type.
    pub fn field_name(&self) -> &str {
        if !self.name.is_empty() {
            &self.name
        } else if !self.identifier.is_empty() {
            &self.identifier
        } else {
            self.input_type.as_str()
        }
    }

    /// Locator within the owning form. Toggles sharing a name are told
    /// apart by `value`.
    pub fn selector(&self) -> String {
        let tag = self.tag.as_str();
        if !self.name.is_empty() {
            let by_name = format!("{}[name=\"{}\"]", tag, css_escape(&self.name));
            if self.input_type.is_toggle() && !self.value.is_empty() {
                format!("{}[value=\"{}\"]", by_name, css_escape(&self.value))
            } else {
                by_name
            }
        } else if !self.identifier.is_empty() {
            id_selector(tag, &self.identifier)
        } else if tag == "button" {
            let text = self.value.trim();
            if text.is_empty() {
                "button".to_string()
            } else {
                format!("button:has-text(\"{}\")", css_escape(text))
            }
        } else if tag == "input" {
            format!("input[type=\"{}\"]", css_escape(self.input_type.as_str()))
        } else {
            tag.to_string()
        }
    }

    pub fn constraint(&self, attr: &str) -> Option<&str> {
        self.constraints.get(attr).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub text: String,
    pub selected: bool,
}

/// Control type. Unknown `type` values keep their raw spelling and behave
/// like text inputs, as browsers treat them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InputType {
    Text,
    Password,
    Email,
    Number,
    Tel,
    Url,
    Search,
    Date,
    Range,
    Checkbox,
    Radio,
    File,
    Hidden,
    Submit,
    Reset,
    Button,
    Image,
    Select,
    Textarea,
    Other(String),
}

impl InputType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "text" => InputType::Text,
            "password" => InputType::Password,
            "email" => InputType::Email,
            "number" => InputType::Number,
            "tel" => InputType::Tel,
            "url" => InputType::Url,
            "search" => InputType::Search,
            "date" => InputType::Date,
            "range" => InputType::Range,
            "checkbox" => InputType::Checkbox,
            "radio" => InputType::Radio,
            "file" => InputType::File,
            "hidden" => InputType::Hidden,
            "submit" => InputType::Submit,
            "reset" => InputType::Reset,
            "button" => InputType::Button,
            "image" => InputType::Image,
            "select" => InputType::Select,
            "textarea" => InputType::Textarea,
            other => InputType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            InputType::Text => "text",
            InputType::Password => "password",
            InputType::Email => "email",
            InputType::Number => "number",
            InputType::Tel => "tel",
            InputType::Url => "url",
            InputType::Search => "search",
            InputType::Date => "date",
            InputType::Range => "range",
            InputType::Checkbox => "checkbox",
            InputType::Radio => "radio",
            InputType::File => "file",
            InputType::Hidden => "hidden",
            InputType::Submit => "submit",
            InputType::Reset => "reset",
            InputType::Button => "button",
            InputType::Image => "image",
            InputType::Select => "select",
            InputType::Textarea => "textarea",
            InputType::Other(raw) => raw,
        }
    }

    /// Accepts typed text.
    pub fn is_fillable(&self) -> bool {
        matches!(
            self,
            InputType::Text
                | InputType::Password
                | InputType::Email
                | InputType::Number
                | InputType::Tel
                | InputType::Url
                | InputType::Search
                | InputType::Date
                | InputType::Range
                | InputType::Textarea
                | InputType::Other(_)
        )
    }

    pub fn is_toggle(&self) -> bool {
        matches!(self, InputType::Checkbox | InputType::Radio)
    }

    pub fn is_submit(&self) -> bool {
        matches!(self, InputType::Submit | InputType::Image)
    }

    /// Push-button style controls that carry their name in `value`.
    pub fn is_button_like(&self) -> bool {
        matches!(
            self,
            InputType::Submit | InputType::Reset | InputType::Button | InputType::Image
        )
    }
}

impl From<String> for InputType {
    fn from(raw: String) -> Self {
        InputType::parse(&raw)
    }
}

impl From<InputType> for String {
    fn from(t: InputType) -> Self {
        t.as_str().to_string()
    }
}

// ============================================================================
// Links, buttons, images, headings, navigation
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub text: String,
    pub href: String,
    #[serde(rename = "id")]
    pub identifier: String,
    pub class_names: IndexSet<String>,
    pub accessibility_attributes: AttributeMap,
    pub target: LinkTarget,
    pub in_navigation: bool,
    pub accessible: bool,
    pub position: usize,
}

impl Link {
    pub fn selector(&self) -> String {
        if !self.identifier.is_empty() {
            id_selector("a", &self.identifier)
        } else if !self.href.is_empty() {
            format!("a[href=\"{}\"]", css_escape(&self.href))
        } else if !self.text.is_empty() {
            format!("a:has-text(\"{}\")", css_escape(&self.text))
        } else {
            "a".to_string()
        }
    }

    pub fn display_name(&self) -> &str {
        if !self.text.is_empty() {
            &self.text
        } else if let Some(label) = self.accessibility_attributes.get("aria-label") {
            label
        } else if !self.href.is_empty() {
            &self.href
        } else {
            "link"
        }
    }
}

/// Where a link leads, relative to the page it was found on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LinkTarget {
    /// Same-origin navigation; `path` is the path, query and fragment.
    Internal { path: String },
    External { url: String },
    Fragment,
    /// `javascript:`, `mailto:`, `tel:` and similar.
    NonNavigable,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Button {
    pub text: String,
    /// `type` attribute; `submit` when absent on `<button>`.
    pub kind: String,
    pub tag: String,
    pub name: String,
    #[serde(rename = "id")]
    pub identifier: String,
    pub class_names: IndexSet<String>,
    pub accessibility_attributes: AttributeMap,
    pub disabled: bool,
    pub accessible: bool,
    pub position: usize,
}

impl Button {
    pub fn selector(&self) -> String {
        if !self.identifier.is_empty() {
            id_selector(&self.tag, &self.identifier)
        } else if !self.name.is_empty() {
            format!("{}[name=\"{}\"]", self.tag, css_escape(&self.name))
        } else if !self.text.is_empty() && self.tag == "input" {
            format!("input[value=\"{}\"]", css_escape(&self.text))
        } else if !self.text.is_empty() {
            format!("button:has-text(\"{}\")", css_escape(&self.text))
        } else {
            self.tag.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub src: String,
    /// `None` when the attribute is absent, `Some("")` when present but empty.
    pub alt: Option<String>,
    #[serde(rename = "id")]
    pub identifier: String,
    pub class_names: IndexSet<String>,
    pub accessibility_attributes: AttributeMap,
    pub position: usize,
}

impl Image {
    pub fn has_alt_text(&self) -> bool {
        self.alt.as_deref().is_some_and(|a| !a.trim().is_empty())
    }

    /// Hidden from assistive technology by role or `aria-hidden`.
    pub fn is_decorative(&self) -> bool {
        let role = self
            .accessibility_attributes
            .get("role")
            .map(|r| r.to_ascii_lowercase());
        matches!(role.as_deref(), Some("presentation") | Some("none"))
            || self
                .accessibility_attributes
                .get("aria-hidden")
                .is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }

    pub fn selector(&self) -> String {
        if !self.identifier.is_empty() {
            id_selector("img", &self.identifier)
        } else if !self.src.is_empty() {
            format!("img[src=\"{}\"]", css_escape(&self.src))
        } else {
            "img".to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Heading {
    pub level: u8,
    pub text: String,
    #[serde(rename = "id")]
    pub identifier: String,
    pub class_names: IndexSet<String>,
    pub accessibility_attributes: AttributeMap,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Navigation {
    pub items: Vec<NavItem>,
    pub label: String,
    pub tag: String,
    #[serde(rename = "id")]
    pub identifier: String,
    pub class_names: IndexSet<String>,
    pub accessibility_attributes: AttributeMap,
    pub index: usize,
    pub position: usize,
}

impl Navigation {
    pub fn selector(&self) -> String {
        if !self.identifier.is_empty() {
            id_selector(&self.tag, &self.identifier)
        } else if !self.label.is_empty() {
            format!("{}[aria-label=\"{}\"]", self.tag, css_escape(&self.label))
        } else {
            format!("{} >> nth={}", NAVIGATION_SELECTOR, self.index)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    pub text: String,
    pub href: String,
}

pub const NAVIGATION_SELECTOR: &str = "nav, [role=\"navigation\"]";

// ============================================================================
// Selector helpers
// ============================================================================

/// Escape a value for use inside a double-quoted CSS string.
pub fn css_escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// `#id` when the id is a plain CSS identifier, otherwise `tag[id="..."]`.
pub fn id_selector(tag: &str, id: &str) -> String {
    let plain = id
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if plain {
        format!("#{}", id)
    } else {
        format!("{}[id=\"{}\"]", tag, css_escape(id))
    }
}
