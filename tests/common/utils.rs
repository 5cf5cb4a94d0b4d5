use std::path::PathBuf;

use page_testgen::screen::classifier::classify;
use page_testgen::screen::extractor::extract_from;
use page_testgen::screen::screen_model::PageInventory;
use url::Url;

/// One form, one required text input, one submit button.
pub const LOGIN_FORM: &str = r#"<html><body>
<form action="/login" method="POST">
  <input type="text" name="username" required>
  <input type="submit">
</form>
</body></html>"#;

pub const LOGIN_URL: &str = "https://example.com/login";

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).unwrap()
}

/// Extract and classify against `https://example.com/login`.
pub fn inventory_of(markup: &str) -> PageInventory {
    let base = Url::parse(LOGIN_URL).unwrap();
    classify(extract_from(markup, Some(&base)).unwrap())
}

/// `n` forms, each with `m` required text inputs and a submit button.
pub fn forms_page(n: usize, m: usize) -> String {
    let mut html = String::from("<html><body>");
    for f in 0..n {
        html.push_str(&format!("<form id=\"f{}\" action=\"/submit/{}\" method=\"post\">", f, f));
        for i in 0..m {
            html.push_str(&format!(
                "<label for=\"f{f}i{i}\">Field {i}</label><input type=\"text\" id=\"f{f}i{i}\" name=\"field{i}\" required>",
                f = f,
                i = i
            ));
        }
        html.push_str("<button type=\"submit\">Send</button></form>");
    }
    html.push_str("</body></html>");
    html
}
