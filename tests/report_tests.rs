mod common;

use indexmap::IndexSet;
use page_testgen::analysis::result::AnalysisResult;
use page_testgen::analyze_page;
use page_testgen::report::json::{TestCaseDocument, render_json};
use page_testgen::report::markdown::{describe_step, render_markdown};
use page_testgen::report::outputs::write_outputs;
use page_testgen::report::playwright::render_spec_file;
use page_testgen::spec::spec_model::{
    Category, ExpectedResult, Priority, Step, TestCaseSpec,
};

use common::utils::{LOGIN_FORM, LOGIN_URL, fixture};

fn login_result() -> AnalysisResult {
    analyze_page(LOGIN_FORM, LOGIN_URL).unwrap()
}

fn piped_case() -> TestCaseSpec {
    TestCaseSpec {
        title: "Filter a|b".into(),
        category: Category::Form,
        priority: Priority::Medium,
        preconditions: "Line one\nline two".into(),
        steps: vec![Step::fill("q", "x|y", "[name=\"q\"]".into())],
        expected_result: ExpectedResult::ElementVisible {
            selector: ".results".into(),
        },
        edge_cases: IndexSet::new(),
    }
}

// ============================================================================
// JSON
// ============================================================================

#[test]
fn json_document_uses_camel_case_keys() {
    let result = login_result();
    let json = render_json(&result.test_cases).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let cases = value["testCases"].as_array().unwrap();
    assert_eq!(cases.len(), result.test_cases.len());

    let first = &cases[0];
    assert_eq!(first["category"], "form");
    assert_eq!(first["priority"], "high");
    assert_eq!(first["expectedResults"]["type"], "redirect");
    assert_eq!(first["expectedResults"]["url"], "/login");
    assert_eq!(first["steps"][0]["action"], "fill");
    assert_eq!(first["steps"][0]["field"], "username");
    assert!(first["edgeCases"].is_array());
    assert!(first["steps"][1].get("value").is_none());
}

#[test]
fn json_document_reads_back() {
    let result = login_result();
    let json = render_json(&result.test_cases).unwrap();
    let document: TestCaseDocument = serde_json::from_str(&json).unwrap();
    assert_eq!(document.test_cases, result.test_cases);
}

#[test]
fn empty_case_list_renders_empty_array() {
    let json = render_json(&[]).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["testCases"], serde_json::json!([]));
}

#[test]
fn analysis_result_serializes_pom_and_metadata() {
    let value = serde_json::to_value(login_result()).unwrap();
    assert!(value["pomCode"].as_str().unwrap().contains("class LoginPage"));
    assert_eq!(value["metadata"]["sourceUrl"], LOGIN_URL);
    assert_eq!(value["metadata"]["pageObject"], "LoginPage");
    assert_eq!(value["metadata"]["elementCounts"]["forms"], 1);
    assert!(value["metadata"]["analysisDurationMs"].is_u64());
}

// ============================================================================
// Markdown
// ============================================================================

#[test]
fn markdown_has_header_and_one_row_per_case() {
    let result = login_result();
    let md = render_markdown(&result.test_cases);
    let lines: Vec<&str> = md.lines().collect();

    assert_eq!(
        lines[0],
        "| Title | Preconditions | Steps | Expected Results | Edge Cases |"
    );
    assert!(lines[1].starts_with("|---"));
    assert_eq!(lines.len(), 2 + result.test_cases.len());
    assert!(lines[2].contains("fill username with 'testuser'; click submit"));
    assert!(lines[2].contains("redirect (/login)"));
}

#[test]
fn markdown_escapes_pipes_and_newlines() {
    let md = render_markdown(&[piped_case()]);
    let row = md.lines().nth(2).unwrap();

    assert!(row.contains("Filter a\\|b"));
    assert!(row.contains("Line one line two"));
    assert!(row.contains("fill q with 'x\\|y'"));
    assert!(row.contains("elementVisible (.results)"));
    assert_eq!(md.lines().count(), 3);
}

#[test]
fn describe_step_formats() {
    assert_eq!(
        describe_step(&Step::fill("email", "a@b.c", "#e".into())),
        "fill email with 'a@b.c'"
    );
    assert_eq!(describe_step(&Step::click("submit", "#s".into())), "click submit");
}

// ============================================================================
// Playwright spec file
// ============================================================================

#[test]
fn spec_file_drives_the_page_object() {
    let result = login_result();
    let spec = render_spec_file(&result, LOGIN_URL);

    assert!(spec.starts_with("import { test, expect } from '@playwright/test';"));
    assert!(spec.contains("import { LoginPage } from './LoginPage';"));
    assert_eq!(spec.matches("test('").count(), result.test_cases.len());
    assert!(spec.contains("await pageObject.goto('https://example.com/login');"));
    assert!(spec.contains(
        "await page.locator('form >> nth=0 >> input[name=\"username\"]').first().fill('testuser');"
    ));
    assert!(spec.contains(
        "await expect(page).toHaveURL(new URL('/login', 'https://example.com/login').href);"
    ));
    assert!(spec.contains("toHaveAccessibleName"));
}

#[test]
fn spec_file_maps_every_assert_kind() {
    let result = analyze_page(&fixture("login.html"), LOGIN_URL).unwrap();
    let spec = render_spec_file(&result, LOGIN_URL);

    assert!(spec.contains("toBeFocused()"));
    assert!(spec.contains("toHaveAttribute('alt', /\\S/)"));
    assert!(spec.contains("toBeVisible()"));
}

// ============================================================================
// Output directory
// ============================================================================

#[test]
fn write_outputs_creates_all_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("generated");
    let result = login_result();

    let written = write_outputs(&result, LOGIN_URL, &out).unwrap();

    assert_eq!(written.json, out.join("test_cases.json"));
    assert_eq!(written.markdown, out.join("test_cases.md"));
    assert_eq!(written.page_object, out.join("LoginPage.ts"));
    assert_eq!(written.spec, out.join("LoginPage.spec.ts"));

    let pom = std::fs::read_to_string(&written.page_object).unwrap();
    assert_eq!(pom, result.pom_code);

    let json = std::fs::read_to_string(&written.json).unwrap();
    assert_eq!(json, render_json(&result.test_cases).unwrap());
}
