use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::analysis::result::AnalysisResult;
use crate::report::json::render_json;
use crate::report::markdown::render_markdown;
use crate::report::playwright::render_spec_file;

/// Files written by `write_outputs`, in write order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenOutputs {
    pub json: PathBuf,
    pub markdown: PathBuf,
    pub page_object: PathBuf,
    pub spec: PathBuf,
}

/// Write `test_cases.json`, `test_cases.md`, `<Class>.ts` and
/// `<Class>.spec.ts` into `dir`, creating it if needed.
pub fn write_outputs(
    result: &AnalysisResult,
    page_url: &str,
    dir: &Path,
) -> io::Result<WrittenOutputs> {
    fs::create_dir_all(dir)?;

    let class_name = &result.metadata.page_object;
    let written = WrittenOutputs {
        json: dir.join("test_cases.json"),
        markdown: dir.join("test_cases.md"),
        page_object: dir.join(format!("{}.ts", class_name)),
        spec: dir.join(format!("{}.spec.ts", class_name)),
    };

    let json = render_json(&result.test_cases).map_err(io::Error::other)?;
    fs::write(&written.json, json)?;
    fs::write(&written.markdown, render_markdown(&result.test_cases))?;
    fs::write(&written.page_object, &result.pom_code)?;
    fs::write(&written.spec, render_spec_file(result, page_url))?;

    Ok(written)
}
