use std::path::Path;

use anyhow::Context as _;
use chrono::NaiveDate;

use crate::language::LanguageCode;

pub const LANGUAGE_TOKEN: &str = "LANGCODE";
pub const DATE_TOKEN: &str = "ORIGDATE";

#[must_use]
pub fn render(template: &str, code: &LanguageCode) -> String {
    template.replace(LANGUAGE_TOKEN, code.as_str())
}

/// Status pages carry the language and the date the import happened.
#[must_use]
pub fn render_status(template: &str, code: &LanguageCode, date: NaiveDate) -> String {
    render(template, code).replace(DATE_TOKEN, &date.format("%Y-%m-%d").to_string())
}

pub fn load(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read template: {}", path.display()))
}

/// Renders the template at `template_path` into `out_path` (mode 0644).
pub fn render_file(template_path: &Path, out_path: &Path, code: &LanguageCode) -> anyhow::Result<()> {
    let text = render(&load(template_path)?, code);
    crate::workspace::write_text_file(out_path, &text)
}
