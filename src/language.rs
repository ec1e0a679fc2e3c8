use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LanguageCodeError {
    #[error("language name {0:?} ends with empty parentheses")]
    Empty(String),
    #[error("language code {0:?} cannot be used as a namespace")]
    Unsafe(String),
}

/// A language code that is safe to use as a single path component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguageCode(String);

impl LanguageCode {
    pub fn new(code: impl Into<String>) -> Result<Self, LanguageCodeError> {
        let code = code.into();
        if !crate::workspace::is_path_component(&code) {
            return Err(LanguageCodeError::Unsafe(code));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Extracts the code from a display name such as `"English (en)"`.
///
/// Only a parenthesized group anchored at the very end of the string and
/// containing no parentheses itself is considered. Without one, the whole
/// input is taken as the code.
pub fn resolve(display_name: &str) -> Result<LanguageCode, LanguageCodeError> {
    static TRAILING_GROUP: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\(([^()]*)\)$").expect("Invalid trailing group regex"));

    match TRAILING_GROUP.captures(display_name) {
        Some(caps) => {
            let inner = caps.get(1).map_or("", |m| m.as_str());
            if inner.is_empty() {
                return Err(LanguageCodeError::Empty(display_name.to_owned()));
            }
            LanguageCode::new(inner)
        }
        None => LanguageCode::new(display_name),
    }
}
