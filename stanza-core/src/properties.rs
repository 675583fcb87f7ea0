//! `${name}` placeholder substitution against an external property set.

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use regex::Regex;

/// Read-only name → value lookup supplied by the invoking environment.
pub trait PropertySource {
    fn get(&self, name: &str) -> Option<&str>;

    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

impl PropertySource for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<&str> {
        HashMap::get(self, name).map(String::as_str)
    }
}

impl PropertySource for BTreeMap<String, String> {
    fn get(&self, name: &str) -> Option<&str> {
        BTreeMap::get(self, name).map(String::as_str)
    }
}

/// Result of [`substitute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// Text with every known placeholder replaced.
    pub text: String,
    /// Placeholder names with no matching property, in first-occurrence order.
    pub unresolved: Vec<String>,
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"))
}

/// Replace every `${name}` in `text` whose `name` is defined in `properties`.
///
/// Unknown placeholders are left verbatim and logged at `warn`. An opening
/// `${` without a closing `}` never matches and passes through untouched.
pub fn substitute<P: PropertySource + ?Sized>(text: &str, properties: &P) -> Substitution {
    let mut names: Vec<&str> = Vec::new();
    for caps in placeholder_pattern().captures_iter(text) {
        if let Some(name) = caps.get(1).map(|m| m.as_str()) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }

    let mut result = text.to_string();
    let mut unresolved = Vec::new();
    for name in names {
        match properties.get(name) {
            Some(value) => {
                result = result.replace(&format!("${{{name}}}"), value);
            }
            None => {
                tracing::warn!(property = name, "property not found, placeholder left as-is");
                unresolved.push(name.to_string());
            }
        }
    }

    Substitution {
        text: result,
        unresolved,
    }
}
