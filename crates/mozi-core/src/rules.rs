//! Discover which rules a command document binds to its role.
//!
//! A command lists its rules under a "Related Rules" marker:
//!
//! ```text
//! ## Related Rules
//! - style-guide
//! - testing.mdc
//! ## Other
//! ```
//!
//! Only list items whose identifier is lowercase alphanumeric with hyphens are
//! recognised; anything else inside the section is ignored without warning.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::Result;
use crate::paths;
use crate::store::ContentStore;

const SECTION_MARKER: &str = "related rules";
const SECTION_END: &str = "##";

static RULE_ITEM_RE: OnceLock<Regex> = OnceLock::new();

fn rule_item_re() -> &'static Regex {
    RULE_ITEM_RE.get_or_init(|| {
        Regex::new(&format!(
            r"^-\s+([a-z0-9-]+)(?:\.{})?\s*$",
            regex::escape(paths::RULE_EXT)
        ))
        .unwrap()
    })
}

/// Extract rule identifiers from command text, in document order.
///
/// Duplicates are kept. A document without the marker yields an empty list.
pub fn extract_rules(text: &str) -> Vec<String> {
    let mut rules = Vec::new();
    let mut in_section = false;

    for line in text.lines().map(str::trim) {
        if line.to_lowercase().contains(SECTION_MARKER) {
            in_section = true;
            continue;
        }
        if !in_section {
            continue;
        }
        if line.starts_with(SECTION_END) {
            break;
        }
        if let Some(caps) = rule_item_re().captures(line) {
            rules.push(caps[1].to_string());
        }
    }

    rules
}

/// Read a command document from the store and extract its rule identifiers.
pub fn rules_for_command<S: ContentStore + ?Sized>(store: &S, path: &str) -> Result<Vec<String>> {
    let data = store.open(path)?;
    Ok(extract_rules(&String::from_utf8_lossy(&data)))
}
