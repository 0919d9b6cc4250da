use std::sync::LazyLock;

use regex::Regex;

pub mod data;
pub mod entities;
pub mod slug;

// Identifiers handed to the upstream service (table and field names) may contain
// only lowercase ASCII letters, digits and underscore, and must not start with a digit.
pub const ELIGIBLE_IDENTIFIER_REGEX: &str = r"^[a-z_][a-z0-9_]*$";

static ELIGIBLE_IDENTIFIER_REGEX_COMPILED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(ELIGIBLE_IDENTIFIER_REGEX).expect("ELIGIBLE_IDENTIFIER_REGEX must be a valid regex")
});

pub fn is_eligible_identifier(id: &str) -> bool {
    ELIGIBLE_IDENTIFIER_REGEX_COMPILED.is_match(id)
}
