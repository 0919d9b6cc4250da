use std::sync::LazyLock;

use nutype::nutype;
use regex::Regex;
use serde::Serialize;

static DISALLOWED_SYMBOLS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-z0-9 -]").expect("slug symbol regex must be valid"));
static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("slug whitespace regex must be valid"));
static HYPHEN_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("-+").expect("slug hyphen regex must be valid"));

static SLUG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^[a-z0-9]+(-[a-z0-9]+)*$").expect("slug regex must be valid")
});

/// Derives a URL-safe slug from a human readable title or name.
///
/// Lowercases, drops everything except `a-z`, `0-9`, space and hyphen, turns
/// whitespace runs into a hyphen, collapses hyphen runs and trims hyphens at
/// both ends. The result is a fixed point: `slugify(slugify(s)) == slugify(s)`.
pub fn slugify(source: &str) -> String {
    let lowered = source.to_lowercase();
    let stripped = DISALLOWED_SYMBOLS.replace_all(&lowered, "");
    let hyphenated = WHITESPACE_RUNS.replace_all(&stripped, "-");
    let collapsed = HYPHEN_RUNS.replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_string()
}

/// Slug accepted for writes to the upstream service.
#[nutype(
    sanitize(trim, lowercase),
    validate(not_empty, len_char_max = 200, regex = SLUG_REGEX),
    derive(
        Clone,
        Debug,
        Display,
        AsRef,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize
    )
)]
pub struct Slug(String);

/// Slug input of an editing form.
///
/// Follows its source field (title or name) until the first manual edit;
/// after that the value only changes through further manual edits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SlugField {
    value: String,
    locked: bool,
}

impl SlugField {
    /// A field holding a slug that came from an existing record. Such a slug
    /// is treated as chosen by hand and is never re-derived.
    pub fn existing(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            locked: true,
        }
    }

    /// Called whenever the source field changes.
    pub fn follow(&mut self, source: &str) {
        if !self.locked {
            self.value = slugify(source);
        }
    }

    /// Manual edit; locks the field.
    pub fn edit(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.locked = true;
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// The slug to submit: the current value, or one derived from `source`
    /// when the field was left blank.
    pub fn resolve(&self, source: &str) -> Result<Slug, SlugError> {
        if self.value.trim().is_empty() {
            Slug::try_new(slugify(source))
        } else {
            Slug::try_new(self.value.clone())
        }
    }
}
