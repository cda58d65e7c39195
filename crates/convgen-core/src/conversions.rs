//! Well-known scalar conversions.
//!
//! A [`ConversionTable`] maps a pair of normalized type names (see
//! [`normalize_type_name`](crate::naming::normalize_type_name)) to an
//! expression template. The template holds a single `{}` placeholder that is
//! replaced by the source field access.
//!
//! Rules may list paths their expansion depends on. The table only reports
//! them; adding the corresponding `use` items is left to the caller.

use crate::error::{GenError, GenResult};
use std::collections::HashMap;

/// Seed rules: `(from, to, template)`.
const SEED_RULES: &[(&str, &str, &str)] = &[
    ("isize", "String", "{}.to_string()"),
    ("i64", "String", "{}.to_string()"),
    ("i32", "String", "i64::from({}).to_string()"),
    ("isize", "i64", "{} as i64"),
    ("i64", "isize", "{} as isize"),
];

/// An expression template for one `(from, to)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRule {
    template: String,
    requires: Vec<String>,
}

impl ConversionRule {
    /// The placeholder replaced by the source expression.
    pub const PLACEHOLDER: &'static str = "{}";

    /// Create a rule, checking that the template has exactly one placeholder.
    pub fn new(template: impl Into<String>) -> GenResult<Self> {
        let template = template.into();
        let count = template.matches(Self::PLACEHOLDER).count();
        if count != 1 {
            return Err(GenError::Config(format!(
                "conversion template `{template}` must contain exactly one `{}` placeholder, found {count}",
                Self::PLACEHOLDER
            )));
        }
        Ok(Self {
            template,
            requires: Vec::new(),
        })
    }

    /// Declare paths the expansion needs in scope.
    pub fn requiring<I, S>(mut self, requires: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requires.extend(requires.into_iter().map(Into::into));
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn requires(&self) -> &[String] {
        &self.requires
    }

    /// Substitute the source expression into the template.
    pub fn expand(&self, source: &str) -> String {
        self.template.replacen(Self::PLACEHOLDER, source, 1)
    }
}

/// Registry of well-known conversions keyed by normalized type names.
#[derive(Debug, Clone, Default)]
pub struct ConversionTable {
    rules: HashMap<(String, String), ConversionRule>,
}

impl ConversionTable {
    /// A table with no rules.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A table with the seed rules.
    pub fn standard() -> Self {
        let mut table = Self::empty();
        for (from, to, template) in SEED_RULES {
            table.rules.insert(
                (from.to_string(), to.to_string()),
                ConversionRule {
                    template: template.to_string(),
                    requires: Vec::new(),
                },
            );
        }
        table
    }

    /// Register a rule, returning the one it replaces.
    pub fn insert(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        rule: ConversionRule,
    ) -> Option<ConversionRule> {
        self.rules.insert((from.into(), to.into()), rule)
    }

    /// Find the rule for a `(from, to)` pair.
    pub fn lookup(&self, from: &str, to: &str) -> Option<&ConversionRule> {
        self.rules.get(&(from.to_string(), to.to_string()))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
