//! Generator configuration
//!
//! The CLI reads this from `convgen.toml`:
//!
//! ```toml
//! marker = "convgen:convert"
//! on_unsupported = "skip"
//!
//! [fallback]
//! style = "snake"
//! prefix = "into_"
//!
//! [[conversions]]
//! from = "u32"
//! to = "String"
//! template = "{}.to_string()"
//! ```

use crate::conversions::{ConversionRule, ConversionTable};
use crate::error::{GenError, GenResult};
use crate::fallback::{NameStyle, NamingConvention};
use crate::scanner::DEFAULT_MARKER;
use serde::Deserialize;

/// What to do with a marked function that cannot be converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnsupportedPolicy {
    /// Fail the whole file; nothing is rewritten.
    #[default]
    Abort,

    /// Leave that function untouched and carry on with the rest.
    Skip,
}

/// Generator configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Doc line that opts a function into generation
    #[serde(default = "default_marker")]
    pub marker: String,

    /// Handling of unsupported shapes and invalid signatures
    #[serde(default)]
    pub on_unsupported: UnsupportedPolicy,

    /// Naming of fallback conversion functions
    #[serde(default)]
    pub fallback: FallbackConfig,

    /// Extra well-known conversions; these override seed rules for the same pair
    #[serde(default)]
    pub conversions: Vec<ConversionConfig>,
}

/// `[fallback]` section
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FallbackConfig {
    #[serde(default)]
    pub style: NameStyle,

    /// Overrides the style's default prefix
    #[serde(default)]
    pub prefix: Option<String>,

    /// Overrides the style's default infix
    #[serde(default)]
    pub infix: Option<String>,
}

/// One `[[conversions]]` entry
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConversionConfig {
    /// Normalized source type name
    pub from: String,

    /// Normalized target type name
    pub to: String,

    /// Expression with a single `{}` placeholder
    pub template: String,

    /// Paths the expansion needs in scope
    #[serde(default)]
    pub requires: Vec<String>,
}

fn default_marker() -> String {
    DEFAULT_MARKER.to_string()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            marker: default_marker(),
            on_unsupported: UnsupportedPolicy::default(),
            fallback: FallbackConfig::default(),
            conversions: Vec::new(),
        }
    }
}

impl GeneratorConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> GenResult<()> {
        let marker = self.marker.trim();
        if marker.is_empty() {
            return Err(GenError::Config("marker cannot be empty".to_string()));
        }
        if marker.contains('\n') {
            return Err(GenError::Config(
                "marker must be a single line".to_string(),
            ));
        }

        for conversion in &self.conversions {
            if conversion.from.is_empty() || conversion.to.is_empty() {
                return Err(GenError::Config(format!(
                    "conversion `{}` must name both `from` and `to`",
                    conversion.template
                )));
            }
            ConversionRule::new(conversion.template.as_str())?;
        }

        let convention = self.naming_convention();
        let probe = format!("{}x{}y", convention.prefix, convention.infix);
        if syn::parse_str::<syn::Ident>(&probe).is_err() {
            return Err(GenError::Config(format!(
                "fallback prefix `{}` and infix `{}` do not form an identifier",
                convention.prefix, convention.infix
            )));
        }

        Ok(())
    }

    /// Seed conversions plus the configured ones.
    pub fn conversion_table(&self) -> GenResult<ConversionTable> {
        let mut table = ConversionTable::standard();
        for conversion in &self.conversions {
            let rule = ConversionRule::new(conversion.template.as_str())?
                .requiring(conversion.requires.iter().cloned());
            table.insert(conversion.from.as_str(), conversion.to.as_str(), rule);
        }
        Ok(table)
    }

    /// The fallback naming convention described by `[fallback]`.
    pub fn naming_convention(&self) -> NamingConvention {
        let mut convention = match self.fallback.style {
            NameStyle::Snake => NamingConvention::default(),
            NameStyle::Camel => NamingConvention::camel(),
        };
        if let Some(prefix) = &self.fallback.prefix {
            convention.prefix = prefix.clone();
        }
        if let Some(infix) = &self.fallback.infix {
            convention.infix = infix.clone();
        }
        convention
    }
}
