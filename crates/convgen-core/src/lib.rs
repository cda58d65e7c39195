//! convgen-core - Synthesis of struct-to-struct conversion functions
//!
//! Mark a function with a `convgen:convert` doc line and give it an empty
//! body:
//!
//! ```rust,ignore
//! /// Maps the domain user onto its transport form.
//! /// convgen:convert
//! pub fn to_dto(user: Option<User>) -> Option<UserDto> {}
//! ```
//!
//! The [`Generator`] replaces that body with a field-by-field conversion,
//! using static type information only:
//!
//! ```rust,ignore
//! pub fn to_dto(user: Option<User>) -> Option<UserDto> {
//!     let Some(user) = user else {
//!         return None;
//!     };
//!     Some(UserDto { id: user.id.to_string(), name: user.name })
//! }
//! ```
//!
//! This crate provides:
//! - [`Generator`] to run a pass over a parsed file
//! - [`TypeContext`] / [`FileContext`] for type resolution
//! - [`ConversionTable`] of well-known scalar conversions
//! - [`FallbackPolicy`] for pairs with no known conversion
//! - [`GeneratorConfig`] for configuration

pub mod config;
pub mod context;
pub mod conversions;
pub mod defaults;
pub mod error;
pub mod fallback;
pub mod generator;
pub mod mapper;
pub mod naming;
pub mod pass;
pub mod render;
pub mod scanner;
pub mod shape;
pub mod synth;
pub mod ty;

pub use config::{GeneratorConfig, UnsupportedPolicy};
pub use context::{FileContext, TypeContext};
pub use conversions::{ConversionRule, ConversionTable};
pub use error::{GenError, GenResult};
pub use fallback::{FallbackPolicy, NameStyle, NamingConvention};
pub use generator::{Generation, Generator, Rewrite};
pub use mapper::{MappedField, Resolution};
pub use render::render_block;
pub use scanner::DEFAULT_MARKER;
pub use shape::{Shape, ShapePair};
pub use ty::Ty;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ConversionRule, ConversionTable, FallbackPolicy, FileContext, GenError, GenResult,
        Generation, Generator, GeneratorConfig, NamingConvention, TypeContext,
        UnsupportedPolicy,
    };
}

#[cfg(test)]
mod lib_tests;
