//! Error types for conversion synthesis

use crate::shape::ShapePair;
use thiserror::Error;

/// Result type alias for generator operations
pub type GenResult<T> = Result<T, GenError>;

/// Error type for generator operations
#[derive(Error, Debug)]
pub enum GenError {
    /// No synthesis strategy is registered for the shape pair
    #[error("unsupported conversion in `{function}`: no strategy for {pair}")]
    UnsupportedShape { function: String, pair: ShapePair },

    /// The marked function does not take exactly one parameter and return one value
    #[error(
        "invalid signature for `{function}`: expected 1 parameter and 1 result, found {params} and {results}"
    )]
    Signature {
        function: String,
        params: usize,
        results: usize,
    },

    /// A type required for synthesis could not be resolved to a struct
    #[error("unresolved type in `{function}`: {ty}")]
    UnresolvedType { function: String, ty: String },

    /// A template or fallback produced text that is not a valid expression
    #[error("invalid expression `{expr}`: {source}")]
    InvalidExpression {
        expr: String,
        #[source]
        source: syn::Error,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl GenError {
    /// Whether the error belongs to a single declaration and may be skipped
    ///
    /// Everything else leaves the file in a state no further work can fix.
    pub fn is_per_declaration(&self) -> bool {
        matches!(
            self,
            GenError::UnsupportedShape { .. } | GenError::Signature { .. }
        )
    }
}

#[cfg(test)]
#[path = "error/error_tests.rs"]
mod error_tests;
