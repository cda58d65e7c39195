//! Fallback conversion for field pairs with no direct or well-known rule.
//!
//! The generator assumes a conversion function exists and calls it. Whether
//! it actually does is only discovered when the generated code is compiled.

use crate::error::{GenError, GenResult};
use crate::naming::{capitalize, ident_fragment, normalize_type_name};
use crate::ty::Ty;
use serde::Deserialize;
use syn::{Expr, parse_quote};

/// Produces the expression for a field pair nothing else could convert.
pub trait FallbackPolicy {
    /// Convert `source` (of type `from`) into a value of type `to`.
    fn convert(&self, from: &Ty, to: &Ty, source: &Expr) -> GenResult<Expr>;
}

impl<F> FallbackPolicy for F
where
    F: Fn(&Ty, &Ty, &Expr) -> GenResult<Expr>,
{
    fn convert(&self, from: &Ty, to: &Ty, source: &Expr) -> GenResult<Expr> {
        self(from, to, source)
    }
}

/// Casing of the generated function name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameStyle {
    /// `new_string_from_user_id`
    #[default]
    Snake,

    /// `newStringFromUserId`
    Camel,
}

/// Calls `<prefix><to><infix><from>(source)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConvention {
    pub prefix: String,
    pub infix: String,
    pub style: NameStyle,
}

impl Default for NamingConvention {
    fn default() -> Self {
        Self {
            prefix: "new_".to_string(),
            infix: "_from_".to_string(),
            style: NameStyle::Snake,
        }
    }
}

impl NamingConvention {
    /// `newXFromY` naming.
    pub fn camel() -> Self {
        Self {
            prefix: "new".to_string(),
            infix: "From".to_string(),
            style: NameStyle::Camel,
        }
    }

    /// Name of the function converting `from` into `to`.
    pub fn function_name(&self, from: &Ty, to: &Ty) -> String {
        let to = self.fragment(to);
        let from = self.fragment(from);
        format!("{}{to}{}{from}", self.prefix, self.infix)
    }

    fn fragment(&self, ty: &Ty) -> String {
        let normalized = normalize_type_name(ty).unwrap_or_else(|| "value".to_string());
        match self.style {
            NameStyle::Snake => ident_fragment(&normalized),
            NameStyle::Camel => camel_fragment(&normalized),
        }
    }
}

impl FallbackPolicy for NamingConvention {
    fn convert(&self, from: &Ty, to: &Ty, source: &Expr) -> GenResult<Expr> {
        let name = self.function_name(from, to);
        let path: syn::Path =
            syn::parse_str(&name).map_err(|source| GenError::InvalidExpression {
                expr: name.clone(),
                source,
            })?;
        Ok(parse_quote!(#path(#source)))
    }
}

fn camel_fragment(normalized: &str) -> String {
    match normalized.strip_prefix("[]") {
        Some(rest) => format!("Vec{}", camel_fragment(rest)),
        None => capitalize(normalized),
    }
}
