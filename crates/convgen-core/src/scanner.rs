//! Marker detection and signature analysis.

use crate::error::{GenError, GenResult};
use crate::ty::Ty;
use quote::format_ident;
use syn::{Attribute, Expr, FnArg, Ident, Lit, Meta, Pat, ReturnType, Signature, Type};

/// Doc line that opts a function into generation.
pub const DEFAULT_MARKER: &str = "convgen:convert";

/// Variable name used when the parameter is not a plain identifier.
pub const UNNAMED_BINDING: &str = "input";

/// A type together with the name it is bound to, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub ty: Ty,
    pub ident: Option<Ident>,
}

impl Binding {
    /// The variable to read from in generated code.
    pub fn ident_or_placeholder(&self) -> Ident {
        self.ident
            .clone()
            .unwrap_or_else(|| format_ident!("{}", UNNAMED_BINDING))
    }
}

/// A marked function whose body is to be synthesized.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub function: Ident,
    pub input: Binding,
    pub output: Binding,
}

/// Index of the attribute that is exactly the marker line.
pub fn find_marker(attrs: &[Attribute], marker: &str) -> Option<usize> {
    attrs
        .iter()
        .position(|attr| doc_text(attr).is_some_and(|text| text.trim() == marker))
}

/// Remove the marker attribute, keeping every other attribute in order.
pub fn strip_marker(attrs: &mut Vec<Attribute>, marker: &str) -> Option<Attribute> {
    find_marker(attrs, marker).map(|index| attrs.remove(index))
}

/// Extract the input and output bindings of a marked function.
///
/// The function must take exactly one parameter and return a non-unit type.
/// A named return value does not exist in Rust, so the output binding never
/// has an identifier.
pub fn analyze_signature(sig: &Signature) -> GenResult<ConversionRequest> {
    let function = sig.ident.clone();
    let params = sig.inputs.len();
    let results = match &sig.output {
        ReturnType::Default => 0,
        ReturnType::Type(_, ty) if is_unit(ty) => 0,
        ReturnType::Type(..) => 1,
    };

    let (Some(param), ReturnType::Type(_, output)) = (sig.inputs.first(), &sig.output) else {
        return Err(signature_error(&function, params, results));
    };
    if params != 1 || results != 1 {
        return Err(signature_error(&function, params, results));
    }

    let input = match param {
        FnArg::Typed(typed) => Binding {
            ty: Ty::from_syn(&typed.ty),
            ident: pattern_ident(&typed.pat),
        },
        FnArg::Receiver(_) => return Err(signature_error(&function, 0, results)),
    };

    Ok(ConversionRequest {
        function,
        input,
        output: Binding {
            ty: Ty::from_syn(output),
            ident: None,
        },
    })
}

fn signature_error(function: &Ident, params: usize, results: usize) -> GenError {
    GenError::Signature {
        function: function.to_string(),
        params,
        results,
    }
}

fn is_unit(ty: &Type) -> bool {
    matches!(ty, Type::Tuple(tuple) if tuple.elems.is_empty())
}

fn pattern_ident(pat: &Pat) -> Option<Ident> {
    match pat {
        Pat::Ident(pat_ident) => Some(pat_ident.ident.clone()),
        _ => None,
    }
}

/// The string value of a `doc` attribute.
fn doc_text(attr: &Attribute) -> Option<String> {
    if !attr.path().is_ident("doc") {
        return None;
    }
    if let Meta::NameValue(meta) = &attr.meta {
        if let Expr::Lit(expr_lit) = &meta.value {
            if let Lit::Str(lit_str) = &expr_lit.lit {
                return Some(lit_str.value());
            }
        }
    }
    None
}
