//! Zero values for output fields that have no source.

use crate::context::StructDef;
use crate::ty::{BasicKind, Ty};
use quote::format_ident;
use syn::{Expr, parse_quote};

/// The zero value of a type.
///
/// Named types are defaulted one level deep through their own `Default`
/// impl, by their bare name. A type declared in another module is emitted
/// unqualified, so it must be reachable under that name at the call site.
pub fn default_value(ty: &Ty) -> Expr {
    match ty {
        Ty::Basic(basic) => match basic.kind() {
            BasicKind::Boolean => parse_quote!(false),
            BasicKind::Integer | BasicKind::Unsigned => parse_quote!(0),
            BasicKind::Float => parse_quote!(0.0),
            BasicKind::Char => parse_quote!('\0'),
            BasicKind::String => parse_quote!(String::new()),
        },
        Ty::Nullable(_) => parse_quote!(None),
        Ty::Seq(_) => parse_quote!(Vec::new()),
        Ty::Map { path, .. } => match syn::parse_str::<syn::Path>(path) {
            Ok(path) => parse_quote!(#path::new()),
            Err(_) => parse_quote!(Default::default()),
        },
        Ty::Named { ident, .. } => {
            let ident = format_ident!("{}", ident);
            parse_quote!(#ident::default())
        }
        Ty::Other(_) => parse_quote!(Default::default()),
    }
}

/// A literal of `def` with every visible field set to its zero value.
///
/// Hidden fields are filled with `..Default::default()`.
pub fn default_struct_literal(def: &StructDef) -> Expr {
    let name = &def.ident;
    let idents = def.visible_fields().map(|field| &field.ident);
    let values = def.visible_fields().map(|field| default_value(&field.ty));

    if def.has_hidden_fields() {
        parse_quote!(#name { #(#idents: #values,)* ..Default::default() })
    } else {
        parse_quote!(#name { #(#idents: #values),* })
    }
}
