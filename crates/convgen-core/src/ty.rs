//! Syntactic type model
//!
//! [`Ty`] is a simplified view of a `syn::Type`, built without any name
//! resolution. Named types are resolved later through a
//! [`TypeContext`](crate::context::TypeContext).
//!
//! # Supported Types
//!
//! - **Primitives**: `bool`, `char`, `i8..i128`, `isize`, `u8..u128`, `usize`, `f32`, `f64`
//! - **Strings**: `String`
//! - **Containers**: `Option<T>` (the nullable reference), `Vec<T>`, `HashMap<K, V>`, `BTreeMap<K, V>`
//! - **Named types**: any other path type
//!
//! Everything else (references, tuples, arrays, `Box<T>`, function pointers)
//! is kept as [`Ty::Other`] with its source text.

use quote::ToTokens;
use std::fmt;
use syn::{GenericArgument, PathArguments, Type};

/// Built-in scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Basic {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
    F32,
    F64,
    String,
}

/// Coarse kind of a [`Basic`] type, used for default values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasicKind {
    Boolean,
    Integer,
    Unsigned,
    Float,
    Char,
    String,
}

const BASICS: &[(&str, Basic)] = &[
    ("bool", Basic::Bool),
    ("char", Basic::Char),
    ("i8", Basic::I8),
    ("i16", Basic::I16),
    ("i32", Basic::I32),
    ("i64", Basic::I64),
    ("i128", Basic::I128),
    ("isize", Basic::Isize),
    ("u8", Basic::U8),
    ("u16", Basic::U16),
    ("u32", Basic::U32),
    ("u64", Basic::U64),
    ("u128", Basic::U128),
    ("usize", Basic::Usize),
    ("f32", Basic::F32),
    ("f64", Basic::F64),
    ("String", Basic::String),
];

impl Basic {
    /// Look up a basic type by its name.
    pub fn from_name(name: &str) -> Option<Self> {
        BASICS
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, basic)| *basic)
    }

    /// The primitive name as written in source.
    pub fn name(self) -> &'static str {
        BASICS
            .iter()
            .find(|(_, basic)| *basic == self)
            .map(|(name, _)| *name)
            .unwrap_or("?")
    }

    pub fn kind(self) -> BasicKind {
        match self {
            Basic::Bool => BasicKind::Boolean,
            Basic::Char => BasicKind::Char,
            Basic::I8 | Basic::I16 | Basic::I32 | Basic::I64 | Basic::I128 | Basic::Isize => {
                BasicKind::Integer
            }
            Basic::U8 | Basic::U16 | Basic::U32 | Basic::U64 | Basic::U128 | Basic::Usize => {
                BasicKind::Unsigned
            }
            Basic::F32 | Basic::F64 => BasicKind::Float,
            Basic::String => BasicKind::String,
        }
    }
}

/// A type as written in source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ty {
    /// Built-in scalar.
    Basic(Basic),

    /// `Option<T>`.
    Nullable(Box<Ty>),

    /// `Vec<T>`.
    Seq(Box<Ty>),

    /// `HashMap<K, V>` or `BTreeMap<K, V>`; `path` is the map path without arguments.
    Map {
        path: String,
        key: Box<Ty>,
        value: Box<Ty>,
    },

    /// Any other path type. `ident` is the last path segment.
    Named { path: String, ident: String },

    /// Anything the model does not look into.
    Other(String),
}

impl Ty {
    /// Build the model for a `syn` type.
    pub fn from_syn(ty: &Type) -> Self {
        match ty {
            Type::Paren(paren) => Self::from_syn(&paren.elem),
            Type::Group(group) => Self::from_syn(&group.elem),
            Type::Path(type_path) if type_path.qself.is_none() => Self::from_path(&type_path.path),
            other => Ty::Other(token_text(other)),
        }
    }

    /// Parse a type from source text.
    pub fn parse(source: &str) -> syn::Result<Self> {
        syn::parse_str::<Type>(source).map(|ty| Self::from_syn(&ty))
    }

    fn from_path(path: &syn::Path) -> Self {
        let Some(last) = path.segments.last() else {
            return Ty::Other(token_text(path));
        };
        let ident = last.ident.to_string();
        let args = type_arguments(&last.arguments);

        if args.is_empty() && (path.segments.len() == 1 || ident == "String") {
            if let Some(basic) = Basic::from_name(&ident) {
                return Ty::Basic(basic);
            }
        }

        match (ident.as_str(), args.as_slice()) {
            ("Option", [inner]) => Ty::Nullable(Box::new(Self::from_syn(inner))),
            ("Vec", [inner]) => Ty::Seq(Box::new(Self::from_syn(inner))),
            ("HashMap" | "BTreeMap", [key, value]) => Ty::Map {
                path: bare_path(path),
                key: Box::new(Self::from_syn(key)),
                value: Box::new(Self::from_syn(value)),
            },
            _ => Ty::Named {
                path: token_text(path),
                ident,
            },
        }
    }

    /// Shorthand for a named type with a single-segment path.
    pub fn named(ident: impl Into<String>) -> Self {
        let ident = ident.into();
        Ty::Named {
            path: ident.clone(),
            ident,
        }
    }

    /// The `T` of an `Option<T>`.
    pub fn nullable_inner(&self) -> Option<&Ty> {
        match self {
            Ty::Nullable(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, Ty::Nullable(_))
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Basic(basic) => write!(f, "{}", basic.name()),
            Ty::Nullable(inner) => write!(f, "Option<{inner}>"),
            Ty::Seq(inner) => write!(f, "Vec<{inner}>"),
            Ty::Map { path, key, value } => write!(f, "{path}<{key}, {value}>"),
            Ty::Named { path, .. } => write!(f, "{path}"),
            Ty::Other(text) => write!(f, "{text}"),
        }
    }
}

/// Type arguments of the last path segment, lifetimes and consts ignored.
fn type_arguments(arguments: &PathArguments) -> Vec<&Type> {
    match arguments {
        PathArguments::AngleBracketed(args) => args
            .args
            .iter()
            .filter_map(|arg| match arg {
                GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Path segments joined with `::`, generic arguments dropped.
fn bare_path(path: &syn::Path) -> String {
    let joined = path
        .segments
        .iter()
        .map(|segment| segment.ident.to_string())
        .collect::<Vec<_>>()
        .join("::");
    if path.leading_colon.is_some() {
        format!("::{joined}")
    } else {
        joined
    }
}

/// Token text with the spacing `quote` inserts around punctuation removed.
fn token_text(tokens: &impl ToTokens) -> String {
    tokens
        .to_token_stream()
        .to_string()
        .replace(" :: ", "::")
        .replace(":: ", "::")
        .replace(" < ", "<")
        .replace("< ", "<")
        .replace(" >", ">")
        .replace(" ,", ",")
        .replace("& ", "&")
}
