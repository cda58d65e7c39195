//! Compilation context: the type-resolution service used during synthesis.
//!
//! The generator never looks at items directly. It asks a [`TypeContext`]
//! what a name refers to, so callers can back resolution with something
//! richer than a single file. [`FileContext`] is the implementation built
//! from the top-level items of one `syn::File`.

use crate::ty::Ty;
use std::collections::HashMap;
use syn::{Fields, Item, Visibility};

/// A field of a struct declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Field name.
    pub ident: syn::Ident,

    /// Declared type.
    pub ty: Ty,

    /// Whether the field has any `pub` visibility.
    pub visible: bool,
}

/// A struct with named fields (or a unit struct).
#[derive(Debug, Clone, PartialEq)]
pub struct StructDef {
    /// The declared name.
    pub ident: syn::Ident,

    /// Fields in declaration order.
    pub fields: Vec<FieldDescriptor>,
}

impl StructDef {
    /// Fields that take part in conversion.
    pub fn visible_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|field| field.visible)
    }

    /// Look up a visible field by exact name.
    pub fn visible_field(&self, name: &syn::Ident) -> Option<&FieldDescriptor> {
        self.visible_fields().find(|field| field.ident == *name)
    }

    /// Whether a struct literal naming only visible fields would be incomplete.
    pub fn has_hidden_fields(&self) -> bool {
        self.fields.iter().any(|field| !field.visible)
    }
}

/// What a top-level name is declared as.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Struct(StructDef),
    TupleStruct,
    Enum,
    Union,
    Alias(Ty),
}

impl Declaration {
    /// Short description used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Declaration::Struct(_) => "struct",
            Declaration::TupleStruct => "tuple struct",
            Declaration::Enum => "enum",
            Declaration::Union => "union",
            Declaration::Alias(_) => "alias",
        }
    }
}

/// Type-resolution service.
pub trait TypeContext {
    /// The declaration a bare identifier refers to.
    fn declaration(&self, ident: &str) -> Option<&Declaration>;

    /// Resolve a named alias exactly one level; other types come back as-is.
    fn resolve_alias(&self, ty: &Ty) -> Ty {
        if let Ty::Named { ident, .. } = ty {
            if let Some(Declaration::Alias(target)) = self.declaration(ident) {
                return target.clone();
            }
        }
        ty.clone()
    }

    /// Resolve every named alias in `ty` one level, including those nested
    /// inside `Option`, `Vec` and map arguments.
    fn resolve_aliases(&self, ty: &Ty) -> Ty {
        match ty {
            Ty::Named { .. } => self.resolve_alias(ty),
            Ty::Nullable(inner) => Ty::Nullable(Box::new(self.resolve_aliases(inner))),
            Ty::Seq(inner) => Ty::Seq(Box::new(self.resolve_aliases(inner))),
            Ty::Map { path, key, value } => Ty::Map {
                path: path.clone(),
                key: Box::new(self.resolve_aliases(key)),
                value: Box::new(self.resolve_aliases(value)),
            },
            Ty::Basic(_) | Ty::Other(_) => ty.clone(),
        }
    }

    /// The struct declaration behind a named type, looking through one alias.
    fn struct_def(&self, ty: &Ty) -> Option<&StructDef> {
        let Ty::Named { ident, .. } = ty else {
            return None;
        };
        match self.declaration(ident)? {
            Declaration::Struct(def) => Some(def),
            Declaration::Alias(Ty::Named { ident, .. }) => match self.declaration(ident)? {
                Declaration::Struct(def) => Some(def),
                _ => None,
            },
            _ => None,
        }
    }

    /// Types are identical once every alias on each side has been resolved one level.
    fn identical(&self, a: &Ty, b: &Ty) -> bool {
        a == b || self.resolve_aliases(a) == self.resolve_aliases(b)
    }
}

/// Declarations collected from the top level of one file.
#[derive(Debug, Clone, Default)]
pub struct FileContext {
    declarations: HashMap<String, Declaration>,
}

impl FileContext {
    /// Index the top-level items of a parsed file.
    pub fn from_file(file: &syn::File) -> Self {
        let mut declarations = HashMap::new();

        for item in &file.items {
            let (ident, declaration) = match item {
                Item::Struct(s) => (&s.ident, struct_declaration(s)),
                Item::Enum(e) => (&e.ident, Declaration::Enum),
                Item::Union(u) => (&u.ident, Declaration::Union),
                Item::Type(t) => (&t.ident, Declaration::Alias(Ty::from_syn(&t.ty))),
                _ => continue,
            };
            declarations.insert(ident.to_string(), declaration);
        }

        Self { declarations }
    }

    /// Parse source text and index it.
    pub fn parse(source: &str) -> syn::Result<Self> {
        syn::parse_file(source).map(|file| Self::from_file(&file))
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl TypeContext for FileContext {
    fn declaration(&self, ident: &str) -> Option<&Declaration> {
        self.declarations.get(ident)
    }
}

fn struct_declaration(s: &syn::ItemStruct) -> Declaration {
    let fields = match &s.fields {
        Fields::Named(named) => named
            .named
            .iter()
            .filter_map(|field| {
                Some(FieldDescriptor {
                    ident: field.ident.clone()?,
                    ty: Ty::from_syn(&field.ty),
                    visible: !matches!(field.vis, Visibility::Inherited),
                })
            })
            .collect(),
        Fields::Unit => Vec::new(),
        Fields::Unnamed(_) => return Declaration::TupleStruct,
    };

    Declaration::Struct(StructDef {
        ident: s.ident.clone(),
        fields,
    })
}
