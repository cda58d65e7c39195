//! Coarse shape classification used to pick a synthesis strategy.

use crate::context::{Declaration, TypeContext};
use crate::ty::Ty;
use std::fmt;

/// Shape of a type as seen by strategy dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Shape {
    /// A struct with named fields.
    Struct,

    /// `Option<T>` around another shape.
    Ptr(Box<Shape>),

    /// Anything else, with the structural kind kept for diagnostics.
    Unrecognized(String),
}

impl Shape {
    pub fn ptr(inner: Shape) -> Self {
        Shape::Ptr(Box::new(inner))
    }

    pub fn is_ptr(&self) -> bool {
        matches!(self, Shape::Ptr(_))
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Struct => write!(f, "Struct"),
            Shape::Ptr(inner) => write!(f, "Ptr{inner}"),
            Shape::Unrecognized(kind) => write!(f, "unknown({kind})"),
        }
    }
}

/// Dispatch key: the shapes of the input and output types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShapePair {
    pub input: Shape,
    pub output: Shape,
}

impl ShapePair {
    pub fn new(input: Shape, output: Shape) -> Self {
        Self { input, output }
    }
}

impl fmt::Display for ShapePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.input, self.output)
    }
}

/// Classify a type.
///
/// Each `Option` layer becomes a [`Shape::Ptr`]. A named type is a
/// [`Shape::Struct`] when it names a struct, directly or through a single
/// alias; aliases of aliases are not followed.
pub fn classify(ty: &Ty, ctx: &dyn TypeContext) -> Shape {
    classify_at(ty, ctx, true)
}

fn classify_at(ty: &Ty, ctx: &dyn TypeContext, follow_alias: bool) -> Shape {
    match ty {
        Ty::Nullable(inner) => Shape::ptr(classify_at(inner, ctx, follow_alias)),
        Ty::Named { path, ident } => match ctx.declaration(ident) {
            Some(Declaration::Struct(_)) => Shape::Struct,
            Some(Declaration::Alias(target)) if follow_alias => classify_at(target, ctx, false),
            Some(Declaration::Alias(_)) => Shape::Unrecognized("alias chain".to_string()),
            Some(other) => Shape::Unrecognized(other.kind().to_string()),
            None => Shape::Unrecognized(format!("unknown type {path}")),
        },
        Ty::Basic(basic) => Shape::Unrecognized(format!("primitive {}", basic.name())),
        Ty::Seq(_) => Shape::Unrecognized("sequence".to_string()),
        Ty::Map { .. } => Shape::Unrecognized("map".to_string()),
        Ty::Other(text) => Shape::Unrecognized(format!("other {text}")),
    }
}
