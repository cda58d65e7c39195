//! Body synthesis and strategy dispatch.
//!
//! A [`StrategyTable`] maps a [`ShapePair`] to the function that builds the
//! body. The standard table registers [`struct_converter`] for the four
//! struct and `Option<struct>` combinations; any other pair is an
//! [`GenError::UnsupportedShape`].

use crate::context::{StructDef, TypeContext};
use crate::defaults::default_struct_literal;
use crate::error::{GenError, GenResult};
use crate::mapper::{FieldMapper, MappedField};
use crate::scanner::ConversionRequest;
use crate::shape::{Shape, ShapePair};
use crate::ty::Ty;
use std::collections::{BTreeSet, HashMap};
use syn::{Block, Expr, Stmt, parse_quote};

/// Everything a strategy needs to build one body.
pub struct SynthesisInput<'a> {
    pub request: &'a ConversionRequest,
    pub pair: &'a ShapePair,
    pub ctx: &'a dyn TypeContext,
    pub mapper: &'a FieldMapper<'a>,
}

/// A synthesized function body.
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesized {
    pub block: Block,
    pub fields: Vec<MappedField>,
}

impl Synthesized {
    /// Paths the body needs in scope, as declared by well-known conversions.
    pub fn requires(&self) -> BTreeSet<String> {
        self.fields
            .iter()
            .flat_map(|field| field.requires.iter().cloned())
            .collect()
    }
}

/// Builds a body for one shape pair.
pub type Strategy = fn(&SynthesisInput<'_>) -> GenResult<Synthesized>;

/// Registry of strategies keyed by shape pair.
#[derive(Clone, Default)]
pub struct StrategyTable {
    strategies: HashMap<ShapePair, Strategy>,
}

impl StrategyTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// `struct_converter` for every struct / `Option<struct>` combination.
    pub fn standard() -> Self {
        let mut table = Self::empty();
        let structish = [Shape::Struct, Shape::ptr(Shape::Struct)];
        for input in &structish {
            for output in &structish {
                table.register(ShapePair::new(input.clone(), output.clone()), struct_converter);
            }
        }
        table
    }

    /// Register a strategy, returning the one it replaces.
    pub fn register(&mut self, pair: ShapePair, strategy: Strategy) -> Option<Strategy> {
        self.strategies.insert(pair, strategy)
    }

    pub fn get(&self, pair: &ShapePair) -> Option<Strategy> {
        self.strategies.get(pair).copied()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Dispatch on the input's shape pair.
    pub fn synthesize(&self, input: &SynthesisInput<'_>) -> GenResult<Synthesized> {
        let strategy = self
            .get(input.pair)
            .ok_or_else(|| GenError::UnsupportedShape {
                function: input.request.function.to_string(),
                pair: input.pair.clone(),
            })?;
        strategy(input)
    }
}

impl std::fmt::Debug for StrategyTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.strategies.keys()).finish()
    }
}

/// Struct-to-struct conversion, with a `let ... else` guard for an `Option` input.
///
/// ```text
/// let Some(a) = a else { return None; };   // Option input only
/// Some(B { id: a.id })                     // Some(..) for Option output only
/// ```
pub fn struct_converter(input: &SynthesisInput<'_>) -> GenResult<Synthesized> {
    let request = input.request;
    let in_def = target_struct(input.ctx, request, &request.input.ty, input.pair.input.is_ptr())?;
    let out_def = target_struct(
        input.ctx,
        request,
        &request.output.ty,
        input.pair.output.is_ptr(),
    )?;

    let binding = request.input.ident_or_placeholder();
    let fields = input.mapper.map_fields(&binding, in_def, out_def)?;

    let mut stmts: Vec<Stmt> = Vec::with_capacity(2);

    if input.pair.input.is_ptr() {
        let on_none: Expr = if input.pair.output.is_ptr() {
            parse_quote!(None)
        } else {
            default_struct_literal(out_def)
        };
        stmts.push(parse_quote! {
            let Some(#binding) = #binding else {
                return #on_none;
            };
        });
    }

    let construction = struct_literal(out_def, &fields);
    let result: Expr = if input.pair.output.is_ptr() {
        parse_quote!(Some(#construction))
    } else {
        construction
    };
    stmts.push(Stmt::Expr(result, None));

    Ok(Synthesized {
        block: Block {
            brace_token: Default::default(),
            stmts,
        },
        fields,
    })
}

/// The struct behind a binding type, unwrapping one `Option` when the shape is a pointer.
fn target_struct<'c>(
    ctx: &'c dyn TypeContext,
    request: &ConversionRequest,
    ty: &Ty,
    is_ptr: bool,
) -> GenResult<&'c StructDef> {
    let resolved = ctx.resolve_alias(ty);
    let base = if is_ptr {
        resolved.nullable_inner()
    } else {
        Some(&resolved)
    };

    base.and_then(|base| ctx.struct_def(base))
        .ok_or_else(|| GenError::UnresolvedType {
            function: request.function.to_string(),
            ty: ty.to_string(),
        })
}

fn struct_literal(def: &StructDef, fields: &[MappedField]) -> Expr {
    let name = &def.ident;
    let idents = fields.iter().map(|field| &field.ident);
    let exprs = fields.iter().map(|field| &field.expr);

    if def.has_hidden_fields() {
        parse_quote!(#name { #(#idents: #exprs,)* ..Default::default() })
    } else {
        parse_quote!(#name { #(#idents: #exprs),* })
    }
}
