//! Field-by-field resolution of conversion expressions.
//!
//! For every visible output field the mapper looks for a visible input field
//! with exactly the same name. When one exists, the first matching rule
//! decides the expression:
//!
//! 1. identical types: `in.f`
//! 2. `Option<X>` into `X`: `in.f.unwrap_or_default()`
//! 3. `Y` into `Option<Y>`: `Some(in.f)`
//! 4. a well-known conversion for the unwrapped, alias-resolved type names
//! 5. the [`FallbackPolicy`]
//!
//! Output fields with no counterpart get a zero value.

use crate::context::{FieldDescriptor, StructDef, TypeContext};
use crate::conversions::ConversionTable;
use crate::defaults::default_value;
use crate::error::{GenError, GenResult};
use crate::fallback::FallbackPolicy;
use crate::naming::normalize_type_name;
use quote::ToTokens;
use syn::{Expr, Ident, parse_quote};

/// Which rule produced a field expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Identity,
    Deref,
    AddressOf,
    WellKnown,
    Fallback,
    Default,
}

/// The resolved value of one output field.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedField {
    /// Output field name.
    pub ident: Ident,

    /// Expression producing the field value.
    pub expr: Expr,

    /// Rule that produced `expr`.
    pub resolution: Resolution,

    /// Paths the expression needs in scope (well-known conversions only).
    pub requires: Vec<String>,
}

impl MappedField {
    fn new(ident: &Ident, expr: Expr, resolution: Resolution) -> Self {
        Self {
            ident: ident.clone(),
            expr,
            resolution,
            requires: Vec::new(),
        }
    }
}

/// Resolves output fields against an input struct.
pub struct FieldMapper<'a> {
    ctx: &'a dyn TypeContext,
    table: &'a ConversionTable,
    fallback: &'a dyn FallbackPolicy,
}

impl<'a> FieldMapper<'a> {
    pub fn new(
        ctx: &'a dyn TypeContext,
        table: &'a ConversionTable,
        fallback: &'a dyn FallbackPolicy,
    ) -> Self {
        Self {
            ctx,
            table,
            fallback,
        }
    }

    /// Resolve every visible field of `output`, reading from `binding` of type `input`.
    pub fn map_fields(
        &self,
        binding: &Ident,
        input: &StructDef,
        output: &StructDef,
    ) -> GenResult<Vec<MappedField>> {
        output
            .visible_fields()
            .map(|out_field| {
                let mapped = match input.visible_field(&out_field.ident) {
                    Some(in_field) => self.convert_field(binding, in_field, out_field)?,
                    None => MappedField::new(
                        &out_field.ident,
                        default_value(&out_field.ty),
                        Resolution::Default,
                    ),
                };
                tracing::debug!(
                    field = %mapped.ident,
                    resolution = ?mapped.resolution,
                    "resolved field"
                );
                Ok(mapped)
            })
            .collect()
    }

    /// Resolve one matched pair of fields.
    pub fn convert_field(
        &self,
        binding: &Ident,
        input: &FieldDescriptor,
        output: &FieldDescriptor,
    ) -> GenResult<MappedField> {
        let name = &input.ident;
        let access: Expr = parse_quote!(#binding.#name);
        let out_name = &output.ident;

        if self.ctx.identical(&input.ty, &output.ty) {
            return Ok(MappedField::new(out_name, access, Resolution::Identity));
        }

        let mut from = &input.ty;
        let mut to = &output.ty;

        if let Some(inner) = input.ty.nullable_inner() {
            if self.ctx.identical(inner, &output.ty) {
                let expr = parse_quote!(#access.unwrap_or_default());
                return Ok(MappedField::new(out_name, expr, Resolution::Deref));
            }
            from = inner;
        }

        if let Some(inner) = output.ty.nullable_inner() {
            if self.ctx.identical(inner, &input.ty) {
                let expr = parse_quote!(Some(#access));
                return Ok(MappedField::new(out_name, expr, Resolution::AddressOf));
            }
            to = inner;
        }

        let from_name = normalize_type_name(&self.ctx.resolve_aliases(from));
        let to_name = normalize_type_name(&self.ctx.resolve_aliases(to));
        if let (Some(from_name), Some(to_name)) = (from_name, to_name) {
            if let Some(rule) = self.table.lookup(&from_name, &to_name) {
                let text = rule.expand(&access.to_token_stream().to_string());
                let expr = syn::parse_str::<Expr>(&text)
                    .map_err(|source| GenError::InvalidExpression { expr: text, source })?;
                return Ok(MappedField {
                    ident: out_name.clone(),
                    expr,
                    resolution: Resolution::WellKnown,
                    requires: rule.requires().to_vec(),
                });
            }
        }

        let expr = self.fallback.convert(from, to, &access)?;
        Ok(MappedField::new(out_name, expr, Resolution::Fallback))
    }
}
