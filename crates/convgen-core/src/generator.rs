//! The generation pass over one file.

use crate::config::{GeneratorConfig, UnsupportedPolicy};
use crate::context::{FileContext, TypeContext};
use crate::conversions::ConversionTable;
use crate::error::{GenError, GenResult};
use crate::fallback::{FallbackPolicy, NamingConvention};
use crate::mapper::{FieldMapper, MappedField};
use crate::pass::{self, Flow, Node, Transform};
use crate::scanner::{DEFAULT_MARKER, analyze_signature, find_marker};
use crate::shape::{ShapePair, classify};
use crate::synth::{StrategyTable, SynthesisInput, Synthesized};
use proc_macro2::Span;
use std::collections::BTreeSet;
use syn::{Block, ItemFn, Signature};

/// One function whose body was replaced.
#[derive(Debug, Clone)]
pub struct Rewrite {
    /// Function name.
    pub function: String,

    /// Source span of the removed marker attribute: first and last token.
    pub marker_span: (Span, Span),

    /// Source span of the replaced block: opening and closing brace.
    pub body_span: (Span, Span),

    /// The new body.
    pub block: Block,

    /// Per-field resolutions that went into the body.
    pub fields: Vec<MappedField>,

    /// Paths the body needs in scope.
    pub requires: BTreeSet<String>,
}

/// Result of a generation pass.
#[derive(Debug, Default)]
pub struct Generation {
    /// Replaced bodies in source order.
    pub rewrites: Vec<Rewrite>,

    /// Per-declaration errors tolerated under [`UnsupportedPolicy::Skip`].
    pub skipped: Vec<GenError>,

    /// Union of every rewrite's required paths. Nothing adds these to the file.
    pub requires: BTreeSet<String>,
}

impl Generation {
    /// Whether any body was replaced.
    pub fn has_changed(&self) -> bool {
        !self.rewrites.is_empty()
    }
}

/// Synthesizes conversion bodies for every marked function in a file.
pub struct Generator {
    marker: String,
    policy: UnsupportedPolicy,
    table: ConversionTable,
    strategies: StrategyTable,
    fallback: Box<dyn FallbackPolicy>,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    /// Default marker, seed conversions, standard strategies, snake_case fallback.
    pub fn new() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            policy: UnsupportedPolicy::Abort,
            table: ConversionTable::standard(),
            strategies: StrategyTable::standard(),
            fallback: Box::new(NamingConvention::default()),
        }
    }

    /// Build a generator from a validated configuration.
    pub fn from_config(config: &GeneratorConfig) -> GenResult<Self> {
        config.validate()?;
        Ok(Self::new()
            .with_marker(config.marker.trim())
            .with_policy(config.on_unsupported)
            .with_table(config.conversion_table()?)
            .with_fallback(config.naming_convention()))
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    pub fn with_policy(mut self, policy: UnsupportedPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_table(mut self, table: ConversionTable) -> Self {
        self.table = table;
        self
    }

    pub fn with_strategies(mut self, strategies: StrategyTable) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn with_fallback(mut self, fallback: impl FallbackPolicy + 'static) -> Self {
        self.fallback = Box::new(fallback);
        self
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn table(&self) -> &ConversionTable {
        &self.table
    }

    /// Run over `file`, resolving types against the file's own declarations.
    pub fn generate(&self, file: &mut syn::File) -> GenResult<Generation> {
        let ctx = FileContext::from_file(file);
        self.generate_with(file, &ctx)
    }

    /// Run over `file` with an explicit type context.
    ///
    /// The file is only modified when the whole pass succeeds.
    pub fn generate_with(
        &self,
        file: &mut syn::File,
        ctx: &dyn TypeContext,
    ) -> GenResult<Generation> {
        let mut working = file.clone();
        let mut converter = ConverterPass {
            generator: self,
            ctx,
            generation: Generation::default(),
        };
        pass::apply(&mut working, &mut converter)?;

        *file = working;
        Ok(converter.generation)
    }

    /// Build the body for one marked signature.
    pub fn synthesize(&self, sig: &Signature, ctx: &dyn TypeContext) -> GenResult<Synthesized> {
        let request = analyze_signature(sig)?;
        let pair = ShapePair::new(
            classify(&request.input.ty, ctx),
            classify(&request.output.ty, ctx),
        );
        tracing::debug!(
            function = %request.function,
            input = %request.input.ty,
            output = %request.output.ty,
            shapes = %pair,
            "synthesizing conversion"
        );

        let mapper = FieldMapper::new(ctx, &self.table, self.fallback.as_ref());
        self.strategies.synthesize(&SynthesisInput {
            request: &request,
            pair: &pair,
            ctx,
            mapper: &mapper,
        })
    }
}

struct ConverterPass<'g> {
    generator: &'g Generator,
    ctx: &'g dyn TypeContext,
    generation: Generation,
}

impl ConverterPass<'_> {
    fn rewrite(&mut self, item: &mut ItemFn) -> GenResult<()> {
        let Some(index) = find_marker(&item.attrs, &self.generator.marker) else {
            return Ok(());
        };

        let synthesized = match self.generator.synthesize(&item.sig, self.ctx) {
            Ok(synthesized) => synthesized,
            Err(err)
                if err.is_per_declaration() && self.generator.policy == UnsupportedPolicy::Skip =>
            {
                tracing::warn!(function = %item.sig.ident, error = %err, "skipping marked function");
                self.generation.skipped.push(err);
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        let marker = item.attrs.remove(index);
        let marker_span = (marker.pound_token.span, marker.bracket_token.span.close());
        let body_span = (
            item.block.brace_token.span.open(),
            item.block.brace_token.span.close(),
        );
        item.block = Box::new(synthesized.block.clone());

        let requires = synthesized.requires();
        self.generation.requires.extend(requires.iter().cloned());
        self.generation.rewrites.push(Rewrite {
            function: item.sig.ident.to_string(),
            marker_span,
            body_span,
            block: synthesized.block,
            fields: synthesized.fields,
            requires,
        });
        Ok(())
    }
}

impl Transform for ConverterPass<'_> {
    fn visit(&mut self, node: Node<'_>) -> GenResult<Flow> {
        match node {
            Node::File(_) => Ok(Flow::Descend),
            Node::Fn(item) => {
                self.rewrite(item)?;
                Ok(Flow::Skip)
            }
            Node::Module(_) | Node::Item(_) => Ok(Flow::Skip),
        }
    }
}

#[cfg(test)]
#[path = "generator/generator_tests.rs"]
mod generator_tests;
