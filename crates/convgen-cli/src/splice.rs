//! Text-level application of rewrites.
//!
//! Only the marker attribute and the function body are touched, so comments
//! and formatting elsewhere in the file survive byte for byte.

use anyhow::{Result, bail};
use convgen_core::{Rewrite, render_block};
use proc_macro2::{LineColumn, Span};

/// Maps `proc_macro2` line/column positions onto byte offsets of a source text.
pub struct LineIndex<'s> {
    source: &'s str,
    line_starts: Vec<usize>,
}

impl<'s> LineIndex<'s> {
    pub fn new(source: &'s str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    /// Byte offset of a position. Lines are 1-based, columns count chars from 0.
    pub fn offset(&self, position: LineColumn) -> Option<usize> {
        let start = *self.line_starts.get(position.line.checked_sub(1)?)?;
        let end = self
            .line_starts
            .get(position.line)
            .copied()
            .unwrap_or(self.source.len());
        let line = &self.source[start..end];

        match line.char_indices().nth(position.column) {
            Some((offset, _)) => Some(start + offset),
            None if position.column == line.chars().count() => Some(end),
            None => None,
        }
    }

    /// Start of the line holding `offset`.
    pub fn line_start(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(i) => self.line_starts[i],
            Err(i) => self.line_starts[i.saturating_sub(1)],
        }
    }

    /// End of the line holding `offset`, past its newline when there is one.
    pub fn line_end(&self, offset: usize) -> usize {
        self.source[offset..]
            .find('\n')
            .map_or(self.source.len(), |i| offset + i + 1)
    }
}

/// A byte range of the source and its replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// Byte order mark `syn::parse_file` drops before lexing.
const BOM: &str = "\u{feff}";

/// Apply `rewrites` to `source`, returning the new text.
///
/// Spans are relative to the text after a leading byte order mark, which is
/// carried over to the output unchanged.
pub fn splice(source: &str, rewrites: &[Rewrite]) -> Result<String> {
    let (bom, text) = match source.strip_prefix(BOM) {
        Some(rest) => (BOM, rest),
        None => ("", source),
    };

    let index = LineIndex::new(text);
    let newline = line_ending(text);
    let mut edits = Vec::with_capacity(rewrites.len() * 2);
    for rewrite in rewrites {
        edits.push(marker_edit(&index, rewrite)?);
        edits.push(body_edit(&index, rewrite, newline)?);
    }

    let spliced = apply(text, edits)?;
    Ok(format!("{bom}{spliced}"))
}

/// `"\r\n"` when the first line ends that way, `"\n"` otherwise.
pub fn line_ending(text: &str) -> &'static str {
    match text.find('\n') {
        Some(i) if text[..i].ends_with('\r') => "\r\n",
        _ => "\n",
    }
}

/// Apply non-overlapping edits.
pub fn apply(source: &str, mut edits: Vec<Edit>) -> Result<String> {
    edits.sort_by(|a, b| b.start.cmp(&a.start));
    for pair in edits.windows(2) {
        if pair[1].end > pair[0].start {
            bail!(
                "overlapping edits at bytes {}..{} and {}..{}",
                pair[1].start,
                pair[1].end,
                pair[0].start,
                pair[0].end
            );
        }
    }

    let mut output = source.to_string();
    for edit in edits {
        output.replace_range(edit.start..edit.end, &edit.text);
    }
    Ok(output)
}

/// Remove the marker; the whole line goes when nothing else is on it.
fn marker_edit(index: &LineIndex<'_>, rewrite: &Rewrite) -> Result<Edit> {
    let (start, end) = range(index, rewrite.marker_span, &rewrite.function)?;
    let line_start = index.line_start(start);
    let line_end = index.line_end(end);

    let before = &index.source[line_start..start];
    let after = &index.source[end..line_end];
    let edit = if before.trim().is_empty() && after.trim().is_empty() {
        Edit {
            start: line_start,
            end: line_end,
            text: String::new(),
        }
    } else {
        let trailing = after.len() - after.trim_start_matches([' ', '\t']).len();
        Edit {
            start,
            end: end + trailing,
            text: String::new(),
        }
    };
    Ok(edit)
}

/// Replace the body, indenting it like the line its opening brace sits on.
fn body_edit(index: &LineIndex<'_>, rewrite: &Rewrite, newline: &str) -> Result<Edit> {
    let (start, end) = range(index, rewrite.body_span, &rewrite.function)?;
    let line = &index.source[index.line_start(start)..start];
    let indent: String = line
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect();

    Ok(Edit {
        start,
        end,
        text: render_block(&rewrite.block, &indent).replace('\n', newline),
    })
}

fn range(index: &LineIndex<'_>, (first, last): (Span, Span), function: &str) -> Result<(usize, usize)> {
    let start = index.offset(first.start());
    let end = index.offset(last.end());
    match (start, end) {
        (Some(start), Some(end)) if start <= end => Ok((start, end)),
        _ => bail!("source positions for `{function}` do not match the file"),
    }
}
