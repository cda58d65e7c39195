//! Text rendering of synthesized bodies.

use syn::{Block, File, Item, ItemFn, Visibility, parse_quote};

/// Render a block as formatted source text, braces included.
///
/// Every line after the opening brace is prefixed with `indent`, so the
/// result can replace a block that starts at that indentation.
pub fn render_block(block: &Block, indent: &str) -> String {
    let file = File {
        shebang: None,
        attrs: Vec::new(),
        items: vec![Item::Fn(ItemFn {
            attrs: Vec::new(),
            vis: Visibility::Inherited,
            sig: parse_quote!(fn __convgen()),
            block: Box::new(block.clone()),
        })],
    };
    let text = prettyplease::unparse(&file);

    let (Some(open), Some(close)) = (text.find('{'), text.rfind('}')) else {
        return "{}".to_string();
    };
    let body = &text[open..=close];

    let mut rendered = String::with_capacity(body.len());
    for (i, line) in body.lines().enumerate() {
        if i > 0 {
            rendered.push('\n');
            if !line.is_empty() {
                rendered.push_str(indent);
            }
        }
        rendered.push_str(line);
    }
    rendered
}
