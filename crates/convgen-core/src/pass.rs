//! A minimal transformation pass over a parsed file.
//!
//! [`apply`] hands each node to a [`Transform`] tagged by category. The
//! transform may rewrite the node in place and tells the walker whether to
//! look inside it. Only inline `mod` blocks have children worth walking;
//! function bodies and other items are leaves.

use crate::error::GenResult;
use syn::{File, Item, ItemFn, ItemMod};

/// A node offered to a transform.
pub enum Node<'a> {
    File(&'a mut File),
    Fn(&'a mut ItemFn),
    Module(&'a mut ItemMod),
    Item(&'a mut Item),
}

/// What the walker does after visiting a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Descend,
    Skip,
}

/// Visitor that may rewrite the nodes it is given.
pub trait Transform {
    fn visit(&mut self, node: Node<'_>) -> GenResult<Flow>;
}

/// Walk `file` with `transform`. The first error stops the walk.
pub fn apply<T: Transform + ?Sized>(file: &mut File, transform: &mut T) -> GenResult<()> {
    if transform.visit(Node::File(file))? == Flow::Skip {
        return Ok(());
    }
    walk_items(&mut file.items, transform)
}

fn walk_items<T: Transform + ?Sized>(items: &mut [Item], transform: &mut T) -> GenResult<()> {
    for item in items {
        match item {
            Item::Fn(item_fn) => {
                transform.visit(Node::Fn(item_fn))?;
            }
            Item::Mod(item_mod) => {
                if transform.visit(Node::Module(&mut *item_mod))? == Flow::Descend {
                    if let Some((_, content)) = &mut item_mod.content {
                        walk_items(content, transform)?;
                    }
                }
            }
            other => {
                transform.visit(Node::Item(other))?;
            }
        }
    }
    Ok(())
}
