//! Redundancy filter: symmetry breaking over declared operator attributes.
//!
//! The filter runs on every freshly refined candidate before it is emitted
//! or queued. It must never reject an expression whose equivalence class
//! has no other representative in the search; missed duplicates are merely
//! caught later by hashconsing, so false negatives are harmless.

use crate::expr::{ExprAttr, ExprId, ExprStore};

/// Whether the expression is redundant in the search order and should be
/// dropped.
pub fn is_redundant(store: &ExprStore, expr: ExprId) -> bool {
    has_double_application(store, expr) || breaks_commutative_order(store, expr)
}

/// Recursive scan for an operator with `NO_DOUBLE_APPLICATION` applied
/// directly to itself, e.g. `not(not(x))` or `G(G(p))`.
pub fn has_double_application(store: &ExprStore, expr: ExprId) -> bool {
    let node = store.node(expr);

    if !store.is_nonterminal_symbol(node.func)
        && node.attr.contains(ExprAttr::NO_DOUBLE_APPLICATION)
    {
        // Same symbol implies same name and attributes, so a func match on
        // a direct child is exactly the forbidden nesting.
        for &child in node.children.iter() {
            if store.node(child).func == node.func {
                return true;
            }
        }
    }

    node.children
        .iter()
        .any(|&child| has_double_application(store, child))
}

/// Root-level check that a commutative operator over two concrete operands
/// is in canonical orientation. Only `children[0] <= children[1]` survives;
/// abstract operands are left alone until they concretize.
fn breaks_commutative_order(store: &ExprStore, expr: ExprId) -> bool {
    let node = store.node(expr);

    !store.is_nonterminal_symbol(node.func)
        && node.children.len() == 2
        && node.attr.contains(ExprAttr::COMMUTATIVE)
        && store.is_concrete(node.children[0])
        && store.is_concrete(node.children[1])
        && node.children[0] > node.children[1]
}

#[cfg(test)]
#[path = "tests/filter.rs"]
mod tests;
