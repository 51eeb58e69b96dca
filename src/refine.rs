//! Refinement: choosing the next nonterminal in an abstract expression and
//! expanding it with every applicable grammar rule.
//!
//! The path selection rule targets a nonterminal of minimum depth, breaking
//! ties toward the lowest child index. Rule expansion rebuilds only the
//! spine above the rewritten node; unchanged siblings are shared by handle.

use crate::expr::{ExprId, ExprStore};
use crate::grammar::Grammar;
use smallvec::SmallVec;

/// A path from the root of an expression down to the nonterminal selected
/// for refinement. An empty path targets the root node itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    indices: SmallVec<[u32; 8]>,
}

impl Path {
    /// The path targeting the root node.
    pub fn root() -> Self {
        Path {
            indices: SmallVec::new(),
        }
    }

    /// Child indices from the root down to the target.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Depth of the target below the root.
    pub fn depth(&self) -> usize {
        self.indices.len()
    }

    fn prepended(mut self, index: u32) -> Self {
        self.indices.insert(0, index);
        self
    }
}

/// Find the path to the next nonterminal to refine, or None if the
/// expression is concrete.
///
/// Among all nonterminals the one of minimum depth is chosen; between
/// subtrees reaching the same minimum depth, the first child index wins.
pub fn path_to_next_nonterminal(store: &ExprStore, expr: ExprId) -> Option<Path> {
    let node = store.node(expr);

    if store.is_nonterminal_symbol(node.func) {
        return Some(Path::root());
    }

    // Terminal leaf: nothing to refine below it.
    if node.children.is_empty() {
        return None;
    }

    let mut best: Option<Path> = None;
    for (i, &child) in node.children.iter().enumerate() {
        if let Some(path) = path_to_next_nonterminal(store, child) {
            let improves = match best {
                Some(ref b) => path.depth() + 1 < b.depth(),
                None => true,
            };
            if improves {
                best = Some(path.prepended(i as u32));
            }
        }
    }
    best
}

/// Expand the nonterminal addressed by `path` with every applicable rule.
///
/// Returns the rewritten expressions in rule declaration order. An empty
/// path applies all rules whose `matches` equals `expr` directly; a
/// non-empty path descends into the indexed child and re-interns the spine
/// with that one child replaced.
pub fn refine(store: &ExprStore, expr: ExprId, path: &Path, grammar: &Grammar) -> Vec<ExprId> {
    refine_at(store, expr, path.indices(), grammar)
}

fn refine_at(store: &ExprStore, expr: ExprId, indices: &[u32], grammar: &Grammar) -> Vec<ExprId> {
    let (&head, rest) = match indices.split_first() {
        Some(split) => split,
        None => {
            // At the nonterminal itself: apply all matching rules.
            return grammar
                .rules()
                .iter()
                .filter(|rule| rule.matches == expr)
                .map(|rule| rule.replacement)
                .collect();
        }
    };

    let node = store.node(expr);
    let index = head as usize;
    debug_assert!(
        index < node.children.len(),
        "refinement path index {} out of bounds for arity {}",
        index,
        node.children.len()
    );

    let rewritten = refine_at(store, node.children[index], rest, grammar);

    rewritten
        .into_iter()
        .map(|child| {
            let mut children = node.children.clone();
            children[index] = child;
            store.app(node.func, children, node.attr)
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/refine.rs"]
mod tests;
