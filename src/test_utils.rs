use crate::expr::{ExprAttr, ExprId, ExprStore};
use crate::grammar::Grammar;
use std::sync::Arc;

pub(crate) fn setup() -> Arc<ExprStore> {
    Arc::new(ExprStore::new())
}

/// AND/NOT grammar over `vars` variables: `_N -> not(_N) | and(_N,_N) | x0..`.
/// Returns the grammar and the `_N` seed.
pub(crate) fn andnot_grammar(store: &ExprStore, vars: usize) -> (Grammar, ExprId) {
    let nt = store.fun0("_N");
    let not = store.fun1("not", nt, ExprAttr::NONE);
    let and = store.fun2("and", nt, nt, ExprAttr::NONE);

    let mut grammar = Grammar::new();
    grammar.add(nt, not);
    grammar.add(nt, and);
    for i in 0..vars {
        let var = store.fun0(&format!("x{}", i));
        grammar.add(nt, var);
    }
    (grammar, nt)
}
