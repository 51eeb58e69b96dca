use crate::symbol::{FuncId, SymbolStore};
use dashmap::DashMap;
use hashbrown::HashMap;
use parking_lot::RwLock;
use rustc_hash::FxHasher;
use smallvec::SmallVec;
use std::hash::{Hash, Hasher};
use std::ops::{BitOr, BitOrAssign};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Unique identifier for an expression in the expression store.
/// ExprIds are stable and can be compared for equality; handle equality
/// coincides with structural equality because expressions are hashconsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(u32);

impl ExprId {
    /// Get the raw u32 value (for debugging/display).
    pub fn raw(self) -> u32 {
        self.0
    }

    #[cfg(test)]
    pub(crate) fn from_raw(raw: u32) -> Self {
        ExprId(raw)
    }
}

/// Algebraic attributes of an operator symbol, kept as a bitset.
///
/// Attributes are fixed when the symbol is declared and travel with every
/// expression node built from it. The redundancy filter consults them to
/// prune search-order duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ExprAttr(u8);

impl ExprAttr {
    /// No attributes.
    pub const NONE: ExprAttr = ExprAttr(0);
    /// Nesting the operator directly inside itself is redundant (e.g. `¬¬x`).
    pub const NO_DOUBLE_APPLICATION: ExprAttr = ExprAttr(1);
    /// Repetition of identical operands is immaterial.
    pub const IDEMPOTENT: ExprAttr = ExprAttr(1 << 1);
    /// Operand order is immaterial.
    pub const COMMUTATIVE: ExprAttr = ExprAttr(1 << 2);

    /// Whether all attribute bits of `other` are set in `self`.
    pub fn contains(self, other: ExprAttr) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether no attribute bits are set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for ExprAttr {
    type Output = ExprAttr;

    fn bitor(self, rhs: ExprAttr) -> ExprAttr {
        ExprAttr(self.0 | rhs.0)
    }
}

impl BitOrAssign for ExprAttr {
    fn bitor_assign(&mut self, rhs: ExprAttr) {
        self.0 |= rhs.0;
    }
}

/// An expression node: a symbol applied to an ordered list of children.
///
/// A node whose symbol name starts with `_` is a nonterminal; all other
/// nodes are terminals (operators or leaves). Nodes are immutable once
/// interned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expr {
    /// The interned symbol at the head of this node.
    pub func: FuncId,
    /// Ordered child handles.
    pub children: SmallVec<[ExprId; 4]>,
    /// Attribute bitset of the head symbol.
    pub attr: ExprAttr,
}

/// Number of shards for hashcons maps (power of 2 for fast modulo).
const NUM_SHARDS: usize = 16;

/// Thread-safe expression store with hashconsing.
///
/// Guarantees:
/// - Structurally equal expressions (same symbol, children, attributes)
///   get the same ExprId
/// - ExprId can be resolved back to the expression
/// - Handles never change meaning; the store only grows
///
/// Node and nonterminal counts are memoized per handle, which is sound
/// because interned nodes are immutable.
pub struct ExprStore {
    /// Symbol table shared with callers declaring grammar symbols.
    symbols: Arc<SymbolStore>,
    /// Central storage of all expressions, indexed by ExprId.
    nodes: RwLock<Vec<Expr>>,
    /// Sharded hashcons maps for reducing contention.
    shards: [RwLock<HashMap<Expr, ExprId>>; NUM_SHARDS],
    /// Counter for generating unique ExprIds.
    next_id: AtomicU32,
    /// Memoized count_nonterminals results.
    nonterminal_counts: DashMap<ExprId, u32>,
    /// Memoized count_nodes results.
    node_counts: DashMap<ExprId, u32>,
}

impl ExprStore {
    /// Create a new empty expression store with its own symbol table.
    pub fn new() -> Self {
        Self::with_symbols(Arc::new(SymbolStore::new()))
    }

    /// Create a new empty expression store sharing an existing symbol table.
    pub fn with_symbols(symbols: Arc<SymbolStore>) -> Self {
        let shards = std::array::from_fn(|_| RwLock::new(HashMap::new()));
        Self {
            symbols,
            nodes: RwLock::new(Vec::new()),
            shards,
            next_id: AtomicU32::new(0),
            nonterminal_counts: DashMap::new(),
            node_counts: DashMap::new(),
        }
    }

    /// Get a reference to the symbol store.
    pub fn symbols(&self) -> &SymbolStore {
        &self.symbols
    }

    /// Intern an expression, returning its ExprId.
    /// If an equal expression already exists, returns the existing ExprId.
    fn intern(&self, expr: Expr) -> ExprId {
        let shard_idx = Self::shard_index(&expr);
        let shard = &self.shards[shard_idx];

        // Fast path: check if the expression exists (read lock)
        {
            let map = shard.read();
            if let Some(&id) = map.get(&expr) {
                return id;
            }
        }

        // Slow path: need to insert (write lock)
        let mut map = shard.write();

        // Double-check after acquiring write lock
        if let Some(&id) = map.get(&expr) {
            return id;
        }

        // Allocate new ExprId and store the expression
        let id = ExprId(self.next_id.fetch_add(1, Ordering::Relaxed));
        {
            let mut nodes = self.nodes.write();
            let idx = id.0 as usize;
            if nodes.len() <= idx {
                // Gap slots belong to in-flight interns and get overwritten.
                nodes.resize(idx + 1, expr.clone());
            } else {
                nodes[idx] = expr.clone();
            }
        }
        map.insert(expr, id);
        id
    }

    /// Declare or look up a symbol application.
    /// Hashconsed: equal name, children, and attributes always return the
    /// same ExprId.
    pub fn make_fun(&self, name: &str, children: &[ExprId], attr: ExprAttr) -> ExprId {
        let func = self.symbols.intern(name);
        self.app(func, SmallVec::from_slice(children), attr)
    }

    /// Create a leaf (0-arity) expression with no attributes.
    pub fn fun0(&self, name: &str) -> ExprId {
        self.make_fun(name, &[], ExprAttr::NONE)
    }

    /// Create a unary expression.
    pub fn fun1(&self, name: &str, child: ExprId, attr: ExprAttr) -> ExprId {
        self.make_fun(name, &[child], attr)
    }

    /// Create a binary expression.
    pub fn fun2(&self, name: &str, left: ExprId, right: ExprId, attr: ExprAttr) -> ExprId {
        self.make_fun(name, &[left, right], attr)
    }

    /// Intern an application of an already-interned symbol.
    pub fn app(&self, func: FuncId, children: SmallVec<[ExprId; 4]>, attr: ExprAttr) -> ExprId {
        self.intern(Expr {
            func,
            children,
            attr,
        })
    }

    /// Resolve an ExprId to its expression.
    /// Returns None if the ExprId is invalid.
    pub fn resolve(&self, id: ExprId) -> Option<Expr> {
        let nodes = self.nodes.read();
        nodes.get(id.0 as usize).cloned()
    }

    /// Resolve an ExprId that is known to be valid.
    ///
    /// Panics if `id` was not issued by this store; an out-of-range handle
    /// is a caller bug.
    pub fn node(&self, id: ExprId) -> Expr {
        self.nodes.read()[id.0 as usize].clone()
    }

    /// The symbol name of an expression, if both handle and symbol resolve.
    pub fn name(&self, id: ExprId) -> Option<&str> {
        self.symbols.resolve(self.resolve(id)?.func)
    }

    /// The ordered child handles of an expression.
    pub fn children(&self, id: ExprId) -> SmallVec<[ExprId; 4]> {
        self.node(id).children
    }

    /// The attribute bitset of an expression.
    pub fn attr(&self, id: ExprId) -> ExprAttr {
        self.node(id).attr
    }

    /// Number of distinct expressions interned so far.
    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    /// Whether the store has no expressions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the symbol names a nonterminal.
    pub fn is_nonterminal_symbol(&self, func: FuncId) -> bool {
        self.symbols.is_nonterminal(func)
    }

    /// Whether the root node of `id` is a nonterminal.
    pub fn is_nonterminal(&self, id: ExprId) -> bool {
        self.is_nonterminal_symbol(self.node(id).func)
    }

    /// Whether the subtree of `id` contains no nonterminal node.
    pub fn is_concrete(&self, id: ExprId) -> bool {
        self.count_nonterminals(id) == 0
    }

    /// Count nonterminal nodes in the subtree of `id`.
    ///
    /// A nonterminal node counts as one and is not descended into;
    /// terminal nodes recurse over their children. Memoized.
    pub fn count_nonterminals(&self, id: ExprId) -> u32 {
        if let Some(n) = self.nonterminal_counts.get(&id) {
            return *n;
        }
        let expr = self.node(id);
        let n = if self.is_nonterminal_symbol(expr.func) {
            1
        } else {
            expr.children
                .iter()
                .map(|&c| self.count_nonterminals(c))
                .sum()
        };
        self.nonterminal_counts.insert(id, n);
        n
    }

    /// Count all nodes in the subtree of `id`. Leaves count as one. Memoized.
    pub fn count_nodes(&self, id: ExprId) -> u32 {
        if let Some(n) = self.node_counts.get(&id) {
            return *n;
        }
        let expr = self.node(id);
        let n = if expr.children.is_empty() {
            1
        } else {
            1 + expr
                .children
                .iter()
                .map(|&c| self.count_nodes(c))
                .sum::<u32>()
        };
        self.node_counts.insert(id, n);
        n
    }

    /// Get the shard index for an expression (for hashcons distribution).
    fn shard_index(expr: &Expr) -> usize {
        let mut hasher = FxHasher::default();
        expr.hash(&mut hasher);
        (hasher.finish() as usize) % NUM_SHARDS
    }
}

impl Default for ExprStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Render an expression in functional notation, e.g. `and(not(x0),x1)`.
///
/// This is the store's default printer; callers with other syntaxes read
/// the accessors and format themselves.
pub fn format_expr(expr: ExprId, store: &ExprStore) -> Result<String, String> {
    fn render(expr: ExprId, store: &ExprStore, out: &mut String) -> Result<(), String> {
        let node = store
            .resolve(expr)
            .ok_or_else(|| format!("Unknown expr id {:?}", expr))?;
        let name = store
            .symbols()
            .resolve(node.func)
            .ok_or_else(|| format!("Unknown symbol for func id {:?}", node.func))?;
        out.push_str(name);
        if !node.children.is_empty() {
            out.push('(');
            let mut first = true;
            for &child in node.children.iter() {
                if !first {
                    out.push(',');
                }
                first = false;
                render(child, store, out)?;
            }
            out.push(')');
        }
        Ok(())
    }

    let mut out = String::new();
    render(expr, store, &mut out)?;
    Ok(out)
}

#[cfg(test)]
#[path = "tests/expr.rs"]
mod tests;
