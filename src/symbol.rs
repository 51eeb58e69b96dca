use lasso::{Spur, ThreadedRodeo};

/// A unique identifier for an operator or nonterminal symbol.
/// This is an interned string ID for fast equality comparison.
pub type FuncId = Spur;

/// Thread-safe symbol store for interning grammar symbol names.
///
/// Guarantees:
/// - Same string always produces same FuncId
/// - Different strings always produce different FuncIds
/// - FuncId can be resolved back to the original string
///
/// A symbol whose name begins with `_` denotes a nonterminal; every other
/// symbol is a terminal (operator or leaf). The leading underscore is the
/// only nonterminal marker.
pub struct SymbolStore {
    rodeo: ThreadedRodeo,
}

impl SymbolStore {
    /// Create a new empty symbol store.
    pub fn new() -> Self {
        Self {
            rodeo: ThreadedRodeo::new(),
        }
    }

    /// Intern a symbol string, returning its unique FuncId.
    /// If the symbol was already interned, returns the existing FuncId.
    pub fn intern(&self, name: &str) -> FuncId {
        self.rodeo.get_or_intern(name)
    }

    /// Resolve a FuncId back to its string representation.
    /// Returns None if the FuncId was not created by this store.
    pub fn resolve(&self, id: FuncId) -> Option<&str> {
        self.rodeo.try_resolve(&id)
    }

    /// Check if a symbol string has already been interned.
    pub fn contains(&self, name: &str) -> bool {
        self.rodeo.contains(name)
    }

    /// Get the FuncId for a symbol if it exists, without interning.
    pub fn get(&self, name: &str) -> Option<FuncId> {
        self.rodeo.get(name)
    }

    /// Whether the symbol names a nonterminal, i.e. starts with `_`.
    pub fn is_nonterminal(&self, id: FuncId) -> bool {
        self.resolve(id).is_some_and(|name| name.starts_with('_'))
    }
}

impl Default for SymbolStore {
    fn default() -> Self {
        Self::new()
    }
}
