//! Enumerator - cost-first exhaustive enumeration of concrete grammar terms.
//!
//! The enumerator pops the cheapest candidate off the frontier, refines its
//! shallowest nonterminal with every applicable rule, drops redundant
//! successors, and hands the survivors to caller-supplied callbacks.
//! Concrete successors are emitted; abstract ones go back onto the frontier
//! with their cost bumped by one.

use crate::expr::{ExprId, ExprStore};
use crate::filter::is_redundant;
use crate::frontier::{Candidate, Frontier};
use crate::grammar::Grammar;
use crate::metrics::EnumMetrics;
use crate::refine::{path_to_next_nonterminal, refine};
use crate::trace::{debug, info};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

/// What to do with an abstract candidate after its callback ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Push the candidate back onto the frontier (the default).
    Requeue,
    /// Drop the candidate; the caller has taken it over.
    Discard,
}

/// Caller-supplied extension points, invoked by the enumeration loop.
///
/// Every field defaults to absent. An absent `on_abstract` behaves as if it
/// returned [`Disposition::Requeue`], so abstract successors keep flowing
/// through the frontier unless the caller takes them over.
#[derive(Default)]
pub struct Callbacks {
    /// Invoked for every surviving successor, concrete or not.
    pub on_expression: Option<Box<dyn FnMut(&ExprStore, Candidate)>>,
    /// Invoked for successors containing no nonterminal; this is the
    /// user-visible emission.
    pub on_concrete: Option<Box<dyn FnMut(&ExprStore, Candidate)>>,
    /// Invoked for successors still containing nonterminals; decides
    /// whether the candidate is requeued.
    pub on_abstract: Option<Box<dyn FnMut(&ExprStore, Candidate) -> Disposition>>,
    /// Invoked once when a cost layer has been fully considered, with the
    /// layer's cost.
    pub on_layer_finished: Option<Box<dyn FnMut(u32)>>,
}

impl std::fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_expression", &self.on_expression.is_some())
            .field("on_concrete", &self.on_concrete.is_some())
            .field("on_abstract", &self.on_abstract.is_some())
            .field("on_layer_finished", &self.on_layer_finished.is_some())
            .finish()
    }
}

/// Cost-first enumerator over a grammar.
pub struct Enumerator {
    store: Arc<ExprStore>,
    grammar: Grammar,
    max_cost: u32,
    frontier: Frontier,
    current_cost: u32,
    quit: bool,
    callbacks: Callbacks,
    metrics: EnumMetrics,
}

impl Enumerator {
    /// Create a new enumerator with no callbacks registered.
    pub fn new(store: Arc<ExprStore>, grammar: Grammar, max_cost: u32) -> Self {
        Self::with_callbacks(store, grammar, max_cost, Callbacks::default())
    }

    /// Create a new enumerator with an explicit callback record.
    pub fn with_callbacks(
        store: Arc<ExprStore>,
        grammar: Grammar,
        max_cost: u32,
        callbacks: Callbacks,
    ) -> Self {
        Self {
            store,
            grammar,
            max_cost,
            frontier: Frontier::new(),
            current_cost: 0,
            quit: false,
            callbacks,
            metrics: EnumMetrics::new(),
        }
    }

    /// Get a reference to the expression store.
    pub fn store(&self) -> &ExprStore {
        &self.store
    }

    /// Mutable access to the callback record.
    pub fn callbacks_mut(&mut self) -> &mut Callbacks {
        &mut self.callbacks
    }

    /// Metrics collected so far.
    pub fn metrics(&self) -> &EnumMetrics {
        &self.metrics
    }

    /// Number of candidates currently queued.
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Push a starting expression onto the frontier at cost zero.
    pub fn seed(&mut self, expr: ExprId) {
        self.frontier.push(&self.store, Candidate { expr, cost: 0 });
    }

    /// Request termination; subsequent `step` calls return immediately.
    pub fn signal_termination(&mut self) {
        self.quit = true;
    }

    /// Whether the enumeration can still make progress.
    pub fn is_running(&self) -> bool {
        !self.quit
    }

    /// Perform up to `number_of_steps` pop-and-refine iterations.
    ///
    /// The session ends when the frontier drains, when a candidate at or
    /// beyond the cost bound is popped, or when termination is signalled.
    pub fn step(&mut self, number_of_steps: u32) {
        for _ in 0..number_of_steps {
            if self.frontier.is_empty() {
                self.quit = true;
            }
            if !self.is_running() {
                return;
            }

            let candidate = match self.frontier.pop() {
                Some(candidate) => candidate,
                None => return,
            };
            self.metrics.record_step();

            if candidate.cost > self.current_cost {
                let finished = self.current_cost + 1;
                info!(cost = finished, "finished considered expressions");
                self.metrics.record_layer_finished();
                if let Some(cb) = self.callbacks.on_layer_finished.as_mut() {
                    cb(finished);
                }
                self.current_cost = candidate.cost;
            }

            if candidate.cost >= self.max_cost {
                self.quit = true;
                continue;
            }

            // A concrete candidate has no refinement path and therefore no
            // successors; it simply falls out of the search.
            let successors = match path_to_next_nonterminal(&self.store, candidate.expr) {
                Some(path) => refine(&self.store, candidate.expr, &path, &self.grammar),
                None => Vec::new(),
            };

            for expr in successors {
                if is_redundant(&self.store, expr) {
                    self.metrics.record_redundant();
                    debug!(expr = expr.raw(), "pruned redundant expression");
                    continue;
                }

                let next = Candidate {
                    expr,
                    cost: candidate.cost + 1,
                };
                self.metrics.record_expansion();
                if let Some(cb) = self.callbacks.on_expression.as_mut() {
                    cb(&self.store, next);
                }

                if self.store.is_concrete(expr) {
                    self.metrics.record_concrete();
                    if let Some(cb) = self.callbacks.on_concrete.as_mut() {
                        cb(&self.store, next);
                    }
                } else {
                    let disposition = match self.callbacks.on_abstract.as_mut() {
                        Some(cb) => cb(&self.store, next),
                        None => Disposition::Requeue,
                    };
                    if disposition == Disposition::Requeue {
                        self.metrics.record_requeue();
                        self.frontier.push(&self.store, next);
                    }
                }
            }

            self.metrics.observe_frontier_len(self.frontier.len() as u64);
        }
    }
}

/// Run a full enumeration session and collect the concrete emissions in
/// order.
pub fn enumerate_concrete(
    store: &Arc<ExprStore>,
    grammar: Grammar,
    seed: ExprId,
    max_cost: u32,
) -> Vec<Candidate> {
    let collected = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&collected);

    let mut enumerator = Enumerator::new(Arc::clone(store), grammar, max_cost);
    enumerator.callbacks_mut().on_concrete = Some(Box::new(move |_, candidate| {
        sink.borrow_mut().push(candidate);
    }));
    enumerator.seed(seed);
    while enumerator.is_running() {
        enumerator.step(1);
    }

    let result = collected.borrow().clone();
    result
}

#[cfg(test)]
#[path = "tests/enumerator.rs"]
mod tests;
