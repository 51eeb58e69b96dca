use super::*;
use crate::test_utils::{andnot_grammar, setup};

fn collect_emissions(
    store: &Arc<ExprStore>,
    grammar: Grammar,
    seed: ExprId,
    max_cost: u32,
) -> Vec<Candidate> {
    enumerate_concrete(store, grammar, seed, max_cost)
}

#[test]
fn max_cost_zero_refines_nothing() {
    let store = setup();
    let (grammar, seed) = andnot_grammar(&store, 1);
    let emissions = collect_emissions(&store, grammar, seed, 0);
    assert!(emissions.is_empty(), "the seed must be popped, not refined");
}

#[test]
fn empty_grammar_quits_without_emitting() {
    let store = setup();
    let nt = store.fun0("_N");

    let mut enumerator = Enumerator::new(Arc::clone(&store), Grammar::new(), 5);
    enumerator.seed(nt);
    enumerator.step(10);

    assert!(!enumerator.is_running());
}

#[test]
fn signal_termination_short_circuits_step() {
    let store = setup();
    let (grammar, seed) = andnot_grammar(&store, 1);

    let fired = Rc::new(RefCell::new(0u32));
    let counter = Rc::clone(&fired);

    let mut enumerator = Enumerator::new(Arc::clone(&store), grammar, 5);
    enumerator.callbacks_mut().on_expression = Some(Box::new(move |_, _| {
        *counter.borrow_mut() += 1;
    }));
    enumerator.seed(seed);
    enumerator.signal_termination();
    enumerator.step(10);

    assert!(!enumerator.is_running());
    assert_eq!(*fired.borrow(), 0, "no candidate may be processed after termination");
}

#[test]
fn emission_costs_are_non_decreasing() {
    let store = setup();
    let (grammar, seed) = andnot_grammar(&store, 2);
    let emissions = collect_emissions(&store, grammar, seed, 3);

    assert!(!emissions.is_empty());
    for window in emissions.windows(2) {
        assert!(
            window[0].cost <= window[1].cost,
            "concrete emissions must come out cheapest first"
        );
    }
    assert!(emissions.iter().all(|c| c.cost <= 3));
}

#[test]
fn layer_announcements_are_unique_and_increasing() {
    let store = setup();
    let (grammar, seed) = andnot_grammar(&store, 1);

    let layers = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&layers);

    let mut enumerator = Enumerator::new(Arc::clone(&store), grammar, 3);
    enumerator.callbacks_mut().on_layer_finished = Some(Box::new(move |cost| {
        sink.borrow_mut().push(cost);
    }));
    enumerator.seed(seed);
    while enumerator.is_running() {
        enumerator.step(1);
    }

    let layers = layers.borrow();
    assert_eq!(*layers, vec![1, 2, 3], "one announcement per layer, in order");
}

#[test]
fn on_expression_sees_abstract_and_concrete_successors() {
    let store = setup();
    let (grammar, seed) = andnot_grammar(&store, 1);

    let all = Rc::new(RefCell::new(0u32));
    let concrete = Rc::new(RefCell::new(0u32));
    let all_sink = Rc::clone(&all);
    let concrete_sink = Rc::clone(&concrete);

    let mut enumerator = Enumerator::new(Arc::clone(&store), grammar, 2);
    enumerator.callbacks_mut().on_expression = Some(Box::new(move |_, _| {
        *all_sink.borrow_mut() += 1;
    }));
    enumerator.callbacks_mut().on_concrete = Some(Box::new(move |store, candidate| {
        assert!(store.is_concrete(candidate.expr));
        *concrete_sink.borrow_mut() += 1;
    }));
    enumerator.seed(seed);
    while enumerator.is_running() {
        enumerator.step(1);
    }

    assert!(*all.borrow() > *concrete.borrow());
    assert!(*concrete.borrow() > 0);
}

#[test]
fn discarding_abstract_candidates_drains_the_frontier() {
    let store = setup();
    let (grammar, seed) = andnot_grammar(&store, 1);

    let mut enumerator = Enumerator::new(Arc::clone(&store), grammar, 10);
    enumerator.callbacks_mut().on_abstract = Some(Box::new(|_, _| Disposition::Discard));

    let emissions = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&emissions);
    enumerator.callbacks_mut().on_concrete = Some(Box::new(move |_, candidate| {
        sink.borrow_mut().push(candidate);
    }));

    enumerator.seed(seed);
    while enumerator.is_running() {
        enumerator.step(1);
    }

    let emissions = emissions.borrow();
    assert!(emissions.iter().all(|c| c.cost == 1), "only direct children of the seed remain");
}

#[test]
fn popping_at_the_cost_bound_aborts_the_session() {
    let store = setup();
    let (grammar, seed) = andnot_grammar(&store, 1);

    let mut enumerator = Enumerator::new(Arc::clone(&store), grammar, 1);
    enumerator.seed(seed);
    while enumerator.is_running() {
        enumerator.step(1);
    }

    assert!(
        enumerator.frontier_len() > 0,
        "abstract cost-1 candidates remain queued when the bound aborts"
    );
}

#[test]
fn seeding_a_concrete_expression_emits_nothing() {
    let store = setup();
    let (grammar, _) = andnot_grammar(&store, 1);
    let x0 = store.fun0("x0");

    let emissions = collect_emissions(&store, grammar, x0, 5);
    assert!(
        emissions.is_empty(),
        "a concrete seed has no refinement path and no rule matches it"
    );
}
