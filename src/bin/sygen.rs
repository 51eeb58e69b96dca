//! sygen CLI - enumeration demos over fixed grammars.
//!
//! Subcommands:
//! - `andnot` - AND/NOT structures over a fixed number of variables
//! - `ltl` - simple LTL formulae
//! - `ctl` - simple CTL formulae
//!
//! Options: `-v/--vars <n>` number of variables, `-c/--cost <n>` cost bound.
//! Concrete expressions go to stdout as `<expr> <cost>`; layer progress and
//! the final count go to stderr.

use std::cell::Cell;
use std::process;
use std::rc::Rc;
use std::str::FromStr;
use std::sync::Arc;

use sygen::enumerator::Enumerator;
use sygen::expr::{format_expr, ExprAttr, ExprId, ExprStore};
use sygen::grammar::Grammar;
use sygen::trace;

struct Options {
    vars: usize,
    cost: u32,
}

fn main() {
    trace::init_subscriber();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None | Some("help") | Some("--help") | Some("-h") => print_help(),
        Some("andnot") => run(
            build_andnot,
            format_functional,
            parse_options(&args[1..], 5),
        ),
        Some("ltl") => run(build_ltl, format_infix, parse_options(&args[1..], 5)),
        Some("ctl") => run(build_ctl, format_infix, parse_options(&args[1..], 3)),
        Some(other) => {
            eprintln!("Unknown subcommand: {}", other);
            print_help();
            process::exit(2);
        }
    }
}

fn print_help() {
    println!("sygen - cost-ordered enumeration of grammar terms\n");
    println!("Usage:");
    println!("  sygen andnot [-v <n>] [-c <n>]   Enumerate AND/NOT structures");
    println!("  sygen ltl    [-v <n>] [-c <n>]   Enumerate simple LTL formulae");
    println!("  sygen ctl    [-v <n>] [-c <n>]   Enumerate simple CTL formulae");
    println!();
    println!("Options:");
    println!("  -v, --vars <n>   Number of variables (default 3)");
    println!("  -c, --cost <n>   Maximum bound on the number of rules");
}

fn parse_options(args: &[String], default_cost: u32) -> Options {
    let mut options = Options {
        vars: 3,
        cost: default_cost,
    };
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-v" | "--vars" => options.vars = parse_value(iter.next(), arg),
            "-c" | "--cost" => options.cost = parse_value(iter.next(), arg),
            other => {
                eprintln!("Unknown option: {}", other);
                process::exit(2);
            }
        }
    }
    options
}

fn parse_value<T: FromStr>(value: Option<&String>, flag: &str) -> T {
    match value.and_then(|v| v.parse().ok()) {
        Some(v) => v,
        None => {
            eprintln!("Expected a number after {}", flag);
            process::exit(2);
        }
    }
}

fn run(
    build: fn(&ExprStore, usize) -> (Grammar, ExprId),
    format: fn(&ExprStore, ExprId) -> Result<String, String>,
    options: Options,
) {
    let store = Arc::new(ExprStore::new());
    let (grammar, seed) = build(&store, options.vars);

    let mut enumerator = Enumerator::new(Arc::clone(&store), grammar, options.cost);

    let emitted = Rc::new(Cell::new(0u64));
    let count = Rc::clone(&emitted);
    enumerator.callbacks_mut().on_concrete = Some(Box::new(move |store, candidate| {
        match format(store, candidate.expr) {
            Ok(text) => println!("{} {}", text, candidate.cost),
            Err(err) => eprintln!("Error: {}", err),
        }
        count.set(count.get() + 1);
    }));
    enumerator.callbacks_mut().on_layer_finished = Some(Box::new(|cost| {
        eprintln!("[i] finished considered expressions of cost {}", cost);
    }));

    enumerator.seed(seed);
    while enumerator.is_running() {
        enumerator.step(1);
    }

    eprintln!("#enumerated expressions: {}", emitted.get());
}

/// `_N -> not(_N) | and(_N,_N) | x0..xv`, no attributes.
fn build_andnot(store: &ExprStore, vars: usize) -> (Grammar, ExprId) {
    let nt = store.fun0("_N");
    let not = store.fun1("not", nt, ExprAttr::NONE);
    let and = store.fun2("and", nt, nt, ExprAttr::NONE);

    let mut grammar = Grammar::new();
    grammar.add(nt, not);
    grammar.add(nt, and);
    add_variables(store, &mut grammar, nt, vars);
    (grammar, nt)
}

/// Basic LTL operators with their algebraic attributes.
fn build_ltl(store: &ExprStore, vars: usize) -> (Grammar, ExprId) {
    let nt = store.fun0("_N");
    let not = store.fun1("!", nt, ExprAttr::NO_DOUBLE_APPLICATION);
    let and = store.fun2("&", nt, nt, ExprAttr::IDEMPOTENT | ExprAttr::COMMUTATIVE);
    let or = store.fun2("|", nt, nt, ExprAttr::IDEMPOTENT | ExprAttr::COMMUTATIVE);
    let globally = store.fun1("G", nt, ExprAttr::NO_DOUBLE_APPLICATION);
    let eventually = store.fun1("F", nt, ExprAttr::NO_DOUBLE_APPLICATION);
    let next = store.fun1("X", nt, ExprAttr::NONE);
    let until = store.fun2("U", nt, nt, ExprAttr::IDEMPOTENT);

    let mut grammar = Grammar::new();
    for replacement in [not, and, or, globally, eventually, next, until] {
        grammar.add(nt, replacement);
    }
    add_variables(store, &mut grammar, nt, vars);
    (grammar, nt)
}

/// Basic CTL operators, existential and universal, with their attributes.
fn build_ctl(store: &ExprStore, vars: usize) -> (Grammar, ExprId) {
    let nt = store.fun0("_N");
    let not = store.fun1("!", nt, ExprAttr::NO_DOUBLE_APPLICATION);
    let and = store.fun2("&", nt, nt, ExprAttr::IDEMPOTENT | ExprAttr::COMMUTATIVE);
    let or = store.fun2("|", nt, nt, ExprAttr::IDEMPOTENT | ExprAttr::COMMUTATIVE);

    let eg = store.fun1("EG", nt, ExprAttr::NO_DOUBLE_APPLICATION);
    let ef = store.fun1("EF", nt, ExprAttr::NO_DOUBLE_APPLICATION);
    let ex = store.fun1("EX", nt, ExprAttr::NONE);
    let eu = store.fun2("EU", nt, nt, ExprAttr::IDEMPOTENT);

    let ag = store.fun1("AG", nt, ExprAttr::NO_DOUBLE_APPLICATION);
    let af = store.fun1("AF", nt, ExprAttr::NO_DOUBLE_APPLICATION);
    let ax = store.fun1("AX", nt, ExprAttr::NONE);
    let au = store.fun2("AU", nt, nt, ExprAttr::IDEMPOTENT);

    let mut grammar = Grammar::new();
    for replacement in [not, and, or, eg, ef, ex, eu, ag, af, ax, au] {
        grammar.add(nt, replacement);
    }
    add_variables(store, &mut grammar, nt, vars);
    (grammar, nt)
}

fn add_variables(store: &ExprStore, grammar: &mut Grammar, nt: ExprId, vars: usize) {
    for i in 0..vars {
        let var = store.fun0(&format!("x{}", i));
        grammar.add(nt, var);
    }
}

fn format_functional(store: &ExprStore, expr: ExprId) -> Result<String, String> {
    format_expr(expr, store)
}

/// Infix rendering for temporal formulae: unary operators prefix, binary
/// operators between parenthesized operands. Wider arities are a grammar
/// mistake, not a printable shape.
fn format_infix(store: &ExprStore, expr: ExprId) -> Result<String, String> {
    let node = store
        .resolve(expr)
        .ok_or_else(|| format!("Unknown expr id {:?}", expr))?;
    let name = store
        .symbols()
        .resolve(node.func)
        .ok_or_else(|| format!("Unknown symbol for func id {:?}", node.func))?;

    match node.children.len() {
        0 => Ok(name.to_string()),
        1 => Ok(format!("{}({})", name, format_infix(store, node.children[0])?)),
        2 => Ok(format!(
            "(({}){}({}))",
            format_infix(store, node.children[0])?,
            name,
            format_infix(store, node.children[1])?
        )),
        arity => Err(format!(
            "unsupported number of children in formula: {}",
            arity
        )),
    }
}
