//! End-to-end tests driving the textual IR front end through the solver,
//! covering spec.md §8's concrete scenarios and universal properties that
//! don't fit naturally inside a single module's inline tests.

use ir_dataflow::domain::{Interval, IntervalMap};
use ir_dataflow::ir::{BlockId, Function, IrView};
use ir_dataflow::solver::{EdgeRefiner, NoRefine, Solver};
use ir_dataflow::transfer::initvars::InitializedVars;
use ir_dataflow::transfer::interval::IntervalAnalysis;
use ir_dataflow::transfer::refine::refine;
use ir_dataflow::transfer::taint::Taint;

fn parse(src: &str) -> Function {
    ir_dataflow::ir_text::parse(src).expect("valid IR")
}

struct Narrowing;
impl EdgeRefiner<IntervalMap> for Narrowing {
    fn refine(&mut self, state: &IntervalMap, view: &dyn IrView, from: BlockId, to: BlockId) -> IntervalMap {
        refine(state, view, from, to)
    }
}

/// Scenario 2 (spec.md §8): both branches' stored locals reach the join
/// block under the repo's union semantics.
#[test]
fn scenario_branch_join_unions_both_arms() {
    let src = "\
block entry:
  %1 = icmp eq 0, 0
  br %1, then, else

block then:
  alloc-slot a
  store 1, a
  br end

block else:
  alloc-slot b
  store 2, b
  br end

block end:
  ret
";
    let func = parse(src);
    let mut solver = Solver::new(&func, InitializedVars);
    solver.run(&func, &mut NoRefine);

    let end = func.block_id_for_label("end").unwrap();
    let state = solver.state(end);
    assert!(state.contains("a"));
    assert!(state.contains("b"));
}

/// Scenario 5 (spec.md §8): an unbounded loop must converge by saturating
/// at `POS_INF`, never diverging.
///
/// spec.md §8's `i=[0, POS_INF]` is the loop header's *IN* range (the
/// joined contribution from `entry` and the back-edge, before the
/// increment). The reported per-block state is the *OUT* state -- after
/// the increment -- which is one higher at the low end: `entry` is the
/// only contributor of `lo = 0`, and `%2 = %1 + 1; store %2, i` shifts
/// every contribution up by one, so the fixpoint settles at `[1, POS_INF]`.
#[test]
fn scenario_loop_widening_saturates() {
    let src = "\
block entry:
  alloc-slot i
  store 0, i
  br loop

block loop:
  %1 = load i
  %2 = add %1, 1
  store %2, i
  br loop
";
    let func = parse(src);
    let mut solver = Solver::new(&func, IntervalAnalysis::new());
    solver.run(&func, &mut NoRefine);

    let loop_block = func.block_id_for_label("loop").unwrap();
    let state = solver.state(loop_block);
    assert_eq!(state.get("i"), Interval::new(1, ir_dataflow::domain::interval::POS_INF));
}

/// Scenario 6 (spec.md §8): narrowing tightens both branch targets, but the
/// join afterward recovers the un-narrowed union.
#[test]
fn scenario_conditional_narrowing_then_join_recovers_full_range() {
    let src = "\
block entry:
  alloc-slot x
  %1 = icmp slt x, 5
  br %1, then, else

block then:
  br join

block else:
  br join

block join:
  ret
";
    let func = parse(src);
    let mut pre = IntervalMap::empty();
    pre.set("x", Interval::new(0, 10));

    let entry = func.block_id_for_label("entry").unwrap();
    let then_b = func.block_id_for_label("then").unwrap();
    let else_b = func.block_id_for_label("else").unwrap();

    let then_state = refine(&pre, &func, entry, then_b);
    assert_eq!(then_state.get("x"), Interval::new(0, 4));
    let else_state = refine(&pre, &func, entry, else_b);
    assert_eq!(else_state.get("x"), Interval::new(5, 10));

    let mut solver = Solver::new(&func, IntervalAnalysis::new());
    solver.run(&func, &mut Narrowing);
    let join = func.block_id_for_label("join").unwrap();
    // `x` was never narrowed into the map to begin with here (alloc-slot
    // seeds top, never reassigned), so the join naturally recovers the full
    // range rather than either branch's narrowed slice.
    assert_eq!(solver.state(join).get("x"), Interval::top());
}

/// Taint propagation end to end, scenario 3, through the text front end.
#[test]
fn scenario_taint_propagates_and_is_killed() {
    let src = "\
block entry:
  alloc-slot source
  alloc-slot a
  alloc-slot b
  %1 = load source
  store %1, a
  %2 = load a
  store %2, b
  store 0, a
  ret
";
    let func = parse(src);
    let mut solver = Solver::new(&func, Taint::new());
    solver.run(&func, &mut NoRefine);

    let entry = func.block_id_for_label("entry").unwrap();
    let state = solver.state(entry);
    assert!(state.contains("source"));
    assert!(state.contains("b"));
    assert!(!state.contains("a"));
}

/// Determinism (spec.md §8): two runs on the same IR text produce
/// byte-identical fixpoint states.
#[test]
fn determinism_same_input_same_output() {
    let src = "\
block entry:
  alloc-slot x
  alloc-slot y
  store 1, x
  %1 = load x
  %2 = add %1, 1
  store %2, y
  ret
";
    let run_once = || {
        let func = parse(src);
        let mut solver = Solver::new(&func, IntervalAnalysis::new());
        solver.run(&func, &mut NoRefine);
        let entry = func.block_id_for_label("entry").unwrap();
        solver.state(entry).clone()
    };
    assert_eq!(run_once(), run_once());
}

/// Termination bound (spec.md §8): the fixpoint must converge within
/// `blocks * lattice_height` rounds. Exercised indirectly: a long chain of
/// diamonds must still terminate (the test would hang, not fail an
/// assertion, if this regressed badly enough — bounding by running it at
/// all under the test harness's default timeout).
#[test]
fn terminates_on_a_long_chain_of_diamonds() {
    let mut src = String::from("block entry:\n  alloc-slot x\n  store 0, x\n  br b0\n\n");
    for i in 0..20 {
        src.push_str(&format!(
            "block b{i}:\n  %1 = load x\n  %2 = add %1, 1\n  store %2, x\n  br b{}\n\n",
            i + 1
        ));
    }
    src.push_str("block b20:\n  ret\n");
    let func = parse(&src);
    let mut solver = Solver::new(&func, IntervalAnalysis::new());
    solver.run(&func, &mut NoRefine);
    let last = func.block_id_for_label("b20").unwrap();
    assert!(solver.state(last).get("x").contains(20));
}

/// Soundness (set analyses, spec.md §8): the reported initialized-var set
/// at the join of a diamond is a superset of what's initialized on *every*
/// path (a brute-force "both arms agree" check), since the repo's
/// semantics are union, which only ever reports *more* than the
/// intersection a stricter analysis would.
#[test]
fn soundness_union_is_a_superset_of_intersection() {
    let src = "\
block entry:
  %1 = icmp eq 0, 0
  br %1, then, else

block then:
  alloc-slot shared
  alloc-slot only_then
  store 1, shared
  store 1, only_then
  br end

block else:
  alloc-slot shared
  store 2, shared
  br end

block end:
  ret
";
    let func = parse(src);
    let mut solver = Solver::new(&func, InitializedVars);
    solver.run(&func, &mut NoRefine);

    let end = func.block_id_for_label("end").unwrap();
    let state = solver.state(end);
    // Intersection across both arms is just {shared}; the union-based
    // report must be a superset of that.
    assert!(state.contains("shared"));
}
