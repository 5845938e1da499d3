//! Renders fixpoint results into the exact textual forms the CLI emits to
//! stdout (spec.md §4.5, §6). Trace-level detail about how a result was
//! reached belongs in `log`, not here — this module only prints facts.

use std::fmt::Write as _;

use crate::domain::interval::{Interval, NEG_INF, POS_INF};
use crate::domain::{IntervalMap, VarSet};
use crate::ir::IrView;

/// True for virtual-register names, which the report filters out of every
/// analysis's output (spec.md §4.5: "filtering out any variable whose name
/// contains the virtual-register marker character `%`").
fn is_virtual_register(name: &str) -> bool {
    name.contains('%')
}

/// Renders a set-analysis result (initialized variables or taint) for one
/// block. `kind` is the literal word that appears before "varabile have:" —
/// the misspelling is preserved verbatim, it's part of the observable
/// contract (spec.md §6).
pub fn render_set_block(label: &str, kind: &str, state: &VarSet) -> String {
    let mut names: Vec<&str> = state.iter().filter(|n| !is_virtual_register(n)).collect();
    names.sort_unstable();

    let mut out = String::new();
    let _ = writeln!(out, "Block name:{label}");
    let _ = writeln!(out, "{kind} varabile have: {}", names.join(", "));
    out
}

fn format_interval(interval: Interval) -> String {
    match (interval.lo(), interval.hi()) {
        (Some(lo), Some(hi)) => {
            let lo_str = if lo == NEG_INF { "NEG_INF".to_string() } else { lo.to_string() };
            let hi_str = if hi == POS_INF { "POS_INF".to_string() } else { hi.to_string() };
            format!("[ {lo_str} , {hi_str} ]")
        }
        _ => "[ empty ]".to_string(),
    }
}

/// Renders an interval-analysis result for one block (spec.md §4.5,
/// variant 3 without the pairwise gap report).
pub fn render_interval_block(label: &str, state: &IntervalMap) -> String {
    let mut names: Vec<&str> = state.iter().map(|(name, _)| name).filter(|n| !is_virtual_register(n)).collect();
    names.sort_unstable();

    let mut out = String::new();
    let _ = writeln!(out, "Block name is:{label}");
    for name in names {
        let _ = writeln!(out, "{name}\t{}", format_interval(state.get(name)));
    }
    out
}

/// The maximum endpoint gap between two intervals, or `None` for
/// `Infinity` when either side is unbounded (spec.md §4.5).
fn endpoint_gap(a: Interval, b: Interval) -> Option<i64> {
    if a.is_unbounded() || b.is_unbounded() {
        return None;
    }
    let (a_lo, a_hi) = (a.lo()?, a.hi()?);
    let (b_lo, b_hi) = (b.lo()?, b.hi()?);
    Some((a_lo - b_hi).abs().max((a_hi - b_lo).abs()))
}

/// Renders the 3a variant's additional per-pair endpoint-gap report for one
/// block, appended after `render_interval_block`'s output.
pub fn render_endpoint_gaps(state: &IntervalMap) -> String {
    let mut names: Vec<&str> = state.iter().map(|(name, _)| name).filter(|n| !is_virtual_register(n)).collect();
    names.sort_unstable();

    let mut out = String::new();
    for i in 0..names.len() {
        for j in (i + 1)..names.len() {
            let (a, b) = (names[i], names[j]);
            let gap = endpoint_gap(state.get(a), state.get(b));
            let gap_str = gap.map_or_else(|| "Infinity".to_string(), |g| g.to_string());
            let _ = writeln!(out, "{a}, {b}: {gap_str}");
        }
    }
    out
}

/// Prints a completed set-analysis run to stdout, one block per
/// `view.blocks()` in declaration order.
pub fn print_set_report(view: &dyn IrView, kind: &str, state_of: impl Fn(crate::ir::BlockId) -> VarSet) {
    for &block in view.blocks() {
        print!("{}", render_set_block(view.label(block), kind, &state_of(block)));
    }
}

/// Prints a completed interval-analysis run to stdout; `with_gaps` selects
/// the 3a variant's extra per-block pairwise report.
pub fn print_interval_report(
    view: &dyn IrView,
    with_gaps: bool,
    state_of: impl Fn(crate::ir::BlockId) -> IntervalMap,
) {
    for &block in view.blocks() {
        let state = state_of(block);
        print!("{}", render_interval_block(view.label(block), &state));
        if with_gaps {
            print!("{}", render_endpoint_gaps(&state));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AbstractDomain;

    #[test]
    fn set_report_filters_virtual_registers_and_sorts_names() {
        let mut state = VarSet::bottom();
        state.insert("y".to_string());
        state.insert("x".to_string());
        state.insert("%3".to_string());

        let rendered = render_set_block("entry", "initialized", &state);
        assert_eq!(rendered, "Block name:entry\ninitialized varabile have: x, y\n");
    }

    #[test]
    fn interval_report_spells_saturated_bounds_literally() {
        let mut state = IntervalMap::empty();
        state.set("x", Interval::top());
        state.set("%1", Interval::point(3));

        let rendered = render_interval_block("entry", &state);
        assert_eq!(rendered, "Block name is:entry\nx\t[ NEG_INF , POS_INF ]\n");
    }

    #[test]
    fn endpoint_gap_is_infinity_when_either_interval_is_unbounded() {
        let mut state = IntervalMap::empty();
        state.set("x", Interval::top());
        state.set("y", Interval::new(0, 5));

        let rendered = render_endpoint_gaps(&state);
        assert_eq!(rendered, "x, y: Infinity\n");
    }

    #[test]
    fn endpoint_gap_is_the_max_cross_endpoint_distance() {
        let mut state = IntervalMap::empty();
        state.set("x", Interval::new(0, 5));
        state.set("y", Interval::new(10, 20));

        let rendered = render_endpoint_gaps(&state);
        // max(|0-20|, |5-10|) = 20
        assert_eq!(rendered, "x, y: 20\n");
    }
}
