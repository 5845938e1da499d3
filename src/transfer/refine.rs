//! Conditional-edge refinement for the interval variant with narrowing
//! (spec.md §4.3, analysis "3b"). Given a predecessor block ending in a
//! conditional branch and the successor the edge leads to, narrows the
//! predecessor's exit state by the branch predicate. This is a filter: it
//! may only shrink intervals or drop the whole map to bottom (infeasible
//! edge); it never introduces a key absent from the input.

use crate::domain::interval::Interval;
use crate::domain::IntervalMap;
use crate::ir::{BlockId, IcmpPred, IrView, Opcode, Operand, Terminator};

/// Looks up the `icmp` instruction a conditional branch's `cond` operand
/// refers to, if the predecessor's last few instructions contain one.
fn find_icmp<'a>(view: &'a dyn IrView, block: BlockId, cond: &Operand) -> Option<(&'a IcmpPred, &'a Operand, &'a Operand)> {
    let cond_name = cond.as_reg()?;
    view.instructions(block).iter().find_map(|inst| {
        if inst.name.as_deref() == Some(cond_name) {
            if let Opcode::Icmp { pred, lhs, rhs } = &inst.opcode {
                return Some((pred, lhs, rhs));
            }
        }
        None
    })
}

fn satisfies(pred: IcmpPred, lhs: i64, rhs: i64) -> bool {
    match pred {
        IcmpPred::Eq => lhs == rhs,
        IcmpPred::Ne => lhs != rhs,
        IcmpPred::Sgt => lhs > rhs,
        IcmpPred::Slt => lhs < rhs,
        IcmpPred::Sge => lhs >= rhs,
        IcmpPred::Sle => lhs <= rhs,
    }
}

/// Narrow `interval` by the constraint `interval <pred> c`, where `pred` has
/// already been adjusted for which edge ("flag") is being taken. Matches
/// spec.md §4.3's var-vs-const rules, including the deliberately imprecise
/// `==`/`!=` boundary-only tightening (Design Notes §9: "away-from-boundary
/// refinements are deliberately skipped (sound but imprecise)").
fn narrow_against_const(interval: Interval, pred: IcmpPred, c: i64) -> Interval {
    if interval.is_empty() {
        return Interval::EMPTY;
    }
    let (lo, hi) = (interval.lo().unwrap(), interval.hi().unwrap());
    match pred {
        IcmpPred::Eq => {
            if interval.contains(c) {
                Interval::point(c)
            } else {
                Interval::EMPTY
            }
        }
        IcmpPred::Ne => {
            if lo == hi && lo == c {
                Interval::EMPTY
            } else if lo == c {
                Interval::new_checked(lo + 1, hi)
            } else if hi == c {
                Interval::new_checked(lo, hi - 1)
            } else {
                interval
            }
        }
        IcmpPred::Sgt => Interval::new_checked(lo.max(c + 1), hi),
        IcmpPred::Sge => Interval::new_checked(lo.max(c), hi),
        IcmpPred::Slt => Interval::new_checked(lo, hi.min(c - 1)),
        IcmpPred::Sle => Interval::new_checked(lo, hi.min(c)),
    }
}

/// Narrow two intervals against `lhs <pred> rhs`, widening the tightened
/// side by one for strict comparisons (spec.md §4.3's var-vs-var case).
fn narrow_var_var(lhs: Interval, rhs: Interval, pred: IcmpPred) -> (Interval, Interval) {
    if lhs.is_empty() || rhs.is_empty() {
        return (Interval::EMPTY, Interval::EMPTY);
    }
    let (l_lo, l_hi) = (lhs.lo().unwrap(), lhs.hi().unwrap());
    let (r_lo, r_hi) = (rhs.lo().unwrap(), rhs.hi().unwrap());
    match pred {
        IcmpPred::Eq => {
            let lo = l_lo.max(r_lo);
            let hi = l_hi.min(r_hi);
            (Interval::new_checked(lo, hi), Interval::new_checked(lo, hi))
        }
        IcmpPred::Ne => (lhs, rhs),
        IcmpPred::Sgt => {
            (Interval::new_checked(l_lo.max(r_lo + 1), l_hi), Interval::new_checked(r_lo, r_hi.min(l_hi - 1)))
        }
        IcmpPred::Sge => (Interval::new_checked(l_lo.max(r_lo), l_hi), Interval::new_checked(r_lo, r_hi.min(l_hi))),
        IcmpPred::Slt => {
            (Interval::new_checked(l_lo, l_hi.min(r_hi - 1)), Interval::new_checked(r_lo.max(l_lo + 1), r_hi))
        }
        IcmpPred::Sle => (Interval::new_checked(l_lo, l_hi.min(r_hi)), Interval::new_checked(r_lo.max(l_lo), r_hi)),
    }
}

/// Refine `pre` (a predecessor's exit interval map) by the branch predicate
/// governing the edge `from -> to`. Returns `pre` unchanged when `from`
/// doesn't end in a conditional branch whose condition is a recognizable
/// `icmp`, or when the comparison can't be resolved to a constraint on a
/// local (spec.md §4.3 only narrows const/var combinations it recognizes).
pub fn refine(pre: &IntervalMap, view: &dyn IrView, from: BlockId, to: BlockId) -> IntervalMap {
    let Terminator::CondBr { cond, then_block, else_block } = view.terminator(from) else {
        return pre.clone();
    };
    let flag = if to == *then_block {
        true
    } else if to == *else_block {
        false
    } else {
        return pre.clone();
    };

    let Some((&raw_pred, lhs, rhs)) = find_icmp(view, from, cond) else {
        return pre.clone();
    };
    let pred = if flag { raw_pred } else { raw_pred.negate() };

    match (lhs, rhs) {
        (Operand::Const(a), Operand::Const(b)) => {
            if satisfies(pred, *a, *b) {
                pre.clone()
            } else {
                IntervalMap::empty()
            }
        }
        (Operand::Reg(x), Operand::Const(c)) => {
            let mut out = pre.clone();
            let narrowed = narrow_against_const(pre.get(x), pred, *c);
            if narrowed.is_empty() {
                return IntervalMap::empty();
            }
            out.set(x.clone(), narrowed);
            out
        }
        (Operand::Const(c), Operand::Reg(x)) => {
            // `c <pred> x` is `x <flipped pred> c`.
            let flipped = flip(pred);
            let mut out = pre.clone();
            let narrowed = narrow_against_const(pre.get(x), flipped, *c);
            if narrowed.is_empty() {
                return IntervalMap::empty();
            }
            out.set(x.clone(), narrowed);
            out
        }
        (Operand::Reg(x), Operand::Reg(y)) => {
            let (new_x, new_y) = narrow_var_var(pre.get(x), pre.get(y), pred);
            if new_x.is_empty() || new_y.is_empty() {
                return IntervalMap::empty();
            }
            let mut out = pre.clone();
            out.set(x.clone(), new_x);
            out.set(y.clone(), new_y);
            out
        }
    }
}

fn flip(pred: IcmpPred) -> IcmpPred {
    match pred {
        IcmpPred::Eq => IcmpPred::Eq,
        IcmpPred::Ne => IcmpPred::Ne,
        IcmpPred::Sgt => IcmpPred::Slt,
        IcmpPred::Slt => IcmpPred::Sgt,
        IcmpPred::Sge => IcmpPred::Sle,
        IcmpPred::Sle => IcmpPred::Sge,
    }
}
