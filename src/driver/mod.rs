//! Orchestration: read the IR file, parse it, run the selected analysis to
//! a fixpoint, and print the report. Kept thin and free of analysis logic
//! itself — everything here is sequencing.

use std::path::Path;

use log::info;

use crate::common::error::AnalysisResult;
use crate::domain::{IntervalMap, VarSet};
use crate::ir::Function;
use crate::report;
use crate::solver::{EdgeRefiner, NoRefine, Solver};
use crate::transfer::initvars::InitializedVars;
use crate::transfer::interval::IntervalAnalysis;
use crate::transfer::refine::refine;
use crate::transfer::taint::Taint;

/// Which of the three analyses (spec.md §1) to run, and for interval
/// analysis, whether to apply conditional-edge narrowing (variant 3b) or
/// not (3a).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisKind {
    InitializedVars,
    Taint,
    Interval { narrow: bool },
}

pub fn run(ir_path: &Path, kind: AnalysisKind) -> AnalysisResult<()> {
    info!("reading IR file {}", ir_path.display());
    let src = std::fs::read_to_string(ir_path)?;

    info!("parsing IR");
    let func = crate::ir_text::parse(&src)?;

    match kind {
        AnalysisKind::InitializedVars => run_set_analysis(&func, "initialized", InitializedVars),
        AnalysisKind::Taint => run_set_analysis(&func, "taint", Taint::new()),
        AnalysisKind::Interval { narrow } => run_interval_analysis(&func, narrow),
    }
    Ok(())
}

fn run_set_analysis(func: &Function, kind: &str, transfer: impl crate::transfer::TransferFunctions<State = VarSet>) {
    let mut solver = Solver::new(func, transfer);
    solver.run(func, &mut NoRefine);
    info!("fixpoint reached, rendering report");
    report::print_set_report(func, kind, |block| solver.state(block).clone());
}

fn run_interval_analysis(func: &Function, narrow: bool) {
    let mut solver = Solver::new(func, IntervalAnalysis::new());
    if narrow {
        struct Narrowing;
        impl EdgeRefiner<IntervalMap> for Narrowing {
            fn refine(
                &mut self,
                state: &IntervalMap,
                view: &dyn crate::ir::IrView,
                from: crate::ir::BlockId,
                to: crate::ir::BlockId,
            ) -> IntervalMap {
                refine(state, view, from, to)
            }
        }
        solver.run(func, &mut Narrowing);
    } else {
        solver.run(func, &mut NoRefine);
    }
    info!("fixpoint reached, rendering report");
    report::print_interval_report(func, !narrow, |block| solver.state(block).clone());
}
