//! Chromatic spectrum coloring on top of any TSC solver.
//!
//! [`binary_search`] and [`linear_scan`] try palette sizes in
//! `1..=min(|V|, |S|)` and call a palette feasible when its TSC threshold is
//! at most the target. The binary search assumes feasibility is monotone in
//! `k`; heuristic TSC does not guarantee that, so it may miss a feasible `k`
//! the linear scan would find. After either search the solver's tracker
//! describes the last attempt, which need not be the returned coloring.
//!
//! [`incremental`] needs no TSC solver at all: it builds one coloring in
//! saturation order and keeps every vertex under its share of the target.

use std::time::Instant;

use serde_json::json;

use crate::coloring::Coloring;
use crate::construct::Construction;
use crate::error::Result;
use crate::graph::Vertex;
use crate::interference::Color;
use crate::params::Params;
use crate::policy::{Saturation, SelectionPolicy};
use crate::problem::Problem;
use crate::report;
use crate::solver::{seeded_rng, CscSolution, ThresholdSolver};
use crate::tracker::{InterferenceTracker, NeighborUpdate};

fn attempt<S: ThresholdSolver + ?Sized>(
    solver: &mut S,
    k: usize,
    t: f64,
    verbose: bool,
) -> Result<Option<CscSolution>> {
    let sol = solver.threshold_spectrum_coloring(k)?;
    let feasible = sol.threshold <= t;
    report::emit(
        verbose,
        json!({
            "heuristic": solver.name(),
            "csc_attempt": k,
            "target": t,
            "threshold": sol.threshold,
            "feasible": feasible,
        }),
    );
    Ok(if feasible {
        Some(CscSolution {
            k,
            coloring: sol.coloring,
        })
    } else {
        None
    })
}

/// Validates `t` and returns `(|V|, largest palette to try, verbose)`.
fn search_range<S: ThresholdSolver + ?Sized>(solver: &S, t: f64) -> Result<(usize, usize, bool)> {
    let problem = solver.problem();
    problem.check_threshold(t)?;
    let n = problem.nvertices();
    Ok((n, n.min(problem.ncolors()), solver.params().verbose))
}

/// Binary search for the smallest `k` whose TSC threshold is at most `t`.
///
/// Returns `(|V|, all-unassigned)` when no tried `k` is feasible; see
/// [`CscSolution::is_feasible`].
pub fn binary_search<S: ThresholdSolver + ?Sized>(solver: &mut S, t: f64) -> Result<CscSolution> {
    let (n, hi, verbose) = search_range(&*solver, t)?;
    let mut best = CscSolution::infeasible(n);
    let (mut lo, mut hi) = (1, hi);
    while lo <= hi {
        let k = lo + (hi - lo) / 2;
        match attempt(solver, k, t, verbose)? {
            Some(sol) => {
                best = sol;
                hi = k - 1;
            }
            None => lo = k + 1,
        }
    }
    Ok(best)
}

/// Tries `k = 1, 2, ...` and returns the first feasible palette.
pub fn linear_scan<S: ThresholdSolver + ?Sized>(solver: &mut S, t: f64) -> Result<CscSolution> {
    let (n, hi, verbose) = search_range(&*solver, t)?;
    for k in 1..=hi {
        if let Some(sol) = attempt(solver, k, t, verbose)? {
            return Ok(sol);
        }
    }
    Ok(CscSolution::infeasible(n))
}

/// The first spectrum color `v` can take while every vertex stays within
/// its share of `t`.
///
/// A vertex with `s` of its `d` neighbors colored may carry at most
/// `s / d · t`; the share reaches `t` once its neighborhood is complete.
/// `v` itself must fit its current share, and each colored neighbor must
/// still fit its share once `v` counts as colored.
fn admissible_color(
    problem: Problem<'_>,
    tracker: &InterferenceTracker,
    coloring: &Coloring,
    v: Vertex,
    t: f64,
) -> Option<Color> {
    let (graph, weights) = (problem.graph(), problem.weights());
    let share = |w: Vertex, extra: u32| {
        (tracker.saturation(w) + extra) as f64 / graph.degree(w) as f64 * t
    };
    if graph.degree(v) == 0 {
        return Some(0);
    }
    problem.spectrum().colors().find(|&c| {
        tracker.interference(v, c) <= share(v, 0)
            && graph.neighbors(v).iter().all(|&w| match coloring.get(w) {
                Some(cw) => tracker.interference(w, cw) + weights.weight(cw, c) <= share(w, 1),
                None => true,
            })
    })
}

/// Single-pass CSC: colors vertices in saturation order, each with the
/// first spectrum color that keeps every vertex within its share of `t`.
///
/// The palette is the whole spectrum; the result's `k` is the number of
/// colors up to the largest one used. When some vertex admits no color the
/// result is `(|V|, all-unassigned)`. The run uses its own tracker and a
/// random stream seeded from `params.seed`, so no solver state is touched.
pub fn incremental(problem: Problem<'_>, t: f64, params: &Params) -> Result<CscSolution> {
    problem.check_threshold(t)?;
    let (graph, weights) = (problem.graph(), problem.weights());
    let start = Instant::now();
    let mut rng = seeded_rng(params.seed);
    let mut tracker = InterferenceTracker::default();
    let mut coloring = tracker.reset(graph, problem.spectrum());
    let mut policy = Saturation;
    policy.reset(&problem);
    let k = problem.ncolors();

    let mut stuck = None;
    loop {
        let next = policy.select_next(
            &Construction {
                problem,
                coloring: &coloring,
                tracker: &tracker,
                k,
            },
            &mut rng,
        );
        let v = match next {
            Some(v) => v,
            None => break,
        };
        match admissible_color(problem, &tracker, &coloring, v, t) {
            Some(c) => {
                tracker.assign(graph, weights, v, c, &mut coloring, NeighborUpdate::All);
            }
            None => {
                stuck = Some(v);
                break;
            }
        }
    }

    let sol = match stuck {
        Some(_) => CscSolution::infeasible(graph.nvertices()),
        None => CscSolution {
            k: coloring.palette_size(),
            coloring,
        },
    };
    report::emit(
        params.verbose,
        json!({
            "heuristic": "incremental",
            "target": t,
            "k": sol.k,
            "feasible": sol.is_feasible(),
            "stuck_at": stuck.map(|v| graph.label(v)),
            "csc_time": report::duration(Instant::now().duration_since(start)),
        }),
    );
    Ok(sol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coloring::Coloring;
    use crate::error::SpectrumError;
    use crate::graph::Graph;
    use crate::interference::{InterferenceMatrix, Spectrum};
    use crate::params::{CscSearch, Params};
    use crate::problem::Problem;
    use crate::solver::TscSolution;
    use crate::tracker::InterferenceTracker;

    /// Reports a fixed threshold per palette size and records the palettes
    /// it was asked for.
    struct Scripted<'a> {
        problem: Problem<'a>,
        params: Params,
        tracker: InterferenceTracker,
        thresholds: Vec<f64>,
        asked: Vec<usize>,
    }

    impl<'a> ThresholdSolver for Scripted<'a> {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn problem(&self) -> Problem<'_> {
            self.problem
        }

        fn params(&self) -> &Params {
            &self.params
        }

        fn tracker(&self) -> &InterferenceTracker {
            &self.tracker
        }

        fn threshold_spectrum_coloring(&mut self, k: usize) -> Result<TscSolution> {
            self.problem.check_palette(k)?;
            self.asked.push(k);
            Ok(TscSolution {
                threshold: self.thresholds[k - 1],
                coloring: Coloring::from_colors(vec![0; self.problem.nvertices()]),
            })
        }
    }

    fn clique(n: usize) -> Graph {
        let labels: Vec<String> = (0..n).map(|i| i.to_string()).collect();
        Graph::from_adjacency(
            (0..n).map(|i| (labels[i].clone(), labels[i + 1..].to_vec())),
        )
        .unwrap()
    }

    fn fixture() -> (Graph, Spectrum, InterferenceMatrix) {
        let g = clique(8);
        let s = Spectrum::new(8);
        let w = InterferenceMatrix::from_fn(&s, |i, j| if i == j { 1.0 } else { 0.0 }).unwrap();
        (g, s, w)
    }

    fn scripted<'a>(p: Problem<'a>, search: CscSearch, thresholds: Vec<f64>) -> Scripted<'a> {
        Scripted {
            problem: p,
            params: Params {
                csc_search: search,
                ..Params::default()
            },
            tracker: InterferenceTracker::default(),
            thresholds,
            asked: Vec::new(),
        }
    }

    #[test]
    fn binary_search_finds_smallest_feasible() {
        let (g, s, w) = fixture();
        let p = Problem::new(&g, &s, &w).unwrap();
        let thresholds = (1..=8).map(|k| 8.0 / k as f64).collect();
        let mut solver = scripted(p, CscSearch::Binary, thresholds);
        let sol = solver.chromatic_spectrum_coloring(2.0).unwrap();
        assert_eq!(sol.k, 4);
        assert!(sol.is_feasible());
        assert!(solver.asked.len() <= 4);
    }

    #[test]
    fn linear_scan_stops_at_first_feasible() {
        let (g, s, w) = fixture();
        let p = Problem::new(&g, &s, &w).unwrap();
        // not monotone: 3 is feasible, 4 and 5 are not
        let thresholds = vec![9.0, 9.0, 1.0, 9.0, 9.0, 1.0, 1.0, 1.0];
        let mut solver = scripted(p, CscSearch::Linear, thresholds);
        let sol = solver.chromatic_spectrum_coloring(1.0).unwrap();
        assert_eq!(sol.k, 3);
        assert_eq!(solver.asked, vec![1, 2, 3]);
    }

    #[test]
    fn nothing_feasible() {
        let (g, s, w) = fixture();
        let p = Problem::new(&g, &s, &w).unwrap();
        for &search in [CscSearch::Binary, CscSearch::Linear].iter() {
            let mut solver = scripted(p, search, vec![5.0; 8]);
            let sol = solver.chromatic_spectrum_coloring(1.0).unwrap();
            assert_eq!(sol.k, 8);
            assert!(!sol.is_feasible());
            assert_eq!(sol.coloring.ncolored(), 0);
        }
    }

    #[test]
    fn rejects_bad_threshold() {
        let (g, s, w) = fixture();
        let p = Problem::new(&g, &s, &w).unwrap();
        let mut solver = scripted(p, CscSearch::Binary, vec![0.0; 8]);
        assert_eq!(
            solver.chromatic_spectrum_coloring(-1.0).unwrap_err(),
            SpectrumError::NegativeThreshold(-1.0)
        );
        assert!(solver.chromatic_spectrum_coloring(f64::NAN).is_err());
        assert!(solver.asked.is_empty());
    }

    #[test]
    fn range_is_capped_by_spectrum() {
        let g = clique(8);
        let s = Spectrum::new(3);
        let w = InterferenceMatrix::from_fn(&s, |i, j| if i == j { 1.0 } else { 0.0 }).unwrap();
        let p = Problem::new(&g, &s, &w).unwrap();
        let mut solver = scripted(p, CscSearch::Linear, vec![5.0; 3]);
        let sol = solver.chromatic_spectrum_coloring(0.0).unwrap();
        assert_eq!(solver.asked, vec![1, 2, 3]);
        assert_eq!(sol.k, 8);
    }

    #[test]
    fn incremental_keeps_every_vertex_under_target() {
        let (g, s, w) = fixture();
        let p = Problem::new(&g, &s, &w).unwrap();
        // an 8-clique under identity weights needs 8 colors for t = 0
        let sol = incremental(p, 0.0, &Params::default()).unwrap();
        assert_eq!(sol.k, 8);
        assert!(sol.is_feasible());
        assert_eq!(p.threshold(&sol.coloring), 0.0);

        // t = 2 lets each color class hold up to three vertices
        let sol = incremental(p, 2.0, &Params::default()).unwrap();
        assert!(sol.is_feasible());
        assert!(sol.k < 8);
        assert!(p.threshold(&sol.coloring) <= 2.0);
    }

    #[test]
    fn incremental_colors_isolated_vertex_first() {
        let g = Graph::from_adjacency(vec![("x", Vec::<&str>::new())]).unwrap();
        let s = Spectrum::new(3);
        let w = InterferenceMatrix::from_fn(&s, |i, j| if i == j { 1.0 } else { 0.0 }).unwrap();
        let p = Problem::new(&g, &s, &w).unwrap();
        let sol = incremental(p, 0.0, &Params::default()).unwrap();
        assert_eq!(sol.k, 1);
        assert_eq!(sol.coloring.as_slice(), &[0]);
    }

    #[test]
    fn incremental_reports_infeasible_when_stuck() {
        let g = clique(8);
        let s = Spectrum::new(3);
        let w = InterferenceMatrix::from_fn(&s, |i, j| if i == j { 1.0 } else { 0.0 }).unwrap();
        let p = Problem::new(&g, &s, &w).unwrap();
        let sol = incremental(p, 0.0, &Params::default()).unwrap();
        assert_eq!(sol.k, 8);
        assert!(!sol.is_feasible());
        assert_eq!(sol.coloring.ncolored(), 0);
        assert_eq!(
            incremental(p, -1.0, &Params::default()).unwrap_err(),
            SpectrumError::NegativeThreshold(-1.0)
        );
    }

    #[test]
    fn incremental_search_leaves_solver_alone() {
        let (g, s, w) = fixture();
        let p = Problem::new(&g, &s, &w).unwrap();
        let mut solver = scripted(p, CscSearch::Incremental, vec![9.0; 8]);
        let sol = solver.chromatic_spectrum_coloring(0.0).unwrap();
        assert_eq!(sol.k, 8);
        assert!(solver.asked.is_empty());
    }
}
