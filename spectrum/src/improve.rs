//! Local improvement of complete colorings.
//!
//! Every pass only ever returns a coloring whose threshold is no worse than
//! the one it was given. They rebuild the tracker from the coloring on
//! entry, so they accept colorings from any source, and leave it describing
//! the coloring they return.

use std::time::Instant;

use rand::seq::index;
use rand::Rng;
use serde_json::json;

use crate::coloring::Coloring;
use crate::error::Result;
use crate::graph::Vertex;
use crate::interference::Color;
use crate::params::{Budget, Params, Refinement};
use crate::problem::Problem;
use crate::report;
use crate::tracker::{InterferenceTracker, NeighborUpdate};

/// Random-subset resampling.
///
/// Each round samples `resample_fraction` of the vertices without
/// replacement and moves the first sampled vertex whose best candidate color
/// strictly lowers the whole-coloring threshold. Rounds without such a
/// vertex change nothing. Returns the final threshold.
pub fn resample<R: Rng + ?Sized>(
    problem: Problem<'_>,
    tracker: &mut InterferenceTracker,
    coloring: &mut Coloring,
    k: usize,
    params: &Params,
    rng: &mut R,
) -> Result<f64> {
    problem.check_palette(k)?;
    problem.check_coloring(coloring, k)?;
    let (graph, weights) = (problem.graph(), problem.weights());
    tracker.rebuild(graph, problem.spectrum(), weights, coloring);

    let n = graph.nvertices();
    let sample_size = ((n as f64 * params.resample_fraction) as usize).max(1).min(n);
    let budget = Budget::start(params);
    let mut best = problem.threshold(coloring);

    for _ in 0..params.resample_iters {
        if budget.exhausted() {
            break;
        }
        for v in index::sample(rng, n, sample_size).iter() {
            let v = v as Vertex;
            let c = tracker.best_candidate(v, k);
            if coloring.get(v).map_or(true, |current| current == c) {
                continue;
            }
            let mut trial = coloring.clone();
            trial.set(v, c);
            let t = problem.threshold(&trial);
            if t < best {
                best = t;
                tracker.assign(graph, weights, v, c, coloring, NeighborUpdate::All);
                break;
            }
        }
    }
    debug_assert!(tracker.is_consistent(graph, weights, coloring));
    Ok(best)
}

/// First sweep at which each `(vertex, color)` pair may be moved to again.
#[derive(Clone, Debug)]
struct Cooldown {
    k: usize,
    tenure: usize,
    expiry: Vec<usize>,
}

impl Cooldown {
    fn new(nvertices: usize, k: usize, tenure: usize) -> Self {
        Self {
            k,
            tenure,
            expiry: vec![0; nvertices * k],
        }
    }

    fn slot(&self, v: Vertex, c: Color) -> usize {
        v as usize * self.k + c as usize
    }

    fn is_cooling(&self, v: Vertex, c: Color, sweep: usize) -> bool {
        self.expiry[self.slot(v, c)] > sweep
    }

    // nothing cools during sweep 0; a pair moved to in sweep `s` is refused
    // in sweeps `s + 1 ..= s + tenure`
    fn start(&mut self, v: Vertex, c: Color, sweep: usize) {
        let slot = self.slot(v, c);
        self.expiry[slot] = sweep + self.tenure + 1;
    }
}

/// Best coloring seen by a walk and its threshold.
struct Incumbent {
    threshold: f64,
    coloring: Coloring,
}

/// One tabu sweep over all vertices in index order.
fn tabu_sweep(
    problem: Problem<'_>,
    tracker: &mut InterferenceTracker,
    coloring: &mut Coloring,
    k: usize,
    cooldown: &mut Cooldown,
    sweep: usize,
    best: &mut Incumbent,
) {
    let (graph, weights) = (problem.graph(), problem.weights());
    for v in graph.vertices() {
        let current = match coloring.get(v) {
            Some(current) => current,
            None => continue,
        };
        let c = tracker.best_candidate(v, k);
        if cooldown.is_cooling(v, c, sweep)
            || tracker.interference(v, c) >= tracker.interference(v, current)
        {
            continue;
        }
        tracker.assign(graph, weights, v, c, coloring, NeighborUpdate::All);
        cooldown.start(v, c, sweep);
        let t = problem.threshold(coloring);
        if t < best.threshold {
            best.threshold = t;
            best.coloring = coloring.clone();
        }
    }
}

/// Cooldown-guarded recoloring sweeps.
///
/// Every sweep visits all vertices and moves a vertex to its best candidate
/// color when that strictly lowers its own interference and the
/// `(vertex, color)` pair is not cooling down. A moved pair is refused for
/// the next `tabu_tenure` sweeps. The best coloring seen replaces
/// `coloring`; its threshold is returned.
pub fn tabu_walk(
    problem: Problem<'_>,
    tracker: &mut InterferenceTracker,
    coloring: &mut Coloring,
    k: usize,
    params: &Params,
) -> Result<f64> {
    problem.check_palette(k)?;
    problem.check_coloring(coloring, k)?;
    let (graph, spectrum, weights) = (problem.graph(), problem.spectrum(), problem.weights());
    tracker.rebuild(graph, spectrum, weights, coloring);

    let budget = Budget::start(params);
    let mut best = Incumbent {
        threshold: problem.threshold(coloring),
        coloring: coloring.clone(),
    };
    let mut cooldown = Cooldown::new(graph.nvertices(), k, params.tabu_tenure);

    for sweep in 0..params.tabu_iters {
        if budget.exhausted() {
            break;
        }
        tabu_sweep(problem, tracker, coloring, k, &mut cooldown, sweep, &mut best);
    }

    if best.coloring != *coloring {
        *coloring = best.coloring;
        tracker.rebuild(graph, spectrum, weights, coloring);
    }
    debug_assert!(tracker.is_consistent(graph, weights, coloring));
    Ok(best.threshold)
}

/// Colored, unfrozen neighbors of `v` whose colors weigh the most against
/// `color`.
fn worst_neighbors(
    problem: Problem<'_>,
    coloring: &Coloring,
    frozen: &[bool],
    v: Vertex,
    color: Color,
) -> Vec<Vertex> {
    let weights = problem.weights();
    let mut worst = Vec::new();
    let mut max = 0.0;
    for &w in problem.graph().neighbors(v) {
        let cw = match coloring.get(w) {
            Some(cw) if !frozen[w as usize] => cw,
            _ => continue,
        };
        let x = weights.weight(color, cw);
        if x > max {
            max = x;
            worst.clear();
        }
        if x == max {
            worst.push(w);
        }
    }
    worst
}

/// One cascade from the vertices sitting at `tmax`; see [`cascade`].
fn cascade_pass(
    problem: Problem<'_>,
    tracker: &mut InterferenceTracker,
    coloring: &mut Coloring,
    k: usize,
    tmax: f64,
    depth: usize,
) {
    let (graph, weights) = (problem.graph(), problem.weights());
    let mut frozen = vec![false; graph.nvertices()];
    let mut level: Vec<Vertex> = graph
        .vertices()
        .filter(|&v| problem.vertex_interference(v, coloring) == tmax)
        .collect();

    for _ in 0..depth {
        if level.is_empty() {
            break;
        }
        let mut next = Vec::new();
        while let Some(v) = level.pop() {
            let current = match coloring.get(v) {
                Some(current) => current,
                None => continue,
            };
            frozen[v as usize] = true;
            let culprits = worst_neighbors(problem, coloring, &frozen, v, current);
            culprits.iter().for_each(|&w| frozen[w as usize] = true);

            // interference v keeps once the culprits have moved away
            let relieved = |c: Color| {
                tracker.interference(v, c)
                    - culprits
                        .iter()
                        .filter_map(|&w| coloring.get(w))
                        .map(|cw| weights.weight(c, cw))
                        .sum::<f64>()
            };
            let (mut color, mut after) = (0, relieved(0));
            for c in 1..k as Color {
                let x = relieved(c);
                if x < after {
                    color = c;
                    after = x;
                }
            }
            if after >= tmax {
                return;
            }
            if color != current {
                tracker.assign(graph, weights, v, color, coloring, NeighborUpdate::All);
            }
            next.extend(culprits);
        }
        level = next;
    }
}

/// Conflict cascades outwards from the worst vertices.
///
/// A pass starts from the vertices whose interference equals the threshold.
/// Each visited vertex freezes itself and its worst-hit unfrozen neighbors,
/// then takes the color that would be least interfering once those
/// neighbors moved away. The neighbors are visited on the next level, for
/// at most `cascade_depth` levels. A pass stops early when a vertex cannot
/// get below the threshold the pass started from. Passes repeat while they
/// strictly lower the threshold; the first pass that does not is undone.
pub fn cascade(
    problem: Problem<'_>,
    tracker: &mut InterferenceTracker,
    coloring: &mut Coloring,
    k: usize,
    params: &Params,
) -> Result<f64> {
    problem.check_palette(k)?;
    problem.check_coloring(coloring, k)?;
    let (graph, spectrum, weights) = (problem.graph(), problem.spectrum(), problem.weights());
    tracker.rebuild(graph, spectrum, weights, coloring);

    let budget = Budget::start(params);
    let mut best = problem.threshold(coloring);
    while best > 0.0 && !budget.exhausted() {
        let before = coloring.clone();
        cascade_pass(problem, tracker, coloring, k, best, params.cascade_depth);
        let t = problem.threshold(coloring);
        if t < best {
            best = t;
        } else {
            if before != *coloring {
                *coloring = before;
                tracker.rebuild(graph, spectrum, weights, coloring);
            }
            break;
        }
    }
    debug_assert!(tracker.is_consistent(graph, weights, coloring));
    Ok(best)
}

/// Applies the refinement selected in `params` to a freshly constructed
/// coloring and returns its final threshold.
pub(crate) fn refine<R: Rng + ?Sized>(
    problem: Problem<'_>,
    tracker: &mut InterferenceTracker,
    coloring: &mut Coloring,
    k: usize,
    params: &Params,
    rng: &mut R,
) -> Result<f64> {
    let before = problem.threshold(coloring);
    let start = Instant::now();
    let (name, after) = match params.refinement {
        Refinement::None => return Ok(before),
        Refinement::Resample => (
            "resample",
            resample(problem, tracker, coloring, k, params, rng)?,
        ),
        Refinement::Tabu => ("tabu", tabu_walk(problem, tracker, coloring, k, params)?),
        Refinement::Cascade => ("cascade", cascade(problem, tracker, coloring, k, params)?),
    };
    report::emit(
        params.verbose,
        json!({
            "refinement": name,
            "k": k,
            "threshold_before": before,
            "threshold_after": after,
            "refine_time": report::duration(Instant::now().duration_since(start)),
        }),
    );
    Ok(after)
}
