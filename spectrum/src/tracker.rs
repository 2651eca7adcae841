//! Incremental interference bookkeeping shared by every heuristic.
//!
//! For each vertex `v` and each color `c` of the spectrum the tracker keeps
//! the interference `v` would suffer if it took `c`, summed over the
//! neighbors colored so far. Coloring a vertex updates its neighbors' rows,
//! so asking for the least-interfering color is a scan over one row instead
//! of a walk over the neighborhood.

use crate::coloring::Coloring;
use crate::graph::{Graph, Vertex};
use crate::interference::{Color, InterferenceMatrix, Spectrum};

/// Whose rows an assignment updates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NeighborUpdate {
    /// Every neighbor, colored or not. Keeps the rows of colored vertices
    /// exact, which recoloring and feasibility checks rely on.
    All,
    /// Only neighbors that are still unassigned; a colored vertex's row is
    /// frozen at the moment it was colored.
    Uncolored,
}

impl NeighborUpdate {
    fn updates(self, coloring: &Coloring, u: Vertex) -> bool {
        match self {
            NeighborUpdate::All => true,
            NeighborUpdate::Uncolored => !coloring.is_colored(u),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct InterferenceTracker {
    ncolors: usize,
    saturation: Vec<u32>,
    interference: Vec<f64>,
}

impl InterferenceTracker {
    /// Zeroes all state for a fresh construction run and returns the
    /// matching all-unassigned coloring.
    pub fn reset(&mut self, graph: &Graph, spectrum: &Spectrum) -> Coloring {
        let nvertices = graph.nvertices();
        self.ncolors = spectrum.len();
        self.saturation.clear();
        self.saturation.resize(nvertices, 0);
        self.interference.clear();
        self.interference.resize(nvertices * self.ncolors, 0.0);
        Coloring::unassigned(nvertices)
    }

    /// Number of neighbor assignments recorded against `v`.
    #[inline]
    pub fn saturation(&self, v: Vertex) -> u32 {
        self.saturation[v as usize]
    }

    /// Running interference of `v` for every color of the spectrum.
    #[inline]
    pub fn row(&self, v: Vertex) -> &[f64] {
        let lo = v as usize * self.ncolors;
        &self.interference[lo..lo + self.ncolors]
    }

    #[inline]
    pub fn interference(&self, v: Vertex, c: Color) -> f64 {
        self.row(v)[c as usize]
    }

    /// Propagates `vertex := color` into its neighbors' rows, retracting
    /// `previous` first when this is a recoloring.
    ///
    /// Must run before the coloring itself changes: with
    /// [`NeighborUpdate::Uncolored`] it inspects which neighbors are still
    /// unassigned.
    pub fn record_assignment(
        &mut self,
        graph: &Graph,
        weights: &InterferenceMatrix,
        vertex: Vertex,
        color: Color,
        coloring: &Coloring,
        update: NeighborUpdate,
        previous: Option<Color>,
    ) {
        debug_assert_eq!(weights.ncolors(), self.ncolors);
        let added = weights.row(color);
        let retracted = previous.map(|p| weights.row(p));
        for &u in graph.neighbors(vertex) {
            self.saturation[u as usize] += 1;
            if !update.updates(coloring, u) {
                continue;
            }
            let lo = u as usize * self.ncolors;
            let row = &mut self.interference[lo..lo + self.ncolors];
            if let Some(retracted) = retracted {
                row.iter_mut().zip(retracted).for_each(|(x, w)| *x -= w);
            }
            row.iter_mut().zip(added).for_each(|(x, w)| *x += w);
        }
    }

    /// Records and then writes `vertex := color`, taking the previous color
    /// from the coloring. Returns the previous color.
    pub fn assign(
        &mut self,
        graph: &Graph,
        weights: &InterferenceMatrix,
        vertex: Vertex,
        color: Color,
        coloring: &mut Coloring,
        update: NeighborUpdate,
    ) -> Option<Color> {
        let previous = coloring.get(vertex);
        self.record_assignment(graph, weights, vertex, color, coloring, update, previous);
        coloring.set(vertex, color);
        previous
    }

    /// The color among the first `k` with the least running interference
    /// for `vertex`; the earliest such color on ties. An isolated vertex
    /// always gets color 0.
    pub fn best_candidate(&self, vertex: Vertex, k: usize) -> Color {
        let row = &self.row(vertex)[..k];
        let mut best = 0;
        for (c, &x) in row.iter().enumerate().skip(1) {
            if x < row[best] {
                best = c;
            }
        }
        best as Color
    }

    /// Recomputes all state from scratch for an arbitrary coloring, as if
    /// its colored vertices had been assigned under [`NeighborUpdate::All`].
    pub fn rebuild(&mut self, graph: &Graph, spectrum: &Spectrum, weights: &InterferenceMatrix, coloring: &Coloring) {
        let mut scratch = self.reset(graph, spectrum);
        for v in graph.vertices() {
            if let Some(c) = coloring.get(v) {
                self.assign(graph, weights, v, c, &mut scratch, NeighborUpdate::All);
            }
        }
        debug_assert_eq!(&scratch, coloring);
    }

    /// Brute-force check that every row equals the sum over the colored
    /// neighbors, up to float rounding.
    pub fn is_consistent(&self, graph: &Graph, weights: &InterferenceMatrix, coloring: &Coloring) -> bool {
        if self.saturation.len() != graph.nvertices() || self.ncolors != weights.ncolors() {
            return false;
        }
        graph.vertices().all(|v| {
            (0..self.ncolors as Color).all(|c| {
                let expected: f64 = graph
                    .neighbors(v)
                    .iter()
                    .filter_map(|&w| coloring.get(w))
                    .map(|wc| weights.weight(c, wc))
                    .sum();
                let actual = self.interference(v, c);
                (expected - actual).abs() <= 1e-9 * (1.0 + expected.abs())
            })
        })
    }
}
