//! A spectrum coloring instance: a graph, a spectrum and the interference
//! between its colors, plus the scoring every heuristic is judged by.

use crate::coloring::Coloring;
use crate::error::{Result, SpectrumError};
use crate::graph::{Graph, Vertex};
use crate::interference::{Color, InterferenceMatrix, Spectrum};

#[derive(Clone, Copy, Debug)]
pub struct Problem<'a> {
    graph: &'a Graph,
    spectrum: &'a Spectrum,
    weights: &'a InterferenceMatrix,
}

impl<'a> Problem<'a> {
    pub fn new(
        graph: &'a Graph,
        spectrum: &'a Spectrum,
        weights: &'a InterferenceMatrix,
    ) -> Result<Self> {
        if graph.nvertices() == 0 {
            return Err(SpectrumError::EmptyGraph);
        }
        if spectrum.is_empty() {
            return Err(SpectrumError::EmptySpectrum);
        }
        if weights.ncolors() != spectrum.len() {
            return Err(SpectrumError::MatrixShape {
                rows: weights.ncolors(),
                cols: weights.ncolors(),
                ncolors: spectrum.len(),
            });
        }
        Ok(Self {
            graph,
            spectrum,
            weights,
        })
    }

    pub fn graph(&self) -> &'a Graph {
        self.graph
    }

    pub fn spectrum(&self) -> &'a Spectrum {
        self.spectrum
    }

    pub fn weights(&self) -> &'a InterferenceMatrix {
        self.weights
    }

    pub fn nvertices(&self) -> usize {
        self.graph.nvertices()
    }

    pub fn ncolors(&self) -> usize {
        self.spectrum.len()
    }

    pub fn check_palette(&self, k: usize) -> Result<()> {
        if k == 0 || k > self.ncolors() {
            return Err(SpectrumError::PaletteSize {
                k,
                available: self.ncolors(),
            });
        }
        Ok(())
    }

    pub fn check_threshold(&self, t: f64) -> Result<()> {
        // written so that NaN fails too
        if !(t >= 0.0) {
            return Err(SpectrumError::NegativeThreshold(t));
        }
        Ok(())
    }

    /// Rejects colorings of another graph or with colors outside the first
    /// `k`. Unassigned vertices are allowed.
    pub fn check_coloring(&self, coloring: &Coloring, k: usize) -> Result<()> {
        if coloring.len() != self.nvertices() {
            return Err(SpectrumError::ColoringShape {
                len: coloring.len(),
                nvertices: self.nvertices(),
            });
        }
        match self
            .graph
            .vertices()
            .find(|&v| coloring.get(v).map_or(false, |c| c as usize >= k))
        {
            Some(v) => Err(SpectrumError::ColorOutOfRange {
                vertex: self.graph.label(v).to_string(),
                color: coloring.as_slice()[v as usize],
                k,
            }),
            None => Ok(()),
        }
    }

    /// Interference `vertex` would suffer with `color`, summed over its
    /// colored neighbors. Unassigned neighbors contribute nothing.
    pub fn potential_interference(&self, vertex: Vertex, color: Color, coloring: &Coloring) -> f64 {
        self.graph
            .neighbors(vertex)
            .iter()
            .filter_map(|&w| coloring.get(w))
            .map(|c| self.weights.weight(color, c))
            .sum()
    }

    /// Realized interference of `vertex`; zero while it's unassigned.
    pub fn vertex_interference(&self, vertex: Vertex, coloring: &Coloring) -> f64 {
        match coloring.get(vertex) {
            Some(c) => self.potential_interference(vertex, c, coloring),
            None => 0.0,
        }
    }

    /// The worst vertex interference of the coloring.
    ///
    /// # Panics
    ///
    /// On a coloring that fails [`Problem::check_coloring`] for the whole
    /// spectrum.
    pub fn threshold(&self, coloring: &Coloring) -> f64 {
        self.graph
            .vertices()
            .map(|v| self.vertex_interference(v, coloring))
            .fold(0.0, f64::max)
    }

    /// True when no vertex could strictly lower its interference by
    /// switching to another of the first `k` colors, neighbors fixed.
    pub fn is_wstable(&self, coloring: &Coloring, k: usize) -> bool {
        let k = k.min(self.ncolors()) as Color;
        self.graph.vertices().all(|v| {
            let current = self.vertex_interference(v, coloring);
            (0..k).all(|c| self.potential_interference(v, c, coloring) >= current)
        })
    }

    /// `Δ · ‖W‖ / k`, an upper bound on the optimal TSC threshold.
    pub fn tsc_upper_bound(&self, k: usize) -> Result<f64> {
        self.check_palette(k)?;
        let delta = self.graph.max_degree() as f64;
        Ok(delta * self.weights.natural_norm() / k as f64)
    }

    /// An upper bound on the number of colors CSC needs for threshold `t`,
    /// built on the gcd `g` of the interference weights:
    /// `⌈(Δ·‖W‖ + g) / (g·⌊t/g⌋ + g)⌉`, with `t + g` as the divisor when
    /// `t` divides `g` or `t = 1`.
    pub fn csc_upper_bound(&self, t: f64) -> Result<usize> {
        self.check_threshold(t)?;
        let g = self.weights.weight_gcd();
        if g <= 0.0 {
            // W is all zeros and any single color works
            return Ok(1);
        }
        let numerator = self.graph.max_degree() as f64 * self.weights.natural_norm() + g;
        let divisor = if t > 0.0 && (g % t == 0.0 || t == 1.0) {
            t + g
        } else {
            g * (t / g).floor() + g
        };
        Ok(((numerator / divisor).ceil() as usize).max(1))
    }
}
