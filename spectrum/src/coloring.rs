//! Vertex to color assignments, partial while a heuristic is running and
//! complete once it returns.

use std::collections::BTreeMap;

use crate::error::{Result, SpectrumError};
use crate::graph::{Graph, Vertex};
use crate::interference::{Color, Spectrum};

pub const NO_COLOR: Color = std::u32::MAX;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Coloring {
    colors: Vec<Color>,
}

impl Coloring {
    pub fn unassigned(nvertices: usize) -> Self {
        Self {
            colors: vec![NO_COLOR; nvertices],
        }
    }

    /// Wraps raw colors indexed by vertex; [`NO_COLOR`] marks unassigned.
    pub fn from_colors(colors: Vec<Color>) -> Self {
        Self { colors }
    }

    /// Builds a coloring from `vertex label -> color label` pairs. Vertices
    /// not mentioned stay unassigned.
    pub fn from_labels<'s, I>(graph: &Graph, spectrum: &Spectrum, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'s str, &'s str)>,
    {
        let mut coloring = Self::unassigned(graph.nvertices());
        for (vertex, color) in pairs {
            let v = graph
                .vertex(vertex)
                .ok_or_else(|| SpectrumError::UnknownVertex(vertex.to_string()))?;
            let c = spectrum
                .color(color)
                .ok_or_else(|| SpectrumError::UnknownColor(color.to_string()))?;
            coloring.colors[v as usize] = c;
        }
        Ok(coloring)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    #[inline]
    pub fn get(&self, v: Vertex) -> Option<Color> {
        match self.colors[v as usize] {
            NO_COLOR => None,
            c => Some(c),
        }
    }

    #[inline]
    pub fn is_colored(&self, v: Vertex) -> bool {
        self.colors[v as usize] != NO_COLOR
    }

    /// Only the tracker writes colors during a solve, so that its running
    /// sums never go stale.
    #[inline]
    pub(crate) fn set(&mut self, v: Vertex, c: Color) {
        self.colors[v as usize] = c;
    }

    pub fn ncolored(&self) -> usize {
        self.colors.iter().filter(|&&c| c != NO_COLOR).count()
    }

    pub fn is_complete(&self) -> bool {
        self.colors.iter().all(|&c| c != NO_COLOR)
    }

    /// Largest color index in use plus one, i.e. the smallest palette
    /// prefix containing every assigned color.
    pub fn palette_size(&self) -> usize {
        self.colors
            .iter()
            .filter(|&&c| c != NO_COLOR)
            .map(|&c| c as usize + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn as_slice(&self) -> &[Color] {
        &self.colors
    }

    /// `vertex label -> color label` view, `None` for unassigned vertices.
    pub fn labeled<'a>(
        &self,
        graph: &'a Graph,
        spectrum: &'a Spectrum,
    ) -> BTreeMap<&'a str, Option<&'a str>> {
        graph
            .vertices()
            .map(|v| (graph.label(v), self.get(v).map(|c| spectrum.label(c))))
            .collect()
    }
}
