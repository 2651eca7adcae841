//! Compact labeled graph data structure.

use std::collections::HashMap;
use std::ops::Range;

use itertools::Itertools;

use crate::error::{Result, SpectrumError};

pub type Vertex = u32;

/// A compact adjacency list intended for sparse graphs.
///
/// The space of vertices is a contiguous range of u32 ints
/// from [0, nvertices), numbered in the order their labels were
/// first seen. Labels are opaque to every coloring algorithm.
#[derive(Clone, Debug)]
pub struct Graph {
    offsets: Vec<usize>,
    neighbors: Vec<Vertex>,
    labels: Vec<String>,
    index: HashMap<String, Vertex>,
}

impl Graph {
    /// `offsets.len()` should be one greater than the number of vertices
    /// with `neighbors[offsets[i]..offsets[i+1]]` being the edges incident
    /// from `i`, which should be necessarily sorted and bidirectional.
    fn new(offsets: Vec<usize>, neighbors: Vec<Vertex>, labels: Vec<String>) -> Self {
        assert!(offsets.len() <= (1 << 32));
        assert_eq!(offsets.len(), labels.len() + 1);
        debug_assert!(offsets.windows(2).enumerate().all(|(i, s)| {
            s[0] <= s[1]
                && neighbors[s[0]..s[1]].windows(2).all(|ss| ss[0] < ss[1])
                && neighbors[s[0]..s[1]].iter().copied().all(|j| {
                    let i = &(i as u32);
                    neighbors[offsets[j as usize]..offsets[1 + j as usize]]
                        .binary_search(i)
                        .is_ok()
                })
        }));
        let index = labels
            .iter()
            .enumerate()
            .map(|(v, label)| (label.clone(), v as Vertex))
            .collect();
        Self {
            offsets,
            neighbors,
            labels,
            index,
        }
    }

    /// Builds a graph from an adjacency mapping `vertex -> neighbors`.
    ///
    /// Every listed edge is made symmetric, so a mapping that only lists
    /// each edge once is accepted. Vertices that only appear as neighbors
    /// are created on first sight.
    pub fn from_adjacency<I, V, N, S>(adjacency: I) -> Result<Self>
    where
        I: IntoIterator<Item = (V, N)>,
        V: AsRef<str>,
        N: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GraphBuilder::default();
        for (vertex, neighbors) in adjacency {
            let v = builder.add_vertex(vertex.as_ref());
            for neighbor in neighbors {
                let w = builder.add_vertex(neighbor.as_ref());
                builder.add_edge_ids(v, w)?;
            }
        }
        Ok(builder.build())
    }

    pub fn neighbors(&self, v: Vertex) -> &[Vertex] {
        let v = v as usize;
        let lo = self.offsets[v];
        let hi = self.offsets[v + 1];
        &self.neighbors[lo..hi]
    }

    pub fn degree(&self, v: Vertex) -> usize {
        let v = v as usize;
        let lo = self.offsets[v];
        let hi = self.offsets[v + 1];
        hi - lo
    }

    /// Neighbor lists are sorted, so this is a binary search.
    pub fn adjacent(&self, u: Vertex, v: Vertex) -> bool {
        self.neighbors(u).binary_search(&v).is_ok()
    }

    pub fn nvertices(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn nedges(&self) -> usize {
        self.neighbors.len() / 2
    }

    pub fn vertices(&self) -> Range<Vertex> {
        0..(self.nvertices() as Vertex)
    }

    pub fn label(&self, v: Vertex) -> &str {
        &self.labels[v as usize]
    }

    pub fn vertex(&self, label: &str) -> Option<Vertex> {
        self.index.get(label).copied()
    }

    /// Maximum degree, `Δ(G)`. Zero for an empty graph.
    pub fn max_degree(&self) -> usize {
        self.vertices().map(|v| self.degree(v)).max().unwrap_or(0)
    }

    /// Minimum degree, `δ(G)`. Zero for an empty graph.
    pub fn min_degree(&self) -> usize {
        self.vertices().map(|v| self.degree(v)).min().unwrap_or(0)
    }

    /// Vertex degrees sorted in non-increasing order.
    pub fn degree_sequence(&self) -> Vec<usize> {
        self.vertices()
            .map(|v| self.degree(v))
            .sorted_by(|a, b| b.cmp(a))
            .collect()
    }

    /// Each undirected edge once, as `(u, v)` with `u < v`.
    pub fn edges(&self) -> impl Iterator<Item = (Vertex, Vertex)> + '_ {
        self.vertices().flat_map(move |u| {
            self.neighbors(u)
                .iter()
                .copied()
                .filter(move |&v| u < v)
                .map(move |v| (u, v))
        })
    }
}

/// Incremental construction of a [`Graph`] from labeled vertices and edges.
#[derive(Default, Debug)]
pub struct GraphBuilder {
    labels: Vec<String>,
    index: HashMap<String, Vertex>,
    adjacency: Vec<Vec<Vertex>>,
}

impl GraphBuilder {
    /// Returns the id of `label`, creating an isolated vertex if it's new.
    pub fn add_vertex(&mut self, label: &str) -> Vertex {
        if let Some(&v) = self.index.get(label) {
            return v;
        }
        let v = self.labels.len() as Vertex;
        self.labels.push(label.to_string());
        self.index.insert(label.to_string(), v);
        self.adjacency.push(Vec::new());
        v
    }

    /// Adds the undirected edge `{a, b}`, creating missing endpoints.
    /// Parallel edges collapse into one.
    pub fn add_edge(&mut self, a: &str, b: &str) -> Result<()> {
        let u = self.add_vertex(a);
        let v = self.add_vertex(b);
        self.add_edge_ids(u, v)
    }

    fn add_edge_ids(&mut self, u: Vertex, v: Vertex) -> Result<()> {
        if u == v {
            return Err(SpectrumError::SelfLoop(self.labels[u as usize].clone()));
        }
        self.adjacency[u as usize].push(v);
        self.adjacency[v as usize].push(u);
        Ok(())
    }

    pub fn build(self) -> Graph {
        let mut offsets = Vec::with_capacity(self.adjacency.len() + 1);
        let mut neighbors = Vec::new();
        offsets.push(0);
        for mut list in self.adjacency {
            list.sort_unstable();
            list.dedup();
            neighbors.extend(list);
            offsets.push(neighbors.len());
        }
        Graph::new(offsets, neighbors, self.labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paw() -> Graph {
        Graph::from_adjacency(vec![
            ("a", vec!["b", "c"]),
            ("b", vec!["a", "c"]),
            ("c", vec!["a", "b", "d"]),
            ("d", vec!["c"]),
        ])
        .unwrap()
    }

    #[test]
    fn adjacency_mapping() {
        let g = paw();
        assert_eq!(g.nvertices(), 4);
        assert_eq!(g.nedges(), 4);
        let c = g.vertex("c").unwrap();
        assert_eq!(g.degree(c), 3);
        assert_eq!(g.label(c), "c");
        assert_eq!(g.max_degree(), 3);
        assert_eq!(g.min_degree(), 1);
        assert_eq!(g.degree_sequence(), vec![3, 2, 2, 1]);
        assert_eq!(g.edges().count(), 4);
    }

    #[test]
    fn one_sided_edges_are_symmetrized() {
        let g = Graph::from_adjacency(vec![("x", vec!["y", "z"]), ("y", vec![])]).unwrap();
        let (x, y, z) = (
            g.vertex("x").unwrap(),
            g.vertex("y").unwrap(),
            g.vertex("z").unwrap(),
        );
        assert!(g.adjacent(y, x));
        assert!(g.adjacent(z, x));
        assert!(!g.adjacent(y, z));
        assert_eq!(g.nedges(), 2);
    }

    #[test]
    fn duplicate_edges_collapse() {
        let mut b = GraphBuilder::default();
        b.add_edge("u", "v").unwrap();
        b.add_edge("v", "u").unwrap();
        b.add_vertex("w");
        let g = b.build();
        assert_eq!(g.nedges(), 1);
        assert_eq!(g.degree(g.vertex("w").unwrap()), 0);
    }

    #[test]
    fn self_loops_rejected() {
        let mut b = GraphBuilder::default();
        assert!(matches!(
            b.add_edge("s", "s"),
            Err(SpectrumError::SelfLoop(ref label)) if label == "s"
        ));
    }
}
