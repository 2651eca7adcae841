#![allow(dead_code)]

use rand::Rng;
use rand_pcg::Lcg64Xsh32;

use spectrum::{inv_pow2, Coloring, Graph, GraphBuilder, InterferenceMatrix, Spectrum};

pub fn rng(seed: u64) -> Lcg64Xsh32 {
    Lcg64Xsh32::new(0xcafef00dd15ea5e5, seed)
}

fn add_random_edges<R: Rng>(
    builder: &mut GraphBuilder,
    prefix: &str,
    nvertices: usize,
    density: f64,
    rng: &mut R,
) {
    let labels: Vec<String> = (0..nvertices).map(|v| format!("{}{}", prefix, v)).collect();
    for (i, a) in labels.iter().enumerate() {
        builder.add_vertex(a);
        for b in &labels[i + 1..] {
            if rng.gen_bool(density) {
                builder.add_edge(a, b).unwrap();
            }
        }
    }
}

/// Erdős–Rényi graph on `v0..v{n-1}`.
pub fn random_graph(nvertices: usize, density: f64, seed: u64) -> Graph {
    let mut builder = GraphBuilder::default();
    add_random_edges(&mut builder, "v", nvertices, density, &mut rng(seed));
    builder.build()
}

/// Two dense random components plus a few isolated vertices.
pub fn disconnected_graph(seed: u64) -> Graph {
    let mut rng = rng(seed);
    let mut builder = GraphBuilder::default();
    add_random_edges(&mut builder, "a", 12, 0.5, &mut rng);
    add_random_edges(&mut builder, "b", 9, 0.6, &mut rng);
    for i in 0..3 {
        builder.add_vertex(&format!("iso{}", i));
    }
    builder.build()
}

pub fn complete_graph(n: usize) -> Graph {
    let mut builder = GraphBuilder::default();
    for i in 0..n {
        for j in i + 1..n {
            builder.add_edge(&i.to_string(), &j.to_string()).unwrap();
        }
    }
    builder.build()
}

/// The 4-vertex paw: triangle `a b c` with `d` hanging off `c`.
pub fn paw() -> Graph {
    Graph::from_adjacency(vec![
        ("a", vec!["b", "c"]),
        ("b", vec!["a", "c"]),
        ("c", vec!["a", "b", "d"]),
        ("d", vec!["c"]),
    ])
    .unwrap()
}

pub fn inv_pow2_weights(spectrum: &Spectrum) -> InterferenceMatrix {
    InterferenceMatrix::from_fn(spectrum, inv_pow2).unwrap()
}

pub fn identity_weights(spectrum: &Spectrum) -> InterferenceMatrix {
    InterferenceMatrix::from_fn(spectrum, |i, j| if i == j { 1.0 } else { 0.0 }).unwrap()
}

/// Threshold recomputed straight from the definition.
pub fn brute_force_threshold(graph: &Graph, weights: &InterferenceMatrix, coloring: &Coloring) -> f64 {
    graph
        .vertices()
        .map(|v| {
            let c = coloring.get(v).unwrap();
            graph
                .neighbors(v)
                .iter()
                .map(|&w| weights.weight(c, coloring.get(w).unwrap()))
                .sum::<f64>()
        })
        .fold(0.0, f64::max)
}
