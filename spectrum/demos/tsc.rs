//! Runs a spectrum coloring heuristic on a seeded random graph, first for
//! TSC with a fixed palette, then for CSC with a fixed threshold.

use std::time::Instant;

use rand::Rng;
use rand_pcg::Lcg64Xsh32;
use serde_json::json;
use structopt::StructOpt;

use spectrum::{
    CscSearch, Graph, GraphBuilder, Heuristic, InterferenceSummary, Params, Problem, Refinement,
    Spectrum, WeightModel,
};

#[derive(Debug, StructOpt)]
#[structopt(name = "tsc", about = "Spectrum coloring of a random graph.")]
struct Opt {
    /// Number of vertices of the random graph.
    #[structopt(long, default_value = "100")]
    nvertices: usize,

    /// Probability that any given pair of vertices is adjacent.
    #[structopt(long, default_value = "0.1")]
    density: f64,

    /// Spectrum size.
    #[structopt(long, default_value = "11")]
    ncolors: usize,

    /// Palette size for TSC.
    #[structopt(long, default_value = "4")]
    k: usize,

    /// Interference threshold for CSC.
    #[structopt(long, default_value = "1.0")]
    threshold: f64,

    /// One of saturation, bfs, degree-bfs, vertex-merge, swo, grasp.
    #[structopt(long, default_value = "saturation")]
    heuristic: Heuristic,

    /// Interference model, inv-pow2 or empiric.
    #[structopt(long, default_value = "inv-pow2")]
    weights: WeightModel,

    /// Refinement after each construction: none, resample, tabu or cascade.
    #[structopt(long, default_value = "none")]
    refine: Refinement,

    /// CSC search: binary, linear or incremental.
    #[structopt(long, default_value = "binary")]
    csc_search: CscSearch,

    #[structopt(long, default_value = "1234")]
    seed: u64,

    /// Print one record per construction, refinement and CSC attempt.
    #[structopt(long)]
    verbose: bool,
}

fn random_graph(nvertices: usize, density: f64, seed: u64) -> Graph {
    let mut rng = Lcg64Xsh32::new(0xcafef00dd15ea5e5, seed);
    let labels: Vec<String> = (0..nvertices).map(|v| format!("v{}", v)).collect();
    let mut builder = GraphBuilder::default();
    for (i, a) in labels.iter().enumerate() {
        builder.add_vertex(a);
        for b in &labels[i + 1..] {
            if rng.gen_bool(density) {
                builder.add_edge(a, b).expect("distinct labels");
            }
        }
    }
    builder.build()
}

fn main() -> spectrum::Result<()> {
    let opt = Opt::from_args();

    let graph = random_graph(opt.nvertices, opt.density, opt.seed);
    println!(
        "{}",
        json!({
            "nvertices": graph.nvertices(),
            "nedges": graph.nedges(),
            "max_degree": graph.max_degree(),
            "min_degree": graph.min_degree(),
        })
    );

    let spectrum = Spectrum::new(opt.ncolors);
    let weights = opt.weights.matrix(&spectrum)?;
    let problem = Problem::new(&graph, &spectrum, &weights)?;
    let params = Params {
        seed: opt.seed,
        refinement: opt.refine,
        csc_search: opt.csc_search,
        verbose: opt.verbose,
        ..Params::default()
    };
    let mut solver = opt.heuristic.solver(problem, params);

    let tsc_start = Instant::now();
    let tsc = solver.threshold_spectrum_coloring(opt.k)?;
    println!(
        "{}",
        json!({
            "heuristic": opt.heuristic.name(),
            "k": opt.k,
            "threshold": tsc.threshold,
            "upper_bound": problem.tsc_upper_bound(opt.k)?,
            "wstable": problem.is_wstable(&tsc.coloring, opt.k),
            "interference": InterferenceSummary::of(&problem, &tsc.coloring).to_map(),
            "tsc_duration": format!("{:.0?}", Instant::now().duration_since(tsc_start)),
        })
    );

    let csc_start = Instant::now();
    let csc = solver.chromatic_spectrum_coloring(opt.threshold)?;
    println!(
        "{}",
        json!({
            "heuristic": opt.heuristic.name(),
            "target": opt.threshold,
            "k": csc.k,
            "feasible": csc.is_feasible(),
            "upper_bound": problem.csc_upper_bound(opt.threshold)?,
            "palette_size": csc.coloring.palette_size(),
            "csc_duration": format!("{:.0?}", Instant::now().duration_since(csc_start)),
        })
    );
    Ok(())
}
