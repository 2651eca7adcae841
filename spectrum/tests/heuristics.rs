mod common;

use approx::assert_relative_eq;

use common::*;
use spectrum::improve::{cascade, resample, tabu_walk};
use spectrum::{
    Coloring, Graph, Heuristic, InterferenceTracker, NeighborUpdate, Params, Problem, Refinement,
    Spectrum, SpectrumError,
};

fn check_total(graph: &Graph, spectrum: &Spectrum, k: usize, params: &Params) {
    let weights = inv_pow2_weights(spectrum);
    let problem = Problem::new(graph, spectrum, &weights).unwrap();
    for &h in Heuristic::ALL.iter() {
        let mut solver = h.solver(problem, params.clone());
        let sol = solver.threshold_spectrum_coloring(k).unwrap();
        assert!(sol.coloring.is_complete(), "{} left vertices uncolored", h);
        assert!(sol.coloring.as_slice().iter().all(|&c| (c as usize) < k));
        assert_relative_eq!(
            sol.threshold,
            brute_force_threshold(graph, &weights, &sol.coloring),
            max_relative = 1e-9
        );
        if params.update == NeighborUpdate::All {
            assert!(solver.tracker().is_consistent(graph, &weights, &sol.coloring));
        }
    }
}

#[test]
fn every_heuristic_colors_connected_graphs() {
    let spectrum = Spectrum::new(11);
    for seed in 0..4 {
        let graph = random_graph(40, 0.2, seed);
        for &k in [1, 3, 11].iter() {
            check_total(&graph, &spectrum, k, &Params { seed, ..Params::default() });
        }
    }
}

#[test]
fn every_heuristic_colors_disconnected_graphs() {
    let spectrum = Spectrum::new(6);
    for seed in 0..4 {
        let graph = disconnected_graph(seed);
        for &k in [2, 6].iter() {
            check_total(&graph, &spectrum, k, &Params { seed, ..Params::default() });
        }
    }
}

#[test]
fn uncolored_update_colors_everything() {
    let spectrum = Spectrum::new(5);
    let graph = random_graph(30, 0.3, 9);
    let params = Params {
        update: NeighborUpdate::Uncolored,
        ..Params::default()
    };
    check_total(&graph, &spectrum, 3, &params);
}

#[test]
fn tracker_matches_neighborhood_sums() {
    let spectrum = Spectrum::new(7);
    let weights = inv_pow2_weights(&spectrum);
    let graph = random_graph(25, 0.3, 2);
    let problem = Problem::new(&graph, &spectrum, &weights).unwrap();
    let mut solver = Heuristic::Saturation.solver(problem, Params::default());
    let sol = solver.threshold_spectrum_coloring(4).unwrap();
    let tracker = solver.tracker();
    for v in graph.vertices() {
        for c in spectrum.colors() {
            assert_relative_eq!(
                tracker.interference(v, c),
                problem.potential_interference(v, c, &sol.coloring),
                epsilon = 1e-12
            );
        }
        assert_eq!(tracker.saturation(v) as usize, graph.degree(v));
    }
}

#[test]
fn paw_with_saturation() {
    let graph = paw();
    let spectrum = Spectrum::new(4);
    let weights = inv_pow2_weights(&spectrum);
    let problem = Problem::new(&graph, &spectrum, &weights).unwrap();
    for seed in 0..8 {
        let mut solver = Heuristic::Saturation.solver(problem, Params { seed, ..Params::default() });
        let sol = solver.threshold_spectrum_coloring(3).unwrap();
        let labeled = sol.coloring.labeled(&graph, &spectrum);
        assert_eq!(labeled.len(), 4);
        assert!(labeled
            .values()
            .all(|c| matches!(*c, Some("1") | Some("2") | Some("3"))));
        // c has the highest degree, so it goes first and takes the first color
        assert_eq!(labeled["c"], Some("1"));
        assert!(sol.threshold <= 1.0 + 1e-12);
    }
}

#[test]
fn isolated_vertex() {
    let graph = Graph::from_adjacency(vec![("x", Vec::<&str>::new())]).unwrap();
    let spectrum = Spectrum::new(1);
    let weights = inv_pow2_weights(&spectrum);
    let problem = Problem::new(&graph, &spectrum, &weights).unwrap();
    for &h in Heuristic::ALL.iter() {
        let sol = h
            .solver(problem, Params::default())
            .threshold_spectrum_coloring(1)
            .unwrap();
        assert_eq!(sol.threshold, 0.0);
        assert_eq!(sol.coloring.labeled(&graph, &spectrum)["x"], Some("1"));
    }
}

#[test]
fn complete_graph_with_identity_weights() {
    let graph = complete_graph(4);
    let spectrum = Spectrum::new(6);
    let weights = identity_weights(&spectrum);
    let problem = Problem::new(&graph, &spectrum, &weights).unwrap();
    for &h in Heuristic::ALL.iter() {
        for &k in [4, 6].iter() {
            let sol = h
                .solver(problem, Params::default())
                .threshold_spectrum_coloring(k)
                .unwrap();
            assert_eq!(sol.threshold, 0.0, "{} at k = {}", h, k);
            let mut colors = sol.coloring.as_slice().to_vec();
            colors.sort_unstable();
            colors.dedup();
            assert_eq!(colors.len(), 4);
        }
    }
}

#[test]
fn larger_palettes_help_on_average() {
    let spectrum = Spectrum::new(11);
    let weights = inv_pow2_weights(&spectrum);
    for &h in Heuristic::ALL.iter() {
        let (mut narrow, mut wide) = (0.0, 0.0);
        for seed in 0..10 {
            let graph = random_graph(30, 0.25, 100 + seed);
            let problem = Problem::new(&graph, &spectrum, &weights).unwrap();
            let params = Params { seed, ..Params::default() };
            narrow += h
                .solver(problem, params.clone())
                .threshold_spectrum_coloring(2)
                .unwrap()
                .threshold;
            wide += h
                .solver(problem, params)
                .threshold_spectrum_coloring(10)
                .unwrap()
                .threshold;
        }
        assert!(narrow >= wide, "{}: {} < {}", h, narrow, wide);
    }
}

#[test]
fn refinement_never_regresses() {
    let spectrum = Spectrum::new(8);
    let weights = inv_pow2_weights(&spectrum);
    for seed in 0..3 {
        let graph = random_graph(35, 0.25, 200 + seed);
        let problem = Problem::new(&graph, &spectrum, &weights).unwrap();
        for &h in Heuristic::ALL.iter() {
            for &update in [NeighborUpdate::All, NeighborUpdate::Uncolored].iter() {
                let plain = Params {
                    seed,
                    update,
                    ..Params::default()
                };
                let before = h
                    .solver(problem, plain.clone())
                    .threshold_spectrum_coloring(3)
                    .unwrap()
                    .threshold;
                let refinements = [Refinement::Resample, Refinement::Tabu, Refinement::Cascade];
                for &refinement in refinements.iter() {
                    let params = Params {
                        refinement,
                        ..plain.clone()
                    };
                    let mut solver = h.solver(problem, params);
                    let sol = solver.threshold_spectrum_coloring(3).unwrap();
                    assert!(sol.threshold <= before, "{} {:?}", h, refinement);
                    assert!(solver.tracker().is_consistent(&graph, &weights, &sol.coloring));
                }
            }
        }
    }
}

#[test]
fn improvement_of_arbitrary_colorings() {
    let spectrum = Spectrum::new(5);
    let weights = inv_pow2_weights(&spectrum);
    let graph = random_graph(30, 0.3, 77);
    let problem = Problem::new(&graph, &spectrum, &weights).unwrap();
    let start = Coloring::from_colors(graph.vertices().map(|v| v % 5).collect());
    let before = problem.threshold(&start);
    let params = Params::default();
    let mut tracker = InterferenceTracker::default();

    let mut coloring = start.clone();
    let after = resample(problem, &mut tracker, &mut coloring, 5, &params, &mut rng(1)).unwrap();
    assert!(after <= before);
    assert_relative_eq!(after, problem.threshold(&coloring));

    let mut coloring = start.clone();
    let after = tabu_walk(problem, &mut tracker, &mut coloring, 5, &params).unwrap();
    assert!(after <= before);
    assert_relative_eq!(after, problem.threshold(&coloring));
    assert!(tracker.is_consistent(&graph, &weights, &coloring));

    let mut coloring = start;
    let after = cascade(problem, &mut tracker, &mut coloring, 5, &params).unwrap();
    assert!(after <= before);
    assert_relative_eq!(after, problem.threshold(&coloring));
    assert!(tracker.is_consistent(&graph, &weights, &coloring));
}

#[test]
fn argument_errors() {
    let graph = paw();
    let spectrum = Spectrum::new(4);
    let weights = inv_pow2_weights(&spectrum);
    let problem = Problem::new(&graph, &spectrum, &weights).unwrap();
    for &h in Heuristic::ALL.iter() {
        let mut solver = h.solver(problem, Params::default());
        assert_eq!(
            solver.threshold_spectrum_coloring(0).unwrap_err(),
            SpectrumError::PaletteSize { k: 0, available: 4 }
        );
        assert_eq!(
            solver.threshold_spectrum_coloring(5).unwrap_err(),
            SpectrumError::PaletteSize { k: 5, available: 4 }
        );
    }

    let empty = Graph::from_adjacency(Vec::<(&str, Vec<&str>)>::new()).unwrap();
    assert_eq!(
        Problem::new(&empty, &spectrum, &weights).unwrap_err(),
        SpectrumError::EmptyGraph
    );
    let other = Spectrum::new(3);
    assert!(matches!(
        Problem::new(&graph, &other, &weights),
        Err(SpectrumError::MatrixShape { .. })
    ));
    assert_eq!(
        Graph::from_adjacency(vec![("a", vec!["a"])]).unwrap_err(),
        SpectrumError::SelfLoop("a".to_string())
    );

    let mut tracker = InterferenceTracker::default();
    let mut foreign = Coloring::from_colors(vec![0, 1]);
    assert_eq!(
        tabu_walk(problem, &mut tracker, &mut foreign, 3, &Params::default()).unwrap_err(),
        SpectrumError::ColoringShape {
            len: 2,
            nvertices: 4
        }
    );
}
