//! Line-delimited JSON records and summary statistics of colorings.

use std::collections::HashMap;
use std::time::Duration;

use ordered_float::NotNan;
use serde_json::Value;

use crate::coloring::Coloring;
use crate::problem::Problem;

const NSTAT_PERCENTILES: usize = 7;
const STAT_PERCENTILES: [f64; NSTAT_PERCENTILES] = [0.0, 0.10, 0.50, 0.90, 0.95, 0.99, 1.0];

/// Mean and percentiles of the per-vertex interference of a coloring.
#[derive(Clone, Debug)]
pub struct InterferenceSummary {
    pub mean: f64,
    percentiles: [f64; NSTAT_PERCENTILES],
}

impl InterferenceSummary {
    pub fn of(problem: &Problem<'_>, coloring: &Coloring) -> Self {
        Self::from(
            problem
                .graph()
                .vertices()
                .map(|v| problem.vertex_interference(v, coloring)),
        )
    }

    /// Interference values are sums of finite weights, hence never NaN.
    pub fn from(it: impl Iterator<Item = f64>) -> Self {
        let mut v: Vec<NotNan<f64>> = it.filter_map(|f| NotNan::new(f).ok()).collect();
        v.sort_unstable();
        let mut stats = InterferenceSummary {
            mean: 0.0,
            percentiles: Default::default(),
        };
        if v.is_empty() {
            return stats;
        }
        stats.mean = v.iter().map(|f| f.into_inner()).sum::<f64>() / v.len() as f64;
        STAT_PERCENTILES
            .iter()
            .copied()
            .map(|f| v[((v.len() - 1) as f64 * f) as usize].into_inner())
            .zip(stats.percentiles.iter_mut())
            .for_each(|(val, p)| *p = val);
        stats
    }

    /// The largest value, i.e. the threshold.
    pub fn max(&self) -> f64 {
        self.percentiles[NSTAT_PERCENTILES - 1]
    }

    pub fn to_map(&self) -> HashMap<String, f64> {
        let mut map: HashMap<_, _> = STAT_PERCENTILES
            .iter()
            .map(|f| format!("p{:.2}", f))
            .zip(self.percentiles.iter().copied())
            .collect();
        map.insert("mean".to_string(), self.mean);
        map
    }
}

pub(crate) fn duration(d: Duration) -> String {
    format!("{:.0?}", d)
}

/// Prints `record` as a single JSON line when `verbose` is set.
pub(crate) fn emit(verbose: bool, record: Value) {
    if verbose {
        println!("{}", record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn summary_percentiles() {
        let stats = InterferenceSummary::from((0..11).map(|i| i as f64));
        assert_relative_eq!(stats.mean, 5.0);
        assert_relative_eq!(stats.max(), 10.0);
        let map = stats.to_map();
        assert_relative_eq!(map["p0.50"], 5.0);
        assert_relative_eq!(map["p0.00"], 0.0);
        assert_relative_eq!(map["mean"], 5.0);
    }

    #[test]
    fn empty_summary() {
        let stats = InterferenceSummary::from(std::iter::empty());
        assert_relative_eq!(stats.mean, 0.0);
        assert_relative_eq!(stats.max(), 0.0);
    }
}
