//! Color spectra and the interference matrix between their colors.

use std::collections::HashMap;
use std::str::FromStr;

use itertools::iproduct;

use crate::error::{Result, SpectrumError};

pub type Color = u32;

/// An ordered palette of color labels. Heuristics restricted to `k` colors
/// use the first `k` entries.
#[derive(Clone, Debug)]
pub struct Spectrum {
    labels: Vec<String>,
    index: HashMap<String, Color>,
}

impl Spectrum {
    /// The spectrum `"1", "2", ..., "size"`.
    pub fn new(size: usize) -> Self {
        Self::from_labels((1..=size).map(|i| i.to_string()))
    }

    /// Duplicate labels keep their first position.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut spectrum = Self {
            labels: Vec::new(),
            index: HashMap::new(),
        };
        for label in labels {
            let label = label.into();
            if spectrum.index.contains_key(&label) {
                continue;
            }
            spectrum
                .index
                .insert(label.clone(), spectrum.labels.len() as Color);
            spectrum.labels.push(label);
        }
        spectrum
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn label(&self, c: Color) -> &str {
        &self.labels[c as usize]
    }

    pub fn color(&self, label: &str) -> Option<Color> {
        self.index.get(label).copied()
    }

    pub fn colors(&self) -> impl Iterator<Item = Color> {
        0..(self.len() as Color)
    }
}

/// Dense symmetric matrix `W` of non-negative interference between colors.
#[derive(Clone, Debug)]
pub struct InterferenceMatrix {
    ncolors: usize,
    weights: Vec<f64>,
}

impl InterferenceMatrix {
    /// Builds `W[i][j] = weight(i, j)` over spectrum positions.
    pub fn from_fn<F>(spectrum: &Spectrum, weight: F) -> Result<Self>
    where
        F: Fn(usize, usize) -> f64,
    {
        let n = spectrum.len();
        let weights = iproduct!(0..n, 0..n).map(|(i, j)| weight(i, j)).collect();
        Self::validated(n, weights)
    }

    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n = rows.len();
        if let Some(bad) = rows.iter().find(|row| row.len() != n) {
            return Err(SpectrumError::MatrixShape {
                rows: n,
                cols: bad.len(),
                ncolors: n,
            });
        }
        Self::validated(n, rows.into_iter().flatten().collect())
    }

    fn validated(ncolors: usize, weights: Vec<f64>) -> Result<Self> {
        let w = Self { ncolors, weights };
        for (i, j) in iproduct!(0..ncolors, 0..ncolors) {
            let value = w.weight(i as Color, j as Color);
            if !value.is_finite() || value < 0.0 {
                return Err(SpectrumError::NegativeWeight {
                    row: i,
                    col: j,
                    value,
                });
            }
            if value != w.weight(j as Color, i as Color) {
                return Err(SpectrumError::AsymmetricWeight { row: i, col: j });
            }
        }
        Ok(w)
    }

    pub fn ncolors(&self) -> usize {
        self.ncolors
    }

    #[inline]
    pub fn weight(&self, a: Color, b: Color) -> f64 {
        self.weights[a as usize * self.ncolors + b as usize]
    }

    /// Interference of color `a` against every color of the spectrum.
    #[inline]
    pub fn row(&self, a: Color) -> &[f64] {
        let lo = a as usize * self.ncolors;
        &self.weights[lo..lo + self.ncolors]
    }

    /// The natural (infinity) norm: the largest row sum.
    pub fn natural_norm(&self) -> f64 {
        (0..self.ncolors as Color)
            .map(|a| self.row(a).iter().sum::<f64>())
            .fold(0.0, f64::max)
    }

    /// Approximate greatest common divisor of all entries, treating
    /// remainders below `1e-4` as zero.
    pub fn weight_gcd(&self) -> f64 {
        self.weights.iter().copied().fold(0.0, float_gcd)
    }
}

fn float_gcd(x: f64, y: f64) -> f64 {
    let (mut x, mut y) = if x < y { (y, x) } else { (x, y) };
    while y.abs() >= 1e-4 {
        let r = x - (x / y).floor() * y;
        x = y;
        y = r;
    }
    x
}

/// `1 / 2^|i - j|`: interference halves with every step of separation.
pub fn inv_pow2(i: usize, j: usize) -> f64 {
    let d = if i > j { i - j } else { j - i };
    0.5f64.powi(d.min(i32::MAX as usize) as i32)
}

/// Empirically measured interference between channels `|i - j|` apart.
pub fn empiric_dist(i: usize, j: usize) -> f64 {
    let d = if i > j { i - j } else { j - i };
    match d {
        0 => 1.0,
        1 => 0.8,
        2 => 0.5,
        3 => 0.2,
        4 => 0.1,
        5 => 0.001,
        _ => 0.0,
    }
}

/// The built-in interference models, selectable by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeightModel {
    /// [`inv_pow2`]
    InvPow2,
    /// [`empiric_dist`]
    Empiric,
}

impl WeightModel {
    pub fn name(self) -> &'static str {
        match self {
            WeightModel::InvPow2 => "inv-pow2",
            WeightModel::Empiric => "empiric",
        }
    }

    pub fn matrix(self, spectrum: &Spectrum) -> Result<InterferenceMatrix> {
        match self {
            WeightModel::InvPow2 => InterferenceMatrix::from_fn(spectrum, inv_pow2),
            WeightModel::Empiric => InterferenceMatrix::from_fn(spectrum, empiric_dist),
        }
    }
}

impl FromStr for WeightModel {
    type Err = SpectrumError;

    fn from_str(s: &str) -> Result<Self> {
        [WeightModel::InvPow2, WeightModel::Empiric]
            .iter()
            .copied()
            .find(|m| m.name() == s)
            .ok_or_else(|| SpectrumError::UnknownWeightModel(s.to_string()))
    }
}
