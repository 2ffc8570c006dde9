use crate::error::{GeoError, Result};
use serde::{Deserialize, Serialize};

/// Running mean and standard deviation (Welford's algorithm).
pub struct Accumulator {
    n_vals: usize,
    mean: f64,
    diff_2_sum: f64,
    min: f64,
    max: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccumulatorReport {
    pub n_vals: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl Accumulator {
    pub fn new() -> Self {
        Self {
            n_vals: 0,
            mean: 0.0,
            diff_2_sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    pub fn add(&mut self, val: f64) {
        self.n_vals += 1;

        let diff_a = val - self.mean;
        self.mean += diff_a / self.n_vals as f64;

        let diff_b = val - self.mean;
        self.diff_2_sum += diff_a * diff_b;

        self.min = self.min.min(val);
        self.max = self.max.max(val);
    }

    pub fn report(&self) -> AccumulatorReport {
        AccumulatorReport {
            n_vals: self.n_vals,
            mean: if self.n_vals > 0 { self.mean } else { f64::NAN },
            std_dev: if self.n_vals > 1 {
                (self.diff_2_sum / (self.n_vals as f64 - 1.0)).sqrt()
            } else {
                f64::NAN
            },
            min: self.min,
            max: self.max,
        }
    }
}

impl Default for Accumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Extend<f64> for Accumulator {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        iter.into_iter().for_each(|val| self.add(val));
    }
}

/// Quantile `q` of `values` by linear interpolation between closest ranks.
pub fn quantile(values: &[f64], q: f64) -> Result<f64> {
    if values.is_empty() {
        return Err(GeoError::InvalidInput("cannot take quantile of no values".into()));
    }
    if !(0.0..=1.0).contains(&q) {
        return Err(GeoError::InvalidInput(format!(
            "quantile must be in [0, 1], but is {q}"
        )));
    }
    let sorted = sorted_finite(values)?;
    Ok(sorted_quantile(&sorted, q))
}

fn sorted_finite(values: &[f64]) -> Result<Vec<f64>> {
    if let Some((i_val, val)) = values.iter().enumerate().find(|(_, val)| !val.is_finite()) {
        return Err(GeoError::InvalidInput(format!(
            "value {i_val} must be finite, but is {val}"
        )));
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(sorted)
}

fn sorted_quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let i_lo = pos.floor() as usize;
    let i_hi = (i_lo + 1).min(sorted.len() - 1);
    let frac = pos - i_lo as f64;
    sorted[i_lo] + (sorted[i_hi] - sorted[i_lo]) * frac
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Upper,
    Lower,
}

/// Tukey fences: values beyond 1.5 interquartile ranges from the quartiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierFences {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
}

impl OutlierFences {
    const IQR_FACTOR: f64 = 1.5;

    pub fn from_values(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(GeoError::InvalidInput("cannot bound no values".into()));
        }
        let sorted = sorted_finite(values)?;
        let q1 = sorted_quantile(&sorted, 0.25);
        let q3 = sorted_quantile(&sorted, 0.75);
        let r = (q3 - q1) * Self::IQR_FACTOR;
        Ok(Self {
            q1,
            q3,
            lower: q1 - r,
            upper: q3 + r,
        })
    }

    pub fn bound(&self, bound: Bound) -> f64 {
        match bound {
            Bound::Upper => self.upper,
            Bound::Lower => self.lower,
        }
    }

    pub fn is_outlier(&self, val: f64) -> bool {
        val < self.lower || val > self.upper
    }
}

/// Upper or lower outlier threshold of `values`.
pub fn outlier_bound(values: &[f64], bound: Bound) -> Result<f64> {
    Ok(OutlierFences::from_values(values)?.bound(bound))
}
