use crate::error::{GeoError, Result};
use serde::{Deserialize, Serialize};

/// Centered moving average over a window of `n` samples.
///
/// Equivalent to correlating `values` with a uniform kernel of length `n` in
/// `same` mode: the output has the input's length, the window for sample `k`
/// covers `k - n/2 ..= k + (n - 1) - n/2`, and samples past either end count
/// as zero.
pub fn smooth_signal(values: &[f64], n: usize) -> Result<Vec<f64>> {
    if n == 0 {
        return Err(GeoError::InvalidInput("window must be at least 1".into()));
    }
    if n > values.len() {
        return Err(GeoError::InvalidInput(format!(
            "window must not exceed the signal length {}, but is {n}",
            values.len()
        )));
    }

    let n_left = n / 2;
    let smoothed = (0..values.len())
        .map(|k| {
            let start = k.saturating_sub(n_left);
            let end = (k + n - n_left).min(values.len());
            values[start..end].iter().sum::<f64>() / n as f64
        })
        .collect();
    Ok(smoothed)
}

/// Values with an attached index of labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub index: Vec<String>,
    pub values: Vec<f64>,
}

impl Series {
    pub fn new(index: Vec<String>, values: Vec<f64>) -> Result<Self> {
        if index.len() != values.len() {
            return Err(GeoError::Shape(format!(
                "index has {} labels for {} values",
                index.len(),
                values.len()
            )));
        }
        Ok(Self { index, values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Smoothed copy of the series; the index is kept as is.
    pub fn smoothed(&self, n: usize) -> Result<Self> {
        Ok(Self {
            index: self.index.clone(),
            values: smooth_signal(&self.values, n)?,
        })
    }
}
