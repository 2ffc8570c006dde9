//! Parsing of degree/minute/second coordinates.
//!
//! Coordinates are written the way Wikipedia shows them, for example
//! `47°36′35″N 122°19′59″W`, and named lists use one `City:coordinates` entry
//! per line.

use crate::error::{GeoError, Result};
use ndarray::{Array2, ArrayView2};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static DMS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,3})°(\d{1,3})′(\d{1,3})″([NSEW])").expect("DMS pattern is valid")
});

/// Convert a single `D°M′S″H` token to signed decimal degrees.
///
/// Only the start of the token has to match; anything after the hemisphere
/// letter is ignored.
pub fn parse_dms_angle(token: &str) -> Result<f64> {
    let caps = DMS_RE
        .captures(token)
        .ok_or_else(|| GeoError::Parse(format!("{token:?} is not a D°M′S″H coordinate")))?;

    let mut angle = 0.0;
    for (i_grp, div) in [(1, 1.0), (2, 60.0), (3, 3600.0)] {
        let num: u32 = caps[i_grp]
            .parse()
            .map_err(|_| GeoError::Parse(format!("invalid number in {token:?}")))?;
        angle += num as f64 / div;
    }

    let sign = match &caps[4] {
        "S" | "W" => -1.0,
        _ => 1.0,
    };
    Ok(angle * sign)
}

/// Convert every whitespace-separated DMS token of `s` to decimal degrees.
pub fn parse_dms(s: &str) -> Result<Vec<f64>> {
    s.split_whitespace().map(parse_dms_angle).collect()
}

/// Parse a `latitude longitude` DMS pair into `[lat, lon]`.
pub fn parse_dms_point(s: &str) -> Result<[f64; 2]> {
    match parse_dms(s)?.as_slice() {
        &[lat, lon] => Ok([lat, lon]),
        vals => Err(GeoError::Parse(format!(
            "{s:?} must contain 2 coordinates, but contains {}",
            vals.len()
        ))),
    }
}

/// Split `City:coordinates` lines into `(name, coordinates)` entries.
///
/// Entry order follows the text. A repeated name overwrites the coordinates
/// of its first occurrence. Blank lines are skipped.
pub fn parse_city_lines(text: &str) -> Result<Vec<(String, String)>> {
    let mut entries: Vec<(String, String)> = Vec::new();
    for (i_line, line) in text.trim().lines().enumerate() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split(':').collect();
        let &[name, coords] = parts.as_slice() else {
            return Err(GeoError::Parse(format!(
                "line {i_line} must have the form name:coordinates, but is {line:?}"
            )));
        };
        match entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = coords.to_string(),
            None => entries.push((name.to_string(), coords.to_string())),
        }
    }
    Ok(entries)
}

/// Ordered set of named points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointSet {
    names: Vec<String>,
    coords: Array2<f64>,
}

impl PointSet {
    /// Create a point set from names and a `(k, 2)` coordinate array.
    pub fn new(names: Vec<String>, coords: Array2<f64>) -> Result<Self> {
        if coords.ncols() != 2 {
            return Err(GeoError::Shape(format!(
                "coordinates must have 2 columns, but have {}",
                coords.ncols()
            )));
        }
        if names.len() != coords.nrows() {
            return Err(GeoError::Shape(format!(
                "{} names given for {} points",
                names.len(),
                coords.nrows()
            )));
        }
        Ok(Self { names, coords })
    }

    /// Parse `City:coordinates` text into a point set.
    pub fn from_city_text(text: &str) -> Result<Self> {
        let entries = parse_city_lines(text)?;
        let mut names = Vec::with_capacity(entries.len());
        let mut flat = Vec::with_capacity(2 * entries.len());
        for (name, coords) in entries {
            let [lat, lon] = parse_dms_point(&coords)
                .map_err(|err| GeoError::Parse(format!("city {name:?}: {err}")))?;
            names.push(name);
            flat.extend([lat, lon]);
        }
        let coords = Array2::from_shape_vec((names.len(), 2), flat)?;
        Self::new(names, coords)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn coords(&self) -> ArrayView2<'_, f64> {
        self.coords.view()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate over `(name, [lat, lon])`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, [f64; 2])> + '_ {
        self.names
            .iter()
            .zip(self.coords.outer_iter())
            .map(|(name, row)| (name.as_str(), [row[0], row[1]]))
    }
}
