//! Great-circle distances on a spherical Earth.
//!
//! Points are `[latitude, longitude]` pairs in degrees, stored as the rows of
//! a two-column array.

use crate::error::{GeoError, Result};
use ndarray::{Array2, ArrayBase, ArrayView2, Data, Dimension, Ix2};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

fn hav(theta: f64) -> f64 {
    (theta / 2.0).sin().powi(2)
}

/// Central angle between two points given in radians.
///
/// Uses `atan2` rather than `asin` for accuracy at small and near-antipodal
/// distances. Rounding can push `h` slightly above 1 for near-antipodal
/// points, so it is clamped to `[0, 1]` before the square roots; NaN inputs
/// still propagate.
fn central_angle(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> f64 {
    let h = hav(lat_a - lat_b) + lat_a.cos() * lat_b.cos() * hav(lon_a - lon_b);
    let h = h.clamp(0.0, 1.0);
    2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Distance in kilometers between two `[lat, lon]` points in degrees.
pub fn haversine(p: [f64; 2], q: [f64; 2]) -> f64 {
    let [lat_p, lon_p] = p.map(f64::to_radians);
    let [lat_q, lon_q] = q.map(f64::to_radians);
    EARTH_RADIUS_KM * central_angle(lat_p, lon_p, lat_q, lon_q)
}

fn as_points<'a, S, D>(points: &'a ArrayBase<S, D>, name: &str) -> Result<ArrayView2<'a, f64>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let ndim = points.ndim();
    if ndim != 2 {
        return Err(GeoError::Shape(format!(
            "{name} must be 2-dimensional, but has {ndim} dimension(s)"
        )));
    }
    let points = points.view().into_dimensionality::<Ix2>()?;
    let n_cols = points.ncols();
    if n_cols != 2 {
        return Err(GeoError::Shape(format!(
            "{name} must have 2 columns (lat, lon), but has {n_cols}"
        )));
    }
    Ok(points)
}

/// Pairwise great-circle distances in kilometers.
///
/// Returns an `(m, n)` matrix where `m` is the number of rows of `points_a`
/// and `n` the number of rows of `points_b`: entry `(i, j)` is the distance
/// between point `i` of `points_a` and point `j` of `points_b`.
///
/// Both inputs must be 2-dimensional with exactly two columns, otherwise
/// [`GeoError::Shape`] is returned before anything is computed. Coordinate
/// values are not range-checked; see [`check_points`].
pub fn pairwise_haversine<S1, D1, S2, D2>(
    points_a: &ArrayBase<S1, D1>,
    points_b: &ArrayBase<S2, D2>,
) -> Result<Array2<f64>>
where
    S1: Data<Elem = f64>,
    D1: Dimension,
    S2: Data<Elem = f64>,
    D2: Dimension,
{
    let points_a = as_points(points_a, "points_a")?;
    let points_b = as_points(points_b, "points_b")?;

    let rad_a = points_a.mapv(f64::to_radians);
    let rad_b = points_b.mapv(f64::to_radians);

    // Rows follow points_b and columns points_a; transposed on return.
    let mut dist = Array2::<f64>::zeros((rad_b.nrows(), rad_a.nrows()));
    for (j, b) in rad_b.outer_iter().enumerate() {
        for (i, a) in rad_a.outer_iter().enumerate() {
            dist[[j, i]] = EARTH_RADIUS_KM * central_angle(a[0], a[1], b[0], b[1]);
        }
    }
    log::debug!(
        "computed {}x{} distance matrix",
        points_a.nrows(),
        points_b.nrows()
    );

    Ok(dist.reversed_axes())
}

/// Build a point array from rows, rejecting ragged or non-pair rows.
pub fn points_from_rows(rows: &[Vec<f64>]) -> Result<Array2<f64>> {
    if let Some((i_row, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != 2) {
        return Err(GeoError::Shape(format!(
            "row {i_row} must have 2 values (lat, lon), but has {}",
            row.len()
        )));
    }
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Ok(Array2::from_shape_vec((rows.len(), 2), flat)?)
}

/// Check that every point is finite and inside the valid angular ranges.
///
/// [`pairwise_haversine`] never calls this; it is opt-in for callers that
/// prefer an error over NaN or wrapped-around results.
pub fn check_points<S, D>(points: &ArrayBase<S, D>) -> Result<()>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let points = as_points(points, "points")?;
    for (row, point) in points.outer_iter().enumerate() {
        let (lat, lon) = (point[0], point[1]);
        if !lat.is_finite() || !lon.is_finite() {
            return Err(GeoError::NumericDomain {
                row,
                reason: format!("non-finite coordinate ({lat}, {lon})"),
            });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(GeoError::NumericDomain {
                row,
                reason: format!("latitude must be in [-90, 90], but is {lat}"),
            });
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(GeoError::NumericDomain {
                row,
                reason: format!("longitude must be in [-180, 180], but is {lon}"),
            });
        }
    }
    Ok(())
}
