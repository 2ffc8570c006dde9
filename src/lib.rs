//! Helpers for exploratory analysis of geographic data.
//!
//! The centerpiece is [`pairwise_haversine`], which computes the dense matrix
//! of great-circle distances between two point sets. The remaining modules
//! are independent utilities: DMS coordinate parsing, outlier bounds,
//! moving-average smoothing, coordinate-to-pixel mapping and random point
//! generation.

pub mod config;
pub mod coords;
pub mod error;
pub mod generate;
pub mod haversine;
pub mod io;
pub mod pixel;
pub mod smooth;
pub mod stats;

pub use coords::{PointSet, parse_city_lines, parse_dms, parse_dms_angle, parse_dms_point};
pub use error::GeoError;
pub use haversine::{EARTH_RADIUS_KM, check_points, haversine, pairwise_haversine, points_from_rows};
pub use pixel::{Frame, ImageSize};
pub use smooth::{Series, smooth_signal};
pub use stats::{Bound, OutlierFences, outlier_bound, quantile};
