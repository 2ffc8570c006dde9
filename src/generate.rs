use crate::coords::PointSet;
use crate::error::{GeoError, Result};
use clap::ValueEnum;
use ndarray::Array2;
use rand::prelude::*;
use rand_chacha::ChaCha12Rng;
use rand_distr::{Normal, Uniform};

/// Random sampling method for point sets.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum GenerationMethod {
    /// Uniform over the whole latitude/longitude rectangle.
    Uniform,
    /// Normally distributed around one random center.
    Cluster,
}

fn distr_err<E: std::fmt::Display>(err: E) -> GeoError {
    GeoError::InvalidInput(format!("invalid sampling distribution: {err}"))
}

/// Generate `number` points with a deterministic generator seeded by `seed`.
pub fn generate_points(method: GenerationMethod, seed: u64, number: usize) -> Result<PointSet> {
    let mut rng = ChaCha12Rng::seed_from_u64(seed);

    let mut flat = Vec::with_capacity(2 * number);
    match method {
        GenerationMethod::Uniform => {
            let lat_dist = Uniform::new(-90.0, 90.0).map_err(distr_err)?;
            let lon_dist = Uniform::new(-180.0, 180.0).map_err(distr_err)?;
            for _ in 0..number {
                flat.push(lat_dist.sample(&mut rng));
                flat.push(lon_dist.sample(&mut rng));
            }
        }
        GenerationMethod::Cluster => {
            let lat_c = rng.random_range(-60.0..60.0);
            let lon_c = rng.random_range(-180.0..180.0);
            let spread = rng.random_range(1.0..10.0);
            let lat_dist = Normal::new(lat_c, spread).map_err(distr_err)?;
            let lon_dist = Normal::new(lon_c, spread).map_err(distr_err)?;
            for _ in 0..number {
                let lat: f64 = lat_dist.sample(&mut rng);
                let lon: f64 = lon_dist.sample(&mut rng);
                flat.push(lat.clamp(-90.0, 90.0));
                flat.push((lon + 180.0).rem_euclid(360.0) - 180.0);
            }
        }
    }
    log::debug!("generated {number} points ({method:?}, seed {seed})");

    let names = (0..number).map(|i_pnt| format!("p{i_pnt:04}")).collect();
    let coords = Array2::from_shape_vec((number, 2), flat)?;
    PointSet::new(names, coords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haversine::check_points;

    #[test]
    fn same_seed_same_points() {
        for method in [GenerationMethod::Uniform, GenerationMethod::Cluster] {
            let a = generate_points(method, 42, 50).unwrap();
            let b = generate_points(method, 42, 50).unwrap();
            let c = generate_points(method, 43, 50).unwrap();
            assert_eq!(a, b);
            assert_ne!(a, c);
        }
    }

    #[test]
    fn points_are_valid_coordinates() {
        for method in [GenerationMethod::Uniform, GenerationMethod::Cluster] {
            let set = generate_points(method, 7, 500).unwrap();
            assert_eq!(set.len(), 500);
            assert_eq!(set.names()[12], "p0012");
            check_points(&set.coords()).unwrap();
        }
    }

    #[test]
    fn cluster_longitudes_wrap_into_range() {
        for seed in 0..50 {
            let set = generate_points(GenerationMethod::Cluster, seed, 200).unwrap();
            for (name, [lat, lon]) in set.iter() {
                assert!((-90.0..=90.0).contains(&lat), "{name}: lat = {lat}");
                assert!((-180.0..180.0).contains(&lon), "{name}: lon = {lon}");
            }
        }
    }

    #[test]
    fn zero_points() {
        let set = generate_points(GenerationMethod::Uniform, 0, 0).unwrap();
        assert!(set.is_empty());
    }
}
