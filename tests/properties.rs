use geostat::{
    GeoError,
    generate::{GenerationMethod, generate_points},
    pairwise_haversine,
};
use ndarray::{Array1, array};

const TOL: f64 = 1e-9;

#[test]
fn transpose_symmetry() {
    let a = generate_points(GenerationMethod::Uniform, 1, 40).expect("failed to generate a");
    let b = generate_points(GenerationMethod::Cluster, 2, 25).expect("failed to generate b");

    let ab = pairwise_haversine(&a.coords(), &b.coords()).expect("failed to compute ab");
    let ba = pairwise_haversine(&b.coords(), &a.coords()).expect("failed to compute ba");

    assert_eq!(ab.dim(), (40, 25));
    assert_eq!(ba.dim(), (25, 40));
    for ((i, j), &d) in ab.indexed_iter() {
        assert!((d - ba[[j, i]]).abs() < TOL, "d[{i},{j}] = {d}, d[{j},{i}] = {}", ba[[j, i]]);
    }
}

#[test]
fn zero_diagonal_and_non_negative() {
    let a = generate_points(GenerationMethod::Uniform, 3, 60).expect("failed to generate a");
    let aa = pairwise_haversine(&a.coords(), &a.coords()).expect("failed to compute aa");
    for ((i, j), &d) in aa.indexed_iter() {
        assert!(d >= 0.0);
        if i == j {
            assert!(d.abs() < TOL, "d[{i},{i}] = {d}");
        }
    }
}

#[test]
fn triangle_inequality() {
    let a = generate_points(GenerationMethod::Uniform, 4, 30).expect("failed to generate a");
    let d = pairwise_haversine(&a.coords(), &a.coords()).expect("failed to compute d");
    let n = a.len();
    for i in 0..n {
        for j in 0..n {
            for k in 0..n {
                assert!(
                    d[[i, k]] <= d[[i, j]] + d[[j, k]] + 1e-6,
                    "triangle ({i}, {j}, {k}) violated"
                );
            }
        }
    }
}

#[test]
fn maximum_is_half_circumference() {
    let a = generate_points(GenerationMethod::Uniform, 5, 50).expect("failed to generate a");
    let d = pairwise_haversine(&a.coords(), &a.coords()).expect("failed to compute d");
    let half = std::f64::consts::PI * geostat::EARTH_RADIUS_KM;
    assert!(d.iter().all(|&d| d <= half + 1e-6));
}

#[test]
fn flat_input_fails_before_computing() {
    let flat = Array1::from(vec![0.0, 0.0, 1.0, 1.0]);
    let good = array![[0.0, 0.0]];
    let err = pairwise_haversine(&flat, &good).expect_err("flat input accepted");
    assert!(matches!(err, GeoError::Shape(_)));
    assert!(err.to_string().contains("points_a"));

    let err = pairwise_haversine(&good, &flat.view()).expect_err("flat input accepted");
    assert!(err.to_string().contains("points_b"));
}
