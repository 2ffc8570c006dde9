use geostat::io::load_report;
use std::{env, fs, path::PathBuf, process::Command};

fn run_bin(args: &[&str]) -> String {
    let bin = PathBuf::from(env!("CARGO_BIN_EXE_geostat"));

    let output = Command::new(bin)
        .args(args)
        .output()
        .expect("failed to execute command");

    let stdout_str =
        std::str::from_utf8(&output.stdout).expect("failed to convert stdout to string");
    let stderr_str =
        std::str::from_utf8(&output.stderr).expect("failed to convert stderr to string");

    assert!(
        output.status.success(),
        "failed to run binary with {args:?}\nstdout:\n{stdout_str}\nstderr:\n{stderr_str}\n"
    );

    stdout_str.to_string()
}

fn run_bin_failing(args: &[&str]) {
    let bin = PathBuf::from(env!("CARGO_BIN_EXE_geostat"));
    let output = Command::new(bin)
        .args(args)
        .output()
        .expect("failed to execute command");
    assert!(!output.status.success(), "binary unexpectedly succeeded with {args:?}");
}

fn test_dir(name: &str) -> PathBuf {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    fs::remove_dir_all(&test_dir).ok();
    fs::create_dir(&test_dir).expect("failed to create test directory");
    test_dir
}

fn path_str(path: &PathBuf) -> &str {
    path.to_str().expect("failed to convert path to string")
}

#[test]
fn distance_workflow() {
    let test_dir = test_dir("distance_workflow");

    let cities_path = test_dir.join("cities.txt");
    let cities_contents = String::new()
        + "Seattle:47°36′35″N 122°19′59″W\n"
        + "Portland:45°31′12″N 122°40′55″W\n"
        + "Spokane:47°39′32″N 117°25′30″W\n";
    fs::write(&cities_path, cities_contents).expect("failed to write cities file");

    let generated_path = test_dir.join("generated.csv");
    run_bin(&[
        "generate",
        "cluster",
        "11",
        "25",
        "--output",
        path_str(&generated_path),
    ]);

    let json_path = test_dir.join("report.json");
    let stdout = run_bin(&[
        "distance",
        "--from",
        path_str(&cities_path),
        "--output",
        path_str(&json_path),
    ]);
    assert!(stdout.contains("Spokane"));

    let report = load_report(&json_path).expect("failed to load json report");
    assert_eq!(report.rows, ["Seattle", "Portland", "Spokane"]);
    assert_eq!(report.km.dim(), (3, 3));
    assert!(report.km[[0, 0]].abs() < 1e-9);
    assert!((report.km[[0, 1]] - report.km[[1, 0]]).abs() < 1e-9);

    let msgpack_path = test_dir.join("report.msgpack");
    run_bin(&[
        "distance",
        "--from",
        path_str(&cities_path),
        "--to",
        path_str(&generated_path),
        "--output",
        path_str(&msgpack_path),
    ]);

    let report = load_report(&msgpack_path).expect("failed to load msgpack report");
    assert_eq!(report.km.dim(), (3, 25));
    assert_eq!(report.cols[0], "p0000");

    run_bin_failing(&[
        "distance",
        "--from",
        path_str(&cities_path),
        "--output",
        path_str(&test_dir.join("report.txt")),
    ]);

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn strict_config_rejects_bad_points() {
    let test_dir = test_dir("strict_config");

    let points_path = test_dir.join("points.csv");
    fs::write(&points_path, "name,lat,lon\nok,10.0,10.0\nbad,95.0,0.0\n")
        .expect("failed to write points file");

    run_bin(&["distance", "--from", path_str(&points_path)]);

    let config_path = test_dir.join("config.toml");
    fs::write(&config_path, "[points]\nstrict = true\n").expect("failed to write config file");
    run_bin_failing(&[
        "--config",
        path_str(&config_path),
        "distance",
        "--from",
        path_str(&points_path),
    ]);

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn series_workflow() {
    let test_dir = test_dir("series_workflow");

    let series_path = test_dir.join("series.csv");
    let series_contents = String::new()
        + "day,count\n"
        + "d0,10\n"
        + "d1,12\n"
        + "d2,11\n"
        + "d3,13\n"
        + "d4,12\n"
        + "d5,95\n"
        + "d6,11\n";
    fs::write(&series_path, series_contents).expect("failed to write series file");

    let stdout = run_bin(&[
        "outliers",
        "--input",
        path_str(&series_path),
        "--column",
        "count",
        "--bound",
        "upper",
    ]);
    assert!(stdout.contains("d5,95"));
    assert!(!stdout.contains("d1,"));

    let config_path = test_dir.join("config.toml");
    fs::write(&config_path, "[smoothing]\nwindow = 3\n").expect("failed to write config file");

    let smoothed_path = test_dir.join("smoothed.csv");
    run_bin(&[
        "--config",
        path_str(&config_path),
        "smooth",
        "--input",
        path_str(&series_path),
        "--column",
        "count",
        "--output",
        path_str(&smoothed_path),
    ]);

    let smoothed = fs::read_to_string(&smoothed_path).expect("failed to read smoothed file");
    let lines: Vec<_> = smoothed.lines().collect();
    assert_eq!(lines.len(), 8);
    assert_eq!(lines[0], "index,count");
    assert_eq!(lines[2], "d1,11");

    run_bin_failing(&[
        "smooth",
        "--input",
        path_str(&series_path),
        "--column",
        "count",
        "--window",
        "8",
        "--output",
        path_str(&smoothed_path),
    ]);

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn pixel_mapping() {
    let stdout = run_bin(&["pixel", "--lat", "47.87", "--lon", "-122.65"]);
    assert_eq!(stdout.trim(), "point,0.00,0.00");

    let stdout = run_bin(&["pixel", "--lat", "47.025", "--lon", "-120.95"]);
    assert_eq!(stdout.trim(), "point,1000.00,800.00");

    run_bin_failing(&["pixel"]);
}
