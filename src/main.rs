use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use geostat::{
    Bound, OutlierFences, PointSet, check_points,
    config::Config,
    generate::{GenerationMethod, generate_points},
    io::{self, DistanceReport},
    pairwise_haversine,
    stats::Accumulator,
};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Great-circle distances between two point sets
    Distance {
        /// Points file (.csv with name,lat,lon or City:DMS lines)
        #[arg(long)]
        from: PathBuf,

        /// Second points file; defaults to the first
        #[arg(long)]
        to: Option<PathBuf>,

        /// Report file (.json or .msgpack)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Outlier bounds of a CSV column
    Outliers {
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        column: String,

        #[arg(long, value_enum, default_value_t = BoundArg::Both)]
        bound: BoundArg,
    },

    /// Moving-average smoothing of a CSV column
    Smooth {
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        column: String,

        /// Window length; defaults to the configured one
        #[arg(long)]
        window: Option<usize>,

        #[arg(long)]
        output: PathBuf,
    },

    /// Pixel coordinates in the configured image frame
    Pixel {
        #[arg(long, allow_negative_numbers = true, requires = "lon", conflicts_with = "points")]
        lat: Option<f64>,

        #[arg(long, allow_negative_numbers = true, requires = "lat")]
        lon: Option<f64>,

        #[arg(long)]
        points: Option<PathBuf>,
    },

    /// Random point sets
    Generate {
        method: GenerationMethod,

        seed: u64,

        number: usize,

        #[arg(long)]
        output: PathBuf,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum BoundArg {
    Upper,
    Lower,
    Both,
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let cfg = match &args.config {
        Some(file) => Config::from_file(file).context("failed to construct cfg")?,
        None => Config::default(),
    };
    log::info!("{cfg:#?}");

    match args.command {
        Command::Distance { from, to, output } => {
            run_distance(&cfg, from, to, output).context("failed to compute distances")?
        }
        Command::Outliers {
            input,
            column,
            bound,
        } => run_outliers(input, &column, bound).context("failed to compute outlier bounds")?,
        Command::Smooth {
            input,
            column,
            window,
            output,
        } => {
            let window = window.unwrap_or(cfg.smoothing.window);
            run_smooth(input, &column, window, output).context("failed to smooth series")?
        }
        Command::Pixel { lat, lon, points } => {
            run_pixel(&cfg, lat.zip(lon), points).context("failed to map pixels")?
        }
        Command::Generate {
            method,
            seed,
            number,
            output,
        } => {
            let points =
                generate_points(method, seed, number).context("failed to generate points")?;
            io::write_points(output, &points)?;
        }
    }

    Ok(())
}

fn load_points(cfg: &Config, file: PathBuf) -> Result<PointSet> {
    let points = io::read_points(&file)?;
    if let Err(error) = check_points(&points.coords()) {
        if cfg.points.strict {
            return Err(error).with_context(|| format!("invalid point in {file:?}"));
        }
        log::warn!("{file:?}: {error}");
    }
    Ok(points)
}

fn run_distance(
    cfg: &Config,
    from: PathBuf,
    to: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let points_a = load_points(cfg, from)?;
    let self_distance = to.is_none();
    let points_b = match to {
        Some(to) => load_points(cfg, to)?,
        None => points_a.clone(),
    };

    let km = pairwise_haversine(&points_a.coords(), &points_b.coords())?;

    let mut acc = Accumulator::new();
    let mut closest: Option<(usize, usize, f64)> = None;
    for ((i, j), &d) in km.indexed_iter() {
        // Each unordered pair once, without the zero diagonal.
        if self_distance && j <= i {
            continue;
        }
        acc.add(d);
        if closest.is_none_or(|(_, _, d_min)| d < d_min) {
            closest = Some((i, j, d));
        }
    }
    log::info!("{:#?}", acc.report());
    if let Some((i, j, d)) = closest {
        log::info!(
            "closest pair: {} - {} ({d:.3} km)",
            points_a.names()[i],
            points_b.names()[j]
        );
    }

    let name_width = points_a.names().iter().map(String::len).max().unwrap_or(0);
    print!("{:name_width$}", "");
    for name in points_b.names() {
        print!(" {name:>12}");
    }
    println!();
    for (name, row) in points_a.names().iter().zip(km.rows()) {
        print!("{name:name_width$}");
        for d in row {
            print!(" {d:>12.3}");
        }
        println!();
    }

    if let Some(output) = output {
        let report = DistanceReport {
            rows: points_a.names().to_vec(),
            cols: points_b.names().to_vec(),
            km,
        };
        io::save_report(output, &report)?;
    }

    Ok(())
}

fn run_outliers(input: PathBuf, column: &str, bound: BoundArg) -> Result<()> {
    let series = io::read_series(input, column)?;
    let fences = OutlierFences::from_values(&series.values)?;
    log::info!("{fences:#?}");

    let bounds: &[Bound] = match bound {
        BoundArg::Upper => &[Bound::Upper],
        BoundArg::Lower => &[Bound::Lower],
        BoundArg::Both => &[Bound::Lower, Bound::Upper],
    };
    for &bound in bounds {
        println!("{}: {}", format!("{bound:?}").to_lowercase(), fences.bound(bound));
    }

    for (label, &val) in series.index.iter().zip(&series.values) {
        let outside = bounds.iter().any(|&bound| match bound {
            Bound::Upper => val > fences.upper,
            Bound::Lower => val < fences.lower,
        });
        if outside {
            println!("{label},{val}");
        }
    }

    Ok(())
}

fn run_smooth(input: PathBuf, column: &str, window: usize, output: PathBuf) -> Result<()> {
    let series = io::read_series(input, column)?;
    let smoothed = series
        .smoothed(window)
        .with_context(|| format!("failed to smooth with window {window}"))?;
    io::write_series(&output, &smoothed, column)?;
    log::info!("wrote {} values to {output:?}", smoothed.len());
    Ok(())
}

fn run_pixel(cfg: &Config, lat_lon: Option<(f64, f64)>, points: Option<PathBuf>) -> Result<()> {
    let points = match (lat_lon, points) {
        (Some((lat, lon)), None) => {
            PointSet::new(vec!["point".into()], ndarray::array![[lat, lon]])?
        }
        (None, Some(file)) => load_points(cfg, file)?,
        _ => bail!("either --lat/--lon or --points must be given"),
    };

    for (name, [lat, lon]) in points.iter() {
        if !cfg.frame.contains(lon, lat) {
            log::warn!("{name} lies outside the image frame");
        }
        let (x, y) = cfg.frame.to_pixel(lon, lat, cfg.image);
        println!("{name},{x:.2},{y:.2}");
    }

    Ok(())
}
