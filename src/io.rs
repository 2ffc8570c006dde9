//! File formats used by the command-line tool.
//!
//! Point sets are read from CSV (`name,lat,lon`) or from `City:coordinates`
//! text, series from CSV with the index in the first column, and distance
//! reports are written as JSON or MessagePack depending on the extension.

use crate::coords::PointSet;
use crate::smooth::Series;
use anyhow::{Context, Result, bail};
use ndarray::Array2;
use rmp_serde::{decode, encode};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

#[derive(Debug, Serialize, Deserialize)]
struct PointRecord {
    name: String,
    lat: f64,
    lon: f64,
}

fn extension(file: &Path) -> Option<String> {
    file.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Read a point set, choosing the format from the file extension.
pub fn read_points<P: AsRef<Path>>(file: P) -> Result<PointSet> {
    let file = file.as_ref();
    let points = match extension(file).as_deref() {
        Some("csv") => {
            let reader = File::open(file).with_context(|| format!("failed to open {file:?}"))?;
            read_points_csv(BufReader::new(reader))?
        }
        _ => {
            let text =
                fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;
            PointSet::from_city_text(&text).context("failed to parse city coordinates")?
        }
    };
    log::info!("read {} points from {file:?}", points.len());
    Ok(points)
}

pub fn read_points_csv<R: Read>(reader: R) -> Result<PointSet> {
    let mut rdr = csv::Reader::from_reader(reader);

    let mut names = Vec::new();
    let mut flat = Vec::new();
    for (i_rec, result) in rdr.deserialize().enumerate() {
        let record: PointRecord = result.with_context(|| format!("invalid record {i_rec}"))?;
        names.push(record.name);
        flat.extend([record.lat, record.lon]);
    }

    let coords = Array2::from_shape_vec((names.len(), 2), flat)?;
    Ok(PointSet::new(names, coords)?)
}

pub fn write_points_csv<W: Write>(writer: W, points: &PointSet) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for (name, [lat, lon]) in points.iter() {
        wtr.serialize(PointRecord {
            name: name.to_string(),
            lat,
            lon,
        })
        .context("failed to write point")?;
    }
    wtr.flush().context("failed to flush writer stream")?;
    Ok(())
}

pub fn write_points<P: AsRef<Path>>(file: P, points: &PointSet) -> Result<()> {
    let file = file.as_ref();
    let writer = File::create(file).with_context(|| format!("failed to create {file:?}"))?;
    write_points_csv(BufWriter::new(writer), points)?;
    log::info!("wrote {} points to {file:?}", points.len());
    Ok(())
}

/// Read `column` of a CSV file as a series indexed by the first column.
pub fn read_series_csv<R: Read>(reader: R, column: &str) -> Result<Series> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers().context("failed to read header")?.clone();
    let i_col = headers
        .iter()
        .position(|header| header == column)
        .with_context(|| format!("column {column:?} not found in {headers:?}"))?;

    let mut index = Vec::new();
    let mut values = Vec::new();
    for (i_rec, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("invalid record {i_rec}"))?;
        let label = record.get(0).context("record has no index")?;
        let field = record
            .get(i_col)
            .with_context(|| format!("record {i_rec} has no column {i_col}"))?;
        let value: f64 = field
            .trim()
            .parse()
            .with_context(|| format!("record {i_rec}: {field:?} is not a number"))?;
        index.push(label.to_string());
        values.push(value);
    }

    Ok(Series::new(index, values)?)
}

pub fn read_series<P: AsRef<Path>>(file: P, column: &str) -> Result<Series> {
    let file = file.as_ref();
    let reader = File::open(file).with_context(|| format!("failed to open {file:?}"))?;
    read_series_csv(BufReader::new(reader), column)
        .with_context(|| format!("failed to read series from {file:?}"))
}

pub fn write_series_csv<W: Write>(writer: W, series: &Series, column: &str) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["index", column])
        .context("failed to write header")?;
    for (label, value) in series.index.iter().zip(&series.values) {
        wtr.write_record([label.as_str(), value.to_string().as_str()])
            .context("failed to write record")?;
    }
    wtr.flush().context("failed to flush writer stream")?;
    Ok(())
}

pub fn write_series<P: AsRef<Path>>(file: P, series: &Series, column: &str) -> Result<()> {
    let file = file.as_ref();
    let writer = File::create(file).with_context(|| format!("failed to create {file:?}"))?;
    write_series_csv(BufWriter::new(writer), series, column)
}

/// Distance matrix with the names of its rows and columns.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct DistanceReport {
    pub rows: Vec<String>,
    pub cols: Vec<String>,
    pub km: Array2<f64>,
}

/// Save a report as JSON (`.json`) or MessagePack (`.msgpack`).
pub fn save_report<P: AsRef<Path>>(file: P, report: &DistanceReport) -> Result<()> {
    let file = file.as_ref();
    let format = extension(file);
    let writer = match format.as_deref() {
        Some("json" | "msgpack") => {
            File::create(file).with_context(|| format!("failed to create {file:?}"))?
        }
        _ => bail!("unsupported report format {file:?}, expected .json or .msgpack"),
    };
    let mut writer = BufWriter::new(writer);

    if format.as_deref() == Some("json") {
        serde_json::to_writer_pretty(&mut writer, report).context("failed to serialize report")?;
    } else {
        encode::write(&mut writer, report).context("failed to serialize report")?;
    }
    writer.flush().context("failed to flush writer stream")?;

    log::info!("saved report to {file:?}");
    Ok(())
}

pub fn load_report<P: AsRef<Path>>(file: P) -> Result<DistanceReport> {
    let file = file.as_ref();
    let reader = File::open(file).with_context(|| format!("failed to open {file:?}"))?;
    let mut reader = BufReader::new(reader);

    let report = match extension(file).as_deref() {
        Some("json") => serde_json::from_reader(reader).context("failed to deserialize report")?,
        Some("msgpack") => {
            decode::from_read(&mut reader).context("failed to deserialize report")?
        }
        _ => bail!("unsupported report format {file:?}, expected .json or .msgpack"),
    };
    Ok(report)
}
