use crate::data::bar::Bar;
use chrono::{NaiveDate, NaiveTime};
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to open CSV file {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("Failed to parse CSV record at line {line}: {source}")]
    Record {
        line: usize,
        #[source]
        source: csv::Error,
    },
    #[error("Failed to parse date '{value}' at line {line}")]
    InvalidDate { line: usize, value: String },
    #[error("Failed to parse time '{value}' at line {line}")]
    InvalidTime { line: usize, value: String },
}

//one row of a sierrachart text export
#[derive(Debug, Deserialize)]
struct SierraRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Time")]
    time: String,
    #[serde(rename = "Open")]
    open: f64,
    #[serde(rename = "High")]
    high: f64,
    #[serde(rename = "Low")]
    low: f64,
    #[serde(rename = "Last")]
    last: f64,
    #[serde(rename = "Volume", default)]
    volume: f64,
    #[serde(rename = "# of Trades", default)]
    num_trades: u64,
}

//loads bars from a sierrachart csv export
pub fn load_sierra_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Bar>, LoadError> {
    let path = path.as_ref();
    let reader = reader_builder()
        .from_path(path)
        .map_err(|source| LoadError::Open {
            path: path.display().to_string(),
            source,
        })?;

    let bars = read_records(reader)?;
    if bars.is_empty() {
        warn!(path = %path.display(), "no bars found in file");
    } else {
        debug!(path = %path.display(), bars = bars.len(), "loaded bars");
    }
    Ok(bars)
}

//reads bars from any sierrachart-formatted source
pub fn read_sierra_csv<R: Read>(source: R) -> Result<Vec<Bar>, LoadError> {
    read_records(reader_builder().from_reader(source))
}

fn reader_builder() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    //exports pad every field and header with spaces
    builder.has_headers(true).trim(Trim::All);
    builder
}

fn read_records<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<Bar>, LoadError> {
    let mut bars = Vec::new();

    for (index, result) in reader.deserialize().enumerate() {
        let line = index + 2;
        let record: SierraRecord = result.map_err(|source| LoadError::Record { line, source })?;

        bars.push(Bar {
            date: parse_date(&record.date, line)?,
            time: parse_time(&record.time, line)?,
            open: record.open,
            high: record.high,
            low: record.low,
            last: record.last,
            volume: record.volume,
            num_trades: record.num_trades,
        });
    }

    //stable sort keeps export order for identical timestamps
    bars.sort_by_key(|bar| bar.datetime());

    Ok(bars)
}

fn parse_date(value: &str, line: usize) -> Result<NaiveDate, LoadError> {
    NaiveDate::parse_from_str(value.trim(), "%Y/%m/%d").map_err(|_| LoadError::InvalidDate {
        line,
        value: value.to_string(),
    })
}

//fractional seconds are dropped
fn parse_time(value: &str, line: usize) -> Result<NaiveTime, LoadError> {
    let trimmed = value.trim();
    let whole = trimmed.split('.').next().unwrap_or(trimmed);
    NaiveTime::parse_from_str(whole, "%H:%M:%S").map_err(|_| LoadError::InvalidTime {
        line,
        value: value.to_string(),
    })
}
