//! The append-only CSV dataset.
//!
//! The logger appends one row per (city, run); the trend views load the whole
//! file read-only, either from a local path or from the published URL. The
//! canonical header is
//! `timestamp,local_time,city,country,continent,temp,humidity,description`;
//! an older variant without `country` is still readable and loads with an
//! empty country.

use anyhow::{Context, Result};
use log::warn;
use serde::Deserialize;
use std::{
    fs::OpenOptions,
    io::{Read, Write},
    path::Path,
};
use thiserror::Error;

use crate::model::Observation;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset has no header row")]
    MissingHeader,
    #[error("unrecognized dataset header: {0}")]
    UnrecognizedHeader(String),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Appends observation rows, writing the canonical header exactly once per
/// file lifetime.
pub struct DatasetWriter<W: Write> {
    inner: csv::Writer<W>,
}

impl DatasetWriter<std::fs::File> {
    /// Open `path` for appending, creating it (and the header) if absent.
    pub fn append_to_path(path: &Path) -> Result<Self> {
        let is_new = !path.exists() || path.metadata().map(|m| m.len() == 0).unwrap_or(true);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open dataset file: {}", path.display()))?;

        Ok(Self::from_writer(file, is_new))
    }
}

impl<W: Write> DatasetWriter<W> {
    /// Wrap any writer; `write_header` must be true only for a fresh dataset.
    pub fn from_writer(writer: W, write_header: bool) -> Self {
        let inner = csv::WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(writer);

        Self { inner }
    }

    pub fn append(&mut self, row: &Observation) -> Result<(), DatasetError> {
        self.inner.serialize(row)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), DatasetError> {
        self.inner.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W, DatasetError> {
        self.inner
            .into_inner()
            .map_err(|e| DatasetError::Io(e.into_error()))
    }
}

/// Older logger variant: same columns minus `country`.
#[derive(Debug, Deserialize)]
struct LegacyRow {
    timestamp: i64,
    local_time: String,
    city: String,
    continent: String,
    temp: f64,
    humidity: u8,
    description: String,
}

impl From<LegacyRow> for Observation {
    fn from(row: LegacyRow) -> Self {
        Observation {
            timestamp: row.timestamp,
            local_time: row.local_time,
            city: row.city,
            country: String::new(),
            continent: row.continent,
            temp: row.temp,
            humidity: row.humidity,
            description: row.description,
        }
    }
}

/// Read every row from a dataset reader, in insertion order.
///
/// Rows that fail to parse are skipped with a diagnostic; a malformed row
/// never fails the whole load. An empty input yields an empty vec.
pub fn read_observations<R: Read>(reader: R) -> Result<Vec<Observation>, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if headers.is_empty() {
        return Err(DatasetError::MissingHeader);
    }

    let has_country = headers.iter().any(|h| h == "country");
    if !headers.iter().any(|h| h == "timestamp") {
        return Err(DatasetError::UnrecognizedHeader(
            headers.iter().collect::<Vec<_>>().join(","),
        ));
    }

    let mut rows = Vec::new();

    if has_country {
        for (i, record) in csv_reader.deserialize::<Observation>().enumerate() {
            match record {
                Ok(row) => rows.push(row),
                Err(e) => warn!("skipping malformed dataset row {}: {e}", i + 2),
            }
        }
    } else {
        for (i, record) in csv_reader.deserialize::<LegacyRow>().enumerate() {
            match record {
                Ok(row) => rows.push(row.into()),
                Err(e) => warn!("skipping malformed dataset row {}: {e}", i + 2),
            }
        }
    }

    Ok(rows)
}

/// Load the dataset from a local path or an `http(s)` URL.
pub async fn load(source: &str, http: &reqwest::Client) -> Result<Vec<Observation>> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let res = http
            .get(source)
            .send()
            .await
            .with_context(|| format!("Failed to fetch dataset from {source}"))?;

        let status = res.status();
        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "Dataset request to {source} failed with status {status}"
            ));
        }

        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read dataset body from {source}"))?;

        read_observations(body.as_bytes())
            .with_context(|| format!("Failed to parse dataset from {source}"))
    } else {
        let file = std::fs::File::open(source)
            .with_context(|| format!("Failed to open dataset file: {source}"))?;

        read_observations(file).with_context(|| format!("Failed to parse dataset file: {source}"))
    }
}
