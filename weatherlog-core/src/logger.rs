//! The logging run: one snapshot request per catalog city, one appended row
//! per success.
//!
//! A failing city never aborts the run; its row is simply absent and a
//! diagnostic is emitted. There are no retries. The summary reports partial
//! failure but the run itself still completes normally, matching the
//! behavior the published dataset was collected under.

use anyhow::Result;
use log::{info, warn};
use std::io::Write;

use crate::{
    catalog::CityRecord,
    dataset::DatasetWriter,
    model::Observation,
    provider::WeatherProvider,
};

/// Outcome of one logging run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub logged: usize,
    pub failed: usize,
}

/// Fetch and append one row per city, in catalog order.
pub async fn run<W: Write>(
    provider: &dyn WeatherProvider,
    cities: &[CityRecord],
    out: &mut DatasetWriter<W>,
) -> Result<RunSummary> {
    let mut summary = RunSummary {
        logged: 0,
        failed: 0,
    };

    for city in cities {
        match provider.current_by_coords(city.lat, city.lon).await {
            Ok(conditions) => match Observation::from_conditions(city, &conditions) {
                Some(row) => {
                    out.append(&row)?;
                    summary.logged += 1;
                }
                None => {
                    warn!(
                        "Failed to log data for {}: unrepresentable observation time",
                        city.name
                    );
                    summary.failed += 1;
                }
            },
            Err(e) => {
                warn!("Failed to log data for {}: {e:#}", city.name);
                summary.failed += 1;
            }
        }
    }

    out.flush()?;
    info!(
        "Logged data for {} of {} cities ({} failed)",
        summary.logged,
        cities.len(),
        summary.failed
    );

    Ok(summary)
}
