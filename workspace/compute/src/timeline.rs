use chrono::{DateTime, Utc};
use common::{ForecastPayload, RESERVED_KEYS, SeriesPoint, TimePoint};
use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tracing::{debug, instrument, trace, warn};

use crate::error::{ChartError, Result};

/// Historical and predicted points of the single tracked series.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSeries {
    /// Name of the tracked series, resolved once from the payload.
    pub series_key: String,
    /// Historical observations, oldest first.
    pub past: Vec<TimePoint>,
    /// Predicted observations, oldest first.
    pub future: Vec<TimePoint>,
}

impl ForecastSeries {
    pub fn new(series_key: impl Into<String>, past: Vec<TimePoint>, future: Vec<TimePoint>) -> Self {
        Self {
            series_key: series_key.into(),
            past,
            future,
        }
    }

    /// Resolves the series key and converts the wire points of a payload.
    #[instrument(skip(payload), fields(past = payload.past_data.len(), future = payload.future_data.len()))]
    pub fn from_payload(payload: &ForecastPayload) -> Result<Self> {
        let series_key = resolve_series_key(payload)?;
        debug!("Resolved series key '{}'", series_key);

        let past = convert_points(&payload.past_data, &series_key, 0)?;
        let future = convert_points(&payload.future_data, &series_key, payload.past_data.len())?;

        Ok(Self {
            series_key,
            past,
            future,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.past.is_empty() && self.future.is_empty()
    }

    /// Content hash of the series, used to skip re-deriving unchanged input.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.series_key.hash(&mut hasher);
        for (tag, points) in [(0u8, &self.past), (1u8, &self.future)] {
            tag.hash(&mut hasher);
            points.len().hash(&mut hasher);
            for point in points {
                point.timestamp.hash(&mut hasher);
                point.value.to_bits().hash(&mut hasher);
                point.confidence.map(f64::to_bits).hash(&mut hasher);
            }
        }
        hasher.finish()
    }
}

/// Picks the explicit series key, or discovers it from the first timeline entry.
pub fn resolve_series_key(payload: &ForecastPayload) -> Result<String> {
    if let Some(key) = &payload.series_key {
        if RESERVED_KEYS.contains(&key.as_str()) {
            return Err(ChartError::ReservedSeriesKey(key.clone()));
        }
        return Ok(key.clone());
    }

    let Some(first) = payload.past_data.first().or(payload.future_data.first()) else {
        debug!("Payload is empty, no series key to discover");
        return Ok(String::new());
    };

    first
        .series_keys()
        .next()
        .map(str::to_string)
        .ok_or_else(|| ChartError::SeriesKeyNotFound {
            timestamp: first.timestamp.to_rfc3339(),
        })
}

fn convert_points(points: &[SeriesPoint], series_key: &str, offset: usize) -> Result<Vec<TimePoint>> {
    let mut extra_keys_reported = false;
    points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            if !extra_keys_reported {
                let extra: Vec<&str> = point
                    .series_keys()
                    .chain(point.ignored_keys())
                    .filter(|key| *key != series_key)
                    .collect();
                if !extra.is_empty() {
                    warn!(
                        "Point {} carries keys besides '{}' ({}); only one series is charted",
                        offset + i,
                        series_key,
                        extra.join(", ")
                    );
                    extra_keys_reported = true;
                }
            }
            point
                .to_time_point(series_key)
                .ok_or_else(|| ChartError::MissingSeriesValue {
                    index: offset + i,
                    key: series_key.to_string(),
                })
        })
        .collect()
}

/// A timeline point with its display envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub upper_bound: Option<f64>,
    pub lower_bound: Option<f64>,
}

impl From<&TimePoint> for MergedPoint {
    fn from(point: &TimePoint) -> Self {
        Self {
            timestamp: point.timestamp,
            value: point.value,
            confidence: point.confidence,
            upper_bound: None,
            lower_bound: None,
        }
    }
}

/// Historical points followed by predicted points, split at the breakpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    series_key: String,
    points: Vec<MergedPoint>,
    /// Index of the last historical point, `-1` without history.
    breakpoint: isize,
}

impl Timeline {
    pub fn empty() -> Self {
        Self {
            series_key: String::new(),
            points: Vec::new(),
            breakpoint: -1,
        }
    }

    pub fn series_key(&self) -> &str {
        &self.series_key
    }

    pub fn points(&self) -> &[MergedPoint] {
        &self.points
    }

    pub(crate) fn points_mut(&mut self) -> &mut [MergedPoint] {
        &mut self.points
    }

    pub fn get(&self, index: usize) -> Option<&MergedPoint> {
        self.points.get(index)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn breakpoint(&self) -> isize {
        self.breakpoint
    }

    /// Index of the forecast origin ("Today"), absent without history.
    pub fn today_index(&self) -> Option<usize> {
        usize::try_from(self.breakpoint)
            .ok()
            .filter(|index| *index < self.points.len())
    }

    /// True for points after the forecast origin.
    pub fn is_predicted(&self, index: usize) -> bool {
        index < self.points.len() && index as isize > self.breakpoint
    }
}

/// Concatenates historical and predicted sequences into one timeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimelineMerger;

impl TimelineMerger {
    #[instrument(skip(past, future), fields(past = past.len(), future = future.len()))]
    pub fn merge(series_key: &str, past: &[TimePoint], future: &[TimePoint]) -> Timeline {
        let breakpoint = past.len() as isize - 1;
        let points: Vec<MergedPoint> = past.iter().chain(future).map(MergedPoint::from).collect();
        trace!("Merged {} points with breakpoint {}", points.len(), breakpoint);

        Timeline {
            series_key: series_key.to_string(),
            points,
            breakpoint,
        }
    }

    pub fn merge_series(series: &ForecastSeries) -> Timeline {
        Self::merge(&series.series_key, &series.past, &series.future)
    }
}
