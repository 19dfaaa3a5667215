// Price history domain models and normalization
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Year every plotted date is moved into, so series from different years
/// share one day-of-year x-axis. Year 0 is a leap year, so Feb 29 survives.
pub const NORMALIZED_YEAR: i32 = 0;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, PartialEq)]
pub enum PriceError {
    #[error("invalid date key in price history: {0}")]
    InvalidDate(String),
}

/// Date -> closing price entries, in the order the source document lists them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSeries {
    entries: Vec<(String, f64)>,
}

impl RawSeries {
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'de> Deserialize<'de> for RawSeries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RawSeries;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of ISO dates to prices")
            }

            fn visit_map<A>(self, mut map: A) -> Result<RawSeries, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((date, price)) = map.next_entry::<String, f64>()? {
                    entries.push((date, price));
                }
                Ok(RawSeries { entries })
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlotPoint {
    /// Millis since epoch of the date moved into `NORMALIZED_YEAR`
    pub x: f64,
    /// Percent change from the first price of the series
    pub y: f64,
    pub price: f64,
}

pub type PlotSeries = Vec<PlotPoint>;

/// Map raw prices to plot points relative to the series' first price.
///
/// An empty series yields an empty result. A zero or missing first price
/// falls back to a baseline of 1, which keeps the output finite but makes the
/// percentages meaningless.
pub fn normalize(raw: &RawSeries) -> Result<PlotSeries, PriceError> {
    let start_price = match raw.entries.first() {
        Some((_, price)) if *price != 0.0 => *price,
        _ => 1.0,
    };

    raw.entries
        .iter()
        .map(|(date, price)| {
            Ok(PlotPoint {
                x: normalized_timestamp(date)?,
                y: (price - start_price) / start_price * 100.0,
                price: *price,
            })
        })
        .collect()
}

fn normalized_timestamp(key: &str) -> Result<f64, PriceError> {
    let date = NaiveDate::parse_from_str(key, DATE_FORMAT)
        .ok()
        .and_then(|d| d.with_year(NORMALIZED_YEAR))
        .ok_or_else(|| PriceError::InvalidDate(key.to_string()))?;

    Ok(date.and_time(NaiveTime::MIN).and_utc().timestamp_millis() as f64)
}

/// Convert a normalized x back into a calendar date in `year`.
/// Feb 29 rolls over to Mar 1 when `year` has no leap day.
pub fn restore_year(x: f64, year: i32) -> Option<NaiveDate> {
    let date = DateTime::from_timestamp_millis(x as i64)?.date_naive();
    date.with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
}

/// `YYYY-MM-DD` for a normalized x with `year` re-applied
pub fn format_tooltip_date(x: f64, year: i32) -> String {
    restore_year(x, year)
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}
