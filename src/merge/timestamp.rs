use crate::config::ResolvedConfig;
use crate::constants::{DEFAULT_DATETIME_FORMATS, DEFAULT_DATE_FORMATS};
use crate::errors::{AppError, AppResult};
use crate::models::{Record, TimedRecord};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::str::FromStr;
use tracing::info;

/// Turns a human-readable date into seconds since the Unix epoch.
///
/// Implementations return `None` when the input is not recognised; the caller
/// decides how fatal that is.
pub trait DateParser: Send + Sync {
    fn parse(&self, input: &str) -> Option<f64>;
}

/// Zone assumed for date strings that carry no offset of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneChoice {
    Local,
    Utc,
    Fixed(FixedOffset),
}

impl ZoneChoice {
    fn localize(&self, naive: &NaiveDateTime) -> Option<f64> {
        match self {
            Self::Local => Local
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| epoch_seconds(&dt)),
            Self::Utc => Some(epoch_seconds(&Utc.from_utc_datetime(naive))),
            Self::Fixed(offset) => offset
                .from_local_datetime(naive)
                .single()
                .map(|dt| epoch_seconds(&dt)),
        }
    }
}

impl FromStr for ZoneChoice {
    type Err = AppError;

    /// Accepts `local`, `utc` (or `z`), or an offset like `+02:00`, `-0530`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "local" => return Ok(Self::Local),
            "utc" | "z" => return Ok(Self::Utc),
            _ => {}
        }
        parse_offset(trimmed)
            .map(Self::Fixed)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown timezone '{s}'")))
    }
}

fn parse_offset(s: &str) -> Option<FixedOffset> {
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn epoch_seconds<Tz: TimeZone>(dt: &DateTime<Tz>) -> f64 {
    dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_nanos()) / 1_000_000_000.0
}

/// Multi-format parser backed by chrono.
///
/// RFC 3339 and RFC 2822 are tried first since they carry their own offset, then the
/// configured naive layouts, then date-only layouts at midnight.
#[derive(Debug, Clone)]
pub struct FormatDateParser {
    formats: Vec<String>,
    zone: ZoneChoice,
}

impl FormatDateParser {
    pub fn new(formats: Vec<String>, zone: ZoneChoice) -> Self {
        Self { formats, zone }
    }

    pub fn from_config(config: &ResolvedConfig) -> AppResult<Self> {
        Ok(Self::new(config.date_formats.clone(), config.zone()?))
    }
}

impl Default for FormatDateParser {
    fn default() -> Self {
        Self::new(
            DEFAULT_DATETIME_FORMATS
                .iter()
                .map(|f| f.to_string())
                .collect(),
            ZoneChoice::Local,
        )
    }
}

impl DateParser for FormatDateParser {
    fn parse(&self, input: &str) -> Option<f64> {
        // Newer Android exports put U+202F before AM/PM.
        let normalized = input.split_whitespace().collect::<Vec<_>>().join(" ");
        if normalized.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
            return Some(epoch_seconds(&dt));
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(&normalized) {
            return Some(epoch_seconds(&dt));
        }

        for format in &self.formats {
            if let Ok(naive) = NaiveDateTime::parse_from_str(&normalized, format) {
                return self.zone.localize(&naive);
            }
        }

        DEFAULT_DATE_FORMATS.iter().find_map(|format| {
            NaiveDate::parse_from_str(&normalized, format)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .and_then(|naive| self.zone.localize(&naive))
        })
    }
}

/// Attaches an absolute instant to every record, failing on the first record whose
/// `field` attribute is missing or cannot be parsed.
///
/// A single unresolved record would silently corrupt the ordering of the whole
/// dataset, so there is no skip mode.
pub fn resolve_timestamps(
    records: Vec<Record>,
    parser: &dyn DateParser,
    field: &str,
) -> AppResult<Vec<TimedRecord>> {
    info!(records = records.len(), "Infusing records with timestamps");

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let ts = match record.attribute(field) {
                None => {
                    return Err(AppError::MissingDateField {
                        index,
                        tag: record.tag.clone(),
                        field: field.to_string(),
                    })
                }
                Some(value) => parser.parse(value).ok_or_else(|| AppError::UnparseableDate {
                    index,
                    tag: record.tag.clone(),
                    field: field.to_string(),
                    value: value.to_string(),
                })?,
            };
            Ok(TimedRecord { record, ts })
        })
        .collect()
}
