//! CSV import — user-supplied daily OHLCV files.
//!
//! Expected columns: `Date,Open,High,Low,Close,Volume` (names are matched
//! case-insensitively, order does not matter). `Date` and `Close` are required.
//! Missing `Open`/`High`/`Low` fall back to the close, missing `Volume` to 0.

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use super::provider::{finalize_bars, DataError, DataProvider};
use crate::domain::Bar;

/// Column positions resolved from the header row.
struct Columns {
    date: usize,
    close: usize,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    volume: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord, source: &str) -> Result<Self, DataError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let date = find("date").ok_or_else(|| {
            DataError::MalformedInput(format!("{source}: missing required column 'Date'"))
        })?;
        let close = find("close").ok_or_else(|| {
            DataError::MalformedInput(format!("{source}: missing required column 'Close'"))
        })?;
        Ok(Self {
            date,
            close,
            open: find("open"),
            high: find("high"),
            low: find("low"),
            volume: find("volume"),
        })
    }
}

/// Parse a date cell. Accepts `YYYY-MM-DD` with an optional time suffix.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| raw.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
}

fn parse_price(
    record: &csv::StringRecord,
    column: Option<usize>,
    fallback: f64,
    line: usize,
    source: &str,
) -> Result<f64, DataError> {
    match column.and_then(|c| record.get(c)).map(str::trim) {
        None | Some("") => Ok(fallback),
        Some(raw) => raw.parse::<f64>().map_err(|_| {
            DataError::MalformedInput(format!("{source}: line {line}: invalid price '{raw}'"))
        }),
    }
}

fn parse_volume(
    record: &csv::StringRecord,
    column: Option<usize>,
    line: usize,
    source: &str,
) -> Result<u64, DataError> {
    match column.and_then(|c| record.get(c)).map(str::trim) {
        None | Some("") => Ok(0),
        Some(raw) => match raw.parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => Ok(v as u64),
            _ => Err(DataError::MalformedInput(format!(
                "{source}: line {line}: invalid volume '{raw}'"
            ))),
        },
    }
}

/// Parse OHLCV rows from any reader. Rows are returned in file order.
pub fn parse_csv<R: Read>(reader: R, source: &str) -> Result<Vec<Bar>, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| DataError::MalformedInput(format!("{source}: {e}")))?
        .clone();
    let columns = Columns::resolve(&headers, source)?;

    let mut bars = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        // Line 1 is the header
        let line = i + 2;
        let record =
            record.map_err(|e| DataError::MalformedInput(format!("{source}: line {line}: {e}")))?;

        let raw_date = record.get(columns.date).unwrap_or("");
        let date = parse_date(raw_date).ok_or_else(|| {
            DataError::MalformedInput(format!("{source}: line {line}: invalid date '{raw_date}'"))
        })?;

        let raw_close = record.get(columns.close).map(str::trim).unwrap_or("");
        if raw_close.is_empty() {
            return Err(DataError::MalformedInput(format!(
                "{source}: line {line}: missing close"
            )));
        }
        let close = parse_price(&record, Some(columns.close), f64::NAN, line, source)?;

        bars.push(Bar {
            date,
            open: parse_price(&record, columns.open, close, line, source)?,
            high: parse_price(&record, columns.high, close, line, source)?,
            low: parse_price(&record, columns.low, close, line, source)?,
            close,
            volume: parse_volume(&record, columns.volume, line, source)?,
        });
    }
    Ok(bars)
}

/// Load every row of a CSV file.
pub fn load_csv(path: &Path) -> Result<Vec<Bar>, DataError> {
    let file = std::fs::File::open(path)
        .map_err(|e| DataError::Io(format!("{}: {e}", path.display())))?;
    parse_csv(std::io::BufReader::new(file), &path.display().to_string())
}

/// Provider backed by CSV files on disk.
///
/// `path` may be a directory holding one `<SYMBOL>.csv` per symbol, or a single
/// file that serves only the symbol matching its stem (case-insensitive).
#[derive(Debug, Clone)]
pub struct CsvProvider {
    path: PathBuf,
}

impl CsvProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn file_for(&self, symbol: &str) -> Result<PathBuf, DataError> {
        if self.path.is_dir() {
            return Ok(self.path.join(format!("{symbol}.csv")));
        }
        let stem = self
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        if !stem.eq_ignore_ascii_case(symbol) {
            return Err(DataError::unavailable(
                symbol,
                format!("{} holds data for '{stem}' only", self.path.display()),
            ));
        }
        Ok(self.path.clone())
    }
}

impl DataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, DataError> {
        let file = self.file_for(symbol)?;
        if !file.exists() {
            return Err(DataError::unavailable(
                symbol,
                format!("file not found: {}", file.display()),
            ));
        }
        let bars = load_csv(&file)?;
        tracing::debug!(symbol, rows = bars.len(), file = %file.display(), "loaded CSV");
        finalize_bars(symbol, bars, start, end)
    }
}
