//! Append-only CSV log of trial results.
//!
//! The column layout is fixed so logs written by earlier runs stay readable:
//! a 13-column header written once when the file is created, then one row per
//! trial. Existing files are never rewritten; a file whose first row is not
//! the expected header is left untouched and the append is refused. A last
//! row missing its line terminator gets one before the new row is written.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{DEFAULT_LOG_FILE, ElapsedTime, TrialInput, TrialRecord};
use crate::error::{AppError, EXIT_LOG};

/// Environment variable overriding the default log path.
pub const LOG_FILE_ENV: &str = "CRR_LOG_FILE";

pub const LOG_HEADER: [&str; 13] = [
    "rider_mass_kg",
    "rear_mass_percent",
    "dia_wheel_mm",
    "dia_drum_mm",
    "roller_spread_mm",
    "hours",
    "minutes",
    "seconds",
    "distance_meters",
    "avg_watts",
    "tire_pressure_psi",
    "tire_name",
    "crr",
];

/// Where the log goes when no `--log-file` flag is given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub default_path: PathBuf,
}

impl LogSettings {
    /// Read `CRR_LOG_FILE` (also from `.env` if present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_env_value(std::env::var(LOG_FILE_ENV).ok())
    }

    fn from_env_value(value: Option<String>) -> Self {
        let default_path = value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
        Self { default_path }
    }

    /// An explicit path wins over the environment/default.
    pub fn resolve(&self, explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.default_path.clone())
    }
}

/// Flat CSV row; field order is the column order.
#[derive(Debug, Serialize, Deserialize)]
struct LogRow {
    rider_mass_kg: f64,
    rear_mass_percent: f64,
    dia_wheel_mm: f64,
    dia_drum_mm: f64,
    roller_spread_mm: f64,
    hours: u32,
    minutes: u32,
    seconds: u32,
    distance_meters: f64,
    avg_watts: f64,
    tire_pressure_psi: Option<f64>,
    tire_name: String,
    crr: f64,
}

impl From<&TrialRecord> for LogRow {
    fn from(r: &TrialRecord) -> Self {
        let i = &r.input;
        Self {
            rider_mass_kg: i.rider_mass_kg,
            rear_mass_percent: i.rear_mass_percent,
            dia_wheel_mm: i.dia_wheel_mm,
            dia_drum_mm: i.dia_drum_mm,
            roller_spread_mm: i.roller_spread_mm,
            hours: i.elapsed.hours,
            minutes: i.elapsed.minutes,
            seconds: i.elapsed.seconds,
            distance_meters: i.distance_meters,
            avg_watts: i.avg_watts,
            tire_pressure_psi: r.tire_pressure_psi,
            tire_name: r.tire_name.clone(),
            crr: r.crr,
        }
    }
}

impl From<LogRow> for TrialRecord {
    fn from(row: LogRow) -> Self {
        Self {
            input: TrialInput {
                rider_mass_kg: row.rider_mass_kg,
                rear_mass_percent: row.rear_mass_percent,
                dia_wheel_mm: row.dia_wheel_mm,
                dia_drum_mm: row.dia_drum_mm,
                roller_spread_mm: row.roller_spread_mm,
                elapsed: ElapsedTime::new(row.hours, row.minutes, row.seconds),
                distance_meters: row.distance_meters,
                avg_watts: row.avg_watts,
            },
            tire_pressure_psi: row.tire_pressure_psi,
            tire_name: row.tire_name,
            crr: row.crr,
        }
    }
}

/// Append one trial, writing the header first if the file is new or empty.
pub fn append_trial(path: &Path, record: &TrialRecord) -> Result<(), AppError> {
    let (needs_header, needs_newline) = match std::fs::metadata(path) {
        Ok(meta) if meta.len() > 0 => {
            check_header(path)?;
            (false, !ends_with_newline(path)?)
        }
        Ok(_) => (true, false),
        Err(e) if e.kind() == io::ErrorKind::NotFound => (true, false),
        Err(e) => {
            return Err(AppError::new(
                EXIT_LOG,
                format!("Failed to inspect trial log '{}': {e}", path.display()),
            ));
        }
    };

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| open_error(path, e))?;

    // A last row without its terminator would swallow the new row.
    if needs_newline {
        file.write_all(b"\n").map_err(|e| {
            AppError::new(EXIT_LOG, format!("Failed to terminate last trial log row: {e}"))
        })?;
    }

    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);

    if needs_header {
        writer.write_record(LOG_HEADER).map_err(|e| {
            AppError::new(EXIT_LOG, format!("Failed to write trial log header: {e}"))
        })?;
    }
    writer
        .serialize(LogRow::from(record))
        .map_err(|e| AppError::new(EXIT_LOG, format!("Failed to write trial log row: {e}")))?;
    writer
        .flush()
        .map_err(|e| AppError::new(EXIT_LOG, format!("Failed to flush trial log: {e}")))?;

    Ok(())
}

/// Read every trial in insertion order.
pub fn read_trials(path: &Path) -> Result<Vec<TrialRecord>, AppError> {
    let file = File::open(path).map_err(|e| open_error(path, e))?;
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);

    let headers = reader.headers().map_err(header_error)?;
    ensure_header_matches(path, headers)?;

    let mut out = Vec::new();
    for (idx, row) in reader.deserialize::<LogRow>().enumerate() {
        // +2: 1-based lines, header on line 1.
        let line = idx + 2;
        let row = row.map_err(|e| {
            AppError::new(
                EXIT_LOG,
                format!("Invalid trial log row at {}:{line}: {e}", path.display()),
            )
        })?;
        out.push(row.into());
    }
    Ok(out)
}

fn open_error(path: &Path, e: io::Error) -> AppError {
    AppError::new(
        EXIT_LOG,
        format!("Failed to open trial log '{}': {e}", path.display()),
    )
}

fn header_error(e: csv::Error) -> AppError {
    AppError::new(EXIT_LOG, format!("Failed to read trial log header: {e}"))
}

fn check_header(path: &Path) -> Result<(), AppError> {
    let file = File::open(path).map_err(|e| open_error(path, e))?;
    let mut reader = csv::ReaderBuilder::new().from_reader(file);
    let headers = reader.headers().map_err(header_error)?;
    ensure_header_matches(path, headers)
}

/// Whether a non-empty file's last byte is `\n`.
fn ends_with_newline(path: &Path) -> Result<bool, AppError> {
    let mut file = File::open(path).map_err(|e| open_error(path, e))?;
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))
        .and_then(|_| file.read_exact(&mut last))
        .map_err(|e| {
            AppError::new(
                EXIT_LOG,
                format!("Failed to read end of trial log '{}': {e}", path.display()),
            )
        })?;
    Ok(last[0] == b'\n')
}

fn ensure_header_matches(path: &Path, headers: &csv::StringRecord) -> Result<(), AppError> {
    // Spreadsheet exports sometimes prepend a BOM to the first header.
    let matches = headers.len() == LOG_HEADER.len()
        && headers
            .iter()
            .zip(LOG_HEADER)
            .enumerate()
            .all(|(i, (got, want))| {
                let got = if i == 0 { got.trim_start_matches('\u{feff}') } else { got };
                got.trim() == want
            });

    if matches {
        Ok(())
    } else {
        Err(AppError::new(
            EXIT_LOG,
            format!(
                "Trial log '{}' has an unexpected header; expected: {}",
                path.display(),
                LOG_HEADER.join(",")
            ),
        ))
    }
}
