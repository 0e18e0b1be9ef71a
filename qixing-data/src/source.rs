use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, NaiveDateTime};

use crate::models::RawDraw;

/// Header names written by the crawler export, with English aliases.
const TIME_HEADERS: &[&str] = &["开奖时间", "draw_time"];
const ID_HEADERS: &[&str] = &["期号", "draw_id"];
const NUMBERS_HEADERS: &[&str] = &["中奖号码", "numbers"];

/// Anything able to deliver the ordered draw history.
pub trait DrawSource {
    fn load(&self) -> Result<Vec<RawDraw>>;
}

impl DrawSource for Vec<RawDraw> {
    fn load(&self) -> Result<Vec<RawDraw>> {
        Ok(self.clone())
    }
}

/// Reads the CSV export of the record store.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DrawSource for CsvSource {
    fn load(&self) -> Result<Vec<RawDraw>> {
        read_csv(&self.path)
    }
}

pub fn default_data_path() -> PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("qxc_results_all.csv");
    path
}

pub fn parse_draw_time(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(time) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(time);
        }
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid draw time: '{}'", raw))?;
    date.and_hms_opt(0, 0, 0)
        .with_context(|| format!("Invalid draw time: '{}'", raw))
}

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Result<usize> {
    headers
        .iter()
        .position(|h| {
            let h = h.trim_start_matches('\u{feff}').trim();
            names.contains(&h)
        })
        .with_context(|| format!("Missing column {:?}", names))
}

pub fn read_csv(path: &Path) -> Result<Vec<RawDraw>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Unable to open {:?}", path))?;

    let headers = reader.headers().context("Unable to read CSV header")?.clone();
    let time_idx = find_column(&headers, TIME_HEADERS)?;
    let id_idx = find_column(&headers, ID_HEADERS)?;
    let numbers_idx = find_column(&headers, NUMBERS_HEADERS)?;

    let mut draws = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Unable to read line {}", line + 2))?;
        let get = |idx: usize| -> Result<String> {
            record
                .get(idx)
                .map(str::to_string)
                .with_context(|| format!("Missing field at line {}", line + 2))
        };

        let draw_id = get(id_idx)?;
        if draw_id.is_empty() {
            bail!("Empty draw id at line {}", line + 2);
        }
        let draw_time = parse_draw_time(&get(time_idx)?)
            .with_context(|| format!("Malformed record {}", draw_id))?;
        let numbers = get(numbers_idx)?;

        draws.push(RawDraw {
            draw_id,
            draw_time,
            numbers,
        });
    }

    tracing::debug!(path = %path.display(), records = draws.len(), "loaded draw export");
    Ok(draws)
}
