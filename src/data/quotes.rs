use crate::data::loader::REQUIRED_COLUMNS;
use crate::error::Result;
use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use std::io::{BufRead, Write};
use tracing::{debug, info};

/// One cleaned quote, numeric fields kept as their separator-free text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteRow {
    pub timestamp: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
}

/// Why a line did not become a quote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRejection {
    /// Blank line or the `Date ...` header
    Header,
    /// Dividend announcement row
    Dividend,
    TooFewFields,
    BadDate,
    BadNumber,
}

#[derive(Debug, Clone, Default)]
pub struct CleanReport {
    pub rows: Vec<QuoteRow>,
    pub headers_skipped: usize,
    pub dividends_skipped: usize,
    pub malformed: usize,
}

impl CleanReport {
    fn reject(&mut self, reason: LineRejection) {
        match reason {
            LineRejection::Header => self.headers_skipped += 1,
            LineRejection::Dividend => self.dividends_skipped += 1,
            LineRejection::TooFewFields | LineRejection::BadDate | LineRejection::BadNumber => {
                self.malformed += 1
            }
        }
    }
}

/// Turns whitespace-aligned quote dumps
/// (`Date Open High Low Close AdjClose Volume`) into the loader's CSV rows.
pub struct QuoteCleaner {
    wide_gap: Regex,
    any_space: Regex,
}

impl Default for QuoteCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteCleaner {
    pub fn new() -> Self {
        Self {
            wide_gap: Regex::new(r"\s{2,}|\t").expect("valid regex"),
            any_space: Regex::new(r"\s+").expect("valid regex"),
        }
    }

    pub fn clean_line(&self, line: &str) -> std::result::Result<QuoteRow, LineRejection> {
        let line = line.trim();
        if line.is_empty() || line.starts_with("Date") {
            return Err(LineRejection::Header);
        }
        if line.contains("Dividend") {
            return Err(LineRejection::Dividend);
        }

        let mut parts: Vec<&str> = self.wide_gap.split(line).collect();
        if parts.len() < 7 {
            parts = self.any_space.split(line).collect();
        }
        if parts.len() < 7 {
            return Err(LineRejection::TooFewFields);
        }

        let timestamp = parse_quote_date(parts[0]).ok_or(LineRejection::BadDate)?;
        // parts[5] is the adjusted close, not carried forward
        Ok(QuoteRow {
            timestamp,
            open: clean_number(parts[1])?,
            high: clean_number(parts[2])?,
            low: clean_number(parts[3])?,
            close: clean_number(parts[4])?,
            volume: clean_number(parts[6])?,
        })
    }

    pub fn clean<R: BufRead>(&self, input: R) -> Result<CleanReport> {
        let mut report = CleanReport::default();
        for (n, line) in input.lines().enumerate() {
            let line = line?;
            match self.clean_line(&line) {
                Ok(row) => report.rows.push(row),
                Err(reason) => {
                    if !matches!(reason, LineRejection::Header) {
                        debug!(line = n + 1, ?reason, "skipping quote line");
                    }
                    report.reject(reason);
                }
            }
        }
        info!(
            kept = report.rows.len(),
            dividends = report.dividends_skipped,
            malformed = report.malformed,
            "cleaned quotes"
        );
        Ok(report)
    }
}

/// `Aug 8, 2025` (comma optional) to `2025-08-08`
pub fn parse_quote_date(text: &str) -> Option<String> {
    let normalized = text.replace(',', "");
    let mut fields = normalized.split_whitespace();
    let (month, day, year) = (fields.next()?, fields.next()?, fields.next()?);
    if fields.next().is_some() {
        return None;
    }
    NaiveDate::parse_from_str(&format!("{} {} {}", month, day, year), "%b %d %Y")
        .ok()
        .map(|d| d.format("%Y-%m-%d").to_string())
}

/// Strip thousands separators and make sure what is left is a number
fn clean_number(text: &str) -> std::result::Result<String, LineRejection> {
    let stripped = text.trim().replace(',', "");
    match stripped.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(stripped),
        _ => Err(LineRejection::BadNumber),
    }
}

/// Write cleaned rows as a headed OHLCV CSV
pub fn write_quotes_csv<W: Write>(rows: &[QuoteRow], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(REQUIRED_COLUMNS)?;
    for r in rows {
        writer.write_record([&r.timestamp, &r.open, &r.high, &r.low, &r.close, &r.volume])?;
    }
    writer.flush()?;
    Ok(())
}
