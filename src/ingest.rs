//! Loading daily report exports from disk.
//!
//! An input is one JSON report, a JSON array of reports, or a directory
//! walked for `*.json` files. Summaries that a form already stored on a
//! block (`shadowAuditSummary`) are lifted into a [`SummaryCache`] instead
//! of staying inside the block data.

use crate::audit::cache::{BlockKey, SummaryCache};
use crate::error::{AuditError, Result};
use crate::types::block::ActivityBlock;
use crate::types::daily::DailyReport;
use crate::types::summary::ShadowAuditSummary;
use chrono::NaiveDate;
use serde_json::Value;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const STORED_SUMMARY_KEY: &str = "shadowAuditSummary";

#[derive(Debug, Default)]
pub struct Ingested {
    pub reports: Vec<DailyReport>,
    pub cache: SummaryCache,
}

/// Reports outside the date range or spread are dropped before any roll-up.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub spread: Option<String>,
}

impl ReportFilter {
    pub fn new(from: Option<&str>, to: Option<&str>, spread: Option<&str>) -> Result<Self> {
        Ok(Self {
            from: from.map(parse_bound).transpose()?,
            to: to.map(parse_bound).transpose()?,
            spread: spread.map(|s| s.trim().to_string()),
        })
    }

    /// Undated reports only pass when no date bound is set.
    pub fn matches(&self, report: &DailyReport) -> bool {
        if self.from.is_some() || self.to.is_some() {
            let Some(date) = report.date else {
                return false;
            };
            if self.from.is_some_and(|from| date < from) || self.to.is_some_and(|to| date > to) {
                return false;
            }
        }
        match &self.spread {
            Some(wanted) => report
                .spread
                .as_deref()
                .is_some_and(|spread| spread.trim().eq_ignore_ascii_case(wanted)),
            None => true,
        }
    }

    pub fn apply(&self, reports: Vec<DailyReport>) -> Vec<DailyReport> {
        let before = reports.len();
        let kept: Vec<_> = reports.into_iter().filter(|r| self.matches(r)).collect();
        if kept.len() != before {
            tracing::info!(kept = kept.len(), dropped = before - kept.len(), "filtered reports");
        }
        kept
    }
}

fn parse_bound(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AuditError::InvalidDate(raw.to_string()))
}

pub fn load_reports(path: &Path) -> Result<Ingested> {
    if !path.exists() {
        return Err(AuditError::InputNotFound(path.display().to_string()));
    }

    let mut ingested = Ingested::default();
    if path.is_dir() {
        for file in json_files(path) {
            match read_json(&file) {
                Ok(value) => collect(value, &file, &mut ingested),
                Err(err) => tracing::warn!(path = %file.display(), error = %err, "skipping unreadable report"),
            }
        }
    } else {
        let value = read_json(path)?;
        collect(value, path, &mut ingested);
    }

    tracing::info!(
        reports = ingested.reports.len(),
        cached = ingested.cache.len(),
        "loaded reports"
    );
    Ok(ingested)
}

fn json_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().to_path_buf())
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        })
        .collect();
    files.sort();
    files
}

fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| AuditError::InputParse(format!("{}: {}", path.display(), e)))
}

fn collect(value: Value, source: &Path, ingested: &mut Ingested) {
    let (raw_reports, in_array) = match value {
        Value::Array(items) => (items, true),
        other => (vec![other], false),
    };
    for (position, raw) in raw_reports.into_iter().enumerate() {
        match serde_json::from_value::<DailyReport>(raw.clone()) {
            Ok(mut report) => {
                report.source = Some(if in_array {
                    format!("{}[{position}]", source.display())
                } else {
                    source.display().to_string()
                });
                harvest_summaries(&raw, &report, &mut ingested.cache);
                ingested.reports.push(report);
            }
            Err(err) => {
                tracing::warn!(path = %source.display(), error = %err, "skipping entry that is not a report")
            }
        }
    }
}

fn harvest_summaries(raw: &Value, report: &DailyReport, cache: &mut SummaryCache) {
    let Some(raw_blocks) = raw
        .get("blocks")
        .or_else(|| raw.get("activityBlocks"))
        .and_then(Value::as_array)
    else {
        return;
    };

    // Malformed rows were dropped from `report.blocks`; skip them here too so
    // positions line up.
    let kept = raw_blocks
        .iter()
        .filter(|raw_block| serde_json::from_value::<ActivityBlock>((*raw_block).clone()).is_ok());
    for (index, (raw_block, block)) in kept.zip(&report.blocks).enumerate() {
        let Some(stored) = raw_block.get(STORED_SUMMARY_KEY) else {
            continue;
        };
        let key = BlockKey::for_block(report, index, block);
        match serde_json::from_value::<ShadowAuditSummary>(stored.clone()) {
            Ok(summary) => cache.insert(key, block, summary),
            Err(err) => {
                tracing::warn!(block = %key, error = %err, "ignoring malformed stored summary")
            }
        }
    }
}
