use ferrous_lookup_application::use_cases::{CacheInspection, InspectedEntry};
use ferrous_lookup_domain::{LookupResult, RecordType};
use serde::Serialize;
use std::fmt::Write;

/// One line of `lookup --json` output.
#[derive(Debug, Serialize)]
pub struct LookupReport<'a> {
    pub domain: &'a str,
    pub record_type: RecordType,
    #[serde(flatten)]
    pub result: &'a LookupResult,
}

pub fn render_lookup(report: &LookupReport<'_>) -> String {
    let result = report.result;
    let mut out = format!(
        "{} {}: {} (ttl {}s, {:.2} ms)\n",
        report.domain, report.record_type, result.status, result.ttl_seconds, result.duration_ms
    );

    match &result.records {
        Ok(records) if records.is_empty() => out.push_str("  (no records)\n"),
        Ok(records) => {
            for record in records {
                let _ = writeln!(out, "  {}", record);
            }
        }
        Err(failure) => {
            let _ = writeln!(out, "  error: {}", failure);
        }
    }

    out
}

pub fn render_inspection(domain: &str, entries: &[CacheInspection]) -> String {
    if entries.is_empty() {
        return format!("No cached entries for {}\n", domain);
    }

    let mut out = String::new();
    for entry in entries {
        let ttl = entry
            .ttl_seconds
            .map(|secs| format!("{}s", secs))
            .unwrap_or_else(|| "none".to_string());

        match &entry.entry {
            InspectedEntry::Positive {
                records,
                fetched_at,
            } => {
                let _ = writeln!(
                    out,
                    "{} (ttl {}, fetched {})",
                    entry.key, ttl, fetched_at
                );
                for record in records {
                    let _ = writeln!(out, "  {}", record);
                }
            }
            InspectedEntry::Negative { marker } => {
                let _ = writeln!(out, "{} (ttl {}) {}", entry.key, ttl, marker);
            }
            InspectedEntry::Corrupt { reason } => {
                let _ = writeln!(out, "{} (ttl {}) unreadable: {}", entry.key, ttl, reason);
            }
        }
    }
    out
}
