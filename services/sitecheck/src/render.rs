//! Text presentation of a run's results

use std::fmt::Write as _;

use chrono::{DateTime, Local};

use crate::check::{CheckResult, Status};

/// Online/offline counts for a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub online: usize,
    pub offline: usize,
    pub total: usize,
}

impl Summary {
    pub fn from_results(results: &[CheckResult]) -> Self {
        let online = results
            .iter()
            .filter(|r| r.status() == Status::Online)
            .count();
        Self {
            online,
            offline: results.len() - online,
            total: results.len(),
        }
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} online, {} offline, {} total",
            self.online, self.offline, self.total
        )
    }
}

/// Summary counts stamped with the time of the run
pub fn summary_line(summary: &Summary, checked_at: DateTime<Local>) -> String {
    format!(
        "Last update {}: {}",
        checked_at.format("%Y-%m-%d %H:%M:%S"),
        summary
    )
}

/// Render results as an aligned table: name, status, latency, note
pub fn render_table(results: &[CheckResult]) -> String {
    let rows: Vec<[String; 4]> = results
        .iter()
        .map(|r| {
            let latency = r
                .latency_ms
                .map_or_else(|| "N/A".to_string(), |ms| format!("{}ms", ms));
            [r.target.name.clone(), r.status().to_string(), latency, r.note()]
        })
        .collect();

    let header = ["Name", "Status", "Latency", "Note"].map(str::to_string);
    let mut widths = header.each_ref().map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in std::iter::once(&header).chain(&rows) {
        let line = row
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ");
        let _ = writeln!(out, "{}", line.trim_end());
    }
    out
}
