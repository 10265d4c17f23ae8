//! Serializable run records and a JSON / JSON Lines writer for them.

use serde::Serialize;
use std::io::{self, Write};

use crate::engine::{BaselineRun, SimulationRun};

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Single JSON document
    Json,
    /// One JSON object per line
    JsonLines,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// Both policies' results for one simulated user.
#[derive(Debug, Clone, Serialize)]
pub struct UserReport {
    /// Index of the simulated user
    pub user: usize,

    /// Seed the user's generator was created from
    pub seed: u64,

    /// Kernel-based suggestion policy
    pub suggestion: SimulationRun,

    /// Uniform-random policy on the same user
    pub baseline: BaselineRun,
}

/// Mean cumulative regret curves over several users.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegretSummary {
    pub users: usize,
    pub suggestion: Vec<f64>,
    pub baseline: Vec<f64>,
}

impl RegretSummary {
    /// Average the cumulative curves step by step; `None` without reports.
    pub fn from_reports(reports: &[UserReport]) -> Option<Self> {
        let first = reports.first()?;
        let horizon = first.suggestion.regret.len();
        let n = reports.len() as f64;

        let mut suggestion = vec![0.0; horizon];
        let mut baseline = vec![0.0; horizon];
        for report in reports {
            let curves = [
                (&mut suggestion, report.suggestion.regret.cumulative()),
                (&mut baseline, report.baseline.regret.cumulative()),
            ];
            for (mean, curve) in curves {
                for (m, c) in mean.iter_mut().zip(curve) {
                    *m += c / n;
                }
            }
        }

        Some(Self {
            users: reports.len(),
            suggestion,
            baseline,
        })
    }

    pub fn final_suggestion(&self) -> f64 {
        self.suggestion.last().copied().unwrap_or(0.0)
    }

    pub fn final_baseline(&self) -> f64 {
        self.baseline.last().copied().unwrap_or(0.0)
    }
}

/// Writes records as JSON or JSONL.
pub struct ReportWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
    written: usize,
}

impl<W: Write> ReportWriter<W> {
    /// `pretty` only affects the JSON format; JSONL is always one line per record.
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            written: 0,
        }
    }

    /// Write a single record.
    pub fn write<T: Serialize>(&mut self, item: &T) -> io::Result<()> {
        if self.pretty && self.format == OutputFormat::Json {
            serde_json::to_writer_pretty(&mut self.writer, item).map_err(io::Error::other)?;
        } else {
            serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
        }
        writeln!(self.writer)?;
        self.written += 1;
        Ok(())
    }

    /// Write a batch: a JSON array, or one line per record.
    pub fn write_all<T: Serialize>(&mut self, items: &[T]) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut self.writer, items)
                        .map_err(io::Error::other)?;
                } else {
                    serde_json::to_writer(&mut self.writer, items).map_err(io::Error::other)?;
                }
                writeln!(self.writer)?;
                self.written += items.len();
            }
            OutputFormat::JsonLines => {
                for item in items {
                    self.write(item)?;
                }
            }
        }
        Ok(())
    }

    /// Number of records written.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
