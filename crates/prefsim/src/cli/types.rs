//! CLI enum types shared by subcommands.

use clap::ValueEnum;
use prefsim_core::OutputFormat as CoreOutputFormat;

/// Supported output formats.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON document
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

impl From<OutputFormat> for CoreOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => CoreOutputFormat::Json,
            OutputFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// Resolve the output format: CLI flag first, then `output.format` from config.
pub fn resolve_format(flag: Option<OutputFormat>, configured: &str) -> CoreOutputFormat {
    match flag {
        Some(format) => format.into(),
        None => CoreOutputFormat::parse(configured).unwrap_or_else(|| {
            tracing::warn!("Unknown output.format {configured:?}, using json");
            CoreOutputFormat::Json
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_wins_over_config() {
        assert_eq!(
            resolve_format(Some(OutputFormat::Jsonl), "json"),
            CoreOutputFormat::JsonLines
        );
    }

    #[test]
    fn test_config_used_without_flag() {
        assert_eq!(resolve_format(None, "jsonl"), CoreOutputFormat::JsonLines);
        assert_eq!(resolve_format(None, "yaml"), CoreOutputFormat::Json);
    }
}
