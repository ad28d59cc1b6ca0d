//! Stats command implementation.

use crate::config::Config;
use crate::format::Formatter;
use crate::sink;
use crate::stats::PriceStats;
use anyhow::{Context, Result};
use std::path::Path;

/// Summarizes prices in a saved CSV file.
pub struct StatsCommand {
    config: Config,
}

impl StatsCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Loads `path` and returns formatted price statistics.
    ///
    /// A bare file name that does not exist is looked up in the output directory.
    pub async fn execute(&self, path: &Path) -> Result<String> {
        let resolved = self.resolve(path);
        let table = sink::load_table(&resolved)
            .with_context(|| format!("Failed to load {}", resolved.display()))?;

        let stats = PriceStats::from_table(&table);
        Ok(Formatter::new(self.config.format).format_stats(&stats))
    }

    /// Lists CSV files saved in the output directory.
    pub fn list_files(&self) -> Result<String> {
        let files = sink::list_saved(&self.config.output_dir).with_context(|| {
            format!("Failed to list {}", self.config.output_dir.display())
        })?;

        if files.is_empty() {
            return Ok(format!("No saved files in {}", self.config.output_dir.display()));
        }

        Ok(files.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join("\n"))
    }

    fn resolve(&self, path: &Path) -> std::path::PathBuf {
        if path.exists() || path.components().count() > 1 {
            return path.to_path_buf();
        }
        self.config.output_dir.join(path)
    }
}
