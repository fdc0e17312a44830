//! Chart and table settings.
//!
//! Settings are resolved with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Config file passed with `--config`
//! 3. Default values
//!
//! ```toml
//! start = 0
//! end = 500000
//! step = 1000
//! output = "tax_comparison.svg"
//! width = 1024
//! height = 768
//! ```

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tax_core::calculations::{IncomeRange, SeriesError};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Income sweep and output settings for the `table` and `plot` commands.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChartConfig {
    /// First sampled income.
    pub start: Decimal,

    /// Sampling stops before this income.
    pub end: Decimal,

    /// Distance between sampled incomes.
    pub step: Decimal,

    /// Where `plot` writes the SVG.
    pub output: PathBuf,

    /// Image size in pixels.
    pub width: u32,
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        let range = IncomeRange::default();
        Self {
            start: range.start(),
            end: range.end(),
            step: range.step(),
            output: PathBuf::from("tax_comparison.svg"),
            width: 1024,
            height: 768,
        }
    }
}

impl ChartConfig {
    /// Loads settings from `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), ?config, "loaded chart config");
        Ok(config)
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(
        mut self,
        start: Option<Decimal>,
        end: Option<Decimal>,
        step: Option<Decimal>,
        output: Option<PathBuf>,
    ) -> Self {
        if let Some(start) = start {
            self.start = start;
        }
        if let Some(end) = end {
            self.end = end;
        }
        if let Some(step) = step {
            self.step = step;
        }
        if let Some(output) = output {
            self.output = output;
        }
        self
    }

    pub fn income_range(&self) -> Result<IncomeRange, SeriesError> {
        IncomeRange::new(self.start, self.end, self.step)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn default_config_matches_default_range() {
        let config = ChartConfig::default();

        assert_eq!(config.start, dec!(0));
        assert_eq!(config.end, dec!(500000));
        assert_eq!(config.step, dec!(1000));
        assert_eq!(config.output, PathBuf::from("tax_comparison.svg"));
        assert_eq!((config.width, config.height), (1024, 768));
    }

    #[test]
    fn load_without_path_uses_defaults() {
        let config = ChartConfig::load(None).unwrap();

        assert_eq!(config, ChartConfig::default());
    }

    #[test]
    fn parse_full_toml() {
        let toml = r#"
start = 10000
end = 200000
step = 500
output = "out/chart.svg"
width = 800
height = 600
"#;
        let config: ChartConfig = toml::from_str(toml).unwrap();

        assert_eq!(config.start, dec!(10000));
        assert_eq!(config.end, dec!(200000));
        assert_eq!(config.step, dec!(500));
        assert_eq!(config.output, PathBuf::from("out/chart.svg"));
        assert_eq!((config.width, config.height), (800, 600));
    }

    #[test]
    fn parse_partial_toml() {
        let config: ChartConfig = toml::from_str("step = 250").unwrap();

        assert_eq!(config.step, dec!(250));
        // everything else keeps its default
        assert_eq!(config.end, dec!(500000));
        assert_eq!(config.width, 1024);
    }

    #[test]
    fn cli_overrides_win() {
        let config = ChartConfig::default().with_cli_overrides(
            Some(dec!(1000)),
            None,
            Some(dec!(50)),
            Some(PathBuf::from("x.svg")),
        );

        assert_eq!(config.start, dec!(1000));
        assert_eq!(config.end, dec!(500000));
        assert_eq!(config.step, dec!(50));
        assert_eq!(config.output, PathBuf::from("x.svg"));
    }

    #[test]
    fn income_range_rejects_bad_step() {
        let config = ChartConfig::default().with_cli_overrides(None, None, Some(dec!(0)), None);

        assert_eq!(config.income_range(), Err(SeriesError::InvalidStep(dec!(0))));
    }

    #[test]
    fn load_from_file_reads_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "end = 100000").unwrap();

        let config = ChartConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.end, dec!(100000));
    }

    #[test]
    fn load_from_missing_file_is_io_error() {
        let result = ChartConfig::load(Some(Path::new("/nonexistent/tax-compare.toml")));

        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn load_from_invalid_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "width = \"wide\"").unwrap();

        let result = ChartConfig::load(Some(file.path()));

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
