use std::{
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::Parser;
use frequent_directions::SketchConfig;
use serde::Deserialize;

#[derive(Parser)]
#[command(about)]
pub struct Cli {
    /// Path to the configuration file, in YAML format.
    pub config_path: PathBuf,

    /// Path to a file of input rows.
    ///
    /// When given, overrides the input configured in the configuration file.
    #[arg(long)]
    pub input: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GeneratedInput {
    /// Number of rows to generate.
    pub rows: NonZeroUsize,

    /// Dimension of every generated row.
    pub columns: NonZeroUsize,

    /// Seed for the random number generator.
    ///
    /// The same seed always produces the same rows.
    pub seed: u64,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "mode", content = "value", deny_unknown_fields)]
pub enum InputSource {
    /// Rows read from a text file.
    ///
    /// Each non-empty line holds one row, with values separated by commas and/or whitespace. Lines starting with `#` are
    /// ignored.
    #[serde(rename = "file")]
    File { path: PathBuf },

    /// Rows drawn from a standard normal distribution.
    #[serde(rename = "generate")]
    Generate(GeneratedInput),
}

const fn default_runs() -> NonZeroUsize {
    NonZeroUsize::MIN
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Sketch parameters.
    pub sketch: SketchConfig,

    /// Where input rows come from.
    pub input: InputSource,

    /// Number of times to sketch the input.
    ///
    /// The same engine is reset and reused for every run, and every run must produce an identical sketch.
    #[serde(default = "default_runs")]
    pub runs: NonZeroUsize,

    /// Whether exceeding the covariance error bound fails the evaluation.
    ///
    /// The bound is only guaranteed when the input ends directly after a shrink, so this is off by default.
    #[serde(default)]
    pub strict: bool,
}

impl Config {
    /// Attempts to load a serialized `Config` from the given file path.
    ///
    /// # Errors
    ///
    /// If an error occurs while reading the file, or deserializing the configuration data, it will be returned.
    pub fn try_from_file<P>(config_path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        let config_path = config_path.as_ref();
        let config_file_raw = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read configuration file '{}'.", config_path.display()))?;
        let config: Self = serde_yaml::from_str(&config_file_raw).context("Failed to parse configuration file.")?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_generated_input() {
        let raw = r#"
sketch:
  ell: 4
  k: 6
input:
  mode: generate
  value:
    rows: 500
    columns: 16
    seed: 42
runs: 3
"#;
        let config: Config = serde_yaml::from_str(raw).unwrap();
        assert_eq!(config.sketch, SketchConfig::new(4).with_k(6));
        assert_eq!(
            config.input,
            InputSource::Generate(GeneratedInput {
                rows: NonZeroUsize::new(500).unwrap(),
                columns: NonZeroUsize::new(16).unwrap(),
                seed: 42,
            })
        );
        assert_eq!(config.runs.get(), 3);
        assert!(!config.strict);
    }

    #[test]
    fn parse_file_input() {
        let raw = r#"
sketch:
  ell: 2
input:
  mode: file
  value:
    path: /tmp/rows.csv
strict: true
"#;
        let config: Config = serde_yaml::from_str(raw).unwrap();
        assert_eq!(
            config.input,
            InputSource::File {
                path: PathBuf::from("/tmp/rows.csv")
            }
        );
        assert_eq!(config.runs.get(), 1);
        assert!(config.strict);
    }

    #[test]
    fn reject_unknown_fields() {
        let misspelled_top_level = r#"
sketch:
  ell: 2
input:
  mode: generate
  value:
    rows: 10
    columns: 4
    seed: 1
strikt: true
"#;
        assert!(serde_yaml::from_str::<Config>(misspelled_top_level).is_err());

        let misspelled_generated = r#"
sketch:
  ell: 2
input:
  mode: generate
  value:
    rows: 10
    columns: 4
    sead: 1
"#;
        assert!(serde_yaml::from_str::<Config>(misspelled_generated).is_err());

        let misspelled_file = r#"
sketch:
  ell: 2
input:
  mode: file
  value:
    path: /tmp/rows.csv
    format: csv
"#;
        assert!(serde_yaml::from_str::<Config>(misspelled_file).is_err());
    }
}
