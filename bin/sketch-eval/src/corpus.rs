use std::path::Path;

use anyhow::{bail, Context as _};
use ndarray::Array2;
use rand::{rngs::StdRng, SeedableRng as _};
use rand_distr::{Distribution as _, StandardNormal};
use tracing::info;

use crate::config::{GeneratedInput, InputSource};

/// The full input matrix for an evaluation.
pub struct Corpus {
    rows: Array2<f64>,
}

impl Corpus {
    /// Loads or generates the input rows described by `source`.
    ///
    /// # Errors
    ///
    /// If the input file cannot be read or parsed, an error is returned.
    pub fn from_source(source: &InputSource) -> anyhow::Result<Self> {
        let rows = match source {
            InputSource::File { path } => read_rows(path)?,
            InputSource::Generate(generated) => generate_rows(generated),
        };

        info!(
            "Loaded input corpus with {} rows of dimension {}.",
            rows.nrows(),
            rows.ncols()
        );
        Ok(Self { rows })
    }

    /// Returns the input rows.
    pub fn rows(&self) -> &Array2<f64> {
        &self.rows
    }
}

fn read_rows(path: &Path) -> anyhow::Result<Array2<f64>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file '{}'.", path.display()))?;
    parse_rows(&raw).with_context(|| format!("Failed to parse input file '{}'.", path.display()))
}

fn parse_rows(raw: &str) -> anyhow::Result<Array2<f64>> {
    let mut values = Vec::new();
    let mut columns = None;
    let mut rows = 0;

    for (line_number, line) in raw.lines().enumerate().map(|(i, line)| (i + 1, line.trim())) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let before = values.len();
        for field in line.split(|c: char| c == ',' || c.is_whitespace()).filter(|f| !f.is_empty()) {
            let value = field
                .parse::<f64>()
                .with_context(|| format!("Invalid value '{}' on line {}.", field, line_number))?;
            values.push(value);
        }

        let width = values.len() - before;
        match columns {
            None => columns = Some(width),
            Some(expected) if expected != width => bail!(
                "Expected {} values on line {}, found {}.",
                expected,
                line_number,
                width
            ),
            Some(_) => {}
        }
        rows += 1;
    }

    let columns = columns.context("Input contains no rows.")?;
    Array2::from_shape_vec((rows, columns), values).context("Input rows do not form a matrix.")
}

fn generate_rows(generated: &GeneratedInput) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(generated.seed);
    Array2::from_shape_simple_fn((generated.rows.get(), generated.columns.get()), || {
        StandardNormal.sample(&mut rng)
    })
}
