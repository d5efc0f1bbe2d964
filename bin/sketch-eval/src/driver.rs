use anyhow::{bail, Context as _};
use frequent_directions::{metrics, FrequentDirections};
use ndarray::Array2;
use tracing::{info, warn};

use crate::{config::Config, corpus::Corpus};

/// Summary of a single sketching run.
#[derive(Debug)]
pub struct RunSummary {
    /// Covariance error `‖AᵀA − BᵀB‖₂` of the sketch.
    pub error: f64,

    /// Error bound `‖A‖²_F / ell`.
    pub bound: f64,

    /// Number of shrinks performed while sketching.
    pub shrinks: u64,
}

/// Evaluation driver.
///
/// Feeds the corpus through a sketch, possibly several times with the same reset engine, and compares every finished
/// sketch against the full input.
pub struct Driver {
    config: Config,
    corpus: Corpus,
    sketch: FrequentDirections,
}

impl Driver {
    /// Creates a new `Driver` for the given configuration and corpus.
    ///
    /// # Errors
    ///
    /// If the sketch configuration is invalid, an error is returned.
    pub fn new(config: Config, corpus: Corpus) -> anyhow::Result<Self> {
        let sketch = FrequentDirections::from_config(config.sketch.clone()).context("Invalid sketch configuration.")?;
        Ok(Self { config, corpus, sketch })
    }

    /// Runs every configured evaluation run, returning the summary of each.
    ///
    /// # Errors
    ///
    /// If sketching fails, if runs disagree with each other, or if the error bound is exceeded in strict mode, an error
    /// is returned.
    pub fn run(mut self) -> anyhow::Result<Vec<RunSummary>> {
        let mut summaries = Vec::with_capacity(self.config.runs.get());
        let mut first_sketch: Option<Array2<f64>> = None;

        for run in 1..=self.config.runs.get() {
            let rows = self.corpus.rows();
            self.sketch
                .add_rows(rows.view())
                .with_context(|| format!("Failed to sketch input rows on run {}.", run))?;

            let shrinks = self.sketch.shrink_count();
            let sketch = self
                .sketch
                .finalize_and_reset()
                .with_context(|| format!("Failed to finalize sketch on run {}.", run))?;

            let error = metrics::spectral_reconstruction_error(rows.view(), sketch.view())?;
            let bound = metrics::error_bound(rows.view(), self.sketch.ell());
            info!(
                run,
                shrinks,
                error,
                bound,
                "Sketched {} rows into {} rows (error/bound ratio {:.4}).",
                rows.nrows(),
                sketch.nrows(),
                error / bound
            );

            if error > bound {
                if self.config.strict {
                    bail!(
                        "Covariance error {} exceeds bound {} on run {}.",
                        error,
                        bound,
                        run
                    );
                }
                warn!(run, error, bound, "Covariance error exceeds bound. Input may not end on a shrink.");
            }

            match &first_sketch {
                None => first_sketch = Some(sketch),
                Some(first) if first != &sketch => bail!("Sketch from run {} differs from the first run.", run),
                Some(_) => {}
            }

            summaries.push(RunSummary { error, bound, shrinks });
        }

        Ok(summaries)
    }
}
