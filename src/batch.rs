//! Multi-file driver: one `FileIndex` per input, in the order given.

use crate::Result;
use crate::container::{ContainerReader, Drawable, ObjectOf};
use crate::error::Error;
use crate::filter::PathFilter;
use crate::index::FileIndex;
use crate::naming;
use crate::render::{Dispatcher, Renderer};

use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Filter pattern; empty accepts every drawable object.
    pub pattern: String,
    /// Gallery asset directory referenced by the index pages.
    pub highslide: String,
    /// Also write `.png` next to every `.eps`.
    pub raster: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    pub files: usize,
    pub plots: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

impl RunStats {
    /// Average plots per second; 0 when no time elapsed.
    pub fn rate_hz(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.plots as f64 / secs
        } else {
            0.0
        }
    }
}

/// Process every input in order and total the results.
///
/// The pattern and all input names are validated before anything is written.
/// The first file that fails to open or walk stops the batch.
pub fn run<R, D>(inputs: &[PathBuf], options: &Options, reader: &R, renderer: &D) -> Result<RunStats>
where
    R: ContainerReader,
    D: Renderer<ObjectOf<R>>,
    ObjectOf<R>: Drawable,
{
    if inputs.is_empty() {
        return Err(Error::NoInputs.into());
    }
    let filter = PathFilter::new(&options.pattern)?;
    for input in inputs {
        naming::strip_input_suffix(&input.to_string_lossy())?;
    }

    let dispatcher = Dispatcher::new(renderer, options.raster);
    let start = Instant::now();
    let mut stats = RunStats::default();

    for input in inputs {
        let mut index = FileIndex::new(input)?;
        tracing::debug!(
            input = %input.display(),
            output = %index.output_root().display(),
            "indexing container"
        );
        let plots = index.write_container(reader, &dispatcher, &filter)?;
        index.write_index(&options.highslide)?;
        tracing::info!(
            input = %input.display(),
            index = %index.index_path().display(),
            plots,
            failed = index.failed(),
            "container done"
        );

        stats.files += 1;
        stats.plots += plots;
        stats.failed += index.failed();
    }

    stats.elapsed = start.elapsed();
    Ok(stats)
}

/// Summary lines printed after a successful run.
pub fn summary(stats: &RunStats) -> String {
    let mut lines = vec![
        format!("  # plots    = {}", stats.plots),
        format!("  time spent = {} s", stats.elapsed.as_secs_f64().round() as u64),
        format!("  avg rate   = {:.2} Hz", stats.rate_hz()),
    ];
    if stats.failed > 0 {
        lines.push(format!("  # failed   = {}", stats.failed));
    }
    lines.push("  Done.".to_string());
    lines.join("\n")
}
