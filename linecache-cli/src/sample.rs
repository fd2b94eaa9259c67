//! Sample data generation.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use indicatif::ProgressBar;

const PROGRESS_STEP: usize = 10_000;

/// Writes `Line 1` through `Line {count}` to `path`, creating parent directories.
pub fn generate(path: &Path, count: usize, progress: Option<&ProgressBar>) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);

    for i in 1..=count {
        writeln!(out, "Line {}", i)?;
        if i % PROGRESS_STEP == 0 {
            if let Some(pb) = progress {
                pb.inc(PROGRESS_STEP as u64);
            }
        }
    }
    out.flush()?;

    if let Some(pb) = progress {
        pb.finish();
    }
    Ok(())
}
