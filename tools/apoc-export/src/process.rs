//! Running conversions on files and standard streams

use anyhow::{Context, Result, bail};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Cursor, Read, Seek, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::convert::{ConversionSummary, ConvertOptions, Mode, convert};

/// Per-run switches that affect file handling rather than the conversion
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// List objects on stdout instead of converting them
    pub list: bool,
    /// Leave a partially written output file in place after a failure
    pub keep_partial: bool,
    /// Log the time taken for each file
    pub time: bool,
}

trait ReadSeek: Read + Seek {}

impl<T: Read + Seek> ReadSeek for T {}

/// Convert or list one archive
///
/// Reads `input`, or standard input if `None`. Standard input is read into
/// memory first because objects are not stored in order. OBJ text goes to
/// `output`, or standard output if `None`.
pub fn process_file(
    input: Option<&Path>,
    output: Option<&Path>,
    run: RunOptions,
    options: &ConvertOptions,
) -> Result<ConversionSummary> {
    let started = Instant::now();
    let reader = open_input(input)?;

    let summary = if run.list {
        let mut out = BufWriter::new(io::stdout().lock());
        let summary = convert(reader, Mode::List(&mut out), options)?;
        out.flush().context("Failed writing to standard output")?;
        summary
    } else if let Some(path) = output {
        convert_to_file(reader, path, run, options)?
    } else {
        let mut out = BufWriter::new(io::stdout().lock());
        let summary = convert(reader, Mode::Convert(&mut out), options)?;
        out.flush().context("Failed writing to standard output")?;
        summary
    };

    if run.time {
        tracing::info!(
            "Time taken: {:.2} seconds",
            started.elapsed().as_secs_f64()
        );
    }
    Ok(summary)
}

fn open_input(input: Option<&Path>) -> Result<Box<dyn ReadSeek>> {
    match input {
        Some(path) => {
            tracing::debug!("Reading {}", path.display());
            let file = File::open(path)
                .with_context(|| format!("Failed to open input file '{}'", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => {
            tracing::debug!("Reading standard input");
            let mut data = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut data)
                .context("Failed to read standard input")?;
            Ok(Box::new(Cursor::new(data)))
        }
    }
}

fn convert_to_file(
    reader: Box<dyn ReadSeek>,
    path: &Path,
    run: RunOptions,
    options: &ConvertOptions,
) -> Result<ConversionSummary> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);

    let result = convert(reader, Mode::Convert(&mut writer), options).and_then(|summary| {
        writer
            .flush()
            .with_context(|| format!("Failed to close output file '{}'", path.display()))?;
        Ok(summary)
    });

    if result.is_err() {
        drop(writer);
        if run.keep_partial {
            tracing::debug!("Keeping partial output file {}", path.display());
        } else if let Err(e) = std::fs::remove_file(path) {
            tracing::warn!("Failed to delete output file '{}': {}", path.display(), e);
        }
    }
    result
}

/// Output file for `input` in batch mode: the input name with `.obj` appended
pub fn batch_output_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".obj");
    PathBuf::from(name)
}

/// Convert (or list) each file in turn
///
/// A failure is logged and the remaining files are still processed. Fails
/// if any file failed.
pub fn process_batch(
    inputs: &[PathBuf],
    run: RunOptions,
    options: &ConvertOptions,
) -> Result<()> {
    let mut failed = 0;

    for input in inputs {
        let result = if run.list {
            tracing::info!("Listing {}", input.display());
            process_file(Some(input), None, run, options)
        } else {
            let output = batch_output_path(input);
            tracing::info!("Converting {} to {}", input.display(), output.display());
            process_file(Some(input), Some(&output), run, options)
        };

        if let Err(e) = result {
            tracing::error!("{}: {:#}", input.display(), e);
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{} of {} files failed", failed, inputs.len());
    }
    Ok(())
}
