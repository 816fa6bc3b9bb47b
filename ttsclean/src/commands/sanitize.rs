// ttsclean/src/commands/sanitize.rs
//! The `sanitize` command: run a pipeline over a file or stdin.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use std::fs;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::sync::Arc;

use ttsclean_core::{LogSink, Sanitizer, Transformation};

use crate::cli::SanitizeCommand;
use crate::commands::{load_pipelines, load_settings};
use crate::ui::output_format;

/// How results are written.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub json: bool,
    pub trace: bool,
}

/// Builds the sanitizer described by the command's config arguments.
pub fn build_sanitizer(cmd: &SanitizeCommand) -> Result<Sanitizer> {
    let settings = load_settings(&cmd.config)?;
    let pipelines = load_pipelines(&cmd.config)?;
    let specs = pipelines.get(&cmd.pipeline)?;
    let sanitizer = Sanitizer::with_sink(specs, &settings, Arc::new(LogSink))
        .with_context(|| format!("Failed to build pipeline '{}'", cmd.pipeline))?;
    debug!(
        "Pipeline '{}' compiled with {} active rules.",
        cmd.pipeline,
        sanitizer.rules().len()
    );
    Ok(sanitizer)
}

fn emit<W: Write>(writer: &mut W, transformation: &Transformation, opts: OutputOptions, pretty: bool) -> Result<()> {
    if opts.trace {
        let stderr = io::stderr();
        let supports_color = stderr.is_terminal();
        output_format::print_trace(&mut stderr.lock(), transformation, supports_color)?;
    }

    if transformation.output.is_empty() {
        info!("Sanitized text is empty; nothing to synthesize.");
    }

    if opts.json {
        if pretty {
            serde_json::to_writer_pretty(&mut *writer, transformation)?;
        } else {
            serde_json::to_writer(&mut *writer, transformation)?;
        }
        writeln!(writer)?;
    } else {
        writeln!(writer, "{}", transformation.output)?;
    }
    Ok(())
}

/// Sanitizes the whole of `input` as one text.
pub fn sanitize_all<W: Write>(sanitizer: &Sanitizer, input: &str, writer: &mut W, opts: OutputOptions) -> Result<()> {
    let transformation = sanitizer.transform(input);
    emit(writer, &transformation, opts, true)
}

/// Sanitizes each line of `reader` independently, flushing after every line.
pub fn sanitize_lines<R: BufRead, W: Write>(
    sanitizer: &Sanitizer,
    reader: R,
    writer: &mut W,
    opts: OutputOptions,
) -> Result<()> {
    for line in reader.lines() {
        let line = line.context("Failed to read input line")?;
        let transformation = sanitizer.transform(&line);
        emit(writer, &transformation, opts, false)?;
        writer.flush()?;
    }
    Ok(())
}

/// Entry point for `ttsclean sanitize`.
pub fn run_sanitize(cmd: &SanitizeCommand) -> Result<()> {
    info!("Starting sanitize with pipeline '{}'.", cmd.pipeline);
    let sanitizer = build_sanitizer(cmd)?;
    let opts = OutputOptions {
        json: cmd.json,
        trace: cmd.trace,
    };

    let mut writer: Box<dyn Write> = match &cmd.output {
        Some(path) => {
            info!("Writing sanitized content to file: {}", path.display());
            let file = fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Box::new(io::BufWriter::new(file))
        }
        None => Box::new(io::stdout().lock()),
    };

    if cmd.line_buffered {
        match &cmd.input_file {
            Some(path) => {
                let file = fs::File::open(path)
                    .with_context(|| format!("Failed to open input file: {}", path.display()))?;
                sanitize_lines(&sanitizer, BufReader::new(file), &mut writer, opts)?;
            }
            None => sanitize_lines(&sanitizer, io::stdin().lock(), &mut writer, opts)?,
        }
    } else {
        let input = match &cmd.input_file {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read input file: {}", path.display()))?,
            None => {
                let mut buf = String::new();
                io::stdin()
                    .read_to_string(&mut buf)
                    .context("Failed to read from stdin")?;
                buf
            }
        };
        debug!("Read {} bytes of input.", input.len());
        sanitize_all(&sanitizer, &input, &mut writer, opts)?;
    }

    writer.flush()?;
    info!("Sanitize completed.");
    Ok(())
}
