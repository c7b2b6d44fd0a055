use super::dispatch;
use crate::cli::{Cli, Commands, DetectionArgs, ExecArgs};
use crate::error::{CliError, Result};
use crate::progress::CliProgressHandler;
use bindsite::engine::config::DetectionConfig;
use clap::Parser;
use std::path::Path;
use tracing::{error, info, warn};

const PROGRAM_NAME: &str = "bindsite";

/// Outcome counts of a batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExecSummary {
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// A non-blank, non-comment line of a command file.
struct CommandLine {
    number: usize,
    text: String,
}

fn read_command_lines(path: &Path) -> Result<Vec<CommandLine>> {
    let content = std::fs::read_to_string(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    Ok(content
        .lines()
        .enumerate()
        .map(|(i, line)| CommandLine {
            number: i + 1,
            text: line.trim().to_string(),
        })
        .filter(|line| !line.text.is_empty() && !line.text.starts_with('#'))
        .collect())
}

fn has_detection_overrides(args: &DetectionArgs) -> bool {
    args.config.is_some()
        || args.bond_length.is_some()
        || args.binding_distance.is_some()
        || args.keep_water
        || !args.set_values.is_empty()
}

/// Runs every command in the file in order, drawing a batch bar through `progress`.
///
/// Lines that do not parse, and nested `exec` lines, are skipped with a warning.
/// A failing command is logged and the remaining lines still run.
pub fn run(
    args: &ExecArgs,
    config: &DetectionConfig,
    progress: &CliProgressHandler,
) -> Result<ExecSummary> {
    let lines = read_command_lines(&args.input)?;
    info!("Executing {} commands from {:?}", lines.len(), &args.input);

    let pb = progress.batch_bar(lines.len() as u64);
    let inner_progress = CliProgressHandler::hidden();
    let mut summary = ExecSummary::default();

    for line in &lines {
        let argv = std::iter::once(PROGRAM_NAME).chain(line.text.split_whitespace());
        let parsed = match Cli::try_parse_from(argv) {
            Ok(parsed) => parsed,
            Err(e) => {
                let reason = e.to_string();
                let reason = reason.lines().next().unwrap_or_default();
                pb.suspend(|| warn!("Line {}: skipping '{}': {}", line.number, line.text, reason));
                summary.skipped += 1;
                pb.inc(1);
                continue;
            }
        };

        if matches!(parsed.command, Commands::Exec(_)) {
            pb.suspend(|| warn!("Line {}: nested 'exec' is not supported; skipping.", line.number));
            summary.skipped += 1;
            pb.inc(1);
            continue;
        }
        if has_detection_overrides(&parsed.detection) {
            pb.suspend(|| {
                warn!(
                    "Line {}: detection options come from the outer invocation; ignoring them.",
                    line.number
                )
            });
        }

        pb.set_message(format!("line {}", line.number));
        match dispatch(&parsed.command, config, &inner_progress) {
            Ok(()) => summary.succeeded += 1,
            Err(e) => {
                pb.suspend(|| error!("Line {}: '{}' failed: {}", line.number, line.text, e));
                summary.failed += 1;
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    info!(
        "Batch finished: {} succeeded, {} skipped, {} failed.",
        summary.succeeded, summary.skipped, summary.failed
    );
    Ok(summary)
}
