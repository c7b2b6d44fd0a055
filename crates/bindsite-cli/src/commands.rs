pub mod binding_site;
pub mod exec;
pub mod filter;
pub mod info;

use crate::cli::Commands;
use crate::error::{CliError, Result};
use crate::progress::CliProgressHandler;
use bindsite::core::io::format::{LoadedStructure, load_structure};
use bindsite::engine::config::DetectionConfig;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Runs one subcommand with an already resolved detection configuration.
pub fn dispatch(
    command: &Commands,
    config: &DetectionConfig,
    progress: &CliProgressHandler,
) -> Result<()> {
    match command {
        Commands::StructureInfo(args) => {
            info!("Dispatching to 'structure-info' command.");
            info::run(args, config, progress)
        }
        Commands::SelectBindingSite(args) => {
            info!("Dispatching to 'select-binding-site' command.");
            binding_site::run(args, config, progress)
        }
        Commands::FilterStructure(args) => {
            info!("Dispatching to 'filter-structure' command.");
            filter::run(args)
        }
        Commands::Exec(args) => {
            info!("Dispatching to 'exec' command.");
            exec::run(args, config, progress).map(|_| ())
        }
    }
}

pub(crate) fn load(path: &Path) -> Result<LoadedStructure> {
    info!("Loading input structure from {:?}", path);
    Ok(load_structure(path)?)
}

/// Writes `value` as pretty-printed JSON, creating or truncating `path`.
pub(crate) fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let output_error = |source: anyhow::Error| CliError::Output {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(|e| output_error(e.into()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|e| output_error(e.into()))?;
    writer.write_all(b"\n").map_err(|e| output_error(e.into()))?;
    writer.flush().map_err(|e| output_error(e.into()))?;
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    #[test]
    fn json_is_written_with_trailing_newline() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");
        let value: BTreeMap<&str, Vec<usize>> = [("binding", vec![0, 3])].into_iter().collect();

        write_json(&value, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.ends_with('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["binding"], serde_json::json!([0, 3]));
    }

    #[test]
    fn unwritable_output_is_reported_with_its_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");
        let result = write_json(&vec![1, 2], &path);
        assert!(matches!(result, Err(CliError::Output { path: p, .. }) if p == path));
    }

    #[test]
    fn loading_unknown_extension_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.xyz");
        std::fs::write(&path, "").unwrap();
        assert!(matches!(load(&path), Err(CliError::Structure(_))));
    }
}
