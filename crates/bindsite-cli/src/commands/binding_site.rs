use super::{load, write_json};
use crate::cli::BindingSiteArgs;
use crate::error::Result;
use crate::progress::CliProgressHandler;
use bindsite::engine::config::DetectionConfig;
use bindsite::engine::progress::ProgressReporter;
use bindsite::workflows;
use tracing::{info, warn};

pub fn run(
    args: &BindingSiteArgs,
    config: &DetectionConfig,
    progress: &CliProgressHandler,
) -> Result<()> {
    let loaded = load(&args.structure)?;

    let reporter = ProgressReporter::with_callback(progress.get_callback());
    let report = workflows::binding_site::run(&loaded.structure, config, &reporter)?;

    if report.binding_sites.is_empty() {
        warn!("No binding-site residues found in {:?}", &args.structure);
    }
    write_json(&report, &args.output)?;
    info!("Binding-site report written to {:?}", &args.output);
    Ok(())
}
