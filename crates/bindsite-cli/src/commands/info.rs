use super::{load, write_json};
use crate::cli::InfoArgs;
use crate::error::Result;
use crate::progress::CliProgressHandler;
use bindsite::engine::config::DetectionConfig;
use bindsite::engine::progress::ProgressReporter;
use bindsite::workflows;
use tracing::info;

pub fn run(args: &InfoArgs, config: &DetectionConfig, progress: &CliProgressHandler) -> Result<()> {
    let loaded = load(&args.input)?;
    if loaded.qa_metrics.is_some() {
        info!("Structure carries local QA metrics; pLDDT scores will be reported.");
    }

    let reporter = ProgressReporter::with_callback(progress.get_callback());
    let summary = workflows::info::run(
        &loaded.structure,
        loaded.qa_metrics.as_ref(),
        config,
        &reporter,
    )?;

    write_json(&summary, &args.output)?;
    info!(
        "Wrote info for {} residues ({} binding) to {:?}",
        summary.indices.len(),
        summary.binding.len(),
        &args.output
    );
    Ok(())
}
