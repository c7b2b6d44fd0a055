use super::load;
use crate::cli::FilterArgs;
use crate::error::Result;
use bindsite::core::io::format::save_structure;
use bindsite::workflows;
use tracing::{info, warn};

pub fn run(args: &FilterArgs) -> Result<()> {
    let loaded = load(&args.input)?;

    let filtered = workflows::filter::run(&loaded.structure, &args.chains);
    if filtered.atom_count() == 0 {
        warn!("No atoms left after filtering; writing an empty structure.");
    }

    save_structure(&filtered, &args.output)?;
    info!("Filtered structure written to {:?}", &args.output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::SAMPLE_PDB;
    use bindsite::core::io::format::load_structure;
    use tempfile::tempdir;

    #[test]
    fn keeps_only_requested_chains() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("sample.pdb");
        let output = dir.path().join("chain_b.cif");
        std::fs::write(&input, SAMPLE_PDB).unwrap();

        let args = FilterArgs {
            input,
            output: output.clone(),
            chains: vec!["B".to_string()],
        };
        run(&args).unwrap();

        let reloaded = load_structure(&output).unwrap();
        assert_eq!(reloaded.structure.atom_count(), 1);
        assert_eq!(
            workflows::filter::chain_sequence(&reloaded.structure, "B").as_deref(),
            Some("G")
        );
    }

    #[test]
    fn unknown_output_extension_is_rejected() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("sample.pdb");
        std::fs::write(&input, SAMPLE_PDB).unwrap();

        let args = FilterArgs {
            input,
            output: dir.path().join("out.txt"),
            chains: Vec::new(),
        };
        assert!(run(&args).is_err());
    }
}
