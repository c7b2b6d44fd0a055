use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Bindsite Developers",
    version,
    about = "bindsite - Detect ligands in protein structures and report their binding residues.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output and progress bars
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,

    #[command(flatten)]
    pub detection: DetectionArgs,
}

/// Options shaping ligand detection, shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct DetectionArgs {
    /// Path to a detection configuration file in TOML format.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the maximum covalent bond length (Å) joining ligand atoms.
    #[arg(long, global = true, value_name = "FLOAT")]
    pub bond_length: Option<f64>,

    /// Override the distance (Å) within which polymer residues bind a ligand.
    #[arg(long, global = true, value_name = "FLOAT")]
    pub binding_distance: Option<f64>,

    /// Treat water molecules as ligand candidates.
    #[arg(long, global = true)]
    pub keep_water: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S ligand.min-atoms=5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", global = true)]
    pub set_values: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Produce a JSON summary of the structure: residue indices, sequence, binding residues
    /// and scores.
    StructureInfo(InfoArgs),
    /// Write the sequence and binding-site positions of a structure as JSON.
    SelectBindingSite(BindingSiteArgs),
    /// Keep only selected chains of a structure and write the result.
    FilterStructure(FilterArgs),
    /// Run commands read line by line from a file.
    Exec(ExecArgs),
}

/// Arguments for the `structure-info` subcommand.
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Input structure file (.pdb, .ent, .cif, optionally gzipped).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Output JSON file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,
}

/// Arguments for the `select-binding-site` subcommand.
#[derive(Args, Debug)]
pub struct BindingSiteArgs {
    /// Input structure file.
    #[arg(long, required = true, value_name = "PATH")]
    pub structure: PathBuf,

    /// Output JSON file.
    #[arg(long, required = true, value_name = "PATH")]
    pub output: PathBuf,
}

/// Arguments for the `filter-structure` subcommand.
#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Input structure file.
    #[arg(long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Output structure file; the format follows its extension.
    #[arg(long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Comma separated list of chains to keep. All chains are kept when omitted.
    #[arg(long, value_name = "A,B,...", value_delimiter = ',')]
    pub chains: Vec<String>,
}

/// Arguments for the `exec` subcommand.
#[derive(Args, Debug)]
pub struct ExecArgs {
    /// File with one command per line, written as on the command line without the program name.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_structure_info_with_global_flags() {
        let cli = Cli::parse_from([
            "bindsite",
            "-vv",
            "structure-info",
            "-i",
            "in.cif",
            "-o",
            "out.json",
            "--bond-length",
            "2.0",
            "--keep-water",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.detection.bond_length, Some(2.0));
        assert!(cli.detection.keep_water);
        match cli.command {
            Commands::StructureInfo(args) => {
                assert_eq!(args.input, PathBuf::from("in.cif"));
                assert_eq!(args.output, PathBuf::from("out.json"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_chain_list() {
        let cli = Cli::parse_from([
            "bindsite",
            "filter-structure",
            "--input",
            "a.pdb",
            "--output",
            "b.pdb",
            "--chains",
            "A,C",
        ]);
        match cli.command {
            Commands::FilterStructure(args) => assert_eq!(args.chains, vec!["A", "C"]),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["bindsite", "-q", "-v", "exec", "-i", "cmds.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn binding_site_requires_structure_and_output() {
        let args = ["bindsite", "select-binding-site", "--structure", "a.pdb"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
