use super::cif::{CifError, CifFile, ResidueMetrics};
use super::pdb::{PdbError, PdbFile};
use super::traits::StructureFile;
use crate::core::models::structure::Structure;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Supported coordinate file formats, detected from the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureFormat {
    Pdb,
    Mmcif,
}

impl StructureFormat {
    /// Detects the format from the path's extension, ignoring a trailing `.gz`.
    ///
    /// Accepts `.pdb`, `.ent`, and `.cif` (case-insensitive), each optionally gzipped.
    pub fn from_path(path: &Path) -> Result<Self, IoError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let stem = name.strip_suffix(".gz").unwrap_or(&name);

        if stem.ends_with(".pdb") || stem.ends_with(".ent") {
            Ok(Self::Pdb)
        } else if stem.ends_with(".cif") {
            Ok(Self::Mmcif)
        } else {
            Err(IoError::UnknownFormat(path.to_path_buf()))
        }
    }
}

#[derive(Debug, Error)]
pub enum IoError {
    #[error(
        "Unrecognized structure file format: {0} (expected .pdb, .ent or .cif, optionally gzipped)"
    )]
    UnknownFormat(PathBuf),
    #[error("Failed to read PDB file {path}: {source}")]
    Pdb {
        path: PathBuf,
        #[source]
        source: PdbError,
    },
    #[error("Failed to read mmCIF file {path}: {source}")]
    Cif {
        path: PathBuf,
        #[source]
        source: CifError,
    },
}

/// A structure read from disk together with any per-residue quality metrics.
#[derive(Debug, Default)]
pub struct LoadedStructure {
    pub structure: Structure,
    pub format: Option<StructureFormat>,
    /// Local QA metrics keyed `"{chain}_{seq}"`; only mmCIF model files carry them.
    pub qa_metrics: Option<ResidueMetrics>,
}

/// Reads a PDB or mmCIF file, choosing the parser from the file name.
pub fn load_structure(path: &Path) -> Result<LoadedStructure, IoError> {
    let format = StructureFormat::from_path(path)?;
    debug!("Reading {:?} file: {}", format, path.display());

    let loaded = match format {
        StructureFormat::Pdb => {
            let (structure, _) = PdbFile::read_from_path(path).map_err(|source| IoError::Pdb {
                path: path.to_path_buf(),
                source,
            })?;
            LoadedStructure {
                structure,
                format: Some(format),
                qa_metrics: None,
            }
        }
        StructureFormat::Mmcif => {
            let (structure, metadata) =
                CifFile::read_from_path(path).map_err(|source| IoError::Cif {
                    path: path.to_path_buf(),
                    source,
                })?;
            LoadedStructure {
                structure,
                format: Some(format),
                qa_metrics: metadata.qa_metrics,
            }
        }
    };

    info!(
        "Loaded {} atoms in {} chains from {}.",
        loaded.structure.atom_count(),
        loaded.structure.chains_iter().count(),
        path.display()
    );
    Ok(loaded)
}

/// Writes a structure in the format implied by the output file name.
pub fn save_structure(structure: &Structure, path: &Path) -> Result<(), IoError> {
    match StructureFormat::from_path(path)? {
        StructureFormat::Pdb => {
            PdbFile::write_to_path(structure, path).map_err(|source| IoError::Pdb {
                path: path.to_path_buf(),
                source,
            })
        }
        StructureFormat::Mmcif => {
            CifFile::write_to_path(structure, path).map_err(|source| IoError::Cif {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}
