use bindsite::core::io::format::{StructureFormat, load_structure, save_structure};
use bindsite::engine::config::{DetectionConfig, DetectionConfigBuilder};
use bindsite::engine::progress::{Progress, ProgressReporter};
use bindsite::workflows::{binding_site, filter, info};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

const HEME_PROTEIN_PDB: &str = "\
HEADER    OXYGEN TRANSPORT                        01-JAN-00   1TST
ATOM      1  N   HIS A  93       1.000   0.000   0.000  1.00 10.00           N
ATOM      2  CA  HIS A  93       2.000   1.000   0.000  1.00 10.00           C
ATOM      3  CA  LEU A  94       8.000   0.000   0.000  1.00 10.00           C
ATOM      4  CA  MSE A  95      -3.000   0.000   0.000  1.00 10.00           C
TER
HETATM    5 FE   HEM A 201       0.000   3.000   0.000  1.00 15.00          FE
HETATM    6  NA  HEM A 201       1.400   3.000   0.000  1.00 15.00           N
HETATM    7  O1  OXY A 202      -1.200   3.000   0.000  1.00 15.00           O
HETATM    8  O   HOH A 301       8.000   2.000   0.000  1.00 15.00           O
HETATM    9  S   SO4 A 401      30.000   0.000   0.000  1.00 15.00           S
END
";

const MODEL_CIF: &str = "\
data_model
loop_
_atom_site.group_PDB
_atom_site.id
_atom_site.type_symbol
_atom_site.label_atom_id
_atom_site.label_comp_id
_atom_site.label_asym_id
_atom_site.label_seq_id
_atom_site.Cartn_x
_atom_site.Cartn_y
_atom_site.Cartn_z
ATOM   1 C CA MET A 1 0.000 0.000 0.000
ATOM   2 C CA LYS A 2 3.800 0.000 0.000
ATOM   3 C CA TRP A 3 7.600 0.000 0.000
HETATM 4 C C1 NAG B . 9.000 2.000 0.000
#
loop_
_ma_qa_metric_local.label_asym_id
_ma_qa_metric_local.label_seq_id
_ma_qa_metric_local.metric_value
A 1 95.5
A 3 70.25
#
";

fn write_gz(path: &Path, text: &str) {
    let mut encoder = GzEncoder::new(std::fs::File::create(path).unwrap(), Compression::default());
    encoder.write_all(text.as_bytes()).unwrap();
    encoder.finish().unwrap();
}

#[test]
fn gzipped_pdb_binding_site_report() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("1tst.pdb.gz");
    write_gz(&path, HEME_PROTEIN_PDB);

    let loaded = load_structure(&path).unwrap();
    assert_eq!(loaded.format, Some(StructureFormat::Pdb));

    let config = DetectionConfig::default();
    let report = binding_site::run(&loaded.structure, &config, &ProgressReporter::new()).unwrap();
    assert_eq!(report.seq, vec!["H", "L", "M"]);
    assert_eq!(report.indices, vec!["A_93", "A_94", "A_95"]);
    // HEM and OXY are bonded into one ligand reaching both HIS 93 and MSE 95.
    assert_eq!(report.binding_sites, vec![0, 2]);
    assert_eq!(report.regions.len(), 1);
}

#[test]
fn water_near_protein_is_ignored_unless_kept() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("1tst.pdb");
    std::fs::write(&path, HEME_PROTEIN_PDB).unwrap();
    let loaded = load_structure(&path).unwrap();

    let config = DetectionConfig::default();
    let default_report =
        binding_site::run(&loaded.structure, &config, &ProgressReporter::new()).unwrap();
    assert!(!default_report.binding_sites.contains(&1));

    let keep_water = DetectionConfigBuilder::new()
        .exclude_water(false)
        .build()
        .unwrap();
    let report =
        binding_site::run(&loaded.structure, &keep_water, &ProgressReporter::new()).unwrap();
    assert_eq!(report.binding_sites, vec![0, 1, 2]);
}

#[test]
fn mmcif_model_info_includes_plddt() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("model.cif");
    std::fs::write(&path, MODEL_CIF).unwrap();

    let loaded = load_structure(&path).unwrap();
    assert_eq!(loaded.format, Some(StructureFormat::Mmcif));

    let result = info::run(
        &loaded.structure,
        loaded.qa_metrics.as_ref(),
        &DetectionConfig::default(),
        &ProgressReporter::new(),
    )
    .unwrap();
    assert_eq!(result.indices, vec!["A_1", "A_2", "A_3"]);
    assert_eq!(result.sequence, vec!["M", "K", "W"]);
    assert_eq!(result.binding, vec![2]);
    assert_eq!(result.scores["plddt"], vec![95.5, 0.0, 70.25]);
}

#[test]
fn filtered_structure_round_trips_through_disk() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("model.cif");
    std::fs::write(&input, MODEL_CIF).unwrap();
    let loaded = load_structure(&input).unwrap();

    let filtered = filter::run(&loaded.structure, &["B".to_string()]);
    let output = dir.path().join("ligand_only.pdb");
    save_structure(&filtered, &output).unwrap();

    let reloaded = load_structure(&output).unwrap();
    assert_eq!(reloaded.structure.atom_count(), 1);
    let config = DetectionConfig::default();
    let info = info::run(&reloaded.structure, None, &config, &ProgressReporter::new()).unwrap();
    assert!(info.indices.is_empty());
}

#[test]
fn workflows_report_progress_phases() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("1tst.pdb");
    std::fs::write(&path, HEME_PROTEIN_PDB).unwrap();
    let loaded = load_structure(&path).unwrap();

    let events = Mutex::new(Vec::new());
    let reporter =
        ProgressReporter::with_callback(Box::new(|event| events.lock().unwrap().push(event)));
    binding_site::run(&loaded.structure, &DetectionConfig::default(), &reporter).unwrap();
    drop(reporter);

    let phases: Vec<_> = events
        .into_inner()
        .unwrap()
        .into_iter()
        .filter_map(|event| match event {
            Progress::PhaseStart { name } => Some(name),
            _ => None,
        })
        .collect();
    assert_eq!(phases, vec!["Detecting ligands", "Selecting binding site"]);
}
