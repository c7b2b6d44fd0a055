use crate::core::io::traits::StructureFile;
use crate::core::models::atom::Atom;
use crate::core::models::builder::{AtomRecord, StructureBuilder};
use crate::core::models::residue::{Residue, ResidueCategory};
use crate::core::models::structure::Structure;
use nalgebra::Point3;
use std::collections::{HashMap, HashSet};
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdbMetadata {
    /// Four-character entry code from the `HEADER` record, if present.
    pub id_code: Option<String>,
    /// Number of `MODEL` records seen before reading stopped.
    pub models_seen: usize,
}

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PdbParseErrorKind,
    },
    #[error("Chains '{first}' and '{second}' would share PDB chain identifier '{column}'")]
    ChainLabelConflict {
        first: String,
        second: String,
        column: char,
    },
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Line is too short for ATOM/HETATM record (must be at least 54 chars)")]
    LineTooShort,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

fn column_char(line: &str, index: usize) -> Option<char> {
    line.get(index..index + 1)
        .and_then(|s| s.chars().next())
        .filter(|c| !c.is_whitespace())
}

fn parse_float(line: &str, line_num: usize, start: usize, end: usize) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

fn parse_optional_float(line: &str, start: usize, end: usize, default: f64) -> f64 {
    slice_and_trim(line, start, end).parse().unwrap_or(default)
}

pub struct PdbFile;

impl StructureFile for PdbFile {
    type Metadata = PdbMetadata;
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<(Structure, Self::Metadata), Self::Error> {
        let mut builder = StructureBuilder::new();
        let mut metadata = PdbMetadata::default();
        let mut seen_alternates: HashSet<(String, isize, Option<char>, String)> = HashSet::new();
        let mut fallback_serial = 0usize;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            match slice_and_trim(&line, 0, 6) {
                "HEADER" => {
                    let code = slice_and_trim(&line, 62, 66);
                    if !code.is_empty() {
                        metadata.id_code = Some(code.to_string());
                    }
                }
                "MODEL" => {
                    metadata.models_seen += 1;
                }
                "ENDMDL" | "END" => {
                    debug!("Stopping PDB read at line {} after the first model.", line_num);
                    break;
                }
                record_type @ ("ATOM" | "HETATM") => {
                    if line.len() < 54 {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::LineTooShort,
                        });
                    }
                    fallback_serial += 1;

                    let name = slice_and_trim(&line, 12, 16);
                    let residue_name = slice_and_trim(&line, 17, 20);
                    let chain = slice_and_trim(&line, 21, 22);
                    let insertion_code = column_char(&line, 26);

                    let res_seq_str = slice_and_trim(&line, 22, 26);
                    let residue_number: isize =
                        res_seq_str.parse().map_err(|_| PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::InvalidInt {
                                columns: "23-26".into(),
                                value: res_seq_str.into(),
                            },
                        })?;

                    if column_char(&line, 16).is_some() {
                        let key = (
                            chain.to_string(),
                            residue_number,
                            insertion_code,
                            name.to_string(),
                        );
                        if !seen_alternates.insert(key) {
                            continue;
                        }
                    }

                    let x = parse_float(&line, line_num, 30, 38)?;
                    let y = parse_float(&line, line_num, 38, 46)?;
                    let z = parse_float(&line, line_num, 46, 54)?;

                    let serial = slice_and_trim(&line, 6, 11)
                        .parse()
                        .unwrap_or(fallback_serial);

                    builder.add_record(&AtomRecord {
                        serial,
                        name,
                        element: slice_and_trim(&line, 76, 78),
                        residue_name,
                        chain,
                        residue_number,
                        insertion_code,
                        position: Point3::new(x, y, z),
                        occupancy: parse_optional_float(&line, 54, 60, 1.0),
                        temperature_factor: parse_optional_float(&line, 60, 66, 0.0),
                        hetero: record_type == "HETATM",
                    });
                }
                _ => {}
            }
        }

        Ok((builder.build(), metadata))
    }

    fn write_to(structure: &Structure, writer: &mut impl Write) -> Result<(), Self::Error> {
        let chain_ids = pdb_chain_ids(structure)?;
        let mut serial = 0usize;
        for ((_, chain), chain_char) in structure.chains_iter().zip(chain_ids) {
            let residues: Vec<_> = chain
                .residues()
                .iter()
                .filter_map(|&id| structure.residue(id))
                .collect();
            let (polymer, other): (Vec<_>, Vec<_>) =
                residues.into_iter().partition(|r| r.is_polymer());

            let mut last_polymer = None;
            for residue in &polymer {
                for atom in residue.atoms().iter().filter_map(|&id| structure.atom(id)) {
                    serial += 1;
                    write_atom_line(writer, "ATOM", serial, atom, residue, chain_char)?;
                }
                last_polymer = Some(*residue);
            }
            if let Some(residue) = last_polymer {
                serial += 1;
                writeln!(
                    writer,
                    "TER   {:>5}      {:>3} {}{:>4}{}",
                    serial,
                    residue.name,
                    chain_char,
                    residue.number,
                    residue.insertion_code.unwrap_or(' ')
                )?;
            }
            for residue in &other {
                let record = match residue.category {
                    ResidueCategory::Polymer => "ATOM",
                    ResidueCategory::NonPolymer => "HETATM",
                };
                for atom in residue.atoms().iter().filter_map(|&id| structure.atom(id)) {
                    serial += 1;
                    write_atom_line(writer, record, serial, atom, residue, chain_char)?;
                }
            }
        }
        writeln!(writer, "END")?;
        Ok(())
    }
}

/// One-character chain identifiers for the PDB chain column, in chain order.
///
/// Longer labels keep their first character. Two chains that end up with the
/// same identifier are rejected since they would merge on reading.
fn pdb_chain_ids(structure: &Structure) -> Result<Vec<char>, PdbError> {
    let mut owners: HashMap<char, &str> = HashMap::new();
    let mut ids = Vec::new();
    for (_, chain) in structure.chains_iter() {
        let column = chain.label.chars().next().unwrap_or(' ');
        if chain.label.chars().count() > 1 {
            warn!(
                "Chain label '{}' does not fit the PDB chain column; writing it as '{}'.",
                chain.label, column
            );
        }
        if let Some(first) = owners.insert(column, &chain.label) {
            return Err(PdbError::ChainLabelConflict {
                first: first.to_string(),
                second: chain.label.clone(),
                column,
            });
        }
        ids.push(column);
    }
    Ok(ids)
}

fn format_atom_name(name: &str, element: &str) -> String {
    if name.len() < 4 && element.len() < 2 {
        format!(" {:<3}", name)
    } else {
        format!("{:<4}", name)
    }
}

fn write_atom_line(
    writer: &mut impl Write,
    record: &str,
    serial: usize,
    atom: &Atom,
    residue: &Residue,
    chain: char,
) -> io::Result<()> {
    writeln!(
        writer,
        "{:<6}{:>5} {} {:>3} {}{:>4}{}   {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
        record,
        serial % 100_000,
        format_atom_name(&atom.name, &atom.element),
        residue.name,
        chain,
        residue.number,
        residue.insertion_code.unwrap_or(' '),
        atom.position.x,
        atom.position.y,
        atom.position.z,
        atom.occupancy,
        atom.temperature_factor,
        atom.element,
    )
}
