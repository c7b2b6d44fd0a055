use crate::core::io::traits::StructureFile;
use crate::core::models::builder::{AtomRecord, StructureBuilder};
use crate::core::models::residue::ResidueCategory;
use crate::core::models::structure::Structure;
use nalgebra::Point3;
use std::collections::{HashMap, HashSet};
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::{debug, warn};

/// Per-residue local quality metric values keyed `"{chain}_{seq}"`.
pub type ResidueMetrics = HashMap<String, f64>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CifMetadata {
    /// Name of the first `data_` block.
    pub data_block: Option<String>,
    /// Values of `_ma_qa_metric_local` (e.g. pLDDT), when the file carries them.
    pub qa_metrics: Option<ResidueMetrics>,
}

#[derive(Debug, Error)]
pub enum CifError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: CifParseErrorKind,
    },
}

#[derive(Debug, Error)]
pub enum CifParseErrorKind {
    #[error("Unterminated quoted value")]
    UnterminatedQuote,
    #[error("Unterminated semicolon text field")]
    UnterminatedTextField,
    #[error("Loop value count {values} is not a multiple of tag count {tags}")]
    LoopMismatch { tags: usize, values: usize },
    #[error("Missing required column '{0}' in _atom_site")]
    MissingColumn(&'static str),
    #[error("Invalid integer in column '{column}' (value: '{value}')")]
    InvalidInt { column: &'static str, value: String },
    #[error("Invalid float in column '{column}' (value: '{value}')")]
    InvalidFloat { column: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
struct Token {
    text: String,
    line: usize,
    /// Quoted and text-field values are never keywords or tags.
    quoted: bool,
}

fn tokenize(reader: &mut impl BufRead) -> Result<Vec<Token>, CifError> {
    let mut tokens = Vec::new();
    let mut text_field: Option<(usize, String)> = None;

    for (index, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        let line_num = index + 1;

        if let Some((start, mut buffer)) = text_field.take() {
            if line.starts_with(';') {
                tokens.push(Token {
                    text: buffer.trim_end_matches('\n').to_string(),
                    line: start,
                    quoted: true,
                });
            } else {
                buffer.push_str(&line);
                buffer.push('\n');
                text_field = Some((start, buffer));
            }
            continue;
        }

        if let Some(rest) = line.strip_prefix(';') {
            let mut buffer = rest.to_string();
            if !buffer.is_empty() {
                buffer.push('\n');
            }
            text_field = Some((line_num, buffer));
            continue;
        }

        let chars: Vec<char> = line.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            if c.is_whitespace() {
                i += 1;
            } else if c == '#' {
                break;
            } else if c == '\'' || c == '"' {
                // A quote closes only when followed by whitespace or end of line.
                let mut j = i + 1;
                loop {
                    if j >= chars.len() {
                        return Err(CifError::Parse {
                            line: line_num,
                            kind: CifParseErrorKind::UnterminatedQuote,
                        });
                    }
                    if chars[j] == c && (j + 1 == chars.len() || chars[j + 1].is_whitespace()) {
                        break;
                    }
                    j += 1;
                }
                tokens.push(Token {
                    text: chars[i + 1..j].iter().collect(),
                    line: line_num,
                    quoted: true,
                });
                i = j + 1;
            } else {
                let start = i;
                while i < chars.len() && !chars[i].is_whitespace() {
                    i += 1;
                }
                tokens.push(Token {
                    text: chars[start..i].iter().collect(),
                    line: line_num,
                    quoted: false,
                });
            }
        }
    }

    if let Some((start, _)) = text_field {
        return Err(CifError::Parse {
            line: start,
            kind: CifParseErrorKind::UnterminatedTextField,
        });
    }
    Ok(tokens)
}

fn is_reserved(token: &Token) -> bool {
    !token.quoted
        && (token.text.starts_with('_')
            || token.text.eq_ignore_ascii_case("loop_")
            || token.text.starts_with("data_")
            || token.text.starts_with("save_"))
}

/// A parsed loop: tag names (lower-cased, without category) and row-major values.
struct Table {
    columns: HashMap<String, usize>,
    rows: Vec<Vec<Token>>,
}

impl Table {
    fn value<'a>(&self, row: &'a [Token], names: &[&str]) -> Option<&'a str> {
        names
            .iter()
            .filter_map(|name| self.columns.get(*name))
            .map(|&index| row[index].text.as_str())
            .find(|value| !is_null(value))
    }
}

fn is_null(value: &str) -> bool {
    value == "?" || value == "."
}

/// Splits `_category.item` into lower-cased `(category, item)`.
fn split_tag(tag: &str) -> (String, String) {
    let lower = tag.to_ascii_lowercase();
    match lower.split_once('.') {
        Some((category, item)) => (category.to_string(), item.to_string()),
        None => (lower, String::new()),
    }
}

fn collect_tables(
    tokens: Vec<Token>,
) -> Result<(Option<String>, HashMap<String, Table>), CifError> {
    let mut data_block = None;
    let mut tables: HashMap<String, Table> = HashMap::new();
    let mut iter = tokens.into_iter().peekable();

    while let Some(token) = iter.next() {
        if token.quoted {
            continue;
        }
        if let Some(name) = token.text.strip_prefix("data_") {
            if data_block.is_none() {
                data_block = Some(name.to_string());
            }
        } else if token.text.eq_ignore_ascii_case("loop_") {
            let mut tags = Vec::new();
            while let Some(next) = iter.peek() {
                if next.quoted || !next.text.starts_with('_') {
                    break;
                }
                tags.push(split_tag(&next.text));
                iter.next();
            }
            let mut values = Vec::new();
            while let Some(next) = iter.peek() {
                if is_reserved(next) {
                    break;
                }
                values.extend(iter.next());
            }
            if tags.is_empty() {
                continue;
            }
            if values.len() % tags.len() != 0 {
                return Err(CifError::Parse {
                    line: token.line,
                    kind: CifParseErrorKind::LoopMismatch {
                        tags: tags.len(),
                        values: values.len(),
                    },
                });
            }
            let category = tags[0].0.clone();
            let columns = tags
                .into_iter()
                .enumerate()
                .map(|(i, (_, item))| (item, i))
                .collect::<HashMap<_, _>>();
            let width = columns.len().max(1);
            let mut rows = Vec::with_capacity(values.len() / width);
            let mut values = values.into_iter();
            loop {
                let row: Vec<Token> = values.by_ref().take(width).collect();
                if row.len() < width {
                    break;
                }
                rows.push(row);
            }
            tables.insert(category, Table { columns, rows });
        } else if token.text.starts_with('_') {
            // Single-valued item: store as a one-row table merged per category.
            let Some(value) = iter.next_if(|next| !is_reserved(next)) else {
                continue;
            };
            let (category, item) = split_tag(&token.text);
            let table = tables.entry(category).or_insert_with(|| Table {
                columns: HashMap::new(),
                rows: vec![Vec::new()],
            });
            if table.rows.len() == 1 {
                let index = table.rows[0].len();
                table.columns.insert(item, index);
                table.rows[0].push(value);
            }
        }
    }

    Ok((data_block, tables))
}

fn read_atom_site(table: &Table, builder: &mut StructureBuilder) -> Result<(), CifError> {
    for (key, column) in [("cartn_x", "Cartn_x"), ("cartn_y", "Cartn_y"), ("cartn_z", "Cartn_z")] {
        if !table.columns.contains_key(key) {
            return Err(CifError::Parse {
                line: 0,
                kind: CifParseErrorKind::MissingColumn(column),
            });
        }
    }

    let mut first_model: Option<String> = None;
    let mut seen_alternates: HashSet<(String, isize, Option<char>, String)> = HashSet::new();

    for (index, row) in table.rows.iter().enumerate() {
        let line = row.first().map(|t| t.line).unwrap_or(0);

        if let Some(model) = table.value(row, &["pdbx_pdb_model_num"]) {
            match &first_model {
                None => first_model = Some(model.to_string()),
                Some(first) if first != model => {
                    debug!("Skipping _atom_site rows of model {}.", model);
                    continue;
                }
                _ => {}
            }
        }

        let float = |names: &[&str], column: &'static str| -> Result<f64, CifError> {
            let value = table.value(row, names).unwrap_or("");
            value.parse().map_err(|_| CifError::Parse {
                line,
                kind: CifParseErrorKind::InvalidFloat {
                    column,
                    value: value.to_string(),
                },
            })
        };
        let x = float(&["cartn_x"], "Cartn_x")?;
        let y = float(&["cartn_y"], "Cartn_y")?;
        let z = float(&["cartn_z"], "Cartn_z")?;

        let seq_str = table
            .value(row, &["auth_seq_id", "label_seq_id"])
            .unwrap_or("0");
        let residue_number: isize = seq_str.parse().map_err(|_| CifError::Parse {
            line,
            kind: CifParseErrorKind::InvalidInt {
                column: "auth_seq_id",
                value: seq_str.to_string(),
            },
        })?;

        let name = table
            .value(row, &["auth_atom_id", "label_atom_id"])
            .unwrap_or("");
        let chain = table
            .value(row, &["auth_asym_id", "label_asym_id"])
            .unwrap_or("");
        let insertion_code = table
            .value(row, &["pdbx_pdb_ins_code"])
            .and_then(|code| code.chars().next());

        if table.value(row, &["label_alt_id"]).is_some() {
            let key = (chain.to_string(), residue_number, insertion_code, name.to_string());
            if !seen_alternates.insert(key) {
                continue;
            }
        }

        builder.add_record(&AtomRecord {
            serial: table
                .value(row, &["id"])
                .and_then(|s| s.parse().ok())
                .unwrap_or(index + 1),
            name,
            element: table.value(row, &["type_symbol"]).unwrap_or(""),
            residue_name: table
                .value(row, &["auth_comp_id", "label_comp_id"])
                .unwrap_or(""),
            chain,
            residue_number,
            insertion_code,
            position: Point3::new(x, y, z),
            occupancy: table
                .value(row, &["occupancy"])
                .and_then(|s| s.parse().ok())
                .unwrap_or(1.0),
            temperature_factor: table
                .value(row, &["b_iso_or_equiv"])
                .and_then(|s| s.parse().ok())
                .unwrap_or(0.0),
            hetero: table
                .value(row, &["group_pdb"])
                .is_some_and(|group| group.eq_ignore_ascii_case("HETATM")),
        });
    }
    Ok(())
}

fn read_qa_metrics(table: &Table) -> ResidueMetrics {
    let mut metrics = ResidueMetrics::new();
    for row in &table.rows {
        let (Some(chain), Some(seq), Some(value)) = (
            table.value(row, &["label_asym_id"]),
            table.value(row, &["label_seq_id"]),
            table.value(row, &["metric_value"]),
        ) else {
            continue;
        };
        match value.parse::<f64>() {
            Ok(value) => {
                metrics.insert(format!("{}_{}", chain, seq), value);
            }
            Err(_) => warn!("Ignoring non-numeric local metric value '{}'.", value),
        }
    }
    metrics
}

fn quote_if_needed(value: &str) -> String {
    if value.is_empty() {
        ".".to_string()
    } else if value.chars().any(char::is_whitespace) || value.starts_with(['_', '#', '\'', '"']) {
        format!("'{}'", value)
    } else {
        value.to_string()
    }
}

pub struct CifFile;

impl StructureFile for CifFile {
    type Metadata = CifMetadata;
    type Error = CifError;

    fn read_from(reader: &mut impl BufRead) -> Result<(Structure, Self::Metadata), Self::Error> {
        let tokens = tokenize(reader)?;
        let (data_block, tables) = collect_tables(tokens)?;

        let mut builder = StructureBuilder::new();
        if let Some(atom_site) = tables.get("_atom_site") {
            read_atom_site(atom_site, &mut builder)?;
        } else {
            warn!("mmCIF input has no _atom_site category; the structure is empty.");
        }

        let metadata = CifMetadata {
            data_block,
            qa_metrics: tables.get("_ma_qa_metric_local").map(read_qa_metrics),
        };
        Ok((builder.build(), metadata))
    }

    fn write_to(structure: &Structure, writer: &mut impl Write) -> Result<(), Self::Error> {
        writeln!(writer, "data_bindsite")?;
        writeln!(writer, "#")?;
        writeln!(writer, "loop_")?;
        for item in [
            "group_PDB",
            "id",
            "type_symbol",
            "auth_atom_id",
            "auth_comp_id",
            "auth_asym_id",
            "auth_seq_id",
            "pdbx_PDB_ins_code",
            "Cartn_x",
            "Cartn_y",
            "Cartn_z",
            "occupancy",
            "B_iso_or_equiv",
            "pdbx_PDB_model_num",
        ] {
            writeln!(writer, "_atom_site.{}", item)?;
        }

        let mut serial = 0usize;
        for (_, chain) in structure.chains_iter() {
            for residue in chain.residues().iter().filter_map(|&id| structure.residue(id)) {
                let group = match residue.category {
                    ResidueCategory::Polymer => "ATOM",
                    ResidueCategory::NonPolymer => "HETATM",
                };
                for atom in residue.atoms().iter().filter_map(|&id| structure.atom(id)) {
                    serial += 1;
                    writeln!(
                        writer,
                        "{} {} {} {} {} {} {} {} {:.3} {:.3} {:.3} {:.2} {:.2} 1",
                        group,
                        serial,
                        quote_if_needed(&atom.element),
                        quote_if_needed(&atom.name),
                        quote_if_needed(&residue.name),
                        quote_if_needed(&chain.label),
                        residue.number,
                        residue
                            .insertion_code
                            .map(|c| c.to_string())
                            .unwrap_or_else(|| "?".to_string()),
                        atom.position.x,
                        atom.position.y,
                        atom.position.z,
                        atom.occupancy,
                        atom.temperature_factor,
                    )?;
                }
            }
        }
        writeln!(writer, "#")?;
        Ok(())
    }
}
