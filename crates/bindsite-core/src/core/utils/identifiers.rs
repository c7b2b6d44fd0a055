use phf::{Map, Set, phf_map, phf_set};

static ONE_LETTER_CODES: Map<&'static str, char> = phf_map! {
    // --- Standard amino acids ---
    "ALA" => 'A', "ARG" => 'R', "ASN" => 'N', "ASP" => 'D', "CYS" => 'C',
    "GLN" => 'Q', "GLU" => 'E', "GLY" => 'G', "HIS" => 'H', "ILE" => 'I',
    "LEU" => 'L', "LYS" => 'K', "MET" => 'M', "PHE" => 'F', "PRO" => 'P',
    "SER" => 'S', "THR" => 'T', "TRP" => 'W', "TYR" => 'Y', "VAL" => 'V',
    "SEC" => 'U', "PYL" => 'O',
    // --- Protonation and naming variants ---
    "HSD" => 'H', "HSE" => 'H', "HSP" => 'H', "HID" => 'H', "HIE" => 'H', "HIP" => 'H',
    "CYX" => 'C', "ASH" => 'D', "GLH" => 'E', "LYN" => 'K',
    // --- Common modified residues mapped to their parent ---
    "MSE" => 'M', "SEP" => 'S', "TPO" => 'T', "PTR" => 'Y', "CSO" => 'C',
    "CME" => 'C', "MLY" => 'K', "HYP" => 'P', "KCX" => 'K', "LLP" => 'K',
    "PCA" => 'E', "CSD" => 'C', "OCS" => 'C', "M3L" => 'K', "ALY" => 'K',
    // --- Nucleotides ---
    "A" => 'A', "C" => 'C', "G" => 'G', "U" => 'U', "I" => 'I',
    "DA" => 'A', "DC" => 'C', "DG" => 'G', "DT" => 'T', "DU" => 'U', "DI" => 'I',
};

static AMINO_ACID_CODES: Set<&'static str> = phf_set! {
    "ALA", "ARG", "ASN", "ASP", "CYS", "GLN", "GLU", "GLY", "HIS", "ILE",
    "LEU", "LYS", "MET", "PHE", "PRO", "SER", "THR", "TRP", "TYR", "VAL",
    "SEC", "PYL", "HSD", "HSE", "HSP", "HID", "HIE", "HIP", "CYX", "ASH",
    "GLH", "LYN", "MSE", "SEP", "TPO", "PTR", "CSO", "CME", "MLY", "HYP",
    "KCX", "LLP", "PCA", "CSD", "OCS", "M3L", "ALY", "UNK",
};

static WATER_CODES: Set<&'static str> = phf_set! {
    "HOH", "WAT", "DOD", "H2O", "TIP", "TIP3", "TIP4", "SOL", "D2O",
};

/// Returns the one-letter code of a polymer component, if it has one.
pub fn one_letter_code(component: &str) -> Option<char> {
    ONE_LETTER_CODES
        .get(component.trim().to_ascii_uppercase().as_str())
        .copied()
}

/// True for components that form a polymer chain even when written as `HETATM`.
pub fn is_polymer_component(component: &str) -> bool {
    let code = component.trim().to_ascii_uppercase();
    AMINO_ACID_CODES.contains(code.as_str()) || ONE_LETTER_CODES.contains_key(code.as_str())
}

pub fn is_amino_acid(component: &str) -> bool {
    let code = component.trim().to_ascii_uppercase();
    AMINO_ACID_CODES.contains(code.as_str())
}

pub fn is_water(component: &str) -> bool {
    let code = component.trim().to_ascii_uppercase();
    WATER_CODES.contains(code.as_str())
}

/// Guesses an element symbol from a PDB-style atom name.
///
/// Used when the element column is blank. Names starting with a digit
/// (e.g. `1HB`) are hydrogens by convention.
pub fn element_from_atom_name(atom_name: &str) -> String {
    let trimmed = atom_name.trim();
    match trimmed.chars().find(|c| c.is_ascii_alphabetic()) {
        Some(c) if trimmed.starts_with(|d: char| d.is_ascii_digit()) && c == 'H' => "H".into(),
        Some(c) => c.to_ascii_uppercase().to_string(),
        None => String::new(),
    }
}
