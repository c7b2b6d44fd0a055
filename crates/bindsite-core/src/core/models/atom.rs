use super::ids::ResidueId;
use nalgebra::Point3;

/// Represents an atom of a loaded structure.
///
/// Positions are fixed once the structure is loaded; the engine only reads them.
/// The `residue_id` is a non-owning back-reference into the owning
/// [`Structure`](super::structure::Structure).
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Serial number from the source file.
    pub serial: usize,
    /// The name of the atom (e.g., "CA", "N", "O1").
    pub name: String,
    /// Element symbol (e.g., "C", "FE"); may be empty when unknown.
    pub element: String,
    /// The ID of the parent residue this atom belongs to.
    pub residue_id: ResidueId,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    pub occupancy: f64,
    pub temperature_factor: f64,
}

impl Atom {
    /// Creates a new `Atom` with full occupancy and a zero temperature factor.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the atom.
    /// * `residue_id` - The ID of the residue this atom belongs to.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(name: &str, residue_id: ResidueId, position: Point3<f64>) -> Self {
        Self {
            serial: 0,
            name: name.to_string(),
            element: String::new(),
            residue_id,
            position,
            occupancy: 1.0,
            temperature_factor: 0.0,
        }
    }

    pub fn is_hydrogen(&self) -> bool {
        matches!(self.element.trim().to_ascii_uppercase().as_str(), "H" | "D")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_atom_has_expected_default_fields() {
        let residue_id = ResidueId::default();
        let atom = Atom::new("CA", residue_id, Point3::new(1.0, 2.0, 3.0));

        assert_eq!(atom.name, "CA");
        assert_eq!(atom.residue_id, residue_id);
        assert_eq!(atom.position, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(atom.serial, 0);
        assert_eq!(atom.element, "");
        assert_eq!(atom.occupancy, 1.0);
        assert_eq!(atom.temperature_factor, 0.0);
    }

    #[test]
    fn hydrogen_detection_uses_element_symbol() {
        let mut atom = Atom::new("HB1", ResidueId::default(), Point3::origin());
        atom.element = "H".into();
        assert!(atom.is_hydrogen());
        atom.element = "d".into();
        assert!(atom.is_hydrogen());
        atom.element = "HG".into();
        assert!(!atom.is_hydrogen());
    }

    #[test]
    fn atom_equality_and_clone_works() {
        let mut atom1 = Atom::new("N", ResidueId::default(), Point3::new(0.0, 0.0, 0.0));
        atom1.serial = 7;
        let atom2 = atom1.clone();
        assert_eq!(atom1, atom2);
    }
}
