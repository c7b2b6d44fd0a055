use super::ids::ResidueId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub label: String,                   // Chain identifier, e.g. "A" or "AA"; may be blank
    pub(crate) residues: Vec<ResidueId>, // Residues in file order
}

impl Chain {
    pub(crate) fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            residues: Vec::new(),
        }
    }

    pub fn residues(&self) -> &[ResidueId] {
        &self.residues
    }

    /// Label used in reports; blank labels are reported as `A`.
    pub fn display_label(&self) -> &str {
        if self.label.trim().is_empty() {
            "A"
        } else {
            &self.label
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_chain_has_no_residues() {
        let chain = Chain::new("B");
        assert_eq!(chain.label, "B");
        assert!(chain.residues().is_empty());
    }

    #[test]
    fn blank_label_is_displayed_as_a() {
        assert_eq!(Chain::new(" ").display_label(), "A");
        assert_eq!(Chain::new("").display_label(), "A");
        assert_eq!(Chain::new("C").display_label(), "C");
    }
}
