//! Residue types and the amino-acid property table

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::geometry::Point3;

/// Physicochemical class used for colouring and inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResidueClass {
    #[serde(rename = "hydrophobic")]
    Hydrophobic,
    #[serde(rename = "aromatic")]
    Aromatic,
    #[serde(rename = "charged-")]
    ChargedNegative,
    #[serde(rename = "charged+")]
    ChargedPositive,
    #[serde(rename = "polar")]
    Polar,
    #[serde(rename = "special")]
    Special,
}

impl std::fmt::Display for ResidueClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ResidueClass::Hydrophobic => "hydrophobic",
            ResidueClass::Aromatic => "aromatic",
            ResidueClass::ChargedNegative => "charged-",
            ResidueClass::ChargedPositive => "charged+",
            ResidueClass::Polar => "polar",
            ResidueClass::Special => "special",
        };
        write!(f, "{}", name)
    }
}

/// The thirteen amino-acid types present in the model sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AminoAcid {
    Ala,
    Val,
    Leu,
    Ile,
    Phe,
    Trp,
    Glu,
    Asp,
    Lys,
    Arg,
    Ser,
    Thr,
    Gly,
}

impl AminoAcid {
    pub const ALL: [AminoAcid; 13] = [
        AminoAcid::Ala,
        AminoAcid::Val,
        AminoAcid::Leu,
        AminoAcid::Ile,
        AminoAcid::Phe,
        AminoAcid::Trp,
        AminoAcid::Glu,
        AminoAcid::Asp,
        AminoAcid::Lys,
        AminoAcid::Arg,
        AminoAcid::Ser,
        AminoAcid::Thr,
        AminoAcid::Gly,
    ];

    /// Three-letter code
    pub fn abbreviation(&self) -> &'static str {
        match self {
            AminoAcid::Ala => "ALA",
            AminoAcid::Val => "VAL",
            AminoAcid::Leu => "LEU",
            AminoAcid::Ile => "ILE",
            AminoAcid::Phe => "PHE",
            AminoAcid::Trp => "TRP",
            AminoAcid::Glu => "GLU",
            AminoAcid::Asp => "ASP",
            AminoAcid::Lys => "LYS",
            AminoAcid::Arg => "ARG",
            AminoAcid::Ser => "SER",
            AminoAcid::Thr => "THR",
            AminoAcid::Gly => "GLY",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AminoAcid::Ala => "Alanine",
            AminoAcid::Val => "Valine",
            AminoAcid::Leu => "Leucine",
            AminoAcid::Ile => "Isoleucine",
            AminoAcid::Phe => "Phenylalanine",
            AminoAcid::Trp => "Tryptophan",
            AminoAcid::Glu => "Glutamate",
            AminoAcid::Asp => "Aspartate",
            AminoAcid::Lys => "Lysine",
            AminoAcid::Arg => "Arginine",
            AminoAcid::Ser => "Serine",
            AminoAcid::Thr => "Threonine",
            AminoAcid::Gly => "Glycine",
        }
    }

    /// One-letter code
    pub fn code(&self) -> char {
        match self {
            AminoAcid::Ala => 'A',
            AminoAcid::Val => 'V',
            AminoAcid::Leu => 'L',
            AminoAcid::Ile => 'I',
            AminoAcid::Phe => 'F',
            AminoAcid::Trp => 'W',
            AminoAcid::Glu => 'E',
            AminoAcid::Asp => 'D',
            AminoAcid::Lys => 'K',
            AminoAcid::Arg => 'R',
            AminoAcid::Ser => 'S',
            AminoAcid::Thr => 'T',
            AminoAcid::Gly => 'G',
        }
    }

    pub fn class(&self) -> ResidueClass {
        match self {
            AminoAcid::Ala | AminoAcid::Val | AminoAcid::Leu | AminoAcid::Ile => {
                ResidueClass::Hydrophobic
            }
            AminoAcid::Phe | AminoAcid::Trp => ResidueClass::Aromatic,
            AminoAcid::Glu | AminoAcid::Asp => ResidueClass::ChargedNegative,
            AminoAcid::Lys | AminoAcid::Arg => ResidueClass::ChargedPositive,
            AminoAcid::Ser | AminoAcid::Thr => ResidueClass::Polar,
            AminoAcid::Gly => ResidueClass::Special,
        }
    }

    /// CPK-style colour, shared within a class
    pub fn color(&self) -> &'static str {
        match self.class() {
            ResidueClass::Hydrophobic => "#8CFF8C",
            ResidueClass::Aromatic => "#FF8CFF",
            ResidueClass::ChargedNegative => "#FF4444",
            ResidueClass::ChargedPositive => "#4444FF",
            ResidueClass::Polar => "#FFFF44",
            ResidueClass::Special => "#CCCCCC",
        }
    }

    pub fn side_chain_length(&self) -> f64 {
        match self {
            AminoAcid::Ala => 0.15,
            AminoAcid::Val => 0.25,
            AminoAcid::Leu => 0.35,
            AminoAcid::Ile => 0.3,
            AminoAcid::Phe => 0.4,
            AminoAcid::Trp => 0.45,
            AminoAcid::Glu => 0.35,
            AminoAcid::Asp => 0.25,
            AminoAcid::Lys => 0.4,
            AminoAcid::Arg => 0.45,
            AminoAcid::Ser => 0.2,
            AminoAcid::Thr => 0.25,
            AminoAcid::Gly => 0.05,
        }
    }
}

impl FromStr for AminoAcid {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        AminoAcid::ALL
            .into_iter()
            .find(|aa| aa.abbreviation() == upper)
            .ok_or_else(|| format!("unknown amino acid '{}'", s.trim()))
    }
}

/// Secondary-structure label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecondaryStructure {
    Helix,
    Turn,
}

/// A residue of the model chain. Built once with the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Residue {
    /// Sequence id (`r{index}`)
    pub id: String,
    pub index: usize,
    pub amino_acid: AminoAcid,
    pub position: Point3,
    pub side_chain_dir: Point3,
    pub secondary_structure: SecondaryStructure,
    /// Presentation only
    pub breathing_amplitude: f64,
    /// Presentation only
    pub breathing_phase: f64,
}

impl Residue {
    pub fn new(
        index: usize,
        amino_acid: AminoAcid,
        position: Point3,
        side_chain_dir: Point3,
        secondary_structure: SecondaryStructure,
    ) -> Self {
        let breathing_amplitude = match secondary_structure {
            SecondaryStructure::Turn => 0.06,
            SecondaryStructure::Helix => 0.03,
        };
        Self {
            id: format!("r{}", index),
            index,
            amino_acid,
            position,
            side_chain_dir,
            secondary_structure,
            breathing_amplitude,
            breathing_phase: index as f64 * 0.3,
        }
    }

    pub fn class(&self) -> ResidueClass {
        self.amino_acid.class()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_table() {
        assert_eq!(AminoAcid::Trp.class(), ResidueClass::Aromatic);
        assert_eq!(AminoAcid::Glu.class(), ResidueClass::ChargedNegative);
        assert_eq!(AminoAcid::Gly.color(), "#CCCCCC");
        assert_eq!(AminoAcid::Lys.code(), 'K');
    }

    #[test]
    fn test_turn_residues_breathe_harder() {
        let turn = Residue::new(13, AminoAcid::Ser, [0.0; 3], [0.0, 1.0, 0.0], SecondaryStructure::Turn);
        let helix = Residue::new(2, AminoAcid::Glu, [0.0; 3], [1.0, 0.0, 0.0], SecondaryStructure::Helix);
        assert_eq!(turn.breathing_amplitude, 0.06);
        assert_eq!(helix.breathing_amplitude, 0.03);
        assert_eq!(turn.id, "r13");
        assert!((turn.breathing_phase - 3.9).abs() < 1e-9);
    }

    #[test]
    fn test_class_serde_names() {
        let json = serde_json::to_string(&ResidueClass::ChargedPositive).unwrap();
        assert_eq!(json, "\"charged+\"");
        assert_eq!("arg".parse::<AminoAcid>(), Ok(AminoAcid::Arg));
    }
}
