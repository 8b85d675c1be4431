//! Stabilizer templates and placed stabilizers

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::geometry::Point3;

/// Identifier of a stabilizer template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateId {
    Trehalose,
    Glycerol,
    Tmao,
}

impl TemplateId {
    pub const ALL: [TemplateId; 3] = [TemplateId::Trehalose, TemplateId::Glycerol, TemplateId::Tmao];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateId::Trehalose => "trehalose",
            TemplateId::Glycerol => "glycerol",
            TemplateId::Tmao => "tmao",
        }
    }

    /// Catalog entry for this template
    pub fn template(&self) -> StabilizerTemplate {
        match self {
            TemplateId::Trehalose => StabilizerTemplate {
                id: *self,
                name: "Trehalose",
                color: "#44ffaa",
                effect_radius: 1.5,
                wrapping_bonus: 8,
                atom_count: 6,
                description: "Disaccharide — wraps exposed backbone, expels frustrated water",
            },
            TemplateId::Glycerol => StabilizerTemplate {
                id: *self,
                name: "Glycerol",
                color: "#ffaa44",
                effect_radius: 1.0,
                wrapping_bonus: 5,
                atom_count: 4,
                description: "Polyol — fills small voids, enhances local H-bond network",
            },
            TemplateId::Tmao => StabilizerTemplate {
                id: *self,
                name: "TMAO",
                color: "#aa44ff",
                effect_radius: 1.2,
                wrapping_bonus: 6,
                atom_count: 5,
                description: "Osmolyte — strengthens water structure around protein",
            },
        }
    }
}

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TemplateId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        TemplateId::ALL
            .into_iter()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| format!("unknown stabilizer template '{}'", s.trim()))
    }
}

/// Static description of a stabilizer molecule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StabilizerTemplate {
    pub id: TemplateId,
    pub name: &'static str,
    pub color: &'static str,
    pub effect_radius: f64,
    /// Shielding atoms added to the wrapped bond
    pub wrapping_bonus: u32,
    pub atom_count: u32,
    pub description: &'static str,
}

/// Unique id of a placed stabilizer
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StabilizerId(pub String);

impl StabilizerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StabilizerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StabilizerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A stabilizer wrapping exactly one dehydron
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedStabilizer {
    pub id: StabilizerId,
    pub template_id: TemplateId,
    /// Midpoint of the target bond
    pub position: Point3,
    pub effect_radius: f64,
    pub target_dehydron_id: String,
    pub color: String,
    pub atom_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_table() {
        let t = TemplateId::Trehalose.template();
        assert_eq!(t.wrapping_bonus, 8);
        assert_eq!(t.effect_radius, 1.5);
        assert_eq!(TemplateId::Glycerol.template().atom_count, 4);
        assert_eq!(TemplateId::Tmao.template().name, "TMAO");
    }

    #[test]
    fn test_template_parse() {
        assert_eq!("TMAO".parse::<TemplateId>(), Ok(TemplateId::Tmao));
        assert!("urea".parse::<TemplateId>().is_err());
    }

    #[test]
    fn test_stabilizer_id_is_transparent() {
        let json = serde_json::to_string(&StabilizerId::from("stab_7")).unwrap();
        assert_eq!(json, "\"stab_7\"");
    }
}
