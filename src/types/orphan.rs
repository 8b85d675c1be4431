//! YBR032W orphan protein data used by the lock verification demo

use lazy_static::lazy_static;
use serde::Serialize;

use super::geometry::Point3;

#[derive(Debug, Clone, Serialize)]
pub struct LowConfidenceSegment {
    pub start: usize,
    pub end: usize,
    pub avg_plddt: f64,
    pub reason: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PotentialHBond {
    pub donor: usize,
    pub acceptor: usize,
}

/// Where the Ma-stabilizer is meant to sit
#[derive(Debug, Clone, Serialize)]
pub struct StabilizerTarget {
    pub position: Point3,
    pub radius: f64,
    pub potential_h_bonds: Vec<PotentialHBond>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrphanProtein {
    pub protein_id: &'static str,
    pub organism: &'static str,
    pub description: &'static str,
    pub total_residues: usize,
    pub low_confidence_segment: LowConfidenceSegment,
    /// One point per residue of the low-confidence segment
    pub disordered_loop: Vec<Point3>,
    pub ma_stabilizer_target: StabilizerTarget,
}

lazy_static! {
    static ref YBR032W: OrphanProtein = OrphanProtein {
        protein_id: "YBR032W",
        organism: "Saccharomyces cerevisiae",
        description: "Orphan protein with low AlphaFold confidence",
        total_residues: 120,
        low_confidence_segment: LowConfidenceSegment {
            start: 45,
            end: 67,
            avg_plddt: 42.3,
            reason: "No homologous sequences available",
        },
        disordered_loop: vec![
            [5.2, 3.1, 0.8],
            [5.8, 3.5, 1.2],
            [6.1, 4.2, 1.8],
            [6.0, 5.0, 2.3],
            [5.5, 5.6, 2.9],
            [4.8, 6.0, 3.2],
            [4.0, 6.2, 3.0],
            [3.3, 5.9, 2.5],
            [2.8, 5.3, 1.9],
            [2.6, 4.5, 1.3],
            [2.8, 3.7, 0.8],
            [3.4, 3.2, 0.5],
            [4.1, 3.0, 0.6],
            [4.8, 3.1, 0.9],
            [5.3, 3.4, 1.3],
            [5.6, 3.9, 1.8],
            [5.7, 4.6, 2.4],
            [5.5, 5.3, 2.9],
            [5.0, 5.8, 3.2],
            [4.3, 6.0, 3.1],
            [3.6, 5.8, 2.7],
            [3.1, 5.2, 2.1],
            [3.0, 4.4, 1.5],
        ],
        ma_stabilizer_target: StabilizerTarget {
            position: [4.5, 4.5, 2.0],
            radius: 1.8,
            potential_h_bonds: vec![
                PotentialHBond { donor: 47, acceptor: 63 },
                PotentialHBond { donor: 51, acceptor: 59 },
                PotentialHBond { donor: 54, acceptor: 56 },
            ],
        },
    };
}

/// The YBR032W record
pub fn orphan_protein() -> &'static OrphanProtein {
    &YBR032W
}

impl OrphanProtein {
    /// Default coordinates for IDENTIFY_VOID
    pub fn void_target(&self) -> Point3 {
        self.ma_stabilizer_target.position
    }

    /// Residue number of the i-th loop point
    pub fn loop_residue_number(&self, i: usize) -> Option<usize> {
        (i < self.disordered_loop.len()).then(|| self.low_confidence_segment.start + i)
    }
}
