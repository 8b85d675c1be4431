//! Static domain catalog: residues, hydrogen bonds, voids, templates
//!
//! Generated once from a `CatalogSpec`. The seed fixes every wrapping
//! count, and the dehydron donors decide which bonds come out
//! under-wrapped, so two catalogs built from the same spec are identical.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::types::geometry::{self, Point3};
use crate::types::{
    AminoAcid, HydrogenBond, Residue, SecondaryStructure, SessionState, StabilizerTemplate,
    TemplateId, Void,
};
use crate::{DEFAULT_CATALOG_SEED, DEFAULT_DEHYDRON_DONORS};

// =============================================================================
// GEOMETRY [C]
// =============================================================================

/// Rise per residue along the helix axis (Å)
const HELIX_RISE: f64 = 1.5;
/// Rotation per residue (degrees)
const HELIX_TURN_DEG: f64 = 100.0;
/// Backbone radius (Å)
const HELIX_RADIUS: f64 = 2.3;
/// Lateral offset of the second helix
const HELIX2_OFFSET_X: f64 = 6.0;
/// Å → scene units
const SCENE_SCALE: f64 = 0.2;

/// First residue of the turn
const TURN_START: usize = 12;
/// First residue of the second helix
const HELIX2_START: usize = 18;

/// Wrapping ranges (inclusive) for exposed and shielded bonds
const DEHYDRON_WRAPPING: (u32, u32) = (12, 16);
const WRAPPED_WRAPPING: (u32, u32) = (20, 24);

/// Helix-turn-helix sequence
pub const SEQUENCE: [AminoAcid; 30] = {
    use AminoAcid::*;
    [
        Ala, Leu, Glu, Lys, Ala, Val, Phe, Ser, Leu, Ile, Arg, Ala, // Helix 1
        Gly, Ser, Asp, Thr, Gly, Ser, // Turn
        Ala, Leu, Lys, Val, Trp, Glu, Ala, Ile, Phe, Leu, Arg, Ala, // Helix 2
    ]
};

/// Inputs that make a catalog reproducible
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSpec {
    pub seed: u64,
    /// Donor residues whose bond is generated as a dehydron
    pub dehydron_donors: Vec<usize>,
}

impl Default for CatalogSpec {
    fn default() -> Self {
        Self {
            seed: DEFAULT_CATALOG_SEED,
            dehydron_donors: DEFAULT_DEHYDRON_DONORS.to_vec(),
        }
    }
}

impl CatalogSpec {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }
}

/// Immutable catalog shared by every session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catalog {
    residues: Vec<Residue>,
    bonds: Vec<HydrogenBond>,
    voids: Vec<Void>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::generate(&CatalogSpec::default())
    }
}

impl Catalog {
    /// Build the helix-turn-helix catalog
    pub fn generate(spec: &CatalogSpec) -> Self {
        let mut rng = StdRng::seed_from_u64(spec.seed);
        let residues = build_residues();
        let bonds = build_bonds(&residues, &spec.dehydron_donors, &mut rng);
        let voids = build_voids(&residues, &bonds);
        Self {
            residues,
            bonds,
            voids,
        }
    }

    /// Catalog from fixture data
    pub fn from_parts(residues: Vec<Residue>, bonds: Vec<HydrogenBond>, voids: Vec<Void>) -> Self {
        Self {
            residues,
            bonds,
            voids,
        }
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    pub fn bonds(&self) -> &[HydrogenBond] {
        &self.bonds
    }

    pub fn voids(&self) -> &[Void] {
        &self.voids
    }

    pub fn residue(&self, index: usize) -> Option<&Residue> {
        self.residues.iter().find(|r| r.index == index)
    }

    pub fn bond(&self, id: &str) -> Option<&HydrogenBond> {
        self.bonds.iter().find(|b| b.id == id)
    }

    pub fn dehydrons(&self) -> impl Iterator<Item = &HydrogenBond> {
        self.bonds.iter().filter(|b| b.is_dehydron())
    }

    pub fn dehydron_ids(&self) -> Vec<&str> {
        self.dehydrons().map(|b| b.id.as_str()).collect()
    }

    pub fn dehydron_count(&self) -> usize {
        self.dehydrons().count()
    }

    /// Is `id` a dehydron of this catalog?
    pub fn is_dehydron(&self, id: &str) -> bool {
        self.bond(id).is_some_and(HydrogenBond::is_dehydron)
    }

    pub fn templates(&self) -> Vec<StabilizerTemplate> {
        TemplateId::ALL.iter().map(TemplateId::template).collect()
    }

    /// Does `wrapped` cover every dehydron?
    pub fn all_wrapped(&self, wrapped: &BTreeSet<String>) -> bool {
        self.dehydrons().all(|d| wrapped.contains(&d.id))
    }

    /// Dehydrons still exposed in `state`, catalog order
    pub fn unwrapped_dehydrons<'a>(&'a self, state: &SessionState) -> Vec<&'a HydrogenBond> {
        self.dehydrons()
            .filter(|d| !state.is_wrapped(&d.id))
            .collect()
    }

    /// Fraction of dehydrons wrapped, 1.0 when there are none
    pub fn wrapping_progress(&self, state: &SessionState) -> f64 {
        let total = self.dehydron_count();
        if total == 0 {
            return 1.0;
        }
        let wrapped = self
            .dehydrons()
            .filter(|d| state.is_wrapped(&d.id))
            .count();
        wrapped as f64 / total as f64
    }

    /// Voids whose frustrated water is released once `state` is applied
    pub fn drained_voids<'a>(&'a self, state: &SessionState) -> Vec<&'a Void> {
        self.voids
            .iter()
            .filter(|v| {
                !v.nearby_dehydrons.is_empty()
                    && v.nearby_dehydrons.iter().all(|d| state.is_wrapped(d))
            })
            .collect()
    }
}

// =============================================================================
// GENERATION
// =============================================================================

fn deg(d: f64) -> f64 {
    d.to_radians()
}

fn helix1_point(i: usize) -> Point3 {
    let angle = deg(HELIX_TURN_DEG * i as f64);
    [
        HELIX_RADIUS * angle.cos(),
        i as f64 * HELIX_RISE,
        HELIX_RADIUS * angle.sin(),
    ]
}

/// Raw (unscaled) position, side-chain direction and label of residue `i`
fn helix_turn_helix(i: usize) -> (Point3, Point3, SecondaryStructure) {
    if i < TURN_START {
        let angle = deg(HELIX_TURN_DEG * i as f64);
        let dir = geometry::normalize([angle.cos(), 0.0, angle.sin()]);
        (helix1_point(i), dir, SecondaryStructure::Helix)
    } else if i < HELIX2_START {
        // Quadratic Bézier between the two helices, control point lifted
        let t = (i - TURN_START) as f64 / (HELIX2_START - TURN_START - 1) as f64;
        let start = helix1_point(TURN_START - 1);
        let end_angle = deg(HELIX_TURN_DEG * HELIX2_START as f64);
        let end = [
            -HELIX_RADIUS * end_angle.cos() + HELIX2_OFFSET_X,
            HELIX2_START as f64 * HELIX_RISE,
            -HELIX_RADIUS * end_angle.sin(),
        ];
        let control = geometry::add(geometry::midpoint(start, end), [2.0, 3.0, 0.0]);

        let a = (1.0 - t) * (1.0 - t);
        let b = 2.0 * (1.0 - t) * t;
        let c = t * t;
        let pos = geometry::add(
            geometry::add(geometry::scale(start, a), geometry::scale(control, b)),
            geometry::scale(end, c),
        );

        // +Y rotated about Z by t·π/2
        let theta = t * std::f64::consts::FRAC_PI_2;
        let dir = geometry::normalize([-theta.sin(), theta.cos(), 0.0]);
        (pos, dir, SecondaryStructure::Turn)
    } else {
        let local = (i - HELIX2_START) as f64;
        let angle = deg(HELIX_TURN_DEG * local + 180.0);
        let pos = [
            -HELIX_RADIUS * angle.cos() + HELIX2_OFFSET_X,
            HELIX2_START as f64 * HELIX_RISE + local * HELIX_RISE,
            -HELIX_RADIUS * angle.sin(),
        ];
        let dir = geometry::normalize([-angle.cos(), 0.0, -angle.sin()]);
        (pos, dir, SecondaryStructure::Helix)
    }
}

fn build_residues() -> Vec<Residue> {
    let raw: Vec<_> = (0..SEQUENCE.len()).map(helix_turn_helix).collect();
    let positions: Vec<Point3> = raw.iter().map(|(p, _, _)| *p).collect();
    let center = geometry::centroid(&positions);

    SEQUENCE
        .iter()
        .zip(raw)
        .enumerate()
        .map(|(i, (aa, (pos, dir, ss)))| {
            let pos = geometry::scale(geometry::sub(pos, center), SCENE_SCALE);
            Residue::new(i, *aa, pos, dir, ss)
        })
        .collect()
}

/// Residues that donate an i→i+4 backbone bond, in bond order
pub fn bond_donors() -> impl Iterator<Item = usize> {
    (0..=TURN_START - 5).chain(HELIX2_START..=SEQUENCE.len() - 5)
}

/// i→i+4 bonds for both helices
fn build_bonds(residues: &[Residue], dehydron_donors: &[usize], rng: &mut StdRng) -> Vec<HydrogenBond> {
    let mut bonds = Vec::new();

    for donor in bond_donors() {
        let acceptor = donor + 4;
        let (Some(d), Some(a)) = (residues.get(donor), residues.get(acceptor)) else {
            continue;
        };
        let (lo, hi) = if dehydron_donors.contains(&donor) {
            DEHYDRON_WRAPPING
        } else {
            WRAPPED_WRAPPING
        };
        let wrapping_count = rng.random_range(lo..=hi);
        bonds.push(HydrogenBond::new(
            format!("hb{}", bonds.len()),
            donor,
            acceptor,
            geometry::midpoint(d.position, a.position),
            wrapping_count,
        ));
    }

    bonds
}

fn build_voids(residues: &[Residue], bonds: &[HydrogenBond]) -> Vec<Void> {
    let dehydrons: Vec<&HydrogenBond> = bonds.iter().filter(|b| b.is_dehydron()).collect();
    let near = |pred: &dyn Fn(usize) -> bool| -> Vec<String> {
        dehydrons
            .iter()
            .filter(|d| pred(d.donor))
            .take(2)
            .map(|d| d.id.clone())
            .collect()
    };
    let center = |i: usize, j: usize, offset: Point3| -> Point3 {
        match (residues.get(i), residues.get(j)) {
            (Some(a), Some(b)) => geometry::add(geometry::midpoint(a.position, b.position), offset),
            _ => offset,
        }
    };

    vec![
        Void {
            id: "v0".to_string(),
            center: center(1, 5, [0.3, 0.0, 0.3]),
            radius: 0.5,
            nearby_dehydrons: near(&|donor| donor <= 7),
            frustrated_water_count: 12,
        },
        Void {
            id: "v1".to_string(),
            center: center(4, 8, [-0.2, 0.3, 0.0]),
            radius: 0.4,
            nearby_dehydrons: near(&|donor| (3..=8).contains(&donor)),
            frustrated_water_count: 8,
        },
        Void {
            id: "v2".to_string(),
            center: center(19, 23, [0.2, 0.0, -0.3]),
            radius: 0.45,
            nearby_dehydrons: near(&|donor| donor >= 18),
            frustrated_water_count: 10,
        },
    ]
}

// =============================================================================
// TESTS
// =============================================================================
