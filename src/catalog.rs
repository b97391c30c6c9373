//! Collaborators consulted during an import.
//!
//! - [`MotorFinder`] resolves motors recorded in a document.
//! - [`MaterialCatalog`] supplies known materials.
//! - [`PresetCatalog`] supplies manufacturer parts.
//!
//! All three are read-only during an import and can be shared between
//! concurrent imports.

use crate::objects::{ComponentPreset, Material, MaterialType, Motor, MotorQuery, PresetType};
use crate::warning::{Warning, WarningSet};
use std::sync::OnceLock;

// ============================================================================
// Motors
// ============================================================================

/// Resolves the motor a document refers to.
pub trait MotorFinder: Send + Sync {
    /// Returns the best match for the query, or `None`. Problems with the
    /// match are reported to `warnings`.
    fn find_motor(&self, query: &MotorQuery, warnings: &mut WarningSet) -> Option<Motor>;
}

/// A finder that knows no motors.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMotors;

impl MotorFinder for NoMotors {
    fn find_motor(&self, query: &MotorQuery, warnings: &mut WarningSet) -> Option<Motor> {
        match &query.designation {
            Some(designation) => warnings.add(not_found(designation, query)),
            None => warnings.add("No motor specified, ignoring."),
        }
        None
    }
}

/// Manufacturer names and the abbreviations documents use for them.
const MANUFACTURER_ALIASES: &[&[&str]] = &[
    &["AeroTech", "A", "AT", "Aerotech"],
    &["Estes", "E", "ES"],
    &["Cesaroni Technology", "Cesaroni", "CTI", "CT"],
    &["Apogee", "AP", "Apogee Components"],
    &["Quest", "Q", "QU"],
    &["Loki Research", "Loki", "LR"],
    &["Animal Motor Works", "AMW", "AN"],
];

/// Returns true if two manufacturer names denote the same manufacturer.
pub fn manufacturer_matches(a: &str, b: &str) -> bool {
    let (a, b) = (a.trim(), b.trim());
    if a.eq_ignore_ascii_case(b) {
        return true;
    }
    MANUFACTURER_ALIASES.iter().any(|names| {
        names.iter().any(|n| n.eq_ignore_ascii_case(a))
            && names.iter().any(|n| n.eq_ignore_ascii_case(b))
    })
}

fn not_found(designation: &str, query: &MotorQuery) -> Warning {
    let manufacturer = query
        .manufacturer
        .as_ref()
        .map(|m| format!(" for manufacturer '{}'", m))
        .unwrap_or_default();
    Warning::from_string(format!(
        "No motor with designation '{}'{} found.",
        designation, manufacturer
    ))
}

/// In-memory motor database.
#[derive(Debug, Clone, Default)]
pub struct MotorDatabase {
    motors: Vec<Motor>,
}

impl MotorDatabase {
    /// Diameter and length tolerance in meters.
    pub const DIMENSION_TOLERANCE: f64 = 0.001;

    /// Creates an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a motor.
    pub fn add(&mut self, motor: Motor) {
        self.motors.push(motor);
    }

    /// Number of motors.
    pub fn len(&self) -> usize {
        self.motors.len()
    }

    /// Returns true if the database is empty.
    pub fn is_empty(&self) -> bool {
        self.motors.is_empty()
    }

    /// Motors matching every recorded field of the query except the digest.
    pub fn find_motors(&self, query: &MotorQuery) -> Vec<&Motor> {
        self.motors
            .iter()
            .filter(|m| query.motor_type.map_or(true, |t| t == m.motor_type))
            .filter(|m| {
                query
                    .manufacturer
                    .as_deref()
                    .map_or(true, |name| manufacturer_matches(name, &m.manufacturer))
            })
            .filter(|m| {
                query
                    .designation
                    .as_deref()
                    .map_or(true, |d| d.trim().eq_ignore_ascii_case(&m.designation))
            })
            .filter(|m| {
                query
                    .diameter
                    .map_or(true, |d| (d - m.diameter).abs() <= Self::DIMENSION_TOLERANCE)
            })
            .filter(|m| {
                query
                    .length
                    .map_or(true, |l| (l - m.length).abs() <= Self::DIMENSION_TOLERANCE)
            })
            .collect()
    }
}

impl FromIterator<Motor> for MotorDatabase {
    fn from_iter<I: IntoIterator<Item = Motor>>(iter: I) -> Self {
        Self {
            motors: iter.into_iter().collect(),
        }
    }
}

impl MotorFinder for MotorDatabase {
    fn find_motor(&self, query: &MotorQuery, warnings: &mut WarningSet) -> Option<Motor> {
        let Some(designation) = query.designation.as_deref() else {
            warnings.add("No motor specified, ignoring.");
            return None;
        };

        let candidates = self.find_motors(query);
        let first = match candidates.first() {
            Some(first) => *first,
            None => {
                warnings.add(not_found(designation, query));
                return None;
            }
        };

        if candidates.len() > 1 {
            if let Some(digest) = &query.digest {
                if let Some(exact) = candidates.iter().find(|m| m.digest() == *digest) {
                    return Some((*exact).clone());
                }
            }
            warnings.add(Warning::from_string(format!(
                "Multiple motors with designation '{}' found, one chosen arbitrarily.",
                designation
            )));
            return Some(first.clone());
        }

        if let Some(digest) = &query.digest {
            if first.digest() != *digest {
                warnings.add(Warning::notice(format!(
                    "Motor with designation '{}' has differing thrust curve than the original.",
                    designation
                )));
            }
        }
        Some(first.clone())
    }
}

// ============================================================================
// Materials
// ============================================================================

/// Relative density difference under which two materials are the same.
const DENSITY_EPSILON: f64 = 1e-4;

/// Known materials by category.
#[derive(Debug, Clone)]
pub struct MaterialCatalog {
    materials: Vec<Material>,
}

impl Default for MaterialCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl MaterialCatalog {
    /// An empty catalog.
    pub fn empty() -> Self {
        Self {
            materials: Vec::new(),
        }
    }

    /// The standard materials.
    pub fn builtin() -> Self {
        use MaterialType::{Bulk, Line, Surface};
        let table: &[(MaterialType, &str, f64)] = &[
            (Bulk, "Acrylic", 1190.0),
            (Bulk, "Aluminum", 2700.0),
            (Bulk, "Balsa", 170.0),
            (Bulk, "Basswood", 500.0),
            (Bulk, "Birch", 670.0),
            (Bulk, "Cardboard", 680.0),
            (Bulk, "Carbon fiber", 1780.0),
            (Bulk, "Fiberglass", 1850.0),
            (Bulk, "Kraft phenolic", 950.0),
            (Bulk, "Plywood (birch)", 630.0),
            (Bulk, "Polycarbonate (Lexan)", 1200.0),
            (Bulk, "Polystyrene", 1050.0),
            (Bulk, "PVC", 1390.0),
            (Bulk, "Spruce", 450.0),
            (Surface, "Ripstop nylon", 0.067),
            (Surface, "Mylar", 0.021),
            (Surface, "Polyethylene (thin)", 0.015),
            (Surface, "Polyethylene (heavy)", 0.04),
            (Surface, "Silk", 0.06),
            (Surface, "Paper (office)", 0.08),
            (Surface, "Cellophane", 0.018),
            (Surface, "Cr\u{e8}pe paper", 0.025),
            (Line, "Thread (heavy-duty)", 0.0003),
            (Line, "Elastic cord (round 2 mm, 1/16 in)", 0.0018),
            (Line, "Elastic cord (flat 6 mm, 1/4 in)", 0.0043),
            (Line, "Tubular nylon (11 mm, 7/16 in)", 0.013),
            (Line, "Tubular nylon (14 mm, 9/16 in)", 0.016),
            (Line, "Kevlar thread", 0.0003),
        ];
        Self {
            materials: table
                .iter()
                .map(|(kind, name, density)| Material::new(*kind, *name, *density))
                .collect(),
        }
    }

    /// Catalog shared by all imports that do not supply their own.
    pub fn shared() -> &'static MaterialCatalog {
        static SHARED: OnceLock<MaterialCatalog> = OnceLock::new();
        SHARED.get_or_init(MaterialCatalog::builtin)
    }

    /// Adds a material.
    pub fn add(&mut self, material: Material) {
        self.materials.push(material);
    }

    /// Materials of one category.
    pub fn materials(&self, kind: MaterialType) -> impl Iterator<Item = &Material> {
        self.materials.iter().filter(move |m| m.kind == kind)
    }

    /// Looks a material up by category, name and density.
    ///
    /// Returns the catalog entry when one matches, otherwise a new
    /// user-defined material with the given values.
    pub fn find_material(&self, kind: MaterialType, name: &str, density: f64) -> Material {
        self.materials(kind)
            .find(|m| {
                m.name.eq_ignore_ascii_case(name)
                    && (m.density - density).abs() <= DENSITY_EPSILON * m.density.abs().max(1.0)
            })
            .cloned()
            .unwrap_or_else(|| Material::custom(kind, name, density))
    }
}

// ============================================================================
// Presets
// ============================================================================

/// Manufacturer parts.
#[derive(Debug, Clone, Default)]
pub struct PresetCatalog {
    presets: Vec<ComponentPreset>,
}

impl PresetCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty catalog shared by all imports that do not supply their own.
    pub fn shared() -> &'static PresetCatalog {
        static SHARED: OnceLock<PresetCatalog> = OnceLock::new();
        SHARED.get_or_init(PresetCatalog::new)
    }

    /// Adds a preset.
    pub fn add(&mut self, preset: ComponentPreset) {
        self.presets.push(preset);
    }

    /// Number of presets.
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Returns true if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Presets with a manufacturer and part number, in catalog order.
    pub fn find(&self, manufacturer: &str, part_no: &str) -> Vec<&ComponentPreset> {
        self.presets
            .iter()
            .filter(|p| manufacturer_matches(&p.manufacturer, manufacturer) && p.part_no == part_no)
            .collect()
    }

    /// Presets of a type.
    pub fn find_by_type(&self, preset_type: PresetType) -> Vec<&ComponentPreset> {
        self.presets
            .iter()
            .filter(|p| p.preset_type == preset_type)
            .collect()
    }

    /// The preset with a content digest.
    pub fn find_by_digest(&self, digest: &str) -> Option<&ComponentPreset> {
        self.presets.iter().find(|p| p.digest() == digest)
    }
}

impl FromIterator<ComponentPreset> for PresetCatalog {
    fn from_iter<I: IntoIterator<Item = ComponentPreset>>(iter: I) -> Self {
        Self {
            presets: iter.into_iter().collect(),
        }
    }
}
