//! Materials referenced by components.

use std::fmt;

xml_enum! {
    /// Category of a material, which fixes the unit of its density.
    pub enum MaterialType {
        /// Density in kg/m
        Line => "LINE",
        /// Density in kg/m²
        Surface => "SURFACE",
        /// Density in kg/m³
        Bulk => "BULK",
    }
}

impl MaterialType {
    /// Unit of the density of this category.
    pub fn density_unit(self) -> &'static str {
        match self {
            MaterialType::Line => "kg/m",
            MaterialType::Surface => "kg/m²",
            MaterialType::Bulk => "kg/m³",
        }
    }
}

/// A named material with a density.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Material {
    /// Display name
    pub name: String,
    /// Density in the unit of `kind`
    pub density: f64,
    /// Category
    pub kind: MaterialType,
    /// True if the material came from a document rather than a catalog
    pub user_defined: bool,
}

impl Material {
    /// Creates a catalog material.
    pub fn new(kind: MaterialType, name: impl Into<String>, density: f64) -> Self {
        Self {
            name: name.into(),
            density,
            kind,
            user_defined: false,
        }
    }

    /// Creates a material defined by a document.
    pub fn custom(kind: MaterialType, name: impl Into<String>, density: f64) -> Self {
        Self {
            user_defined: true,
            ..Self::new(kind, name, density)
        }
    }

    /// Default material for a category.
    pub fn default_for(kind: MaterialType) -> Self {
        match kind {
            MaterialType::Bulk => Self::new(kind, "Cardboard", 680.0),
            MaterialType::Surface => Self::new(kind, "Ripstop nylon", 0.067),
            MaterialType::Line => Self::new(kind, "Elastic cord (round 2 mm, 1/16 in)", 0.0018),
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.name, self.density, self.kind.density_unit())
    }
}
