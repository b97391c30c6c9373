//! Units and code tables of the interchange dialect.
//!
//! RockSim stores lengths in millimetres, diameters where the native model
//! keeps radii, masses in grams and densities in CGS units. Dividing a stored
//! value by the matching constant yields SI units.

use crate::objects::{AxialMethod, CrossSection, Finish, MaterialType, Shape};

/// Millimetres to metres.
pub const LENGTH: f64 = 1000.0;

/// Diameter in millimetres to radius in metres.
pub const RADIUS: f64 = 2000.0;

/// Grams to kilograms.
pub const MASS: f64 = 1000.0;

/// g/cm³ to kg/m³.
pub const BULK_DENSITY: f64 = 0.001;

/// g/cm² to kg/m².
pub const SURFACE_DENSITY: f64 = 0.1;

/// g/cm to kg/m.
pub const LINE_DENSITY: f64 = 10.0;

/// Divisor converting a stored density of the given category.
pub fn density_divisor(kind: MaterialType) -> f64 {
    match kind {
        MaterialType::Bulk => BULK_DENSITY,
        MaterialType::Surface => SURFACE_DENSITY,
        MaterialType::Line => LINE_DENSITY,
    }
}

/// `DensityType` code.
pub fn material_type(code: i32) -> Option<MaterialType> {
    match code {
        0 => Some(MaterialType::Bulk),
        1 => Some(MaterialType::Surface),
        2 => Some(MaterialType::Line),
        _ => None,
    }
}

/// `FinishCode`; unknown codes read as a normal finish.
pub fn finish(code: i32) -> Finish {
    match code {
        0 => Finish::Polished,
        1 => Finish::Smooth,
        3 => Finish::Unfinished,
        _ => Finish::Normal,
    }
}

/// `ShapeCode` of nose cones and transitions.
pub fn shape(code: i32) -> Shape {
    match code {
        0 => Shape::Conical,
        1 => Shape::Ogive,
        3 => Shape::Ellipsoid,
        4 => Shape::Power,
        5 => Shape::Parabolic,
        6 => Shape::Haack,
        // 2 is RockSim's "parabolic", which is an ellipsoid here
        _ => Shape::Ellipsoid,
    }
}

/// `LocationMode`: 0 absolute, 1 from the parent's front, 2 from its aft end.
pub fn axial_method(code: i32) -> AxialMethod {
    match code {
        0 => AxialMethod::Absolute,
        2 => AxialMethod::Bottom,
        _ => AxialMethod::Top,
    }
}

/// `TipShapeCode` of fin sets.
pub fn cross_section(code: i32) -> CrossSection {
    match code {
        1 => CrossSection::Rounded,
        2 => CrossSection::Airfoil,
        _ => CrossSection::Square,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_codes() {
        assert_eq!(shape(0), Shape::Conical);
        assert_eq!(shape(1), Shape::Ogive);
        assert_eq!(shape(2), Shape::Ellipsoid);
        assert_eq!(shape(6), Shape::Haack);
        assert_eq!(shape(17), shape(2));
    }

    #[test]
    fn test_finish_codes() {
        assert_eq!(finish(0), Finish::Polished);
        assert_eq!(finish(2), Finish::Normal);
        assert_eq!(finish(-1), Finish::Normal);
        assert_eq!(finish(100), Finish::Normal);
    }

    #[test]
    fn test_density_units() {
        assert!((1.2 / density_divisor(MaterialType::Bulk) - 1200.0).abs() < 1e-9);
        assert!((0.0067 / density_divisor(MaterialType::Surface) - 0.067).abs() < 1e-12);
        assert!((material_type(2).map_or(0.0, density_divisor) - LINE_DENSITY).abs() < 1e-12);
    }
}
