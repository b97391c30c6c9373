//! Recovery devices and mass objects.

use super::base::{integer, length, number, BaseFields, Part};
use super::constants::{LENGTH, LINE_DENSITY};
use crate::context::LoadingContext;
use crate::objects::{ComponentType, MaterialType, RocketComponent};
use crate::warning::WarningSet;

/// `Parachute`.
#[derive(Default)]
pub(super) struct ParachutePart {
    diameter: Option<f64>,
    line_count: Option<i32>,
    line_length: Option<f64>,
    line_material: Option<String>,
    line_density: f64,
    cd: Option<f64>,
}

impl Part for ParachutePart {
    fn read(&mut self, element: &str, content: &str, w: &mut WarningSet) -> bool {
        match element {
            "Dia" => self.diameter = length(element, content, w).or(self.diameter),
            "ShroudLineCount" => {
                self.line_count = integer(element, content, w).map(|n| n.max(0)).or(self.line_count)
            }
            "ShroudLineLen" => self.line_length = length(element, content, w).or(self.line_length),
            "ShroudLineMaterial" => self.line_material = Some(content.to_string()),
            "ShroudLineMassPerMM" => {
                if let Some(density) = number(element, content, w) {
                    self.line_density = (density / LINE_DENSITY).max(0.0);
                }
            }
            "DragCoefficient" => self.cd = number(element, content, w).or(self.cd),
            "SpillHoleDia" => {}
            _ => return false,
        }
        true
    }

    fn build(
        self,
        _base: &BaseFields,
        ctx: &LoadingContext<'_>,
        _warnings: &mut WarningSet,
    ) -> Option<RocketComponent> {
        let mut component = RocketComponent::new(ComponentType::Parachute);
        let chute = component.parachute_mut()?;
        if let Some(diameter) = self.diameter {
            chute.diameter = diameter;
        }
        if let Some(count) = self.line_count {
            chute.line_count = count;
        }
        if let Some(line_length) = self.line_length {
            chute.line_length = line_length;
        }
        if let Some(name) = &self.line_material {
            chute.line_material = ctx.materials().find_material(MaterialType::Line, name, self.line_density);
        }
        if let Some(cd) = self.cd {
            chute.recovery.cd = cd;
            chute.recovery.cd_automatic = false;
        }
        Some(component)
    }
}

/// `Streamer`.
#[derive(Default)]
pub(super) struct StreamerPart {
    length: Option<f64>,
    width: Option<f64>,
    cd: Option<f64>,
}

impl Part for StreamerPart {
    fn read(&mut self, element: &str, content: &str, w: &mut WarningSet) -> bool {
        match element {
            "Len" => self.length = length(element, content, w).or(self.length),
            "Width" => self.width = length(element, content, w).or(self.width),
            "DragCoefficient" => self.cd = number(element, content, w).or(self.cd),
            _ => return false,
        }
        true
    }

    fn build(
        self,
        _base: &BaseFields,
        _ctx: &LoadingContext<'_>,
        _warnings: &mut WarningSet,
    ) -> Option<RocketComponent> {
        let mut component = RocketComponent::new(ComponentType::Streamer);
        let streamer = component.streamer_mut()?;
        if let Some(len) = self.length {
            streamer.strip_length = len;
        }
        if let Some(width) = self.width {
            streamer.strip_width = width;
        }
        if let Some(cd) = self.cd {
            streamer.recovery.cd = cd;
            streamer.recovery.cd_automatic = false;
        }
        Some(component)
    }
}

/// `MassObject`: a shock cord for `TypeCode` 1, otherwise a mass component.
#[derive(Default)]
pub(super) struct MassObjectPart {
    length: Option<f64>,
    type_code: Option<i32>,
}

impl Part for MassObjectPart {
    fn read(&mut self, element: &str, content: &str, w: &mut WarningSet) -> bool {
        match element {
            "Len" => {
                if let Some(len) = number(element, content, w) {
                    self.length = Some((len / LENGTH).max(0.0));
                }
            }
            "TypeCode" => self.type_code = integer(element, content, w).or(self.type_code),
            _ => return false,
        }
        true
    }

    fn build(
        self,
        base: &BaseFields,
        _ctx: &LoadingContext<'_>,
        _warnings: &mut WarningSet,
    ) -> Option<RocketComponent> {
        if self.type_code == Some(1) {
            let mut component = RocketComponent::new(ComponentType::ShockCord);
            let cord = component.shock_cord_mut()?;
            if let Some(len) = self.length {
                cord.cord_length = len;
            }
            return Some(component);
        }

        let mut component = RocketComponent::new(ComponentType::MassComponent);
        let mass = component.mass_component_mut()?;
        if let Some(len) = self.length {
            mass.body.packed_length = len;
        }
        mass.mass = base.known_mass;
        Some(component)
    }
}

#[cfg(test)]
mod tests {
    use super::super::parts::{read_parts, ParentInfo};
    use super::*;

    fn attached(xml: &str) -> (Vec<RocketComponent>, WarningSet) {
        let tube = RocketComponent::new(ComponentType::BodyTube);
        read_parts(&format!("<AttachedParts>{}</AttachedParts>", xml), ParentInfo::of(&tube))
    }

    #[test]
    fn test_parachute() {
        let (parts, warnings) = attached(
            "<Parachute><Dia>600</Dia><ShroudLineCount>8</ShroudLineCount>\
             <ShroudLineLen>500</ShroudLineLen><ShroudLineMaterial>Braided nylon</ShroudLineMaterial>\
             <ShroudLineMassPerMM>0.01</ShroudLineMassPerMM><DragCoefficient>0.75</DragCoefficient>\
             <Material>Ripstop nylon</Material><Density>0.0067</Density><DensityType>1</DensityType>\
             <SpillHoleDia>0</SpillHoleDia></Parachute>",
        );
        assert!(warnings.is_empty(), "{:?}", warnings);
        let mut chute = parts[0].clone();
        let material = chute.material().cloned().unwrap();
        assert_eq!(material.kind, MaterialType::Surface);
        assert_eq!(material.name, "Ripstop nylon");
        assert!(!material.user_defined);

        let chute = chute.parachute_mut().unwrap();
        assert!((chute.diameter - 0.6).abs() < 1e-12);
        assert_eq!(chute.line_count, 8);
        assert!((chute.line_length - 0.5).abs() < 1e-12);
        assert_eq!(chute.line_material.kind, MaterialType::Line);
        assert_eq!(chute.recovery.cd, 0.75);
        assert!(!chute.recovery.cd_automatic);
    }

    #[test]
    fn test_mass_object_kinds() {
        let (parts, warnings) = attached(
            "<MassObject><TypeCode>1</TypeCode><Len>900</Len><Material>Kevlar</Material></MassObject>\
             <MassObject><TypeCode>0</TypeCode><Len>20</Len><KnownMass>15</KnownMass></MassObject>\
             <MassObject><Len>x</Len></MassObject>",
        );
        assert_eq!(warnings.len(), 1);
        assert_eq!(parts[0].component_type(), ComponentType::ShockCord);
        assert_eq!(parts[0].material().map(|m| m.kind), Some(MaterialType::Line));
        assert_eq!(parts[0].length(), Some(0.025));

        let mut mass = parts[1].clone();
        assert_eq!(mass.component_type(), ComponentType::MassComponent);
        let component = mass.mass_component_mut().unwrap();
        assert!((component.mass - 0.015).abs() < 1e-12);
        assert!((component.body.packed_length - 0.02).abs() < 1e-12);
        assert!(!parts[1].mass_override.enabled);

        assert_eq!(parts[2].component_type(), ComponentType::MassComponent);
    }
}
