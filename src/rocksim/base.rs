//! Fields every part carries and the generic part handler.

use super::constants::{self, LENGTH, MASS, RADIUS};
use super::parts::{ParentInfo, PartsHandler};
use super::RockSimOutput;
use crate::catalog::MaterialCatalog;
use crate::context::LoadingContext;
use crate::objects::{parse_double, parse_int, AxialMethod, MaterialType, RocketComponent};
use crate::reader::{Attributes, ElementHandler, Opened};
use crate::warning::{Warning, WarningSet};

// ============================================================================
// Value conversion
// ============================================================================

/// Parses a number, warning when the text is not one.
pub(super) fn number(element: &str, content: &str, warnings: &mut WarningSet) -> Option<f64> {
    let value = parse_double(content);
    if value.is_none() {
        warnings.add(format!(
            "Could not convert {} value of {}.  It is expected to be a number.",
            element, content
        ));
    }
    value
}

/// Parses an integer code, warning when the text is not one.
pub(super) fn integer(element: &str, content: &str, warnings: &mut WarningSet) -> Option<i32> {
    let value = parse_int(content);
    if value.is_none() {
        warnings.add(format!(
            "Could not convert {} value of {}.  It is expected to be a number.",
            element, content
        ));
    }
    value
}

/// A millimetre length in metres, never negative.
pub(super) fn length(element: &str, content: &str, warnings: &mut WarningSet) -> Option<f64> {
    number(element, content, warnings).map(|v| (v / LENGTH).max(0.0))
}

/// A millimetre diameter as a radius in metres, never negative.
pub(super) fn radius(element: &str, content: &str, warnings: &mut WarningSet) -> Option<f64> {
    number(element, content, warnings).map(|v| (v / RADIUS).max(0.0))
}

// ============================================================================
// Common fields
// ============================================================================

/// Name, mass, CG and material fields shared by all parts.
#[derive(Debug, Default)]
pub(super) struct BaseFields {
    pub name: Option<String>,
    pub known_mass: f64,
    pub known_cg: f64,
    pub use_known_cg: bool,
    pub density: Option<f64>,
    pub density_type: Option<MaterialType>,
    pub material: Option<String>,
}

impl BaseFields {
    /// Records a common field. Returns false for any other element.
    pub fn read(&mut self, element: &str, content: &str, warnings: &mut WarningSet) -> bool {
        match element {
            "Name" => self.name = Some(content.to_string()),
            "KnownMass" => {
                if let Some(mass) = number(element, content, warnings) {
                    self.known_mass = (mass / MASS).max(0.0);
                }
            }
            "KnownCG" => {
                if let Some(cg) = number(element, content, warnings) {
                    self.known_cg = (cg / LENGTH).max(0.0);
                }
            }
            "UseKnownCG" => self.use_known_cg = content == "1",
            "Density" => {
                if let Some(density) = number(element, content, warnings) {
                    self.density = Some(density.max(0.0));
                }
            }
            "DensityType" => {
                self.density_type = integer(element, content, warnings).and_then(constants::material_type);
            }
            "Material" => self.material = Some(content.to_string()),
            _ => return false,
        }
        true
    }

    /// Applies the name, the overrides and the material.
    pub fn apply(&self, component: &mut RocketComponent, materials: &MaterialCatalog) {
        if let Some(name) = &self.name {
            component.name = name.clone();
        }
        if self.use_known_cg {
            component.mass_override.set(self.known_mass);
            component.cg_override.set(self.known_cg);
            component.override_subcomponents = false;
        }
        if let Some(name) = &self.material {
            if let Some(current) = component.material_mut() {
                let kind = current.kind;
                let divisor = constants::density_divisor(self.density_type.unwrap_or(kind));
                let density = self.density.unwrap_or(0.0) / divisor;
                *current = materials.find_material(kind, name, density);
            }
        }
    }
}

/// `Xb` and `LocationMode`.
#[derive(Debug, Default)]
pub(super) struct Placement {
    offset: f64,
    method: Option<AxialMethod>,
}

impl Placement {
    pub fn read(&mut self, element: &str, content: &str, warnings: &mut WarningSet) -> bool {
        match element {
            "Xb" => {
                if let Some(offset) = number(element, content, warnings) {
                    self.offset = offset / LENGTH;
                }
            }
            "LocationMode" => {
                if let Some(code) = integer(element, content, warnings) {
                    self.method = Some(constants::axial_method(code));
                }
            }
            _ => return false,
        }
        true
    }

    pub fn apply(&self, component: &mut RocketComponent) {
        let method = self.method.unwrap_or(AxialMethod::Top);
        component.position.axial_method = method;
        // offsets from the aft end count forward
        component.position.axial_offset = if method == AxialMethod::Bottom {
            -self.offset
        } else {
            self.offset
        };
    }
}

// ============================================================================
// Part handler
// ============================================================================

/// The kind specific half of a part.
pub(super) trait Part: 'static {
    /// Whether `Xb` and `LocationMode` apply.
    const POSITIONED: bool = true;

    /// Records a kind specific field. Returns false for any other element.
    fn read(&mut self, element: &str, content: &str, warnings: &mut WarningSet) -> bool;

    /// The part as a parent of `AttachedParts`, if it takes any.
    fn parent_info(&self) -> Option<ParentInfo> {
        None
    }

    /// Builds the component once every field has been read.
    fn build(
        self,
        base: &BaseFields,
        ctx: &LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) -> Option<RocketComponent>;
}

/// Reads one part element: common fields, placement, kind fields and
/// attached parts.
pub(super) struct PartHandler<P> {
    part: P,
    base: BaseFields,
    placement: Placement,
    children: Vec<RocketComponent>,
}

impl<P: Part> PartHandler<P> {
    pub fn open(part: P) -> Opened<RockSimOutput> {
        Opened::Delegate(Box::new(Self {
            part,
            base: BaseFields::default(),
            placement: Placement::default(),
            children: Vec::new(),
        }))
    }
}

impl<P: Part> ElementHandler<RockSimOutput> for PartHandler<P> {
    fn open_element(
        &mut self,
        element: &str,
        _attributes: &Attributes,
        _ctx: &mut LoadingContext<'_>,
        _warnings: &mut WarningSet,
    ) -> Opened<RockSimOutput> {
        match element {
            "AttachedParts" => match self.part.parent_info() {
                Some(parent) => Opened::Delegate(Box::new(PartsHandler::new(parent))),
                None => Opened::Skip,
            },
            _ => Opened::This,
        }
    }

    fn close_element(
        &mut self,
        element: &str,
        _attributes: &Attributes,
        content: &str,
        child: Option<RockSimOutput>,
        _ctx: &mut LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) {
        if let Some(RockSimOutput::Parts(parts)) = child {
            self.children.extend(parts);
            return;
        }
        if self.base.read(element, content, warnings)
            || (P::POSITIONED && self.placement.read(element, content, warnings))
            || self.part.read(element, content, warnings)
        {
            return;
        }
        log::debug!("ignoring part field <{}>", element);
    }

    fn end_handler(
        self: Box<Self>,
        _element: &str,
        _attributes: &Attributes,
        _content: &str,
        ctx: &mut LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) -> Option<RockSimOutput> {
        let PartHandler {
            part,
            base,
            placement,
            children,
        } = *self;
        let mut component = part.build(&base, ctx, warnings)?;
        base.apply(&mut component, ctx.materials());
        if P::POSITIONED {
            placement.apply(&mut component);
        }
        for child in children {
            if let Err(child) = component.try_add_child(child) {
                warnings.add(Warning::IncompatibleComponent {
                    child: child.component_type().display_name().to_string(),
                    parent: component.component_type().display_name().to_string(),
                });
            }
        }
        Some(RockSimOutput::Part(component))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{ComponentType, Material};

    #[test]
    fn test_conversion_warning_text() {
        let mut warnings = WarningSet::new();
        assert_eq!(length("Len", "foo", &mut warnings), None);
        assert_eq!(length("Len", "-1", &mut warnings), Some(0.0));
        assert_eq!(radius("OD", "100", &mut warnings), Some(0.05));
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings.iter().next().map(|w| w.to_string()),
            Some("Could not convert Len value of foo.  It is expected to be a number.".to_string())
        );
    }

    #[test]
    fn test_known_cg_overrides() {
        let mut warnings = WarningSet::new();
        let mut base = BaseFields::default();
        assert!(base.read("KnownMass", "25", &mut warnings));
        assert!(base.read("KnownCG", "-3", &mut warnings));
        assert!(base.read("UseKnownCG", "1", &mut warnings));
        assert!(!base.read("Len", "10", &mut warnings));

        let mut component = RocketComponent::new(ComponentType::BodyTube);
        component.override_subcomponents = true;
        base.apply(&mut component, MaterialCatalog::shared());
        assert!(component.mass_override.enabled);
        assert!((component.mass_override.value - 0.025).abs() < 1e-12);
        assert!(component.cg_override.enabled);
        assert_eq!(component.cg_override.value, 0.0);
        assert!(!component.override_subcomponents);
    }

    #[test]
    fn test_material_density_type() {
        let mut warnings = WarningSet::new();
        let mut base = BaseFields::default();
        base.read("Material", "Custom foam", &mut warnings);
        base.read("Density", "0.05", &mut warnings);

        let mut component = RocketComponent::new(ComponentType::NoseCone);
        base.apply(&mut component, MaterialCatalog::shared());
        let material = component.material().cloned();
        assert_eq!(material.as_ref().map(|m| m.kind), Some(MaterialType::Bulk));
        assert!(material.map_or(false, |m| (m.density - 50.0).abs() < 1e-9 && m.user_defined));

        let mut chute = RocketComponent::new(ComponentType::Parachute);
        base.read("DensityType", "1", &mut warnings);
        base.apply(&mut chute, MaterialCatalog::shared());
        let expected = Material::custom(MaterialType::Surface, "Custom foam", 0.05 / 0.1);
        assert_eq!(chute.material().map(|m| m.name.as_str()), Some(expected.name.as_str()));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_bottom_offsets_are_negated() {
        let mut warnings = WarningSet::new();
        let mut placement = Placement::default();
        placement.read("Xb", "20", &mut warnings);
        placement.read("LocationMode", "2", &mut warnings);
        let mut component = RocketComponent::new(ComponentType::CenteringRing);
        placement.apply(&mut component);
        assert_eq!(component.position.axial_method, AxialMethod::Bottom);
        assert!((component.position.axial_offset + 0.02).abs() < 1e-12);
    }
}
