//! Body parts: nose cones, transitions, tubes and launch lugs.

use super::base::{integer, length, number, radius, BaseFields, Part};
use super::constants::{self, LENGTH};
use super::parts::ParentInfo;
use crate::context::LoadingContext;
use crate::objects::{ComponentType, RocketComponent, Transition};
use crate::warning::WarningSet;

/// Applies a `FinishCode` to an external component.
fn read_finish(component: &mut RocketComponent, content: &str, warnings: &mut WarningSet) {
    if let (Some(code), Some(external)) = (integer("FinishCode", content, warnings), component.external_mut()) {
        external.finish = constants::finish(code);
    }
}

// ============================================================================
// Nose cones and transitions
// ============================================================================

/// `NoseCone` and `Transition`.
pub(super) struct TransitionPart {
    component: RocketComponent,
    shape_parameter: Option<f64>,
    construction: Option<i32>,
    wall: Option<f64>,
}

impl TransitionPart {
    pub fn nose_cone() -> Self {
        Self::of(ComponentType::NoseCone)
    }

    pub fn transition() -> Self {
        Self::of(ComponentType::Transition)
    }

    fn of(component_type: ComponentType) -> Self {
        let mut component = RocketComponent::new(component_type);
        if let Some(t) = component.transition_mut() {
            t.aft_radius_automatic = false;
        }
        Self {
            component,
            shape_parameter: None,
            construction: None,
            wall: None,
        }
    }

    fn is_nose(&self) -> bool {
        self.component.component_type() == ComponentType::NoseCone
    }

    fn body(&mut self) -> Option<&mut Transition> {
        self.component.transition_mut()
    }
}

impl Part for TransitionPart {
    const POSITIONED: bool = false;

    fn read(&mut self, element: &str, content: &str, w: &mut WarningSet) -> bool {
        let nose = self.is_nose();
        match element {
            "ShapeCode" => {
                if let (Some(code), Some(t)) = (integer(element, content, w), self.body()) {
                    t.shape = constants::shape(code);
                }
            }
            "ShapeParameter" => self.shape_parameter = number(element, content, w).or(self.shape_parameter),
            "ConstructionType" => self.construction = integer(element, content, w).or(self.construction),
            "WallThickness" => self.wall = length(element, content, w).or(self.wall),
            "FinishCode" => read_finish(&mut self.component, content, w),
            "Len" => {
                if let (Some(len), Some(t)) = (length(element, content, w), self.body()) {
                    t.length = len;
                }
            }
            "BaseDia" if nose => {
                if let (Some(r), Some(t)) = (radius(element, content, w), self.body()) {
                    t.aft_radius = r;
                }
            }
            "ShoulderOD" if nose => {
                if let (Some(r), Some(t)) = (radius(element, content, w), self.body()) {
                    t.aft_shoulder.radius = r;
                }
            }
            "ShoulderLen" if nose => {
                if let (Some(len), Some(t)) = (length(element, content, w), self.body()) {
                    t.aft_shoulder.length = len;
                }
            }
            "FrontDia" if !nose => {
                if let (Some(r), Some(t)) = (radius(element, content, w), self.body()) {
                    t.fore_radius = r;
                    t.fore_radius_automatic = false;
                }
            }
            "RearDia" if !nose => {
                if let (Some(r), Some(t)) = (radius(element, content, w), self.body()) {
                    t.aft_radius = r;
                }
            }
            "FrontShoulderDia" if !nose => {
                if let (Some(r), Some(t)) = (radius(element, content, w), self.body()) {
                    t.fore_shoulder.radius = r;
                }
            }
            "FrontShoulderLen" if !nose => {
                if let (Some(len), Some(t)) = (length(element, content, w), self.body()) {
                    t.fore_shoulder.length = len;
                }
            }
            "RearShoulderDia" if !nose => {
                if let (Some(r), Some(t)) = (radius(element, content, w), self.body()) {
                    t.aft_shoulder.radius = r;
                }
            }
            "RearShoulderLen" if !nose => {
                if let (Some(len), Some(t)) = (length(element, content, w), self.body()) {
                    t.aft_shoulder.length = len;
                }
            }
            _ => return false,
        }
        true
    }

    fn parent_info(&self) -> Option<ParentInfo> {
        Some(ParentInfo::of(&self.component))
    }

    fn build(
        mut self,
        _base: &BaseFields,
        _ctx: &LoadingContext<'_>,
        _warnings: &mut WarningSet,
    ) -> Option<RocketComponent> {
        let (parameter, construction, wall) = (self.shape_parameter, self.construction, self.wall);
        if let Some(t) = self.body() {
            match parameter {
                Some(value) => t.set_shape_parameter(value),
                None => t.shape_parameter = t.shape.default_parameter(),
            }
            if construction == Some(0) {
                t.filled = true;
                t.thickness = t.fore_radius.max(t.aft_radius);
            } else if let Some(wall) = wall {
                t.thickness = wall;
                t.fore_shoulder.thickness = wall;
                t.aft_shoulder.thickness = wall;
            }
        }
        Some(self.component)
    }
}

// ============================================================================
// Tubes
// ============================================================================

/// Fields shared by outer and inner tubes.
#[derive(Debug, Default)]
struct TubeFields {
    outer: Option<f64>,
    inner: Option<f64>,
    length: Option<f64>,
    motor_mount: bool,
    overhang: f64,
}

impl TubeFields {
    fn read(&mut self, element: &str, content: &str, w: &mut WarningSet) -> bool {
        match element {
            "OD" => self.outer = radius(element, content, w).or(self.outer),
            "ID" => self.inner = radius(element, content, w).or(self.inner),
            "Len" => self.length = length(element, content, w).or(self.length),
            "IsMotorMount" => self.motor_mount = content == "1",
            "EngineOverhang" => {
                if let Some(overhang) = number(element, content, w) {
                    self.overhang = overhang / LENGTH;
                }
            }
            _ => return false,
        }
        true
    }
}

/// A `BodyTube` directly in a stage.
#[derive(Default)]
pub(super) struct BodyTubePart {
    tube: TubeFields,
    finish: Option<String>,
}

impl Part for BodyTubePart {
    const POSITIONED: bool = false;

    fn read(&mut self, element: &str, content: &str, w: &mut WarningSet) -> bool {
        if element == "FinishCode" {
            self.finish = Some(content.to_string());
            return true;
        }
        self.tube.read(element, content, w)
    }

    fn parent_info(&self) -> Option<ParentInfo> {
        let outer = self.tube.outer.unwrap_or(0.0);
        Some(ParentInfo {
            component_type: ComponentType::BodyTube,
            fore_radius: outer,
            aft_radius: outer,
        })
    }

    fn build(
        self,
        _base: &BaseFields,
        _ctx: &LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) -> Option<RocketComponent> {
        let mut component = RocketComponent::new(ComponentType::BodyTube);
        if let Some(finish) = &self.finish {
            read_finish(&mut component, finish, warnings);
        }
        let tube = component.body_tube_mut()?;
        let fields = self.tube;
        if let Some(len) = fields.length {
            tube.length = len;
        }
        if let Some(outer) = fields.outer {
            tube.outer_radius = outer;
        }
        if let Some(inner) = fields.inner {
            tube.thickness = (tube.outer_radius - inner).max(0.0);
        }
        tube.motor_mount.is_mount = fields.motor_mount;
        tube.motor_mount.overhang = fields.overhang;
        Some(component)
    }
}

/// A `BodyTube` attached to another part.
#[derive(Default)]
pub(super) struct InnerTubePart {
    tube: TubeFields,
}

impl Part for InnerTubePart {
    fn read(&mut self, element: &str, content: &str, w: &mut WarningSet) -> bool {
        self.tube.read(element, content, w)
    }

    fn parent_info(&self) -> Option<ParentInfo> {
        let outer = self.tube.outer.unwrap_or(0.0);
        Some(ParentInfo {
            component_type: ComponentType::InnerTube,
            fore_radius: outer,
            aft_radius: outer,
        })
    }

    fn build(
        self,
        _base: &BaseFields,
        _ctx: &LoadingContext<'_>,
        _warnings: &mut WarningSet,
    ) -> Option<RocketComponent> {
        let mut component = RocketComponent::new(ComponentType::InnerTube);
        let tube = component.inner_tube_mut()?;
        let fields = self.tube;
        if let Some(len) = fields.length {
            tube.ring.length = len;
        }
        if let Some(outer) = fields.outer {
            tube.ring.outer_radius = outer;
        }
        if let Some(inner) = fields.inner {
            tube.ring.inner_radius = inner;
        }
        tube.ring.thickness = (tube.ring.outer_radius - tube.ring.inner_radius).max(0.0);
        tube.motor_mount.is_mount = fields.motor_mount;
        tube.motor_mount.overhang = fields.overhang;
        Some(component)
    }
}

// ============================================================================
// Launch lugs
// ============================================================================

/// `LaunchLug`.
#[derive(Default)]
pub(super) struct LaunchLugPart {
    outer: Option<f64>,
    inner: Option<f64>,
    length: Option<f64>,
    angle: Option<f64>,
    finish: Option<String>,
}

impl Part for LaunchLugPart {
    fn read(&mut self, element: &str, content: &str, w: &mut WarningSet) -> bool {
        match element {
            "OD" => self.outer = radius(element, content, w).or(self.outer),
            "ID" => self.inner = radius(element, content, w).or(self.inner),
            "Len" => self.length = length(element, content, w).or(self.length),
            "RadialAngle" => self.angle = number(element, content, w).or(self.angle),
            "FinishCode" => self.finish = Some(content.to_string()),
            _ => return false,
        }
        true
    }

    fn build(
        self,
        _base: &BaseFields,
        _ctx: &LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) -> Option<RocketComponent> {
        let mut component = RocketComponent::new(ComponentType::LaunchLug);
        if let Some(finish) = &self.finish {
            read_finish(&mut component, finish, warnings);
        }
        if let Some(angle) = self.angle {
            component.position.angle_offset = angle;
        }
        let lug = component.launch_lug_mut()?;
        if let Some(len) = self.length {
            lug.length = len;
        }
        if let Some(outer) = self.outer {
            lug.outer_radius = outer;
        }
        if let Some(inner) = self.inner {
            lug.thickness = (lug.outer_radius - inner).max(0.0);
        }
        Some(component)
    }
}

#[cfg(test)]
mod tests {
    use super::super::parts::read_parts;
    use super::*;
    use crate::objects::{Finish, Shape};

    #[test]
    fn test_nose_cone_fields() {
        let xml = r#"<Stage3Parts><NoseCone>
            <Name>Tip</Name>
            <ShapeCode>1</ShapeCode>
            <Len>120</Len>
            <BaseDia>50</BaseDia>
            <ShoulderLen>30</ShoulderLen>
            <ShoulderOD>48</ShoulderOD>
            <ConstructionType>1</ConstructionType>
            <WallThickness>1.5</WallThickness>
            <FinishCode>0</FinishCode>
            <FrontDia>10</FrontDia>
        </NoseCone></Stage3Parts>"#;
        let (parts, warnings) = read_parts(xml, ParentInfo::stage());
        assert!(warnings.is_empty(), "{:?}", warnings);
        let nose = &parts[0];
        assert_eq!(nose.name, "Tip");
        let t = nose.transition().unwrap();
        assert_eq!(t.shape, Shape::Ogive);
        assert!((t.length - 0.12).abs() < 1e-12);
        assert!((t.aft_radius - 0.025).abs() < 1e-12);
        assert_eq!(t.fore_radius, 0.0);
        assert!((t.aft_shoulder.radius - 0.024).abs() < 1e-12);
        assert!((t.aft_shoulder.thickness - 0.0015).abs() < 1e-12);
        assert!(!t.filled);
        assert_eq!(t.external.finish, Finish::Polished);
    }

    #[test]
    fn test_solid_transition_and_clamping() {
        let xml = r#"<Stage3Parts><Transition>
            <ShapeCode>6</ShapeCode>
            <ShapeParameter>100</ShapeParameter>
            <FrontDia>-1</FrontDia>
            <RearDia>100</RearDia>
            <Len>foo</Len>
            <ConstructionType>0</ConstructionType>
        </Transition></Stage3Parts>"#;
        let (parts, warnings) = read_parts(xml, ParentInfo::stage());
        assert_eq!(warnings.len(), 1);
        let t = parts[0].transition().unwrap();
        assert_eq!(t.shape, Shape::Haack);
        assert_eq!(t.shape_parameter, Shape::Haack.max_parameter());
        assert_eq!(t.fore_radius, 0.0);
        assert!((t.aft_radius - 0.05).abs() < 1e-12);
        assert!(t.filled);
        assert_eq!(t.thickness, t.aft_radius);
    }

    #[test]
    fn test_tube_with_inner_motor_mount() {
        let xml = r#"<Stage3Parts><BodyTube>
            <OD>66</OD><ID>64</ID><Len>400</Len>
            <AttachedParts>
              <BodyTube>
                <OD>30</OD><ID>29</ID><Len>70</Len>
                <IsMotorMount>1</IsMotorMount>
                <EngineOverhang>5</EngineOverhang>
                <Xb>330</Xb>
              </BodyTube>
            </AttachedParts>
        </BodyTube></Stage3Parts>"#;
        let (parts, warnings) = read_parts(xml, ParentInfo::stage());
        assert!(warnings.is_empty(), "{:?}", warnings);
        let tube = parts[0].body_tube().unwrap();
        assert!((tube.outer_radius - 0.033).abs() < 1e-12);
        assert!((tube.thickness - 0.001).abs() < 1e-12);
        assert!(!tube.motor_mount.is_mount);

        let inner = &parts[0].children()[0];
        assert_eq!(inner.component_type(), ComponentType::InnerTube);
        let mount = inner.motor_mount().unwrap();
        assert!(mount.is_mount);
        assert!((mount.overhang - 0.005).abs() < 1e-12);
        assert!((inner.position.axial_offset - 0.33).abs() < 1e-12);
        assert!((inner.ring().unwrap().length - 0.07).abs() < 1e-12);
    }
}
