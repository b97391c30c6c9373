//! `FinSet` and `CustomFinSet`.
//!
//! The component kind is only known once `ShapeCode` has been read: 0 is a
//! trapezoidal set, 1 elliptical and 2 freeform with its outline in
//! `PointList`. A trapezoidal set on a transition becomes freeform since the
//! root follows the sloped body.

use super::base::{integer, length, number, BaseFields, Part};
use super::constants::{self, LENGTH, MASS};
use super::parts::ParentInfo;
use crate::context::LoadingContext;
use crate::objects::{
    parse_double, ComponentKind, ComponentType, Coordinate, CrossSection, FinSet, RocketComponent,
};
use crate::warning::WarningSet;

pub(super) struct FinSetPart {
    parent: ParentInfo,
    fins: FinSet,
    shape_code: Option<i32>,
    tab_depth: f64,
    point_list: Option<String>,
    calc_mass: f64,
    calc_cg: f64,
}

impl FinSetPart {
    pub fn new(parent: ParentInfo) -> Self {
        Self {
            parent,
            fins: FinSet::default(),
            shape_code: None,
            tab_depth: 0.0,
            point_list: None,
            calc_mass: 0.0,
            calc_cg: 0.0,
        }
    }
}

impl Part for FinSetPart {
    fn read(&mut self, element: &str, content: &str, w: &mut WarningSet) -> bool {
        let fins = &mut self.fins;
        match element {
            "ShapeCode" => self.shape_code = integer(element, content, w).or(self.shape_code),
            "FinCount" => fins.fin_count = integer(element, content, w).unwrap_or(fins.fin_count),
            "RootChord" => fins.root_chord = length(element, content, w).unwrap_or(fins.root_chord),
            "TipChord" => fins.tip_chord = length(element, content, w).unwrap_or(fins.tip_chord),
            "SemiSpan" => fins.height = length(element, content, w).unwrap_or(fins.height),
            "SweepDistance" => {
                if let Some(sweep) = number(element, content, w) {
                    fins.sweep = sweep / LENGTH;
                }
            }
            "Thickness" => fins.thickness = length(element, content, w).unwrap_or(fins.thickness),
            "TipShapeCode" => {
                if let Some(code) = integer(element, content, w) {
                    fins.cross_section = constants::cross_section(code);
                }
            }
            "TabLength" => fins.tab_length = length(element, content, w).unwrap_or(fins.tab_length),
            "TabDepth" => self.tab_depth = length(element, content, w).unwrap_or(self.tab_depth),
            "TabOffset" => {
                if let Some(offset) = number(element, content, w) {
                    fins.tab_shift = offset / LENGTH;
                }
            }
            "RadialAngle" => fins.base_rotation = number(element, content, w).unwrap_or(fins.base_rotation),
            "FinishCode" => {
                if let Some(code) = integer(element, content, w) {
                    fins.external.finish = constants::finish(code);
                }
            }
            "PointList" => self.point_list = Some(content.to_string()),
            "CalcMass" => {
                if let Some(mass) = number(element, content, w) {
                    self.calc_mass = (mass / MASS).max(0.0);
                }
            }
            "CalcCG" => {
                if let Some(cg) = number(element, content, w) {
                    self.calc_cg = (cg / LENGTH).max(0.0);
                }
            }
            _ => return false,
        }
        true
    }

    fn build(
        self,
        base: &BaseFields,
        _ctx: &LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) -> Option<RocketComponent> {
        let mut fins = self.fins;
        let step = (self.parent.fore_radius - self.parent.aft_radius).max(0.0);
        fins.tab_height = (self.tab_depth - step).max(0.0);

        let code = self.shape_code.unwrap_or(0);
        let kind = match code {
            0 if self.parent.component_type == ComponentType::Transition => {
                fins.points = fins.trapezoid_outline();
                ComponentKind::FreeformFinSet(fins)
            }
            0 => ComponentKind::TrapezoidFinSet(fins),
            1 => ComponentKind::EllipticalFinSet(fins),
            2 => {
                let points = parse_points(self.point_list.as_deref().unwrap_or(""), warnings);
                if FinSet::is_valid_outline(&points) {
                    fins.points = points;
                } else {
                    warnings.add("Illegal fin points specification, ignoring.");
                }
                ComponentKind::FreeformFinSet(fins)
            }
            _ => {
                warnings.add(format!("Unsupported fin shape code {}, ignoring fin set.", code));
                return None;
            }
        };

        let mut component = RocketComponent::with_kind(kind);
        let airfoil = component
            .fin_set()
            .is_some_and(|f| f.cross_section == CrossSection::Airfoil);
        if airfoil && !base.use_known_cg {
            component.mass_override.set(self.calc_mass);
            component.cg_override.set(self.calc_cg);
            component.override_subcomponents = false;
        }
        Some(component)
    }
}

/// Parses `x,y|x,y|...` in millimetres.
///
/// Repeated origins are dropped and a list that ends at the origin is
/// reversed so the outline starts at the leading edge.
fn parse_points(list: &str, warnings: &mut WarningSet) -> Vec<Coordinate> {
    let mut points: Vec<Coordinate> = Vec::new();
    for pair in list.split('|').map(str::trim).filter(|p| !p.is_empty()) {
        let mut values = pair.split(',');
        let (Some(x), Some(y)) = (values.next(), values.next()) else {
            warnings.add("Invalid fin point pair.");
            continue;
        };
        match (parse_double(x), parse_double(y)) {
            (Some(x), Some(y)) => {
                let point = Coordinate::new(x / LENGTH, y / LENGTH);
                if point == Coordinate::ORIGIN && points.contains(&Coordinate::ORIGIN) {
                    continue;
                }
                points.push(point);
            }
            _ => warnings.add("Fin point not in numeric format."),
        }
    }
    if points.len() > 1 && points.last() == Some(&Coordinate::ORIGIN) {
        points.reverse();
    }
    points
}

#[cfg(test)]
mod tests {
    use super::super::parts::read_parts;
    use super::*;
    use crate::objects::AxialMethod;

    fn tube() -> ParentInfo {
        ParentInfo::of(&RocketComponent::new(ComponentType::BodyTube))
    }

    #[test]
    fn test_point_list() {
        let mut warnings = WarningSet::new();
        let points = parse_points("50,0|40,30|10,30|0,0|0,0|", &mut warnings);
        assert!(warnings.is_empty());
        assert_eq!(points.first(), Some(&Coordinate::ORIGIN));
        assert_eq!(points.len(), 4);
        assert!((points[3].x - 0.05).abs() < 1e-12);

        let points = parse_points("0,0|a,b|7|30,0", &mut warnings);
        assert_eq!(points.len(), 2);
        let messages: Vec<String> = warnings.iter().map(|w| w.to_string()).collect();
        assert_eq!(messages, vec!["Fin point not in numeric format.", "Invalid fin point pair."]);
    }

    #[test]
    fn test_trapezoid_fins() {
        let xml = r#"<AttachedParts><FinSet>
            <ShapeCode>0</ShapeCode><FinCount>4</FinCount>
            <RootChord>80</RootChord><TipChord>40</TipChord><SemiSpan>60</SemiSpan>
            <SweepDistance>30</SweepDistance><Thickness>3</Thickness>
            <TabDepth>10</TabDepth><TabLength>50</TabLength><TabOffset>15</TabOffset>
            <Xb>10</Xb><LocationMode>2</LocationMode>
        </FinSet></AttachedParts>"#;
        let (parts, warnings) = read_parts(xml, tube());
        assert!(warnings.is_empty(), "{:?}", warnings);
        let component = &parts[0];
        assert_eq!(component.component_type(), ComponentType::TrapezoidFinSet);
        assert_eq!(component.position.axial_method, AxialMethod::Bottom);
        assert!((component.position.axial_offset + 0.01).abs() < 1e-12);
        let fins = component.fin_set().unwrap();
        assert_eq!(fins.fin_count, 4);
        assert!((fins.root_chord - 0.08).abs() < 1e-12);
        assert!((fins.height - 0.06).abs() < 1e-12);
        assert!((fins.tab_height - 0.01).abs() < 1e-12);
        assert!((fins.tab_shift - 0.015).abs() < 1e-12);
    }

    #[test]
    fn test_fins_on_transition_become_freeform() {
        let parent = ParentInfo {
            component_type: ComponentType::Transition,
            fore_radius: 0.03,
            aft_radius: 0.02,
        };
        let xml = r#"<AttachedParts><FinSet>
            <ShapeCode>0</ShapeCode><RootChord>50</RootChord><TabDepth>15</TabDepth>
        </FinSet></AttachedParts>"#;
        let (parts, _) = read_parts(xml, parent);
        assert_eq!(parts[0].component_type(), ComponentType::FreeformFinSet);
        let fins = parts[0].fin_set().unwrap();
        assert_eq!(fins.points.len(), 4);
        assert!((fins.points[3].x - 0.05).abs() < 1e-12);
        assert!((fins.tab_height - 0.005).abs() < 1e-12);
    }

    #[test]
    fn test_freeform_and_airfoil() {
        let xml = r#"<AttachedParts><CustomFinSet>
            <ShapeCode>2</ShapeCode><TipShapeCode>2</TipShapeCode>
            <PointList>0,0|20,40|60,40|70,0</PointList>
            <CalcMass>12</CalcMass><CalcCG>35</CalcCG>
        </CustomFinSet><FinSet><ShapeCode>2</ShapeCode><PointList>5,5|6,0</PointList></FinSet>
        </AttachedParts>"#;
        let (parts, warnings) = read_parts(xml, tube());
        let component = &parts[0];
        assert_eq!(component.component_type(), ComponentType::FreeformFinSet);
        assert_eq!(component.fin_set().unwrap().points.len(), 4);
        assert!(component.mass_override.enabled);
        assert!((component.mass_override.value - 0.012).abs() < 1e-12);
        assert!((component.cg_override.value - 0.035).abs() < 1e-12);

        assert_eq!(parts[1].fin_set().unwrap().points, FinSet::default().points);
        assert_eq!(
            warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
            vec!["Illegal fin points specification, ignoring."]
        );
    }
}
