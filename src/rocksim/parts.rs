//! Part lists: `StageNParts`, `AttachedParts` and sub-assemblies.

use super::base::PartHandler;
use super::body::{BodyTubePart, InnerTubePart, LaunchLugPart, TransitionPart};
use super::fins::FinSetPart;
use super::recovery::{MassObjectPart, ParachutePart, StreamerPart};
use super::ring::RingPart;
use super::RockSimOutput;
use crate::context::LoadingContext;
use crate::objects::{ComponentType, RocketComponent};
use crate::reader::{Attributes, ElementHandler, Opened};
use crate::warning::{Warning, WarningSet};

/// What parts in a list know about the component they attach to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct ParentInfo {
    pub component_type: ComponentType,
    pub fore_radius: f64,
    pub aft_radius: f64,
}

impl ParentInfo {
    pub fn stage() -> Self {
        Self {
            component_type: ComponentType::Stage,
            fore_radius: 0.0,
            aft_radius: 0.0,
        }
    }

    pub fn of(component: &RocketComponent) -> Self {
        Self {
            component_type: component.component_type(),
            fore_radius: component.fore_radius().unwrap_or(0.0),
            aft_radius: component.aft_radius().unwrap_or(0.0),
        }
    }
}

/// Reads a list of parts attached to one parent.
pub(super) struct PartsHandler {
    parent: ParentInfo,
    parts: Vec<RocketComponent>,
}

impl PartsHandler {
    pub fn new(parent: ParentInfo) -> Self {
        Self {
            parent,
            parts: Vec::new(),
        }
    }

    fn unsupported(what: &str, warnings: &mut WarningSet) -> Opened<RockSimOutput> {
        warnings.add(format!("{} are not currently supported. Ignoring.", what));
        Opened::Skip
    }
}

impl ElementHandler<RockSimOutput> for PartsHandler {
    fn open_element(
        &mut self,
        element: &str,
        _attributes: &Attributes,
        _ctx: &mut LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) -> Opened<RockSimOutput> {
        match element {
            "NoseCone" => PartHandler::open(TransitionPart::nose_cone()),
            "Transition" => PartHandler::open(TransitionPart::transition()),
            "BodyTube" if self.parent.component_type == ComponentType::Stage => {
                PartHandler::open(BodyTubePart::default())
            }
            "BodyTube" => PartHandler::open(InnerTubePart::default()),
            "FinSet" | "CustomFinSet" => PartHandler::open(FinSetPart::new(self.parent)),
            "LaunchLug" => PartHandler::open(LaunchLugPart::default()),
            "Ring" => PartHandler::open(RingPart::default()),
            "Parachute" => PartHandler::open(ParachutePart::default()),
            "Streamer" => PartHandler::open(StreamerPart::default()),
            "MassObject" => PartHandler::open(MassObjectPart::default()),
            "SubAssembly" => Opened::Delegate(Box::new(SubAssemblyHandler {
                parent: self.parent,
                parts: Vec::new(),
            })),
            "TubeFinSet" => Self::unsupported("Tube fins", warnings),
            "RingTail" => Self::unsupported("Ring tails", warnings),
            "ExternalPod" => Self::unsupported("Pods", warnings),
            _ => {
                warnings.add(Warning::UnknownElement(element.to_string()));
                Opened::Skip
            }
        }
    }

    fn close_element(
        &mut self,
        _element: &str,
        _attributes: &Attributes,
        _content: &str,
        child: Option<RockSimOutput>,
        _ctx: &mut LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) {
        match child {
            Some(RockSimOutput::Part(part)) => {
                if self.parent.component_type.is_compatible_child(part.component_type()) {
                    self.parts.push(part);
                } else {
                    warnings.add(Warning::IncompatibleComponent {
                        child: part.component_type().display_name().to_string(),
                        parent: self.parent.component_type.display_name().to_string(),
                    });
                }
            }
            Some(RockSimOutput::Parts(parts)) => self.parts.extend(parts),
            _ => {}
        }
    }

    fn end_handler(
        self: Box<Self>,
        _element: &str,
        _attributes: &Attributes,
        _content: &str,
        _ctx: &mut LoadingContext<'_>,
        _warnings: &mut WarningSet,
    ) -> Option<RockSimOutput> {
        Some(RockSimOutput::Parts(self.parts))
    }
}

/// A sub-assembly; its attached parts go to the enclosing parent.
struct SubAssemblyHandler {
    parent: ParentInfo,
    parts: Vec<RocketComponent>,
}

impl ElementHandler<RockSimOutput> for SubAssemblyHandler {
    fn open_element(
        &mut self,
        element: &str,
        _attributes: &Attributes,
        _ctx: &mut LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) -> Opened<RockSimOutput> {
        match element {
            "AttachedParts" => Opened::Delegate(Box::new(PartsHandler::new(self.parent))),
            "PodParts" => {
                warnings.add("Pod sub-assemblies are not currently supported. Ignoring.");
                Opened::Skip
            }
            _ => Opened::Skip,
        }
    }

    fn close_element(
        &mut self,
        _element: &str,
        _attributes: &Attributes,
        _content: &str,
        child: Option<RockSimOutput>,
        _ctx: &mut LoadingContext<'_>,
        _warnings: &mut WarningSet,
    ) {
        if let Some(RockSimOutput::Parts(parts)) = child {
            self.parts.extend(parts);
        }
    }

    fn end_handler(
        self: Box<Self>,
        _element: &str,
        _attributes: &Attributes,
        _content: &str,
        _ctx: &mut LoadingContext<'_>,
        _warnings: &mut WarningSet,
    ) -> Option<RockSimOutput> {
        Some(RockSimOutput::Parts(self.parts))
    }
}

/// Reads a single part list element with a default context.
#[cfg(test)]
pub(super) fn read_parts(xml: &str, parent: ParentInfo) -> (Vec<RocketComponent>, WarningSet) {
    struct Collect(PartsHandler);

    impl ElementHandler<RockSimOutput> for Collect {
        fn open_element(
            &mut self,
            _element: &str,
            _attributes: &Attributes,
            _ctx: &mut LoadingContext<'_>,
            _warnings: &mut WarningSet,
        ) -> Opened<RockSimOutput> {
            Opened::Delegate(Box::new(PartsHandler::new(self.0.parent)))
        }

        fn close_element(
            &mut self,
            _element: &str,
            _attributes: &Attributes,
            _content: &str,
            child: Option<RockSimOutput>,
            _ctx: &mut LoadingContext<'_>,
            _warnings: &mut WarningSet,
        ) {
            if let Some(RockSimOutput::Parts(parts)) = child {
                self.0.parts = parts;
            }
        }
    }

    let mut ctx = LoadingContext::new();
    let mut warnings = WarningSet::new();
    let mut root = Collect(PartsHandler::new(parent));
    crate::reader::read_xml(std::io::Cursor::new(xml.to_string()), &mut root, &mut ctx, &mut warnings)
        .unwrap();
    (root.0.parts, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_assembly_parts_move_to_stage() {
        let xml = r#"<Stage3Parts>
            <NoseCone><Len>100</Len></NoseCone>
            <SubAssembly>
              <Name>Middle</Name>
              <AttachedParts>
                <BodyTube><Len>300</Len><OD>50</OD></BodyTube>
                <Transition><Len>40</Len></Transition>
              </AttachedParts>
            </SubAssembly>
            <BodyTube><Len>200</Len></BodyTube>
        </Stage3Parts>"#;
        let (parts, warnings) = read_parts(xml, ParentInfo::stage());
        assert!(warnings.is_empty(), "{:?}", warnings);
        let types: Vec<ComponentType> = parts.iter().map(|p| p.component_type()).collect();
        assert_eq!(
            types,
            vec![
                ComponentType::NoseCone,
                ComponentType::BodyTube,
                ComponentType::Transition,
                ComponentType::BodyTube,
            ]
        );
        assert_eq!(parts[1].length(), Some(0.3));
    }

    #[test]
    fn test_unsupported_and_unknown_parts() {
        let xml = r#"<AttachedParts>
            <TubeFinSet><Len>10</Len></TubeFinSet>
            <RingTail/>
            <ExternalPod/>
            <Gizmo/>
            <LaunchLug><Len>30</Len></LaunchLug>
        </AttachedParts>"#;
        let tube = RocketComponent::new(ComponentType::BodyTube);
        let (parts, warnings) = read_parts(xml, ParentInfo::of(&tube));
        let messages: Vec<String> = warnings.iter().map(|w| w.to_string()).collect();
        assert_eq!(
            messages,
            vec![
                "Tube fins are not currently supported. Ignoring.",
                "Ring tails are not currently supported. Ignoring.",
                "Pods are not currently supported. Ignoring.",
                "Unknown element Gizmo, ignoring.",
            ]
        );
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].component_type(), ComponentType::LaunchLug);
    }

    #[test]
    fn test_incompatible_placement() {
        let xml = r#"<AttachedParts>
            <Transition><Len>40</Len></Transition>
            <Ring><UsageCode>0</UsageCode></Ring>
        </AttachedParts>"#;
        let tube = RocketComponent::new(ComponentType::BodyTube);
        let (parts, warnings) = read_parts(xml, ParentInfo::of(&tube));
        assert_eq!(
            warnings.iter().next(),
            Some(&Warning::IncompatibleComponent {
                child: "Transition".to_string(),
                parent: "Body tube".to_string(),
            })
        );
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].component_type(), ComponentType::CenteringRing);
    }

    #[test]
    fn test_stage_level_fins_are_rejected() {
        let xml = r#"<Stage3Parts><FinSet><ShapeCode>0</ShapeCode></FinSet></Stage3Parts>"#;
        let (parts, warnings) = read_parts(xml, ParentInfo::stage());
        assert!(parts.is_empty());
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings.iter().next().map(|w| w.to_string()),
            Some("Trapezoidal fin set can not be attached to Stage, ignoring component.".to_string())
        );
    }
}
