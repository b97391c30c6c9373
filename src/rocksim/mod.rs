//! Reader for RockSim `.rkt` designs.
//!
//! ```xml
//! <RockSimDocument>
//!   <FileVersion>4</FileVersion>
//!   <DesignInformation>
//!     <RocketDesign>
//!       <Name>Alpha</Name>
//!       <StageCount>1</StageCount>
//!       <Stage3Parts>
//!         <NoseCone>...</NoseCone>
//!         <BodyTube><AttachedParts>...</AttachedParts></BodyTube>
//!       </Stage3Parts>
//!     </RocketDesign>
//!   </DesignInformation>
//! </RockSimDocument>
//! ```
//!
//! RockSim numbers stages from the booster, so `Stage3Parts` holds the
//! topmost stage. `StageCount` is only honored ahead of the first stage's
//! parts; a later count leaves the design single-stage. Values are
//! converted to SI units with the divisors in [`constants`].

mod base;
mod body;
pub mod constants;
mod fins;
mod parts;
mod recovery;
mod ring;

use crate::context::LoadingContext;
use crate::error::{Error, Result};
use crate::objects::{ComponentType, RocketComponent};
use crate::reader::{read_xml, Attributes, ElementHandler, Opened};
use crate::warning::{Warning, WarningSet};
use base::number;
use constants::{LENGTH, MASS};
use parts::{ParentInfo, PartsHandler};
use std::io::BufRead;

/// What an interchange handler hands to its owner.
pub(crate) enum RockSimOutput {
    Part(RocketComponent),
    Parts(Vec<RocketComponent>),
    Rocket(RocketComponent),
}

/// Reads a RockSim document into the context's document.
///
/// Fails on malformed markup and when the document holds no rocket design.
pub fn read_rocksim<R: BufRead>(
    source: R,
    ctx: &mut LoadingContext<'_>,
    warnings: &mut WarningSet,
) -> Result<()> {
    let mut root = DocumentHandler;
    read_xml(source, &mut root, ctx, warnings)?;
    if !ctx.design_loaded() {
        return Err(Error::NoDesign);
    }
    Ok(())
}

// ============================================================================
// Document level handlers
// ============================================================================

struct DocumentHandler;

impl ElementHandler<RockSimOutput> for DocumentHandler {
    fn open_element(
        &mut self,
        element: &str,
        _attributes: &Attributes,
        _ctx: &mut LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) -> Opened<RockSimOutput> {
        if element != "RockSimDocument" {
            warnings.add(Warning::UnknownElement(element.to_string()));
            return Opened::Skip;
        }
        log::info!("reading RockSim document");
        Opened::Delegate(Box::new(RockSimDocumentHandler))
    }
}

/// Children of `RockSimDocument`.
struct RockSimDocumentHandler;

impl ElementHandler<RockSimOutput> for RockSimDocumentHandler {
    fn open_element(
        &mut self,
        element: &str,
        _attributes: &Attributes,
        _ctx: &mut LoadingContext<'_>,
        _warnings: &mut WarningSet,
    ) -> Opened<RockSimOutput> {
        match element {
            "FileVersion" => Opened::This,
            "DesignInformation" => Opened::Delegate(Box::new(DesignInformationHandler)),
            _ => Opened::Skip,
        }
    }

    fn close_element(
        &mut self,
        element: &str,
        _attributes: &Attributes,
        content: &str,
        _child: Option<RockSimOutput>,
        ctx: &mut LoadingContext<'_>,
        _warnings: &mut WarningSet,
    ) {
        if element == "FileVersion" {
            log::debug!("RockSim file version {}", content);
            ctx.document_mut().source_version = Some(content.to_string());
        }
    }
}

struct DesignInformationHandler;

impl ElementHandler<RockSimOutput> for DesignInformationHandler {
    fn open_element(
        &mut self,
        element: &str,
        _attributes: &Attributes,
        _ctx: &mut LoadingContext<'_>,
        _warnings: &mut WarningSet,
    ) -> Opened<RockSimOutput> {
        match element {
            "RocketDesign" => Opened::Delegate(Box::new(RocketDesignHandler::default())),
            _ => Opened::Skip,
        }
    }

    fn close_element(
        &mut self,
        _element: &str,
        _attributes: &Attributes,
        _content: &str,
        child: Option<RockSimOutput>,
        ctx: &mut LoadingContext<'_>,
        _warnings: &mut WarningSet,
    ) {
        if let Some(RockSimOutput::Rocket(rocket)) = child {
            ctx.document_mut().rocket = rocket;
            ctx.mark_design_loaded();
        }
    }
}

// ============================================================================
// Rocket design
// ============================================================================

/// Per-stage values, topmost stage first.
#[derive(Default)]
struct StageFields {
    parts: Option<Vec<RocketComponent>>,
    mass: f64,
    cg: f64,
}

#[derive(Default)]
struct RocketDesignHandler {
    name: Option<String>,
    stage_count: Option<i32>,
    stages: [StageFields; 3],
    parts_seen: bool,
}

impl RocketDesignHandler {
    fn count(&self) -> i32 {
        self.stage_count.unwrap_or(1)
    }

    /// Whether the stage of a `StageN...` element is part of the design.
    fn stage_included(&self, element: &str) -> bool {
        match stage_index(element) {
            Some(0) => true,
            Some(1) => self.count() >= 2,
            Some(_) => self.count() == 3,
            None => false,
        }
    }
}

/// Index into [`RocketDesignHandler::stages`] of a `StageN...` element.
fn stage_index(element: &str) -> Option<usize> {
    match element {
        "Stage3Parts" | "Stage3Mass" | "Stage3CG" => Some(0),
        "Stage2Parts" | "Stage2Mass" | "Stage2CGAlone" => Some(1),
        "Stage1Parts" | "Stage1Mass" | "Stage1CGAlone" => Some(2),
        _ => None,
    }
}

impl ElementHandler<RockSimOutput> for RocketDesignHandler {
    fn open_element(
        &mut self,
        element: &str,
        _attributes: &Attributes,
        _ctx: &mut LoadingContext<'_>,
        _warnings: &mut WarningSet,
    ) -> Opened<RockSimOutput> {
        match element {
            "Stage3Parts" | "Stage2Parts" | "Stage1Parts" => {
                if !self.stage_included(element) {
                    log::debug!("skipping {} of a {} stage design", element, self.count());
                    return Opened::Skip;
                }
                Opened::Delegate(Box::new(PartsHandler::new(ParentInfo::stage())))
            }
            "Name" | "StageCount" | "Stage3Mass" | "Stage2Mass" | "Stage1Mass" | "Stage3CG"
            | "Stage2CGAlone" | "Stage1CGAlone" => Opened::This,
            _ => Opened::Skip,
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
        match (element, child) {
            ("Name", _) => self.name = Some(content.to_string()),
            ("StageCount", _) if self.parts_seen => {
                log::debug!("StageCount after stage parts, reading as a single stage");
            }
            ("StageCount", _) => {
                self.stage_count = base::integer(element, content, warnings).or(self.stage_count)
            }
            (_, Some(RockSimOutput::Parts(parts))) => {
                self.parts_seen = true;
                if let Some(index) = stage_index(element) {
                    self.stages[index].parts = Some(parts);
                }
            }
            (_, _) => {
                let Some(index) = stage_index(element) else {
                    return;
                };
                let Some(value) = number(element, content, warnings) else {
                    return;
                };
                if element.ends_with("Mass") {
                    self.stages[index].mass = value / MASS;
                } else {
                    self.stages[index].cg = value / LENGTH;
                }
            }
        }
    }

    fn end_handler(
        self: Box<Self>,
        _element: &str,
        _attributes: &Attributes,
        _content: &str,
        _ctx: &mut LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) -> Option<RockSimOutput> {
        let mut rocket = RocketComponent::new(ComponentType::Rocket);
        if let Some(ref name) = self.name {
            rocket.name = name.clone();
        }
        log::debug!("RockSim design with {} stage(s)", self.count());

        for fields in self.stages {
            let Some(parts) = fields.parts else {
                continue;
            };
            let mut stage = RocketComponent::new(ComponentType::Stage);
            if fields.mass > 0.0 {
                stage.mass_override.set(fields.mass);
                stage.override_subcomponents = true;
            }
            if fields.cg > 0.0 {
                stage.cg_override.set(fields.cg);
                stage.override_subcomponents = true;
            }
            for part in parts {
                if let Err(part) = stage.try_add_child(part) {
                    warnings.add(Warning::IncompatibleComponent {
                        child: part.component_type().display_name().to_string(),
                        parent: stage.component_type().display_name().to_string(),
                    });
                }
            }
            if let Err(stage) = rocket.try_add_child(stage) {
                log::warn!("could not attach {}", stage.name);
            }
        }
        Some(RockSimOutput::Rocket(rocket))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::RocketDocument;
    use std::io::Cursor;

    fn load(xml: &str) -> (Result<RocketDocument>, WarningSet) {
        let mut ctx = LoadingContext::new();
        let mut warnings = WarningSet::new();
        let result = read_rocksim(Cursor::new(xml.to_string()), &mut ctx, &mut warnings)
            .map(|()| ctx.into_document());
        (result, warnings)
    }

    const THREE_STAGES: &str = r#"<RockSimDocument>
  <FileVersion>4</FileVersion>
  <DesignInformation>
    <RocketDesign>
      <Name>Tower</Name>
      <StageCount>3</StageCount>
      <Stage3Mass>120</Stage3Mass>
      <Stage2Mass>0</Stage2Mass>
      <Stage1CGAlone>250</Stage1CGAlone>
      <Stage3Parts>
        <NoseCone><Len>100</Len><BaseDia>40</BaseDia></NoseCone>
        <BodyTube><Name>Sustainer</Name><Len>300</Len></BodyTube>
      </Stage3Parts>
      <Stage2Parts>
        <BodyTube><Name>Middle</Name><Len>200</Len></BodyTube>
      </Stage2Parts>
      <Stage1Parts>
        <BodyTube><Name>Booster</Name><Len>250</Len></BodyTube>
      </Stage1Parts>
      <Comments>ignored</Comments>
    </RocketDesign>
  </DesignInformation>
  <SimulationResultsList><SimulationResult/></SimulationResultsList>
</RockSimDocument>"#;

    #[test]
    fn test_three_stages_in_order() {
        let (doc, warnings) = load(THREE_STAGES);
        let doc = doc.unwrap();
        assert!(warnings.is_empty(), "{:?}", warnings);
        assert_eq!(doc.rocket.name, "Tower");
        assert_eq!(doc.source_version.as_deref(), Some("4"));
        assert_eq!(doc.stage_count(), 3);

        let names: Vec<&str> = doc.stages().map(|s| s.children().last().unwrap().name.as_str()).collect();
        assert_eq!(names, vec!["Sustainer", "Middle", "Booster"]);

        let stages: Vec<&RocketComponent> = doc.stages().collect();
        assert!(stages[0].mass_override.enabled);
        assert!((stages[0].mass_override.value - 0.12).abs() < 1e-12);
        assert!(stages[0].override_subcomponents);
        assert!(!stages[1].mass_override.enabled);
        assert!(!stages[1].override_subcomponents);
        assert!(stages[2].cg_override.enabled);
        assert!((stages[2].cg_override.value - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_stage_count_gates_lower_stages() {
        let single = THREE_STAGES.replace("<StageCount>3</StageCount>", "");
        let (doc, _) = load(&single);
        assert_eq!(doc.unwrap().stage_count(), 1);

        let two = THREE_STAGES.replace("<StageCount>3</StageCount>", "<StageCount>2</StageCount>");
        let (doc, _) = load(&two);
        let doc = doc.unwrap();
        assert_eq!(doc.stage_count(), 2);
        assert_eq!(doc.stages().nth(1).unwrap().children()[0].name, "Middle");
    }

    #[test]
    fn test_excluded_stage_is_not_read() {
        let xml = r#"<RockSimDocument>
  <DesignInformation>
    <RocketDesign>
      <StageCount>1</StageCount>
      <Stage3Parts>
        <BodyTube><Name>Sustainer</Name><Len>300</Len></BodyTube>
      </Stage3Parts>
      <Stage2Parts>
        <BodyTube><Len>abc</Len></BodyTube>
        <Gizmo/>
      </Stage2Parts>
      <Stage1Parts><Gizmo/></Stage1Parts>
    </RocketDesign>
  </DesignInformation>
</RockSimDocument>"#;
        let (doc, warnings) = load(xml);
        let doc = doc.unwrap();
        assert_eq!(doc.stage_count(), 1);
        assert_eq!(doc.stages().next().unwrap().children()[0].name, "Sustainer");
        assert!(warnings.is_empty(), "{:?}", warnings);
    }

    #[test]
    fn test_late_stage_count_reads_single_stage() {
        let late = THREE_STAGES
            .replace("<StageCount>3</StageCount>", "")
            .replace("<Comments>", "<StageCount>3</StageCount><Comments>");
        let (doc, warnings) = load(&late);
        assert_eq!(doc.unwrap().stage_count(), 1);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_conversion_warnings() {
        let xml = THREE_STAGES
            .replace("<Stage3Mass>120</Stage3Mass>", "<Stage3Mass>heavy</Stage3Mass>")
            .replace("<Len>300</Len>", "<Len>3OO</Len>");
        let (doc, warnings) = load(&xml);
        let messages: Vec<String> = warnings.iter().map(|w| w.to_string()).collect();
        assert_eq!(
            messages,
            vec![
                "Could not convert Stage3Mass value of heavy.  It is expected to be a number.",
                "Could not convert Len value of 3OO.  It is expected to be a number.",
            ]
        );
        let doc = doc.unwrap();
        let first = doc.stages().next().unwrap();
        assert!(!first.mass_override.enabled);
        assert_eq!(first.children()[1].length(), Some(0.3));
    }

    #[test]
    fn test_missing_design_is_fatal() {
        let xml = "<RockSimDocument><FileVersion>4</FileVersion></RockSimDocument>";
        let (result, _) = load(xml);
        assert!(matches!(result, Err(Error::NoDesign)));

        let (result, warnings) = load("<openrocket version=\"1.0\"/>");
        assert!(matches!(result, Err(Error::NoDesign)));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_malformed_is_fatal() {
        let (result, _) = load("<RockSimDocument><DesignInformation>");
        assert!(result.is_err());
    }
}
