//! Reader for the native versioned design dialect.
//!
//! A native document looks like:
//!
//! ```xml
//! <openrocket version="1.4" creator="OpenRocket 15.03">
//!   <rocket>
//!     <name>Rocket</name>
//!     <subcomponents>
//!       <stage>
//!         <subcomponents>
//!           <bodytube><length>0.3</length></bodytube>
//!         </subcomponents>
//!       </stage>
//!     </subcomponents>
//!   </rocket>
//!   <simulations>...</simulations>
//! </openrocket>
//! ```
//!
//! Component elements are created through a [`ComponentFactory`] and their
//! parameters applied through a [`SetterRegistry`], both taken from the
//! [`LoadingContext`].

mod component_handlers;
mod config;
mod factory;
mod registry;
mod setters;
mod simulation;

pub use factory::{ComponentFactory, Constructor};
pub use registry::{Resolution, SetterRegistry, SetterRegistryBuilder};
pub use setters::{
    Axis, BooleanSetter, ClusterConfigurationSetter, ColorSetter, ComponentPresetSetter,
    DoubleSetter, EnumSetter, Field, FinTabPositionSetter, IntSetter, MaterialSetter,
    OptionalEnumSetter, OverrideSetter, PositionSetter, Setter, StringSetter,
};

use crate::context::LoadingContext;
use crate::error::{Error, Result};
use crate::objects::{
    Coordinate, CustomExpression, FlightData, FlightDataBranch, MotorConfiguration, MotorMount,
    MountedMotor, RocketComponent, Simulation, SimulationOptions,
};
use crate::reader::{read_xml, Attributes, ElementHandler, Opened};
use crate::warning::{Warning, WarningSet};
use component_handlers::ComponentParameterHandler;
use simulation::SimulationsHandler;
use std::io::BufRead;

/// Versions this reader understands, as `major * 100 + minor`.
pub const SUPPORTED_VERSIONS: std::ops::RangeInclusive<i32> = 100..=107;

/// Version from which motor digests are trusted.
pub const MOTOR_DIGEST_VERSION: i32 = 104;

/// What a native handler hands to its owner.
pub(crate) enum NativeOutput {
    Component(RocketComponent),
    Components(Vec<RocketComponent>),
    MotorMount(MotorMount),
    Motor(MountedMotor),
    MotorConfiguration(MotorConfiguration, bool),
    FinPoints(Vec<Coordinate>),
    Simulations(Vec<Simulation>),
    Simulation(Simulation),
    Conditions(SimulationOptions),
    Atmosphere {
        isa: bool,
        temperature: Option<f64>,
        pressure: Option<f64>,
    },
    Expressions(Vec<CustomExpression>),
    Expression(CustomExpression),
    FlightData(FlightData),
    Branch(FlightDataBranch),
}

/// Parses `major.minor` into `major * 100 + minor`, 0 if the text has another form.
pub fn parse_version(text: &str) -> i32 {
    let Some((major, minor)) = text.trim().split_once('.') else {
        return 0;
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(major) || !digits(minor) {
        return 0;
    }
    match (major.parse::<i32>(), minor.parse::<i32>()) {
        (Ok(major), Ok(minor)) => major * 100 + minor,
        _ => 0,
    }
}

/// Reads a native document into the context's document.
///
/// Fails on malformed markup and when the document holds no rocket.
pub fn read_native<R: BufRead>(
    source: R,
    ctx: &mut LoadingContext<'_>,
    warnings: &mut WarningSet,
) -> Result<()> {
    let mut root = DocumentHandler;
    read_xml(source, &mut root, ctx, warnings)?;
    if !ctx.design_loaded() {
        return Err(Error::NoDesign);
    }
    ctx.document_mut().update_time_skip();
    Ok(())
}

// ============================================================================
// Document level handlers
// ============================================================================

/// Accepts the `openrocket` root element.
struct DocumentHandler;

impl ElementHandler<NativeOutput> for DocumentHandler {
    fn open_element(
        &mut self,
        element: &str,
        attributes: &Attributes,
        ctx: &mut LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) -> Opened<NativeOutput> {
        if element != "openrocket" {
            warnings.add(Warning::UnknownElement(element.to_string()));
            return Opened::Skip;
        }

        let text = attributes.get("version");
        let version = text.map_or(0, parse_version);
        if !SUPPORTED_VERSIONS.contains(&version) {
            warnings.add(Warning::notice(format!(
                "Unsupported document version {}, attempting to read file anyway.",
                text.unwrap_or("(none)")
            )));
        }
        log::info!("reading native document version {}", text.unwrap_or("(none)"));

        ctx.set_file_version(version);
        let document = ctx.document_mut();
        document.source_version = text.map(str::to_string);
        document.creator = attributes.get("creator").map(str::to_string);
        Opened::Delegate(Box::new(ContentHandler::default()))
    }
}

/// Children of the root element: the design and its simulations.
#[derive(Default)]
struct ContentHandler {
    rocket_seen: bool,
    simulations_seen: bool,
}

impl ElementHandler<NativeOutput> for ContentHandler {
    fn open_element(
        &mut self,
        element: &str,
        _attributes: &Attributes,
        _ctx: &mut LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) -> Opened<NativeOutput> {
        match element {
            "rocket" if self.rocket_seen => {
                warnings.add("Multiple rocket designs within one document, ignoring later ones.");
                Opened::Skip
            }
            "rocket" => {
                self.rocket_seen = true;
                let rocket = RocketComponent::new(crate::objects::ComponentType::Rocket);
                Opened::Delegate(Box::new(ComponentParameterHandler::new(rocket)))
            }
            "simulations" if self.simulations_seen => {
                warnings.add("Multiple simulation definitions within one document, ignoring later ones.");
                Opened::Skip
            }
            "simulations" => {
                self.simulations_seen = true;
                Opened::Delegate(Box::new(SimulationsHandler::default()))
            }
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
        child: Option<NativeOutput>,
        ctx: &mut LoadingContext<'_>,
        _warnings: &mut WarningSet,
    ) {
        match child {
            Some(NativeOutput::Component(rocket)) => {
                ctx.document_mut().rocket = rocket;
                ctx.mark_design_loaded();
            }
            Some(NativeOutput::Simulations(simulations)) => {
                ctx.document_mut().simulations = simulations;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MotorDatabase;
    use crate::objects::{
        AxialMethod, ComponentType, DataTypeOrigin, IgnitionEvent, Motor, MotorType,
        SimulationStatus,
    };
    use std::io::Cursor;

    fn load_with(xml: &str, ctx: LoadingContext<'_>) -> (Result<crate::objects::RocketDocument>, WarningSet) {
        let mut ctx = ctx;
        let mut warnings = WarningSet::new();
        let result = read_native(Cursor::new(xml.to_string()), &mut ctx, &mut warnings)
            .map(|()| ctx.into_document());
        (result, warnings)
    }

    fn load(xml: &str) -> (crate::objects::RocketDocument, WarningSet) {
        let (result, warnings) = load_with(xml, LoadingContext::new());
        (result.unwrap(), warnings)
    }

    const MINIMAL_TUBE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<openrocket version="1.4" creator="test">
  <rocket>
    <subcomponents>
      <stage>
        <subcomponents>
          <bodytube>
            <length>10</length>
          </bodytube>
        </subcomponents>
      </stage>
    </subcomponents>
  </rocket>
</openrocket>"#;

    #[test]
    fn test_minimal_tube() {
        let (doc, warnings) = load(MINIMAL_TUBE);
        assert!(warnings.is_empty(), "{:?}", warnings);
        assert_eq!(doc.file_version, 104);
        assert_eq!(doc.creator.as_deref(), Some("test"));

        let tubes = doc.rocket.find_all(ComponentType::BodyTube);
        assert_eq!(tubes.len(), 1);
        let tube = tubes[0];
        assert_eq!(tube.length(), Some(10.0));

        let mut expected = RocketComponent::new(ComponentType::BodyTube);
        if let Some(length) = expected.body_length_mut() {
            *length = 10.0;
        }
        assert_eq!(*tube, expected);
    }

    const BOGUS_SIBLING: &str = r#"<openrocket version="1.5">
  <rocket>
    <subcomponents>
      <stage>
        <subcomponents>
          <nosecone><length>0.1</length></nosecone>
          <warpdrive><bodytube><length>1</length></bodytube></warpdrive>
          <bodytube><length>0.3</length></bodytube>
          <transition/>
        </subcomponents>
      </stage>
    </subcomponents>
  </rocket>
</openrocket>"#;

    #[test]
    fn test_unknown_element_does_not_affect_siblings() {
        let (doc, warnings) = load(BOGUS_SIBLING);
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings.iter().next(),
            Some(&Warning::UnknownElement("warpdrive".to_string()))
        );
        let stage = &doc.rocket.children()[0];
        let types: Vec<ComponentType> = stage.children().iter().map(|c| c.component_type()).collect();
        assert_eq!(
            types,
            vec![ComponentType::NoseCone, ComponentType::BodyTube, ComponentType::Transition]
        );
        assert_eq!(stage.children()[1].length(), Some(0.3));
    }

    #[test]
    fn test_parameter_warnings() {
        let xml = r#"<openrocket version="1.6"><rocket><subcomponents><stage><subcomponents>
            <nosecone><foreradius>0.02</foreradius><length>0.1</length><bogus>1</bogus></nosecone>
            <bodytube><length>long</length><finish>SMOOTH</finish></bodytube>
        </subcomponents></stage></subcomponents></rocket></openrocket>"#;
        let (doc, warnings) = load(xml);
        let list: Vec<&Warning> = warnings.iter().collect();
        assert_eq!(
            list,
            vec![
                &Warning::ParameterNotAllowed {
                    element: "foreradius".to_string(),
                    component: "Nose cone".to_string()
                },
                &Warning::UnknownParameter {
                    element: "bogus".to_string(),
                    component: "Nose cone".to_string()
                },
                &Warning::InvalidParameter,
            ]
        );
        let tube = doc.rocket.find_all(ComponentType::BodyTube)[0];
        assert_eq!(tube.length(), Some(0.3));
        assert_eq!(
            tube.body_tube().unwrap().external.finish,
            crate::objects::Finish::Smooth
        );
    }

    #[test]
    fn test_incompatible_child_dropped() {
        let xml = r#"<openrocket version="1.0"><rocket><subcomponents>
            <bodytube/>
            <stage><subcomponents><bodytube><subcomponents><stage/><parachute/></subcomponents></bodytube></subcomponents></stage>
        </subcomponents></rocket></openrocket>"#;
        let (doc, warnings) = load(xml);
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().all(|w| matches!(w, Warning::IncompatibleComponent { .. })));
        assert_eq!(doc.stage_count(), 1);
        let tube = &doc.stages().next().unwrap().children()[0];
        assert_eq!(tube.child_count(), 1);
        assert_eq!(tube.children()[0].component_type(), ComponentType::Parachute);
    }

    #[test]
    fn test_version_handling() {
        assert_eq!(parse_version("1.7"), 107);
        assert_eq!(parse_version("2.10"), 210);
        assert_eq!(parse_version("1"), 0);
        assert_eq!(parse_version("1.x"), 0);
        assert_eq!(parse_version("-1.2"), 0);

        let xml = r#"<openrocket version="1.9"><rocket/></openrocket>"#;
        let (doc, warnings) = load(xml);
        assert_eq!(doc.file_version, 109);
        assert_eq!(warnings.len(), 1);
        assert!(!warnings.has_data_loss());
    }

    #[test]
    fn test_missing_rocket_is_fatal() {
        let (result, _) = load_with(
            r#"<openrocket version="1.4"><simulations/></openrocket>"#,
            LoadingContext::new(),
        );
        assert!(matches!(result, Err(Error::NoDesign)));

        let (result, _) = load_with("<openrocket version=\"1.4\"><rocket>", LoadingContext::new());
        assert!(result.is_err());
    }

    const MOTORS: &str = r#"<openrocket version="1.4">
  <rocket>
    <motorconfiguration configid="cfg-1" default="true"><name>Sport</name></motorconfiguration>
    <motorconfiguration configid="cfg-2"/>
    <motorconfiguration configid="cfg-1"/>
    <subcomponents>
      <stage>
        <subcomponents>
          <bodytube>
            <length>0.4</length>
            <motormount>
              <ignitionevent>launch</ignitionevent>
              <ignitiondelay>0.5</ignitiondelay>
              <overhang>0.01</overhang>
              <motor configid="cfg-1">
                <type>single</type>
                <manufacturer>Estes</manufacturer>
                <designation>D12</designation>
                <diameter>0.024</diameter>
                <length>0.07</length>
                <delay>5</delay>
              </motor>
              <motor configid="cfg-2">
                <manufacturer>Estes</manufacturer>
                <designation>D12</designation>
                <delay>none</delay>
              </motor>
              <motor><designation>C6</designation></motor>
            </motormount>
            <subcomponents>
              <trapezoidfinset>
                <position type="bottom">0.0</position>
                <motormount/>
              </trapezoidfinset>
            </subcomponents>
          </bodytube>
        </subcomponents>
      </stage>
    </subcomponents>
  </rocket>
</openrocket>"#;

    #[test]
    fn test_motors_and_configurations() {
        let database: MotorDatabase = vec![Motor::new("Estes", "D12", MotorType::Single, 0.024, 0.07)]
            .into_iter()
            .collect();
        let (result, warnings) = load_with(MOTORS, LoadingContext::new().with_motor_finder(&database));
        let doc = result.unwrap();

        let rocket = doc.rocket.rocket().unwrap();
        assert_eq!(rocket.motor_configurations.len(), 2);
        assert_eq!(rocket.motor_configurations[0].name.as_deref(), Some("Sport"));
        assert_eq!(rocket.default_configuration.as_deref(), Some("cfg-1"));

        let tube = doc.rocket.find_all(ComponentType::BodyTube)[0];
        let mount = tube.motor_mount().unwrap();
        assert!(mount.is_mount);
        assert_eq!(mount.ignition_event, IgnitionEvent::Launch);
        assert_eq!(mount.ignition_delay, 0.5);
        assert_eq!(mount.overhang, 0.01);
        assert_eq!(mount.motors.len(), 2);
        let first = mount.motor("cfg-1").unwrap();
        assert_eq!(first.delay, Some(5.0));
        assert_eq!(first.motor.as_ref().unwrap().designation, "D12");
        assert_eq!(mount.motor("cfg-2").unwrap().delay, None);

        let fins = doc.rocket.find_all(ComponentType::TrapezoidFinSet)[0];
        assert_eq!(fins.position.axial_method, AxialMethod::Bottom);

        let messages: Vec<String> = warnings.iter().map(|w| w.to_string()).collect();
        assert!(messages.iter().any(|m| m.contains("Duplicate motor configuration")));
        assert!(messages.iter().any(|m| m == "Illegal motor specification, ignoring."));
        assert!(messages.iter().any(|m| m == "Illegal component defined as motor mount."));
        assert_eq!(warnings.len(), 3);
    }

    #[test]
    fn test_motor_delay_missing_is_advisory() {
        let xml = r#"<openrocket version="1.4"><rocket><subcomponents><stage><subcomponents>
            <bodytube><motormount><motor configid="a"><designation>A8</designation></motor></motormount></bodytube>
        </subcomponents></stage></subcomponents></rocket></openrocket>"#;
        let (doc, warnings) = load(xml);
        let messages: Vec<String> = warnings.iter().map(|w| w.to_string()).collect();
        assert!(messages.contains(&"Motor delay not specified, assuming no ejection charge.".to_string()));
        let mount = doc.rocket.find_all(ComponentType::BodyTube)[0].motor_mount().unwrap();
        let mounted = mount.motor("a").unwrap();
        assert!(mounted.motor.is_none());
        assert_eq!(mounted.delay, None);
    }

    #[test]
    fn test_freeform_fin_points() {
        let xml = r#"<openrocket version="1.4"><rocket><subcomponents><stage><subcomponents>
            <bodytube><subcomponents>
              <freeformfinset>
                <fincount>4</fincount>
                <finpoints>
                  <point x="0.0" y="0.0"/><point x="0.02" y="0.03"/><point x="0.05" y="0.0"/>
                </finpoints>
              </freeformfinset>
              <freeformfinset>
                <finpoints><point x="0.01" y="0.0"/><point x="0.05" y="0.0"/></finpoints>
              </freeformfinset>
              <ellipticalfinset><finpoints/></ellipticalfinset>
            </subcomponents></bodytube>
        </subcomponents></stage></subcomponents></rocket></openrocket>"#;
        let (doc, warnings) = load(xml);
        let fins = doc.rocket.find_all(ComponentType::FreeformFinSet);
        let first = fins[0].fin_set().unwrap();
        assert_eq!(first.fin_count, 4);
        assert_eq!(first.points.len(), 3);
        assert_eq!(first.points[1], Coordinate::new(0.02, 0.03));
        assert_eq!(fins[1].fin_set().unwrap().points, crate::objects::FinSet::default().points);
        assert_eq!(warnings.len(), 2);
    }

    const SIMULATIONS: &str = r#"<openrocket version="1.5">
  <rocket><subcomponents><stage/></subcomponents></rocket>
  <simulations>
    <simulation status="uptodate">
      <name>Calm day</name>
      <simulator>RK4Simulator</simulator>
      <listener>a.B</listener>
      <conditions>
        <configid>cfg-1</configid>
        <launchrodlength>1.5</launchrodlength>
        <launchrodangle>5</launchrodangle>
        <windaverage>3.0</windaverage>
        <geodeticmethod>wgs84</geodeticmethod>
        <atmosphere model="extendedisa"><basetemperature>300</basetemperature><basepressure>100000</basepressure></atmosphere>
        <timestep>0.05</timestep>
      </conditions>
      <customexpressions>
        <expression><name>Double altitude</name><symbol>h2</symbol><unit>m</unit><expressionstring>h*2</expressionstring></expression>
        <expression><name>Broken</name></expression>
      </customexpressions>
      <flightdata maxaltitude="120.5" flighttime="20">
        <warning>Large wind</warning>
        <databranch name="Sustainer" types="Time,Altitude,Double altitude,Mystery">
          <event time="0.0" type="launch"/>
          <datapoint>0,0,0,1</datapoint>
          <datapoint>0.05,1,2,1</datapoint>
          <datapoint>0.1,3</datapoint>
          <datapoint>0.15,5,10,1</datapoint>
          <event time="0.1" type="BURNOUT"/>
        </databranch>
      </flightdata>
    </simulation>
    <simulation status="bogus"><name>Second</name></simulation>
  </simulations>
</openrocket>"#;

    #[test]
    fn test_simulations() {
        let (doc, warnings) = load(SIMULATIONS);
        assert_eq!(doc.simulations.len(), 2);

        let sim = &doc.simulations[0];
        assert_eq!(sim.name, "Calm day");
        assert_eq!(sim.status, SimulationStatus::Loaded);
        assert_eq!(sim.simulator.as_deref(), Some("RK4Simulator"));
        assert_eq!(sim.listeners, vec!["a.B".to_string()]);
        assert_eq!(sim.options.motor_configuration.as_deref(), Some("cfg-1"));
        assert_eq!(sim.options.launch_rod_length, 1.5);
        assert!((sim.options.launch_rod_angle - 5.0_f64.to_radians()).abs() < 1e-12);
        assert!(!sim.options.isa_atmosphere);
        assert_eq!(sim.options.launch_temperature, 300.0);
        assert_eq!(sim.options.time_step, 0.05);
        assert_eq!(sim.custom_expressions.len(), 1);

        let data = sim.flight_data.as_ref().unwrap();
        assert_eq!(data.max_altitude, Some(120.5));
        assert_eq!(data.flight_time, Some(20.0));
        assert_eq!(data.max_velocity, None);
        assert_eq!(data.warnings, vec!["Large wind".to_string()]);
        let branch = &data.branches[0];
        assert_eq!(branch.len(), 3);
        assert_eq!(branch.events.len(), 2);
        let origins: Vec<DataTypeOrigin> = branch.types().iter().map(|t| t.origin).collect();
        assert_eq!(
            origins,
            vec![
                DataTypeOrigin::Builtin,
                DataTypeOrigin::Builtin,
                DataTypeOrigin::Custom,
                DataTypeOrigin::Unknown
            ]
        );
        assert_eq!(branch.get("Double altitude"), Some(&[0.0, 2.0, 10.0][..]));

        let second = &doc.simulations[1];
        assert_eq!(second.status, SimulationStatus::Outdated);
        assert!(second.flight_data.is_none());

        assert_eq!(doc.storage.simulation_time_skip, Some(0.05));
        // incomplete expression, short data point, unknown status, missing conditions
        assert_eq!(warnings.len(), 4);
    }
}
