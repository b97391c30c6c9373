//! Handlers for the component tree of a native document.

use super::{NativeOutput, Resolution, MOTOR_DIGEST_VERSION};
use crate::context::LoadingContext;
use crate::objects::{
    parse_double, ComponentType, Coordinate, FinSet, IgnitionEvent, MotorConfiguration,
    MotorMount, MotorQuery, MotorType, MountedMotor, RocketComponent, XmlEnum,
};
use crate::reader::{Attributes, ElementHandler, Opened};
use crate::warning::{Warning, WarningSet};

/// Presentation data the importer does not model.
const IGNORED_ELEMENTS: &[&str] = &["appearance", "insideappearance", "decal"];

// ============================================================================
// Components
// ============================================================================

/// Applies the parameter elements of one component and collects its children.
pub(super) struct ComponentParameterHandler {
    component: RocketComponent,
}

impl ComponentParameterHandler {
    pub(super) fn new(component: RocketComponent) -> Self {
        Self { component }
    }

    fn apply(
        &mut self,
        element: &str,
        attributes: &Attributes,
        content: &str,
        ctx: &LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) {
        let component_type = self.component.component_type();
        match ctx.setters().resolve(component_type, element) {
            Resolution::Found(setter) => {
                setter.set(&mut self.component, content, attributes, ctx, warnings)
            }
            Resolution::Disabled => warnings.add(Warning::ParameterNotAllowed {
                element: element.to_string(),
                component: component_type.display_name().to_string(),
            }),
            Resolution::Unknown => warnings.add(Warning::UnknownParameter {
                element: element.to_string(),
                component: component_type.display_name().to_string(),
            }),
        }
    }
}

impl ElementHandler<NativeOutput> for ComponentParameterHandler {
    fn open_element(
        &mut self,
        element: &str,
        _attributes: &Attributes,
        _ctx: &mut LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) -> Opened<NativeOutput> {
        let component_type = self.component.component_type();
        match element {
            "subcomponents" => Opened::Delegate(Box::new(ComponentHandler::new(component_type))),
            "motormount" => {
                if self.component.motor_mount().is_none() {
                    warnings.add("Illegal component defined as motor mount.");
                    return Opened::Skip;
                }
                Opened::Delegate(Box::new(MotorMountHandler::new()))
            }
            "finpoints" => {
                if component_type != ComponentType::FreeformFinSet {
                    warnings.add("Illegal component defined for fin points.");
                    return Opened::Skip;
                }
                Opened::Delegate(Box::new(FinSetPointHandler::default()))
            }
            "motorconfiguration" => {
                if component_type != ComponentType::Rocket {
                    warnings.add("Illegal component defined for motor configuration.");
                    return Opened::Skip;
                }
                Opened::Delegate(Box::new(MotorConfigurationHandler::default()))
            }
            e if IGNORED_ELEMENTS.contains(&e) => Opened::Skip,
            _ => Opened::This,
        }
    }

    fn close_element(
        &mut self,
        element: &str,
        attributes: &Attributes,
        content: &str,
        child: Option<NativeOutput>,
        ctx: &mut LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) {
        match child {
            Some(NativeOutput::Components(children)) => {
                for child in children {
                    if let Err(child) = self.component.try_add_child(child) {
                        warnings.add(Warning::IncompatibleComponent {
                            child: child.component_type().display_name().to_string(),
                            parent: self.component.component_type().display_name().to_string(),
                        });
                    }
                }
            }
            Some(NativeOutput::MotorMount(mount)) => {
                if let Some(slot) = self.component.motor_mount_mut() {
                    *slot = mount;
                }
            }
            Some(NativeOutput::FinPoints(points)) => {
                if let Some(fins) = self.component.fin_set_mut() {
                    fins.points = points;
                }
            }
            Some(NativeOutput::MotorConfiguration(configuration, is_default)) => {
                if let Some(rocket) = self.component.rocket_mut() {
                    let id = configuration.id.clone();
                    if !rocket.add_motor_configuration(configuration) {
                        warnings.add("Duplicate motor configuration ID used.");
                    } else if is_default {
                        rocket.default_configuration = Some(id);
                    }
                }
            }
            Some(_) => {}
            None => match element {
                "subcomponents" | "motormount" | "finpoints" | "motorconfiguration" => {}
                _ => self.apply(element, attributes, content, ctx, warnings),
            },
        }
    }

    fn end_handler(
        self: Box<Self>,
        _element: &str,
        _attributes: &Attributes,
        _content: &str,
        _ctx: &mut LoadingContext<'_>,
        _warnings: &mut WarningSet,
    ) -> Option<NativeOutput> {
        Some(NativeOutput::Component(self.component))
    }
}

/// Creates the children listed in a `subcomponents` element.
struct ComponentHandler {
    parent: ComponentType,
    children: Vec<RocketComponent>,
}

impl ComponentHandler {
    fn new(parent: ComponentType) -> Self {
        Self {
            parent,
            children: Vec::new(),
        }
    }
}

impl ElementHandler<NativeOutput> for ComponentHandler {
    fn open_element(
        &mut self,
        element: &str,
        _attributes: &Attributes,
        ctx: &mut LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) -> Opened<NativeOutput> {
        let Some(component) = ctx.factory().create(element) else {
            warnings.add(Warning::UnknownElement(element.to_string()));
            return Opened::Skip;
        };
        let child_type = component.component_type();
        if !self.parent.is_compatible_child(child_type) {
            warnings.add(Warning::IncompatibleComponent {
                child: child_type.display_name().to_string(),
                parent: self.parent.display_name().to_string(),
            });
            return Opened::Skip;
        }
        Opened::Delegate(Box::new(ComponentParameterHandler::new(component)))
    }

    fn close_element(
        &mut self,
        _element: &str,
        _attributes: &Attributes,
        _content: &str,
        child: Option<NativeOutput>,
        _ctx: &mut LoadingContext<'_>,
        _warnings: &mut WarningSet,
    ) {
        if let Some(NativeOutput::Component(component)) = child {
            self.children.push(component);
        }
    }

    fn end_handler(
        self: Box<Self>,
        _element: &str,
        _attributes: &Attributes,
        _content: &str,
        _ctx: &mut LoadingContext<'_>,
        _warnings: &mut WarningSet,
    ) -> Option<NativeOutput> {
        Some(NativeOutput::Components(self.children))
    }
}

// ============================================================================
// Fin points
// ============================================================================

#[derive(Default)]
struct FinSetPointHandler {
    points: Vec<Coordinate>,
}

impl ElementHandler<NativeOutput> for FinSetPointHandler {
    fn open_element(
        &mut self,
        element: &str,
        _attributes: &Attributes,
        _ctx: &mut LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) -> Opened<NativeOutput> {
        if element != "point" {
            warnings.add(Warning::UnknownElement(element.to_string()));
            return Opened::Skip;
        }
        Opened::This
    }

    fn close_element(
        &mut self,
        _element: &str,
        attributes: &Attributes,
        _content: &str,
        _child: Option<NativeOutput>,
        _ctx: &mut LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) {
        let x = attributes.get("x").and_then(parse_double);
        let y = attributes.get("y").and_then(parse_double);
        match (x, y) {
            (Some(x), Some(y)) => self.points.push(Coordinate::new(x, y)),
            _ => warnings.add("Illegal fin points specification, ignoring."),
        }
    }

    fn end_handler(
        self: Box<Self>,
        _element: &str,
        _attributes: &Attributes,
        _content: &str,
        _ctx: &mut LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) -> Option<NativeOutput> {
        if !FinSet::is_valid_outline(&self.points) {
            warnings.add("Freeform fin set point definitions illegal, ignoring.");
            return None;
        }
        Some(NativeOutput::FinPoints(self.points))
    }
}

// ============================================================================
// Motors
// ============================================================================

struct MotorMountHandler {
    mount: MotorMount,
}

impl MotorMountHandler {
    fn new() -> Self {
        Self {
            mount: MotorMount {
                is_mount: true,
                ..MotorMount::default()
            },
        }
    }
}

impl ElementHandler<NativeOutput> for MotorMountHandler {
    fn open_element(
        &mut self,
        element: &str,
        attributes: &Attributes,
        _ctx: &mut LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) -> Opened<NativeOutput> {
        match element {
            "motor" => {
                if attributes.get("configid").map_or(true, str::is_empty) {
                    warnings.add("Illegal motor specification, ignoring.");
                    return Opened::Skip;
                }
                Opened::Delegate(Box::new(MotorHandler::default()))
            }
            "ignitionevent" | "ignitiondelay" | "overhang" => Opened::This,
            _ => {
                warnings.add(format!("Unknown element '{}' encountered, ignoring.", element));
                Opened::Skip
            }
        }
    }

    fn close_element(
        &mut self,
        element: &str,
        attributes: &Attributes,
        content: &str,
        child: Option<NativeOutput>,
        _ctx: &mut LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) {
        match element {
            "motor" => {
                if let (Some(id), Some(NativeOutput::Motor(motor))) = (attributes.get("configid"), child) {
                    self.mount.set_motor(id, motor);
                }
            }
            "ignitionevent" => match IgnitionEvent::find(content) {
                Some(event) => self.mount.ignition_event = event,
                None => warnings.add(format!(
                    "Unknown ignition event type '{}', ignoring.",
                    content
                )),
            },
            "ignitiondelay" => match parse_double(content) {
                Some(delay) => self.mount.ignition_delay = delay,
                None => warnings.add("Illegal ignition delay specified, ignoring."),
            },
            "overhang" => match parse_double(content) {
                Some(overhang) => self.mount.overhang = overhang,
                None => warnings.add("Illegal overhang specified, ignoring."),
            },
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
    ) -> Option<NativeOutput> {
        Some(NativeOutput::MotorMount(self.mount))
    }
}

/// Collects a motor reference and resolves it through the motor finder.
#[derive(Default)]
struct MotorHandler {
    query: MotorQuery,
    delay: Option<f64>,
    plugged: bool,
}

impl ElementHandler<NativeOutput> for MotorHandler {
    fn open_element(
        &mut self,
        _element: &str,
        _attributes: &Attributes,
        _ctx: &mut LoadingContext<'_>,
        _warnings: &mut WarningSet,
    ) -> Opened<NativeOutput> {
        Opened::This
    }

    fn close_element(
        &mut self,
        element: &str,
        _attributes: &Attributes,
        content: &str,
        _child: Option<NativeOutput>,
        ctx: &mut LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) {
        match element {
            "type" => match MotorType::find(content) {
                Some(motor_type) => self.query.motor_type = Some(motor_type),
                None => warnings.add(format!("Unknown motor type '{}', ignoring.", content)),
            },
            "manufacturer" => self.query.manufacturer = Some(content.to_string()),
            "designation" => self.query.designation = Some(content.to_string()),
            "digest" => {
                if ctx.file_version() >= MOTOR_DIGEST_VERSION {
                    self.query.digest = Some(content.to_string());
                }
            }
            "diameter" => match parse_double(content) {
                Some(diameter) => self.query.diameter = Some(diameter),
                None => warnings.add("Illegal motor diameter specified, ignoring."),
            },
            "length" => match parse_double(content) {
                Some(length) => self.query.length = Some(length),
                None => warnings.add("Illegal motor length specified, ignoring."),
            },
            "delay" if content == "none" => self.plugged = true,
            "delay" => match parse_double(content) {
                Some(delay) => self.delay = Some(delay),
                None => warnings.add("Illegal motor delay specified, ignoring."),
            },
            _ => warnings.add(Warning::UnknownElement(element.to_string())),
        }
    }

    fn end_handler(
        self: Box<Self>,
        _element: &str,
        _attributes: &Attributes,
        _content: &str,
        ctx: &mut LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) -> Option<NativeOutput> {
        let motor = ctx.motor_finder().find_motor(&self.query, warnings);
        let delay = if self.plugged {
            None
        } else {
            if self.delay.is_none() {
                warnings.add(Warning::notice(
                    "Motor delay not specified, assuming no ejection charge.",
                ));
            }
            self.delay
        };
        Some(NativeOutput::Motor(MountedMotor { motor, delay }))
    }
}

/// Reads one `motorconfiguration` element of the rocket.
#[derive(Default)]
struct MotorConfigurationHandler {
    name: Option<String>,
    name_seen: bool,
}

impl ElementHandler<NativeOutput> for MotorConfigurationHandler {
    fn open_element(
        &mut self,
        element: &str,
        _attributes: &Attributes,
        _ctx: &mut LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) -> Opened<NativeOutput> {
        if self.name_seen || element != "name" {
            warnings.add(Warning::InvalidParameter);
            return Opened::Skip;
        }
        self.name_seen = true;
        Opened::This
    }

    fn close_element(
        &mut self,
        _element: &str,
        _attributes: &Attributes,
        content: &str,
        _child: Option<NativeOutput>,
        _ctx: &mut LoadingContext<'_>,
        _warnings: &mut WarningSet,
    ) {
        if !content.is_empty() {
            self.name = Some(content.to_string());
        }
    }

    fn end_handler(
        self: Box<Self>,
        _element: &str,
        attributes: &Attributes,
        _content: &str,
        _ctx: &mut LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) -> Option<NativeOutput> {
        let Some(id) = attributes.get("configid").filter(|id| !id.is_empty()) else {
            warnings.add(Warning::InvalidParameter);
            return None;
        };
        let configuration = MotorConfiguration {
            id: id.to_string(),
            name: self.name,
        };
        let is_default = attributes.get("default") == Some("true");
        Some(NativeOutput::MotorConfiguration(configuration, is_default))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::read_native;
    use crate::objects::{Color, Material, MaterialType, RocketDocument};
    use std::io::Cursor;

    fn load(xml: &str) -> (RocketDocument, WarningSet) {
        let mut ctx = LoadingContext::new();
        let mut warnings = WarningSet::new();
        read_native(Cursor::new(xml.to_string()), &mut ctx, &mut warnings).unwrap();
        (ctx.into_document(), warnings)
    }

    fn wrap(components: &str) -> String {
        format!(
            r#"<openrocket version="1.5"><rocket><subcomponents><stage><subcomponents>{}</subcomponents></stage></subcomponents></rocket></openrocket>"#,
            components
        )
    }

    #[test]
    fn test_appearance_is_skipped_silently() {
        let xml = wrap(
            r#"<bodytube>
                 <appearance><paint red="1" green="2" blue="3" alpha="255"/><shine>0.3</shine></appearance>
                 <color red="10" green="20" blue="30"/>
               </bodytube>"#,
        );
        let (doc, warnings) = load(&xml);
        assert!(warnings.is_empty(), "{:?}", warnings);
        let tube = doc.rocket.find_all(ComponentType::BodyTube)[0];
        assert_eq!(tube.color, Some(Color::new(10, 20, 30)));
    }

    #[test]
    fn test_nested_components_keep_order() {
        let xml = wrap(
            r#"<bodytube><name>Main</name><subcomponents>
                 <innertube><name>Mount</name><subcomponents><centeringring/></subcomponents></innertube>
                 <parachute><name>Chute</name><material type="surface" density="0.05">Rip-stop</material></parachute>
                 <shockcord/>
               </subcomponents></bodytube>"#,
        );
        let (doc, warnings) = load(&xml);
        assert!(warnings.is_empty(), "{:?}", warnings);
        let names: Vec<&str> = doc.rocket.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Rocket", "Stage", "Main", "Mount", "Centering ring", "Chute", "Shock cord"]
        );
        let chute = doc.rocket.find_all(ComponentType::Parachute)[0];
        assert_eq!(
            chute.material(),
            Some(&Material::custom(MaterialType::Surface, "Rip-stop", 0.05))
        );
    }

    #[test]
    fn test_inner_tube_motor_mount() {
        let xml = wrap(
            r#"<bodytube><subcomponents><innertube>
                 <clusterconfiguration>3-ring</clusterconfiguration>
                 <motormount>
                   <ignitionevent>never</ignitionevent>
                   <ignitiondelay>abc</ignitiondelay>
                   <bogus/>
                 </motormount>
               </innertube></subcomponents></bodytube>"#,
        );
        let (doc, warnings) = load(&xml);
        let tube = doc.rocket.find_all(ComponentType::InnerTube)[0];
        let mount = tube.motor_mount().unwrap();
        assert!(mount.is_mount);
        assert_eq!(mount.ignition_delay, 0.0);
        let messages: Vec<String> = warnings.iter().map(|w| w.to_string()).collect();
        assert_eq!(
            messages,
            vec![
                "Illegal ignition delay specified, ignoring.".to_string(),
                "Unknown element 'bogus' encountered, ignoring.".to_string(),
            ]
        );
        assert_eq!(mount.ignition_event, IgnitionEvent::Never);
    }

    #[test]
    fn test_motor_digest_requires_version() {
        use crate::catalog::MotorFinder;
        use std::sync::Mutex;

        struct Capture(Mutex<Vec<MotorQuery>>);
        impl MotorFinder for Capture {
            fn find_motor(
                &self,
                query: &MotorQuery,
                _warnings: &mut WarningSet,
            ) -> Option<crate::objects::Motor> {
                self.0.lock().unwrap().push(query.clone());
                None
            }
        }

        let body = r#"<rocket><subcomponents><stage><subcomponents><bodytube><motormount>
            <motor configid="x"><designation>F50</designation><digest>abc</digest><delay>6</delay></motor>
            </motormount></bodytube></subcomponents></stage></subcomponents></rocket>"#;

        for (version, expected) in [("1.3", None), ("1.4", Some("abc".to_string()))] {
            let finder = Capture(Mutex::new(Vec::new()));
            let xml = format!(r#"<openrocket version="{}">{}</openrocket>"#, version, body);
            let mut ctx = LoadingContext::new().with_motor_finder(&finder);
            let mut warnings = WarningSet::new();
            read_native(Cursor::new(xml), &mut ctx, &mut warnings).unwrap();
            let queries = finder.0.lock().unwrap();
            assert_eq!(queries.len(), 1);
            assert_eq!(queries[0].digest, expected);
            assert_eq!(queries[0].designation.as_deref(), Some("F50"));
        }
    }

    #[test]
    fn test_motor_configuration_rules() {
        let xml = r#"<openrocket version="1.5"><rocket>
            <motorconfiguration configid=""/>
            <motorconfiguration configid="a"><name>One</name><name>Two</name></motorconfiguration>
            <subcomponents><stage><motorconfiguration configid="b"/></stage></subcomponents>
        </rocket></openrocket>"#;
        let (doc, warnings) = load(xml);
        let rocket = doc.rocket.rocket().unwrap();
        assert_eq!(rocket.motor_configurations.len(), 1);
        assert_eq!(rocket.motor_configurations[0].name.as_deref(), Some("One"));
        assert_eq!(rocket.default_configuration, None);
        let messages: Vec<String> = warnings.iter().map(|w| w.to_string()).collect();
        assert!(messages.contains(&"Illegal component defined for motor configuration.".to_string()));
        assert!(warnings.iter().any(|w| *w == Warning::InvalidParameter));
    }
}
