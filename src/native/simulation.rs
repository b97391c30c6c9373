//! Handlers for stored simulations.

use super::NativeOutput;
use crate::context::LoadingContext;
use crate::objects::{
    parse_double, CustomExpression, FlightData, FlightDataBranch, FlightDataType, FlightEvent,
    FlightEventType, GeodeticMethod, Simulation, SimulationOptions, SimulationStatus, XmlEnum,
};
use crate::reader::{Attributes, ElementHandler, Opened};
use crate::warning::{Warning, WarningSet};

const SIMULATOR: &str = "RK4Simulator";
const CALCULATOR: &str = "BarrowmanCalculator";

/// Parses a number, treating NaN as missing.
fn number(text: &str) -> Option<f64> {
    parse_double(text).filter(|d| !d.is_nan())
}

/// Collects the `simulation` elements.
#[derive(Default)]
pub(super) struct SimulationsHandler {
    simulations: Vec<Simulation>,
}

impl ElementHandler<NativeOutput> for SimulationsHandler {
    fn open_element(
        &mut self,
        element: &str,
        _attributes: &Attributes,
        _ctx: &mut LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) -> Opened<NativeOutput> {
        if element != "simulation" {
            warnings.add(format!("Unknown element '{}', ignoring.", element));
            return Opened::Skip;
        }
        Opened::Delegate(Box::new(SimulationHandler::default()))
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
        if let Some(NativeOutput::Simulation(simulation)) = child {
            self.simulations.push(simulation);
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
        log::debug!("read {} stored simulations", self.simulations.len());
        Some(NativeOutput::Simulations(self.simulations))
    }
}

// ============================================================================
// Single simulation
// ============================================================================

#[derive(Default)]
struct SimulationHandler {
    simulation: Simulation,
    conditions_seen: bool,
}

impl ElementHandler<NativeOutput> for SimulationHandler {
    fn open_element(
        &mut self,
        element: &str,
        _attributes: &Attributes,
        _ctx: &mut LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) -> Opened<NativeOutput> {
        match element {
            "name" | "simulator" | "calculator" | "listener" => Opened::This,
            "customexpressions" => Opened::Delegate(Box::new(CustomExpressionsHandler::default())),
            "conditions" => Opened::Delegate(Box::new(ConditionsHandler::new())),
            "flightdata" => Opened::Delegate(Box::new(FlightDataHandler::new(
                self.simulation.custom_expressions.clone(),
            ))),
            _ => {
                warnings.add(format!("Unknown element '{}', ignoring.", element));
                Opened::Skip
            }
        }
    }

    fn close_element(
        &mut self,
        element: &str,
        _attributes: &Attributes,
        content: &str,
        child: Option<NativeOutput>,
        _ctx: &mut LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) {
        let simulation = &mut self.simulation;
        match (element, child) {
            (_, Some(NativeOutput::Conditions(options))) => {
                simulation.options = options;
                self.conditions_seen = true;
            }
            (_, Some(NativeOutput::Expressions(expressions))) => {
                simulation.custom_expressions = expressions;
            }
            (_, Some(NativeOutput::FlightData(data))) => simulation.flight_data = Some(data),
            ("name", _) => simulation.name = content.to_string(),
            ("simulator", _) => {
                if content != SIMULATOR {
                    warnings.add(format!("Unknown simulator '{}' specified, ignoring.", content));
                }
                simulation.simulator = Some(content.to_string());
            }
            ("calculator", _) => {
                if content != CALCULATOR {
                    warnings.add(format!("Unknown calculator '{}' specified, ignoring.", content));
                }
                simulation.calculator = Some(content.to_string());
            }
            ("listener", _) if !content.is_empty() => {
                simulation.listeners.push(content.to_string());
            }
            _ => {}
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
        let mut simulation = self.simulation;

        let status = attributes.get("status").and_then(SimulationStatus::find);
        simulation.status = match status {
            Some(SimulationStatus::Uptodate | SimulationStatus::Loaded) => {
                if simulation.flight_data.is_some() {
                    SimulationStatus::Loaded
                } else {
                    SimulationStatus::Outdated
                }
            }
            Some(status) => status,
            None => {
                warnings.add("Simulation status unknown, assuming outdated.");
                SimulationStatus::Outdated
            }
        };

        if !self.conditions_seen {
            warnings.add("Simulation conditions not defined, using defaults.");
        }
        if simulation.name.is_empty() {
            simulation.name = "Simulation".to_string();
        }
        Some(NativeOutput::Simulation(simulation))
    }
}

// ============================================================================
// Launch conditions
// ============================================================================

struct ConditionsHandler {
    options: SimulationOptions,
}

impl ConditionsHandler {
    fn new() -> Self {
        Self {
            options: SimulationOptions {
                geodetic_method: GeodeticMethod::Flat,
                ..SimulationOptions::default()
            },
        }
    }
}

impl ElementHandler<NativeOutput> for ConditionsHandler {
    fn open_element(
        &mut self,
        element: &str,
        attributes: &Attributes,
        _ctx: &mut LoadingContext<'_>,
        _warnings: &mut WarningSet,
    ) -> Opened<NativeOutput> {
        if element == "atmosphere" {
            return Opened::Delegate(Box::new(AtmosphereHandler::new(attributes.get("model"))));
        }
        Opened::This
    }

    fn close_element(
        &mut self,
        element: &str,
        _attributes: &Attributes,
        content: &str,
        child: Option<NativeOutput>,
        _ctx: &mut LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) {
        let options = &mut self.options;
        if let Some(NativeOutput::Atmosphere {
            isa,
            temperature,
            pressure,
        }) = child
        {
            options.isa_atmosphere = isa;
            if let Some(temperature) = temperature {
                options.launch_temperature = temperature;
            }
            if let Some(pressure) = pressure {
                options.launch_pressure = pressure;
            }
            return;
        }

        let value = number(content);
        let (target, message) = match element {
            "configid" => {
                options.motor_configuration = Some(content.to_string()).filter(|c| !c.is_empty());
                return;
            }
            "geodeticmethod" => {
                match GeodeticMethod::find(content) {
                    Some(method) => options.geodetic_method = method,
                    None => warnings.add(format!(
                        "Unknown geodetic computation method '{}'",
                        content
                    )),
                }
                return;
            }
            "launchrodangle" | "launchroddirection" => {
                let (target, message) = if element == "launchrodangle" {
                    (&mut options.launch_rod_angle, "Illegal launch rod angle defined, ignoring.")
                } else {
                    (
                        &mut options.launch_rod_direction,
                        "Illegal launch rod direction defined, ignoring.",
                    )
                };
                match value {
                    Some(degrees) => *target = degrees.to_radians(),
                    None => warnings.add(message),
                }
                return;
            }
            "launchrodlength" => (
                &mut options.launch_rod_length,
                "Illegal launch rod length defined, ignoring.",
            ),
            "windaverage" => (
                &mut options.wind_average,
                "Illegal average windspeed defined, ignoring.",
            ),
            "windturbulence" => (
                &mut options.wind_turbulence,
                "Illegal wind turbulence intensity defined, ignoring.",
            ),
            "launchaltitude" => (
                &mut options.launch_altitude,
                "Illegal launch altitude defined, ignoring.",
            ),
            "launchlatitude" => (
                &mut options.launch_latitude,
                "Illegal launch latitude defined, ignoring.",
            ),
            "launchlongitude" => (&mut options.launch_longitude, "Illegal launch longitude."),
            "timestep" => (&mut options.time_step, "Illegal time step defined, ignoring."),
            _ => {
                log::debug!("ignoring simulation condition <{}>", element);
                return;
            }
        };
        match value {
            Some(value) => *target = value,
            None => warnings.add(message),
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
        Some(NativeOutput::Conditions(self.options))
    }
}

struct AtmosphereHandler {
    model: Option<String>,
    temperature: Option<f64>,
    pressure: Option<f64>,
}

impl AtmosphereHandler {
    fn new(model: Option<&str>) -> Self {
        Self {
            model: model.map(str::to_string),
            temperature: None,
            pressure: None,
        }
    }
}

impl ElementHandler<NativeOutput> for AtmosphereHandler {
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
        _ctx: &mut LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) {
        let value = number(content);
        match element {
            "basetemperature" => {
                if value.is_none() {
                    warnings.add("Illegal base temperature specified, ignoring.");
                }
                self.temperature = value;
            }
            "basepressure" => {
                if value.is_none() {
                    warnings.add("Illegal base pressure specified, ignoring.");
                }
                self.pressure = value;
            }
            _ => warnings.add(Warning::UnknownElement(element.to_string())),
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
        let isa = match self.model.as_deref() {
            Some("isa") => true,
            Some("extendedisa") => false,
            _ => {
                warnings.add("Unknown atmospheric model, using ISA.");
                true
            }
        };
        Some(NativeOutput::Atmosphere {
            isa,
            temperature: self.temperature,
            pressure: self.pressure,
        })
    }
}

// ============================================================================
// Custom expressions
// ============================================================================

#[derive(Default)]
struct CustomExpressionsHandler {
    expressions: Vec<CustomExpression>,
}

impl ElementHandler<NativeOutput> for CustomExpressionsHandler {
    fn open_element(
        &mut self,
        element: &str,
        _attributes: &Attributes,
        _ctx: &mut LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) -> Opened<NativeOutput> {
        if element != "expression" {
            warnings.add(Warning::UnknownElement(element.to_string()));
            return Opened::Skip;
        }
        Opened::Delegate(Box::new(ExpressionHandler::default()))
    }

    fn close_element(
        &mut self,
        _element: &str,
        _attributes: &Attributes,
        _content: &str,
        child: Option<NativeOutput>,
        _ctx: &mut LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) {
        if let Some(NativeOutput::Expression(expression)) = child {
            if expression.is_complete() {
                self.expressions.push(expression);
            } else {
                warnings.add(format!(
                    "Custom expression '{}' is incomplete, ignoring.",
                    expression.name
                ));
            }
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
        Some(NativeOutput::Expressions(self.expressions))
    }
}

#[derive(Default)]
struct ExpressionHandler {
    expression: CustomExpression,
}

impl ElementHandler<NativeOutput> for ExpressionHandler {
    fn open_element(
        &mut self,
        element: &str,
        _attributes: &Attributes,
        _ctx: &mut LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) -> Opened<NativeOutput> {
        match element {
            "name" | "symbol" | "unit" | "expressionstring" => Opened::This,
            _ => {
                warnings.add(Warning::UnknownElement(element.to_string()));
                Opened::Skip
            }
        }
    }

    fn close_element(
        &mut self,
        element: &str,
        _attributes: &Attributes,
        content: &str,
        _child: Option<NativeOutput>,
        _ctx: &mut LoadingContext<'_>,
        _warnings: &mut WarningSet,
    ) {
        let field = match element {
            "name" => &mut self.expression.name,
            "symbol" => &mut self.expression.symbol,
            "unit" => &mut self.expression.unit,
            _ => &mut self.expression.expression,
        };
        *field = content.to_string();
    }

    fn end_handler(
        self: Box<Self>,
        _element: &str,
        _attributes: &Attributes,
        _content: &str,
        _ctx: &mut LoadingContext<'_>,
        _warnings: &mut WarningSet,
    ) -> Option<NativeOutput> {
        Some(NativeOutput::Expression(self.expression))
    }
}

// ============================================================================
// Flight data
// ============================================================================

struct FlightDataHandler {
    expressions: Vec<CustomExpression>,
    branches: Vec<FlightDataBranch>,
    messages: Vec<String>,
}

impl FlightDataHandler {
    fn new(expressions: Vec<CustomExpression>) -> Self {
        Self {
            expressions,
            branches: Vec::new(),
            messages: Vec::new(),
        }
    }
}

impl ElementHandler<NativeOutput> for FlightDataHandler {
    fn open_element(
        &mut self,
        element: &str,
        attributes: &Attributes,
        _ctx: &mut LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) -> Opened<NativeOutput> {
        match element {
            "warning" => Opened::This,
            "databranch" => match (attributes.get("name"), attributes.get("types")) {
                (Some(name), Some(types)) => Opened::Delegate(Box::new(DataBranchHandler::new(
                    name,
                    types,
                    &self.expressions,
                ))),
                _ => {
                    warnings.add("Illegal flight data definition, ignoring.");
                    Opened::Skip
                }
            },
            _ => {
                warnings.add(format!("Unknown element '{}' encountered, ignoring.", element));
                Opened::Skip
            }
        }
    }

    fn close_element(
        &mut self,
        element: &str,
        _attributes: &Attributes,
        content: &str,
        child: Option<NativeOutput>,
        _ctx: &mut LoadingContext<'_>,
        _warnings: &mut WarningSet,
    ) {
        match child {
            Some(NativeOutput::Branch(branch)) => {
                if !branch.is_empty() {
                    self.branches.push(branch);
                }
            }
            _ if element == "warning" => self.messages.push(content.to_string()),
            _ => {}
        }
    }

    fn end_handler(
        self: Box<Self>,
        _element: &str,
        attributes: &Attributes,
        _content: &str,
        _ctx: &mut LoadingContext<'_>,
        _warnings: &mut WarningSet,
    ) -> Option<NativeOutput> {
        let summary = |name: &str| attributes.get(name).and_then(number);
        let column_max = |name: &str| {
            self.branches
                .first()
                .and_then(|b| b.get(name))
                .and_then(|values| values.iter().copied().reduce(f64::max))
        };

        let data = FlightData {
            max_altitude: summary("maxaltitude").or_else(|| column_max("Altitude")),
            max_velocity: summary("maxvelocity").or_else(|| column_max("Total velocity")),
            max_acceleration: summary("maxacceleration")
                .or_else(|| column_max("Total acceleration")),
            max_mach: summary("maxmach").or_else(|| column_max("Mach number")),
            time_to_apogee: summary("timetoapogee"),
            flight_time: summary("flighttime"),
            ground_hit_velocity: summary("groundhitvelocity"),
            launch_rod_velocity: summary("launchrodvelocity"),
            deployment_velocity: summary("deploymentvelocity"),
            warnings: self.messages,
            branches: self.branches,
        };
        Some(NativeOutput::FlightData(data))
    }
}

struct DataBranchHandler {
    branch: FlightDataBranch,
}

impl DataBranchHandler {
    fn new(name: &str, types: &str, expressions: &[CustomExpression]) -> Self {
        let types = types
            .split(',')
            .map(|type_name| {
                FlightDataType::builtin(type_name)
                    .or_else(|| {
                        expressions
                            .iter()
                            .find(|e| e.name == type_name)
                            .map(FlightDataType::custom)
                    })
                    .unwrap_or_else(|| {
                        log::warn!(
                            "flight data type '{}' is not defined, using unknown symbol and units",
                            type_name
                        );
                        FlightDataType::unknown(type_name)
                    })
            })
            .collect();
        Self {
            branch: FlightDataBranch::new(name, types),
        }
    }
}

impl ElementHandler<NativeOutput> for DataBranchHandler {
    fn open_element(
        &mut self,
        element: &str,
        _attributes: &Attributes,
        _ctx: &mut LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) -> Opened<NativeOutput> {
        match element {
            "datapoint" | "event" => Opened::This,
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
        _child: Option<NativeOutput>,
        _ctx: &mut LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) {
        if element == "event" {
            let time = attributes.get("time").and_then(parse_double);
            let event_type = attributes.get("type").and_then(FlightEventType::find);
            match (time, event_type) {
                (Some(time), Some(event_type)) => {
                    self.branch.events.push(FlightEvent { time, event_type })
                }
                _ => warnings.add("Illegal event specification, ignoring."),
            }
            return;
        }

        let fields: Vec<&str> = content.split(',').collect();
        if fields.len() != self.branch.types().len() {
            warnings.add("Data point did not contain correct amount of values, ignoring point.");
            return;
        }
        let values: Option<Vec<f64>> = fields.into_iter().map(parse_double).collect();
        match values {
            Some(values) => {
                self.branch.add_point(&values);
            }
            None => warnings.add("Data point format error, ignoring point."),
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
        Some(NativeOutput::Branch(self.branch))
    }
}
