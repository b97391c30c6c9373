//! Stored simulations and their flight data.

xml_enum! {
    /// Freshness of a stored simulation.
    #[derive(Default)]
    pub enum SimulationStatus {
        /// Results match the current design
        Uptodate => "UPTODATE",
        /// Results loaded from a file and not verified
        Loaded => "LOADED",
        /// Design changed since the results were computed
        #[default]
        Outdated => "OUTDATED",
        /// Results imported from an external source
        External => "EXTERNAL",
        /// Never simulated
        NotSimulated => "NOT_SIMULATED",
    }
}

xml_enum! {
    /// Earth model used to compute positions.
    #[derive(Default)]
    pub enum GeodeticMethod {
        /// Flat earth
        Flat => "FLAT",
        /// Spherical earth
        #[default]
        Spherical => "SPHERICAL",
        /// WGS84 ellipsoid
        Wgs84 => "WGS84",
    }
}

xml_enum! {
    /// Events recorded during a simulated flight.
    pub enum FlightEventType {
        /// Launch
        Launch => "LAUNCH",
        /// Motor ignition
        Ignition => "IGNITION",
        /// Lift off
        Liftoff => "LIFTOFF",
        /// Launch rod cleared
        LaunchRod => "LAUNCHROD",
        /// Motor burnout
        Burnout => "BURNOUT",
        /// Ejection charge
        EjectionCharge => "EJECTION_CHARGE",
        /// Stage separation
        StageSeparation => "STAGE_SEPARATION",
        /// Apogee
        Apogee => "APOGEE",
        /// Recovery device deployment
        RecoveryDeviceDeployment => "RECOVERY_DEVICE_DEPLOYMENT",
        /// Ground hit
        GroundHit => "GROUND_HIT",
        /// End of simulation
        SimulationEnd => "SIMULATION_END",
        /// Altitude reached
        Altitude => "ALTITUDE",
        /// Simulation error
        Exception => "EXCEPTION",
    }
}

/// Launch conditions and integration settings of a simulation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationOptions {
    /// Flight configuration id
    pub motor_configuration: Option<String>,
    /// Launch rod length in meters
    pub launch_rod_length: f64,
    /// Launch rod angle from vertical in radians
    pub launch_rod_angle: f64,
    /// Launch rod direction in radians
    pub launch_rod_direction: f64,
    /// Average wind speed in m/s
    pub wind_average: f64,
    /// Wind turbulence intensity
    pub wind_turbulence: f64,
    /// Launch site altitude in meters
    pub launch_altitude: f64,
    /// Launch site latitude in degrees
    pub launch_latitude: f64,
    /// Launch site longitude in degrees
    pub launch_longitude: f64,
    /// Earth model
    pub geodetic_method: GeodeticMethod,
    /// True to use the standard atmosphere
    pub isa_atmosphere: bool,
    /// Launch site temperature in kelvin
    pub launch_temperature: f64,
    /// Launch site pressure in pascal
    pub launch_pressure: f64,
    /// Integration time step in seconds
    pub time_step: f64,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            motor_configuration: None,
            launch_rod_length: 1.0,
            launch_rod_angle: 0.0,
            launch_rod_direction: 0.0,
            wind_average: 2.0,
            wind_turbulence: 0.1,
            launch_altitude: 0.0,
            launch_latitude: 28.61,
            launch_longitude: -80.60,
            geodetic_method: GeodeticMethod::default(),
            isa_atmosphere: true,
            launch_temperature: 288.15,
            launch_pressure: 101325.0,
            time_step: 0.01,
        }
    }
}

/// A user defined value computed from other flight data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CustomExpression {
    /// Display name, also used to reference the value from flight data
    pub name: String,
    /// Short symbol
    pub symbol: String,
    /// Unit text
    pub unit: String,
    /// Expression source
    pub expression: String,
}

impl CustomExpression {
    /// Returns true when name, symbol and expression are all present.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.symbol.is_empty() && !self.expression.is_empty()
    }
}

/// A column of flight data.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlightDataType {
    /// Display name
    pub name: String,
    /// Short symbol
    pub symbol: String,
    /// Unit text
    pub unit: String,
    /// Where the column definition came from
    pub origin: DataTypeOrigin,
}

/// Source of a [`FlightDataType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataTypeOrigin {
    /// One of the standard data types
    Builtin,
    /// A custom expression of the simulation
    Custom,
    /// Referenced by name but not defined anywhere
    Unknown,
}

const BUILTIN_TYPES: &[(&str, &str, &str)] = &[
    ("Time", "t", "s"),
    ("Altitude", "h", "m"),
    ("Vertical velocity", "Vz", "m/s"),
    ("Vertical acceleration", "Az", "m/s²"),
    ("Total velocity", "Vt", "m/s"),
    ("Total acceleration", "At", "m/s²"),
    ("Position East of launch", "Px", "m"),
    ("Position North of launch", "Py", "m"),
    ("Lateral distance", "Pl", "m"),
    ("Lateral direction", "θl", "rad"),
    ("Lateral velocity", "Vl", "m/s"),
    ("Lateral acceleration", "Al", "m/s²"),
    ("Latitude", "φ", "rad"),
    ("Longitude", "λ", "rad"),
    ("Gravitational acceleration", "g", "m/s²"),
    ("Angle of attack", "α", "rad"),
    ("Roll rate", "dΦ", "rad/s"),
    ("Pitch rate", "dθ", "rad/s"),
    ("Yaw rate", "dΨ", "rad/s"),
    ("Mass", "m", "kg"),
    ("Thrust", "Ft", "N"),
    ("Drag force", "Fd", "N"),
    ("Mach number", "M", ""),
    ("Drag coefficient", "Cd", ""),
    ("Stability margin calibers", "S", "cal"),
    ("Air temperature", "T", "K"),
    ("Air pressure", "P", "Pa"),
    ("Speed of sound", "Vs", "m/s"),
    ("Simulation time step", "dt", "s"),
    ("Computation time", "tc", "s"),
];

impl FlightDataType {
    /// Name of the time column.
    pub const TIME: &'static str = "Time";

    /// Looks up a standard data type by name, ignoring case.
    pub fn builtin(name: &str) -> Option<FlightDataType> {
        BUILTIN_TYPES
            .iter()
            .find(|(n, _, _)| n.eq_ignore_ascii_case(name))
            .map(|(n, symbol, unit)| FlightDataType {
                name: n.to_string(),
                symbol: symbol.to_string(),
                unit: unit.to_string(),
                origin: DataTypeOrigin::Builtin,
            })
    }

    /// Data type of a custom expression.
    pub fn custom(expression: &CustomExpression) -> FlightDataType {
        FlightDataType {
            name: expression.name.clone(),
            symbol: expression.symbol.clone(),
            unit: expression.unit.clone(),
            origin: DataTypeOrigin::Custom,
        }
    }

    /// Placeholder for a name nothing defines.
    pub fn unknown(name: &str) -> FlightDataType {
        FlightDataType {
            name: name.to_string(),
            symbol: "?".to_string(),
            unit: String::new(),
            origin: DataTypeOrigin::Unknown,
        }
    }
}

/// An event at a point of a flight.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlightEvent {
    /// Simulation time in seconds
    pub time: f64,
    /// Event
    pub event_type: FlightEventType,
}

/// Time series of one flight segment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlightDataBranch {
    /// Branch name, usually the stage name
    pub name: String,
    types: Vec<FlightDataType>,
    columns: Vec<Vec<f64>>,
    /// Events in time order
    pub events: Vec<FlightEvent>,
}

impl FlightDataBranch {
    /// Creates an empty branch with the given columns.
    pub fn new(name: impl Into<String>, types: Vec<FlightDataType>) -> Self {
        let columns = vec![Vec::new(); types.len()];
        Self {
            name: name.into(),
            types,
            columns,
            events: Vec::new(),
        }
    }

    /// Column definitions.
    pub fn types(&self) -> &[FlightDataType] {
        &self.types
    }

    /// Appends one row. Returns false if the row has the wrong number of values.
    pub fn add_point(&mut self, values: &[f64]) -> bool {
        if values.len() != self.columns.len() {
            return false;
        }
        for (column, value) in self.columns.iter_mut().zip(values) {
            column.push(*value);
        }
        true
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    /// Returns true if the branch has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values of a column by type name.
    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.types
            .iter()
            .position(|t| t.name == name)
            .map(|i| self.columns[i].as_slice())
    }
}

/// Results of a stored simulation.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlightData {
    /// Maximum altitude in meters
    pub max_altitude: Option<f64>,
    /// Maximum velocity in m/s
    pub max_velocity: Option<f64>,
    /// Maximum acceleration in m/s²
    pub max_acceleration: Option<f64>,
    /// Maximum Mach number
    pub max_mach: Option<f64>,
    /// Time to apogee in seconds
    pub time_to_apogee: Option<f64>,
    /// Flight time in seconds
    pub flight_time: Option<f64>,
    /// Ground hit velocity in m/s
    pub ground_hit_velocity: Option<f64>,
    /// Velocity leaving the launch rod in m/s
    pub launch_rod_velocity: Option<f64>,
    /// Velocity at deployment in m/s
    pub deployment_velocity: Option<f64>,
    /// Simulation warnings stored with the results
    pub warnings: Vec<String>,
    /// Flight segments
    pub branches: Vec<FlightDataBranch>,
}

/// A stored simulation.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Simulation {
    /// Simulation name
    pub name: String,
    /// Freshness of the results
    pub status: SimulationStatus,
    /// Simulator class name
    pub simulator: Option<String>,
    /// Aerodynamic calculator class name
    pub calculator: Option<String>,
    /// Simulation listener class names
    pub listeners: Vec<String>,
    /// Launch conditions
    pub options: SimulationOptions,
    /// User defined values
    pub custom_expressions: Vec<CustomExpression>,
    /// Stored results
    pub flight_data: Option<FlightData>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_rows() {
        let types = vec![
            FlightDataType::builtin("Time").unwrap(),
            FlightDataType::builtin("altitude").unwrap(),
        ];
        let mut branch = FlightDataBranch::new("Sustainer", types);
        assert!(branch.add_point(&[0.0, 0.0]));
        assert!(branch.add_point(&[0.1, 1.5]));
        assert!(!branch.add_point(&[0.2]));
        assert_eq!(branch.len(), 2);
        assert_eq!(branch.get("Altitude"), Some(&[0.0, 1.5][..]));
        assert_eq!(branch.get("Thrust"), None);
    }

    #[test]
    fn test_builtin_lookup() {
        assert_eq!(FlightDataType::builtin("Mach number").unwrap().symbol, "M");
        assert!(FlightDataType::builtin("Fudge factor").is_none());
    }

    #[test]
    fn test_event_names() {
        use crate::objects::XmlEnum;
        assert_eq!(
            FlightEventType::find("recoverydevicedeployment"),
            Some(FlightEventType::RecoveryDeviceDeployment)
        );
        assert_eq!(SimulationStatus::find("not_simulated"), Some(SimulationStatus::NotSimulated));
    }
}
