//! Common types shared across the design model.
//!
//! This module contains the small value types used by many components:
//! - [`XmlEnum`] - enumerations matched by normalized name
//! - [`Color`] and [`Coordinate`]
//! - the enumerated component properties (finish, shapes, positioning methods)
//! - numeric text parsing shared by both dialects

use std::fmt;
use std::str::FromStr;

// ============================================================================
// Enumeration matching
// ============================================================================

/// An enumeration whose values appear in documents as text.
///
/// Matching lower-cases both sides and removes underscores, so
/// `RECOVERY_DEVICE_DEPLOYMENT`, `recoverydevicedeployment` and
/// `Recovery_Device_Deployment` all name the same value.
pub trait XmlEnum: Sized + Copy + 'static {
    /// Every declared value, in declaration order.
    const VARIANTS: &'static [Self];

    /// Canonical upper-case name of the value.
    fn name(&self) -> &'static str;

    /// Normalized name as written by the native dialect.
    fn xml_name(&self) -> String {
        normalize_enum_name(self.name())
    }

    /// Finds the first value whose normalized name equals the normalized input.
    fn find(value: &str) -> Option<Self> {
        let wanted = normalize_enum_name(value.trim());
        Self::VARIANTS
            .iter()
            .copied()
            .find(|v| normalize_enum_name(v.name()) == wanted)
    }
}

/// Lower-cases and strips underscores.
pub fn normalize_enum_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

// ============================================================================
// Numeric text
// ============================================================================

/// Parses a floating point value, accepting `NaN`, `Inf` and `-Inf` in any case.
pub fn parse_double(text: &str) -> Option<f64> {
    let text = text.trim();
    match text.to_ascii_lowercase().as_str() {
        "nan" => Some(f64::NAN),
        "inf" | "+inf" => Some(f64::INFINITY),
        "-inf" => Some(f64::NEG_INFINITY),
        _ => text.parse::<f64>().ok(),
    }
}

/// Parses an integer value. Non-finite tokens are rejected.
pub fn parse_int(text: &str) -> Option<i32> {
    text.trim().parse::<i32>().ok()
}

/// Parses `true`/`false` in any case.
pub fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

// ============================================================================
// Value types
// ============================================================================

/// An RGB display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    /// Red channel
    pub red: u8,
    /// Green channel
    pub green: u8,
    /// Blue channel
    pub blue: u8,
}

impl Color {
    /// Creates a color from its channels.
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

/// A point of a fin outline, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    /// Distance aft from the fin root leading edge
    pub x: f64,
    /// Distance out from the body
    pub y: f64,
}

impl Coordinate {
    /// The fin root leading edge.
    pub const ORIGIN: Coordinate = Coordinate { x: 0.0, y: 0.0 };

    /// Creates a coordinate.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

// ============================================================================
// Surface and shape
// ============================================================================

xml_enum! {
    /// Surface finish of an external component.
    #[derive(Default)]
    pub enum Finish {
        /// Rough (500 µm)
        Rough => "ROUGH",
        /// Unfinished (150 µm)
        Unfinished => "UNFINISHED",
        /// Regular paint (60 µm)
        #[default]
        Normal => "NORMAL",
        /// Smooth paint (20 µm)
        Smooth => "SMOOTH",
        /// Polished (2 µm)
        Polished => "POLISHED",
    }
}

impl Finish {
    /// Average surface roughness in meters.
    pub fn roughness(self) -> f64 {
        match self {
            Finish::Rough => 500e-6,
            Finish::Unfinished => 150e-6,
            Finish::Normal => 60e-6,
            Finish::Smooth => 20e-6,
            Finish::Polished => 2e-6,
        }
    }
}

xml_enum! {
    /// Profile of a nose cone or transition.
    #[derive(Default)]
    pub enum Shape {
        /// Straight cone
        #[default]
        Conical => "CONICAL",
        /// Tangent to secant ogive
        Ogive => "OGIVE",
        /// Ellipsoid
        Ellipsoid => "ELLIPSOID",
        /// Power series
        Power => "POWER",
        /// Parabolic series
        Parabolic => "PARABOLIC",
        /// Haack series
        Haack => "HAACK",
    }
}

impl Shape {
    /// Returns true if the shape takes a shape parameter.
    pub fn uses_parameter(self) -> bool {
        !matches!(self, Shape::Conical | Shape::Ellipsoid)
    }

    /// Smallest meaningful shape parameter.
    pub fn min_parameter(self) -> f64 {
        0.0
    }

    /// Largest meaningful shape parameter.
    pub fn max_parameter(self) -> f64 {
        match self {
            Shape::Haack => 1.0 / 3.0,
            Shape::Conical | Shape::Ellipsoid => 0.0,
            _ => 1.0,
        }
    }

    /// Parameter a freshly created component of this shape starts with.
    pub fn default_parameter(self) -> f64 {
        match self {
            Shape::Ogive | Shape::Parabolic => 1.0,
            Shape::Power => 0.5,
            _ => 0.0,
        }
    }

    /// Clamps a parameter into the range accepted by this shape.
    pub fn clamp_parameter(self, value: f64) -> f64 {
        value.max(self.min_parameter()).min(self.max_parameter())
    }
}

xml_enum! {
    /// Cross section of a fin.
    #[derive(Default)]
    pub enum CrossSection {
        /// Square edges
        #[default]
        Square => "SQUARE",
        /// Rounded edges
        Rounded => "ROUNDED",
        /// Airfoil
        Airfoil => "AIRFOIL",
    }
}

xml_enum! {
    /// Reference point of a fin tab shift.
    #[derive(Default)]
    pub enum TabRelativePosition {
        /// Root chord leading edge
        #[default]
        Front => "FRONT",
        /// Root chord midpoint
        Center => "CENTER",
        /// Root chord trailing edge
        End => "END",
    }
}

xml_enum! {
    /// Line style used when drawing a component.
    pub enum LineStyle {
        /// Solid
        Solid => "SOLID",
        /// Dashed
        Dashed => "DASHED",
        /// Dotted
        Dotted => "DOTTED",
        /// Dash-dot
        DashDot => "DASHDOT",
    }
}

// ============================================================================
// Positioning
// ============================================================================

xml_enum! {
    /// How an axial offset is measured.
    #[derive(Default)]
    pub enum AxialMethod {
        /// From the tip of the rocket
        Absolute => "ABSOLUTE",
        /// Directly after the previous sibling
        After => "AFTER",
        /// From the top of the parent
        #[default]
        Top => "TOP",
        /// From the middle of the parent
        Middle => "MIDDLE",
        /// From the bottom of the parent
        Bottom => "BOTTOM",
    }
}

impl AxialMethod {
    /// Historic tokens and the methods they now mean.
    pub const RENAMED: &'static [(&'static str, AxialMethod)] = &[
        ("front", AxialMethod::Top),
        ("beginning", AxialMethod::Top),
        ("center", AxialMethod::Middle),
        ("end", AxialMethod::Bottom),
        ("aft", AxialMethod::Bottom),
    ];
}

xml_enum! {
    /// How a radial offset is measured.
    #[derive(Default)]
    pub enum RadiusMethod {
        /// On the centerline of the parent
        Coaxial => "COAXIAL",
        /// From the centerline of the parent
        #[default]
        Free => "FREE",
        /// From the surface of the parent
        Surface => "SURFACE",
        /// Relative to the parent radius
        Relative => "RELATIVE",
    }
}

impl RadiusMethod {
    /// Historic tokens and the methods they now mean.
    pub const RENAMED: &'static [(&'static str, RadiusMethod)] = &[
        ("centerline", RadiusMethod::Free),
        ("outside", RadiusMethod::Surface),
    ];
}

xml_enum! {
    /// How an angular offset is measured.
    #[derive(Default)]
    pub enum AngleMethod {
        /// Relative to the parent orientation
        #[default]
        Relative => "RELATIVE",
        /// Fixed in the rocket frame
        Fixed => "FIXED",
        /// Mirrored across the XY plane
        MirrorXy => "MIRROR_XY",
    }
}

impl AngleMethod {
    /// Historic tokens and the methods they now mean.
    pub const RENAMED: &'static [(&'static str, AngleMethod)] = &[("absolute", AngleMethod::Fixed)];
}

// ============================================================================
// Events and kinds
// ============================================================================

xml_enum! {
    /// Event that deploys a recovery device.
    #[derive(Default)]
    pub enum DeployEvent {
        /// At launch
        Launch => "LAUNCH",
        /// At motor ejection charge
        #[default]
        Ejection => "EJECTION",
        /// At apogee
        Apogee => "APOGEE",
        /// At a given altitude on descent
        Altitude => "ALTITUDE",
        /// When the stage below separates
        LowerStageSeparation => "LOWER_STAGE_SEPARATION",
        /// Never
        Never => "NEVER",
    }
}

xml_enum! {
    /// Event that separates a stage.
    #[derive(Default)]
    pub enum SeparationEvent {
        /// When the stage above ignites
        #[default]
        UpperIgnition => "UPPER_IGNITION",
        /// When this stage ignites
        Ignition => "IGNITION",
        /// At burnout of this stage
        Burnout => "BURNOUT",
        /// At the ejection charge of this stage
        Ejection => "EJECTION",
        /// At launch
        Launch => "LAUNCH",
        /// Never
        Never => "NEVER",
    }
}

xml_enum! {
    /// Event that ignites a motor.
    #[derive(Default)]
    pub enum IgnitionEvent {
        /// Launch or burnout of the previous stage
        #[default]
        Automatic => "AUTOMATIC",
        /// At launch
        Launch => "LAUNCH",
        /// At ejection charge of the previous stage
        EjectionCharge => "EJECTION_CHARGE",
        /// At burnout of the previous stage
        Burnout => "BURNOUT",
        /// Never
        Never => "NEVER",
    }
}

xml_enum! {
    /// What a mass component represents.
    #[derive(Default)]
    pub enum MassComponentType {
        /// Generic mass
        #[default]
        MassComponent => "MASSCOMPONENT",
        /// Altimeter
        Altimeter => "ALTIMETER",
        /// Flight computer
        FlightComputer => "FLIGHTCOMPUTER",
        /// Deployment charge
        DeploymentCharge => "DEPLOYMENTCHARGE",
        /// Tracker
        Tracker => "TRACKER",
        /// Payload
        Payload => "PAYLOAD",
        /// Recovery hardware
        RecoveryHardware => "RECOVERYHARDWARE",
        /// Battery
        Battery => "BATTERY",
    }
}

xml_enum! {
    /// Reference length used for aerodynamic coefficients.
    #[derive(Default)]
    pub enum ReferenceType {
        /// Nose cone base diameter
        NoseCone => "NOSECONE",
        /// Maximum body diameter
        #[default]
        Maximum => "MAXIMUM",
        /// User supplied length
        Custom => "CUSTOM",
    }
}

// ============================================================================
// Cluster configurations
// ============================================================================

/// Arrangement of motors in a clustered inner tube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClusterConfiguration {
    /// One tube
    #[default]
    Single,
    /// Two tubes side by side
    Double,
    /// Three tubes in a row
    ThreeRow,
    /// Three tubes in a ring
    ThreeRing,
    /// Four tubes in a row
    FourRow,
    /// Four tubes in a ring
    FourRing,
    /// Five tubes in a ring
    FiveRing,
    /// Six tubes in a row
    SixRow,
    /// Six tubes in a ring
    SixRing,
    /// Seven tubes, six around one
    SevenRing,
    /// Eight tubes in a ring
    EightRing,
    /// Nine tubes in a square
    NineSquare,
}

impl ClusterConfiguration {
    /// Every configuration.
    pub const ALL: [ClusterConfiguration; 12] = [
        ClusterConfiguration::Single,
        ClusterConfiguration::Double,
        ClusterConfiguration::ThreeRow,
        ClusterConfiguration::ThreeRing,
        ClusterConfiguration::FourRow,
        ClusterConfiguration::FourRing,
        ClusterConfiguration::FiveRing,
        ClusterConfiguration::SixRow,
        ClusterConfiguration::SixRing,
        ClusterConfiguration::SevenRing,
        ClusterConfiguration::EightRing,
        ClusterConfiguration::NineSquare,
    ];

    /// Name used in native documents.
    pub fn xml_name(self) -> &'static str {
        match self {
            ClusterConfiguration::Single => "single",
            ClusterConfiguration::Double => "double",
            ClusterConfiguration::ThreeRow => "3-row",
            ClusterConfiguration::ThreeRing => "3-ring",
            ClusterConfiguration::FourRow => "4-row",
            ClusterConfiguration::FourRing => "4-ring",
            ClusterConfiguration::FiveRing => "5-ring",
            ClusterConfiguration::SixRow => "6-row",
            ClusterConfiguration::SixRing => "6-ring",
            ClusterConfiguration::SevenRing => "7-ring",
            ClusterConfiguration::EightRing => "8-ring",
            ClusterConfiguration::NineSquare => "9-square",
        }
    }

    /// Number of tubes in the cluster.
    pub fn count(self) -> usize {
        match self {
            ClusterConfiguration::Single => 1,
            ClusterConfiguration::Double => 2,
            ClusterConfiguration::ThreeRow | ClusterConfiguration::ThreeRing => 3,
            ClusterConfiguration::FourRow | ClusterConfiguration::FourRing => 4,
            ClusterConfiguration::FiveRing => 5,
            ClusterConfiguration::SixRow | ClusterConfiguration::SixRing => 6,
            ClusterConfiguration::SevenRing => 7,
            ClusterConfiguration::EightRing => 8,
            ClusterConfiguration::NineSquare => 9,
        }
    }
}

impl FromStr for ClusterConfiguration {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.xml_name().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

impl fmt::Display for ClusterConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.xml_name())
    }
}
