//! Rocket components and the component tree.
//!
//! Every node of a design is a [`RocketComponent`]: a set of properties
//! common to all components plus a [`ComponentKind`] carrying the data of
//! one of the concrete [`ComponentType`]s. Components own their children.
//!
//! The abstract families components belong to are modeled by
//! [`ComponentClass`], whose parent chain gives the ancestry of every type,
//! most specific first.

use super::common::{
    AngleMethod, AxialMethod, ClusterConfiguration, Color, Coordinate, CrossSection, DeployEvent,
    Finish, LineStyle, MassComponentType, RadiusMethod, ReferenceType, SeparationEvent, Shape,
    TabRelativePosition,
};
use super::material::{Material, MaterialType};
use super::motor::{MotorConfiguration, MotorMount};
use super::preset::ComponentPreset;
use std::fmt;

// ============================================================================
// Component types and families
// ============================================================================

/// The concrete kinds of component a design is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ComponentType {
    /// Root of a design
    Rocket,
    /// Stage
    Stage,
    /// Nose cone
    NoseCone,
    /// Transition between two diameters
    Transition,
    /// Body tube
    BodyTube,
    /// Trapezoidal fin set
    TrapezoidFinSet,
    /// Elliptical fin set
    EllipticalFinSet,
    /// Fin set with a free form outline
    FreeformFinSet,
    /// Tube fins
    TubeFinSet,
    /// Launch lug
    LaunchLug,
    /// Inner tube, typically a motor mount
    InnerTube,
    /// Tube coupler
    TubeCoupler,
    /// Engine block
    EngineBlock,
    /// Bulkhead
    Bulkhead,
    /// Centering ring
    CenteringRing,
    /// Generic mass component
    MassComponent,
    /// Shock cord
    ShockCord,
    /// Parachute
    Parachute,
    /// Streamer
    Streamer,
}

impl ComponentType {
    /// Every concrete type.
    pub const ALL: [ComponentType; 19] = [
        ComponentType::Rocket,
        ComponentType::Stage,
        ComponentType::NoseCone,
        ComponentType::Transition,
        ComponentType::BodyTube,
        ComponentType::TrapezoidFinSet,
        ComponentType::EllipticalFinSet,
        ComponentType::FreeformFinSet,
        ComponentType::TubeFinSet,
        ComponentType::LaunchLug,
        ComponentType::InnerTube,
        ComponentType::TubeCoupler,
        ComponentType::EngineBlock,
        ComponentType::Bulkhead,
        ComponentType::CenteringRing,
        ComponentType::MassComponent,
        ComponentType::ShockCord,
        ComponentType::Parachute,
        ComponentType::Streamer,
    ];

    /// Human readable name, also used as the default component name.
    pub fn display_name(self) -> &'static str {
        match self {
            ComponentType::Rocket => "Rocket",
            ComponentType::Stage => "Stage",
            ComponentType::NoseCone => "Nose cone",
            ComponentType::Transition => "Transition",
            ComponentType::BodyTube => "Body tube",
            ComponentType::TrapezoidFinSet => "Trapezoidal fin set",
            ComponentType::EllipticalFinSet => "Elliptical fin set",
            ComponentType::FreeformFinSet => "Freeform fin set",
            ComponentType::TubeFinSet => "Tube fin set",
            ComponentType::LaunchLug => "Launch lug",
            ComponentType::InnerTube => "Inner tube",
            ComponentType::TubeCoupler => "Tube coupler",
            ComponentType::EngineBlock => "Engine block",
            ComponentType::Bulkhead => "Bulkhead",
            ComponentType::CenteringRing => "Centering ring",
            ComponentType::MassComponent => "Mass component",
            ComponentType::ShockCord => "Shock cord",
            ComponentType::Parachute => "Parachute",
            ComponentType::Streamer => "Streamer",
        }
    }

    /// The most specific class of this type.
    pub fn class(self) -> ComponentClass {
        match self {
            ComponentType::Rocket => ComponentClass::Rocket,
            ComponentType::Stage => ComponentClass::Stage,
            ComponentType::NoseCone => ComponentClass::NoseCone,
            ComponentType::Transition => ComponentClass::Transition,
            ComponentType::BodyTube => ComponentClass::BodyTube,
            ComponentType::TrapezoidFinSet => ComponentClass::TrapezoidFinSet,
            ComponentType::EllipticalFinSet => ComponentClass::EllipticalFinSet,
            ComponentType::FreeformFinSet => ComponentClass::FreeformFinSet,
            ComponentType::TubeFinSet => ComponentClass::TubeFinSet,
            ComponentType::LaunchLug => ComponentClass::LaunchLug,
            ComponentType::InnerTube => ComponentClass::InnerTube,
            ComponentType::TubeCoupler => ComponentClass::TubeCoupler,
            ComponentType::EngineBlock => ComponentClass::EngineBlock,
            ComponentType::Bulkhead => ComponentClass::Bulkhead,
            ComponentType::CenteringRing => ComponentClass::CenteringRing,
            ComponentType::MassComponent => ComponentClass::MassComponent,
            ComponentType::ShockCord => ComponentClass::ShockCord,
            ComponentType::Parachute => ComponentClass::Parachute,
            ComponentType::Streamer => ComponentClass::Streamer,
        }
    }

    /// Classes of this type from most to least specific.
    pub fn ancestry(self) -> Ancestry {
        Ancestry {
            next: Some(self.class()),
        }
    }

    /// Returns true if this type belongs to `class`.
    pub fn is_a(self, class: ComponentClass) -> bool {
        self.ancestry().any(|c| c == class)
    }

    /// Returns true for tubes that can hold motors.
    pub fn is_motor_mount(self) -> bool {
        matches!(self, ComponentType::BodyTube | ComponentType::InnerTube)
    }

    /// Returns true if the component is positioned along its parent.
    pub fn supports_axial_offset(self) -> bool {
        self.is_a(ComponentClass::FinSet)
            || self.is_a(ComponentClass::InternalComponent)
            || matches!(self, ComponentType::TubeFinSet | ComponentType::LaunchLug)
    }

    /// Returns true if the component can sit off the parent centerline.
    pub fn supports_radial_offset(self) -> bool {
        self.is_a(ComponentClass::RingComponent)
            || self.is_a(ComponentClass::MassObject)
            || self == ComponentType::LaunchLug
    }

    /// Returns true if the component has an angular position around its parent.
    pub fn supports_angle_offset(self) -> bool {
        self.supports_radial_offset()
    }

    /// Returns true if a component of type `child` may be attached to this type.
    pub fn is_compatible_child(self, child: ComponentType) -> bool {
        match self {
            ComponentType::Rocket => child == ComponentType::Stage,
            ComponentType::Stage => child.is_a(ComponentClass::BodyComponent),
            ComponentType::NoseCone | ComponentType::Transition | ComponentType::BodyTube => {
                child.is_a(ComponentClass::FinSet)
                    || child.is_a(ComponentClass::InternalComponent)
                    || matches!(child, ComponentType::TubeFinSet | ComponentType::LaunchLug)
            }
            ComponentType::InnerTube | ComponentType::TubeCoupler => {
                child.is_a(ComponentClass::InternalComponent)
            }
            _ => false,
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Component families, abstract and concrete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum ComponentClass {
    RocketComponent,
    ComponentAssembly,
    Rocket,
    Stage,
    ExternalComponent,
    BodyComponent,
    SymmetricComponent,
    BodyTube,
    Transition,
    NoseCone,
    FinSet,
    TrapezoidFinSet,
    EllipticalFinSet,
    FreeformFinSet,
    TubeFinSet,
    LaunchLug,
    InternalComponent,
    StructuralComponent,
    RingComponent,
    ThicknessRingComponent,
    RadiusRingComponent,
    InnerTube,
    TubeCoupler,
    EngineBlock,
    Bulkhead,
    CenteringRing,
    MassObject,
    MassComponent,
    ShockCord,
    RecoveryDevice,
    Parachute,
    Streamer,
}

impl ComponentClass {
    /// The immediate supertype, `None` for the root.
    pub fn parent(self) -> Option<ComponentClass> {
        use ComponentClass::*;
        match self {
            RocketComponent => None,
            ComponentAssembly | ExternalComponent | InternalComponent => Some(RocketComponent),
            Rocket | Stage => Some(ComponentAssembly),
            BodyComponent | FinSet | TubeFinSet | LaunchLug => Some(ExternalComponent),
            SymmetricComponent => Some(BodyComponent),
            BodyTube | Transition => Some(SymmetricComponent),
            NoseCone => Some(Transition),
            TrapezoidFinSet | EllipticalFinSet | FreeformFinSet => Some(FinSet),
            StructuralComponent | MassObject => Some(InternalComponent),
            RingComponent => Some(StructuralComponent),
            ThicknessRingComponent | RadiusRingComponent => Some(RingComponent),
            InnerTube | TubeCoupler | EngineBlock => Some(ThicknessRingComponent),
            Bulkhead | CenteringRing => Some(RadiusRingComponent),
            MassComponent | ShockCord | RecoveryDevice => Some(MassObject),
            Parachute | Streamer => Some(RecoveryDevice),
        }
    }
}

/// Iterator over a class chain, most specific first.
#[derive(Debug, Clone)]
pub struct Ancestry {
    next: Option<ComponentClass>,
}

impl Iterator for Ancestry {
    type Item = ComponentClass;

    fn next(&mut self) -> Option<ComponentClass> {
        let current = self.next?;
        self.next = current.parent();
        Some(current)
    }
}

// ============================================================================
// Common properties
// ============================================================================

/// An overridden mass or CG.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Override {
    /// Overriding value
    pub value: f64,
    /// True when the value replaces the computed one
    pub enabled: bool,
}

impl Override {
    /// Enables the override with a value.
    pub fn set(&mut self, value: f64) {
        self.value = value;
        self.enabled = true;
    }
}

/// Where a component sits relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// Reference of the axial offset
    pub axial_method: AxialMethod,
    /// Axial offset in meters
    pub axial_offset: f64,
    /// Reference of the radial offset
    pub radius_method: RadiusMethod,
    /// Radial offset in meters
    pub radius_offset: f64,
    /// Reference of the angular offset
    pub angle_method: AngleMethod,
    /// Angular offset in radians
    pub angle_offset: f64,
}

/// Finish and material of an external component.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct External {
    /// Surface finish
    pub finish: Finish,
    /// Bulk material
    pub material: Material,
}

impl Default for External {
    fn default() -> Self {
        Self {
            finish: Finish::default(),
            material: Material::default_for(MaterialType::Bulk),
        }
    }
}

// ============================================================================
// Per-kind data
// ============================================================================

/// Rocket level data.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rocket {
    /// Designer
    pub designer: String,
    /// Revision text
    pub revision: String,
    /// Reference length type
    pub reference_type: ReferenceType,
    /// Reference length when `reference_type` is custom, in meters
    pub custom_reference_length: f64,
    /// Flight configurations in document order
    pub motor_configurations: Vec<MotorConfiguration>,
    /// Id of the default configuration
    pub default_configuration: Option<String>,
}

impl Rocket {
    /// Adds a configuration. Returns false if the id is already used.
    pub fn add_motor_configuration(&mut self, configuration: MotorConfiguration) -> bool {
        if self
            .motor_configurations
            .iter()
            .any(|c| c.id == configuration.id)
        {
            return false;
        }
        self.motor_configurations.push(configuration);
        true
    }
}

/// Stage separation data.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stage {
    /// Event that separates the stage
    pub separation_event: SeparationEvent,
    /// Delay after the event in seconds
    pub separation_delay: f64,
}

/// Shoulder at one end of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shoulder {
    /// Outer radius in meters
    pub radius: f64,
    /// Length in meters
    pub length: f64,
    /// Wall thickness in meters
    pub thickness: f64,
    /// True if the end is closed
    pub capped: bool,
}

/// Nose cone or transition geometry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transition {
    /// Finish and material
    pub external: External,
    /// Length in meters
    pub length: f64,
    /// Wall thickness in meters
    pub thickness: f64,
    /// True for a solid component
    pub filled: bool,
    /// Profile
    pub shape: Shape,
    /// True if the profile is clipped at the fore end
    pub clipped: bool,
    /// Profile parameter
    pub shape_parameter: f64,
    /// Fore radius in meters
    pub fore_radius: f64,
    /// Fore radius follows the previous component
    pub fore_radius_automatic: bool,
    /// Aft radius in meters
    pub aft_radius: f64,
    /// Aft radius follows the next component
    pub aft_radius_automatic: bool,
    /// Fore shoulder
    pub fore_shoulder: Shoulder,
    /// Aft shoulder
    pub aft_shoulder: Shoulder,
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            external: External::default(),
            length: 0.1,
            thickness: 0.002,
            filled: false,
            shape: Shape::Conical,
            clipped: true,
            shape_parameter: 0.0,
            fore_radius: 0.025,
            fore_radius_automatic: false,
            aft_radius: 0.025,
            aft_radius_automatic: false,
            fore_shoulder: Shoulder::default(),
            aft_shoulder: Shoulder::default(),
        }
    }
}

impl Transition {
    /// Default nose cone geometry.
    pub fn nose_cone() -> Self {
        Self {
            shape: Shape::Ogive,
            shape_parameter: Shape::Ogive.default_parameter(),
            fore_radius: 0.0,
            aft_radius_automatic: true,
            ..Self::default()
        }
    }

    /// Sets the shape parameter if the shape uses one, clamped to its range.
    pub fn set_shape_parameter(&mut self, value: f64) {
        if self.shape.uses_parameter() {
            self.shape_parameter = self.shape.clamp_parameter(value);
        }
    }
}

/// Body tube geometry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BodyTube {
    /// Finish and material
    pub external: External,
    /// Length in meters
    pub length: f64,
    /// Outer radius in meters
    pub outer_radius: f64,
    /// Outer radius follows the neighbouring components
    pub outer_radius_automatic: bool,
    /// Wall thickness in meters
    pub thickness: f64,
    /// True for a solid tube
    pub filled: bool,
    /// Motor mount data
    pub motor_mount: MotorMount,
}

impl Default for BodyTube {
    fn default() -> Self {
        Self {
            external: External::default(),
            length: 0.3,
            outer_radius: 0.025,
            outer_radius_automatic: false,
            thickness: 0.002,
            filled: false,
            motor_mount: MotorMount::default(),
        }
    }
}

/// Fin set geometry shared by the three fin set types.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FinSet {
    /// Finish and material
    pub external: External,
    /// Number of fins
    pub fin_count: i32,
    /// Rotation of the first fin in radians
    pub base_rotation: f64,
    /// Fin thickness in meters
    pub thickness: f64,
    /// Cross section
    pub cross_section: CrossSection,
    /// Cant angle in radians
    pub cant_angle: f64,
    /// Tab height in meters
    pub tab_height: f64,
    /// Tab length in meters
    pub tab_length: f64,
    /// Tab shift in meters from `tab_relative_to`
    pub tab_shift: f64,
    /// Reference point of the tab shift
    pub tab_relative_to: TabRelativePosition,
    /// Fillet radius in meters
    pub fillet_radius: f64,
    /// Fillet material
    pub fillet_material: Material,
    /// Root chord in meters (trapezoid and elliptical)
    pub root_chord: f64,
    /// Tip chord in meters (trapezoid)
    pub tip_chord: f64,
    /// Sweep length in meters (trapezoid)
    pub sweep: f64,
    /// Span in meters (trapezoid and elliptical)
    pub height: f64,
    /// Outline (freeform)
    pub points: Vec<Coordinate>,
}

impl Default for FinSet {
    fn default() -> Self {
        Self {
            external: External::default(),
            fin_count: 3,
            base_rotation: 0.0,
            thickness: 0.003,
            cross_section: CrossSection::Square,
            cant_angle: 0.0,
            tab_height: 0.0,
            tab_length: 0.0,
            tab_shift: 0.0,
            tab_relative_to: TabRelativePosition::Front,
            fillet_radius: 0.0,
            fillet_material: Material::default_for(MaterialType::Bulk),
            root_chord: 0.05,
            tip_chord: 0.05,
            sweep: 0.025,
            height: 0.05,
            points: vec![
                Coordinate::ORIGIN,
                Coordinate::new(0.025, 0.05),
                Coordinate::new(0.075, 0.03),
                Coordinate::new(0.05, 0.0),
            ],
        }
    }
}

impl FinSet {
    /// Outline of the trapezoid described by the chord, sweep and span fields.
    pub fn trapezoid_outline(&self) -> Vec<Coordinate> {
        vec![
            Coordinate::ORIGIN,
            Coordinate::new(self.sweep, self.height),
            Coordinate::new(self.sweep + self.tip_chord, self.height),
            Coordinate::new(self.root_chord, 0.0),
        ]
    }

    /// Checks that an outline starts at the origin, ends on the root line and
    /// has at least two points.
    pub fn is_valid_outline(points: &[Coordinate]) -> bool {
        match (points.first(), points.last()) {
            (Some(first), Some(last)) if points.len() >= 2 => {
                *first == Coordinate::ORIGIN
                    && last.y == 0.0
                    && points.iter().all(|p| p.x.is_finite() && p.y.is_finite())
            }
            _ => false,
        }
    }
}

/// Tube fin geometry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TubeFinSet {
    /// Finish and material
    pub external: External,
    /// Number of tubes
    pub fin_count: i32,
    /// Rotation of the first tube in radians
    pub base_rotation: f64,
    /// Wall thickness in meters
    pub thickness: f64,
    /// Length in meters
    pub length: f64,
    /// Outer radius in meters
    pub outer_radius: f64,
    /// Outer radius follows the parent
    pub outer_radius_automatic: bool,
}

impl Default for TubeFinSet {
    fn default() -> Self {
        Self {
            external: External::default(),
            fin_count: 6,
            base_rotation: 0.0,
            thickness: 0.002,
            length: 0.1,
            outer_radius: 0.025,
            outer_radius_automatic: true,
        }
    }
}

/// Launch lug geometry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaunchLug {
    /// Finish and material
    pub external: External,
    /// Length in meters
    pub length: f64,
    /// Outer radius in meters
    pub outer_radius: f64,
    /// Wall thickness in meters
    pub thickness: f64,
}

impl Default for LaunchLug {
    fn default() -> Self {
        Self {
            external: External::default(),
            length: 0.03,
            outer_radius: 0.005,
            thickness: 0.001,
        }
    }
}

/// Ring geometry shared by tubes, couplers, blocks, bulkheads and centering rings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ring {
    /// Bulk material
    pub material: Material,
    /// Length in meters
    pub length: f64,
    /// Outer radius in meters
    pub outer_radius: f64,
    /// Outer radius follows the parent
    pub outer_radius_automatic: bool,
    /// Inner radius in meters
    pub inner_radius: f64,
    /// Inner radius follows the inner tube it surrounds
    pub inner_radius_automatic: bool,
    /// Wall thickness in meters
    pub thickness: f64,
}

impl Ring {
    /// Creates a ring of the given length and radii.
    pub fn new(length: f64, outer_radius: f64, inner_radius: f64) -> Self {
        Self {
            material: Material::default_for(MaterialType::Bulk),
            length,
            outer_radius,
            outer_radius_automatic: false,
            inner_radius,
            inner_radius_automatic: false,
            thickness: (outer_radius - inner_radius).max(0.0),
        }
    }

    /// Creates a ring whose outer radius follows its parent.
    fn automatic(length: f64, outer_radius: f64, inner_radius: f64) -> Self {
        Self {
            outer_radius_automatic: true,
            ..Self::new(length, outer_radius, inner_radius)
        }
    }
}

/// Inner tube data.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InnerTube {
    /// Tube geometry
    pub ring: Ring,
    /// Cluster arrangement
    pub cluster_configuration: ClusterConfiguration,
    /// Spacing scale of the cluster
    pub cluster_scale: f64,
    /// Rotation of the cluster in radians
    pub cluster_rotation: f64,
    /// Motor mount data
    pub motor_mount: MotorMount,
}

impl Default for InnerTube {
    fn default() -> Self {
        Self {
            ring: Ring::new(0.07, 0.009, 0.0085),
            cluster_configuration: ClusterConfiguration::Single,
            cluster_scale: 1.0,
            cluster_rotation: 0.0,
            motor_mount: MotorMount::default(),
        }
    }
}

/// Packed dimensions of an internal mass.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MassObject {
    /// Packed length in meters
    pub packed_length: f64,
    /// Packed radius in meters
    pub packed_radius: f64,
}

impl Default for MassObject {
    fn default() -> Self {
        Self {
            packed_length: 0.025,
            packed_radius: 0.0125,
        }
    }
}

/// Generic mass component.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MassComponent {
    /// Packed dimensions
    pub body: MassObject,
    /// Mass in kilograms
    pub mass: f64,
    /// What the mass represents
    pub mass_component_type: MassComponentType,
}

impl Default for MassComponent {
    fn default() -> Self {
        Self {
            body: MassObject::default(),
            mass: 0.025,
            mass_component_type: MassComponentType::default(),
        }
    }
}

/// Shock cord.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShockCord {
    /// Packed dimensions
    pub body: MassObject,
    /// Cord length in meters
    pub cord_length: f64,
    /// Line material
    pub material: Material,
}

impl Default for ShockCord {
    fn default() -> Self {
        Self {
            body: MassObject::default(),
            cord_length: 0.4,
            material: Material::default_for(MaterialType::Line),
        }
    }
}

/// Data shared by parachutes and streamers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecoveryDevice {
    /// Packed dimensions
    pub body: MassObject,
    /// Drag coefficient
    pub cd: f64,
    /// Drag coefficient is computed
    pub cd_automatic: bool,
    /// Deployment event
    pub deploy_event: DeployEvent,
    /// Deployment altitude in meters
    pub deploy_altitude: f64,
    /// Delay after the deployment event in seconds
    pub deploy_delay: f64,
    /// Surface material
    pub material: Material,
}

impl Default for RecoveryDevice {
    fn default() -> Self {
        Self {
            body: MassObject::default(),
            cd: 0.8,
            cd_automatic: true,
            deploy_event: DeployEvent::default(),
            deploy_altitude: 200.0,
            deploy_delay: 0.0,
            material: Material::default_for(MaterialType::Surface),
        }
    }
}

/// Parachute.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parachute {
    /// Recovery device data
    pub recovery: RecoveryDevice,
    /// Canopy diameter in meters
    pub diameter: f64,
    /// Number of shroud lines
    pub line_count: i32,
    /// Shroud line length in meters
    pub line_length: f64,
    /// Shroud line material
    pub line_material: Material,
}

impl Default for Parachute {
    fn default() -> Self {
        Self {
            recovery: RecoveryDevice::default(),
            diameter: 0.3,
            line_count: 6,
            line_length: 0.3,
            line_material: Material::default_for(MaterialType::Line),
        }
    }
}

/// Streamer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Streamer {
    /// Recovery device data
    pub recovery: RecoveryDevice,
    /// Strip length in meters
    pub strip_length: f64,
    /// Strip width in meters
    pub strip_width: f64,
}

impl Default for Streamer {
    fn default() -> Self {
        Self {
            recovery: RecoveryDevice::default(),
            strip_length: 0.5,
            strip_width: 0.05,
        }
    }
}

/// The type specific data of a component.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub enum ComponentKind {
    Rocket(Rocket),
    Stage(Stage),
    NoseCone(Transition),
    Transition(Transition),
    BodyTube(BodyTube),
    TrapezoidFinSet(FinSet),
    EllipticalFinSet(FinSet),
    FreeformFinSet(FinSet),
    TubeFinSet(TubeFinSet),
    LaunchLug(LaunchLug),
    InnerTube(InnerTube),
    TubeCoupler(Ring),
    EngineBlock(Ring),
    Bulkhead(Ring),
    CenteringRing(Ring),
    MassComponent(MassComponent),
    ShockCord(ShockCord),
    Parachute(Parachute),
    Streamer(Streamer),
}

impl ComponentKind {
    /// Default data for a component type.
    pub fn default_for(component_type: ComponentType) -> Self {
        match component_type {
            ComponentType::Rocket => ComponentKind::Rocket(Rocket::default()),
            ComponentType::Stage => ComponentKind::Stage(Stage::default()),
            ComponentType::NoseCone => ComponentKind::NoseCone(Transition::nose_cone()),
            ComponentType::Transition => ComponentKind::Transition(Transition::default()),
            ComponentType::BodyTube => ComponentKind::BodyTube(BodyTube::default()),
            ComponentType::TrapezoidFinSet => ComponentKind::TrapezoidFinSet(FinSet::default()),
            ComponentType::EllipticalFinSet => ComponentKind::EllipticalFinSet(FinSet::default()),
            ComponentType::FreeformFinSet => ComponentKind::FreeformFinSet(FinSet::default()),
            ComponentType::TubeFinSet => ComponentKind::TubeFinSet(TubeFinSet::default()),
            ComponentType::LaunchLug => ComponentKind::LaunchLug(LaunchLug::default()),
            ComponentType::InnerTube => ComponentKind::InnerTube(InnerTube::default()),
            ComponentType::TubeCoupler => ComponentKind::TubeCoupler(Ring::automatic(0.06, 0.025, 0.023)),
            ComponentType::EngineBlock => ComponentKind::EngineBlock(Ring::automatic(0.005, 0.009, 0.0065)),
            ComponentType::Bulkhead => ComponentKind::Bulkhead(Ring::automatic(0.002, 0.025, 0.0)),
            ComponentType::CenteringRing => {
                let mut ring = Ring::automatic(0.002, 0.025, 0.009);
                ring.inner_radius_automatic = true;
                ComponentKind::CenteringRing(ring)
            }
            ComponentType::MassComponent => ComponentKind::MassComponent(MassComponent::default()),
            ComponentType::ShockCord => ComponentKind::ShockCord(ShockCord::default()),
            ComponentType::Parachute => ComponentKind::Parachute(Parachute::default()),
            ComponentType::Streamer => ComponentKind::Streamer(Streamer::default()),
        }
    }

    /// Concrete type of the data.
    pub fn component_type(&self) -> ComponentType {
        match self {
            ComponentKind::Rocket(_) => ComponentType::Rocket,
            ComponentKind::Stage(_) => ComponentType::Stage,
            ComponentKind::NoseCone(_) => ComponentType::NoseCone,
            ComponentKind::Transition(_) => ComponentType::Transition,
            ComponentKind::BodyTube(_) => ComponentType::BodyTube,
            ComponentKind::TrapezoidFinSet(_) => ComponentType::TrapezoidFinSet,
            ComponentKind::EllipticalFinSet(_) => ComponentType::EllipticalFinSet,
            ComponentKind::FreeformFinSet(_) => ComponentType::FreeformFinSet,
            ComponentKind::TubeFinSet(_) => ComponentType::TubeFinSet,
            ComponentKind::LaunchLug(_) => ComponentType::LaunchLug,
            ComponentKind::InnerTube(_) => ComponentType::InnerTube,
            ComponentKind::TubeCoupler(_) => ComponentType::TubeCoupler,
            ComponentKind::EngineBlock(_) => ComponentType::EngineBlock,
            ComponentKind::Bulkhead(_) => ComponentType::Bulkhead,
            ComponentKind::CenteringRing(_) => ComponentType::CenteringRing,
            ComponentKind::MassComponent(_) => ComponentType::MassComponent,
            ComponentKind::ShockCord(_) => ComponentType::ShockCord,
            ComponentKind::Parachute(_) => ComponentType::Parachute,
            ComponentKind::Streamer(_) => ComponentType::Streamer,
        }
    }
}

// ============================================================================
// RocketComponent
// ============================================================================

/// One node of a design tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RocketComponent {
    /// Component name
    pub name: String,
    /// Free text comment
    pub comment: String,
    /// Display color
    pub color: Option<Color>,
    /// Display line style
    pub line_style: Option<LineStyle>,
    /// Placement relative to the parent
    pub position: Position,
    /// Mass override in kilograms
    pub mass_override: Override,
    /// CG override in meters from the component front
    pub cg_override: Override,
    /// Overrides also cover the subcomponents
    pub override_subcomponents: bool,
    /// Catalog part the component was created from
    pub preset: Option<ComponentPreset>,
    /// Type specific data
    pub kind: ComponentKind,
    children: Vec<RocketComponent>,
}

impl RocketComponent {
    /// Creates a component of a type with default values.
    pub fn new(component_type: ComponentType) -> Self {
        Self::with_kind(ComponentKind::default_for(component_type))
    }

    /// Creates a component from its type specific data.
    pub fn with_kind(kind: ComponentKind) -> Self {
        Self {
            name: kind.component_type().display_name().to_string(),
            comment: String::new(),
            color: None,
            line_style: None,
            position: Position::default(),
            mass_override: Override::default(),
            cg_override: Override::default(),
            override_subcomponents: false,
            preset: None,
            kind,
            children: Vec::new(),
        }
    }

    /// Concrete type of the component.
    pub fn component_type(&self) -> ComponentType {
        self.kind.component_type()
    }

    /// Direct children in order.
    pub fn children(&self) -> &[RocketComponent] {
        &self.children
    }

    /// Number of direct children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Attaches a child after the existing children.
    ///
    /// A child of a type that cannot be attached to this component is handed
    /// back unchanged.
    pub fn try_add_child(
        &mut self,
        child: RocketComponent,
    ) -> std::result::Result<(), RocketComponent> {
        if !self.component_type().is_compatible_child(child.component_type()) {
            return Err(child);
        }
        self.children.push(child);
        Ok(())
    }

    /// Iterates the component and all its descendants, depth first.
    pub fn iter(&self) -> ComponentIter<'_> {
        ComponentIter { stack: vec![self] }
    }

    /// Descendants of a given type, depth first.
    pub fn find_all(&self, component_type: ComponentType) -> Vec<&RocketComponent> {
        self.iter()
            .filter(|c| c.component_type() == component_type)
            .collect()
    }

    /// Copies the properties common to all components from another component.
    pub fn copy_common_from(&mut self, other: &RocketComponent) {
        self.name = other.name.clone();
        self.comment = other.comment.clone();
        self.color = other.color;
        self.line_style = other.line_style;
        self.position = other.position;
        self.mass_override = other.mass_override;
        self.cg_override = other.cg_override;
        self.override_subcomponents = other.override_subcomponents;
    }

    // ------------------------------------------------------------------------
    // Typed access
    // ------------------------------------------------------------------------

    /// Rocket data.
    pub fn rocket_mut(&mut self) -> Option<&mut Rocket> {
        match &mut self.kind {
            ComponentKind::Rocket(r) => Some(r),
            _ => None,
        }
    }

    /// Rocket data.
    pub fn rocket(&self) -> Option<&Rocket> {
        match &self.kind {
            ComponentKind::Rocket(r) => Some(r),
            _ => None,
        }
    }

    /// Stage data.
    pub fn stage_mut(&mut self) -> Option<&mut Stage> {
        match &mut self.kind {
            ComponentKind::Stage(s) => Some(s),
            _ => None,
        }
    }

    /// Finish and material of external components.
    pub fn external_mut(&mut self) -> Option<&mut External> {
        match &mut self.kind {
            ComponentKind::NoseCone(t) | ComponentKind::Transition(t) => Some(&mut t.external),
            ComponentKind::BodyTube(t) => Some(&mut t.external),
            ComponentKind::TrapezoidFinSet(f)
            | ComponentKind::EllipticalFinSet(f)
            | ComponentKind::FreeformFinSet(f) => Some(&mut f.external),
            ComponentKind::TubeFinSet(f) => Some(&mut f.external),
            ComponentKind::LaunchLug(l) => Some(&mut l.external),
            _ => None,
        }
    }

    /// Nose cone or transition geometry.
    pub fn transition_mut(&mut self) -> Option<&mut Transition> {
        match &mut self.kind {
            ComponentKind::NoseCone(t) | ComponentKind::Transition(t) => Some(t),
            _ => None,
        }
    }

    /// Nose cone or transition geometry.
    pub fn transition(&self) -> Option<&Transition> {
        match &self.kind {
            ComponentKind::NoseCone(t) | ComponentKind::Transition(t) => Some(t),
            _ => None,
        }
    }

    /// Body tube geometry.
    pub fn body_tube_mut(&mut self) -> Option<&mut BodyTube> {
        match &mut self.kind {
            ComponentKind::BodyTube(t) => Some(t),
            _ => None,
        }
    }

    /// Body tube geometry.
    pub fn body_tube(&self) -> Option<&BodyTube> {
        match &self.kind {
            ComponentKind::BodyTube(t) => Some(t),
            _ => None,
        }
    }

    /// Length of nose cones, transitions and body tubes.
    pub fn body_length_mut(&mut self) -> Option<&mut f64> {
        match &mut self.kind {
            ComponentKind::NoseCone(t) | ComponentKind::Transition(t) => Some(&mut t.length),
            ComponentKind::BodyTube(t) => Some(&mut t.length),
            _ => None,
        }
    }

    /// Wall thickness of nose cones, transitions and body tubes.
    pub fn wall_thickness_mut(&mut self) -> Option<&mut f64> {
        match &mut self.kind {
            ComponentKind::NoseCone(t) | ComponentKind::Transition(t) => Some(&mut t.thickness),
            ComponentKind::BodyTube(t) => Some(&mut t.thickness),
            _ => None,
        }
    }

    /// Solid flag of nose cones, transitions and body tubes.
    pub fn filled_mut(&mut self) -> Option<&mut bool> {
        match &mut self.kind {
            ComponentKind::NoseCone(t) | ComponentKind::Transition(t) => Some(&mut t.filled),
            ComponentKind::BodyTube(t) => Some(&mut t.filled),
            _ => None,
        }
    }

    /// Fin set geometry of any of the three fin set types.
    pub fn fin_set_mut(&mut self) -> Option<&mut FinSet> {
        match &mut self.kind {
            ComponentKind::TrapezoidFinSet(f)
            | ComponentKind::EllipticalFinSet(f)
            | ComponentKind::FreeformFinSet(f) => Some(f),
            _ => None,
        }
    }

    /// Fin set geometry of any of the three fin set types.
    pub fn fin_set(&self) -> Option<&FinSet> {
        match &self.kind {
            ComponentKind::TrapezoidFinSet(f)
            | ComponentKind::EllipticalFinSet(f)
            | ComponentKind::FreeformFinSet(f) => Some(f),
            _ => None,
        }
    }

    /// Tube fin geometry.
    pub fn tube_fin_set_mut(&mut self) -> Option<&mut TubeFinSet> {
        match &mut self.kind {
            ComponentKind::TubeFinSet(f) => Some(f),
            _ => None,
        }
    }

    /// Launch lug geometry.
    pub fn launch_lug_mut(&mut self) -> Option<&mut LaunchLug> {
        match &mut self.kind {
            ComponentKind::LaunchLug(l) => Some(l),
            _ => None,
        }
    }

    /// Ring geometry of inner tubes, couplers, blocks, bulkheads and centering rings.
    pub fn ring_mut(&mut self) -> Option<&mut Ring> {
        match &mut self.kind {
            ComponentKind::InnerTube(t) => Some(&mut t.ring),
            ComponentKind::TubeCoupler(r)
            | ComponentKind::EngineBlock(r)
            | ComponentKind::Bulkhead(r)
            | ComponentKind::CenteringRing(r) => Some(r),
            _ => None,
        }
    }

    /// Ring geometry of inner tubes, couplers, blocks, bulkheads and centering rings.
    pub fn ring(&self) -> Option<&Ring> {
        match &self.kind {
            ComponentKind::InnerTube(t) => Some(&t.ring),
            ComponentKind::TubeCoupler(r)
            | ComponentKind::EngineBlock(r)
            | ComponentKind::Bulkhead(r)
            | ComponentKind::CenteringRing(r) => Some(r),
            _ => None,
        }
    }

    /// Inner tube data.
    pub fn inner_tube_mut(&mut self) -> Option<&mut InnerTube> {
        match &mut self.kind {
            ComponentKind::InnerTube(t) => Some(t),
            _ => None,
        }
    }

    /// Packed dimensions of mass objects.
    pub fn mass_object_mut(&mut self) -> Option<&mut MassObject> {
        match &mut self.kind {
            ComponentKind::MassComponent(m) => Some(&mut m.body),
            ComponentKind::ShockCord(s) => Some(&mut s.body),
            ComponentKind::Parachute(p) => Some(&mut p.recovery.body),
            ComponentKind::Streamer(s) => Some(&mut s.recovery.body),
            _ => None,
        }
    }

    /// Mass component data.
    pub fn mass_component_mut(&mut self) -> Option<&mut MassComponent> {
        match &mut self.kind {
            ComponentKind::MassComponent(m) => Some(m),
            _ => None,
        }
    }

    /// Shock cord data.
    pub fn shock_cord_mut(&mut self) -> Option<&mut ShockCord> {
        match &mut self.kind {
            ComponentKind::ShockCord(s) => Some(s),
            _ => None,
        }
    }

    /// Recovery device data of parachutes and streamers.
    pub fn recovery_device_mut(&mut self) -> Option<&mut RecoveryDevice> {
        match &mut self.kind {
            ComponentKind::Parachute(p) => Some(&mut p.recovery),
            ComponentKind::Streamer(s) => Some(&mut s.recovery),
            _ => None,
        }
    }

    /// Parachute data.
    pub fn parachute_mut(&mut self) -> Option<&mut Parachute> {
        match &mut self.kind {
            ComponentKind::Parachute(p) => Some(p),
            _ => None,
        }
    }

    /// Streamer data.
    pub fn streamer_mut(&mut self) -> Option<&mut Streamer> {
        match &mut self.kind {
            ComponentKind::Streamer(s) => Some(s),
            _ => None,
        }
    }

    /// Motor mount data of body tubes and inner tubes.
    pub fn motor_mount_mut(&mut self) -> Option<&mut MotorMount> {
        match &mut self.kind {
            ComponentKind::BodyTube(t) => Some(&mut t.motor_mount),
            ComponentKind::InnerTube(t) => Some(&mut t.motor_mount),
            _ => None,
        }
    }

    /// Motor mount data of body tubes and inner tubes.
    pub fn motor_mount(&self) -> Option<&MotorMount> {
        match &self.kind {
            ComponentKind::BodyTube(t) => Some(&t.motor_mount),
            ComponentKind::InnerTube(t) => Some(&t.motor_mount),
            _ => None,
        }
    }

    /// The main material of the component, if it has one.
    pub fn material_mut(&mut self) -> Option<&mut Material> {
        match &mut self.kind {
            ComponentKind::InnerTube(t) => Some(&mut t.ring.material),
            ComponentKind::TubeCoupler(r)
            | ComponentKind::EngineBlock(r)
            | ComponentKind::Bulkhead(r)
            | ComponentKind::CenteringRing(r) => Some(&mut r.material),
            ComponentKind::ShockCord(s) => Some(&mut s.material),
            ComponentKind::Parachute(p) => Some(&mut p.recovery.material),
            ComponentKind::Streamer(s) => Some(&mut s.recovery.material),
            ComponentKind::NoseCone(t) | ComponentKind::Transition(t) => {
                Some(&mut t.external.material)
            }
            ComponentKind::BodyTube(t) => Some(&mut t.external.material),
            ComponentKind::TrapezoidFinSet(f)
            | ComponentKind::EllipticalFinSet(f)
            | ComponentKind::FreeformFinSet(f) => Some(&mut f.external.material),
            ComponentKind::TubeFinSet(f) => Some(&mut f.external.material),
            ComponentKind::LaunchLug(l) => Some(&mut l.external.material),
            ComponentKind::Rocket(_) | ComponentKind::Stage(_) | ComponentKind::MassComponent(_) => {
                None
            }
        }
    }

    /// The main material of the component, if it has one.
    pub fn material(&self) -> Option<&Material> {
        match &self.kind {
            ComponentKind::NoseCone(t) | ComponentKind::Transition(t) => Some(&t.external.material),
            ComponentKind::BodyTube(t) => Some(&t.external.material),
            ComponentKind::TrapezoidFinSet(f)
            | ComponentKind::EllipticalFinSet(f)
            | ComponentKind::FreeformFinSet(f) => Some(&f.external.material),
            ComponentKind::TubeFinSet(f) => Some(&f.external.material),
            ComponentKind::LaunchLug(l) => Some(&l.external.material),
            ComponentKind::InnerTube(t) => Some(&t.ring.material),
            ComponentKind::TubeCoupler(r)
            | ComponentKind::EngineBlock(r)
            | ComponentKind::Bulkhead(r)
            | ComponentKind::CenteringRing(r) => Some(&r.material),
            ComponentKind::ShockCord(s) => Some(&s.material),
            ComponentKind::Parachute(p) => Some(&p.recovery.material),
            ComponentKind::Streamer(s) => Some(&s.recovery.material),
            _ => None,
        }
    }

    /// Length of the component, if it has one.
    pub fn length(&self) -> Option<f64> {
        match &self.kind {
            ComponentKind::NoseCone(t) | ComponentKind::Transition(t) => Some(t.length),
            ComponentKind::BodyTube(t) => Some(t.length),
            ComponentKind::TrapezoidFinSet(f) | ComponentKind::EllipticalFinSet(f) => {
                Some(f.root_chord)
            }
            ComponentKind::FreeformFinSet(f) => {
                Some(f.points.iter().map(|p| p.x).fold(0.0, f64::max))
            }
            ComponentKind::TubeFinSet(f) => Some(f.length),
            ComponentKind::LaunchLug(l) => Some(l.length),
            ComponentKind::InnerTube(_)
            | ComponentKind::TubeCoupler(_)
            | ComponentKind::EngineBlock(_)
            | ComponentKind::Bulkhead(_)
            | ComponentKind::CenteringRing(_) => self.ring().map(|r| r.length),
            ComponentKind::MassComponent(m) => Some(m.body.packed_length),
            ComponentKind::ShockCord(s) => Some(s.body.packed_length),
            ComponentKind::Parachute(p) => Some(p.recovery.body.packed_length),
            ComponentKind::Streamer(s) => Some(s.recovery.body.packed_length),
            ComponentKind::Rocket(_) | ComponentKind::Stage(_) => None,
        }
    }

    /// Radius at the fore end of body components.
    pub fn fore_radius(&self) -> Option<f64> {
        match &self.kind {
            ComponentKind::NoseCone(t) | ComponentKind::Transition(t) => Some(t.fore_radius),
            ComponentKind::BodyTube(t) => Some(t.outer_radius),
            ComponentKind::InnerTube(t) => Some(t.ring.outer_radius),
            _ => None,
        }
    }

    /// Radius at the aft end of body components.
    pub fn aft_radius(&self) -> Option<f64> {
        match &self.kind {
            ComponentKind::NoseCone(t) | ComponentKind::Transition(t) => Some(t.aft_radius),
            ComponentKind::BodyTube(t) => Some(t.outer_radius),
            ComponentKind::InnerTube(t) => Some(t.ring.outer_radius),
            _ => None,
        }
    }

    // ------------------------------------------------------------------------
    // Presets
    // ------------------------------------------------------------------------

    /// Applies a catalog part, copying its dimensions and mass.
    ///
    /// Returns false, leaving the component unchanged, if the preset is for a
    /// different component type.
    pub fn load_preset(&mut self, preset: &ComponentPreset) -> bool {
        if preset.preset_type.component_type() != self.component_type() {
            return false;
        }
        let outer = preset.outer_diameter.map(|d| d / 2.0);
        let inner = preset.inner_diameter.map(|d| d / 2.0);
        match &mut self.kind {
            ComponentKind::BodyTube(t) => {
                if let Some(length) = preset.length {
                    t.length = length;
                }
                if let Some(outer) = outer {
                    t.outer_radius = outer;
                    t.outer_radius_automatic = false;
                    if let Some(inner) = inner {
                        t.thickness = outer - inner;
                        t.filled = false;
                    }
                }
            }
            ComponentKind::NoseCone(t) | ComponentKind::Transition(t) => {
                if let Some(length) = preset.length {
                    t.length = length;
                }
                if let Some(outer) = outer {
                    t.aft_radius = outer;
                    t.aft_radius_automatic = false;
                }
            }
            ComponentKind::TubeCoupler(r)
            | ComponentKind::EngineBlock(r)
            | ComponentKind::Bulkhead(r)
            | ComponentKind::CenteringRing(r) => {
                if let Some(length) = preset.length {
                    r.length = length;
                }
                if let Some(outer) = outer {
                    r.outer_radius = outer;
                    r.outer_radius_automatic = false;
                }
                if let Some(inner) = inner {
                    r.inner_radius = inner;
                    r.inner_radius_automatic = false;
                    r.thickness = r.outer_radius - inner;
                }
            }
            ComponentKind::LaunchLug(l) => {
                if let Some(length) = preset.length {
                    l.length = length;
                }
                if let Some(outer) = outer {
                    l.outer_radius = outer;
                    if let Some(inner) = inner {
                        l.thickness = outer - inner;
                    }
                }
            }
            ComponentKind::Parachute(p) => {
                if let Some(outer) = outer {
                    p.diameter = outer * 2.0;
                }
            }
            ComponentKind::Streamer(s) => {
                if let Some(length) = preset.length {
                    s.strip_length = length;
                }
            }
            _ => {}
        }
        if let Some(mass) = preset.mass {
            self.mass_override.set(mass);
        }
        self.preset = Some(preset.clone());
        true
    }
}

/// Depth first iterator over a component tree.
pub struct ComponentIter<'a> {
    stack: Vec<&'a RocketComponent>,
}

impl<'a> Iterator for ComponentIter<'a> {
    type Item = &'a RocketComponent;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        self.stack.extend(current.children.iter().rev());
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ancestry_most_specific_first() {
        let chain: Vec<ComponentClass> = ComponentType::NoseCone.ancestry().collect();
        assert_eq!(
            chain,
            vec![
                ComponentClass::NoseCone,
                ComponentClass::Transition,
                ComponentClass::SymmetricComponent,
                ComponentClass::BodyComponent,
                ComponentClass::ExternalComponent,
                ComponentClass::RocketComponent,
            ]
        );
        assert!(ComponentType::Streamer.is_a(ComponentClass::MassObject));
        assert!(!ComponentType::Streamer.is_a(ComponentClass::StructuralComponent));
    }

    #[test]
    fn test_every_type_reaches_root() {
        for t in ComponentType::ALL {
            assert_eq!(t.ancestry().last(), Some(ComponentClass::RocketComponent));
            assert_eq!(RocketComponent::new(t).component_type(), t);
        }
    }

    #[test]
    fn test_compatibility() {
        let mut tube = RocketComponent::new(ComponentType::BodyTube);
        assert!(tube
            .try_add_child(RocketComponent::new(ComponentType::TrapezoidFinSet))
            .is_ok());
        assert!(tube
            .try_add_child(RocketComponent::new(ComponentType::Bulkhead))
            .is_ok());
        let rejected = tube.try_add_child(RocketComponent::new(ComponentType::Stage));
        assert!(rejected.is_err());
        assert_eq!(tube.child_count(), 2);

        let mut inner = RocketComponent::new(ComponentType::InnerTube);
        assert!(inner
            .try_add_child(RocketComponent::new(ComponentType::EllipticalFinSet))
            .is_err());
    }

    #[test]
    fn test_iter_depth_first() {
        let mut stage = RocketComponent::new(ComponentType::Stage);
        let mut tube = RocketComponent::new(ComponentType::BodyTube);
        tube.try_add_child(RocketComponent::new(ComponentType::Parachute))
            .unwrap();
        stage
            .try_add_child(RocketComponent::new(ComponentType::NoseCone))
            .unwrap();
        stage.try_add_child(tube).unwrap();

        let types: Vec<ComponentType> = stage.iter().map(|c| c.component_type()).collect();
        assert_eq!(
            types,
            vec![
                ComponentType::Stage,
                ComponentType::NoseCone,
                ComponentType::BodyTube,
                ComponentType::Parachute,
            ]
        );
    }

    #[test]
    fn test_load_preset() {
        let preset = ComponentPreset::new("Estes", "BT-50", crate::objects::PresetType::BodyTube)
            .with_length(0.45)
            .with_diameters(0.0248, 0.0242)
            .with_mass(0.012);
        let mut tube = RocketComponent::new(ComponentType::BodyTube);
        assert!(tube.load_preset(&preset));
        let t = tube.body_tube().unwrap();
        assert_eq!(t.length, 0.45);
        assert!((t.outer_radius - 0.0124).abs() < 1e-12);
        assert!((t.thickness - 0.0003).abs() < 1e-12);
        assert!(tube.mass_override.enabled);

        let mut ring = RocketComponent::new(ComponentType::CenteringRing);
        assert!(!ring.load_preset(&preset));
        assert!(ring.preset.is_none());
    }

    #[test]
    fn test_trapezoid_outline() {
        let fins = FinSet::default();
        let outline = fins.trapezoid_outline();
        assert!(FinSet::is_valid_outline(&outline));
        assert_eq!(outline[3], Coordinate::new(0.05, 0.0));
        assert!(!FinSet::is_valid_outline(&[Coordinate::new(0.01, 0.0)]));
    }
}
